use axum_extra::extract::cookie::{Cookie, SameSite};

use shared_models::auth::SESSION_COOKIE;
use shared_utils::jwt::SESSION_TTL_SECS;

/// The cookie that carries a freshly issued session token.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::seconds(SESSION_TTL_SECS))
        .build()
}

/// Overwrites the session cookie with an empty one that expires immediately.
pub fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc.def.ghi".to_string(), false).to_string();

        assert!(cookie.starts_with("auth-token=abc.def.ghi"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=172800"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_production_cookie_is_secure() {
        assert!(session_cookie("t".to_string(), true).to_string().contains("Secure"));
        assert!(cleared_session_cookie(true).to_string().contains("Secure"));
    }

    #[test]
    fn test_cleared_cookie_expires_now() {
        let cookie = cleared_session_cookie(false).to_string();
        assert!(cookie.starts_with("auth-token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
