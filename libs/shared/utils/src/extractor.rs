use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::Request,
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use shared_models::auth::{AuthUser, SESSION_COOKIE};
use shared_models::error::AppError;

use crate::jwt::validate_token;
use crate::state::AppState;

// Requires a valid session cookie and makes the caller available as `Extension<AuthUser>`
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = session_user(&jar, &state.config.jwt_secret)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Reads and verifies the session cookie.
pub fn session_user(jar: &CookieJar, jwt_secret: &str) -> Result<AuthUser, AppError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Auth("Not authenticated".to_string()))?;

    validate_token(&token, jwt_secret)
        .map_err(|_| AppError::Auth("Invalid or expired session".to_string()))
}

/// Unwraps a JSON body taken as `Result<Json<T>, JsonRejection>`, hiding the parser's detail.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection.body_text());
            Err(AppError::BadRequest("Invalid request body".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{session_cookie, test_state, JwtTestUtils, TestConfig, TestUser};
    use axum::{
        http::{header, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        let state = test_state();
        Router::new()
            .route("/whoami", get(|Extension(user): Extension<AuthUser>| async move { user.email }))
            .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    async fn call(cookie: Option<String>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let response = app().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_cookie_passes() {
        let user = TestUser::patient("walker@example.com");
        let token = JwtTestUtils::create_test_token(&user, &TestConfig::default().jwt_secret, None);

        let (status, body) = call(Some(session_cookie(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "walker@example.com");
    }

    #[tokio::test]
    async fn test_missing_cookie() {
        let (status, body) = call(None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Not authenticated"));

        let (status, _) = call(Some("auth-token=".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_rejected_tokens_share_one_message() {
        let user = TestUser::default();
        let secret = TestConfig::default().jwt_secret;

        for token in [
            JwtTestUtils::create_expired_token(&user, &secret),
            JwtTestUtils::create_invalid_signature_token(&user),
            JwtTestUtils::create_tampered_token(&user, &secret),
            JwtTestUtils::create_malformed_token(),
        ] {
            let (status, body) = call(Some(session_cookie(&token))).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert!(body.contains("Invalid or expired session"));
        }
    }
}
