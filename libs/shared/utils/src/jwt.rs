use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use shared_models::auth::{AuthUser, SessionClaims};
use shared_models::error::AppError;
use shared_models::user::User;

/// Sessions last two days, both in the token and in the cookie.
pub const SESSION_TTL_SECS: i64 = 2 * 24 * 60 * 60;

pub fn issue_token(user: &User, jwt_secret: &str, now: DateTime<Utc>) -> Result<String, AppError> {
    if jwt_secret.is_empty() {
        return Err(AppError::Internal("JWT secret is not set".to_string()));
    }

    let iat = now.timestamp();
    let claims = SessionClaims {
        user_id: user.id.clone(),
        email: user.email.clone(),
        role: user.role,
        iat,
        exp: iat + SESSION_TTL_SECS,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<AuthUser, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        debug!("Token rejected: {}", e);
        e.to_string()
    })?;

    debug!("Token validated successfully for user: {}", data.claims.user_id);
    Ok(data.claims.into())
}
