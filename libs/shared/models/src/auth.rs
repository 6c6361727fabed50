use serde::{Deserialize, Serialize};

use crate::user::Role;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "auth-token";

/// Claims signed into the session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// The caller as established by a verified session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl From<SessionClaims> for AuthUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.user_id,
            email: claims.email,
            role: claims.role,
        }
    }
}
