use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::{AppConfig, Environment, StepValidation, MEMORY_DATABASE_URL};
use shared_database::Repositories;
use shared_models::auth::{AuthUser, SessionClaims, SESSION_COOKIE};
use shared_models::user::Role;

use crate::state::AppState;

pub struct TestConfig {
    pub jwt_secret: String,
    pub environment: Environment,
    pub step_validation: StepValidation,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            environment: Environment::Development,
            step_validation: StepValidation::Deferred,
        }
    }
}

impl TestConfig {
    pub fn strict_steps() -> Self {
        Self {
            step_validation: StepValidation::Strict,
            ..Self::default()
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_url: MEMORY_DATABASE_URL.to_string(),
            database_name: "fitwell_test".to_string(),
            jwt_secret: self.jwt_secret.clone(),
            environment: self.environment,
            bind_addr: ([127, 0, 0, 1], 0).into(),
            step_validation: self.step_validation,
        }
    }

    /// Fresh in-memory repositories behind this config.
    pub fn to_state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(self.to_app_config(), Repositories::in_memory()))
    }
}

pub fn test_state() -> Arc<AppState> {
    TestConfig::default().to_state()
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new("test@example.com", Role::Patient)
    }
}

impl TestUser {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, Role::Patient)
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, Role::Admin)
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }

    /// `Cookie` header value carrying a valid session for this user.
    pub fn cookie(&self, secret: &str) -> String {
        session_cookie(&JwtTestUtils::create_test_token(self, secret, None))
    }
}

pub fn session_cookie(token: &str) -> String {
    format!("{}={}", SESSION_COOKIE, token)
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(48));

        let claims = SessionClaims {
            user_id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("test token should encode")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-24))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", None)
    }

    /// A validly signed token whose payload was then edited to claim the admin role.
    pub fn create_tampered_token(user: &TestUser, secret: &str) -> String {
        let token = Self::create_test_token(user, secret, None);
        let parts: Vec<&str> = token.split('.').collect();

        let payload = general_purpose::URL_SAFE_NO_PAD
            .decode(parts[1])
            .expect("payload should be base64");
        let mut claims: Value = serde_json::from_slice(&payload).expect("payload should be JSON");
        claims["role"] = json!("admin");
        let forged = general_purpose::URL_SAFE_NO_PAD.encode(claims.to_string());

        format!("{}.{}.{}", parts[0], forged, parts[2])
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct RegistrationFixtures;

impl RegistrationFixtures {
    /// A complete registration form that passes every rule.
    pub fn valid(email: &str) -> Value {
        json!({
            "firstName": "Ana",
            "lastName": "Ng",
            "email": email,
            "password": "password1",
            "confirmPassword": "password1",
            "gender": "female",
            "dateOfBirth": "1995-04-12",
            "height": 165,
            "weight": 60,
            "bloodType": "O+",
            "allergies": "Peanuts"
        })
    }

    pub fn with(email: &str, field: &str, value: Value) -> Value {
        let mut payload = Self::valid(email);
        payload[field] = value;
        payload
    }

    pub fn without(email: &str, field: &str) -> Value {
        let mut payload = Self::valid(email);
        if let Some(map) = payload.as_object_mut() {
            map.remove(field);
        }
        payload
    }
}
