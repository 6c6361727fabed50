use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use shared_database::{DatabaseError, UserRepository};
use shared_models::error::AppError;
use shared_models::user::{User, UserCredentials};
use shared_utils::password::{hash_password, verify_password};
use shared_utils::AppState;

use crate::models::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::services::validation::{normalize_email, validate_profile_changes, validate_registration};

pub const DUPLICATE_EMAIL_MESSAGE: &str = "User with this email already exists";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: state.repos.users.clone(),
        }
    }

    /// Duplicate check, then validation, then hash and insert.
    #[instrument(skip(self, form))]
    pub async fn register(&self, form: RegisterRequest) -> Result<User, AppError> {
        if let Some(email) = form.email.as_deref().map(normalize_email).filter(|e| !e.is_empty()) {
            if self.users.email_exists(&email).await? {
                debug!("Registration refused, email already in use");
                return Err(AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
            }
        }

        let new_user = validate_registration(&form).map_err(AppError::Validation)?;
        let (user, password) = new_user.into_record(Uuid::new_v4().to_string(), Utc::now());
        let password_hash = hash_blocking(password).await?;

        let user = self
            .users
            .insert(UserCredentials { user, password_hash })
            .await
            .map_err(|e| match e {
                DatabaseError::DuplicateKey(_) => AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()),
                other => other.into(),
            })?;

        info!("User registered: {}", user.id);
        Ok(user)
    }

    /// Returns the user when the credentials match an active account.
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> Result<User, AppError> {
        let email = request.email.as_deref().map(normalize_email).filter(|e| !e.is_empty());
        let password = request.password.filter(|p| !p.is_empty());

        let (Some(email), Some(password)) = (email, password) else {
            return Err(AppError::BadRequest("Please enter an email and password".to_string()));
        };

        let Some(credentials) = self.users.find_with_credentials(&email).await? else {
            warn!("Rejected login attempt");
            return Err(invalid_credentials());
        };

        if !credentials.user.is_active {
            warn!("Rejected login attempt");
            return Err(invalid_credentials());
        }

        if !verify_blocking(password, credentials.password_hash).await? {
            warn!("Rejected login attempt");
            return Err(invalid_credentials());
        }

        info!("User logged in: {}", credentials.user.id);
        Ok(credentials.user)
    }

    pub async fn current_user(&self, user_id: &str) -> Result<User, AppError> {
        self.users
            .find_public(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, user_id: &str, update: UpdateProfileRequest) -> Result<User, AppError> {
        let changes = validate_profile_changes(&update).map_err(AppError::Validation)?;

        if changes.is_empty() {
            debug!("Profile update with no changes for user: {}", user_id);
            return self.current_user(user_id).await;
        }

        let user = self
            .users
            .update_profile(user_id, &changes, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        info!("Profile updated for user: {}", user.id);
        Ok(user)
    }
}

fn invalid_credentials() -> AppError {
    AppError::Auth(INVALID_CREDENTIALS_MESSAGE.to_string())
}

async fn hash_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Stored password hash is unusable: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_utils::test_utils::{test_state, RegistrationFixtures};

    fn register_request(email: &str) -> RegisterRequest {
        serde_json::from_value(RegistrationFixtures::valid(email)).unwrap()
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let state = test_state();
        let service = AccountService::new(&state);

        let user = service.register(register_request("Ana@Example.com")).await.unwrap();
        assert_eq!(user.email, "ana@example.com");

        let logged_in = service.login(login_request(" ANA@example.com", "password1")).await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_is_reported_before_validation() {
        let state = test_state();
        let service = AccountService::new(&state);
        service.register(register_request("ana@example.com")).await.unwrap();

        let mut again = RegisterRequest::default();
        again.email = Some("ANA@example.com".to_string());

        assert_matches!(
            service.register(again).await,
            Err(AppError::Conflict(msg)) if msg == DUPLICATE_EMAIL_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let state = test_state();
        let service = AccountService::new(&state);
        service.register(register_request("ana@example.com")).await.unwrap();

        let wrong_password = service.login(login_request("ana@example.com", "wrong")).await;
        let unknown_user = service.login(login_request("nobody@example.com", "password1")).await;

        assert_matches!(wrong_password, Err(AppError::Auth(ref msg)) if msg == INVALID_CREDENTIALS_MESSAGE);
        assert_matches!(unknown_user, Err(AppError::Auth(ref msg)) if msg == INVALID_CREDENTIALS_MESSAGE);
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let service = AccountService::new(&test_state());

        let missing = LoginRequest {
            email: Some("ana@example.com".to_string()),
            password: None,
        };
        assert_matches!(service.login(missing).await, Err(AppError::BadRequest(_)));
        assert_matches!(service.login(login_request("", "password1")).await, Err(AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_update_profile_for_missing_user() {
        let service = AccountService::new(&test_state());
        let update = UpdateProfileRequest {
            first_name: Some("Bea".to_string()),
            ..Default::default()
        };

        assert_matches!(service.update_profile("gone", update).await, Err(AppError::NotFound(_)));
    }
}
