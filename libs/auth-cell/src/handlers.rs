use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::StepValidation;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::extractor::json_body;
use shared_utils::jwt::issue_token;
use shared_utils::AppState;

use crate::models::{LoginRequest, RegisterRequest, RegistrationStep, StepResponse, UpdateProfileRequest};
use crate::services::account::AccountService;
use crate::services::session::{cleared_session_cookie, session_cookie};
use crate::services::validation::step_errors;

pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let form = json_body(payload)?;

    let user = AccountService::new(&state).register(form).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": user
        })),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let request = json_body(payload)?;

    let user = AccountService::new(&state).login(request).await?;
    let token = issue_token(&user, &state.config.jwt_secret, Utc::now())?;
    let cookie = session_cookie(token, state.config.secure_cookies());

    Ok((
        jar.add(cookie),
        Json(json!({
            "message": "Login successful",
            "user": user
        })),
    ))
}

pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    debug!("Clearing session cookie");
    (
        jar.add(cleared_session_cookie(state.config.secure_cookies())),
        Json(json!({ "message": "Logged out" })),
    )
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let user = AccountService::new(&state).current_user(&auth.id).await?;

    Ok(Json(json!({ "user": user })))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let update = json_body(payload)?;

    let user = AccountService::new(&state).update_profile(&auth.id, update).await?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": user
    })))
}

/// Checks one page of the multi-step registration form against the aggregated form state.
pub async fn validate_step(
    State(state): State<Arc<AppState>>,
    Path(step): Path<String>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<StepResponse>, AppError> {
    let step = step
        .parse::<u8>()
        .ok()
        .and_then(RegistrationStep::from_number)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown registration step: {}", step)))?;
    let form = json_body(payload)?;

    let errors = step_errors(step, &form);
    if !errors.is_empty() && state.config.step_validation == StepValidation::Strict {
        return Err(AppError::Validation(errors));
    }

    Ok(Json(StepResponse {
        step: step.number(),
        next_step: step.next_number(),
        valid: errors.is_empty(),
        errors,
    }))
}
