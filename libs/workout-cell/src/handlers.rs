use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::workout::Workout;
use shared_utils::extractor::json_body;
use shared_utils::AppState;

use crate::models::WorkoutRequest;
use crate::services::workout::WorkoutService;

pub async fn create_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<WorkoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Workout>), AppError> {
    let request = json_body(payload)?;

    let workout = WorkoutService::new(&state).create_workout(&user, request).await?;

    Ok((StatusCode::CREATED, Json(workout)))
}

pub async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let workouts = WorkoutService::new(&state).list_workouts(&user).await?;

    Ok(Json(json!({ "workouts": workouts })))
}

pub async fn get_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Workout>, AppError> {
    let workout = WorkoutService::new(&state).get_workout(&user, &id).await?;

    Ok(Json(workout))
}

pub async fn update_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<WorkoutRequest>, JsonRejection>,
) -> Result<Json<Workout>, AppError> {
    let request = json_body(payload)?;

    let workout = WorkoutService::new(&state).update_workout(&user, &id, request).await?;

    Ok(Json(workout))
}

pub async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    WorkoutService::new(&state).delete_workout(&user, &id).await?;

    Ok(Json(json!({ "message": "Workout deleted successfully" })))
}
