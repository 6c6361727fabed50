use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::extractor::json_body;
use shared_utils::AppState;

use crate::models::{CreateGoalRequest, GoalView, UpdateGoalRequest};
use crate::services::goal::GoalService;

pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateGoalRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GoalView>), AppError> {
    let request = json_body(payload)?;

    let goal = GoalService::new(&state).create_goal(&user, request).await?;

    Ok((StatusCode::CREATED, Json(GoalView::new(goal, Utc::now()))))
}

pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let goals = GoalService::new(&state).list_goals(&user).await?;

    let now = Utc::now();
    let goals: Vec<GoalView> = goals.into_iter().map(|goal| GoalView::new(goal, now)).collect();

    Ok(Json(json!({ "goals": goals })))
}

pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<GoalView>, AppError> {
    let goal = GoalService::new(&state).get_goal(&user, &id).await?;

    Ok(Json(GoalView::new(goal, Utc::now())))
}

pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateGoalRequest>, JsonRejection>,
) -> Result<Json<GoalView>, AppError> {
    let request = json_body(payload)?;

    let goal = GoalService::new(&state).update_goal(&user, &id, request).await?;

    Ok(Json(GoalView::new(goal, Utc::now())))
}

pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    GoalService::new(&state).delete_goal(&user, &id).await?;

    Ok(Json(json!({ "message": "Goal deleted successfully" })))
}
