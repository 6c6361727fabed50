use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::meal_prep::MealPrep;
use shared_utils::extractor::json_body;
use shared_utils::AppState;

use crate::models::{MealPrepQuery, MealPrepRequest};
use crate::services::meal_prep::MealPrepService;

pub async fn create_meal_prep(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<MealPrepRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MealPrep>), AppError> {
    let request = json_body(payload)?;

    let meal_prep = MealPrepService::new(&state).create_meal_prep(&user, request).await?;

    Ok((StatusCode::CREATED, Json(meal_prep)))
}

pub async fn list_meal_preps(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<MealPrepQuery>,
) -> Result<Json<Vec<MealPrep>>, AppError> {
    let meal_preps = MealPrepService::new(&state)
        .list_meal_preps(&user, query.status.as_deref())
        .await?;

    Ok(Json(meal_preps))
}

pub async fn get_meal_prep(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MealPrep>, AppError> {
    let meal_prep = MealPrepService::new(&state).get_meal_prep(&user, &id).await?;

    Ok(Json(meal_prep))
}

pub async fn update_meal_prep(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<MealPrepRequest>, JsonRejection>,
) -> Result<Json<MealPrep>, AppError> {
    let request = json_body(payload)?;

    let meal_prep = MealPrepService::new(&state).update_meal_prep(&user, &id, request).await?;

    Ok(Json(meal_prep))
}

pub async fn delete_meal_prep(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MealPrep>, AppError> {
    let removed = MealPrepService::new(&state).delete_meal_prep(&user, &id).await?;

    Ok(Json(removed))
}
