use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use auth_cell::router::auth_routes;
use goal_cell::router::goal_routes;
use meal_prep_cell::router::meal_prep_routes;
use shared_utils::AppState;
use workout_cell::router::workout_routes;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "FitWell API is running!" }))
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/goals", goal_routes(state.clone()))
        .nest("/api/workouts", workout_routes(state.clone()))
        .nest("/api/meal-prep", meal_prep_routes(state))
}
