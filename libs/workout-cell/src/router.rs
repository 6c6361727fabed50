use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn workout_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::create_workout).get(handlers::list_workouts))
        .route(
            "/{id}",
            get(handlers::get_workout)
                .put(handlers::update_workout)
                .delete(handlers::delete_workout),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
