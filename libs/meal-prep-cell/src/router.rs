use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn meal_prep_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::create_meal_prep).get(handlers::list_meal_preps))
        .route(
            "/{id}",
            get(handlers::get_meal_prep)
                .put(handlers::update_meal_prep)
                .delete(handlers::delete_meal_prep),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
