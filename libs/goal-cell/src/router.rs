use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn goal_routes(state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::create_goal).get(handlers::list_goals))
        .route(
            "/{id}",
            get(handlers::get_goal)
                .put(handlers::update_goal)
                .patch(handlers::update_goal)
                .delete(handlers::delete_goal),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}
