use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn auth_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/register/steps/{step}", post(handlers::validate_step))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout));

    let protected_routes = Router::new()
        .route("/me", get(handlers::me))
        .route("/update-profile", put(handlers::update_profile))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
