use std::sync::Arc;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use shared_config::AppConfig;
use shared_database::{MongoGateway, Repositories};
use shared_utils::AppState;

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting FitWell API server");

    // Load configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Create shared state
    let addr = config.bind_addr;
    let state = build_state(config).await;

    // Build the application router
    let app = router::create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    info!("Listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Picks the store named by `DATABASE_URL` and wraps it with the config.
async fn build_state(config: AppConfig) -> Arc<AppState> {
    let repos = if config.uses_memory_store() {
        warn!("DATABASE_URL is {}; data lives in memory only", shared_config::MEMORY_DATABASE_URL);
        Repositories::in_memory()
    } else {
        let gateway = Arc::new(MongoGateway::new(&config));
        if let Err(e) = gateway.get_connection().await {
            warn!("MongoDB not reachable at startup, will retry on first request: {}", e);
        }
        Repositories::mongo(gateway)
    };

    Arc::new(AppState::new(config, repos))
}
