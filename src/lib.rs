pub mod cache;
pub mod config;
pub mod error;
pub mod generator;
pub mod grammar;
pub mod handlers;
pub mod language;
pub mod load_balancer;
pub mod metrics;
pub mod mock;
pub mod models;
pub mod orchestrator;
pub mod pipeline;
pub mod prompt;
pub mod state;
pub mod translator;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::{AppError, Result};
pub use state::AppState;

/// Router with every endpoint, CORS and request tracing.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/generateQuestionsUsingAi", post(handlers::generate_handler))
        .route("/hello", get(handlers::hello_handler))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
