pub mod health;

use axum::{routing::get, routing::post, Router};

use crate::review::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Review API
        .route("/api/v1/review", post(handlers::handle_review))
        .route("/api/v1/review/extract", post(handlers::handle_extract))
        .route("/api/v1/review/download", post(handlers::handle_download))
        .with_state(state)
}
