pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::batch::handlers as batch_handlers;
use crate::extraction::handlers as extraction_handlers;
use crate::feedback::handlers as feedback_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.upload_limit_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/generate", post(batch_handlers::handle_generate))
        .route("/extract", post(extraction_handlers::handle_extract))
        .route("/feedback", post(feedback_handlers::handle_feedback))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
