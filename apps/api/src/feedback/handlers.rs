use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::feedback::{evaluate, FeedbackItem, FeedbackVerdict, DEFAULT_THRESHOLD};

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub items: Vec<FeedbackItem>,
    #[serde(default = "default_threshold")]
    pub previous_threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// POST /feedback
pub async fn handle_feedback(
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<FeedbackVerdict>, AppError> {
    let verdict = evaluate(&req.items, req.previous_threshold)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    info!(
        "Feedback on {} items: accepted={} ({:?})",
        req.items.len(),
        verdict.accepted,
        verdict.reason
    );
    Ok(Json(verdict))
}
