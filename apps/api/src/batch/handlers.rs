//! Axum route handler for document generation.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::batch::workspace::Workspace;
use crate::batch::{generate_batch, BatchError, BatchRequest};
use crate::documents::DocType;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub doc_type: DocType,
    #[serde(default = "default_count")]
    pub count: i64,
    #[serde(default = "default_pages")]
    pub pages: i64,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub filename: Option<String>,
}

fn default_count() -> i64 {
    1
}

fn default_pages() -> i64 {
    50
}

fn default_mode() -> String {
    "zip".to_string()
}

/// POST /generate
///
/// Validates the request, renders the batch into a request-scoped workspace,
/// and returns the PDF or ZIP as an attachment. The workspace is released once
/// the artifact has been read into the response body.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Response, AppError> {
    let request = BatchRequest::new(
        req.doc_type,
        req.count,
        req.pages,
        &req.mode,
        req.filename.as_deref(),
    )?;
    info!(
        "Generate request: {} x{} ({} pages, {:?})",
        request.doc_type, request.count, request.pages_per_doc, request.mode
    );

    let scratch_root = state.config.scratch_dir.clone();
    let mut source = state.content_source();

    // Rendering and zipping are CPU and disk bound; keep them off the async executor.
    let (file_name, media_type, body) =
        tokio::task::spawn_blocking(move || -> Result<_, BatchError> {
            let workspace = Workspace::acquire(scratch_root.as_deref())?;
            let artifact = generate_batch(&request, workspace.path(), &mut source)?;
            let body = std::fs::read(&artifact.path)?;
            if let Err(e) = workspace.release() {
                warn!("Failed to remove scratch workspace: {e}");
            }
            Ok((artifact.file_name, artifact.media_type, body))
        })
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in generation: {e}"))
        })??;

    info!("Returning {file_name} ({media_type}, {} bytes)", body.len());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, media_type.as_str().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}
