use axum::{extract::Multipart, Json};
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::{extract, ExtractOptions, ExtractionResult};

/// POST /extract
///
/// Multipart fields: `file` (required, `.pdf`), `max_pages` (0 or absent for
/// all pages), `max_words` (default 200, 0 for no truncation).
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractionResult>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;
    let mut options = ExtractOptions::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
                upload = Some((filename, data));
            }
            "max_pages" => {
                let value = read_number(field, "max_pages").await?;
                options.max_pages = value;
            }
            "max_words" => {
                if let Some(n) = read_number(field, "max_words").await? {
                    options.max_words = n;
                }
            }
            _ => {}
        }
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::Validation("A 'file' field is required".to_string()))?;
    info!("Extract request: {filename} ({} bytes)", data.len());

    let result = tokio::task::spawn_blocking(move || extract(&filename, &data, options))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}"))
        })??;

    info!(
        "Extracted {}/{} pages from {}",
        result.extracted_pages, result.num_pages, result.filename
    );
    Ok(Json(result))
}

/// Blank values count as absent.
async fn read_number(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<Option<usize>, AppError> {
    let raw = field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Could not read '{name}': {e}")))?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<usize>()
        .map(Some)
        .map_err(|_| AppError::Validation(format!("'{name}' must be a non-negative integer")))
}
