//! Batch Generator: produces `count` documents of one type and packages them
//! as a single file, one file per document, or a zip bundle.

pub mod archive;
pub mod handlers;
pub mod planner;
pub mod workspace;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::documents::{render_to_file, ContentSource, DocType, RenderError};

pub const MIN_COUNT: i64 = 1;
pub const MAX_COUNT: i64 = 500;
pub const MIN_PAGES: i64 = 1;
pub const MAX_PAGES: i64 = 1000;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid file name '{0}'")]
    InvalidFileName(String),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("archive failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// One file holding `pages` pages.
    Single,
    /// One file per document; zipped unless there is exactly one.
    Separate,
    /// One file per document, always zipped.
    Zip,
}

impl FromStr for OutputMode {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(OutputMode::Single),
            "separate" => Ok(OutputMode::Separate),
            "zip" => Ok(OutputMode::Zip),
            other => Err(BatchError::Validation(format!(
                "invalid mode '{other}': expected single, separate or zip"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaType {
    #[serde(rename = "application/pdf")]
    Pdf,
    #[serde(rename = "application/zip")]
    Zip,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::Zip => "application/zip",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated generation request. Construct through [`BatchRequest::new`]
/// so out-of-range values never reach the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub doc_type: DocType,
    pub count: u32,
    pub pages_per_doc: u32,
    pub mode: OutputMode,
    /// Base name only; directory components are stripped on validation.
    pub filename: Option<String>,
}

impl BatchRequest {
    pub fn new(
        doc_type: DocType,
        count: i64,
        pages: i64,
        mode: &str,
        filename: Option<&str>,
    ) -> Result<Self, BatchError> {
        if !(MIN_COUNT..=MAX_COUNT).contains(&count) {
            return Err(BatchError::Validation(format!(
                "count must be between {MIN_COUNT} and {MAX_COUNT}"
            )));
        }
        if !(MIN_PAGES..=MAX_PAGES).contains(&pages) {
            return Err(BatchError::Validation(format!(
                "pages must be between {MIN_PAGES} and {MAX_PAGES}"
            )));
        }
        let mode = mode.parse()?;
        let filename = filename.map(sanitize_file_name).transpose()?;

        Ok(Self {
            doc_type,
            count: count as u32,
            pages_per_doc: pages as u32,
            mode,
            filename,
        })
    }
}

/// The file handed back to the caller.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub file_name: String,
    pub media_type: MediaType,
    /// Every rendered document file, in generation order.
    pub documents: Vec<PathBuf>,
}

// ────────────────────────────────────────────────────────────────────────────
// Naming
// ────────────────────────────────────────────────────────────────────────────

/// `invoice_007.pdf` for the 7th invoice (1-based).
pub fn document_file_name(doc_type: DocType, index: u32) -> String {
    format!("{}_{index:03}.pdf", doc_type.singular())
}

/// `contracts_20x5pages.zip`.
pub fn archive_file_name(doc_type: DocType, count: u32, pages: u32) -> String {
    format!("{doc_type}_{count}x{pages}pages.zip")
}

/// Default name for single mode: `invoices_single_50pages.pdf`.
pub fn single_file_name(doc_type: DocType, pages: u32) -> String {
    format!("{doc_type}_single_{pages}pages.pdf")
}

/// Type-named subdirectory used by batch jobs: `{root}/invoices`.
pub fn type_dir(root: &Path, doc_type: DocType) -> PathBuf {
    root.join(doc_type.as_str())
}

fn sanitize_file_name(raw: &str) -> Result<String, BatchError> {
    Path::new(raw.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && !n.chars().any(|c| c.is_control() || c == '"'))
        .map(str::to_string)
        .ok_or_else(|| BatchError::InvalidFileName(raw.to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

/// Renders `count` numbered documents into `dir`. `pages_for` picks each
/// document's page count; `on_rendered` is called after each file is written.
pub fn render_document_set<S, P, F>(
    doc_type: DocType,
    count: u32,
    dir: &Path,
    source: &mut S,
    mut pages_for: P,
    mut on_rendered: F,
) -> Result<Vec<PathBuf>, BatchError>
where
    S: ContentSource + ?Sized,
    P: FnMut(&mut S) -> u32,
    F: FnMut(&Path),
{
    let mut files = Vec::with_capacity(count as usize);
    for index in 1..=count {
        let path = dir.join(document_file_name(doc_type, index));
        let pages = pages_for(source);
        render_to_file(doc_type, pages, source, &path)?;
        on_rendered(&path);
        files.push(path);
    }
    Ok(files)
}

/// Runs a validated request, writing every file under `out_dir`.
pub fn generate_batch<S: ContentSource + ?Sized>(
    request: &BatchRequest,
    out_dir: &Path,
    source: &mut S,
) -> Result<Artifact, BatchError> {
    let BatchRequest {
        doc_type,
        count,
        pages_per_doc: pages,
        mode,
        ..
    } = *request;

    if mode == OutputMode::Single {
        let file_name = request
            .filename
            .clone()
            .unwrap_or_else(|| single_file_name(doc_type, pages));
        let path = out_dir.join(&file_name);
        render_to_file(doc_type, pages, source, &path)?;
        info!("Rendered single {doc_type} file {file_name} ({pages} pages)");
        return Ok(Artifact {
            documents: vec![path.clone()],
            path,
            file_name,
            media_type: MediaType::Pdf,
        });
    }

    let documents = render_document_set(doc_type, count, out_dir, source, |_| pages, |_| {})?;
    info!("Rendered {count} {doc_type} files ({pages} pages each)");

    if mode == OutputMode::Separate && count == 1 {
        return Ok(Artifact {
            path: documents[0].clone(),
            file_name: document_file_name(doc_type, 1),
            media_type: MediaType::Pdf,
            documents,
        });
    }

    let file_name = archive_file_name(doc_type, count, pages);
    let path = out_dir.join(&file_name);
    archive::write_zip(&path, &documents)?;
    info!("Packed {count} files into {file_name}");

    Ok(Artifact {
        path,
        file_name,
        media_type: MediaType::Zip,
        documents,
    })
}
