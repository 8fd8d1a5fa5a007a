//! Document Renderer: synthetic invoices and contracts drawn onto PDF pages.

pub mod canvas;
pub mod content;
pub mod model;
pub mod renderer;

use thiserror::Error;

pub use content::{ContentSource, FakeContent};
pub use model::{DocType, DocumentSpec, LineItem, PageBody, PageContent};
pub use renderer::{render, render_to_file};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("page count must be at least 1, got {0}")]
    InvalidPageCount(u32),

    #[error("document has no pages")]
    EmptyDocument,

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
