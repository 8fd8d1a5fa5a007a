//! Synthetic invoice and contract PDF generation, packaging, text extraction
//! and feedback scoring, served over HTTP (`docgen-api`) or run as a batch job
//! (`docgen-batch`).

pub mod batch;
pub mod config;
pub mod documents;
pub mod errors;
pub mod extraction;
pub mod feedback;
pub mod routes;
pub mod state;
