use crate::config::Config;
use crate::documents::FakeContent;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fresh content source for one request. Seeded when `CONTENT_SEED` is set,
    /// so every request with the same parameters renders identical documents.
    pub fn content_source(&self) -> FakeContent {
        FakeContent::from_seed_option(self.config.content_seed)
    }
}
