use std::sync::Arc;

use crate::config::Config;
use crate::extract::TextExtractor;
use crate::llm_client::CompletionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Both capabilities are optional trait objects: the PDF extractor and the
/// completion backend may be compiled out (see cargo features), in which
/// case handlers report EXTRACTION_UNAVAILABLE / CLIENT_UNAVAILABLE.
#[derive(Clone)]
pub struct AppState {
    /// Kept for handlers that need runtime settings; credential lookup
    /// already happened in `Config::from_env`.
    #[allow(dead_code)]
    pub config: Config,
    pub extractor: Option<Arc<dyn TextExtractor>>,
    pub llm: Option<Arc<dyn CompletionBackend>>,
}
