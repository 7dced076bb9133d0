//! Application state module
//!
//! Defines shared state accessible across all request handlers.

use std::sync::Arc;

use gallery_core::Ingestor;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Image store plus the pipeline that feeds it
    pub ingestor: Arc<Ingestor>,
}

impl AppState {
    pub fn new(ingestor: Ingestor) -> Self {
        Self {
            ingestor: Arc::new(ingestor),
        }
    }
}
