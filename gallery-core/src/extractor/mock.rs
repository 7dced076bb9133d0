//! Mock extractor for tests and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::ColorExtractor;
use crate::error::ExtractError;
use crate::record::{url_key, DominantColor};

/// Deterministic extractor. Returns a fixed color unless a URL has its own
/// configured answer. Counts every call.
#[derive(Debug)]
pub struct MockColorExtractor {
    default_color: DominantColor,
    responses: HashMap<String, Result<DominantColor, ExtractError>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockColorExtractor {
    pub fn new(default_color: DominantColor) -> Self {
        Self {
            default_color,
            responses: HashMap::new(),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Answers `url` (case-insensitively) with `color`.
    pub fn with_color(mut self, url: &str, color: DominantColor) -> Self {
        self.responses.insert(url_key(url), Ok(color));
        self
    }

    /// Answers `url` (case-insensitively) with `error`.
    pub fn with_error(mut self, url: &str, error: ExtractError) -> Self {
        self.responses.insert(url_key(url), Err(error));
        self
    }

    /// Sleeps before answering, to simulate a slow download.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `extract` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockColorExtractor {
    fn default() -> Self {
        Self::new(DominantColor::new(128, 128, 128))
    }
}

#[async_trait]
impl ColorExtractor for MockColorExtractor {
    async fn extract(&self, url: &str) -> Result<DominantColor, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.responses.get(&url_key(url)) {
            Some(response) => response.clone(),
            None => Ok(self.default_color),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
