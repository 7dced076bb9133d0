//! Ingestion pipeline: validate, check for duplicates, extract the dominant
//! color, then store.
//!
//! The duplicate check always runs before the extractor is called. A URL
//! that is already being ingested by another submission counts as a
//! duplicate, and the store is checked again under its write lock before
//! appending, so two concurrent submissions of one URL never both succeed.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use tracing::{info, instrument, warn};

use crate::error::{ExtractError, Result, StoreError};
use crate::extractor::ColorExtractor;
use crate::record::{url_key, ImageRecord, NewImage};
use crate::store::ImageStore;
use crate::validation::{validate_title, validate_url};

/// Default bound on a single color extraction.
pub const DEFAULT_EXTRACT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a submission that did not fail unexpectedly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The image was stored.
    Created(ImageRecord),
    /// The URL is already catalogued, or is being catalogued right now.
    Duplicate { url: String },
    /// The URL does not point at an image the extractor can read.
    UnsupportedImage { url: String, reason: String },
}

/// Shared handle on the store plus the extractor used to ingest new images.
pub struct Ingestor {
    store: Arc<RwLock<ImageStore>>,
    extractor: Arc<dyn ColorExtractor>,
    in_flight: DashMap<String, ()>,
    extract_timeout: Duration,
}

impl Ingestor {
    pub fn new(store: ImageStore, extractor: Arc<dyn ColorExtractor>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            extractor,
            in_flight: DashMap::new(),
            extract_timeout: DEFAULT_EXTRACT_TIMEOUT,
        }
    }

    pub fn with_extract_timeout(mut self, timeout: Duration) -> Self {
        self.extract_timeout = timeout;
        self
    }

    pub fn store(&self) -> &Arc<RwLock<ImageStore>> {
        &self.store
    }

    /// Snapshot of all records in insertion order.
    pub async fn list(&self) -> Vec<ImageRecord> {
        self.store.read().await.list().to_vec()
    }

    /// Records whose title contains `keyword`, ignoring case.
    pub async fn search(&self, keyword: Option<&str>) -> Vec<ImageRecord> {
        self.store.read().await.search(keyword)
    }

    /// Removes a record. Unknown ids are not an error.
    pub async fn remove(&self, id: u64) -> std::result::Result<bool, StoreError> {
        let store = self.store.clone().write_owned().await;
        write_blocking(store, move |store| store.remove(id)).await
    }

    /// Runs a submission through the pipeline.
    #[instrument(level = "info", skip(self), fields(extractor = self.extractor.name()))]
    pub async fn submit(&self, title: &str, url: &str) -> Result<SubmitOutcome> {
        validate_title(title)?;
        validate_url(url)?;
        let url = url.trim();

        if self.store.read().await.exists_by_url(url) {
            info!("Image already catalogued");
            return Ok(SubmitOutcome::Duplicate { url: url.to_string() });
        }

        let Some(_claim) = self.claim(url) else {
            info!("Image is already being catalogued");
            return Ok(SubmitOutcome::Duplicate { url: url.to_string() });
        };

        let extracted = tokio::time::timeout(self.extract_timeout, self.extractor.extract(url))
            .await
            .unwrap_or(Err(ExtractError::Timeout(self.extract_timeout)));

        let dominant_color = match extracted {
            Ok(color) => color,
            Err(e) if e.is_unsupported() => {
                info!(reason = %e, "Image type not supported");
                return Ok(SubmitOutcome::UnsupportedImage {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                warn!(error = %e, "Color extraction failed");
                return Err(e.into());
            }
        };

        let store = self.store.clone().write_owned().await;
        if store.exists_by_url(url) {
            return Ok(SubmitOutcome::Duplicate { url: url.to_string() });
        }

        let image = NewImage {
            title: title.to_string(),
            url: url.to_string(),
            dominant_color,
        };
        let record = write_blocking(store, move |store| store.add(image)).await?;

        info!(id = record.id, color = %record.dominant_color, "Image catalogued");
        Ok(SubmitOutcome::Created(record))
    }

    /// Marks `url` as in flight. Returns `None` if it already is.
    fn claim(&self, url: &str) -> Option<InFlightClaim<'_>> {
        match self.in_flight.entry(url_key(url)) {
            Entry::Occupied(_) => None,
            Entry::Vacant(entry) => {
                let key = entry.key().clone();
                entry.insert(());
                Some(InFlightClaim {
                    in_flight: &self.in_flight,
                    key,
                })
            }
        }
    }
}

/// Runs a store mutation, which writes the blob synchronously, on the
/// blocking pool. The write lock is held until the mutation returns.
async fn write_blocking<T, F>(
    mut store: OwnedRwLockWriteGuard<ImageStore>,
    mutate: F,
) -> std::result::Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&mut ImageStore) -> std::result::Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || mutate(&mut *store))
        .await
        .map_err(|e| {
            StoreError::from(std::io::Error::other(format!(
                "store write task failed: {e}"
            )))
        })?
}

impl std::fmt::Debug for Ingestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ingestor")
            .field("extractor", &self.extractor.name())
            .field("in_flight", &self.in_flight.len())
            .field("extract_timeout", &self.extract_timeout)
            .finish()
    }
}

/// Releases the in-flight marker when the submission finishes, however it
/// finishes.
struct InFlightClaim<'a> {
    in_flight: &'a DashMap<String, ()>,
    key: String,
}

impl Drop for InFlightClaim<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.key);
    }
}
