//! Image Store: the record collection and its persistence.
//!
//! The collection lives in memory and is written wholesale to a
//! [`BlobStore`] after every mutation. Loading never fails: a missing or
//! corrupt blob yields an empty store.
//!
//! Ids are never reused. The next id is persisted alongside the blob, so a
//! deleted record's id stays retired after a reload.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::blob::BlobStore;
use crate::error::StoreError;
use crate::record::{ImageRecord, NewImage};
use crate::search;

/// Id given to the first record of an empty store.
const FIRST_ID: u64 = 1;

pub struct ImageStore {
    blob: Arc<dyn BlobStore>,
    records: Vec<ImageRecord>,
    next_id: u64,
}

impl ImageStore {
    /// Creates an empty store without reading the blob.
    pub fn empty(blob: Arc<dyn BlobStore>) -> Self {
        Self {
            blob,
            records: Vec::new(),
            next_id: FIRST_ID,
        }
    }

    /// Loads the persisted collection.
    pub fn load(blob: Arc<dyn BlobStore>) -> Self {
        let location = blob.describe();
        let records = match blob.read() {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<ImageRecord>>(&bytes) {
                Ok(records) => {
                    info!(path = %location, count = records.len(), "Loaded image store");
                    records
                }
                Err(e) => {
                    warn!(path = %location, error = %e, "Image blob is corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => {
                info!(path = %location, "No image blob found, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %location, error = %e, "Failed to read image blob, starting empty");
                Vec::new()
            }
        };

        let after_highest = records
            .iter()
            .map(|r| r.id)
            .max()
            .map_or(FIRST_ID, |max| max + 1);
        let persisted = match blob.read_next_id() {
            Ok(next_id) => next_id,
            Err(e) => {
                warn!(path = %location, error = %e, "Failed to read next id, deriving it from records");
                None
            }
        };
        let next_id = persisted.map_or(after_highest, |n| n.max(after_highest));

        Self {
            blob,
            records,
            next_id,
        }
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&ImageRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Case-insensitive URL lookup.
    pub fn exists_by_url(&self, url: &str) -> bool {
        self.records.iter().any(|r| r.has_url(url))
    }

    /// Records whose title contains `keyword`; see [`search::filter`].
    pub fn search(&self, keyword: Option<&str>) -> Vec<ImageRecord> {
        search::filter(&self.records, keyword)
    }

    /// Assigns the next id, appends the record and persists.
    ///
    /// The advanced id counter is written before the records. If either
    /// write fails the append is undone and the id is not handed out again.
    pub fn add(&mut self, image: NewImage) -> Result<ImageRecord, StoreError> {
        let id = self.next_id;
        self.next_id += 1;

        self.blob.write_next_id(self.next_id).map_err(|e| {
            warn!(path = %self.blob.describe(), error = %e, "Failed to persist next id");
            StoreError::from(e)
        })?;

        let record = image.into_record(id);
        self.records.push(record.clone());

        if let Err(e) = self.persist() {
            self.records.pop();
            return Err(e);
        }

        debug!(id, url = %record.url, "Added image");
        Ok(record)
    }

    /// Removes the record with `id`. Returns `false` when no such record
    /// exists, in which case nothing is written.
    pub fn remove(&mut self, id: u64) -> Result<bool, StoreError> {
        let Some(index) = self.records.iter().position(|r| r.id == id) else {
            debug!(id, "Remove of unknown image id ignored");
            return Ok(false);
        };

        let removed = self.records.remove(index);
        if let Err(e) = self.persist() {
            self.records.insert(index, removed);
            return Err(e);
        }

        debug!(id, "Removed image");
        Ok(true)
    }

    fn persist(&self) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&self.records)?;
        self.blob.write(&bytes).map_err(|e| {
            warn!(path = %self.blob.describe(), error = %e, "Failed to persist image store");
            StoreError::from(e)
        })
    }
}

impl std::fmt::Debug for ImageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStore")
            .field("blob", &self.blob.describe())
            .field("records", &self.records.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
