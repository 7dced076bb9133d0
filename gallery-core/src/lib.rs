//! Gallery Core - image cataloguing library
//!
//! This crate holds everything behind the gallery's web and command-line
//! front ends:
//!
//! - [`ImageRecord`] and its [`DominantColor`]
//! - [`ColorExtractor`] implementations that compute the dominant color of
//!   an image URL
//! - [`ImageStore`], an in-memory collection persisted wholesale to a
//!   [`BlobStore`] after every mutation
//! - [`Ingestor`], the submission pipeline (validation, duplicate check,
//!   extraction, persistence)
//! - [`search::filter`], case-insensitive title search
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gallery_core::{
//!     DominantColor, ImageStore, Ingestor, MemoryBlobStore, MockColorExtractor, SubmitOutcome,
//! };
//!
//! # async fn example() -> gallery_core::Result<()> {
//! let store = ImageStore::load(Arc::new(MemoryBlobStore::new()));
//! let extractor = Arc::new(MockColorExtractor::new(DominantColor::new(10, 20, 30)));
//! let ingestor = Ingestor::new(store, extractor);
//!
//! let outcome = ingestor.submit("My Cat", "http://x/cat.png").await?;
//! assert!(matches!(outcome, SubmitOutcome::Created(_)));
//! assert_eq!(ingestor.search(Some("cat")).await.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod blob;
pub mod error;
pub mod extractor;
pub mod ingest;
pub mod record;
pub mod search;
pub mod store;
pub mod validation;

// Re-export main types for convenience
pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use error::{ExtractError, IngestError, Result, StoreError, ValidationError};
pub use extractor::{ColorExtractor, MockColorExtractor, Quantizer};
pub use ingest::{Ingestor, SubmitOutcome, DEFAULT_EXTRACT_TIMEOUT};
pub use record::{DominantColor, ImageRecord, NewImage};
pub use store::ImageStore;
pub use validation::{validate_title, validate_url, MAX_TITLE_LEN};

#[cfg(feature = "network")]
pub use extractor::{HttpColorExtractor, HttpColorExtractorConfig};
