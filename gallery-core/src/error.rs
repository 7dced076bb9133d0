use std::time::Duration;

use thiserror::Error;

/// Rejected title or URL on submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is required")]
    EmptyTitle,

    #[error("title is {len} characters long, maximum is {max}")]
    TitleTooLong { len: usize, max: usize },

    #[error("title contains {0:?}; only letters, digits, underscores and spaces are allowed")]
    TitleInvalidChar(char),

    #[error("url is required")]
    EmptyUrl,

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Failure reported by a color extractor.
///
/// [`ExtractError::UnsupportedFormat`] and [`ExtractError::EmptyImage`] are
/// user-facing conditions; every other variant is treated as an unexpected
/// failure by the ingestion pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("invalid image url: {0}")]
    InvalidUrl(String),

    #[error("image request returned status {0}")]
    Http(u16),

    #[error("image request failed: {0}")]
    Network(String),

    #[error("image is {size} bytes, maximum is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("unsupported image type: {0}")]
    UnsupportedFormat(String),

    #[error("image has no pixels")]
    EmptyImage,

    #[error("color extraction timed out after {0:?}")]
    Timeout(Duration),

    #[error("color extraction failed: {0}")]
    Internal(String),
}

impl ExtractError {
    /// Whether the failure is about the image itself rather than the service.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedFormat(_) | Self::EmptyImage)
    }
}

/// Failure writing the record collection to its blob.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to serialize images: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write image blob: {0}")]
    Io(#[from] std::io::Error),
}

/// Unexpected failure of a submission. Recoverable outcomes are reported
/// through [`crate::SubmitOutcome`] instead.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("color extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
