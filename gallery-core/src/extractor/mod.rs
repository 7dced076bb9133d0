//! Dominant color extraction.
//!
//! A [`ColorExtractor`] turns an image URL into a [`DominantColor`]. Two
//! implementations ship with the crate:
//!
//! - [`HttpColorExtractor`] downloads the image and runs the median-cut
//!   [`Quantizer`] over its pixels (feature `network`).
//! - [`MockColorExtractor`] returns configured answers without I/O.
//!
//! ```no_run
//! use gallery_core::extractor::{ColorExtractor, HttpColorExtractor};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = HttpColorExtractor::new()?;
//! let color = extractor.extract("https://example.com/cat.png").await?;
//! println!("dominant color: {color}");
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "network")]
mod http;
mod mock;
mod quantize;

#[cfg(feature = "network")]
pub use http::{HttpColorExtractor, HttpColorExtractorConfig};
pub use mock::MockColorExtractor;
pub use quantize::Quantizer;

use async_trait::async_trait;

use crate::error::ExtractError;
use crate::record::DominantColor;

/// Source of dominant colors for image URLs.
///
/// Implementations must be thread-safe (`Send + Sync`); the ingestion
/// pipeline shares one extractor across requests.
#[async_trait]
pub trait ColorExtractor: Send + Sync {
    /// Computes the dominant color of the image at `url`.
    ///
    /// Returns [`ExtractError::UnsupportedFormat`] when the resource is not an
    /// image this extractor can read.
    async fn extract(&self, url: &str) -> Result<DominantColor, ExtractError>;

    /// Short identifier for logs.
    fn name(&self) -> &'static str;
}
