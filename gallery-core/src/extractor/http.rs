//! HTTP color extractor.
//!
//! Downloads the image, sniffs its format from the leading bytes, decodes it
//! on the blocking pool and runs the median-cut quantizer.
//!
//! ## Features
//!
//! - Automatic retry with exponential backoff on transient errors
//! - Response size cap, checked against `Content-Length` and while streaming
//! - Full observability with tracing instrumentation

use std::time::{Duration, Instant};

use async_trait::async_trait;
use backoff::{future::retry_notify, ExponentialBackoff};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::{ColorExtractor, Quantizer};
use crate::error::ExtractError;
use crate::record::DominantColor;

/// Default timeout for a single download attempt.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of retry attempts.
const MAX_RETRIES: u32 = 2;

/// Default download cap (20 MB).
const DEFAULT_MAX_BYTES: usize = 20 * 1024 * 1024;

/// Initial retry interval.
const INITIAL_INTERVAL: Duration = Duration::from_millis(100);

/// Maximum retry interval.
const MAX_INTERVAL: Duration = Duration::from_secs(2);

/// Configuration for the HTTP extractor.
#[derive(Debug, Clone)]
pub struct HttpColorExtractorConfig {
    /// Timeout of a single download attempt.
    pub timeout: Duration,
    /// Maximum retry attempts for transient errors.
    pub max_retries: u32,
    /// Largest accepted response body in bytes.
    pub max_bytes: usize,
    /// Quantizer settings.
    pub quantizer: Quantizer,
}

impl Default for HttpColorExtractorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_retries: MAX_RETRIES,
            max_bytes: DEFAULT_MAX_BYTES,
            quantizer: Quantizer::default(),
        }
    }
}

/// Extractor that fetches images over HTTP(S).
pub struct HttpColorExtractor {
    client: Client,
    config: HttpColorExtractorConfig,
}

impl HttpColorExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Result<Self, ExtractError> {
        Self::with_config(HttpColorExtractorConfig::default())
    }

    /// Create an extractor with custom configuration.
    #[instrument(level = "debug", skip_all, fields(
        timeout_ms = config.timeout.as_millis() as u64,
        max_retries = config.max_retries,
        max_bytes = config.max_bytes
    ))]
    pub fn with_config(config: HttpColorExtractorConfig) -> Result<Self, ExtractError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("gallery/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                warn!(error = %e, "Failed to create HTTP client");
                ExtractError::Internal(format!("failed to create HTTP client: {e}"))
            })?;

        debug!("HTTP color extractor created");
        Ok(Self { client, config })
    }

    /// Check if an error is transient and should be retried.
    fn is_transient_error(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect()
    }

    /// Check if an HTTP status code indicates a transient error.
    fn is_transient_status(status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::TOO_MANY_REQUESTS
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT
                | StatusCode::BAD_GATEWAY
        )
    }

    fn build_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: INITIAL_INTERVAL,
            max_interval: MAX_INTERVAL,
            max_elapsed_time: Some(self.config.timeout * self.config.max_retries.max(1)),
            ..Default::default()
        }
    }

    /// One download attempt.
    async fn fetch_once(&self, url: &Url) -> Result<Vec<u8>, backoff::Error<ExtractError>> {
        let mut response = self.client.get(url.clone()).send().await.map_err(|e| {
            let err = ExtractError::Network(e.to_string());
            if Self::is_transient_error(&e) {
                warn!(error = %e, "Transient error, will retry");
                backoff::Error::transient(err)
            } else {
                backoff::Error::permanent(err)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let err = ExtractError::Http(status.as_u16());
            return if Self::is_transient_status(status) {
                warn!(status = %status, "Transient HTTP status, will retry");
                Err(backoff::Error::transient(err))
            } else {
                Err(backoff::Error::permanent(err))
            };
        }

        let max = self.config.max_bytes;
        if let Some(len) = response.content_length() {
            if len as usize > max {
                return Err(backoff::Error::permanent(ExtractError::TooLarge {
                    size: len as usize,
                    max,
                }));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| backoff::Error::transient(ExtractError::Network(e.to_string())))?
        {
            if body.len() + chunk.len() > max {
                return Err(backoff::Error::permanent(ExtractError::TooLarge {
                    size: body.len() + chunk.len(),
                    max,
                }));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}

/// Decodes `bytes` and quantizes the pixels.
fn dominant_color_of(bytes: &[u8], quantizer: Quantizer) -> Result<DominantColor, ExtractError> {
    let format = image::guess_format(bytes)
        .map_err(|_| ExtractError::UnsupportedFormat("unrecognized image data".into()))?;

    let image = image::load_from_memory_with_format(bytes, format).map_err(|e| {
        ExtractError::UnsupportedFormat(format!("cannot decode {format:?} image: {e}"))
    })?;

    quantizer.dominant_color(&image.to_rgba8())
}

#[async_trait]
impl ColorExtractor for HttpColorExtractor {
    #[instrument(level = "info", skip(self), fields(extractor = "http"))]
    async fn extract(&self, url: &str) -> Result<DominantColor, ExtractError> {
        let start = Instant::now();
        let parsed = Url::parse(url).map_err(|e| ExtractError::InvalidUrl(e.to_string()))?;

        let bytes = retry_notify(
            self.build_backoff(),
            || self.fetch_once(&parsed),
            |err: ExtractError, duration: Duration| {
                warn!(
                    error = %err,
                    retry_after_ms = duration.as_millis() as u64,
                    "Retry scheduled"
                );
            },
        )
        .await?;

        debug!(bytes = bytes.len(), "Downloaded image");

        let quantizer = self.config.quantizer;
        let result = tokio::task::spawn_blocking(move || dominant_color_of(&bytes, quantizer))
            .await
            .map_err(|e| ExtractError::Internal(format!("decoder task failed: {e}")))?;

        let latency_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(color) => info!(color = %color, latency_ms, "Extracted dominant color"),
            Err(e) => warn!(error = %e, latency_ms, "Color extraction failed"),
        }

        result
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode(image: &RgbaImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_dominant_color_of_png() {
        let image = RgbaImage::from_pixel(16, 16, Rgba([10, 20, 30, 255]));
        let bytes = encode(&image, ImageFormat::Png);
        assert_eq!(
            dominant_color_of(&bytes, Quantizer::new(1, 5)),
            Ok(DominantColor::new(10, 20, 30))
        );
    }

    #[test]
    fn test_unrecognized_bytes_are_unsupported() {
        let err = dominant_color_of(b"<html>not an image</html>", Quantizer::default())
            .unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_truncated_image_is_unsupported() {
        let image = RgbaImage::from_pixel(16, 16, Rgba([10, 20, 30, 255]));
        let mut bytes = encode(&image, ImageFormat::Png);
        bytes.truncate(24);
        let err = dominant_color_of(&bytes, Quantizer::default()).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_transient_statuses() {
        assert!(HttpColorExtractor::is_transient_status(
            StatusCode::SERVICE_UNAVAILABLE
        ));
        assert!(HttpColorExtractor::is_transient_status(
            StatusCode::TOO_MANY_REQUESTS
        ));
        assert!(!HttpColorExtractor::is_transient_status(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_invalid_url_rejected_before_request() {
        let extractor = HttpColorExtractor::new().unwrap();
        assert!(matches!(
            extractor.extract("not a url").await,
            Err(ExtractError::InvalidUrl(_))
        ));
    }
}
