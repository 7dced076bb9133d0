//! Error handling module
//!
//! Unexpected failures all end up here and get the same generic apology page;
//! the details only go to the log.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use gallery_core::{IngestError, StoreError};
use thiserror::Error;

use crate::views;

/// Application error type with structured variants for different error categories
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request - client provided invalid input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Not found - requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Error from the ingestion pipeline
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Failure persisting the image store
    #[error("Persistence error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Ingest(IngestError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_)
            | Self::Ingest(IngestError::Extraction(_) | IngestError::Persistence(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error code for log correlation
    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Store(_) => "PERSISTENCE_ERROR",
            Self::Ingest(e) => match e {
                IngestError::Validation(_) => "VALIDATION_ERROR",
                IngestError::Extraction(_) => "EXTRACTION_ERROR",
                IngestError::Persistence(_) => "PERSISTENCE_ERROR",
            },
        }
    }

    /// Message safe to show to the client, or `None` for the apology page
    fn client_message(&self) -> Option<String> {
        match self {
            Self::BadRequest(message) | Self::NotFound(message) => Some(message.clone()),
            Self::Ingest(IngestError::Validation(e)) => Some(format!("Invalid submission: {e}")),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let internal_message = self.to_string();

        // Log based on severity, always including internal details
        if status.is_server_error() {
            tracing::error!(
                status = %status,
                code = code,
                error = %internal_message,
                "Server error"
            );
        } else {
            tracing::warn!(
                status = %status,
                code = code,
                error = %internal_message,
                "Client error"
            );
        }

        match self.client_message() {
            Some(message) => (status, message).into_response(),
            None => (status, Html(views::apology_page())).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::{ExtractError, ValidationError};

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::from(IngestError::Validation(ValidationError::EmptyTitle)).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(IngestError::Extraction(ExtractError::Http(500))).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(StoreError::Io(std::io::Error::other("disk full"))).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::from(IngestError::Extraction(ExtractError::Network(
            "connection reset by 10.0.0.7".into(),
        )));
        assert!(err.client_message().is_none());
    }

    #[test]
    fn test_validation_message_is_shown() {
        let err = AppError::from(IngestError::Validation(ValidationError::EmptyTitle));
        assert_eq!(
            err.client_message().as_deref(),
            Some("Invalid submission: title is required")
        );
    }
}
