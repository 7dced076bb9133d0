//! Exit codes following sysexits.h conventions.
//!
//! These codes provide semantic meaning for different failure modes,
//! enabling scripts to handle errors appropriately.

use gallery_core::{IngestError, StoreError};

/// Successful execution.
pub const SUCCESS: u8 = 0;

/// General error (catch-all).
pub const GENERAL_ERROR: u8 = 1;

/// Command line usage error (invalid title or URL).
/// Maps to EX_USAGE from sysexits.h.
pub const USAGE_ERROR: u8 = 64;

/// Service unavailable (image host unreachable, extraction failed).
/// Maps to EX_UNAVAILABLE from sysexits.h.
pub const NETWORK_ERROR: u8 = 69;

/// I/O error (cannot write the image blob).
/// Maps to EX_IOERR from sysexits.h.
pub const IO_ERROR: u8 = 74;

/// Picks the exit code for an error by inspecting its chain.
pub fn classify(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(ingest) = cause.downcast_ref::<IngestError>() {
            return match ingest {
                IngestError::Validation(_) => USAGE_ERROR,
                IngestError::Extraction(_) => NETWORK_ERROR,
                IngestError::Persistence(_) => IO_ERROR,
            };
        }
        if cause.is::<StoreError>() || cause.is::<std::io::Error>() {
            return IO_ERROR;
        }
    }
    GENERAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use gallery_core::{ExtractError, ValidationError};

    #[test]
    fn test_classify_ingest_errors() {
        let validation = anyhow::Error::new(IngestError::Validation(ValidationError::EmptyTitle));
        assert_eq!(classify(&validation), USAGE_ERROR);

        let extraction = anyhow::Error::new(IngestError::Extraction(ExtractError::Http(503)));
        assert_eq!(classify(&extraction), NETWORK_ERROR);
    }

    #[test]
    fn test_classify_through_context() {
        let err: anyhow::Result<()> = Err(StoreError::Io(std::io::Error::other("disk full")).into());
        let err = err.context("Failed to remove image").unwrap_err();
        assert_eq!(classify(&err), IO_ERROR);
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(classify(&anyhow::anyhow!("something else")), GENERAL_ERROR);
    }
}
