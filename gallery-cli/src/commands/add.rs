//! Add command.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use gallery_core::{
    validate_title, validate_url, HttpColorExtractor, HttpColorExtractorConfig, IngestError,
    Ingestor, SubmitOutcome,
};
use tracing::info;

use super::{open_store, print_record};

/// Runs one submission through the full ingestion pipeline.
pub async fn execute(data_file: &Path, title: &str, url: &str, timeout_secs: u64) -> Result<()> {
    // Reject bad input before touching the network.
    validate_title(title).map_err(IngestError::from)?;
    validate_url(url).map_err(IngestError::from)?;

    let timeout = Duration::from_secs(timeout_secs);
    let extractor = HttpColorExtractor::with_config(HttpColorExtractorConfig {
        timeout,
        ..Default::default()
    })
    .context("Failed to create image downloader")?;

    let ingestor = Ingestor::new(open_store(data_file), Arc::new(extractor))
        .with_extract_timeout(timeout);

    info!(title, url, "Adding image");
    let outcome = ingestor
        .submit(title, url)
        .await
        .with_context(|| format!("Failed to add {url}"))?;

    match outcome {
        SubmitOutcome::Created(record) => {
            println!("{}", "Added".green());
            print_record(&record);
        }
        SubmitOutcome::Duplicate { url } => {
            println!("{}", format!("{url} is already in the gallery").yellow());
        }
        SubmitOutcome::UnsupportedImage { url, reason } => {
            println!(
                "{}",
                format!("Could not get the dominant color of {url}: {reason}").yellow()
            );
        }
    }
    Ok(())
}
