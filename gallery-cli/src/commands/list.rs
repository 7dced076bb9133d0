//! List and search commands.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use tracing::debug;

use super::{open_store, print_record};

/// Prints the records matching `keyword`, or every record when `None`.
pub fn execute(data_file: &Path, keyword: Option<&str>) -> Result<()> {
    let store = open_store(data_file);
    let images = store.search(keyword);
    debug!(keyword = ?keyword, matches = images.len(), total = store.len(), "Listing images");

    if images.is_empty() {
        match keyword {
            Some(k) if !k.is_empty() => {
                println!("{}", format!("No images match \"{k}\"").yellow())
            }
            _ => println!("{}", "No images yet".yellow()),
        }
        return Ok(());
    }

    for image in &images {
        print_record(image);
    }
    Ok(())
}
