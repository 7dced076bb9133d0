//! Remove command.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use super::open_store;

pub fn execute(data_file: &Path, id: u64) -> Result<()> {
    let mut store = open_store(data_file);
    let title = store.get(id).map(|r| r.title.clone());

    let removed = store
        .remove(id)
        .with_context(|| format!("Failed to remove image {id}"))?;

    match (removed, title) {
        (true, Some(title)) => println!("{} {} ({})", "Removed".green(), id, title),
        _ => println!("{}", format!("No image with id {id}").yellow()),
    }
    Ok(())
}
