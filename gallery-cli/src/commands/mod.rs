//! Subcommand implementations.

pub mod add;
pub mod list;
pub mod remove;

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use gallery_core::{FileBlobStore, ImageRecord, ImageStore};

/// Opens the store backed by the JSON file at `path`.
pub fn open_store(path: &Path) -> ImageStore {
    ImageStore::load(Arc::new(FileBlobStore::new(path)))
}

/// One line per record: id, color swatch, title, color, url.
pub fn print_record(record: &ImageRecord) {
    let color = record.dominant_color;
    println!(
        "{:>4}  {}  {:<30}  {:<18}  {}",
        record.id.to_string().bold(),
        "  ".on_truecolor(color.r, color.g, color.b),
        record.title,
        color.to_string(),
        record.url.dimmed()
    );
}
