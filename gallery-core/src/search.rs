//! Title search over the record collection.

use crate::record::ImageRecord;

/// Returns the records whose title contains `keyword`, ignoring case.
///
/// A missing or empty keyword matches everything. Any other keyword,
/// whitespace included, is compared literally as a substring.
pub fn filter(records: &[ImageRecord], keyword: Option<&str>) -> Vec<ImageRecord> {
    let needle = match keyword {
        Some(k) if !k.is_empty() => k.to_lowercase(),
        _ => return records.to_vec(),
    };

    records
        .iter()
        .filter(|r| r.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
