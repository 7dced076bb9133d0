//! Image records and their dominant color.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dominant color of an image as an RGB triple.
///
/// Serialized as a `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct DominantColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl DominantColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex notation, e.g. `#0a141e`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Perceived brightness in `0.0..=255.0` (ITU-R BT.601 weights).
    pub fn luma(&self) -> f32 {
        0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32
    }
}

impl From<[u8; 3]> for DominantColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<DominantColor> for [u8; 3] {
    fn from(color: DominantColor) -> Self {
        [color.r, color.g, color.b]
    }
}

impl fmt::Display for DominantColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// One catalogued image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub dominant_color: DominantColor,
}

impl ImageRecord {
    /// Case-insensitive URL comparison used for duplicate detection.
    pub fn has_url(&self, url: &str) -> bool {
        urls_match(&self.url, url)
    }
}

/// A validated submission waiting for an id from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub title: String,
    pub url: String,
    pub dominant_color: DominantColor,
}

impl NewImage {
    pub(crate) fn into_record(self, id: u64) -> ImageRecord {
        ImageRecord {
            id,
            title: self.title,
            url: self.url,
            dominant_color: self.dominant_color,
        }
    }
}

pub(crate) fn urls_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Key used to compare URLs case-insensitively.
pub(crate) fn url_key(url: &str) -> String {
    url.to_lowercase()
}
