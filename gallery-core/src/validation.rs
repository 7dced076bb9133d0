//! Submission validation.
//!
//! Titles are 1 to 30 characters of ASCII letters, digits, underscores and
//! whitespace. URLs must be absolute `http` or `https` URLs.

use url::Url;

use crate::error::ValidationError;

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 30;

/// Validates a submitted title.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong {
            len,
            max: MAX_TITLE_LEN,
        });
    }

    match title
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace()))
    {
        Some(c) => Err(ValidationError::TitleInvalidChar(c)),
        None => Ok(()),
    }
}

/// Validates a submitted image URL.
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }

    let parsed = Url::parse(trimmed).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ValidationError::InvalidUrl(format!(
            "unsupported scheme '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_titles() {
        assert!(validate_title("My Cat").is_ok());
        assert!(validate_title("snake_case_42").is_ok());
        assert!(validate_title("a").is_ok());
        assert!(validate_title(&"x".repeat(30)).is_ok());
        assert!(validate_title("tab\tseparated").is_ok());
    }

    #[test]
    fn test_empty_title() {
        assert_eq!(validate_title(""), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_title_too_long() {
        assert_eq!(
            validate_title(&"x".repeat(31)),
            Err(ValidationError::TitleTooLong { len: 31, max: 30 })
        );
    }

    #[test]
    fn test_title_invalid_chars() {
        assert_eq!(
            validate_title("cat!"),
            Err(ValidationError::TitleInvalidChar('!'))
        );
        assert!(validate_title("<script>").is_err());
        assert!(validate_title("café").is_err());
        assert!(validate_title("a-b").is_err());
    }

    #[test]
    fn test_valid_urls() {
        assert!(validate_url("http://x/cat.png").is_ok());
        assert!(validate_url("https://example.com/a/b.jpg?size=large").is_ok());
    }

    #[test]
    fn test_invalid_urls() {
        assert_eq!(validate_url(""), Err(ValidationError::EmptyUrl));
        assert_eq!(validate_url("   "), Err(ValidationError::EmptyUrl));
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("ftp://example.com/a.png").is_err());
        assert!(validate_url("javascript:alert(1)").is_err());
    }
}
