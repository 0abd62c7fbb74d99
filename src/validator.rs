//! Structural validity checks for a sliced domain.

use crate::types::InvalidReason;

/// Maximum length of a single DNS label
pub const MAX_LABEL_LEN: usize = 63;

/// Check a domain/suffix pair against the original URL.
///
/// All conditions must hold: non-empty domain and suffix, at least one dot
/// in the URL, no whitespace in `domain.suffix`, and no label longer than
/// [`MAX_LABEL_LEN`] characters.
pub fn validate(domain: &str, suffix: &str, url: &str) -> Result<(), InvalidReason> {
    if domain.trim().is_empty() {
        return Err(InvalidReason::EmptyDomainResult);
    }
    if suffix.trim().is_empty() {
        return Err(InvalidReason::EmptySuffixResult);
    }
    if !url.contains('.') {
        return Err(InvalidReason::MalformedInput);
    }

    let hostname = format!("{}.{}", domain, suffix);
    if hostname.chars().any(char::is_whitespace) {
        return Err(InvalidReason::MalformedInput);
    }
    if hostname
        .split('.')
        .any(|label| label.chars().count() > MAX_LABEL_LEN)
    {
        return Err(InvalidReason::LabelTooLong);
    }

    Ok(())
}

pub fn valid(domain: &str, suffix: &str, url: &str) -> bool {
    validate(domain, suffix, url).is_ok()
}
