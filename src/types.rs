use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Diagnostic attached to every invalid result
pub const INVALID_DOMAIN_MESSAGE: &str = "Query is not valid domain name.";

/// Why a slice was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// Empty input, no dot, embedded whitespace or undecodable punycode
    #[error("malformed input")]
    MalformedInput,
    /// No rule matched at any label count
    #[error("suffix not recognized")]
    NoMatchingSuffix,
    /// The effective suffix came out empty
    #[error("empty public suffix")]
    EmptySuffixResult,
    /// No registrable label is left of the suffix
    #[error("no registrable domain left of the public suffix")]
    EmptyDomainResult,
    /// A label is longer than 63 characters
    #[error("label exceeds 63 characters")]
    LabelTooLong,
}

/// Decomposition of a URL or hostname.
///
/// When `valid` is false, `domain`, `suffix` and `query` are `None` and
/// `subdomains` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlicedResult {
    /// Registrable label immediately left of the suffix
    pub domain: Option<String>,
    /// Effective public suffix, dot-joined
    pub suffix: Option<String>,
    /// Labels left of the domain, leftmost first
    pub subdomains: Vec<String>,
    /// Everything after the first `/`, carried through untouched
    pub query: Option<String>,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<InvalidReason>,
}

impl SlicedResult {
    /// Create an invalid result
    pub fn invalid(reason: InvalidReason) -> Self {
        Self {
            domain: None,
            suffix: None,
            subdomains: Vec::new(),
            query: None,
            valid: false,
            reason: Some(reason),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Domain joined with its suffix, e.g. `google.com`
    pub fn registrable_domain(&self) -> Option<String> {
        match (&self.domain, &self.suffix) {
            (Some(domain), Some(suffix)) => Some(format!("{}.{}", domain, suffix)),
            _ => None,
        }
    }

    /// Full host rebuilt from subdomains, domain and suffix
    pub fn host(&self) -> Option<String> {
        let registrable = self.registrable_domain()?;
        if self.subdomains.is_empty() {
            return Some(registrable);
        }
        Some(format!("{}.{}", self.subdomains.join("."), registrable))
    }

    /// Diagnostic message for invalid results
    pub fn error_message(&self) -> Option<&'static str> {
        if self.valid {
            None
        } else {
            Some(INVALID_DOMAIN_MESSAGE)
        }
    }
}
