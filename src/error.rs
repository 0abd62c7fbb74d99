use thiserror::Error;

/// Classifies rule source failures for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// No source configured, or the source is deliberately empty
    NotConfigured,
    /// File open/read failure
    FileError,
    /// Download or verification failure
    DownloadFailed,
    /// Rule text was fetched but holds no usable rules
    InvalidData,
    /// The fetch task was cancelled or panicked
    Interrupted,
}

/// URL slicer error types
#[derive(Error, Debug)]
pub enum SlicerError {
    #[error("Rule source unavailable: {message}")]
    RuleSourceUnavailable {
        kind: SourceErrorKind,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SlicerError {
    pub(crate) fn unavailable(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        SlicerError::RuleSourceUnavailable {
            kind,
            message: message.into(),
        }
    }

    /// Source error kind, if this error came from the rule source
    pub fn source_kind(&self) -> Option<SourceErrorKind> {
        match self {
            SlicerError::RuleSourceUnavailable { kind, .. } => Some(*kind),
            SlicerError::IoError(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SlicerError>;
