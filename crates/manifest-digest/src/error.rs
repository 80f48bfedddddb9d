//! Error types for manifest digest computation.

/// Manifest digest errors.
///
/// Every failure of the public API is a `DigestError`. Callers that only care
/// about the broad class of failure should match on [`DigestError::kind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DigestError {
    /// The manifest is not valid JSON.
    #[error("could not parse manifest: {message}")]
    Parse { message: String },

    /// The manifest parses but breaks the manifest contract.
    #[error("invalid manifest content: {reason}")]
    InvalidContent { reason: String },

    /// The manifest exceeds a configured limit.
    #[error("manifest too large: {size} exceeds limit {limit}")]
    TooLarge { size: usize, limit: usize },

    /// A caller-supplied digest string is malformed.
    #[error("invalid digest {digest:?}: {reason}")]
    InvalidDigest { digest: String, reason: String },

    /// Computed digest differs from the expected one.
    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },
}

/// Broad failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input is not structured data.
    Parse,
    /// Input is structured data but cannot be assigned a digest.
    InvalidContent,
    /// Input was digested but did not match what the caller expected.
    Mismatch,
}

impl DigestError {
    /// Failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse { .. } => ErrorKind::Parse,
            Self::InvalidContent { .. } => ErrorKind::InvalidContent,
            Self::TooLarge { .. } => ErrorKind::InvalidContent,
            Self::InvalidDigest { .. } => ErrorKind::InvalidContent,
            Self::DigestMismatch { .. } => ErrorKind::Mismatch,
        }
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_content(reason: impl Into<String>) -> Self {
        Self::InvalidContent {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_digest(digest: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDigest {
            digest: digest.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for digest operations.
pub type DigestResult<T> = Result<T, DigestError>;
