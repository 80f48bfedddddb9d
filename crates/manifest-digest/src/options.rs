//! Digest computation options.

use serde::{Deserialize, Serialize};

/// Default maximum manifest size (4 MiB, the manifest limit registries enforce).
pub const DEFAULT_MAX_MANIFEST_SIZE: usize = 4 * 1_024 * 1_024;

/// Default maximum number of signatures on a legacy manifest.
pub const DEFAULT_MAX_SIGNATURES: usize = 64;

/// Limits applied once the manifest has parsed.
///
/// The plain digest functions run with [`DigestOptions::unlimited`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestOptions {
    /// Maximum manifest size in bytes.
    #[serde(default = "default_max_manifest_size")]
    pub max_manifest_size: usize,

    /// Maximum number of signature entries on a legacy manifest.
    #[serde(default = "default_max_signatures")]
    pub max_signatures: usize,
}

fn default_max_manifest_size() -> usize {
    DEFAULT_MAX_MANIFEST_SIZE
}

fn default_max_signatures() -> usize {
    DEFAULT_MAX_SIGNATURES
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self {
            max_manifest_size: default_max_manifest_size(),
            max_signatures: default_max_signatures(),
        }
    }
}

impl DigestOptions {
    /// No limits.
    pub fn unlimited() -> Self {
        Self {
            max_manifest_size: usize::MAX,
            max_signatures: usize::MAX,
        }
    }

    /// Set the maximum manifest size.
    pub fn with_max_manifest_size(mut self, size: usize) -> Self {
        self.max_manifest_size = size;
        self
    }

    /// Set the maximum number of signatures.
    pub fn with_max_signatures(mut self, count: usize) -> Self {
        self.max_signatures = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_config() {
        let opts: DigestOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, DigestOptions::default());
    }

    #[test]
    fn test_partial_config() {
        let opts: DigestOptions = serde_json::from_str(r#"{"max_signatures": 2}"#).unwrap();
        assert_eq!(opts.max_signatures, 2);
        assert_eq!(opts.max_manifest_size, DEFAULT_MAX_MANIFEST_SIZE);
    }

    #[test]
    fn test_unlimited() {
        let opts = DigestOptions::unlimited();
        assert_eq!(opts.max_manifest_size, usize::MAX);
        assert_eq!(opts.max_signatures, usize::MAX);
        assert_ne!(opts, DigestOptions::default());
    }

    #[test]
    fn test_builders() {
        let opts = DigestOptions::default()
            .with_max_manifest_size(10)
            .with_max_signatures(1);
        assert_eq!(opts.max_manifest_size, 10);
        assert_eq!(opts.max_signatures, 1);
    }
}
