//! `sha256:<hex>` content digests.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::error::{DigestError, DigestResult};

/// Algorithm prefix of every digest this crate produces.
pub const DIGEST_PREFIX: &str = "sha256:";

/// Length of a hex-encoded SHA-256 output.
pub const SHA256_HEX_LEN: usize = 64;

pub(crate) fn sha256_prefixed(bytes: &[u8]) -> String {
    format!("{}{}", DIGEST_PREFIX, hex::encode(Sha256::digest(bytes)))
}

/// A validated `sha256:<64 lowercase hex>` digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Digest of `bytes`.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(sha256_prefixed(bytes))
    }

    /// Parse and validate a digest string.
    ///
    /// ```
    /// use manifest_digest::ContentDigest;
    ///
    /// let d = ContentDigest::parse(
    ///     "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
    /// )
    /// .unwrap();
    /// assert_eq!(d, ContentDigest::of_bytes(b""));
    ///
    /// assert!(ContentDigest::parse("md5:abc").is_err());
    /// ```
    pub fn parse(s: &str) -> DigestResult<Self> {
        let (alg, hex_part) = s
            .split_once(':')
            .ok_or_else(|| DigestError::invalid_digest(s, "missing ':' separator"))?;

        if alg != "sha256" {
            return Err(DigestError::invalid_digest(
                s,
                format!("unsupported algorithm {:?}", alg),
            ));
        }
        if hex_part.len() != SHA256_HEX_LEN {
            return Err(DigestError::invalid_digest(
                s,
                format!("expected {} hex characters, got {}", SHA256_HEX_LEN, hex_part.len()),
            ));
        }
        if let Some(c) = hex_part
            .chars()
            .find(|c| !matches!(c, '0'..='9' | 'a'..='f'))
        {
            return Err(DigestError::invalid_digest(
                s,
                format!("non-lowercase-hex character {:?}", c),
            ));
        }

        Ok(Self(s.to_string()))
    }

    /// Hex part without the algorithm prefix.
    pub fn hex(&self) -> &str {
        &self.0[DIGEST_PREFIX.len()..]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentDigest {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ContentDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: &str = "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_sha256_prefixed_empty() {
        assert_eq!(sha256_prefixed(b""), EMPTY);
    }

    #[test]
    fn test_sha256_prefixed_shape() {
        let d = sha256_prefixed(b"\x00\x01hello\xffbinary\n");
        assert!(d.starts_with(DIGEST_PREFIX));
        assert_eq!(d.len(), DIGEST_PREFIX.len() + SHA256_HEX_LEN);
        assert!(d[DIGEST_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_parse_roundtrips_display() {
        let d: ContentDigest = EMPTY.parse().unwrap();
        assert_eq!(d.to_string(), EMPTY);
        assert_eq!(d.hex().len(), SHA256_HEX_LEN);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let upper = EMPTY.to_uppercase().replace("SHA256", "sha256");
        for bad in [
            "",
            "sha256",
            "sha512:abcd",
            "sha256:abc",
            upper.as_str(),
            "sha256:g3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        ] {
            let err = ContentDigest::parse(bad).unwrap_err();
            assert!(
                matches!(err, DigestError::InvalidDigest { .. }),
                "{bad:?} -> {err:?}"
            );
        }
    }
}
