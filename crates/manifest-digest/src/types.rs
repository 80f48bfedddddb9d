//! Manifest wire types and the signed-payload bundle.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Schema version marking a legacy signed manifest.
pub const SCHEMA_VERSION_SIGNED: u64 = 1;

/// A manifest decoded just far enough to choose how it is digested.
#[derive(Debug, Clone)]
pub enum ParsedManifest {
    /// Schema 1: signatures appended to a truncated payload.
    Signed { signatures: Vec<SignatureEntry> },

    /// Anything else, digested over its raw bytes. `schema_version` is the
    /// marker when it is a non-negative integer.
    Unsigned { schema_version: Option<u64> },
}

impl ParsedManifest {
    pub fn schema_version(&self) -> Option<u64> {
        match self {
            Self::Signed { .. } => Some(SCHEMA_VERSION_SIGNED),
            Self::Unsigned { schema_version } => *schema_version,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Self::Signed { .. })
    }
}

/// One detached signature block of a schema 1 manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureEntry {
    /// Unprotected JWS header.
    pub header: SignatureHeader,

    /// Base64url signature value (not verified).
    pub signature: String,

    /// Base64url protected header carrying `formatLength` / `formatTail`.
    pub protected: String,
}

/// Unprotected signature header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureHeader {
    /// JWS algorithm (e.g. "ES256").
    pub alg: String,

    /// Certificate chain (base64 DER certificates).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<Vec<String>>,

    /// Embedded public key. Kept untyped so a malformed key surfaces as a
    /// key-encoding failure rather than a manifest shape failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwk: Option<JsonValue>,
}

/// Decoded protected header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedHeader {
    /// Byte offset in the stored manifest where the signed payload ends.
    pub format_length: u64,

    /// Base64url bytes appended after the truncation point.
    pub format_tail: String,
}

/// The signed payload of a schema 1 manifest with its normalized signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwsBundle {
    /// Exact bytes that were signed.
    pub payload: Vec<u8>,

    /// One record per signature entry, in manifest order.
    pub signatures: Vec<JwsSignature>,
}

impl JwsBundle {
    /// `sha256:` digest of the signed payload.
    pub fn digest(&self) -> String {
        crate::digest::sha256_prefixed(&self.payload)
    }
}

/// A signature entry normalized for downstream verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JwsSignature {
    pub header: JwsHeader,

    /// Base64url signature value, as stored.
    pub signature: String,

    /// Base64url protected header, as stored.
    pub protected: String,
}

/// Header of a [`JwsSignature`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JwsHeader {
    pub alg: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<Vec<String>>,

    /// Embedded key re-encoded as SPKI PEM.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwk: Option<String>,
}
