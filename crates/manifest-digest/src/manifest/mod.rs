//! Manifest digest computation.
//!
//! Schema 1 manifests are digested over their signed payload; every other
//! schema version is digested over the exact input bytes.
//!
//! Submodules:
//! - `wire`: base64url/JSON decoding and shape checks
//! - `payload`: signed payload reconstruction and signature agreement
//! - `jwk`: embedded key re-encoding

mod jwk;
mod payload;
mod wire;


use crate::digest::{sha256_prefixed, ContentDigest};
use crate::error::{DigestError, DigestResult};
use crate::options::DigestOptions;
use crate::types::{JwsBundle, ParsedManifest, SignatureEntry};

/// Compute the registry content digest of a manifest.
///
/// No size limits apply; use [`digest_from_manifest_str_with`] to bound input.
///
/// ```
/// use manifest_digest::digest_from_manifest_str;
///
/// let digest = digest_from_manifest_str(r#"{"schemaVersion":2,"x":1}"#).unwrap();
/// assert_eq!(
///     digest,
///     "sha256:f80e22826625b315f044258afb2794de5a455c22c46ccf769ac6f7a8bd337fd2"
/// );
/// ```
pub fn digest_from_manifest_str(text: &str) -> DigestResult<String> {
    digest_from_manifest_str_with(text, &DigestOptions::unlimited())
}

/// Compute the registry content digest of a manifest with explicit limits.
///
/// Limits are checked after parsing, so malformed JSON is always a parse error.
pub fn digest_from_manifest_str_with(text: &str, options: &DigestOptions) -> DigestResult<String> {
    let result = digest_impl(text, options);
    if let Err(e) = &result {
        tracing::debug!(error = %e, size = text.len(), "manifest digest failed");
    }
    result
}

fn digest_impl(text: &str, options: &DigestOptions) -> DigestResult<String> {
    match parse_manifest_with(text, options)? {
        ParsedManifest::Signed { signatures } => {
            tracing::debug!(
                signatures = signatures.len(),
                "digesting signed payload of schema 1 manifest"
            );
            let bundle = payload::reconstruct_payload_impl(&signatures, text.as_bytes())?;
            Ok(sha256_prefixed(&bundle.payload))
        }
        ParsedManifest::Unsigned { schema_version } => {
            tracing::debug!(?schema_version, "digesting raw manifest bytes");
            Ok(sha256_prefixed(text.as_bytes()))
        }
    }
}

/// Decode a manifest far enough to tell signed from unsigned formats.
pub fn parse_manifest(text: &str) -> DigestResult<ParsedManifest> {
    parse_manifest_with(text, &DigestOptions::unlimited())
}

/// [`parse_manifest`] with explicit limits.
pub fn parse_manifest_with(text: &str, options: &DigestOptions) -> DigestResult<ParsedManifest> {
    wire::parse_manifest_impl(text, options)
}

/// Rebuild the signed payload from a schema 1 signature list and the raw
/// manifest bytes, checking that all signatures agree on how to do so.
///
/// Signatures are normalized for downstream verification but are not
/// verified here.
pub fn reconstruct_payload(signatures: &[SignatureEntry], raw: &[u8]) -> DigestResult<JwsBundle> {
    payload::reconstruct_payload_impl(signatures, raw)
}

/// Signed payload and normalized signatures of a schema 1 manifest.
pub fn jws_from_manifest_str(text: &str) -> DigestResult<JwsBundle> {
    match parse_manifest(text)? {
        ParsedManifest::Signed { signatures } => {
            payload::reconstruct_payload_impl(&signatures, text.as_bytes())
        }
        ParsedManifest::Unsigned { .. } => Err(DigestError::invalid_content(
            "manifest is not a signed schema 1 manifest",
        )),
    }
}

/// Check a manifest against a digest supplied by a registry.
///
/// Returns the computed digest on success.
pub fn verify_manifest_digest(text: &str, expected: &str) -> DigestResult<ContentDigest> {
    let expected = ContentDigest::parse(expected)?;
    let actual = ContentDigest::parse(&digest_from_manifest_str(text)?)?;

    if actual != expected {
        tracing::warn!(
            expected = %expected,
            actual = %actual,
            "manifest digest mismatch"
        );
        return Err(DigestError::DigestMismatch {
            expected: expected.into_string(),
            actual: actual.into_string(),
        });
    }
    Ok(actual)
}
