//! Wire-level decoding and manifest shape checks.
//!
//! No payload reconstruction and no key handling happen here.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde_json::Value as JsonValue;

use crate::error::{DigestError, DigestResult};
use crate::options::DigestOptions;
use crate::types::{ParsedManifest, ProtectedHeader, SignatureEntry, SCHEMA_VERSION_SIGNED};

/// JOSE base64url: padding optional, non-canonical trailing bits tolerated.
pub(crate) const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub(crate) fn decode_base64url(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    BASE64URL.decode(input)
}

pub(crate) fn parse_manifest_impl(
    text: &str,
    options: &DigestOptions,
) -> DigestResult<ParsedManifest> {
    let value: JsonValue =
        serde_json::from_str(text).map_err(|e| DigestError::parse(e.to_string()))?;

    if text.len() > options.max_manifest_size {
        return Err(DigestError::TooLarge {
            size: text.len(),
            limit: options.max_manifest_size,
        });
    }

    // Only an object whose marker is numerically 1 is signed; everything else
    // (other versions, missing or non-numeric markers, non-objects) is raw.
    let JsonValue::Object(mut object) = value else {
        return Ok(ParsedManifest::Unsigned {
            schema_version: None,
        });
    };
    if !is_signed_marker(object.get("schemaVersion")) {
        return Ok(ParsedManifest::Unsigned {
            schema_version: object.get("schemaVersion").and_then(JsonValue::as_u64),
        });
    }

    let signatures = match object.remove("signatures") {
        Some(JsonValue::Array(entries)) => entries,
        Some(_) => {
            return Err(DigestError::invalid_content(
                "signatures is not an array",
            ))
        }
        None => {
            return Err(DigestError::invalid_content(
                "signed manifest has no signatures",
            ))
        }
    };

    if signatures.len() > options.max_signatures {
        return Err(DigestError::invalid_content(format!(
            "{} signatures exceeds limit {}",
            signatures.len(),
            options.max_signatures
        )));
    }

    let signatures = signatures
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value::<SignatureEntry>(entry).map_err(|e| {
                DigestError::invalid_content(format!("signature {}: {}", index, e))
            })
        })
        .collect::<DigestResult<Vec<_>>>()?;

    Ok(ParsedManifest::Signed { signatures })
}

/// `1` and `1.0` both mark a signed manifest.
fn is_signed_marker(marker: Option<&JsonValue>) -> bool {
    match marker {
        Some(JsonValue::Number(n)) => {
            n.as_u64() == Some(SCHEMA_VERSION_SIGNED)
                || n.as_f64() == Some(SCHEMA_VERSION_SIGNED as f64)
        }
        _ => false,
    }
}

pub(crate) fn decode_protected_header_impl(
    index: usize,
    encoded: &str,
) -> DigestResult<ProtectedHeader> {
    let bytes = decode_base64url(encoded).map_err(|e| {
        DigestError::invalid_content(format!(
            "signature {}: invalid base64url protected header: {}",
            index, e
        ))
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        DigestError::invalid_content(format!(
            "signature {}: invalid protected header: {}",
            index, e
        ))
    })
}

pub(crate) fn decode_format_tail_impl(index: usize, format_tail: &str) -> DigestResult<Vec<u8>> {
    if format_tail.is_empty() {
        return Err(DigestError::invalid_content(format!(
            "signature {}: empty formatTail",
            index
        )));
    }

    decode_base64url(format_tail).map_err(|e| {
        DigestError::invalid_content(format!(
            "signature {}: invalid base64url formatTail: {}",
            index, e
        ))
    })
}
