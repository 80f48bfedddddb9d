//! JWK to SPKI PEM conversion for embedded signature keys.
//!
//! Supports EC (P-256, P-384, P-521), RSA and OKP (Ed25519) keys. The result
//! is a `-----BEGIN PUBLIC KEY-----` document.

use ed25519_dalek::VerifyingKey;
use pkcs8::{EncodePublicKey, LineEnding};
use rsa::{BigUint, RsaPublicKey};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use spki::der::asn1::BitString;
use spki::der::{Any, AnyRef, EncodePem};
use spki::{AlgorithmIdentifierOwned, ObjectIdentifier, SubjectPublicKeyInfoOwned};

use crate::error::{DigestError, DigestResult};

use super::wire::decode_base64url;

const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
const SECP521R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");

/// Uncompressed SEC1 point marker.
const SEC1_UNCOMPRESSED: u8 = 0x04;

#[derive(Debug, Deserialize)]
struct Jwk {
    kty: String,
    #[serde(default)]
    crv: Option<String>,
    #[serde(default)]
    x: Option<String>,
    #[serde(default)]
    y: Option<String>,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum JwkError {
    #[error("malformed jwk: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("missing jwk member {0:?}")]
    Missing(&'static str),

    #[error("jwk member {member:?} is not base64url: {source}")]
    Encoding {
        member: &'static str,
        source: base64::DecodeError,
    },

    #[error("unsupported key type {0:?}")]
    UnsupportedKeyType(String),

    #[error("unsupported curve {0:?}")]
    UnsupportedCurve(String),

    #[error("coordinate {member:?} is {len} bytes, curve needs at most {max}")]
    Coordinate {
        member: &'static str,
        len: usize,
        max: usize,
    },

    #[error("invalid key: {0}")]
    Key(String),
}

/// Convert an embedded JWK to SPKI PEM.
///
/// Failures collapse to a generic invalid-content error; the underlying
/// reason is only logged.
pub(crate) fn jwk_to_pem_impl(index: usize, jwk: &JsonValue) -> DigestResult<String> {
    encode_jwk(jwk).map_err(|e| {
        tracing::debug!(signature = index, error = %e, "jwk conversion failed");
        DigestError::invalid_content(format!("signature {}: invalid jwk in signature header", index))
    })
}

fn encode_jwk(value: &JsonValue) -> Result<String, JwkError> {
    let jwk = Jwk::deserialize(value)?;
    match jwk.kty.as_str() {
        "EC" => ec_to_pem(&jwk),
        "RSA" => rsa_to_pem(&jwk),
        "OKP" => okp_to_pem(&jwk),
        other => Err(JwkError::UnsupportedKeyType(other.to_string())),
    }
}

fn member(value: &Option<String>, name: &'static str) -> Result<Vec<u8>, JwkError> {
    let encoded = value.as_deref().ok_or(JwkError::Missing(name))?;
    decode_base64url(encoded).map_err(|source| JwkError::Encoding {
        member: name,
        source,
    })
}

/// Left-pad a big-endian coordinate to the curve's field size.
fn coordinate(value: &Option<String>, name: &'static str, size: usize) -> Result<Vec<u8>, JwkError> {
    let raw = member(value, name)?;
    if raw.is_empty() || raw.len() > size {
        return Err(JwkError::Coordinate {
            member: name,
            len: raw.len(),
            max: size,
        });
    }
    let mut padded = vec![0_u8; size - raw.len()];
    padded.extend_from_slice(&raw);
    Ok(padded)
}

fn ec_to_pem(jwk: &Jwk) -> Result<String, JwkError> {
    let crv = jwk.crv.as_deref().ok_or(JwkError::Missing("crv"))?;
    let (curve, size) = match crv {
        "P-256" => (SECP256R1, 32),
        "P-384" => (SECP384R1, 48),
        "P-521" => (SECP521R1, 66),
        other => return Err(JwkError::UnsupportedCurve(other.to_string())),
    };

    let x = coordinate(&jwk.x, "x", size)?;
    let y = coordinate(&jwk.y, "y", size)?;

    let mut point = Vec::with_capacity(1 + 2 * size);
    point.push(SEC1_UNCOMPRESSED);
    point.extend_from_slice(&x);
    point.extend_from_slice(&y);

    let info = SubjectPublicKeyInfoOwned {
        algorithm: AlgorithmIdentifierOwned {
            oid: ID_EC_PUBLIC_KEY,
            parameters: Some(Any::from(AnyRef::from(&curve))),
        },
        subject_public_key: BitString::from_bytes(&point)
            .map_err(|e| JwkError::Key(e.to_string()))?,
    };

    info.to_pem(LineEnding::LF)
        .map_err(|e| JwkError::Key(e.to_string()))
}

fn rsa_to_pem(jwk: &Jwk) -> Result<String, JwkError> {
    let n = BigUint::from_bytes_be(&member(&jwk.n, "n")?);
    let e = BigUint::from_bytes_be(&member(&jwk.e, "e")?);

    let key = RsaPublicKey::new(n, e).map_err(|e| JwkError::Key(e.to_string()))?;
    key.to_public_key_pem(LineEnding::LF)
        .map_err(|e| JwkError::Key(e.to_string()))
}

fn okp_to_pem(jwk: &Jwk) -> Result<String, JwkError> {
    let crv = jwk.crv.as_deref().ok_or(JwkError::Missing("crv"))?;
    if crv != "Ed25519" {
        return Err(JwkError::UnsupportedCurve(crv.to_string()));
    }

    let x = member(&jwk.x, "x")?;
    let bytes: [u8; 32] = x.as_slice().try_into().map_err(|_| JwkError::Coordinate {
        member: "x",
        len: x.len(),
        max: 32,
    })?;

    let key = VerifyingKey::from_bytes(&bytes).map_err(|e| JwkError::Key(e.to_string()))?;
    key.to_public_key_pem(LineEnding::LF)
        .map_err(|e| JwkError::Key(e.to_string()))
}
