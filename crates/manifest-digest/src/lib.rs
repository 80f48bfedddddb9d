//! Content digests for container image manifests.
//!
//! Computes the digest a registry assigns to a manifest (the value served in
//! the `Docker-Content-Digest` header):
//!
//! - Schema 2 and OCI manifests are hashed exactly as given.
//! - Schema 1 manifests carry JWS signatures appended after signing. Their
//!   digest covers the signed payload, rebuilt from the `formatLength` and
//!   `formatTail` each signature's protected header records.
//!
//! # Quick Start
//!
//! ```
//! use manifest_digest::{digest_from_manifest_str, ErrorKind};
//!
//! let digest = digest_from_manifest_str(r#"{"schemaVersion":2,"x":1}"#)?;
//! assert!(digest.starts_with("sha256:"));
//!
//! let err = digest_from_manifest_str("{not json").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Parse);
//! # Ok::<(), manifest_digest::DigestError>(())
//! ```
//!
//! Signatures are decoded and checked for agreement but never
//! cryptographically verified. All functions are pure: no I/O, no shared state.

pub mod digest;
pub mod error;
pub mod manifest;
pub mod options;
pub mod types;

// Re-export main types
pub use digest::{ContentDigest, DIGEST_PREFIX, SHA256_HEX_LEN};
pub use error::{DigestError, DigestResult, ErrorKind};
pub use manifest::{
    digest_from_manifest_str, digest_from_manifest_str_with, jws_from_manifest_str,
    parse_manifest, parse_manifest_with, reconstruct_payload, verify_manifest_digest,
};
pub use options::{DigestOptions, DEFAULT_MAX_MANIFEST_SIZE, DEFAULT_MAX_SIGNATURES};
pub use types::{
    JwsBundle, JwsHeader, JwsSignature, ParsedManifest, ProtectedHeader, SignatureEntry,
    SignatureHeader, SCHEMA_VERSION_SIGNED,
};
