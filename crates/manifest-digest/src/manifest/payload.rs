//! Signed payload reconstruction for schema 1 manifests.
//!
//! Every signature's protected header names the same truncation point
//! (`formatLength`) and closing bytes (`formatTail`). The signed payload is
//! the stored manifest cut at that point with the tail appended.

use crate::error::{DigestError, DigestResult};
use crate::types::{JwsBundle, JwsHeader, JwsSignature, SignatureEntry};

use super::jwk::jwk_to_pem_impl;
use super::wire::{decode_format_tail_impl, decode_protected_header_impl};

/// Values every signature must agree on.
#[derive(Debug, Default)]
struct Agreement {
    format_length: Option<u64>,
    format_tail: Option<Vec<u8>>,
}

/// Two signatures disagree on a value.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Disagreement<T> {
    pub agreed: T,
    pub candidate: T,
}

/// Adopt `candidate` when nothing is agreed yet, otherwise require equality.
pub(crate) fn merge_agreed<T: PartialEq>(
    agreed: Option<T>,
    candidate: T,
) -> Result<T, Disagreement<T>> {
    match agreed {
        None => Ok(candidate),
        Some(agreed) if agreed == candidate => Ok(agreed),
        Some(agreed) => Err(Disagreement { agreed, candidate }),
    }
}

pub(crate) fn reconstruct_payload_impl(
    signatures: &[SignatureEntry],
    raw: &[u8],
) -> DigestResult<JwsBundle> {
    if signatures.is_empty() {
        return Err(DigestError::invalid_content(
            "signed manifest has no signatures",
        ));
    }

    let (agreement, normalized) = signatures.iter().enumerate().try_fold(
        (Agreement::default(), Vec::with_capacity(signatures.len())),
        |(agreement, mut normalized), (index, entry)| {
            let agreement = fold_signature(agreement, index, entry)?;
            normalized.push(normalize_signature(index, entry)?);
            Ok::<_, DigestError>((agreement, normalized))
        },
    )?;

    let (Some(format_length), Some(format_tail)) = (agreement.format_length, agreement.format_tail)
    else {
        return Err(DigestError::invalid_content(
            "signatures carry no format information",
        ));
    };

    let cut = usize::try_from(format_length)
        .ok()
        .filter(|cut| *cut <= raw.len())
        .ok_or_else(|| {
            DigestError::invalid_content(format!(
                "formatLength {} exceeds manifest length {}",
                format_length,
                raw.len()
            ))
        })?;

    let mut payload = Vec::with_capacity(cut + format_tail.len());
    payload.extend_from_slice(&raw[..cut]);
    payload.extend_from_slice(&format_tail);

    tracing::debug!(
        signatures = normalized.len(),
        format_length,
        payload_len = payload.len(),
        "reconstructed signed payload"
    );

    Ok(JwsBundle {
        payload,
        signatures: normalized,
    })
}

fn fold_signature(
    agreement: Agreement,
    index: usize,
    entry: &SignatureEntry,
) -> DigestResult<Agreement> {
    let header = decode_protected_header_impl(index, &entry.protected)?;

    let format_length =
        merge_agreed(agreement.format_length, header.format_length).map_err(|d| {
            DigestError::invalid_content(format!(
                "signature {}: formatLength {} disagrees with {}",
                index, d.candidate, d.agreed
            ))
        })?;

    let tail = decode_format_tail_impl(index, &header.format_tail)?;
    let format_tail = merge_agreed(agreement.format_tail, tail).map_err(|d| {
        DigestError::invalid_content(format!(
            "signature {}: formatTail {:?} disagrees with {:?}",
            index,
            String::from_utf8_lossy(&d.candidate),
            String::from_utf8_lossy(&d.agreed)
        ))
    })?;

    Ok(Agreement {
        format_length: Some(format_length),
        format_tail: Some(format_tail),
    })
}

fn normalize_signature(index: usize, entry: &SignatureEntry) -> DigestResult<JwsSignature> {
    let jwk = entry
        .header
        .jwk
        .as_ref()
        .map(|jwk| jwk_to_pem_impl(index, jwk))
        .transpose()?;

    Ok(JwsSignature {
        header: JwsHeader {
            alg: entry.header.alg.clone(),
            chain: entry.header.chain.clone(),
            jwk,
        },
        signature: entry.signature.clone(),
        protected: entry.protected.clone(),
    })
}
