//! Property tests for digest dispatch.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use manifest_digest::{digest_from_manifest_str, ContentDigest, ErrorKind};
use proptest::prelude::*;
use serde_json::json;

fn protected(format_length: usize, tail: &str) -> String {
    let header = json!({
        "formatLength": format_length,
        "formatTail": URL_SAFE_NO_PAD.encode(tail.as_bytes()),
    });
    URL_SAFE_NO_PAD.encode(header.to_string().as_bytes())
}

fn signed_manifest(body: &str, protected_headers: &[String]) -> String {
    let signatures: Vec<_> = protected_headers
        .iter()
        .map(|p| json!({ "header": { "alg": "ES256" }, "signature": "c2ln", "protected": p }))
        .collect();
    format!(
        "{},\"signatures\":{}}}",
        body,
        serde_json::Value::Array(signatures)
    )
}

fn body_strategy() -> impl Strategy<Value = String> {
    proptest::collection::btree_map("[a-z]{1,8}", "[ -~&&[^\"\\\\]]{0,16}", 0..6).prop_map(
        |members| {
            let mut body = String::from("{\"schemaVersion\":1");
            for (k, v) in members {
                if k == "signatures" || k == "schemaVersion" {
                    continue;
                }
                body.push_str(&format!(",\"{}\":\"{}\"", k, v));
            }
            body
        },
    )
}

proptest! {
    #[test]
    fn unsigned_manifests_hash_raw_bytes(
        version in 2_u64..1_000,
        value in "[ -~&&[^\"\\\\]]{0,64}",
    ) {
        let text = format!(r#"{{"schemaVersion":{},"v":"{}"}}"#, version, value);
        let digest = digest_from_manifest_str(&text).unwrap();
        prop_assert_eq!(digest, ContentDigest::of_bytes(text.as_bytes()).into_string());
    }

    #[test]
    fn signed_manifests_hash_prefix_and_tail(
        body in body_strategy(),
        tail in "[ -~]{1,8}",
    ) {
        let text = signed_manifest(&body, &[protected(body.len(), &tail)]);
        let mut payload = body.clone().into_bytes();
        payload.extend_from_slice(tail.as_bytes());
        prop_assert_eq!(
            digest_from_manifest_str(&text).unwrap(),
            ContentDigest::of_bytes(&payload).into_string()
        );
    }

    #[test]
    fn agreeing_signatures_match_single(
        body in body_strategy(),
        count in 2_usize..6,
    ) {
        let header = protected(body.len(), "}");
        let single = signed_manifest(&body, std::slice::from_ref(&header));
        let multi = signed_manifest(&body, &vec![header; count]);
        prop_assert_eq!(
            digest_from_manifest_str(&single).unwrap(),
            digest_from_manifest_str(&multi).unwrap()
        );
    }

    #[test]
    fn disagreeing_signatures_fail(
        body in body_strategy(),
        shift in 1_usize..4,
        position in 0_usize..3,
    ) {
        let agreed = protected(body.len(), "}");
        let other = protected(body.len() - shift, "}");
        let mut headers = vec![agreed.clone(), agreed];
        headers.insert(position.min(headers.len()), other);
        let err = digest_from_manifest_str(&signed_manifest(&body, &headers)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidContent);
    }

    #[test]
    fn non_json_is_parse_error(text in "[^{\\[\"0-9tfn \t\r\n-][ -~]{0,32}") {
        let err = digest_from_manifest_str(&text).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
