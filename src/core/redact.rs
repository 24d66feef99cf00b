//! Header redaction for request logging
//!
//! Credentials never reach the log in recoverable form. The `Authorization`
//! value is replaced by its SHA-512 digest and byte length, which still allow
//! correlating requests made with the same credential. The trace token is
//! removed because every record already carries it as its own field.

use base64::{engine::general_purpose::URL_SAFE, Engine};
use http::{header, HeaderMap, HeaderValue};
use sha2::{Digest, Sha512};
use std::collections::BTreeMap;

/// Header carrying the per-request trace token
pub const TRACE_TOKEN_HEADER: &str = "X-Trace-Token";

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const AUTHORIZATION_HASH_HEADER: &str = "Authorization-Hash";
pub const AUTHORIZATION_LEN_HEADER: &str = "Authorization-Len";

/// Loggable header collection: canonical name to all of its values
pub type HeaderFields = BTreeMap<String, Vec<String>>;

/// Convert an `http::HeaderMap` into loggable fields.
///
/// Names are canonicalized (`x-trace-token` becomes `X-Trace-Token`) and
/// repeated headers keep every value in arrival order. Values that are not
/// valid UTF-8 are converted lossily.
pub fn header_fields(headers: &HeaderMap) -> HeaderFields {
    let mut fields = HeaderFields::new();
    for (name, value) in headers {
        fields
            .entry(canonical_name(name.as_str()))
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    fields
}

/// Produce a redacted copy of `headers`. The input is left untouched.
///
/// Name matching is case-insensitive. Running `redact` on its own output is
/// safe: nothing sensitive remains, and the hash/length fields are recomputed
/// for an absent credential.
pub fn redact(headers: &HeaderFields) -> HeaderFields {
    let mut redacted = headers.clone();
    let authorization = take_first(&mut redacted, AUTHORIZATION_HEADER).unwrap_or_default();
    finish_redaction(redacted, authorization.as_bytes())
}

/// Redact headers straight from an `http::HeaderMap`.
///
/// The credential is hashed and measured over its raw bytes, before any
/// lossy UTF-8 conversion of the remaining values.
pub fn redact_header_map(headers: &HeaderMap) -> HeaderFields {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .map(HeaderValue::as_bytes)
        .unwrap_or_default();
    let mut fields = header_fields(headers);
    take_first(&mut fields, AUTHORIZATION_HEADER);
    finish_redaction(fields, authorization)
}

/// Drop the trace token and replace any earlier hash/length fields with
/// ones computed over `authorization`. `fields` no longer holds the
/// credential itself.
fn finish_redaction(mut fields: HeaderFields, authorization: &[u8]) -> HeaderFields {
    fields.retain(|name, _| !name.eq_ignore_ascii_case(TRACE_TOKEN_HEADER));
    // Stale values from an earlier pass must not survive next to fresh ones.
    take_first(&mut fields, AUTHORIZATION_HASH_HEADER);
    take_first(&mut fields, AUTHORIZATION_LEN_HEADER);

    fields.insert(
        AUTHORIZATION_HASH_HEADER.to_string(),
        vec![authorization_hash_bytes(authorization)],
    );
    fields.insert(
        AUTHORIZATION_LEN_HEADER.to_string(),
        vec![authorization.len().to_string()],
    );
    fields
}

/// URL-safe base64 of the SHA-512 digest of `value`
pub fn authorization_hash(value: &str) -> String {
    authorization_hash_bytes(value.as_bytes())
}

/// Same as [`authorization_hash`] for a raw header value
pub fn authorization_hash_bytes(value: &[u8]) -> String {
    let mut hasher = Sha512::new();
    hasher.update(value);
    URL_SAFE.encode(hasher.finalize())
}

/// Remove every entry whose name matches `name` case-insensitively and
/// return the first value of the first match.
fn take_first(headers: &mut HeaderFields, name: &str) -> Option<String> {
    let keys: Vec<String> = headers
        .keys()
        .filter(|key| key.eq_ignore_ascii_case(name))
        .cloned()
        .collect();

    let mut first = None;
    for key in keys {
        if let Some(values) = headers.remove(&key) {
            if first.is_none() {
                first = values.into_iter().next();
            }
        }
    }
    first
}

/// `content-type` -> `Content-Type`
fn canonical_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HeaderFields {
        let mut headers = HeaderFields::new();
        for (name, value) in pairs {
            headers
                .entry(name.to_string())
                .or_default()
                .push(value.to_string());
        }
        headers
    }

    #[test]
    fn test_removes_trace_token_and_authorization() {
        let input = fields(&[
            ("X-Trace-Token", "abcdefgh"),
            ("Authorization", "Bearer secret"),
            ("Accept", "application/json"),
        ]);

        let output = redact(&input);

        assert!(!output.contains_key(TRACE_TOKEN_HEADER));
        assert!(!output.contains_key(AUTHORIZATION_HEADER));
        assert_eq!(output["Accept"], vec!["application/json".to_string()]);
        assert_eq!(output[AUTHORIZATION_LEN_HEADER], vec!["13".to_string()]);
        assert_eq!(
            output[AUTHORIZATION_HASH_HEADER],
            vec![authorization_hash("Bearer secret")]
        );
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = fields(&[("Authorization", "Basic dXNlcjpwYXNz")]);
        let before = input.clone();

        let _ = redact(&input);

        assert_eq!(input, before);
    }

    #[test]
    fn test_absent_authorization_hashes_empty_string() {
        let output = redact(&fields(&[("Accept", "*/*")]));

        assert_eq!(output[AUTHORIZATION_LEN_HEADER], vec!["0".to_string()]);
        assert_eq!(output[AUTHORIZATION_HASH_HEADER], vec![authorization_hash("")]);
    }

    #[test]
    fn test_case_insensitive_names() {
        let output = redact(&fields(&[
            ("x-trace-token", "abcdefgh"),
            ("authorization", "token"),
        ]));

        assert_eq!(output.len(), 2);
        assert_eq!(output[AUTHORIZATION_LEN_HEADER], vec!["5".to_string()]);
    }

    #[test]
    fn test_hash_is_sha512_url_safe_base64() {
        let hash = authorization_hash("Bearer secret");
        // 64 digest bytes encode to 88 padded characters
        assert_eq!(hash.len(), 88);
        assert!(!hash.contains('+'));
        assert!(!hash.contains('/'));
        assert_eq!(hash, authorization_hash("Bearer secret"));
        assert_ne!(hash, authorization_hash("Bearer secreT"));
    }

    #[test]
    fn test_redacting_twice_is_safe() {
        let once = redact(&fields(&[
            ("Authorization", "Bearer secret"),
            ("Accept", "*/*"),
        ]));
        let twice = redact(&once);

        assert!(!twice.contains_key(AUTHORIZATION_HEADER));
        assert_eq!(twice["Accept"], once["Accept"]);
        assert_eq!(twice[AUTHORIZATION_HASH_HEADER].len(), 1);
        assert_eq!(twice[AUTHORIZATION_LEN_HEADER], vec!["0".to_string()]);
    }

    #[test]
    fn test_header_fields_canonicalizes_and_groups() {
        let mut map = HeaderMap::new();
        map.append("content-type", HeaderValue::from_static("text/plain"));
        map.append("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        map.append("x-forwarded-for", HeaderValue::from_static("10.0.0.2"));

        let fields = header_fields(&map);

        assert_eq!(fields["Content-Type"], vec!["text/plain".to_string()]);
        assert_eq!(
            fields["X-Forwarded-For"],
            vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()]
        );
    }

    #[test]
    fn test_redact_header_map() {
        let mut map = HeaderMap::new();
        map.insert("x-trace-token", HeaderValue::from_static("abcdefgh"));
        map.insert("authorization", HeaderValue::from_static("Bearer abc"));

        let output = redact_header_map(&map);

        assert_eq!(
            output.keys().collect::<Vec<_>>(),
            vec![AUTHORIZATION_HASH_HEADER, AUTHORIZATION_LEN_HEADER]
        );
    }

    #[test]
    fn test_non_utf8_authorization_uses_raw_bytes() {
        let raw: &[u8] = b"Bearer \xff\xfe";
        let mut map = HeaderMap::new();
        map.insert(header::AUTHORIZATION, HeaderValue::from_bytes(raw).unwrap());

        let output = redact_header_map(&map);

        assert_eq!(output[AUTHORIZATION_LEN_HEADER], vec!["9".to_string()]);
        assert_eq!(output[AUTHORIZATION_HASH_HEADER], vec![authorization_hash_bytes(raw)]);
        assert!(!output.contains_key(AUTHORIZATION_HEADER));

        let mut swapped = HeaderMap::new();
        swapped.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfe\xff").unwrap(),
        );
        assert_ne!(
            redact_header_map(&swapped)[AUTHORIZATION_HASH_HEADER],
            output[AUTHORIZATION_HASH_HEADER]
        );
    }

    #[test]
    fn test_str_and_byte_hashes_agree() {
        assert_eq!(
            authorization_hash("Bearer secret"),
            authorization_hash_bytes(b"Bearer secret")
        );
    }
}
