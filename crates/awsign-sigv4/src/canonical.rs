//! Canonical request construction for AWS Signature Version 4.
//!
//! This module implements the canonical request format as specified by AWS:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Every function here is pure: the result depends only on its arguments, and
//! no scratch state is shared between calls.

use std::collections::BTreeMap;

use http::{HeaderMap, Method, Uri};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, percent_encode};
use sha2::{Digest, Sha256};

/// Characters that are percent-encoded in URI path segments and query components.
///
/// Everything except the RFC 3986 unreserved characters
/// (A-Z, a-z, 0-9, `-`, `_`, `.`, `~`) is encoded.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Build the full canonical request string from its components.
///
/// The result is a newline-separated string of:
/// 1. HTTP method
/// 2. Canonical URI
/// 3. Canonical query string
/// 4. Canonical headers (terminated by an extra newline)
/// 5. Signed headers
/// 6. Hashed payload
///
/// # Examples
///
/// ```
/// use awsign_sigv4::canonical::{build_canonical_request, hash_payload};
///
/// let mut headers = http::HeaderMap::new();
/// headers.insert("host", "example.amazonaws.com".parse().unwrap());
/// headers.insert("x-amz-date", "20150830T123600Z".parse().unwrap());
///
/// let canonical = build_canonical_request(
///     &http::Method::GET,
///     &"/".parse().unwrap(),
///     &headers,
///     &hash_payload(b""),
/// );
/// assert!(canonical.starts_with("GET\n/\n\nhost:example.amazonaws.com\n"));
/// ```
#[must_use]
pub fn build_canonical_request(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    payload_hash: &str,
) -> String {
    let canonical_uri = build_canonical_uri(uri.path());
    let canonical_query = build_canonical_query_string(uri.query().unwrap_or(""));
    let canonical_headers = build_canonical_headers(headers);
    let signed_headers = build_signed_headers_string(headers);

    format!(
        "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n\n{signed_headers}\n{payload_hash}"
    )
}

/// Build the canonical URI.
///
/// `.` and `..` segments are resolved lexically and repeated slashes collapse,
/// a trailing slash on the original path is kept, and an empty result is `/`.
/// Each segment is then percent-decoded and re-encoded so that raw and
/// already-encoded paths produce the same canonical form.
///
/// # Examples
///
/// ```
/// use awsign_sigv4::canonical::build_canonical_uri;
///
/// assert_eq!(build_canonical_uri("/test.txt"), "/test.txt");
/// assert_eq!(build_canonical_uri("/example1/example2/../.."), "/");
/// assert_eq!(build_canonical_uri("/a/./b/"), "/a/b/");
/// assert_eq!(build_canonical_uri(""), "/");
/// ```
#[must_use]
pub fn build_canonical_uri(path: &str) -> String {
    let cleaned = clean_path(path);
    if cleaned == "/" {
        return cleaned;
    }

    let mut canonical = cleaned
        .split('/')
        .map(|segment| {
            let decoded: Vec<u8> = percent_decode_str(segment).collect();
            uri_encode(&decoded)
        })
        .collect::<Vec<_>>()
        .join("/");

    if path.ends_with('/') {
        canonical.push('/');
    }
    canonical
}

/// Build the canonical query string.
///
/// Each parameter is decoded with form-urlencoded rules, then its key and value
/// are percent-encoded independently with the unreserved set. Parameters sort
/// by encoded key, then by encoded value. A parameter without a value renders
/// as `key=`; the `=` is never dropped.
///
/// # Examples
///
/// ```
/// use awsign_sigv4::canonical::build_canonical_query_string;
///
/// assert_eq!(build_canonical_query_string(""), "");
/// assert_eq!(build_canonical_query_string("b=2&a=1"), "a=1&b=2");
/// assert_eq!(build_canonical_query_string("flag"), "flag=");
/// ```
#[must_use]
pub fn build_canonical_query_string(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }

    let mut params: Vec<(String, String)> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (
                uri_encode(&decode_query_component(key)),
                uri_encode(&decode_query_component(value)),
            )
        })
        .collect();

    params.sort_unstable();

    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical headers string from a header map.
///
/// Header names are lowercase (the `http` crate stores them that way). Values
/// are trimmed and runs of whitespace collapse to a single space. The values of
/// a repeated header are sorted and joined with `,`. Entries are sorted by name
/// and joined with `\n`; the `authorization` header is never included.
///
/// Values that are not valid UTF-8 (obs-text) are decoded lossily here;
/// [`sign`](crate::sigv4::sign) rejects such requests before canonicalizing.
///
/// The result does NOT include a trailing newline; the caller adds that as part of
/// the canonical request format (the blank line between headers and signed headers).
///
/// # Examples
///
/// ```
/// use awsign_sigv4::canonical::build_canonical_headers;
///
/// let mut headers = http::HeaderMap::new();
/// headers.append("My-Header1", "b".parse().unwrap());
/// headers.append("my-header1", "  a   z ".parse().unwrap());
/// headers.insert("Host", "example.amazonaws.com".parse().unwrap());
///
/// assert_eq!(
///     build_canonical_headers(&headers),
///     "host:example.amazonaws.com\nmy-header1:a z,b"
/// );
/// ```
#[must_use]
pub fn build_canonical_headers(headers: &HeaderMap) -> String {
    collect_header_values(headers)
        .iter()
        .map(|(name, values)| format!("{name}:{}", values.join(",")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the signed headers string: sorted header names joined with `;`.
///
/// # Examples
///
/// ```
/// use awsign_sigv4::canonical::build_signed_headers_string;
///
/// let mut headers = http::HeaderMap::new();
/// headers.insert("X-Amz-Date", "20150830T123600Z".parse().unwrap());
/// headers.insert("Host", "example.amazonaws.com".parse().unwrap());
///
/// assert_eq!(build_signed_headers_string(&headers), "host;x-amz-date");
/// ```
#[must_use]
pub fn build_signed_headers_string(headers: &HeaderMap) -> String {
    collect_header_values(headers)
        .into_keys()
        .collect::<Vec<_>>()
        .join(";")
}

/// Compute the SHA-256 hash of the given payload and return it as a hex string.
///
/// # Examples
///
/// ```
/// use awsign_sigv4::canonical::hash_payload;
///
/// // SHA-256 of empty payload
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Group the signable headers by name, with normalized and sorted values.
fn collect_header_values(headers: &HeaderMap) -> BTreeMap<&str, Vec<String>> {
    let mut header_map: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        if *name == http::header::AUTHORIZATION {
            continue;
        }
        let text = String::from_utf8_lossy(value.as_bytes());
        header_map
            .entry(name.as_str())
            .or_default()
            .push(collapse_whitespace(text.trim()));
    }
    for values in header_map.values_mut() {
        values.sort_unstable();
    }
    header_map
}

/// Lexically clean a slash-separated path.
///
/// Resolves `.` and `..`, drops empty segments, and never climbs above the
/// root of an absolute path.
fn clean_path(path: &str) -> String {
    let rooted = path.is_empty() || path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    match (rooted, segments.is_empty()) {
        (true, _) => format!("/{}", segments.join("/")),
        (false, true) => ".".to_owned(),
        (false, false) => segments.join("/"),
    }
}

/// URI-encode a single path segment or query component using the SigV4 rules.
fn uri_encode(input: &[u8]) -> String {
    percent_encode(input, URI_ENCODE_SET).to_string()
}

/// Decode a form-urlencoded query component to raw bytes.
///
/// `+` is a space. Escapes that are not valid UTF-8 keep their byte values.
fn decode_query_component(input: &str) -> Vec<u8> {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced).collect()
}

/// Collapse consecutive whitespace characters in a string to a single space.
fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result
}
