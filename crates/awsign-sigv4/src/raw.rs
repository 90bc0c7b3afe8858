//! Reading and rendering raw HTTP/1.1 requests.
//!
//! The AWS SigV4 test suite and the `awsign` command line describe requests as
//! plain HTTP/1.1 text:
//!
//! ```text
//! POST /?Param1=value1 HTTP/1.1
//! Host:example.amazonaws.com
//! X-Amz-Date:20150830T123600Z
//!
//! body
//! ```
//!
//! Request targets in those files may contain spaces and non-ASCII characters.
//! They are percent-encoded before the [`Uri`](http::Uri) is built, which the
//! canonicalizer later decodes and re-encodes.

use std::fmt::Write as _;

use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::{HeaderName, HeaderValue, Request};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::error::RawRequestError;

/// Characters in a request target that cannot appear in a `Uri` as-is.
const TARGET_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^');

/// Parse a raw HTTP/1.1 request.
///
/// Header values are trimmed and repeated headers are kept in order.
/// `Content-Length` is dropped: the body is whatever follows the blank line.
///
/// # Errors
///
/// Returns [`RawRequestError`] if the request line or a header line is
/// malformed, or if the method, target, or a header is rejected by `http`.
///
/// # Examples
///
/// ```
/// use awsign_sigv4::raw::parse_raw_request;
///
/// let request = parse_raw_request(
///     "GET /example space/ HTTP/1.1\nHost:example.amazonaws.com\n\n",
/// )
/// .unwrap();
/// assert_eq!(request.uri().path(), "/example%20space/");
/// assert_eq!(request.headers()["host"], "example.amazonaws.com");
/// ```
pub fn parse_raw_request(raw: &str) -> Result<Request<Bytes>, RawRequestError> {
    let (head, body) = split_head_and_body(raw);
    let mut lines = head.lines();

    let request_line = lines
        .next()
        .filter(|line| !line.trim().is_empty())
        .ok_or(RawRequestError::MissingRequestLine)?;
    let (method, rest) = request_line
        .split_once(' ')
        .ok_or_else(|| RawRequestError::InvalidRequestLine(request_line.to_owned()))?;
    let (target, _version) = rest
        .rsplit_once(' ')
        .ok_or_else(|| RawRequestError::InvalidRequestLine(request_line.to_owned()))?;

    let target = utf8_percent_encode(target, TARGET_ENCODE_SET).to_string();
    let mut builder = Request::builder().method(method).uri(target);

    for line in lines {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| RawRequestError::InvalidHeaderLine(line.to_owned()))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(http::Error::from)?;
        if name == CONTENT_LENGTH {
            continue;
        }
        let value = HeaderValue::from_str(value.trim()).map_err(http::Error::from)?;
        builder = builder.header(name, value);
    }

    Ok(builder.body(Bytes::copy_from_slice(body.as_bytes()))?)
}

/// Render a request back into HTTP/1.1 text.
///
/// Headers are written in map order as `name: value`; the body follows a blank
/// line verbatim (lossily decoded if it is not UTF-8).
///
/// # Examples
///
/// ```
/// use awsign_sigv4::raw::{parse_raw_request, render_raw_request};
///
/// let request = parse_raw_request("GET / HTTP/1.1\nHost:example.amazonaws.com\n\n").unwrap();
/// assert_eq!(
///     render_raw_request(&request),
///     "GET / HTTP/1.1\r\nhost: example.amazonaws.com\r\n\r\n"
/// );
/// ```
#[must_use]
pub fn render_raw_request(request: &Request<Bytes>) -> String {
    let target = request
        .uri()
        .path_and_query()
        .map_or("/", http::uri::PathAndQuery::as_str);

    let mut out = String::new();
    let _ = write!(out, "{} {target} HTTP/1.1\r\n", request.method());
    for (name, value) in request.headers() {
        let _ = write!(
            out,
            "{name}: {}\r\n",
            String::from_utf8_lossy(value.as_bytes())
        );
    }
    out.push_str("\r\n");
    out.push_str(&String::from_utf8_lossy(request.body()));
    out
}

/// Split at the first blank line, accepting `\n\n` or `\r\n\r\n`.
fn split_head_and_body(raw: &str) -> (&str, &str) {
    let crlf = raw.find("\r\n\r\n").map(|i| (i, 4));
    let lf = raw.find("\n\n").map(|i| (i, 2));
    let split = match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };
    match split {
        Some((index, len)) => (&raw[..index], &raw[index + len..]),
        None => (raw, ""),
    }
}
