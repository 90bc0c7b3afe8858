//! Error types for SigV4 request signing.
//!
//! Signing itself has a single user-facing failure mode, the request timestamp,
//! represented by [`SignError::MissingTimestamp`] and
//! [`SignError::MalformedTimestamp`]. The remaining variants only surface when
//! the caller hands in a header value that is not UTF-8, a streaming body that
//! fails to drain, or an access key that cannot be carried in an HTTP header.

/// Errors that can occur while signing a request with AWS Signature Version 4.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// Neither `X-Amz-Date` nor `Date` is present on the request.
    #[error("X-Amz-Date or Date header not supplied")]
    MissingTimestamp,

    /// A timestamp header is present but does not parse.
    #[error("malformed timestamp in {header} header: {value:?}")]
    MalformedTimestamp {
        /// The header the timestamp was read from.
        header: &'static str,
        /// The raw header value.
        value: String,
    },

    /// A header value is not valid UTF-8 and cannot be canonicalized byte for byte.
    #[error("value of {header} header is not valid UTF-8")]
    NonUtf8HeaderValue {
        /// The offending header name.
        header: String,
    },

    /// The request body could not be read in full.
    #[error("failed to read request body")]
    Body(#[from] std::io::Error),

    /// A computed header value contains bytes that are not allowed in HTTP headers.
    #[error("invalid value for {header} header")]
    InvalidHeaderValue {
        /// The header being written.
        header: &'static str,
        /// The underlying `http` error.
        #[source]
        source: http::header::InvalidHeaderValue,
    },
}

/// Errors produced while reading a raw HTTP/1.1 request.
#[derive(Debug, thiserror::Error)]
pub enum RawRequestError {
    /// The input is empty.
    #[error("missing request line")]
    MissingRequestLine,

    /// The request line is not `METHOD target VERSION`.
    #[error("invalid request line: {0:?}")]
    InvalidRequestLine(String),

    /// A header line has no `:` separator.
    #[error("invalid header line: {0:?}")]
    InvalidHeaderLine(String),

    /// The request could not be assembled into an `http::Request`.
    #[error(transparent)]
    Http(#[from] http::Error),
}
