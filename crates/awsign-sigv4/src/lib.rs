//! AWS Signature Version 4 request signing for awsign.
//!
//! This crate signs outgoing HTTP requests so that an AWS-compatible service
//! can verify who sent them, that they were not altered, and when they were
//! made. It performs no I/O of its own: the caller builds an
//! [`http::Request`], calls [`sign`], and hands the request to a transport.
//!
//! # Overview
//!
//! Signing is a pure pass over the request followed by a single mutation:
//!
//! 1. The timestamp is resolved from `X-Amz-Date`, falling back to `Date`.
//! 2. The body is snapshotted once and hashed; an identical copy is put back.
//! 3. The canonical request, string to sign, and scoped signing key are built.
//! 4. The `Authorization` header (and the normalized `host` and timestamp
//!    headers) are written onto the request.
//!
//! # Usage
//!
//! ```rust
//! use awsign_sigv4::{Credentials, ServiceScope, sign};
//!
//! let credentials = Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
//! let scope = ServiceScope::new("dynamodb", "us-east-1");
//!
//! let mut request = http::Request::builder()
//!     .method("POST")
//!     .uri("https://dynamodb.us-east-1.amazonaws.com/")
//!     .header("content-type", "application/x-amz-json-1.0")
//!     .header("x-amz-target", "DynamoDB_20120810.ListTables")
//!     .header("x-amz-date", "20150830T123600Z")
//!     .body(String::from("{}"))
//!     .unwrap();
//!
//! sign(&credentials, &scope, &mut request).unwrap();
//! assert!(request.headers().contains_key("authorization"));
//! assert_eq!(request.body(), "{}");
//! ```
//!
//! # Modules
//!
//! - [`body`] - Re-readable request bodies
//! - [`canonical`] - Canonical request construction
//! - [`credentials`] - Access key pair and service scope
//! - [`error`] - Signing error types
//! - [`raw`] - Raw HTTP/1.1 request reading and rendering
//! - [`sigv4`] - String to sign, key derivation, and the signer
//! - [`timestamp`] - Request timestamp resolution

pub mod body;
pub mod canonical;
pub mod credentials;
pub mod error;
pub mod raw;
pub mod sigv4;
pub mod timestamp;

pub use body::{ReaderBody, SignableBody};
pub use credentials::{Credentials, ServiceScope};
pub use error::{RawRequestError, SignError};
pub use sigv4::{SigningArtifacts, sign};
pub use timestamp::{RequestTimestamp, TimestampSource, resolve_timestamp};
