//! AWS Signature Version 4 signing.
//!
//! This module implements the client side of SigV4:
//!
//! 1. Resolve the request timestamp from `X-Amz-Date` or `Date`.
//! 2. Normalize the headers that will be signed (transport host, rewritten timestamp).
//! 3. Snapshot and hash the body, then build the canonical request.
//! 4. Build the string to sign from the timestamp, credential scope, and canonical request hash.
//! 5. Derive the signing key using HMAC-SHA256 from the secret key and credential scope components.
//! 6. Compute the signature and write the `Authorization` header back onto the request.
//!
//! The main entry point is [`sign`].

use hmac::{Hmac, KeyInit, Mac};
use http::header::{AUTHORIZATION, HOST};
use http::{HeaderMap, HeaderValue, Request};
use sha2::Sha256;
use tracing::debug;

use crate::body::SignableBody;
use crate::canonical::{build_canonical_request, build_signed_headers_string, hash_payload};
use crate::credentials::{Credentials, ServiceScope};
use crate::error::SignError;
use crate::timestamp::resolve_timestamp;

/// The signing algorithm identifier.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

type HmacSha256 = Hmac<Sha256>;

/// Intermediate and final values produced while signing a request.
///
/// Useful for diagnosing a signature the server rejects: compare the canonical
/// request and string to sign with what the service reports.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningArtifacts {
    /// The canonical request that was hashed.
    pub canonical_request: String,
    /// The string to sign.
    pub string_to_sign: String,
    /// The hex-encoded signature.
    pub signature: String,
    /// The full `Authorization` header value.
    pub authorization: String,
}

/// Build the SigV4 string to sign.
///
/// Format:
/// ```text
/// AWS4-HMAC-SHA256\n
/// <ISO8601 timestamp>\n
/// <credential_scope>\n
/// <hex(SHA256(canonical_request))>
/// ```
///
/// # Examples
///
/// ```
/// use awsign_sigv4::sigv4::build_string_to_sign;
///
/// let sts = build_string_to_sign(
///     "20150830T123600Z",
///     "20150830/us-east-1/service/aws4_request",
///     "bb579772317eb040ac9ed261061d46c1f17a8133879d6129b6e1c25292927e63",
/// );
/// assert!(sts.starts_with("AWS4-HMAC-SHA256\n20150830T123600Z\n"));
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}")
}

/// Derive the SigV4 signing key using HMAC-SHA256 chain.
///
/// ```text
/// DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
/// DateRegionKey        = HMAC-SHA256(DateKey, region)
/// DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
/// SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
/// ```
///
/// Each stage feeds its raw bytes to the next. The key is scoped to one
/// (date, region, service) triple and is never cached.
///
/// # Examples
///
/// ```
/// use awsign_sigv4::sigv4::derive_signing_key;
///
/// let key = derive_signing_key(
///     "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
///     "20150830",
///     "us-east-1",
///     "iam",
/// );
/// assert_eq!(key.len(), 32);
/// ```
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let date_key = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let date_region_key = hmac_sha256(&date_key, region.as_bytes());
    let date_region_service_key = hmac_sha256(&date_region_key, service.as_bytes());
    hmac_sha256(&date_region_service_key, b"aws4_request")
}

/// Compute the HMAC-SHA256 signature of `data` using the given `signing_key`.
///
/// Returns the hex-encoded signature.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    let sig = hmac_sha256(signing_key, data.as_bytes());
    hex::encode(sig)
}

/// Build the `Authorization` header value.
///
/// ```
/// use awsign_sigv4::sigv4::build_authorization_header;
///
/// let value = build_authorization_header(
///     "AKIDEXAMPLE",
///     "20150830/us-east-1/service/aws4_request",
///     "host;x-amz-date",
///     "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31",
/// );
/// assert_eq!(
///     value,
///     "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
///      SignedHeaders=host;x-amz-date, \
///      Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
/// );
/// ```
#[must_use]
pub fn build_authorization_header(
    access_key_id: &str,
    credential_scope: &str,
    signed_headers: &str,
    signature: &str,
) -> String {
    format!(
        "{ALGORITHM} Credential={access_key_id}/{credential_scope}, \
         SignedHeaders={signed_headers}, Signature={signature}"
    )
}

/// Sign an HTTP request in place with AWS Signature Version 4.
///
/// The request must carry an `X-Amz-Date` or `Date` header. On success the
/// request gains a `host` header (when its URI has an authority), its
/// timestamp header is rewritten in basic ISO-8601 form, and an
/// `Authorization` header is set. The body is read once and left intact, so
/// the transport can send it unchanged.
///
/// Signing is deterministic: the same credentials, scope, timestamp, method,
/// URI, headers (other than `Authorization`) and body always produce the same
/// signature, so re-signing an already signed request is a no-op.
///
/// # Errors
///
/// Returns [`SignError::MissingTimestamp`] or [`SignError::MalformedTimestamp`]
/// if the timestamp cannot be resolved; the request is left untouched in that
/// case. Returns [`SignError::NonUtf8HeaderValue`] if a header value is not
/// UTF-8, [`SignError::Body`] if a streaming body fails to drain, and
/// [`SignError::InvalidHeaderValue`] if the access key ID cannot be carried in
/// a header.
///
/// # Examples
///
/// ```
/// use awsign_sigv4::credentials::{Credentials, ServiceScope};
/// use awsign_sigv4::sigv4::sign;
///
/// let credentials = Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
/// let scope = ServiceScope::new("service", "us-east-1");
///
/// let mut request = http::Request::builder()
///     .method("GET")
///     .uri("https://example.amazonaws.com/")
///     .header("x-amz-date", "20150830T123600Z")
///     .body(())
///     .unwrap();
///
/// sign(&credentials, &scope, &mut request).unwrap();
/// assert_eq!(
///     request.headers()["authorization"],
///     "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
///      SignedHeaders=host;x-amz-date, \
///      Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
/// );
/// ```
pub fn sign<B: SignableBody>(
    credentials: &Credentials,
    scope: &ServiceScope,
    request: &mut Request<B>,
) -> Result<SigningArtifacts, SignError> {
    let resolved = resolve_timestamp(request.headers())?;
    let timestamp = resolved.timestamp.to_basic();
    let date = resolved.timestamp.date_stamp();

    debug!(
        source = resolved.source.header_name(),
        timestamp = %timestamp,
        "Resolved SigV4 timestamp"
    );

    if let Some((name, _)) = request.headers().iter().find(|(name, value)| {
        **name != AUTHORIZATION && std::str::from_utf8(value.as_bytes()).is_err()
    }) {
        return Err(SignError::NonUtf8HeaderValue {
            header: name.as_str().to_owned(),
        });
    }

    let mut headers = request.headers().clone();
    headers.remove(AUTHORIZATION);
    set_transport_host(&mut headers, request.uri())?;
    headers.insert(
        resolved.source.header_name(),
        header_value(resolved.source.header_name(), &timestamp)?,
    );

    let payload = request.body_mut().snapshot()?;
    let payload_hash = hash_payload(&payload);

    let canonical_request =
        build_canonical_request(request.method(), request.uri(), &headers, &payload_hash);

    debug!(canonical_request, "Built canonical request");

    let credential_scope = scope.credential_scope(&date);
    let string_to_sign = build_string_to_sign(
        &timestamp,
        &credential_scope,
        &hash_payload(canonical_request.as_bytes()),
    );

    debug!(string_to_sign, "Built string to sign");

    let signing_key = derive_signing_key(
        credentials.secret_access_key(),
        &date,
        scope.region(),
        scope.service(),
    );
    let signature = compute_signature(&signing_key, &string_to_sign);

    let signed_headers = build_signed_headers_string(&headers);
    let authorization = build_authorization_header(
        credentials.access_key_id(),
        &credential_scope,
        &signed_headers,
        &signature,
    );
    headers.insert(AUTHORIZATION, header_value("authorization", &authorization)?);
    *request.headers_mut() = headers;

    debug!(
        access_key_id = credentials.access_key_id(),
        signed_headers, "Signed request"
    );

    Ok(SigningArtifacts {
        canonical_request,
        string_to_sign,
        signature,
        authorization,
    })
}

impl ServiceScope {
    /// Sign `request` for this service and region. See [`sign`].
    ///
    /// # Errors
    ///
    /// Same as [`sign`].
    pub fn sign<B: SignableBody>(
        &self,
        credentials: &Credentials,
        request: &mut Request<B>,
    ) -> Result<SigningArtifacts, SignError> {
        sign(credentials, self, request)
    }
}

/// Copy the URI authority (without userinfo) into the `host` header.
///
/// Origin-form URIs carry no authority; an existing `host` header is kept as-is.
fn set_transport_host(headers: &mut HeaderMap, uri: &http::Uri) -> Result<(), SignError> {
    let Some(authority) = uri.authority() else {
        return Ok(());
    };
    let host = authority
        .as_str()
        .rsplit_once('@')
        .map_or(authority.as_str(), |(_, host)| host);
    headers.insert(HOST, header_value("host", host)?);
    Ok(())
}

fn header_value(header: &'static str, value: &str) -> Result<HeaderValue, SignError> {
    HeaderValue::from_str(value).map_err(|source| SignError::InvalidHeaderValue { header, source })
}

/// Compute HMAC-SHA256 and return the raw bytes.
fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
