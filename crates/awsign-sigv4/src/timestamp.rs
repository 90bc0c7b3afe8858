//! Request timestamp resolution.
//!
//! A SigV4 signature is bound to one instant. That instant is read from the
//! request itself, trying each [`TimestampSource`] in order:
//!
//! 1. `X-Amz-Date`, in basic ISO-8601 form (`20150830T123600Z`)
//! 2. `Date`, in basic ISO-8601 form or as an HTTP date
//!    (`Mon, 09 Sep 2011 23:36:00 GMT`)
//!
//! The first header that is present decides the outcome. If it does not parse
//! the request is rejected; later sources are not consulted.

use chrono::{DateTime, NaiveDateTime, Utc};
use http::HeaderMap;

use crate::error::SignError;

/// Basic ISO-8601 format used in `X-Amz-Date` and the string to sign.
pub const ISO8601_BASIC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Date-only format used in the credential scope.
pub const DATE_STAMP_FORMAT: &str = "%Y%m%d";

/// HTTP date format (IMF-fixdate) after the day-name prefix.
const HTTP_DATE_FORMAT: &str = "%d %b %Y %H:%M:%S GMT";

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// The single instant a request is signed at, always in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTimestamp(DateTime<Utc>);

impl RequestTimestamp {
    /// Wrap a UTC instant.
    #[must_use]
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// The current time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse a basic ISO-8601 timestamp (`YYYYMMDDTHHMMSSZ`).
    #[must_use]
    pub fn parse_basic(value: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(value, ISO8601_BASIC_FORMAT)
            .ok()
            .map(|naive| Self(naive.and_utc()))
    }

    /// Parse an HTTP date (`Mon, 09 Sep 2011 23:36:00 GMT`).
    ///
    /// The day name must be well formed but is not checked against the date.
    #[must_use]
    pub fn parse_http_date(value: &str) -> Option<Self> {
        let (day_name, rest) = value.split_once(", ")?;
        if !DAY_NAMES.contains(&day_name) {
            return None;
        }
        NaiveDateTime::parse_from_str(rest, HTTP_DATE_FORMAT)
            .ok()
            .map(|naive| Self(naive.and_utc()))
    }

    /// Render as `YYYYMMDDTHHMMSSZ`.
    #[must_use]
    pub fn to_basic(&self) -> String {
        self.0.format(ISO8601_BASIC_FORMAT).to_string()
    }

    /// Render the `YYYYMMDD` date used in the credential scope.
    #[must_use]
    pub fn date_stamp(&self) -> String {
        self.0.format(DATE_STAMP_FORMAT).to_string()
    }

    /// The underlying instant.
    #[must_use]
    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A header a request timestamp may be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    /// The dedicated `X-Amz-Date` signing header.
    AmzDate,
    /// The generic `Date` header.
    Date,
}

impl TimestampSource {
    /// Sources in the order they are consulted.
    pub const FALLBACK_CHAIN: [Self; 2] = [Self::AmzDate, Self::Date];

    /// The lower-cased header name for this source.
    #[must_use]
    pub fn header_name(self) -> &'static str {
        match self {
            Self::AmzDate => "x-amz-date",
            Self::Date => "date",
        }
    }

    /// Parse a header value according to this source's accepted formats.
    #[must_use]
    pub fn parse(self, value: &str) -> Option<RequestTimestamp> {
        let value = value.trim();
        match self {
            Self::AmzDate => RequestTimestamp::parse_basic(value),
            Self::Date => RequestTimestamp::parse_basic(value)
                .or_else(|| RequestTimestamp::parse_http_date(value)),
        }
    }

    /// Try this source against a header map.
    ///
    /// Returns `None` when the header is absent, so the caller can move on to
    /// the next source.
    pub fn resolve(self, headers: &HeaderMap) -> Option<Result<RequestTimestamp, SignError>> {
        let value = headers.get(self.header_name())?;
        let malformed = || SignError::MalformedTimestamp {
            header: self.header_name(),
            value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
        };
        Some(
            value
                .to_str()
                .ok()
                .and_then(|text| self.parse(text))
                .ok_or_else(malformed),
        )
    }
}

/// A timestamp together with the header it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTimestamp {
    /// The parsed instant.
    pub timestamp: RequestTimestamp,
    /// Where it came from.
    pub source: TimestampSource,
}

/// Resolve the signing timestamp of a request by walking
/// [`TimestampSource::FALLBACK_CHAIN`].
///
/// # Errors
///
/// Returns [`SignError::MissingTimestamp`] if no source header is present, or
/// [`SignError::MalformedTimestamp`] if the first present header does not parse.
///
/// # Examples
///
/// ```
/// use awsign_sigv4::timestamp::{TimestampSource, resolve_timestamp};
///
/// let mut headers = http::HeaderMap::new();
/// headers.insert("date", "Mon, 09 Sep 2011 23:36:00 GMT".parse().unwrap());
///
/// let resolved = resolve_timestamp(&headers).unwrap();
/// assert_eq!(resolved.source, TimestampSource::Date);
/// assert_eq!(resolved.timestamp.to_basic(), "20110909T233600Z");
/// ```
pub fn resolve_timestamp(headers: &HeaderMap) -> Result<ResolvedTimestamp, SignError> {
    TimestampSource::FALLBACK_CHAIN
        .into_iter()
        .find_map(|source| {
            source.resolve(headers).map(|result| {
                result.map(|timestamp| ResolvedTimestamp { timestamp, source })
            })
        })
        .unwrap_or(Err(SignError::MissingTimestamp))
}
