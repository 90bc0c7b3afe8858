//! Signing credentials and service scope.
//!
//! [`Credentials`] carries the long-term key pair supplied by the caller and
//! [`ServiceScope`] names the service and region a signature is valid for.
//! Both are immutable once built and are safe to share across threads.

use std::fmt;

/// An AWS access key pair.
///
/// The secret key is never printed: the `Debug` implementation redacts it.
///
/// # Examples
///
/// ```
/// use awsign_sigv4::credentials::Credentials;
///
/// let credentials = Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
/// assert_eq!(credentials.access_key_id(), "AKIDEXAMPLE");
/// assert!(!format!("{credentials:?}").contains("EXAMPLEKEY"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
}

impl Credentials {
    /// Create credentials from an access key ID and its secret key.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// The public access key ID.
    #[must_use]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// The secret access key.
    #[must_use]
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

/// The service and region a signature is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceScope {
    service: String,
    region: String,
}

impl ServiceScope {
    /// Create a scope for `service` (e.g. `dynamodb`) in `region` (e.g. `us-east-1`).
    pub fn new(service: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
        }
    }

    /// The service name.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// The region name.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Render the credential scope for the given `YYYYMMDD` date.
    ///
    /// ```
    /// use awsign_sigv4::credentials::ServiceScope;
    ///
    /// let scope = ServiceScope::new("iam", "us-east-1");
    /// assert_eq!(scope.credential_scope("20150830"), "20150830/us-east-1/iam/aws4_request");
    /// ```
    #[must_use]
    pub fn credential_scope(&self, date: &str) -> String {
        format!("{date}/{}/{}/aws4_request", self.region, self.service)
    }
}
