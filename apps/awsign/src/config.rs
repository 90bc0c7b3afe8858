//! Signer configuration.
//!
//! Provides [`SignerConfig`], loaded from environment variables using the
//! names the AWS tooling already understands.

use anyhow::{Result, bail};
use awsign_sigv4::{Credentials, ServiceScope};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Configuration for the `awsign` command.
///
/// The secret key is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SignerConfig {
    /// Access key ID used in the credential scope.
    #[builder(default)]
    pub access_key_id: Option<String>,

    /// Secret access key the signing key is derived from.
    #[builder(default)]
    #[serde(skip_serializing, default)]
    pub secret_access_key: Option<String>,

    /// Region the signature is scoped to.
    #[builder(default = String::from("us-east-1"))]
    pub region: String,

    /// Service the signature is scoped to.
    #[builder(default = String::from("execute-api"))]
    pub service: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("warn"))]
    pub log_level: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            region: String::from("us-east-1"),
            service: String::from("execute-api"),
            log_level: String::from("warn"),
        }
    }
}

impl SignerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `AWS_ACCESS_KEY_ID` (or `AWS_ACCESS_KEY`) | *(none)* |
    /// | `AWS_SECRET_ACCESS_KEY` (or `AWS_SECRET_KEY`) | *(none)* |
    /// | `AWS_REGION` (or `AWS_DEFAULT_REGION`) | `us-east-1` |
    /// | `AWSIGN_SERVICE` | `execute-api` |
    /// | `LOG_LEVEL` | `warn` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = first_env(&["AWS_ACCESS_KEY_ID", "AWS_ACCESS_KEY"]) {
            config.access_key_id = Some(v);
        }
        if let Some(v) = first_env(&["AWS_SECRET_ACCESS_KEY", "AWS_SECRET_KEY"]) {
            config.secret_access_key = Some(v);
        }
        if let Some(v) = first_env(&["AWS_REGION", "AWS_DEFAULT_REGION"]) {
            config.region = v;
        }
        if let Ok(v) = std::env::var("AWSIGN_SERVICE") {
            config.service = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// The configured key pair.
    ///
    /// # Errors
    ///
    /// Fails if either half of the key pair is missing.
    pub fn credentials(&self) -> Result<Credentials> {
        let (Some(access_key_id), Some(secret_access_key)) =
            (&self.access_key_id, &self.secret_access_key)
        else {
            bail!("AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must both be set");
        };
        Ok(Credentials::new(access_key_id, secret_access_key))
    }

    /// The configured service scope.
    #[must_use]
    pub fn scope(&self) -> ServiceScope {
        ServiceScope::new(&self.service, &self.region)
    }
}

/// Return the first non-empty variable among `names`.
fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.is_empty())
}
