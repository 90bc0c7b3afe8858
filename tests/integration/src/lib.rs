//! Integration tests for awsign SigV4 signing.
//!
//! The `testsuite/` directory holds request fixtures in the layout of the
//! AWS SigV4 test suite. Each case `<name>` has four files:
//!
//! | File | Contents |
//! |------|----------|
//! | `<name>.req` | Raw HTTP/1.1 request to sign |
//! | `<name>.creq` | Expected canonical request |
//! | `<name>.sts` | Expected string to sign |
//! | `<name>.authz` | Expected `Authorization` header value |
//!
//! Every case is signed with [`test_credentials`] in [`test_scope`].
//!
//! Run them with:
//! ```text
//! cargo test -p awsign-integration
//! ```

use std::path::PathBuf;
use std::sync::Once;

use anyhow::{Context, Result};
use awsign_sigv4::{Credentials, ServiceScope};

mod test_concurrency;
mod test_properties;
mod test_testsuite;

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Access key ID used throughout the AWS SigV4 test suite.
pub const TEST_ACCESS_KEY_ID: &str = "AKIDEXAMPLE";

/// Secret access key used throughout the AWS SigV4 test suite.
pub const TEST_SECRET_ACCESS_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

/// Credentials the fixtures were signed with.
#[must_use]
pub fn test_credentials() -> Credentials {
    Credentials::new(TEST_ACCESS_KEY_ID, TEST_SECRET_ACCESS_KEY)
}

/// Scope the fixtures were signed in.
#[must_use]
pub fn test_scope() -> ServiceScope {
    ServiceScope::new("service", "us-east-1")
}

/// Directory holding the fixture files.
#[must_use]
pub fn testsuite_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testsuite")
}

/// Names of all fixture cases, sorted.
///
/// # Errors
///
/// Fails if the fixture directory cannot be listed.
pub fn fixture_names() -> Result<Vec<String>> {
    let dir = testsuite_dir();
    let mut names = Vec::new();
    for entry in std::fs::read_dir(&dir)
        .with_context(|| format!("failed to list fixtures in {}", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "req") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_owned());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Read one file of a fixture case, e.g. `read_fixture("get-vanilla", "creq")`.
///
/// # Errors
///
/// Fails if the file is missing or not UTF-8.
pub fn read_fixture(name: &str, ext: &str) -> Result<String> {
    let path = testsuite_dir().join(format!("{name}.{ext}"));
    std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture {}", path.display()))
}
