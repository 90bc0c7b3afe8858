//! awsign - sign raw HTTP requests with AWS Signature Version 4.
//!
//! Reads an HTTP/1.1 request, signs it with the configured key pair and
//! service scope, and writes the signed request (or the signing artifacts)
//! to stdout. Diagnostics go to stderr.
//!
//! # Usage
//!
//! ```text
//! AWS_ACCESS_KEY_ID=AKIDEXAMPLE AWS_SECRET_ACCESS_KEY=... \
//!     AWSIGN_SERVICE=dynamodb awsign --stamp request.txt
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AWS_ACCESS_KEY_ID` | *(required)* | Access key ID (`AWS_ACCESS_KEY` also accepted) |
//! | `AWS_SECRET_ACCESS_KEY` | *(required)* | Secret key (`AWS_SECRET_KEY` also accepted) |
//! | `AWS_REGION` | `us-east-1` | Signing region (`AWS_DEFAULT_REGION` also accepted) |
//! | `AWSIGN_SERVICE` | `execute-api` | Signing service name |
//! | `LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod cli;
mod config;

use std::io::Read;

use anyhow::{Context, Result};
use awsign_sigv4::raw::{parse_raw_request, render_raw_request};
use awsign_sigv4::{RequestTimestamp, SignError, TimestampSource, resolve_timestamp, sign};
use http::{HeaderValue, Request};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{CliArgs, USAGE};
use crate::config::SignerConfig;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Read the raw request from `path`, or stdin when `None`.
fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request from {path}")),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read request from stdin")?;
            Ok(raw)
        }
    }
}

/// Add `X-Amz-Date` set to `now` when the request has no timestamp header.
///
/// Returns whether a header was added. A timestamp that is present but
/// malformed is left alone so that signing reports it.
fn stamp_if_missing<B>(request: &mut Request<B>, now: RequestTimestamp) -> Result<bool> {
    match resolve_timestamp(request.headers()) {
        Err(SignError::MissingTimestamp) => {
            let value = HeaderValue::from_str(&now.to_basic())
                .context("formatted timestamp is not a valid header value")?;
            request
                .headers_mut()
                .insert(TimestampSource::AmzDate.header_name(), value);
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse(std::env::args().skip(1))?;
    if args.help {
        print!("{USAGE}");
        return Ok(());
    }

    let config = SignerConfig::from_env();
    init_tracing(&config.log_level)?;
    debug!(
        region = %config.region,
        service = %config.service,
        "loaded configuration",
    );

    let credentials = config.credentials()?;
    let scope = config.scope();

    let raw = read_input(args.input.as_deref())?;
    let mut request = parse_raw_request(&raw).context("failed to parse request")?;

    if args.stamp && stamp_if_missing(&mut request, RequestTimestamp::now())? {
        debug!("added x-amz-date to unstamped request");
    }

    let artifacts = sign(&credentials, &scope, &mut request).context("failed to sign request")?;
    info!(
        method = %request.method(),
        uri = %request.uri(),
        service = %scope.service(),
        region = %scope.region(),
        "signed request",
    );

    if args.json {
        let json = serde_json::to_string_pretty(&artifacts)
            .context("failed to serialize signing artifacts")?;
        println!("{json}");
    } else {
        print!("{}", render_raw_request(&request));
    }

    Ok(())
}
