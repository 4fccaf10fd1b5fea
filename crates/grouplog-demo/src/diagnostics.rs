//! # Diagnostics
//!
//! grouplog reports its own bookkeeping (loggers registered, renamed,
//! disposed, configuration changes) through `tracing`. This module installs a
//! subscriber so those events become visible on stderr.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: filter (e.g. `RUST_LOG=grouplog=trace`), default `debug`

use std::io;
use std::str::FromStr;

use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Diagnostics output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticsFormat
{
    /// Human-readable, colored
    Pretty,
    /// Condensed single-line output without ANSI colors
    Compact,
}

impl FromStr for DiagnosticsFormat
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" => Ok(DiagnosticsFormat::Pretty),
            "compact" | "plain" => Ok(DiagnosticsFormat::Compact),
            _ => Err(format!("Unknown diagnostics format: {s}. Use 'pretty' or 'compact'")),
        }
    }
}

/// Diagnostics initialization error
#[derive(Debug, thiserror::Error)]
pub enum DiagnosticsError
{
    /// A subscriber is already installed, or the filter is unusable
    #[error("Failed to initialize diagnostics: {0}")]
    InitializationFailed(String),
}

/// Install a stderr subscriber for grouplog's internal events.
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_diagnostics(format: DiagnosticsFormat) -> Result<(), DiagnosticsError>
{
    // RUST_LOG can narrow or widen the default
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let layer = match format {
        DiagnosticsFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(true)
            .with_writer(io::stderr)
            .with_filter(env_filter)
            .boxed(),
        DiagnosticsFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false)
            .with_writer(io::stderr)
            .with_filter(env_filter)
            .boxed(),
    };

    Registry::default()
        .with(layer)
        .try_init()
        .map_err(|e| DiagnosticsError::InitializationFailed(e.to_string()))
}
