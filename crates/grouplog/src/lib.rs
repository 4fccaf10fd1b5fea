//! # grouplog
//!
//! Console logging with named logger groups.
//!
//! - One [`Logger`] per group, kept in a [`Registry`]
//! - Severity filtering with a per-logger level that falls back to a global one
//! - Colored or iconified tags, optional timestamps
//! - Lines below the error threshold go to stdout, the rest to stderr
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grouplog::{ConfigUpdate, Level};
//!
//! grouplog::configure(ConfigUpdate::new().level(Level::Trace));
//!
//! let app = grouplog::logger("app")?;
//! let api = app.spawn("api")?;
//!
//! app.info("server starting")?;
//! api.set_level(Some(Level::Warning))?;
//! api.info("dropped")?;
//! api.error_with("request failed", &vec![("status", 502)])?;
//! # Ok::<(), grouplog::LoggerError>(())
//! ```
//!
//! ## Global level
//!
//! The global level starts out unset. Until one is configured (or a logger
//! sets its own), logging calls fail with [`LoggerError::InvalidLevel`]
//! rather than silently picking a default. [`init_from_env`] or
//! [`configure`] are the usual places to set it.
//!
//! To log everything, set it to `trace`, either with
//! `configure(ConfigUpdate::new().level(Level::Trace))` or with
//! `GROUPLOG_LEVEL=trace` in the environment followed by [`init_from_env`].

pub mod config;
pub mod error;
pub mod level;
pub mod logger;
pub mod prelude;
pub mod registry;
pub mod render;
pub mod sink;

use std::sync::Arc;

use once_cell::sync::Lazy;

pub use config::{ConfigUpdate, GlobalConfig};
pub use error::{LoggerError, Result};
pub use level::{Level, LevelDef, LevelTable, Palette};
pub use logger::{LocalConfig, Logger};
pub use registry::{DEFAULT_GROUP, LoggerId, LoggerSpec, Registry};
pub use sink::{CaptureSink, ConsoleSink, Sink, Stream};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct ReadmeDoctests;

static DEFAULT_REGISTRY: Lazy<Registry> = Lazy::new(Registry::default);

/// The process-wide registry, writing to stdout/stderr.
#[must_use]
pub fn registry() -> &'static Registry
{
    &DEFAULT_REGISTRY
}

/// Resolve a logger in the process-wide registry.
///
/// ```rust
/// let a = grouplog::logger("docs")?;
/// let b = grouplog::logger("docs")?;
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// # Ok::<(), grouplog::LoggerError>(())
/// ```
///
/// ## Errors
///
/// See [`Registry::resolve`].
pub fn logger(spec: impl Into<LoggerSpec>) -> Result<Arc<Logger>>
{
    DEFAULT_REGISTRY.resolve(spec)
}

/// Shallow-merge `update` into the process-wide configuration.
pub fn configure(update: ConfigUpdate)
{
    DEFAULT_REGISTRY.configure(update);
}

/// Apply `GROUPLOG_CONFIG`, `GROUPLOG_LEVEL` and `NO_COLOR` to the
/// process-wide configuration.
///
/// ## Errors
///
/// Fails without changing anything if a variable holds an invalid value.
pub fn init_from_env() -> Result<()>
{
    let update = ConfigUpdate::from_env()?;
    if !update.is_empty() {
        configure(update);
    }
    Ok(())
}
