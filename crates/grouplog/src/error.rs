//! # Error Types
//!
//! Every fallible grouplog operation returns [`LoggerError`].
//!
//! These are programmer-error conditions (a bad level name, a taken group
//! name). They are raised at the call that violates the precondition and are
//! never retried or downgraded to a default.

use thiserror::Error;

/// Main error type for logger operations
#[derive(Error, Debug)]
pub enum LoggerError
{
    /// Malformed input to the logger factory or configuration parser
    ///
    /// Examples:
    /// - An empty group name
    /// - An unknown configuration key in `key=value` form
    /// - A boolean option that is not `true`/`false`/`1`/`0`/...
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A level name that is not declared in the active level table
    ///
    /// Also raised when neither the logger nor the global configuration
    /// carries a level, so no effective threshold exists.
    #[error("Invalid level: {0}")]
    InvalidLevel(String),

    /// Renaming a logger to a group name that is already registered
    #[error("Group already exists: {0}")]
    GroupExists(String),

    /// The registry that created this logger has been dropped
    #[error("Logger registry has been dropped")]
    RegistryDropped,

    /// Writing to an output stream failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, LoggerError>`
///
/// ```rust
/// use grouplog::Result;
/// fn foo() -> Result<()>
/// {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, LoggerError>;
