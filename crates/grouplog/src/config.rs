//! # Configuration
//!
//! [`GlobalConfig`] is shared by every logger of a registry. It is changed by
//! merging a [`ConfigUpdate`] into it: fields present in the update replace
//! the current value, absent fields are left alone.
//!
//! ## Text form
//!
//! Updates can also be written as comma-separated `key=value` pairs, which is
//! what the environment and the demo CLI use:
//!
//! ```rust
//! use grouplog::{ConfigUpdate, Level};
//!
//! let update: ConfigUpdate = "level=warning, icons=true".parse().unwrap();
//! assert_eq!(update.level, Some(Some(Level::Warning)));
//! assert_eq!(update.icons, Some(true));
//! ```
//!
//! Unknown keys are rejected with `InvalidArgument`.
//!
//! ## Environment Variables
//!
//! - `GROUPLOG_CONFIG`: pairs in text form (e.g. `level=info,color=false`)
//! - `GROUPLOG_LEVEL`: shorthand for `level=...`
//! - `NO_COLOR`: when set and non-empty, disables color

use std::env;
use std::str::FromStr;

use crate::error::{LoggerError, Result};
use crate::level::{Level, LevelTable};

/// Settings shared by all loggers of a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfig
{
    /// Master switch; `false` mutes every logger.
    pub enabled: bool,
    /// Threshold for loggers without a local level.
    ///
    /// Defaults to `None`. A logger with no local level then has no effective
    /// threshold and its logging calls fail with `InvalidLevel` until a level
    /// is set somewhere.
    pub level: Option<Level>,
    /// Show the group name in the tag.
    pub group: bool,
    /// Prefix lines with a timestamp.
    pub timestamp: bool,
    /// Include milliseconds in the timestamp.
    pub milli: bool,
    /// Colorize lines and data dumps.
    pub color: bool,
    /// Show level icons instead of level names.
    pub icons: bool,
    /// Level catalog used for filtering and rendering.
    pub levels: LevelTable,
    /// Severities at or above this go to stderr, the rest to stdout.
    pub error_threshold: u8,
}

impl Default for GlobalConfig
{
    fn default() -> Self
    {
        Self {
            enabled: true,
            level: None,
            group: true,
            timestamp: true,
            milli: true,
            color: true,
            icons: false,
            levels: LevelTable::standard(),
            error_threshold: 40,
        }
    }
}

/// Partial [`GlobalConfig`]; `None` fields are left untouched by [`apply`](Self::apply)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate
{
    /// New master switch.
    pub enabled: Option<bool>,
    /// New global level; `Some(None)` clears it.
    pub level: Option<Option<Level>>,
    /// New group-tag flag.
    pub group: Option<bool>,
    /// New timestamp flag.
    pub timestamp: Option<bool>,
    /// New millisecond flag.
    pub milli: Option<bool>,
    /// New color flag.
    pub color: Option<bool>,
    /// New icon flag.
    pub icons: Option<bool>,
    /// Replacement level table.
    pub levels: Option<LevelTable>,
    /// New stderr routing threshold.
    pub error_threshold: Option<u8>,
}

impl ConfigUpdate
{
    /// An update that changes nothing.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Set the master switch.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self
    {
        self.enabled = Some(enabled);
        self
    }

    /// Set the global level.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self
    {
        self.level = Some(Some(level));
        self
    }

    /// Clear the global level.
    #[must_use]
    pub fn clear_level(mut self) -> Self
    {
        self.level = Some(None);
        self
    }

    /// Show or hide the group tag.
    #[must_use]
    pub fn group(mut self, group: bool) -> Self
    {
        self.group = Some(group);
        self
    }

    /// Show or hide timestamps.
    #[must_use]
    pub fn timestamp(mut self, timestamp: bool) -> Self
    {
        self.timestamp = Some(timestamp);
        self
    }

    /// Show or hide milliseconds.
    #[must_use]
    pub fn milli(mut self, milli: bool) -> Self
    {
        self.milli = Some(milli);
        self
    }

    /// Enable or disable color.
    #[must_use]
    pub fn color(mut self, color: bool) -> Self
    {
        self.color = Some(color);
        self
    }

    /// Use icons instead of level names.
    #[must_use]
    pub fn icons(mut self, icons: bool) -> Self
    {
        self.icons = Some(icons);
        self
    }

    /// Replace the level table. Loggers whose level is missing from the new
    /// table will fail with `InvalidLevel`.
    #[must_use]
    pub fn levels(mut self, levels: LevelTable) -> Self
    {
        self.levels = Some(levels);
        self
    }

    /// Set the stderr routing threshold.
    #[must_use]
    pub fn error_threshold(mut self, severity: u8) -> Self
    {
        self.error_threshold = Some(severity);
        self
    }

    /// `true` if applying this update would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        *self == Self::default()
    }

    /// Fold `other` into `self`; fields set in `other` win.
    #[must_use]
    pub fn merge(self, other: ConfigUpdate) -> Self
    {
        Self {
            enabled: other.enabled.or(self.enabled),
            level: other.level.or(self.level),
            group: other.group.or(self.group),
            timestamp: other.timestamp.or(self.timestamp),
            milli: other.milli.or(self.milli),
            color: other.color.or(self.color),
            icons: other.icons.or(self.icons),
            levels: other.levels.or(self.levels),
            error_threshold: other.error_threshold.or(self.error_threshold),
        }
    }

    /// Shallow-merge this update into `config`.
    pub fn apply(self, config: &mut GlobalConfig)
    {
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(group) = self.group {
            config.group = group;
        }
        if let Some(timestamp) = self.timestamp {
            config.timestamp = timestamp;
        }
        if let Some(milli) = self.milli {
            config.milli = milli;
        }
        if let Some(color) = self.color {
            config.color = color;
        }
        if let Some(icons) = self.icons {
            config.icons = icons;
        }
        if let Some(levels) = self.levels {
            config.levels = levels;
        }
        if let Some(error_threshold) = self.error_threshold {
            config.error_threshold = error_threshold;
        }
    }

    /// Parse a single `key=value` pair into an update.
    ///
    /// ## Errors
    ///
    /// - `InvalidArgument` for a missing `=`, an unknown key or a bad value
    /// - `InvalidLevel` for an unknown level name
    pub fn parse_assignment(assignment: &str) -> Result<Self>
    {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| LoggerError::InvalidArgument(format!("expected key=value, got `{assignment}`")))?;
        let key = key.trim();
        let value = value.trim();
        let update = Self::new();

        let update = match key {
            "enabled" => update.enabled(parse_bool(key, value)?),
            "level" => match value.to_ascii_lowercase().as_str() {
                "" | "none" | "null" => update.clear_level(),
                _ => update.level(value.parse()?),
            },
            "group" => update.group(parse_bool(key, value)?),
            "timestamp" => update.timestamp(parse_bool(key, value)?),
            "milli" => update.milli(parse_bool(key, value)?),
            "color" => update.color(parse_bool(key, value)?),
            "icons" => update.icons(parse_bool(key, value)?),
            "error_threshold" | "errorThreshold" => update.error_threshold(value.parse().map_err(|_| {
                LoggerError::InvalidArgument(format!("{key}: expected a severity between 0 and 255, got `{value}`"))
            })?),
            _ => return Err(LoggerError::InvalidArgument(format!("unknown configuration key `{key}`"))),
        };
        Ok(update)
    }

    /// Read the update described by the process environment.
    ///
    /// ## Errors
    ///
    /// Fails if `GROUPLOG_CONFIG` or `GROUPLOG_LEVEL` holds an invalid value.
    pub fn from_env() -> Result<Self>
    {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading variables through `lookup`.
    ///
    /// `GROUPLOG_LEVEL` overrides a `level` inside `GROUPLOG_CONFIG`, and
    /// `NO_COLOR` overrides both.
    ///
    /// ## Errors
    ///
    /// Fails if `GROUPLOG_CONFIG` or `GROUPLOG_LEVEL` holds an invalid value.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut update = match lookup("GROUPLOG_CONFIG") {
            Some(text) => text.parse()?,
            None => Self::new(),
        };
        if let Some(level) = lookup("GROUPLOG_LEVEL") {
            update = update.merge(Self::parse_assignment(&format!("level={level}"))?);
        }
        if lookup("NO_COLOR").is_some_and(|value| !value.is_empty()) {
            update = update.color(false);
        }
        Ok(update)
    }
}

impl FromStr for ConfigUpdate
{
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self>
    {
        s.split(',')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .try_fold(Self::new(), |update, pair| Ok(update.merge(Self::parse_assignment(pair)?)))
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool>
{
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(LoggerError::InvalidArgument(format!("{key}: expected a boolean, got `{value}`"))),
    }
}
