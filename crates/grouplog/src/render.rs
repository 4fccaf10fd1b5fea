//! # Rendering
//!
//! Turns a log call into text. Everything here is a pure function of the
//! configuration snapshot, so the output can be checked without a clock or a
//! terminal.
//!
//! A line looks like:
//!
//! ```text
//! 2024-01-02 03:04:05.067 [app|info] message
//! ^ timestamp (optional)  ^ tag      ^ message
//! ```
//!
//! When color is on, the tag and message are painted with the level's palette;
//! the timestamp never is.

use std::fmt::Debug;

use chrono::NaiveDateTime;
use crossterm::style::{Color, Stylize, style};

use crate::config::GlobalConfig;
use crate::error::Result;
use crate::level::Level;
use crate::sink::Stream;

/// Color used for data dumps when color is enabled.
const DATA_COLOR: Color = Color::AnsiValue(244);

/// A log call rendered and routed, ready to hand to a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered
{
    /// Stream chosen by the error threshold.
    pub stream: Stream,
    /// The log line, without trailing newline.
    pub line: String,
    /// Pretty-printed data, without trailing newline.
    pub data: Option<String>,
}

/// Format `now` as `YYYY-MM-DD HH:MM:SS` with an optional `.mmm` suffix.
#[must_use]
pub fn format_timestamp(now: NaiveDateTime, milli: bool) -> String
{
    if milli {
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    } else {
        now.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// The bracketed tag: `[group|symbol]`, or `[symbol]` with groups hidden.
///
/// ## Errors
///
/// `InvalidLevel` if the level is missing from the configured table.
pub fn tag(config: &GlobalConfig, group: &str, level: Level) -> Result<String>
{
    let symbol = if config.icons {
        config.levels.get(level)?.icon.to_string()
    } else {
        level.as_str().to_string()
    };

    Ok(if config.group {
        format!("[{group}|{symbol}]")
    } else {
        format!("[{symbol}]")
    })
}

/// Stream a message of `level` is routed to.
///
/// ## Errors
///
/// `InvalidLevel` if the level is missing from the configured table.
pub fn stream_for(config: &GlobalConfig, level: Level) -> Result<Stream>
{
    let severity = config.levels.severity(level)?;
    Ok(if severity < config.error_threshold {
        Stream::Stdout
    } else {
        Stream::Stderr
    })
}

/// Render a full log call.
///
/// ## Errors
///
/// `InvalidLevel` if the level is missing from the configured table.
pub fn render(
    config: &GlobalConfig,
    group: &str,
    level: Level,
    message: &str,
    data: Option<&dyn Debug>,
    now: NaiveDateTime,
) -> Result<Rendered>
{
    let def = config.levels.get(level)?;

    let mut body = format!("{} {message}", tag(config, group, level)?);
    if let Some(palette) = def.palette.filter(|_| config.color) {
        body = palette.paint(&body);
    }

    let line = if config.timestamp {
        format!("{} {body}", format_timestamp(now, config.milli))
    } else {
        body
    };

    let data = data.map(|data| {
        let dump = format!("{data:#?}");
        if config.color {
            style(dump).with(DATA_COLOR).to_string()
        } else {
            dump
        }
    });

    Ok(Rendered {
        stream: stream_for(config, level)?,
        line,
        data,
    })
}
