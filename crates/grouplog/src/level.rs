//! # Levels
//!
//! The catalog of severity levels and how each one is drawn.
//!
//! A [`Level`] is only a name. Its severity, icon and color live in a
//! [`LevelTable`], so the same level can rank differently under a replacement
//! table. Filtering always goes through the table: two levels compare by
//! severity, not by enum order, and `success`/`ok` share a rank.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crossterm::style::{Attribute, Color, Stylize, style};

use crate::error::{LoggerError, Result};

/// Named severity tier
///
/// Variants are declared in ascending severity of the standard table.
/// [`Level::All`] and [`Level::Off`] are sentinels: they make sense as a
/// filter threshold but are never the level of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level
{
    /// Threshold that lets everything through
    All,
    /// Finest-grained tracing
    Trace,
    /// Debugging information
    Debug,
    /// Development-only chatter
    Dev,
    /// Something worked
    Success,
    /// Something worked (shares severity with `Success`)
    Ok,
    /// Informational
    Info,
    /// Normal but noteworthy
    Notice,
    /// Warning
    Warning,
    /// Needs attention
    Alert,
    /// Error
    Error,
    /// Unexpected failure
    Exception,
    /// Critical condition
    Critical,
    /// Unrecoverable
    Fatal,
    /// Threshold that lets nothing through
    Off,
}

impl Level
{
    /// Every level, in declaration order.
    pub const ALL: [Level; 15] = [
        Level::All,
        Level::Trace,
        Level::Debug,
        Level::Dev,
        Level::Success,
        Level::Ok,
        Level::Info,
        Level::Notice,
        Level::Warning,
        Level::Alert,
        Level::Error,
        Level::Exception,
        Level::Critical,
        Level::Fatal,
        Level::Off,
    ];

    /// The lowercase name used in output tags and configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str
    {
        match self {
            Level::All => "all",
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Dev => "dev",
            Level::Success => "success",
            Level::Ok => "ok",
            Level::Info => "info",
            Level::Notice => "notice",
            Level::Warning => "warning",
            Level::Alert => "alert",
            Level::Error => "error",
            Level::Exception => "exception",
            Level::Critical => "critical",
            Level::Fatal => "fatal",
            Level::Off => "off",
        }
    }

    /// `true` for `all` and `off`, which are thresholds only.
    #[must_use]
    pub const fn is_sentinel(self) -> bool
    {
        matches!(self, Level::All | Level::Off)
    }
}

impl fmt::Display for Level
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level
{
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self>
    {
        let wanted = s.trim();
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LoggerError::InvalidLevel(s.to_string()))
    }
}

/// Bold foreground (and optional background) from the 256-color table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette
{
    /// Foreground color index.
    pub fg: u8,
    /// Background color index, if any.
    pub bg: Option<u8>,
}

impl Palette
{
    /// Bold text on the terminal background.
    #[must_use]
    pub const fn fg(fg: u8) -> Self
    {
        Self { fg, bg: None }
    }

    /// Bold text on a colored background.
    #[must_use]
    pub const fn fg_bg(fg: u8, bg: u8) -> Self
    {
        Self { fg, bg: Some(bg) }
    }

    /// Wrap `text` in the escape sequences for this palette.
    #[must_use]
    pub fn paint(&self, text: &str) -> String
    {
        let mut styled = style(text).with(Color::AnsiValue(self.fg)).attribute(Attribute::Bold);
        if let Some(bg) = self.bg {
            styled = styled.on(Color::AnsiValue(bg));
        }
        styled.to_string()
    }
}

/// Metadata attached to a level by a [`LevelTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelDef
{
    /// Rank used for filtering and stream routing.
    pub severity: u8,
    /// Single-character symbol shown when icons are enabled.
    pub icon: char,
    /// Color renderer, `None` when the level is never colored.
    pub palette: Option<Palette>,
}

impl LevelDef
{
    /// Create a level definition.
    #[must_use]
    pub const fn new(severity: u8, icon: char, palette: Option<Palette>) -> Self
    {
        Self { severity, icon, palette }
    }
}

const STANDARD: [(Level, LevelDef); 15] = [
    (Level::All, LevelDef::new(0, '~', Some(Palette::fg(242)))),
    (Level::Trace, LevelDef::new(10, 'T', Some(Palette::fg(242)))),
    (Level::Debug, LevelDef::new(15, 'D', Some(Palette::fg(246)))),
    (Level::Dev, LevelDef::new(20, 'V', Some(Palette::fg(250)))),
    (Level::Success, LevelDef::new(25, 'S', Some(Palette::fg(46)))),
    (Level::Ok, LevelDef::new(25, '✔', Some(Palette::fg(46)))),
    (Level::Info, LevelDef::new(30, 'I', Some(Palette::fg(33)))),
    (Level::Notice, LevelDef::new(35, 'N', Some(Palette::fg(87)))),
    (Level::Warning, LevelDef::new(40, 'W', Some(Palette::fg(208)))),
    (Level::Alert, LevelDef::new(45, 'A', Some(Palette::fg(199)))),
    (Level::Error, LevelDef::new(50, 'E', Some(Palette::fg(196)))),
    (Level::Exception, LevelDef::new(55, 'X', Some(Palette::fg(201)))),
    (Level::Critical, LevelDef::new(60, 'C', Some(Palette::fg_bg(196, 52)))),
    (Level::Fatal, LevelDef::new(65, 'F', Some(Palette::fg_bg(15, 52)))),
    (Level::Off, LevelDef::new(99, '-', None)),
];

/// Immutable catalog of level metadata
///
/// Tables are values: the builders consume `self` and return a new table, and
/// nothing edits a definition in place. Swapping the table that loggers
/// consult goes through [`ConfigUpdate::levels`](crate::ConfigUpdate::levels).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable
{
    defs: BTreeMap<Level, LevelDef>,
}

impl LevelTable
{
    /// The standard catalog: `all`=0 up to `fatal`=65, and `off`=99.
    #[must_use]
    pub fn standard() -> Self
    {
        Self {
            defs: STANDARD.into_iter().collect(),
        }
    }

    /// A table with no levels at all.
    #[must_use]
    pub fn empty() -> Self
    {
        Self { defs: BTreeMap::new() }
    }

    /// Return a copy of this table with `level` (re)defined.
    #[must_use]
    pub fn with(mut self, level: Level, def: LevelDef) -> Self
    {
        self.defs.insert(level, def);
        self
    }

    /// Return a copy of this table without `level`.
    #[must_use]
    pub fn without(mut self, level: Level) -> Self
    {
        self.defs.remove(&level);
        self
    }

    /// Definition of `level`.
    ///
    /// ## Errors
    ///
    /// `InvalidLevel` if this table does not declare `level`.
    pub fn get(&self, level: Level) -> Result<&LevelDef>
    {
        self.defs
            .get(&level)
            .ok_or_else(|| LoggerError::InvalidLevel(level.as_str().to_string()))
    }

    /// Resolve a level by name and return it with its definition.
    ///
    /// ## Errors
    ///
    /// `InvalidLevel` if the name is unknown or not declared in this table.
    pub fn lookup(&self, name: &str) -> Result<(Level, &LevelDef)>
    {
        let level: Level = name.parse()?;
        Ok((level, self.get(level)?))
    }

    /// Severity of `level`.
    ///
    /// ## Errors
    ///
    /// `InvalidLevel` if this table does not declare `level`.
    pub fn severity(&self, level: Level) -> Result<u8>
    {
        self.get(level).map(|def| def.severity)
    }

    /// `true` if this table declares `level`.
    #[must_use]
    pub fn contains(&self, level: Level) -> bool
    {
        self.defs.contains_key(&level)
    }

    /// Declared levels with their definitions, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Level, &LevelDef)>
    {
        self.defs.iter().map(|(level, def)| (*level, def))
    }

    /// Number of declared levels.
    #[must_use]
    pub fn len(&self) -> usize
    {
        self.defs.len()
    }

    /// `true` if no level is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.defs.is_empty()
    }
}

impl Default for LevelTable
{
    fn default() -> Self
    {
        Self::standard()
    }
}
