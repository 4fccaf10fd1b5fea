//! # Logger Registry
//!
//! One [`Logger`] per group name. Resolving a name that is already registered
//! hands back the same instance; resolving a new name creates and registers
//! one.
//!
//! Loggers are indexed twice: by an opaque [`LoggerId`] allocated at creation,
//! and by their current group name. Renames and disposal go through the id,
//! so a handle that outlived its registration can never rename or remove
//! whichever logger holds its old name now.
//!
//! ## Locking
//!
//! The index lock is always taken before a logger's local lock or the config
//! lock, never after.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace, warn};

use crate::config::{ConfigUpdate, GlobalConfig};
use crate::error::{LoggerError, Result};
use crate::level::Level;
use crate::logger::{LocalConfig, Logger};
use crate::sink::{ConsoleSink, Sink};

/// Group used when none is given.
pub const DEFAULT_GROUP: &str = "app";

/// Identifier of a logger, stable across renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoggerId(u64);

impl LoggerId
{
    /// Create an identifier from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self
    {
        Self(value)
    }

    /// Raw numeric value (useful for logging / errors).
    #[must_use]
    pub const fn raw(self) -> u64
    {
        self.0
    }
}

impl fmt::Display for LoggerId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "#{}", self.0)
    }
}

/// What to resolve: a group name and the local level for a new logger
///
/// The level only matters when the group is not registered yet; resolving an
/// existing group ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggerSpec
{
    /// Group name; `None` means `"app"`.
    pub group: Option<String>,
    /// Local level of a newly created logger; `None` follows the global level.
    pub level: Option<Level>,
}

impl From<&str> for LoggerSpec
{
    fn from(group: &str) -> Self
    {
        Self {
            group: Some(group.to_string()),
            level: None,
        }
    }
}

impl From<String> for LoggerSpec
{
    fn from(group: String) -> Self
    {
        Self {
            group: Some(group),
            level: None,
        }
    }
}

impl From<(&str, Level)> for LoggerSpec
{
    fn from((group, level): (&str, Level)) -> Self
    {
        Self {
            group: Some(group.to_string()),
            level: Some(level),
        }
    }
}

impl From<(String, Level)> for LoggerSpec
{
    fn from((group, level): (String, Level)) -> Self
    {
        Self {
            group: Some(group),
            level: Some(level),
        }
    }
}

impl From<(&str, Option<Level>)> for LoggerSpec
{
    fn from((group, level): (&str, Option<Level>)) -> Self
    {
        Self {
            group: Some(group.to_string()),
            level,
        }
    }
}

/// Reject group names that would render as an empty tag.
pub(crate) fn validate_group(name: &str) -> Result<()>
{
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidArgument("group name must not be empty".to_string()));
    }
    Ok(())
}

/// Configuration and output shared by every logger of a registry.
pub(crate) struct Context
{
    config: RwLock<GlobalConfig>,
    sink: Arc<dyn Sink>,
}

impl Context
{
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, GlobalConfig>
    {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, GlobalConfig>
    {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn sink(&self) -> &dyn Sink
    {
        self.sink.as_ref()
    }

    pub(crate) fn configure(&self, update: ConfigUpdate)
    {
        if update.levels.is_some() {
            warn!("replacing the level table");
        }
        debug!(
            enabled = ?update.enabled,
            level = ?update.level,
            color = ?update.color,
            icons = ?update.icons,
            "global config updated"
        );
        update.apply(&mut self.write());
    }
}

struct Entry
{
    name: String,
    logger: Arc<Logger>,
}

/// id → (name, logger) and name → id, kept in step.
#[derive(Default)]
pub(crate) struct Index
{
    next_id: u64,
    by_id: HashMap<LoggerId, Entry>,
    by_name: HashMap<String, LoggerId>,
}

impl Index
{
    fn allocate_id(&mut self) -> LoggerId
    {
        self.next_id = self.next_id.wrapping_add(1);
        LoggerId::from_raw(self.next_id)
    }

    fn get(&self, name: &str) -> Option<Arc<Logger>>
    {
        let id = self.by_name.get(name)?;
        self.by_id.get(id).map(|entry| Arc::clone(&entry.logger))
    }

    fn insert(&mut self, id: LoggerId, name: String, logger: Arc<Logger>)
    {
        self.by_name.insert(name.clone(), id);
        self.by_id.insert(id, Entry { name, logger });
    }

    pub(crate) fn contains_id(&self, id: LoggerId) -> bool
    {
        self.by_id.contains_key(&id)
    }

    /// Move `id` to `new_name`. Returns the old name, or `None` if `id` is
    /// not registered (the name is still checked for collisions).
    pub(crate) fn rename(&mut self, id: LoggerId, new_name: &str) -> Result<Option<String>>
    {
        if self.by_name.contains_key(new_name) {
            return Err(LoggerError::GroupExists(new_name.to_string()));
        }
        let Some(entry) = self.by_id.get_mut(&id) else {
            return Ok(None);
        };
        let old = std::mem::replace(&mut entry.name, new_name.to_string());
        self.by_name.remove(&old);
        self.by_name.insert(new_name.to_string(), id);
        Ok(Some(old))
    }

    /// Remove `id`, returning the name it was registered under.
    pub(crate) fn remove(&mut self, id: LoggerId) -> Option<String>
    {
        let entry = self.by_id.remove(&id)?;
        self.by_name.remove(&entry.name);
        Some(entry.name)
    }
}

pub(crate) struct RegistryShared
{
    context: Arc<Context>,
    index: Mutex<Index>,
}

impl RegistryShared
{
    pub(crate) fn index(&self) -> MutexGuard<'_, Index>
    {
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shared map from group name to [`Logger`]
///
/// Cloning a `Registry` yields another handle to the same loggers and the
/// same [`GlobalConfig`].
///
/// ```rust
/// use std::sync::Arc;
///
/// use grouplog::{ConfigUpdate, Level, Registry};
///
/// let registry = Registry::default();
/// registry.configure(ConfigUpdate::new().level(Level::Info));
///
/// let app = registry.resolve("app").unwrap();
/// let again = registry.resolve(("app", Level::Fatal)).unwrap();
/// assert!(Arc::ptr_eq(&app, &again));
/// assert_eq!(again.level(), None);
/// ```
#[derive(Clone)]
pub struct Registry
{
    shared: Arc<RegistryShared>,
}

impl Registry
{
    /// Create a registry writing to the process stdout/stderr.
    #[must_use]
    pub fn new(config: GlobalConfig) -> Self
    {
        Self::with_sink(config, Arc::new(ConsoleSink))
    }

    /// Create a registry writing to `sink`.
    #[must_use]
    pub fn with_sink(config: GlobalConfig, sink: Arc<dyn Sink>) -> Self
    {
        let context = Context {
            config: RwLock::new(config),
            sink,
        };
        Self {
            shared: Arc::new(RegistryShared {
                context: Arc::new(context),
                index: Mutex::new(Index::default()),
            }),
        }
    }

    pub(crate) fn from_shared(shared: Arc<RegistryShared>) -> Self
    {
        Self { shared }
    }

    /// Return the logger registered for the requested group, creating it if
    /// needed.
    ///
    /// On a cache hit the requested level is ignored and the existing instance is
    /// returned unchanged.
    ///
    /// ## Errors
    ///
    /// - `InvalidArgument` if the group name is empty
    /// - `InvalidLevel` if a new logger's level is not in the level table
    pub fn resolve(&self, spec: impl Into<LoggerSpec>) -> Result<Arc<Logger>>
    {
        let LoggerSpec { group, level } = spec.into();
        let group = group.unwrap_or_else(|| DEFAULT_GROUP.to_string());
        validate_group(&group)?;

        let mut index = self.shared.index();
        if let Some(existing) = index.get(&group) {
            trace!(group = %group, "logger resolved from registry");
            return Ok(existing);
        }
        if let Some(level) = level {
            self.shared.context.read().levels.get(level)?;
        }

        let id = index.allocate_id();
        let logger = Arc::new(Logger::new(
            id,
            LocalConfig::new(group.clone(), level),
            Arc::clone(&self.shared.context),
            Arc::downgrade(&self.shared),
        ));
        index.insert(id, group.clone(), Arc::clone(&logger));
        debug!(group = %group, %id, "logger registered");
        Ok(logger)
    }

    /// The logger registered under `group`, without creating one.
    #[must_use]
    pub fn get(&self, group: &str) -> Option<Arc<Logger>>
    {
        self.shared.index().get(group)
    }

    /// `true` if a logger is registered under `group`.
    #[must_use]
    pub fn contains(&self, group: &str) -> bool
    {
        self.shared.index().by_name.contains_key(group)
    }

    /// Registered group names, sorted.
    #[must_use]
    pub fn groups(&self) -> Vec<String>
    {
        let mut groups: Vec<String> = self.shared.index().by_name.keys().cloned().collect();
        groups.sort();
        groups
    }

    /// Number of registered loggers.
    #[must_use]
    pub fn len(&self) -> usize
    {
        self.shared.index().by_id.len()
    }

    /// `true` if no logger is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.shared.index().by_id.is_empty()
    }

    /// Shallow-merge `update` into the global configuration.
    pub fn configure(&self, update: ConfigUpdate)
    {
        self.shared.context.configure(update);
    }

    /// Snapshot of the global configuration.
    #[must_use]
    pub fn config(&self) -> GlobalConfig
    {
        self.shared.context.read().clone()
    }
}

impl Default for Registry
{
    fn default() -> Self
    {
        Self::new(GlobalConfig::default())
    }
}

impl fmt::Debug for Registry
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Registry").field("groups", &self.groups()).finish_non_exhaustive()
    }
}
