//! # Logger
//!
//! A [`Logger`] is one named group. It owns its local settings and shares the
//! global configuration and output sink with every other logger of its
//! registry.
//!
//! ## Filtering
//!
//! Each call is decided fresh from the current settings:
//!
//! 1. A paused logger, or a paused registry, emits nothing.
//! 2. The threshold is the logger's own level if set, else the global level.
//! 3. A message passes if its severity is at least the threshold's severity.
//!
//! If neither the logger nor the global configuration has a level there is no
//! threshold, and the call fails with `InvalidLevel` instead of guessing one.

use std::fmt::{self, Debug};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::Local;
use tracing::{debug, trace};

use crate::config::{ConfigUpdate, GlobalConfig};
use crate::error::{LoggerError, Result};
use crate::level::Level;
use crate::registry::{Context, LoggerId, LoggerSpec, Registry, RegistryShared, validate_group};
use crate::render::render;

/// Settings owned by a single logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalConfig
{
    /// `false` while the logger is paused.
    pub enabled: bool,
    /// Local threshold; `None` follows the global level.
    pub level: Option<Level>,
    /// Group name shown in the tag.
    pub group: String,
}

impl LocalConfig
{
    pub(crate) fn new(group: String, level: Option<Level>) -> Self
    {
        Self {
            enabled: true,
            level,
            group,
        }
    }
}

/// Named logger handle
///
/// Obtained from [`Registry::resolve`] or [`crate::logger`]. Handles are
/// shared (`Arc<Logger>`); resolving the same group twice gives the same
/// instance.
pub struct Logger
{
    id: LoggerId,
    local: Mutex<LocalConfig>,
    context: Arc<Context>,
    registry: Weak<RegistryShared>,
}

impl Logger
{
    pub(crate) fn new(id: LoggerId, local: LocalConfig, context: Arc<Context>, registry: Weak<RegistryShared>) -> Self
    {
        Self {
            id,
            local: Mutex::new(local),
            context,
            registry,
        }
    }

    fn local(&self) -> MutexGuard<'_, LocalConfig>
    {
        self.local.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn shared(&self) -> Result<Arc<RegistryShared>>
    {
        self.registry.upgrade().ok_or(LoggerError::RegistryDropped)
    }

    /// Registry-assigned identifier; does not change on rename.
    #[must_use]
    pub fn id(&self) -> LoggerId
    {
        self.id
    }

    /// Current group name.
    #[must_use]
    pub fn group(&self) -> String
    {
        self.local().group.clone()
    }

    /// Local level, `None` when following the global level.
    #[must_use]
    pub fn level(&self) -> Option<Level>
    {
        self.local().level
    }

    /// `false` while paused.
    #[must_use]
    pub fn is_enabled(&self) -> bool
    {
        self.local().enabled
    }

    /// Snapshot of the local settings.
    #[must_use]
    pub fn local_config(&self) -> LocalConfig
    {
        self.local().clone()
    }

    /// `true` until [`dispose`](Self::dispose) is called (or the registry is dropped).
    #[must_use]
    pub fn is_registered(&self) -> bool
    {
        self.registry
            .upgrade()
            .is_some_and(|shared| shared.index().contains_id(self.id))
    }

    /// Handle to the registry this logger belongs to.
    ///
    /// ## Errors
    ///
    /// `RegistryDropped` if the registry no longer exists.
    pub fn registry(&self) -> Result<Registry>
    {
        self.shared().map(Registry::from_shared)
    }

    /// Set the local level; `None` defers to the global level.
    ///
    /// ## Errors
    ///
    /// `InvalidLevel` if the level is not in the level table. The local level
    /// is left unchanged.
    pub fn set_level(&self, level: Option<Level>) -> Result<()>
    {
        if let Some(level) = level {
            self.context.read().levels.get(level)?;
        }
        self.local().level = level;
        trace!(group = %self.group(), ?level, "local level set");
        Ok(())
    }

    /// Like [`set_level`](Self::set_level), by level name.
    ///
    /// ## Errors
    ///
    /// `InvalidLevel` for an unknown name; the local level is left unchanged.
    pub fn set_level_name(&self, name: Option<&str>) -> Result<()>
    {
        let level = name.map(str::parse::<Level>).transpose()?;
        self.set_level(level)
    }

    /// Set the global level, affecting every logger that follows it.
    ///
    /// Unlike [`set_level`](Self::set_level) there is no way to clear it here;
    /// use [`ConfigUpdate::clear_level`] for that.
    ///
    /// ## Errors
    ///
    /// `InvalidLevel` if the level is not in the level table.
    pub fn set_global_level(&self, level: Level) -> Result<()>
    {
        let mut config = self.context.write();
        config.levels.get(level)?;
        config.level = Some(level);
        debug!(%level, "global level set");
        Ok(())
    }

    /// Like [`set_global_level`](Self::set_global_level), by level name.
    ///
    /// ## Errors
    ///
    /// `InvalidLevel` for an unknown name.
    pub fn set_global_level_name(&self, name: &str) -> Result<()>
    {
        self.set_global_level(name.parse()?)
    }

    /// Rename this logger's group.
    ///
    /// Fails if `name` is registered to any logger, this one included. A
    /// disposed logger only changes its local name and stays unregistered.
    ///
    /// ## Errors
    ///
    /// - `GroupExists` if `name` is taken; nothing changes
    /// - `InvalidArgument` if `name` is empty
    /// - `RegistryDropped` if the registry no longer exists
    pub fn set_group(&self, name: &str) -> Result<()>
    {
        validate_group(name)?;
        let shared = self.shared()?;
        let mut index = shared.index();
        let previous = index.rename(self.id, name)?;
        self.local().group = name.to_string();
        debug!(id = %self.id, from = ?previous, to = name, "group renamed");
        Ok(())
    }

    /// Mute this logger.
    pub fn pause(&self)
    {
        self.local().enabled = false;
    }

    /// Unmute this logger.
    pub fn resume(&self)
    {
        self.local().enabled = true;
    }

    /// Mute every logger of the registry.
    pub fn pause_global(&self)
    {
        self.context.write().enabled = false;
    }

    /// Unmute every logger of the registry.
    pub fn resume_global(&self)
    {
        self.context.write().enabled = true;
    }

    /// Shallow-merge `update` into the global configuration.
    pub fn configure(&self, update: ConfigUpdate)
    {
        self.context.configure(update);
    }

    /// Resolve a peer logger in the same registry.
    ///
    /// ## Errors
    ///
    /// As [`Registry::resolve`], plus `RegistryDropped`.
    pub fn spawn(&self, spec: impl Into<LoggerSpec>) -> Result<Arc<Logger>>
    {
        self.registry()?.resolve(spec)
    }

    /// Remove this logger from its registry.
    ///
    /// The handle keeps working, but resolving its group again creates a new
    /// logger. Calling this twice is a no-op.
    pub fn dispose(&self)
    {
        let Some(shared) = self.registry.upgrade() else {
            return;
        };
        if let Some(name) = shared.index().remove(self.id) {
            debug!(group = %name, id = %self.id, "logger disposed");
        }
    }

    /// Whether a message at `level` would be emitted right now.
    ///
    /// ## Errors
    ///
    /// `InvalidLevel` if there is no effective threshold, or if `level` or the
    /// threshold is missing from the level table.
    pub fn is_loggable(&self, level: Level) -> Result<bool>
    {
        let local = self.local_config();
        let config = self.context.read();
        passes(&local, &config, level)
    }

    /// Emit `message` (and a dump of `data`) at `level` if it passes the filter.
    ///
    /// Returns whether anything was written. Lines below the error threshold
    /// go to stdout, the rest to stderr.
    ///
    /// ## Errors
    ///
    /// - `InvalidLevel` for `all`/`off`, which are not message levels, and in
    ///   the cases listed for [`is_loggable`](Self::is_loggable)
    /// - `Io` if the sink fails
    pub fn log(&self, level: Level, message: &str, data: Option<&dyn Debug>) -> Result<bool>
    {
        if level.is_sentinel() {
            return Err(LoggerError::InvalidLevel(format!("`{level}` is a threshold, not a message level")));
        }

        let rendered = {
            let local = self.local_config();
            let config = self.context.read();
            if !passes(&local, &config, level)? {
                return Ok(false);
            }
            render(&config, &local.group, level, message, data, Local::now().naive_local())?
        };

        // line and dump go out in one write so concurrent loggers cannot split them
        let mut text = format!("{}\n", rendered.line);
        if let Some(dump) = rendered.data {
            text.push_str(&dump);
            text.push('\n');
        }
        self.context.sink().write(rendered.stream, &text)?;
        Ok(true)
    }
}

fn passes(local: &LocalConfig, config: &GlobalConfig, level: Level) -> Result<bool>
{
    if !local.enabled || !config.enabled {
        return Ok(false);
    }
    let threshold = local.level.or(config.level).ok_or_else(|| {
        LoggerError::InvalidLevel(format!(
            "no level set for `{}` and no global level configured",
            local.group
        ))
    })?;
    Ok(config.levels.severity(level)? >= config.levels.severity(threshold)?)
}

macro_rules! level_methods {
    ($($name:ident, $with:ident => $level:ident;)*) => {
        impl Logger
        {
            $(
                #[doc = concat!("Log `message` at `", stringify!($name), "` level.")]
                ///
                /// ## Errors
                ///
                /// See [`Logger::log`].
                pub fn $name(&self, message: &str) -> Result<bool>
                {
                    self.log(Level::$level, message, None)
                }

                #[doc = concat!("Log `message` at `", stringify!($name), "` level, followed by a dump of `data`.")]
                ///
                /// ## Errors
                ///
                /// See [`Logger::log`].
                pub fn $with(&self, message: &str, data: &dyn Debug) -> Result<bool>
                {
                    self.log(Level::$level, message, Some(data))
                }
            )*
        }
    };
}

level_methods! {
    trace, trace_with => Trace;
    debug, debug_with => Debug;
    dev, dev_with => Dev;
    success, success_with => Success;
    ok, ok_with => Ok;
    info, info_with => Info;
    notice, notice_with => Notice;
    warning, warning_with => Warning;
    alert, alert_with => Alert;
    error, error_with => Error;
    exception, exception_with => Exception;
    critical, critical_with => Critical;
    fatal, fatal_with => Fatal;
}

impl fmt::Debug for Logger
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Logger")
            .field("id", &self.id)
            .field("local", &self.local_config())
            .finish_non_exhaustive()
    }
}
