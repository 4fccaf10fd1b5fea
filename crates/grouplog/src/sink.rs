//! # Output Sinks
//!
//! Where rendered lines end up. A [`Sink`] receives already-rendered text and
//! the [`Stream`] it was routed to; it does no formatting of its own.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One of the two process output streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream
{
    /// Standard output (severities below the error threshold)
    Stdout,
    /// Standard error (severities at or above the error threshold)
    Stderr,
}

/// Destination for rendered log text
///
/// Implementations must write `text` completely before returning; loggers do
/// no buffering across calls.
pub trait Sink: Send + Sync
{
    /// Write `text` (already newline-terminated) to `stream`.
    ///
    /// ## Errors
    ///
    /// Returns the underlying I/O error unchanged.
    fn write(&self, stream: Stream, text: &str) -> io::Result<()>;
}

/// Writes to the real process stdout/stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl Sink for ConsoleSink
{
    fn write(&self, stream: Stream, text: &str) -> io::Result<()>
    {
        match stream {
            Stream::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(text.as_bytes())?;
                out.flush()
            }
            Stream::Stderr => {
                let mut err = io::stderr().lock();
                err.write_all(text.as_bytes())?;
                err.flush()
            }
        }
    }
}

/// Records everything written to it, for tests
///
/// ```rust
/// use std::sync::Arc;
///
/// use grouplog::{CaptureSink, ConfigUpdate, GlobalConfig, Level, Registry, Stream};
///
/// let sink = Arc::new(CaptureSink::new());
/// let registry = Registry::with_sink(GlobalConfig::default(), sink.clone());
/// registry.configure(ConfigUpdate::new().level(Level::Trace).timestamp(false).color(false));
///
/// registry.resolve("app").unwrap().info("hello").unwrap();
/// assert_eq!(sink.lines(), vec![(Stream::Stdout, "[app|info] hello".to_string())]);
/// ```
#[derive(Debug, Default)]
pub struct CaptureSink
{
    chunks: Mutex<Vec<(Stream, String)>>,
}

impl CaptureSink
{
    /// Create an empty capture.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    fn chunks(&self) -> MutexGuard<'_, Vec<(Stream, String)>>
    {
        self.chunks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every line written so far, without the trailing newline.
    ///
    /// A multi-line chunk (such as a data dump) yields one entry per line.
    #[must_use]
    pub fn lines(&self) -> Vec<(Stream, String)>
    {
        self.chunks()
            .iter()
            .flat_map(|(stream, text)| text.lines().map(|line| (*stream, line.to_string())))
            .collect()
    }

    /// Raw text written to standard output.
    #[must_use]
    pub fn stdout(&self) -> String
    {
        self.collect(Stream::Stdout)
    }

    /// Raw text written to standard error.
    #[must_use]
    pub fn stderr(&self) -> String
    {
        self.collect(Stream::Stderr)
    }

    /// `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.chunks().is_empty()
    }

    /// Forget everything written so far.
    pub fn clear(&self)
    {
        self.chunks().clear();
    }

    fn collect(&self, stream: Stream) -> String
    {
        self.chunks()
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, text)| text.as_str())
            .collect()
    }
}

impl Sink for CaptureSink
{
    fn write(&self, stream: Stream, text: &str) -> io::Result<()>
    {
        self.chunks().push((stream, text.to_string()));
        Ok(())
    }
}
