//! Log capture. The display surface owns the terminal, so log output is
//! formatted into an in-memory buffer that the application can show or dump
//! once the terminal has been restored.
use std::{
    io::{Result as IoResult, Write},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::Subscriber;
use tracing_subscriber::fmt;

use super::error::{Error, Result};

/// Shared buffer of formatted log lines.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    /// Formatted lines, oldest first.
    lines: Arc<Mutex<Vec<String>>>,
}

/// Writer appending each formatted event to a [`LogBuffer`].
struct LogWriter {
    /// Shared log buffer.
    buf: Arc<Mutex<Vec<String>>>,
}

/// Lock the line buffer. A panic while holding the lock cannot leave the
/// buffer half-written, so poisoning is ignored.
fn lock(lines: &Mutex<Vec<String>>) -> MutexGuard<'_, Vec<String>> {
    lines.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        lock(&self.buf).push(String::from_utf8_lossy(buf).trim().to_string());
        Ok(buf.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

impl LogBuffer {
    /// A copy of every buffered line.
    pub fn lines(&self) -> Vec<String> {
        lock(&self.lines).clone()
    }

    /// Remove and return every buffered line.
    pub fn drain(&self) -> Vec<String> {
        lock(&self.lines).drain(..).collect()
    }

    /// A subscriber writing into this buffer, for use with
    /// `tracing::subscriber::with_default` or as the global default.
    pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        let format = fmt::format()
            .with_level(true)
            .with_line_number(true)
            .with_ansi(false)
            .without_time()
            .compact();
        let buf = self.lines.clone();
        tracing_subscriber::fmt()
            .with_writer(move || -> LogWriter { LogWriter { buf: buf.clone() } })
            .with_max_level(tracing::Level::TRACE)
            .event_format(format)
            .finish()
    }
}

/// Install a global subscriber that logs into a fresh buffer.
pub fn init() -> Result<LogBuffer> {
    let buf = LogBuffer::default();
    tracing::subscriber::set_global_default(buf.subscriber())
        .map_err(|e| Error::Internal(format!("logging: {e}")))?;
    Ok(buf)
}
