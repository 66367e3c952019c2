use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, Once, OnceLock, PoisonError};

use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt, TestWriter};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;

use crate::LoggingConfig;

/// Ring buffer of formatted log lines for bug reports.
#[derive(Debug)]
pub struct LogBuffer {
    capacity: usize,
    inner: Mutex<VecDeque<String>>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(VecDeque::with_capacity(capacity.min(8_192))),
        }
    }

    fn lines(&self) -> MutexGuard<'_, VecDeque<String>> {
        // A panic while holding the lock cannot leave the deque half-updated.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push_line(&self, line: String) {
        let mut inner = self.lines();
        if inner.len() == self.capacity {
            inner.pop_front();
        }
        inner.push_back(line);
    }

    pub fn len(&self) -> usize {
        self.lines().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }

    /// The newest `n` lines, oldest first.
    pub fn last_lines(&self, n: usize) -> Vec<String> {
        let inner = self.lines();
        inner.iter().rev().take(n).cloned().rev().collect()
    }
}

pub(crate) struct LogBufferMakeWriter {
    pub(crate) buffer: Arc<LogBuffer>,
}

impl<'a> MakeWriter<'a> for LogBufferMakeWriter {
    type Writer = LogBufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogBufferWriter {
            buffer: self.buffer.clone(),
            bytes: Vec::new(),
        }
    }
}

/// Collects one event's output and splits it into lines when dropped.
pub(crate) struct LogBufferWriter {
    buffer: Arc<LogBuffer>,
    bytes: Vec<u8>,
}

impl Write for LogBufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LogBufferWriter {
    fn drop(&mut self) {
        if self.bytes.is_empty() {
            return;
        }

        let text = String::from_utf8_lossy(&self.bytes);
        for line in text.split_terminator('\n') {
            let line = line.trim_end_matches('\r');
            if !line.is_empty() {
                self.buffer.push_line(line.to_owned());
            }
        }
    }
}

static TRACING_INIT: Once = Once::new();
static GLOBAL_LOG_BUFFER: OnceLock<Arc<LogBuffer>> = OnceLock::new();

pub fn global_log_buffer() -> Arc<LogBuffer> {
    GLOBAL_LOG_BUFFER
        .get_or_init(|| Arc::new(LogBuffer::new(LoggingConfig::default_buffer_lines())))
        .clone()
}

/// Every sink `config` asks for, on top of `buffer`. A log file that cannot be opened is
/// left out and its error handed back.
fn sink_writer(
    config: &LoggingConfig,
    buffer: Arc<LogBuffer>,
) -> (BoxMakeWriter, Option<io::Error>) {
    let mut writer = BoxMakeWriter::new(LogBufferMakeWriter { buffer });
    if config.stderr {
        // Test harness output capture only sees `eprint!`, which `TestWriter` uses.
        writer = if cfg!(debug_assertions) {
            BoxMakeWriter::new(writer.and(TestWriter::with_stderr))
        } else {
            BoxMakeWriter::new(writer.and(io::stderr))
        };
    }
    let Some(path) = &config.file else {
        return (writer, None);
    };
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => (BoxMakeWriter::new(writer.and(Mutex::new(file))), None),
        Err(err) => (writer, Some(err)),
    }
}

/// Installs the global `tracing` subscriber described by `config`.
///
/// Only the first call installs anything; later calls (and calls after another subscriber was
/// set) just return the global in-memory log buffer.
pub fn init_tracing(config: &LoggingConfig) -> Arc<LogBuffer> {
    let buffer = GLOBAL_LOG_BUFFER
        .get_or_init(|| Arc::new(LogBuffer::new(config.buffer_lines)))
        .clone();

    TRACING_INIT.call_once(|| {
        let (writer, file_error) = sink_writer(config, buffer.clone());
        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry()
            .with(config.env_filter())
            .with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            return;
        }
        if let (Some(err), Some(path)) = (file_error, &config.file) {
            tracing::warn!(
                target: "sharp.config",
                path = %path.display(),
                error = %err,
                "failed to open log file; file logging disabled"
            );
        }
        tracing::debug!(
            target: "sharp.config",
            level = %config.level,
            json = config.json,
            buffer_lines = config.buffer_lines,
            "tracing initialized"
        );
    });

    buffer
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn log_buffer_keeps_newest_lines() {
        let buffer = LogBuffer::new(2);
        buffer.push_line("one".to_owned());
        buffer.push_line("two".to_owned());
        buffer.push_line("three".to_owned());
        assert_eq!(buffer.last_lines(10), vec!["two", "three"]);
        assert_eq!(buffer.last_lines(1), vec!["three"]);
        assert_eq!(buffer.len(), 2);
        assert!(LogBuffer::new(0).is_empty());
    }

    #[test]
    fn unopenable_log_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = LoggingConfig {
            file: Some(dir.path().join("missing").join("sharp.log")),
            ..Default::default()
        };
        let (_, err) = sink_writer(&config, Arc::new(LogBuffer::new(4)));
        assert!(err.is_some());

        let config = LoggingConfig {
            file: Some(dir.path().join("sharp.log")),
            ..Default::default()
        };
        let (_, err) = sink_writer(&config, Arc::new(LogBuffer::new(4)));
        assert!(err.is_none());
        assert!(dir.path().join("sharp.log").exists());
    }

    fn capture(config: &LoggingConfig, emit: impl FnOnce()) -> String {
        let buffer = Arc::new(LogBuffer::new(64));
        let subscriber = tracing_subscriber::registry()
            .with(config.config_env_filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(LogBufferMakeWriter {
                        buffer: buffer.clone(),
                    })
                    .with_ansi(false),
            );
        tracing::subscriber::with_default(subscriber, emit);
        buffer.last_lines(64).join("\n")
    }

    #[test]
    fn simple_levels_filter_all_targets() {
        let config = LoggingConfig {
            level: "DEBUG".to_owned(),
            ..Default::default()
        };
        let text = capture(&config, || {
            tracing::trace!(target: "sharp.refactor", "hidden trace");
            tracing::debug!(target: "sharp.refactor", "shown debug");
        });
        assert!(!text.contains("hidden trace"), "{text}");
        assert!(text.contains("shown debug"), "{text}");
    }

    #[test]
    fn directive_strings_filter_per_target() {
        let config = LoggingConfig {
            level: "warn,sharp.refactor=trace".to_owned(),
            ..Default::default()
        };
        let text = capture(&config, || {
            tracing::info!(target: "sharp.syntax", "hidden info");
            tracing::warn!(target: "sharp.syntax", "shown warn");
            tracing::trace!(target: "sharp.refactor", "shown trace");
        });
        assert!(!text.contains("hidden info"), "{text}");
        assert!(text.contains("shown warn"), "{text}");
        assert!(text.contains("shown trace"), "{text}");
    }

    #[test]
    fn init_tracing_is_idempotent() {
        let config = LoggingConfig::default();
        let first = init_tracing(&config);
        let second = init_tracing(&config);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &global_log_buffer()));
    }
}
