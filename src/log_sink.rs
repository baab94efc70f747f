use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use parking_lot::Mutex;

use crate::config::LogConfig;
use crate::level::Level;
use crate::log_record::LogRecord;
use crate::loggable::Loggable;

/// Terminator appended to every line.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
/// Terminator appended to every line.
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

const ANSI_RESET: &str = "\x1b[0m";

struct Streams {
    file: Box<dyn Write + Send>,
    echo: Box<dyn Write + Send>,
}

/// Shared destination of [`LogRecord`]s.
///
/// A sink owns one output stream (normally an append-mode file), an optional
/// echo stream (standard output unless replaced), and the lock that orders
/// complete lines between threads. It is built once and handed to every call
/// site, usually as an `Arc<LogSink>`; there is no global instance.
///
/// The sink does not filter by itself. Callers ask [`enabled`](Self::enabled)
/// before opening a record; the `log_*!` macros do this for them.
///
/// # Examples
///
/// ```
/// use pixlog::{Level, LogSink};
///
/// let dir = tempfile::tempdir().unwrap();
/// let sink = LogSink::builder()
///     .threshold(Level::Debug)
///     .open(dir.path().join("run.log"))
///     .unwrap();
///
/// sink.record(Level::Info, &[&"camera"]).field("frame").field(42);
/// ```
pub struct LogSink {
    streams: Mutex<Streams>,
    threshold: Level,
    echo_stdout: bool,
}

impl LogSink {
    pub fn builder() -> LogSinkBuilder {
        LogSinkBuilder::default()
    }

    /// Opens (creating if needed) `path` in append mode with default settings.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::builder().open(path)
    }

    /// Opens the file named by `config` and applies its threshold and echo flag.
    pub fn from_config(config: &LogConfig) -> io::Result<Self> {
        Self::builder()
            .threshold(config.threshold)
            .echo_stdout(config.echo_stdout)
            .open(&config.path)
    }

    pub fn threshold(&self) -> Level {
        self.threshold
    }

    pub fn echoes_stdout(&self) -> bool {
        self.echo_stdout
    }

    /// Whether a record at `level` should be opened at all.
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level != Level::Off && level <= self.threshold
    }

    /// Opens a record at `level` with the given context tokens in its header.
    ///
    /// The record is written when it is dropped, normally at the end of the
    /// statement that created it.
    pub fn record<'a>(&'a self, level: Level, context: &[&dyn Loggable]) -> LogRecord<'a> {
        LogRecord::new(self, level, context)
    }

    /// Flushes both streams.
    pub fn flush(&self) -> io::Result<()> {
        let mut streams = self.streams.lock();
        streams.file.flush()?;
        streams.echo.flush()
    }

    /// Writes one finished line to the file and, if enabled, the echo stream.
    ///
    /// Both writes happen under the same lock acquisition. Failures drop the
    /// line for that destination and are reported only after the lock is
    /// released, so a subscriber may log back into this sink.
    pub(crate) fn write_line(&self, level: Level, line: &str) {
        let mut file_line = String::with_capacity(line.len() + LINE_ENDING.len());
        file_line.push_str(line);
        file_line.push_str(LINE_ENDING);
        let echo_line = self.echo_stdout.then(|| echo_rendering(level, line));

        let (file_result, echo_result) = {
            let mut guard = self.streams.lock();
            let streams = &mut *guard;
            let file_result = write_flushed(&mut streams.file, file_line.as_bytes());
            let echo_result = echo_line
                .as_ref()
                .map(|echo| write_flushed(&mut streams.echo, echo.as_bytes()));
            (file_result, echo_result)
        };

        if let Err(err) = file_result {
            tracing::warn!(error = %err, "dropping log line, file stream not writable");
        }
        if let Some(Err(err)) = echo_result {
            tracing::warn!(error = %err, "dropping echoed log line");
        }
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink")
            .field("threshold", &self.threshold)
            .field("echo_stdout", &self.echo_stdout)
            .finish_non_exhaustive()
    }
}

fn write_flushed(writer: &mut Box<dyn Write + Send>, bytes: &[u8]) -> io::Result<()> {
    writer.write_all(bytes)?;
    writer.flush()
}

fn echo_rendering(level: Level, line: &str) -> String {
    let color = level.ansi_color();
    if color.is_empty() {
        format!("{line}{LINE_ENDING}")
    } else {
        format!("{color}{line}{ANSI_RESET}{LINE_ENDING}")
    }
}

/// Step-by-step construction of a [`LogSink`].
pub struct LogSinkBuilder {
    threshold: Level,
    echo_stdout: bool,
    echo: Option<Box<dyn Write + Send>>,
}

impl Default for LogSinkBuilder {
    fn default() -> Self {
        Self {
            threshold: Level::default(),
            echo_stdout: false,
            echo: None,
        }
    }
}

impl LogSinkBuilder {
    /// Most verbose level that [`LogSink::enabled`] accepts.
    pub fn threshold(mut self, level: Level) -> Self {
        self.threshold = level;
        self
    }

    /// Also write every line to the echo stream.
    pub fn echo_stdout(mut self, enabled: bool) -> Self {
        self.echo_stdout = enabled;
        self
    }

    /// Replaces standard output as the echo stream. Does not enable echoing.
    pub fn echo_to(mut self, writer: impl Write + Send + 'static) -> Self {
        self.echo = Some(Box::new(writer));
        self
    }

    /// Builds a sink writing to `path`, opened in append mode.
    pub fn open(self, path: impl AsRef<Path>) -> io::Result<LogSink> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing::debug!(path = %path.display(), threshold = %self.threshold, "log sink opened");
        Ok(self.writer(file))
    }

    /// Builds a sink writing to an arbitrary stream.
    pub fn writer(self, writer: impl Write + Send + 'static) -> LogSink {
        let echo = self
            .echo
            .unwrap_or_else(|| Box::new(io::stdout()) as Box<dyn Write + Send>);
        LogSink {
            streams: Mutex::new(Streams {
                file: Box::new(writer),
                echo,
            }),
            threshold: self.threshold,
            echo_stdout: self.echo_stdout,
        }
    }
}
