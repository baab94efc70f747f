use crate::clock;
use crate::level::Level;
use crate::log_sink::LogSink;
use crate::loggable::Loggable;

/// Text placed between two consecutive fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separator(&'static str);

impl Separator {
    pub const NONE: Separator = Separator("");
    pub const SPACE: Separator = Separator(" ");
    pub const TAB: Separator = Separator("\t");
    pub const NEWLINE: Separator = Separator("\n");
    pub const COMMA: Separator = Separator(",");

    pub const fn new(text: &'static str) -> Self {
        Separator(text)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Default for Separator {
    fn default() -> Self {
        Separator::SPACE
    }
}

/// One log line under construction.
///
/// A record renders its header when it is created, collects fields through
/// the chaining methods below, and writes the whole line to its [`LogSink`]
/// exactly once, when it is dropped. Nothing reaches the sink before that, so
/// a line is never visible half-built, and lines from different threads never
/// mix.
///
/// Line layout:
///
/// ```text
/// [2024-05-01 13:07:42.031][INF][Px4711][Tx5123][ctx1][ctx2] field1 field2
/// ```
///
/// Every field is preceded by the separator that is active when it is
/// appended (a single space unless changed), the header counting as the
/// first token. Changing the separator only affects fields appended later.
///
/// # Examples
///
/// ```
/// use pixlog::{Level, LogSink, Separator};
///
/// let sink = LogSink::builder().writer(std::io::sink());
/// let mut record = sink.record(Level::Info, &[&"capture"]);
/// record.field("x").field("y").sep(Separator::COMMA).field("z");
/// assert!(record.line().ends_with("] x y,z"));
/// // written here, when `record` goes out of scope
/// ```
pub struct LogRecord<'a> {
    sink: &'a LogSink,
    level: Level,
    separator: Separator,
    buffer: String,
}

impl<'a> LogRecord<'a> {
    /// Opens a record on `sink` and renders its header.
    ///
    /// Prefer [`LogSink::record`] or the `log_*!` macros.
    pub fn new(sink: &'a LogSink, level: Level, context: &[&dyn Loggable]) -> Self {
        let mut buffer = String::with_capacity(128);
        buffer.push('[');
        buffer.push_str(&clock::format_now());
        buffer.push_str("][");
        buffer.push_str(level.tag());
        buffer.push_str("][Px");
        buffer.push_str(&clock::process_id().to_string());
        buffer.push_str("][Tx");
        buffer.push_str(&clock::thread_tag().to_string());
        buffer.push(']');
        for token in context {
            buffer.push('[');
            token.render(&mut buffer);
            buffer.push(']');
        }

        Self {
            sink,
            level,
            separator: Separator::default(),
            buffer,
        }
    }

    /// Appends `value` after the active separator.
    pub fn field<T: Loggable>(&mut self, value: T) -> &mut Self {
        let sep = self.separator;
        self.push(&value, sep)
    }

    /// Appends `value` after `sep`, leaving the active separator unchanged.
    pub fn field_sep<T: Loggable>(&mut self, value: T, sep: Separator) -> &mut Self {
        self.push(&value, sep)
    }

    /// Appends `value` directly, with no separator in front.
    pub fn joined<T: Loggable>(&mut self, value: T) -> &mut Self {
        self.push(&value, Separator::NONE)
    }

    /// Changes the separator used by later calls to [`field`](Self::field).
    pub fn sep(&mut self, sep: Separator) -> &mut Self {
        self.separator = sep;
        self
    }

    /// The line as it will be written, without the line terminator.
    pub fn line(&self) -> &str {
        &self.buffer
    }

    pub fn level(&self) -> Level {
        self.level
    }

    fn push(&mut self, value: &dyn Loggable, sep: Separator) -> &mut Self {
        if !self.buffer.is_empty() {
            self.buffer.push_str(sep.as_str());
        }
        value.render(&mut self.buffer);
        self
    }
}

impl Drop for LogRecord<'_> {
    fn drop(&mut self) {
        self.sink.write_line(self.level, &self.buffer);
    }
}

/// Opens a record at the given level if the sink accepts it, appends each
/// field, and writes the line at the end of the statement.
///
/// The module path and line of the call site become the header's context
/// tokens. When the level is not enabled, the field expressions are not
/// evaluated.
///
/// # Examples
///
/// ```
/// # use pixlog::{Level, LogSink, log_record};
/// let sink = LogSink::builder().threshold(Level::Debug).writer(std::io::sink());
/// log_record!(sink, Level::Info; "frame", 17, true);
/// log_record!(sink, Level::Trace; "never rendered");
/// ```
#[macro_export]
macro_rules! log_record {
    ($sink:expr, $level:expr; $($field:expr),* $(,)?) => {{
        let sink: &$crate::LogSink = &$sink;
        let level: $crate::Level = $level;
        if sink.enabled(level) {
            #[allow(unused_mut)]
            let mut record = sink.record(level, &[&module_path!(), &line!()]);
            $( record.field($field); )*
        }
    }};
}

#[macro_export]
macro_rules! log_fatal {
    ($sink:expr; $($field:expr),* $(,)?) => {
        $crate::log_record!($sink, $crate::Level::Fatal; $($field),*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($sink:expr; $($field:expr),* $(,)?) => {
        $crate::log_record!($sink, $crate::Level::Error; $($field),*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($sink:expr; $($field:expr),* $(,)?) => {
        $crate::log_record!($sink, $crate::Level::Warn; $($field),*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($sink:expr; $($field:expr),* $(,)?) => {
        $crate::log_record!($sink, $crate::Level::Info; $($field),*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($sink:expr; $($field:expr),* $(,)?) => {
        $crate::log_record!($sink, $crate::Level::Debug; $($field),*)
    };
}

#[macro_export]
macro_rules! log_trace {
    ($sink:expr; $($field:expr),* $(,)?) => {
        $crate::log_record!($sink, $crate::Level::Trace; $($field),*)
    };
}
