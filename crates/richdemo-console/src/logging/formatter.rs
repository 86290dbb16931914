//! Log event model and line formatting shared by the `log` and `tracing`
//! front ends.

use crate::content::{Content, Justify, Line, Span, StyleSpec};
use crate::theme::DemoTheme;

/// Target suffix that marks an `Error` record as critical.
///
/// The `log` crate stops at `Error`; the [`critical!`](crate::critical)
/// macro appends this suffix so the formatter can tell the two apart.
pub const CRITICAL_SUFFIX: &str = "::critical";

const LEVEL_WIDTH: usize = 8;

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    fn style(self, theme: &DemoTheme) -> StyleSpec {
        match self {
            Self::Trace => theme.muted.clone(),
            Self::Debug => theme.debug.clone(),
            Self::Info => theme.info.clone(),
            Self::Warning => theme.warning.clone(),
            Self::Error => theme.error.clone(),
            Self::Critical => theme.critical.clone(),
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warning,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Self::Error,
            tracing::Level::WARN => Self::Warning,
            tracing::Level::INFO => Self::Info,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::TRACE => Self::Trace,
        }
    }
}

/// Split a record target into its display name and level, recognising the
/// critical marker on `Error` records.
#[must_use]
pub fn classify(level: log::Level, target: &str) -> (LogLevel, &str) {
    match target.strip_suffix(CRITICAL_SUFFIX) {
        Some(base) if level == log::Level::Error => (LogLevel::Critical, base),
        _ => (LogLevel::from(level), target),
    }
}

/// One log event, independent of where it came from.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub target: Option<String>,
    pub timestamp: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub fields: Vec<(String, String)>,
}

impl LogEvent {
    #[must_use]
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            target: None,
            timestamp: None,
            file: None,
            line: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }
}

/// Turns [`LogEvent`]s into styled lines:
///
/// ```text
/// [12:03:44] INFO     demo.system - CPU usage at 42%   showcase.rs:88
/// ```
///
/// Continuation lines of a multi-line message are indented under the
/// message column.
#[derive(Debug, Clone)]
pub struct RichLogFormatter {
    theme: &'static DemoTheme,
    show_timestamp: bool,
    show_target: bool,
    show_file_line: bool,
    max_width: Option<usize>,
}

impl Default for RichLogFormatter {
    fn default() -> Self {
        Self::new(crate::theme::theme())
    }
}

impl RichLogFormatter {
    #[must_use]
    pub fn new(theme: &'static DemoTheme) -> Self {
        Self {
            theme,
            show_timestamp: true,
            show_target: true,
            show_file_line: false,
            max_width: None,
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, show: bool) -> Self {
        self.show_timestamp = show;
        self
    }

    #[must_use]
    pub fn with_target(mut self, show: bool) -> Self {
        self.show_target = show;
        self
    }

    #[must_use]
    pub fn with_file_line(mut self, show: bool) -> Self {
        self.show_file_line = show;
        self
    }

    /// Right-align `file:line` against this width.
    #[must_use]
    pub fn with_max_width(mut self, width: Option<usize>) -> Self {
        self.max_width = width;
        self
    }

    /// Format an event. The first line carries the header; further message
    /// lines are indented to the message column.
    #[must_use]
    pub fn format(&self, event: &LogEvent) -> Content {
        let mut header = Line::new();
        if self.show_timestamp {
            if let Some(ts) = &event.timestamp {
                header.push(Span::styled(format!("[{ts}]"), self.theme.timestamp.clone()));
                header.push_str(" ");
            }
        }
        header.push(Span::styled(
            format!("{:<LEVEL_WIDTH$}", event.level.label()),
            event.level.style(self.theme),
        ));
        header.push_str(" ");
        if self.show_target {
            if let Some(target) = event.target.as_deref().filter(|t| !t.is_empty()) {
                header.push(Span::styled(target, self.theme.muted.clone()));
                header.push_str(" - ");
            }
        }
        let indent = header.width();

        let mut message_lines = event.message.lines();
        let mut first = header;
        first.push(Span::plain(message_lines.next().unwrap_or_default()));
        for (key, value) in &event.fields {
            first.push_str(" ");
            first.push(Span::styled(format!("{key}="), self.theme.key.clone()));
            first.push(Span::plain(value.as_str()));
        }

        if self.show_file_line {
            if let Some(location) = self.location(event) {
                first = self.append_location(first, location);
            }
        }

        let mut content = Content::from(first);
        for rest in message_lines {
            let mut line = Line::plain(" ".repeat(indent));
            line.push_str(rest);
            content.push(line);
        }
        content
    }

    /// Single-line form, for callers that only want the header line.
    #[must_use]
    pub fn format_line(&self, event: &LogEvent) -> Line {
        self.format(event).into_lines().into_iter().next().unwrap_or_default()
    }

    fn location(&self, event: &LogEvent) -> Option<String> {
        let file = event.file.as_deref()?;
        let name = file.rsplit(['/', '\\']).next().unwrap_or(file);
        Some(match event.line {
            Some(line) => format!("{name}:{line}"),
            None => name.to_string(),
        })
    }

    fn append_location(&self, line: Line, location: String) -> Line {
        let location_width = console::measure_text_width(&location);
        let mut line = match self.max_width {
            Some(max) if line.width() + location_width + 2 <= max => {
                line.pad_to(max - location_width, Justify::Left)
            }
            _ => {
                let mut line = line;
                line.push_str("  ");
                line
            }
        };
        line.push(Span::styled(location, self.theme.muted.clone()));
        line
    }
}
