//! Formatted error traces.
//!
//! Any `std::error::Error` (or a panic) becomes a [`Trace`]: a red panel
//! with the error message, the numbered `source()` chain and, when enabled,
//! a backtrace.

use std::backtrace::Backtrace;
use std::error::Error;
use std::panic::PanicHookInfo;

use crate::console::DemoConsole;
use crate::content::{Content, Line, Span};
use crate::error::ConsoleResult;
use crate::theme::theme;
use crate::widgets::{Panel, Renderable};

/// A renderable error report.
#[derive(Debug, Clone)]
pub struct Trace {
    title: String,
    message: String,
    causes: Vec<String>,
    location: Option<String>,
    backtrace: Option<String>,
}

impl Trace {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
            causes: Vec::new(),
            location: None,
            backtrace: None,
        }
    }

    /// Collect `error` and its whole `source()` chain.
    #[must_use]
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let mut trace = Self::new(error.to_string());
        let mut source = error.source();
        while let Some(cause) = source {
            trace.causes.push(cause.to_string());
            source = cause.source();
        }
        trace
    }

    /// Describe a panic from inside a panic hook.
    #[must_use]
    pub fn from_panic(info: &PanicHookInfo<'_>) -> Self {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "Box<dyn Any>".to_string());
        let mut trace = Self::new(message).with_title("Panic");
        trace.location = info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));
        trace
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: Option<String>) -> Self {
        self.backtrace = backtrace;
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    fn body(&self) -> Content {
        let t = theme();
        let mut body = Content::new();
        body.push(Line::styled(self.message.clone(), t.error.clone()));
        if let Some(location) = &self.location {
            body.push(Line::styled(format!("at {location}"), t.muted.clone()));
        }

        if !self.causes.is_empty() {
            body.push("");
            body.push(Line::styled("Caused by:", t.warning.clone()));
            for (i, cause) in self.causes.iter().enumerate() {
                body.push(Line::from_spans(vec![
                    Span::styled(format!("  {}: ", i + 1), t.muted.clone()),
                    Span::plain(cause.clone()),
                ]));
            }
        }

        if let Some(backtrace) = &self.backtrace {
            body.push("");
            body.push(Line::styled("Backtrace:", t.key.clone()));
            for frame in backtrace.lines() {
                body.push(Line::styled(frame.to_string(), t.muted.clone()));
            }
        }
        body
    }
}

impl Renderable for Trace {
    fn render(&self, width: usize) -> ConsoleResult<Content> {
        let t = theme();
        Panel::new(self.body())
            .title(Line::styled(self.title.clone(), t.error.clone()))
            .border_style(t.error.clone())
            .render(width)
    }
}

/// Renders errors as [`Trace`] panels on a console.
#[derive(Debug, Clone)]
pub struct TraceRenderer {
    show_backtrace: bool,
}

impl Default for TraceRenderer {
    fn default() -> Self {
        Self {
            show_backtrace: std::env::var_os("RUST_BACKTRACE").is_some_and(|v| v != "0"),
        }
    }
}

impl TraceRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_backtrace(mut self, show: bool) -> Self {
        self.show_backtrace = show;
        self
    }

    /// Build the trace for `error`, capturing a backtrace if enabled.
    #[must_use]
    pub fn trace(&self, error: &(dyn Error + 'static)) -> Trace {
        Trace::from_error(error).with_backtrace(self.backtrace())
    }

    pub fn render(&self, error: &(dyn Error + 'static), console: &DemoConsole) -> ConsoleResult<()> {
        console.render(&self.trace(error))
    }

    fn backtrace(&self) -> Option<String> {
        self.show_backtrace
            .then(|| Backtrace::force_capture().to_string())
    }
}

/// Route panics through the console as formatted traces.
pub fn install_panic_hook(console: &DemoConsole, show_backtrace: bool) {
    let console = console.clone();
    std::panic::set_hook(Box::new(move |info| {
        let backtrace = show_backtrace.then(|| Backtrace::force_capture().to_string());
        let trace = Trace::from_panic(info).with_backtrace(backtrace);
        if !report_panic(&console, &trace) {
            eprintln!("panic: {}", trace.message());
        }
    }));
}

/// Write a panic trace without blocking. The panicking thread may already
/// hold the output, so a busy coordinator yields `false` instead of waiting.
fn report_panic(console: &DemoConsole, trace: &Trace) -> bool {
    let Ok(content) = trace.render(console.width()) else {
        return false;
    };
    match console.coordinator().try_acquire() {
        Some(mut guard) => guard.write(content).is_ok(),
        None => false,
    }
}

/// Log `message` at error level, then print the trace of `error` beneath it.
pub fn log_error_chain(
    console: &DemoConsole,
    target: &str,
    message: &str,
    error: &(dyn Error + 'static),
) -> ConsoleResult<()> {
    log::error!(target: target, "{message}");
    TraceRenderer::new().render(error, console)
}
