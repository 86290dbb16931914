//! ErrorBoundary wrapper for automatic error display.
//!
//! The [`ErrorBoundary`] type wraps fallible steps and renders any failure
//! as a formatted trace, so demo code does not need a render call at every
//! error site.
//!
//! # Example
//!
//! ```rust,ignore
//! use richdemo_console::ErrorBoundary;
//!
//! let boundary = ErrorBoundary::new(&console);
//!
//! // Simple usage - returns Option<T>
//! let ratio = boundary.wrap(divide(1, 0));
//!
//! // With context message
//! let config = boundary.wrap_with_context(load_config(), "Loading configuration");
//!
//! if boundary.has_errors() {
//!     log::warn!("Encountered {} errors", boundary.error_count());
//! }
//! ```

use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::console::DemoConsole;
use crate::diagnostics::TraceRenderer;

/// Wraps operations and displays errors on failure.
///
/// `ErrorBoundary` is thread-safe; the error count is tracked atomically.
pub struct ErrorBoundary<'a> {
    console: &'a DemoConsole,
    renderer: TraceRenderer,
    exit_on_error: bool,
    error_count: AtomicUsize,
}

impl<'a> ErrorBoundary<'a> {
    #[must_use]
    pub fn new(console: &'a DemoConsole) -> Self {
        Self {
            console,
            renderer: TraceRenderer::new(),
            exit_on_error: false,
            error_count: AtomicUsize::new(0),
        }
    }

    /// Use a specific trace renderer (for example with backtraces forced on).
    #[must_use]
    pub fn with_renderer(mut self, renderer: TraceRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Exit the process with code 1 after displaying an error.
    #[must_use]
    pub fn with_exit_on_error(mut self, exit: bool) -> Self {
        self.exit_on_error = exit;
        self
    }

    /// Returns `Some(value)` on success; on error displays it and returns
    /// `None`.
    pub fn wrap<T, E>(&self, result: Result<T, E>) -> Option<T>
    where
        E: Error + 'static,
    {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.handle_error(&e);
                None
            }
        }
    }

    /// Like [`wrap`](Self::wrap), printing `context` above the trace.
    pub fn wrap_with_context<T, E>(&self, result: Result<T, E>, context: &str) -> Option<T>
    where
        E: Error + 'static,
    {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.print_context(context);
                self.handle_error(&e);
                None
            }
        }
    }

    /// Displays the error but still hands it back to the caller.
    pub fn wrap_result<T, E>(&self, result: Result<T, E>) -> Result<T, E>
    where
        E: Error + 'static,
    {
        if let Err(e) = &result {
            self.handle_error(e);
        }
        result
    }

    /// [`wrap_result`](Self::wrap_result) with a context line.
    pub fn wrap_result_with_context<T, E>(&self, result: Result<T, E>, context: &str) -> Result<T, E>
    where
        E: Error + 'static,
    {
        if let Err(e) = &result {
            self.print_context(context);
            self.handle_error(e);
        }
        result
    }

    /// Display an error directly.
    pub fn display_error(&self, error: &(dyn Error + 'static)) {
        self.handle_error(error);
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn reset_count(&self) {
        self.error_count.store(0, Ordering::Relaxed);
    }

    fn print_context(&self, context: &str) {
        let _ = self
            .console
            .print_styled(&format!("Context: {context}"), self.console.theme().muted.clone());
    }

    fn handle_error(&self, error: &(dyn Error + 'static)) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
        if self.renderer.render(error, self.console).is_err() {
            eprintln!("Error: {error}");
        }

        if self.exit_on_error {
            std::process::exit(1);
        }
    }
}

/// Try an operation with error display, returning early on failure.
///
/// ```rust,ignore
/// fn process(boundary: &ErrorBoundary) {
///     let data = try_display!(boundary, fetch_data());
///     let result = try_display!(boundary, parse(data), "Parsing data");
/// }
/// ```
#[macro_export]
macro_rules! try_display {
    ($boundary:expr, $expr:expr) => {
        match $boundary.wrap($expr) {
            Some(v) => v,
            None => return,
        }
    };
    ($boundary:expr, $expr:expr, $ctx:expr) => {
        match $boundary.wrap_with_context($expr, $ctx) {
            Some(v) => v,
            None => return,
        }
    };
}

/// Try an operation with error display, propagating the error as `Err`.
#[macro_export]
macro_rules! try_display_result {
    ($boundary:expr, $expr:expr) => {
        match $boundary.wrap_result($expr) {
            Ok(v) => v,
            Err(e) => return Err(e.into()),
        }
    };
    ($boundary:expr, $expr:expr, $ctx:expr) => {
        match $boundary.wrap_result_with_context($expr, $ctx) {
            Ok(v) => v,
            Err(e) => return Err(e.into()),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConsoleError;
    use crate::testing::TestConsole;

    fn failure() -> Result<i32, ConsoleError> {
        Err(ConsoleError::render_failure("bad style"))
    }

    #[test]
    fn test_wrap_success() {
        let tc = TestConsole::new();
        let boundary = ErrorBoundary::new(tc.console());
        assert_eq!(boundary.wrap(Ok::<_, ConsoleError>(42)), Some(42));
        assert_eq!(boundary.error_count(), 0);
        assert!(!boundary.has_errors());
        assert!(tc.output().is_empty());
    }

    #[test]
    fn test_wrap_error_renders_trace() {
        let tc = TestConsole::new();
        let boundary = ErrorBoundary::new(tc.console());
        assert_eq!(boundary.wrap(failure()), None);
        assert_eq!(boundary.error_count(), 1);
        tc.assert_contains("render failure: bad style");
    }

    #[test]
    fn test_wrap_with_context() {
        let tc = TestConsole::new();
        let boundary = ErrorBoundary::new(tc.console());
        assert_eq!(boundary.wrap_with_context(failure(), "Loading config"), None);
        assert_eq!(tc.output()[0], "Context: Loading config");
    }

    #[test]
    fn test_wrap_result_returns_error() {
        let tc = TestConsole::new();
        let boundary = ErrorBoundary::new(tc.console());
        let err = boundary.wrap_result(failure()).unwrap_err();
        assert!(matches!(err, ConsoleError::RenderFailure { .. }));
        assert_eq!(boundary.error_count(), 1);
    }

    #[test]
    fn test_exit_on_error_disabled_keeps_running() {
        let tc = TestConsole::new();
        let boundary = ErrorBoundary::new(tc.console())
            .with_renderer(TraceRenderer::new().with_backtrace(false))
            .with_exit_on_error(false);
        assert_eq!(boundary.wrap(failure()), None);
        assert!(boundary.has_errors());
        tc.assert_not_contains("Backtrace:");
    }

    #[test]
    fn test_reset_count() {
        let tc = TestConsole::new();
        let boundary = ErrorBoundary::new(tc.console());
        boundary.wrap(failure());
        boundary.display_error(&ConsoleError::OutputClosed);
        assert_eq!(boundary.error_count(), 2);
        boundary.reset_count();
        assert!(!boundary.has_errors());
    }

    #[test]
    fn test_try_display_returns_early() {
        fn step(boundary: &ErrorBoundary<'_>, reached: &mut bool) {
            let _value = crate::try_display!(boundary, failure(), "step");
            *reached = true;
        }
        let tc = TestConsole::new();
        let boundary = ErrorBoundary::new(tc.console());
        let mut reached = false;
        step(&boundary, &mut reached);
        assert!(!reached);
        assert_eq!(boundary.error_count(), 1);
    }

    #[test]
    fn test_try_display_result_propagates() {
        fn step(boundary: &ErrorBoundary<'_>) -> Result<i32, ConsoleError> {
            let value = crate::try_display_result!(boundary, failure());
            Ok(value + 1)
        }
        let tc = TestConsole::new();
        let boundary = ErrorBoundary::new(tc.console());
        assert!(step(&boundary).is_err());
        tc.assert_contains("bad style");
    }
}
