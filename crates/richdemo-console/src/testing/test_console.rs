//! TestConsole for capturing output in tests
//!
//! Provides a console that captures all output for assertion instead of
//! writing to the terminal.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use strip_ansi_escapes::strip;

use super::VirtualScreen;
use crate::console::DemoConsole;
use crate::coordinator::OutputCoordinator;
use crate::render::renderer_for;

/// A console that captures output for testing
///
/// Use `console()` to get the inner console for rendering, then use
/// `output()`, `contains()`, `screen()` and the assertion methods to verify
/// what was written.
#[derive(Clone)]
pub struct TestConsole {
    inner: DemoConsole,
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl TestConsole {
    /// Plain output, 80 columns, live regions printed only when finished.
    #[must_use]
    pub fn new() -> Self {
        Self::build(false, 80)
    }

    /// ANSI output with live regions redrawn in place, as on a terminal.
    #[must_use]
    pub fn new_rich() -> Self {
        Self::build(true, 80)
    }

    /// Plain output at a fixed width.
    #[must_use]
    pub fn with_width(width: usize) -> Self {
        Self::build(false, width)
    }

    /// ANSI output with live redraw at a fixed width.
    #[must_use]
    pub fn rich_with_width(width: usize) -> Self {
        Self::build(true, width)
    }

    fn build(rich: bool, width: usize) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let coordinator = OutputCoordinator::builder(BufferWriter(buffer.clone()))
            .renderer(renderer_for(rich))
            .width(width)
            .redraw_live(rich)
            .build();
        Self {
            inner: DemoConsole::with_coordinator(Arc::new(coordinator)),
            buffer,
        }
    }

    /// Get the underlying console for passing to producers
    #[must_use]
    pub fn console(&self) -> &DemoConsole {
        &self.inner
    }

    /// Everything written, escape sequences included
    #[must_use]
    pub fn raw_output(&self) -> String {
        let bytes = self
            .buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Every line written, ANSI codes stripped
    ///
    /// This is the append-only byte stream: lines that were later erased
    /// by a live redraw still appear here. Use [`screen`](Self::screen)
    /// for what is visible.
    #[must_use]
    pub fn output(&self) -> Vec<String> {
        let bytes = self
            .buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let stripped = strip(bytes);
        String::from_utf8_lossy(&stripped)
            .lines()
            .map(String::from)
            .collect()
    }

    /// Get output as a single string
    #[must_use]
    pub fn output_string(&self) -> String {
        self.output().join("\n")
    }

    /// What a terminal would show after interpreting cursor movement
    #[must_use]
    pub fn screen(&self) -> VirtualScreen {
        VirtualScreen::from_output(&self.raw_output())
    }

    /// Check if output contains a string (case-insensitive)
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        let output = self.output_string().to_lowercase();
        output.contains(&needle.to_lowercase())
    }

    /// Check if output contains all of the given strings
    #[must_use]
    pub fn contains_all(&self, needles: &[&str]) -> bool {
        needles.iter().all(|n| self.contains(n))
    }

    /// Check if output matches a regex pattern
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        match regex::Regex::new(pattern) {
            Ok(re) => re.is_match(&self.output_string()),
            Err(_) => false,
        }
    }

    /// Assert that output contains a string
    ///
    /// # Panics
    ///
    /// Panics if the output does not contain the needle string.
    pub fn assert_contains(&self, needle: &str) {
        assert!(
            self.contains(needle),
            "Output did not contain '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert that output does NOT contain a string
    ///
    /// # Panics
    ///
    /// Panics if the output contains the needle string.
    pub fn assert_not_contains(&self, needle: &str) {
        assert!(
            !self.contains(needle),
            "Output unexpectedly contained '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert output has specific number of lines
    ///
    /// # Panics
    ///
    /// Panics if the line count doesn't match expected.
    pub fn assert_line_count(&self, expected: usize) {
        let actual = self.output().len();
        assert_eq!(
            actual,
            expected,
            "Expected {} lines but got {}. Actual output:\n{}",
            expected,
            actual,
            self.output_string()
        );
    }

    /// Clear the buffer
    pub fn clear(&self) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for TestConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TestConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestConsole")
            .field("is_rich", &self.inner.is_rich())
            .field("line_count", &self.output().len())
            .finish()
    }
}

/// Writer that captures to a buffer
struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_plain_console() {
        let tc = TestConsole::new();
        assert!(!tc.console().is_rich());
    }

    #[test]
    fn test_new_rich_creates_rich_console() {
        let tc = TestConsole::new_rich();
        assert!(tc.console().is_rich());
    }

    #[test]
    fn test_output_capture() {
        let tc = TestConsole::new();
        tc.console().print("Hello, world!").unwrap();
        assert!(tc.contains("Hello"));
        assert!(tc.contains("world"));
    }

    #[test]
    fn test_contains_case_insensitive() {
        let tc = TestConsole::new();
        tc.console().print("Hello World").unwrap();
        assert!(tc.contains("hello"));
        assert!(tc.contains("WORLD"));
    }

    #[test]
    fn test_contains_all() {
        let tc = TestConsole::new();
        tc.console().print("The quick brown fox").unwrap();
        assert!(tc.contains_all(&["quick", "brown", "fox"]));
        assert!(!tc.contains_all(&["quick", "lazy"]));
    }

    #[test]
    fn test_clear() {
        let tc = TestConsole::new();
        tc.console().print("Some output").unwrap();
        assert!(!tc.output().is_empty());
        tc.clear();
        assert!(tc.output().is_empty());
    }

    #[test]
    fn test_matches_regex() {
        let tc = TestConsole::new();
        tc.console().print("Error code: 42").unwrap();
        assert!(tc.matches(r"code: \d+"));
        assert!(!tc.matches(r"code: [a-z]+"));
    }

    #[test]
    fn test_rich_output_is_stripped() {
        let tc = TestConsole::new_rich();
        tc.console().print_styled("styled", "bold red").unwrap();
        assert_eq!(tc.output(), vec!["styled"]);
        assert_ne!(tc.raw_output(), "styled\n");
    }

    #[test]
    fn test_clone_shares_buffer() {
        let tc = TestConsole::new();
        tc.console().print("Test").unwrap();
        let tc2 = tc.clone();
        assert!(tc2.contains("Test"));
    }
}
