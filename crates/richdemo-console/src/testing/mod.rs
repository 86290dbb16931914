//! Testing utilities for console output
//!
//! Provides `TestConsole` for capturing and asserting on console output in
//! tests, and `VirtualScreen` for checking what a terminal would display.

mod screen;
mod test_console;

pub use screen::VirtualScreen;
pub use test_console::TestConsole;
