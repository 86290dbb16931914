//! Rich log formatting module.
//!
//! This module provides rich-formatted logging capabilities:
//! - [`RichLogFormatter`] - Transforms log events into styled lines
//! - [`RichLogger`] - A `log` crate logger writing through the coordinator
//! - [`RichSubscriberBuilder`] - Tracing subscriber builder
//!
//! Both front ends write through a [`DemoConsole`](crate::DemoConsole), so a
//! log line from a worker thread is appended above any live progress bar
//! instead of tearing through it.
//!
//! # Example
//!
//! ```ignore
//! use richdemo_console::logging::{LogEvent, LogLevel, RichLogFormatter};
//!
//! let formatter = RichLogFormatter::default();
//! let event = LogEvent::new(LogLevel::Info, "Server started")
//!     .with_target("demo.system");
//!
//! console.print_content(formatter.format(&event))?;
//! ```

mod formatter;
mod logger;
mod subscriber;

pub use formatter::{CRITICAL_SUFFIX, LogEvent, LogLevel, RichLogFormatter, classify};
pub use logger::{RichLogger, RichLoggerBuilder};
pub use subscriber::{RichLayer, RichSubscriberBuilder};

/// Log at critical severity.
///
/// `log` has no level above `Error`, so this logs at `Error` with
/// [`CRITICAL_SUFFIX`] appended to the target; [`RichLogger`] strips the
/// suffix and renders the record as `CRITICAL`.
#[macro_export]
macro_rules! critical {
    (target: $target:expr, $($arg:tt)+) => {{
        let target = ::std::format!("{}{}", $target, $crate::logging::CRITICAL_SUFFIX);
        ::log::log!(target: target.as_str(), ::log::Level::Error, $($arg)+)
    }};
    ($($arg:tt)+) => {{
        let target = ::std::format!("{}{}", ::std::module_path!(), $crate::logging::CRITICAL_SUFFIX);
        ::log::log!(target: target.as_str(), ::log::Level::Error, $($arg)+)
    }};
}
