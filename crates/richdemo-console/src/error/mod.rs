//! Error types and the [`ErrorBoundary`] display wrapper.
//!
//! Every fallible console operation returns [`ConsoleResult`]. Errors are
//! never retried locally; they surface to the caller, which usually hands
//! them to an [`ErrorBoundary`] to be rendered as a formatted trace.

mod boundary;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use boundary::ErrorBoundary;

/// Failures surfaced by the output coordinator and renderers.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The destination stream is no longer writable.
    #[error("output stream is closed")]
    OutputClosed,

    /// The renderer rejected the content it was given.
    #[error("render failure: {reason}")]
    RenderFailure { reason: String },

    /// Any other I/O failure from the underlying stream.
    #[error("console I/O error: {0}")]
    Io(#[source] io::Error),

    /// A configuration file could not be read or parsed.
    #[error("invalid config file {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl ConsoleError {
    pub fn render_failure(reason: impl Into<String>) -> Self {
        Self::RenderFailure {
            reason: reason.into(),
        }
    }

    /// True for the terminal "stream is gone" condition.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::OutputClosed)
    }
}

impl From<io::Error> for ConsoleError {
    fn from(err: io::Error) -> Self {
        // A reader that went away (`richdemo | head`) is the same as a closed sink.
        if err.kind() == io::ErrorKind::BrokenPipe {
            Self::OutputClosed
        } else {
            Self::Io(err)
        }
    }
}

/// Result alias used across the crate.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
