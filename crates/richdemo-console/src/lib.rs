#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod console;
pub mod content;
pub mod coordinator;
pub mod detection;
pub mod diagnostics; // Error traces and panic hook
pub mod error; // Error types and boundary wrapper
pub mod live; // Live display of any renderable
pub mod logging; // Rich log formatter (RichLogFormatter, RichLogger)
pub mod progress; // Progress bars
pub mod render;
pub mod testing; // Test utilities
pub mod theme;
pub mod widgets; // Rules, tables, panels, layout, syntax, pretty

pub use config::ConsoleConfig;
pub use console::DemoConsole;
pub use content::{Content, Justify, Line, RenderRequest, Span, StyleSpec};
pub use coordinator::{OutputCoordinator, OutputGuard, RegionId};
pub use detection::{DisplayContext, should_enable_rich};
pub use diagnostics::{Trace, TraceRenderer, install_panic_hook, log_error_chain};
pub use error::{ConsoleError, ConsoleResult, ErrorBoundary};
pub use live::LiveDisplay;
pub use progress::{ProgressState, ProgressTracker, track};
pub use theme::theme;
