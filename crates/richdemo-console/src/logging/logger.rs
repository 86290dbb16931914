//! Rich-formatted `log` crate backend.
//!
//! Records are formatted with [`RichLogFormatter`] and written through the
//! console's coordinator, so log lines from many threads never interleave
//! and never land inside a live progress bar.
//!
//! # Usage
//!
//! ```ignore
//! use richdemo_console::logging::RichLogger;
//! use log::LevelFilter;
//!
//! let logger = RichLogger::builder(&console)
//!     .level(LevelFilter::Info)
//!     .with_file_line(true)
//!     .init()?;
//!
//! // later: turn on debug output for one subsystem
//! logger.set_target_level("demo.network", LevelFilter::Debug);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::{LevelFilter, Log, Metadata, Record};
use time::OffsetDateTime;
use time::macros::format_description;

use super::formatter::classify;
use super::{LogEvent, RichLogFormatter};
use crate::config::ConsoleConfig;
use crate::console::DemoConsole;

/// Rich-formatted logger writing through a [`DemoConsole`].
pub struct RichLogger {
    console: DemoConsole,
    formatter: RichLogFormatter,
    min_level: LevelFilter,
    targets: RwLock<HashMap<String, LevelFilter>>,
    show_timestamps: bool,
}

impl RichLogger {
    /// Create a logger with default formatting.
    #[must_use]
    pub fn new(console: &DemoConsole, min_level: LevelFilter) -> Self {
        RichLoggerBuilder::new(console).level(min_level).build()
    }

    #[must_use]
    pub fn builder(console: &DemoConsole) -> RichLoggerBuilder {
        RichLoggerBuilder::new(console)
    }

    /// Override the level for `target` and everything below it
    /// (`demo.network` also covers `demo.network.dns`).
    pub fn set_target_level(&self, target: impl Into<String>, level: LevelFilter) {
        self.targets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(target.into(), level);
        if log::max_level() < level {
            log::set_max_level(level);
        }
    }

    /// Drop an override set with [`set_target_level`](Self::set_target_level).
    pub fn clear_target_level(&self, target: &str) {
        self.targets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(target);
    }

    /// Level in force for `target`: the most specific override, or the
    /// logger's minimum level.
    #[must_use]
    pub fn level_for(&self, target: &str) -> LevelFilter {
        let targets = self.targets.read().unwrap_or_else(PoisonError::into_inner);
        targets
            .iter()
            .filter(|(prefix, _)| covers(prefix, target))
            .max_by_key(|(prefix, _)| prefix.len())
            .map_or(self.min_level, |(_, level)| *level)
    }

    fn record_to_event(&self, record: &Record) -> LogEvent {
        let (level, target) = classify(record.level(), record.target());
        let mut event = LogEvent::new(level, record.args().to_string()).with_target(target);

        if self.show_timestamps {
            if let Ok(ts) = OffsetDateTime::now_utc().format(format_description!("[hour]:[minute]:[second]")) {
                event = event.with_timestamp(ts);
            }
        }
        if let Some(file) = record.file() {
            event = event.with_file(file);
        }
        if let Some(line) = record.line() {
            event = event.with_line(line);
        }
        event
    }
}

fn covers(prefix: &str, target: &str) -> bool {
    match target.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('.') || rest.starts_with("::"),
        None => false,
    }
}

impl Log for RichLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let (_, target) = classify(metadata.level(), metadata.target());
        metadata.level() <= self.level_for(target)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let content = self.formatter.format(&self.record_to_event(record));
        // A closed output has nowhere to report to.
        let _ = self.console.print_content(content);
    }

    fn flush(&self) {}
}

/// Forwards the global `log` facade to a shared logger so the caller keeps
/// a handle for runtime level changes.
struct GlobalLogger(Arc<RichLogger>);

impl Log for GlobalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.0.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        self.0.log(record);
    }

    fn flush(&self) {
        self.0.flush();
    }
}

/// Builder for configuring the rich logger.
#[derive(Debug)]
pub struct RichLoggerBuilder {
    console: DemoConsole,
    min_level: LevelFilter,
    show_timestamps: bool,
    show_targets: bool,
    show_file_line: bool,
    align_file_line: bool,
    targets: HashMap<String, LevelFilter>,
}

impl RichLoggerBuilder {
    #[must_use]
    pub fn new(console: &DemoConsole) -> Self {
        Self {
            console: console.clone(),
            min_level: LevelFilter::Info,
            show_timestamps: true,
            show_targets: true,
            show_file_line: false,
            align_file_line: true,
            targets: HashMap::new(),
        }
    }

    /// Take level and display toggles from config.
    #[must_use]
    pub fn from_config(console: &DemoConsole, config: &ConsoleConfig) -> Self {
        Self::new(console)
            .level(config.effective_log_level().to_level_filter())
            .with_timestamps(config.log_timestamps)
            .with_targets(config.log_targets)
            .with_file_line(config.log_file_line)
    }

    #[must_use]
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub fn target_level(mut self, target: impl Into<String>, level: LevelFilter) -> Self {
        self.targets.insert(target.into(), level);
        self
    }

    #[must_use]
    pub fn with_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = show;
        self
    }

    #[must_use]
    pub fn with_targets(mut self, show: bool) -> Self {
        self.show_targets = show;
        self
    }

    #[must_use]
    pub fn with_file_line(mut self, show: bool) -> Self {
        self.show_file_line = show;
        self
    }

    /// Right-align `file:line` to the console width (on by default).
    #[must_use]
    pub fn align_file_line(mut self, align: bool) -> Self {
        self.align_file_line = align;
        self
    }

    /// Most verbose level any target may log at; the global `log` filter.
    #[must_use]
    pub fn max_level(&self) -> LevelFilter {
        self.targets
            .values()
            .copied()
            .fold(self.min_level, Ord::max)
    }

    #[must_use]
    pub fn build(self) -> RichLogger {
        let width = self.align_file_line.then(|| self.console.width());
        let formatter = RichLogFormatter::new(self.console.theme())
            .with_timestamp(self.show_timestamps)
            .with_target(self.show_targets)
            .with_file_line(self.show_file_line)
            .with_max_width(width);

        RichLogger {
            console: self.console,
            formatter,
            min_level: self.min_level,
            targets: RwLock::new(self.targets),
            show_timestamps: self.show_timestamps,
        }
    }

    /// Build and install as the global logger, returning a handle for
    /// runtime level changes.
    pub fn init(self) -> Result<Arc<RichLogger>, log::SetLoggerError> {
        let max = self.max_level();
        let logger = Arc::new(self.build());
        log::set_boxed_logger(Box::new(GlobalLogger(Arc::clone(&logger))))?;
        log::set_max_level(max);
        Ok(logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestConsole;
    use log::Level;

    fn metadata(level: Level, target: &str) -> Metadata<'_> {
        Metadata::builder().level(level).target(target).build()
    }

    fn emit(logger: &RichLogger, level: Level, target: &str, message: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .target(target)
                .args(format_args!("{message}"))
                .file(Some("src/demo.rs"))
                .line(Some(7))
                .build(),
        );
    }

    #[test]
    fn test_level_threshold() {
        let tc = TestConsole::new();
        let logger = RichLogger::new(tc.console(), LevelFilter::Info);
        assert!(logger.enabled(&metadata(Level::Error, "test")));
        assert!(logger.enabled(&metadata(Level::Info, "test")));
        assert!(!logger.enabled(&metadata(Level::Debug, "test")));
    }

    #[test]
    fn test_target_override_covers_children() {
        let tc = TestConsole::new();
        let logger = RichLogger::new(tc.console(), LevelFilter::Info);
        logger.set_target_level("demo.network", LevelFilter::Debug);
        assert!(logger.enabled(&metadata(Level::Debug, "demo.network")));
        assert!(logger.enabled(&metadata(Level::Debug, "demo.network.dns")));
        assert!(!logger.enabled(&metadata(Level::Debug, "demo.networking")));
        assert!(!logger.enabled(&metadata(Level::Debug, "demo.system")));

        logger.clear_target_level("demo.network");
        assert!(!logger.enabled(&metadata(Level::Debug, "demo.network")));
    }

    #[test]
    fn test_most_specific_override_wins() {
        let tc = TestConsole::new();
        let logger = RichLogger::builder(tc.console())
            .target_level("demo", LevelFilter::Error)
            .target_level("demo.auth", LevelFilter::Trace)
            .build();
        assert_eq!(logger.level_for("demo.auth.tokens"), LevelFilter::Trace);
        assert_eq!(logger.level_for("demo.db"), LevelFilter::Error);
        assert_eq!(logger.level_for("other"), LevelFilter::Info);
    }

    #[test]
    fn test_writes_through_console() {
        let tc = TestConsole::new();
        let logger = RichLogger::builder(tc.console())
            .with_timestamps(false)
            .with_file_line(true)
            .build();
        emit(&logger, Level::Warn, "demo.db", "slow query");
        emit(&logger, Level::Debug, "demo.db", "hidden");

        let lines = tc.output();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("WARNING  demo.db - slow query"));
        assert!(lines[0].ends_with("demo.rs:7"));
        assert_eq!(lines[0].chars().count(), 80);
    }

    #[test]
    fn test_critical_marker() {
        let tc = TestConsole::new();
        let logger = RichLogger::builder(tc.console()).with_timestamps(false).build();
        emit(&logger, Level::Error, "demo::critical", "disk on fire");
        tc.assert_contains("CRITICAL demo - disk on fire");
    }

    #[test]
    fn test_builder_defaults() {
        let tc = TestConsole::new();
        let builder = RichLoggerBuilder::new(tc.console());
        assert_eq!(builder.min_level, LevelFilter::Info);
        assert!(builder.show_timestamps);
        assert!(builder.show_targets);
        assert!(!builder.show_file_line);
    }

    #[test]
    fn test_max_level_includes_target_overrides() {
        let tc = TestConsole::new();
        let builder = RichLoggerBuilder::new(tc.console()).level(LevelFilter::Warn);
        assert_eq!(builder.max_level(), LevelFilter::Warn);

        let builder = builder
            .target_level("demo.db", LevelFilter::Error)
            .target_level("demo.auth", LevelFilter::Trace);
        assert_eq!(builder.max_level(), LevelFilter::Trace);

        let quiet = RichLoggerBuilder::new(tc.console())
            .level(LevelFilter::Info)
            .target_level("demo.db", LevelFilter::Off);
        assert_eq!(quiet.max_level(), LevelFilter::Info);
    }

    #[test]
    fn test_from_config() {
        let tc = TestConsole::new();
        let mut config = ConsoleConfig::new().with_log_level(Level::Debug);
        config.log_timestamps = false;
        let builder = RichLoggerBuilder::from_config(tc.console(), &config);
        assert_eq!(builder.min_level, LevelFilter::Debug);
        assert!(!builder.show_timestamps);
    }
}
