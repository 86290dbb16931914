//! Rich tracing subscriber integration.
//!
//! Provides a tracing `Layer` and builder that route events through the
//! [`RichLogFormatter`] and the console's coordinator.

use std::fmt;

use time::OffsetDateTime;
use time::macros::format_description;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

use crate::config::ConsoleConfig;
use crate::console::DemoConsole;

use super::{LogEvent, LogLevel, RichLogFormatter};

/// A tracing layer that renders events using rich formatting.
pub struct RichLayer {
    formatter: RichLogFormatter,
    console: DemoConsole,
    include_timestamps: bool,
}

impl RichLayer {
    #[must_use]
    pub fn new(console: &DemoConsole, formatter: RichLogFormatter, include_timestamps: bool) -> Self {
        Self {
            formatter,
            console: console.clone(),
            include_timestamps,
        }
    }

    fn timestamp_string(&self) -> Option<String> {
        if !self.include_timestamps {
            return None;
        }
        OffsetDateTime::now_utc()
            .format(format_description!("[hour]:[minute]:[second]"))
            .ok()
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl FieldCollector {
    fn record_value(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            if self.message.is_none() {
                self.message = Some(value);
            }
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field, value.to_string());
    }
}

impl RichLayer {
    /// Convert a tracing event (plus its span scope) to a [`LogEvent`].
    fn to_log_event<S>(&self, event: &Event<'_>, ctx: &Context<'_, S>) -> LogEvent
    where
        S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    {
        let metadata = event.metadata();
        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<String> = scope.from_root().map(|span| span.name().to_string()).collect();
            if !spans.is_empty() {
                collector.fields.push(("span".to_string(), spans.join("::")));
            }
        }

        let level = LogLevel::from(*metadata.level());
        let message = collector
            .message
            .unwrap_or_else(|| metadata.name().to_string());

        let mut log_event = LogEvent::new(level, message).with_target(metadata.target());
        if let Some(ts) = self.timestamp_string() {
            log_event = log_event.with_timestamp(ts);
        }
        if let Some(file) = metadata.file() {
            log_event = log_event.with_file(file);
        }
        if let Some(line) = metadata.line() {
            log_event = log_event.with_line(line);
        }
        for (key, value) in collector.fields {
            log_event = log_event.with_field(key, value);
        }
        log_event
    }
}

impl<S> Layer<S> for RichLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let log_event = self.to_log_event(event, &ctx);
        let _ = self.console.print_content(self.formatter.format(&log_event));
    }
}

/// Builder for configuring a rich tracing subscriber.
#[derive(Debug)]
pub struct RichSubscriberBuilder {
    console: DemoConsole,
    show_timestamps: bool,
    show_targets: bool,
    show_file_line: bool,
    level_filter: LevelFilter,
}

impl RichSubscriberBuilder {
    #[must_use]
    pub fn new(console: &DemoConsole) -> Self {
        Self {
            console: console.clone(),
            show_timestamps: true,
            show_targets: true,
            show_file_line: false,
            level_filter: LevelFilter::INFO,
        }
    }

    /// Take level and display toggles from config, matching
    /// [`RichLoggerBuilder::from_config`](super::RichLoggerBuilder::from_config).
    #[must_use]
    pub fn from_config(console: &DemoConsole, config: &ConsoleConfig) -> Self {
        let level = match config.effective_log_level() {
            log::Level::Error => tracing::Level::ERROR,
            log::Level::Warn => tracing::Level::WARN,
            log::Level::Info => tracing::Level::INFO,
            log::Level::Debug => tracing::Level::DEBUG,
            log::Level::Trace => tracing::Level::TRACE,
        };
        Self::new(console)
            .with_level_filter(LevelFilter::from_level(level))
            .with_timestamps(config.log_timestamps)
            .with_targets(config.log_targets)
            .with_file_line(config.log_file_line)
    }

    /// Toggle timestamp rendering.
    #[must_use]
    pub fn with_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = show;
        self
    }

    /// Toggle target/module rendering.
    #[must_use]
    pub fn with_targets(mut self, show: bool) -> Self {
        self.show_targets = show;
        self
    }

    /// Toggle file:line rendering.
    #[must_use]
    pub fn with_file_line(mut self, show: bool) -> Self {
        self.show_file_line = show;
        self
    }

    /// Set the minimum log level.
    #[must_use]
    pub fn with_level_filter(mut self, filter: LevelFilter) -> Self {
        self.level_filter = filter;
        self
    }

    /// Build the layer alone, for composing with other layers.
    #[must_use]
    pub fn layer(&self) -> RichLayer {
        let formatter = RichLogFormatter::new(self.console.theme())
            .with_timestamp(self.show_timestamps)
            .with_target(self.show_targets)
            .with_file_line(self.show_file_line)
            .with_max_width(Some(self.console.width()));
        RichLayer::new(&self.console, formatter, self.show_timestamps)
    }

    /// Build the subscriber without installing it.
    #[must_use]
    pub fn build(self) -> impl Subscriber + Send + Sync {
        let layer = self.layer();
        tracing_subscriber::registry()
            .with(self.level_filter)
            .with(layer)
    }

    /// Build and install as the global subscriber.
    pub fn init(self) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
        tracing::subscriber::set_global_default(self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestConsole;

    #[test]
    fn test_builder_defaults() {
        let tc = TestConsole::new();
        let builder = RichSubscriberBuilder::new(tc.console());
        assert!(builder.show_timestamps);
        assert!(builder.show_targets);
        assert!(!builder.show_file_line);
        assert_eq!(builder.level_filter, LevelFilter::INFO);
    }

    #[test]
    fn test_from_config() {
        let tc = TestConsole::new();
        let mut config = ConsoleConfig::new().with_log_level(log::Level::Warn);
        config.log_timestamps = false;
        let builder = RichSubscriberBuilder::from_config(tc.console(), &config);
        assert_eq!(builder.level_filter, LevelFilter::WARN);
        assert!(!builder.show_timestamps);

        tracing::subscriber::with_default(builder.build(), || {
            tracing::info!(target: "demo.db", "quiet");
            tracing::warn!(target: "demo.db", "loud");
        });
        tc.assert_not_contains("quiet");
        tc.assert_contains("WARNING  demo.db - loud");
    }

    #[test]
    fn test_events_reach_console() {
        let tc = TestConsole::new();
        let subscriber = RichSubscriberBuilder::new(tc.console())
            .with_timestamps(false)
            .build();
        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("request");
            let _entered = span.enter();
            tracing::warn!(target: "demo.auth", user = "alice", "login failed");
            tracing::debug!(target: "demo.auth", "filtered out");
        });
        let lines = tc.output();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("WARNING  demo.auth - login failed"));
        assert!(lines[0].contains("user=alice"));
        assert!(lines[0].contains("span=request"));
    }
}
