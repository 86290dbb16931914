//! The full feature showcase.
//!
//! Each section renders through the same [`DemoConsole`]. Log records from
//! the global logger and the worker threads go through it too, so nothing
//! interleaves with the progress bar or the panels.

use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

use log::LevelFilter;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use richdemo_console::logging::RichLogger;
use richdemo_console::widgets::{Column, Columns, Panel, Pretty, Syntax, Table};
use richdemo_console::{
    ConsoleConfig, ConsoleResult, Content, DemoConsole, Line, Span, critical, log_error_chain, track,
};

const MAIN_TARGET: &str = "rich_demo";
const LEVELS_TARGET: &str = "levels_demo";

const DASHBOARD_CODE: &str = r#"
def update_dashboard():
    """Update the dashboard with latest metrics."""
    stats = get_system_stats()
    users = get_active_users()
    errors = get_recent_errors()

    display_panels(stats, users, errors)
"#;

const LOGGING_SETUP_CODE: &str = r#"
use richdemo_console::logging::RichLoggerBuilder;
use richdemo_console::{ConsoleConfig, DemoConsole};

let config = ConsoleConfig::load()?;
let console = DemoConsole::from_config(&config);
RichLoggerBuilder::from_config(&console, &config).init()?;

log::info!(target: "example", "Rich logging is awesome!");
"#;

#[derive(Debug, Error)]
#[error("cannot divide {numerator} by zero")]
struct DivideByZero {
    numerator: i64,
}

#[derive(Debug, Error)]
#[error("failed to compute ratio {numerator}/{denominator}")]
struct RatioError {
    numerator: i64,
    denominator: i64,
    #[source]
    source: DivideByZero,
}

fn ratio(numerator: i64, denominator: i64) -> Result<i64, RatioError> {
    numerator.checked_div(denominator).ok_or(RatioError {
        numerator,
        denominator,
        source: DivideByZero { numerator },
    })
}

#[derive(Debug, Serialize)]
struct User {
    id: u32,
    username: &'static str,
    email: &'static str,
    active: bool,
    permissions: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct Server {
    name: &'static str,
    ip: &'static str,
    ports: Vec<u16>,
    config: serde_json::Value,
    status: &'static str,
    uptime: &'static str,
}

impl Server {
    fn new(name: &'static str, ip: &'static str, ports: Vec<u16>, config: serde_json::Value) -> Self {
        Self {
            name,
            ip,
            ports,
            config,
            status: "running",
            uptime: "3d 12h 45m",
        }
    }
}

/// Runs every showcase section in order.
pub struct Showcase<'a> {
    console: &'a DemoConsole,
    config: &'a ConsoleConfig,
    logger: &'a RichLogger,
}

impl<'a> Showcase<'a> {
    pub fn new(console: &'a DemoConsole, config: &'a ConsoleConfig, logger: &'a RichLogger) -> Self {
        Self {
            console,
            config,
            logger,
        }
    }

    pub fn run(&self) -> ConsoleResult<()> {
        let theme = self.console.theme();
        self.console.clear()?;
        self.console
            .print_styled("Comprehensive Rich Logging Demo", theme.primary.clone())?;
        self.console.print_styled(
            "Showing both basic and advanced features of the console library",
            theme.warning.clone(),
        )?;
        self.console.newline()?;

        self.console.rule(Some("Basic Rich Features"))?;
        self.basic_logging()?;
        self.console.newline()?;
        self.progress()?;
        self.console.newline()?;
        self.tables()?;
        self.console.newline()?;
        self.panels()?;
        self.console.newline()?;

        self.console.rule(Some("Advanced Rich Features"))?;
        self.log_levels()?;
        self.console.newline()?;
        self.pretty_printing()?;
        self.console.newline()?;
        self.side_by_side_panels()?;
        self.console.newline()?;
        self.simulated_activity()?;
        self.console.newline()?;

        self.logging_example()?;
        self.console.rule(None)?;
        self.console
            .print_styled("Comprehensive Rich logging demo completed!", theme.success.clone())
    }

    fn pause(&self, seconds: f64) {
        let delay = self.config.scaled(Duration::from_secs_f64(seconds));
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    // ─────────────────────────────────────────────────
    // Basic sections
    // ─────────────────────────────────────────────────

    fn basic_logging(&self) -> ConsoleResult<()> {
        self.console.rule(Some("Basic Logging Demo"))?;
        log::info!(target: MAIN_TARGET, "This is a basic info message");
        log::warn!(target: MAIN_TARGET, "This is a warning message with highlighted text");
        log::error!(target: MAIN_TARGET, "This is an error message with {}", "dynamic content");
        log::debug!(target: MAIN_TARGET, "This debug message won't show with default settings");

        self.logger.set_target_level(MAIN_TARGET, LevelFilter::Debug);
        log::debug!(target: MAIN_TARGET, "Now you can see debug messages!");
        self.logger.clear_target_level(MAIN_TARGET);

        if let Err(err) = ratio(1, 0) {
            log_error_chain(self.console, MAIN_TARGET, "An exception occurred", &err)?;
        }
        Ok(())
    }

    fn progress(&self) -> ConsoleResult<()> {
        self.console.rule(Some("Progress Bar Demo"))?;
        self.console.print("Simple progress bar:")?;

        let mut steps = track(0..50, "Processing...", self.console);
        for _ in steps.by_ref() {
            self.pause(0.02);
        }
        steps.finish()?;

        self.console
            .print_styled("Done!", self.console.theme().success.clone())
    }

    fn tables(&self) -> ConsoleResult<()> {
        self.console.rule(Some("Tables Demo"))?;
        self.console.render(&features_table())
    }

    fn panels(&self) -> ConsoleResult<()> {
        self.console.rule(Some("Panels Demo"))?;
        let text = Line::from_spans(vec![
            Span::styled("Rich", "bold green"),
            Span::plain(" makes creating beautiful terminal output easy"),
        ]);
        self.console
            .render(&Panel::fit(text).title("About Rich").border_style("blue"))
    }

    // ─────────────────────────────────────────────────
    // Advanced sections
    // ─────────────────────────────────────────────────

    fn log_levels(&self) -> ConsoleResult<()> {
        self.console.rule(Some("Log Levels Demo"))?;

        log::debug!(target: LEVELS_TARGET, "This is a DEBUG message (won't show with default settings)");
        log::info!(target: LEVELS_TARGET, "This is an INFO message");
        log::warn!(target: LEVELS_TARGET, "This is a WARNING message");
        log::error!(target: LEVELS_TARGET, "This is an ERROR message");
        critical!(target: LEVELS_TARGET, "This is a CRITICAL message");

        self.console.newline()?;
        self.console.print_styled(
            "Changing log level to DEBUG to show all messages...",
            self.console.theme().warning.clone(),
        )?;
        self.logger.set_target_level(LEVELS_TARGET, LevelFilter::Debug);
        log::debug!(target: LEVELS_TARGET, "Now you can see DEBUG messages too!");
        self.logger.clear_target_level(LEVELS_TARGET);
        Ok(())
    }

    fn pretty_printing(&self) -> ConsoleResult<()> {
        self.console.rule(Some("Pretty Printing Demo"))?;

        let alice = User {
            id: 1001,
            username: "alice_admin",
            email: "alice@example.com",
            active: true,
            permissions: vec!["read", "write", "admin"],
        };
        let bob = User {
            id: 1002,
            username: "bob_user",
            email: "bob@example.com",
            active: false,
            permissions: vec!["read"],
        };
        let db = Server::new(
            "prod-db-01",
            "192.168.1.100",
            vec![22, 80, 443, 5432],
            json!({
                "max_connections": 1000,
                "timeout": 30,
                "ssl_enabled": true,
                "backup": { "schedule": "daily", "retention": "7d" },
            }),
        );
        let app = Server::new(
            "prod-app-01",
            "192.168.1.101",
            vec![22, 8080],
            json!({ "workers": 4, "debug": false, "env": "production" }),
        );
        let statistics = json!({
            "total_users": 2,
            "active_users": 1,
            "server_status": [["prod-db-01", "up"], ["prod-app-01", "up"]],
            "performance": { "cpu": 0.35, "memory": 0.7, "disk": 0.5 },
        });

        self.heading("Pretty printing User object:")?;
        self.console.render(&Pretty::new(&alice)?)?;

        self.heading("Pretty printing a list of User objects:")?;
        self.console.render(&Pretty::new(&[&alice, &bob])?)?;

        self.heading("Pretty printing Server object:")?;
        self.console.render(&Pretty::new(&db)?)?;

        let mut nested = BTreeMap::new();
        nested.insert("users", serde_json::to_value([&alice, &bob]).unwrap_or_default());
        nested.insert("servers", serde_json::to_value([&db, &app]).unwrap_or_default());
        nested.insert("statistics", statistics.clone());
        self.heading("Pretty printing complex nested structure:")?;
        self.console.render(&Pretty::new(&nested)?)?;

        self.heading("Fully expanded:")?;
        self.console
            .render(&Pretty::from_value(statistics).expand_all(true))
    }

    fn heading(&self, text: &str) -> ConsoleResult<()> {
        self.console.newline()?;
        self.console.print_styled(text, self.console.theme().primary.clone())
    }

    fn side_by_side_panels(&self) -> ConsoleResult<()> {
        self.console.rule(Some("Side-by-Side Panels Demo"))?;
        self.console.print_styled(
            "Displaying system information in side-by-side panels",
            "bold yellow",
        )?;

        let row = Columns::new()
            .with(
                Panel::new(system_stats())
                    .title(Line::styled("System Statistics", "bold blue"))
                    .border_style("blue"),
            )
            .with(
                Panel::new(active_users())
                    .title(Line::styled("Active Users", "bold green"))
                    .border_style("green"),
            )
            .with(
                Panel::new(recent_errors())
                    .title(Line::styled("Recent Errors", "bold red"))
                    .border_style("red"),
            );
        self.console.render(&row)?;

        let code = Syntax::new(DASHBOARD_CODE, "python")
            .theme(self.console.syntax_theme())
            .line_numbers(true);
        self.console.render(
            &Panel::new(code)
                .title(Line::styled("Dashboard Update Code", "bold magenta"))
                .border_style("magenta"),
        )?;
        self.console.newline()
    }

    fn simulated_activity(&self) -> ConsoleResult<()> {
        self.console.rule(Some("Simulated System Activity"))?;
        self.console.print_styled(
            "Starting simulated system activity...",
            self.console.theme().warning.clone(),
        )?;

        let config = self.config;
        thread::scope(|s| {
            s.spawn(|| {
                let _span = tracing::info_span!("system").entered();
                worker_finished(system_activity(config));
            });
            s.spawn(|| {
                let _span = tracing::info_span!("network").entered();
                worker_finished(network_activity(config));
            });
            s.spawn(|| {
                let _span = tracing::info_span!("database").entered();
                worker_finished(database_activity(config));
            });
            s.spawn(|| {
                let _span = tracing::info_span!("auth").entered();
                worker_finished(auth_activity(config));
            });
        });

        self.console.newline()?;
        self.console
            .print_styled("Simulation completed!", "bold green")
    }

    fn logging_example(&self) -> ConsoleResult<()> {
        let code = Syntax::new(LOGGING_SETUP_CODE, "rs")
            .theme(self.console.syntax_theme())
            .line_numbers(true);
        self.console.render(
            &Panel::new(code)
                .title("How to Set Up Rich Logging")
                .border_style("green"),
        )
    }
}

fn features_table() -> Table {
    let mut table = Table::new()
        .title("Rich Features Overview")
        .column(Column::new("Feature").style("cyan"))
        .column(Column::new("Description").style("green"))
        .column(Column::new("Example").style("magenta"));

    let rows = [
        ("Logging", "Enhanced logging with colors and formatting", "log::info!(\"Message\")"),
        ("Progress Bars", "Visual progress indicators", "track(0..100, ..)"),
        ("Tables", "Structured tabular data", "Table::new().title(\"Example\")"),
        ("Panels", "Boxed content with borders", "Panel::new(\"Content\")"),
        ("Markdown", "Render markdown content", "Markdown::new(\"# Title\")"),
    ];
    for (feature, description, example) in rows {
        table.add_row_cells([feature, description, example]);
    }
    table
}

fn system_stats() -> Content {
    let stats = [
        ("cpu_usage", "32.5"),
        ("memory_usage", "48.7"),
        ("disk_usage", "76.2"),
        ("network_throughput", "1.2 GB/s"),
        ("processes", "186"),
        ("uptime", "3d 12h 45m"),
    ];
    Content::from_lines(
        stats
            .into_iter()
            .map(|(key, value)| {
                Line::from_spans(vec![
                    Span::styled(key, "cyan"),
                    Span::plain(": "),
                    Span::styled(value, "yellow"),
                ])
            })
            .collect(),
    )
}

fn active_users() -> Content {
    let users = [
        ("alice", "admin", "2h 15m"),
        ("bob", "user", "45m"),
        ("charlie", "developer", "5h 30m"),
        ("dave", "user", "10m"),
    ];
    Content::from_lines(
        users
            .into_iter()
            .map(|(name, role, session)| {
                Line::from_spans(vec![
                    Span::styled(name, "bold"),
                    Span::plain(" ("),
                    Span::styled(role, "green"),
                    Span::plain(format!("): {session}")),
                ])
            })
            .collect(),
    )
}

fn recent_errors() -> Content {
    let errors = [
        ("10:45:23", "web-server", "Connection timeout"),
        ("11:02:15", "database", "Query execution error"),
        ("11:15:07", "auth", "Failed login attempt"),
    ];
    Content::from_lines(
        errors
            .into_iter()
            .map(|(time, service, message)| {
                Line::from_spans(vec![
                    Span::styled(time, "dim"),
                    Span::plain(" - "),
                    Span::styled(service, "bold red"),
                    Span::plain(format!(": {message}")),
                ])
            })
            .collect(),
    )
}

// ─────────────────────────────────────────────────
// Worker threads
// ─────────────────────────────────────────────────

const WORKERS_TARGET: &str = "workers";

/// Report a worker's event count; the enclosing span names the worker.
fn worker_finished(events: usize) {
    tracing::info!(target: WORKERS_TARGET, events, "worker finished");
}

fn nap(config: &ConsoleConfig, rng: &mut impl Rng, min: f64, max: f64) {
    let delay = config.scaled(Duration::from_secs_f64(rng.random_range(min..max)));
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}

fn system_activity(config: &ConsoleConfig) -> usize {
    const ACTIVITIES: [&str; 5] = [
        "Starting system services",
        "Checking disk space",
        "Monitoring CPU usage",
        "Running scheduled tasks",
        "Cleaning temporary files",
    ];
    let mut rng = rand::rng();
    let mut events = 0;
    for _ in 0..10 {
        if let Some(activity) = ACTIVITIES.choose(&mut rng) {
            log::info!(target: "system", "{activity}");
            events += 1;
        }
        nap(config, &mut rng, 0.5, 1.5);
    }
    if rng.random_bool(0.3) {
        log::warn!(target: "system", "High memory usage detected");
        events += 1;
    }
    events
}

fn network_activity(config: &ConsoleConfig) -> usize {
    let mut rng = rand::rng();
    let mut events = 0;
    for _ in 0..8 {
        if rng.random_bool(0.7) {
            log::info!(target: "network", "Connection from IP: 192.168.1.{}", rng.random_range(2..=254));
        } else {
            log::warn!(
                target: "network",
                "Failed connection attempt from IP: 10.0.0.{}",
                rng.random_range(2..=254)
            );
        }
        events += 1;
        nap(config, &mut rng, 0.3, 1.0);
    }
    if rng.random_bool(0.2) {
        log::error!(target: "network", "Network interface down");
        events += 1;
    }
    events
}

fn database_activity(config: &ConsoleConfig) -> usize {
    const TABLES: [&str; 5] = ["users", "products", "orders", "inventory", "payments"];
    const OPERATIONS: [&str; 4] = ["SELECT", "INSERT", "UPDATE", "DELETE"];
    let mut rng = rand::rng();
    let mut events = 0;
    for _ in 0..12 {
        let table = TABLES.choose(&mut rng).copied().unwrap_or("users");
        let operation = OPERATIONS.choose(&mut rng).copied().unwrap_or("SELECT");
        if rng.random_bool(0.8) {
            log::info!(target: "database", "{operation} operation on {table} table");
        } else {
            log::warn!(target: "database", "Slow query detected: {operation} on {table}");
        }
        events += 1;
        nap(config, &mut rng, 0.2, 0.8);
    }
    if rng.random_bool(0.15) {
        log::error!(target: "database", "Database connection timeout");
        events += 1;
    }
    events
}

fn auth_activity(config: &ConsoleConfig) -> usize {
    const USERS: [&str; 6] = ["alice", "bob", "charlie", "dave", "eve", "frank"];
    let mut rng = rand::rng();
    let mut events = 0;
    for _ in 0..6 {
        let user = USERS.choose(&mut rng).copied().unwrap_or("alice");
        if rng.random_bool(0.85) {
            log::info!(target: "auth", "User '{user}' logged in successfully");
        } else {
            log::warn!(target: "auth", "Failed login attempt for user '{user}'");
            if rng.random_bool(0.3) {
                critical!(target: "auth", "Multiple failed login attempts for '{user}'");
                events += 1;
            }
        }
        events += 1;
        nap(config, &mut rng, 0.5, 2.0);
    }
    events
}
