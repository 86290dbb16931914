//! richdemo - structured console output demos.
//!
//! Commands:
//! - `showcase` (default) - Logging, progress, tables, panels, pretty
//!   printing, code panels and multi-threaded activity on one console
//! - `grid` - A grid of people panels with a live highlight cycling through
//!   them while log lines scroll above

#![forbid(unsafe_code)]

mod grid;
mod showcase;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use richdemo_console::logging::{RichLoggerBuilder, RichSubscriberBuilder};
use richdemo_console::{
    ConsoleConfig, DemoConsole, ErrorBoundary, TraceRenderer, install_panic_hook, try_display,
};

/// richdemo - Rich console output demos.
#[derive(Parser)]
#[command(name = "richdemo")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
enum Commands {
    /// Run the full feature showcase (the default).
    ///
    /// Walks through logging, progress bars, tables, panels, pretty
    /// printing, side-by-side panels and simulated activity from four
    /// worker threads.
    Showcase,

    /// Show a grid of generated people with a moving highlight.
    ///
    /// Runs RICHDEMO_GRID_CYCLES highlight steps (0 runs until interrupted).
    Grid,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Showcase);

    let config = match ConsoleConfig::load() {
        Ok(config) => config,
        Err(e) => {
            let fallback = ConsoleConfig::from_env();
            let console = DemoConsole::from_config(&fallback);
            error_boundary(&console, &fallback).display_error(&e);
            return ExitCode::FAILURE;
        }
    };
    let console = DemoConsole::from_config(&config);
    install_panic_hook(&console, config.show_backtrace);

    let boundary = error_boundary(&console, &config);
    run(command, &console, &config, &boundary);
    if boundary.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Error boundary rendering unhandled errors as traces on `console`.
fn error_boundary<'a>(console: &'a DemoConsole, config: &ConsoleConfig) -> ErrorBoundary<'a> {
    ErrorBoundary::new(console)
        .with_renderer(TraceRenderer::new().with_backtrace(config.show_backtrace))
}

/// Install logging, then run `command`. Failures are displayed through
/// `boundary`, which the caller turns into the exit code.
fn run(command: Commands, console: &DemoConsole, config: &ConsoleConfig, boundary: &ErrorBoundary<'_>) {
    let logger = try_display!(
        boundary,
        RichLoggerBuilder::from_config(console, config).init(),
        "Installing the logger"
    );
    try_display!(
        boundary,
        RichSubscriberBuilder::from_config(console, config).init(),
        "Installing the tracing subscriber"
    );

    let result = match command {
        Commands::Showcase => showcase::Showcase::new(console, config, &logger).run(),
        Commands::Grid => grid::run(console, config),
    };
    let _ = boundary.wrap(result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_showcase() {
        let cli = Cli::try_parse_from(["richdemo"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.command.unwrap_or(Commands::Showcase), Commands::Showcase);
    }

    #[test]
    fn test_grid_command() {
        let cli = Cli::try_parse_from(["richdemo", "grid"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Grid));
    }

    #[test]
    fn test_boundary_counts_command_failure() {
        let tc = richdemo_console::testing::TestConsole::new();
        let config = ConsoleConfig::new();
        let boundary = error_boundary(tc.console(), &config);
        assert_eq!(boundary.wrap("12".parse::<u16>()), Some(12));
        assert!(!boundary.has_errors());

        assert_eq!(boundary.wrap("70000".parse::<u16>()), None);
        assert!(boundary.has_errors());
        tc.assert_contains("number too large to fit in target type");
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["richdemo", "dance"]).is_err());
    }
}
