//! Centralized configuration for console output and the demo programs.
//!
//! `ConsoleConfig` can be built programmatically, read from a TOML file and
//! overridden by environment variables. Precedence, lowest first: defaults,
//! file, environment.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use console::Term;
use serde::Deserialize;

use crate::detection::DisplayContext;
use crate::error::{ConsoleError, ConsoleResult};

/// Where rendered output goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    #[default]
    Stdout,
    Stderr,
}

impl OutputTarget {
    /// Terminal handle for this stream.
    #[must_use]
    pub fn term(self) -> Term {
        match self {
            Self::Stdout => Term::stdout(),
            Self::Stderr => Term::stderr(),
        }
    }
}

/// Comprehensive configuration for console output
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    // Display mode
    /// Override display context (None = auto-detect)
    pub context: Option<DisplayContext>,
    /// Force color output even in non-TTY
    pub force_color: Option<bool>,
    /// Force plain text mode (no styling)
    pub force_plain: bool,
    /// Fixed render width (None = terminal width)
    pub width: Option<usize>,
    /// Output stream
    pub target: OutputTarget,

    // Logging
    /// Log level filter
    pub log_level: Option<log::Level>,
    /// Show timestamps in logs
    pub log_timestamps: bool,
    /// Show target module in logs
    pub log_targets: bool,
    /// Show file and line in logs
    pub log_file_line: bool,

    // Errors
    /// Show backtraces in formatted traces
    pub show_backtrace: bool,

    // Syntax
    /// syntect theme for code panels (None = theme default)
    pub syntax_theme: Option<String>,

    // Demo pacing
    /// Multiplier applied to every demo sleep; 0 disables sleeping
    pub speed: f64,
    /// Highlight steps in the grid demo; 0 runs until interrupted
    pub grid_cycles: usize,
    /// Minimum column width in the grid demo
    pub grid_min_width: usize,
    /// Number of generated people in the grid demo
    pub grid_people: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            context: None,
            force_color: None,
            force_plain: false,
            width: None,
            target: OutputTarget::Stdout,
            log_level: None,
            log_timestamps: true,
            log_targets: true,
            log_file_line: false,
            show_backtrace: false,
            syntax_theme: None,
            speed: 1.0,
            grid_cycles: 12,
            grid_min_width: 80,
            grid_people: 6,
        }
    }
}

/// On-disk shape of the config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    plain: Option<bool>,
    force_color: Option<bool>,
    width: Option<usize>,
    target: Option<OutputTarget>,
    log_level: Option<String>,
    log_timestamps: Option<bool>,
    log_targets: Option<bool>,
    log_file_line: Option<bool>,
    show_backtrace: Option<bool>,
    syntax_theme: Option<String>,
    speed: Option<f64>,
    grid: GridSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GridSection {
    cycles: Option<usize>,
    min_width: Option<usize>,
    people: Option<usize>,
}

impl ConsoleConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables
    ///
    /// # Environment Variables
    ///
    /// | Variable | Values | Description |
    /// |----------|--------|-------------|
    /// | `RICHDEMO_FORCE_COLOR` | (set) | Force rich output |
    /// | `RICHDEMO_PLAIN` | (set) | Force plain output |
    /// | `NO_COLOR` | (set) | Disable colors (standard) |
    /// | `RICHDEMO_LOG` | trace/debug/info/warn/error | Log level |
    /// | `RICHDEMO_LOG_TIMESTAMPS` | 0/1 | Show timestamps |
    /// | `RICHDEMO_WIDTH` | number | Fixed render width |
    /// | `RICHDEMO_SPEED` | float | Demo sleep multiplier |
    /// | `RICHDEMO_GRID_CYCLES` | number | Grid highlight steps |
    /// | `RUST_BACKTRACE` | 1/full/0 | Show backtraces unless `0` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env(|key| env::var(key).ok())
    }

    /// Load defaults, then the config file if one exists, then the
    /// environment.
    ///
    /// The file is `$RICHDEMO_CONFIG` or `<config dir>/richdemo/config.toml`.
    /// A missing default file is fine; a missing explicit file is an error.
    pub fn load() -> ConsoleResult<Self> {
        let config = match env::var_os("RICHDEMO_CONFIG") {
            Some(path) => Self::default().with_file(Path::new(&path))?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::default().with_file(&path)?,
                _ => Self::default(),
            },
        };
        Ok(config.with_env(|key| env::var(key).ok()))
    }

    /// Read a TOML config file on top of the current values.
    pub fn with_file(mut self, path: &Path) -> ConsoleResult<Self> {
        let config_err = |reason: String| ConsoleError::Config {
            path: path.to_path_buf(),
            reason,
        };
        let raw = fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        let file: FileConfig = toml::from_str(&raw).map_err(|e| config_err(e.to_string()))?;

        if let Some(plain) = file.plain {
            self.force_plain = plain;
        }
        if file.force_color.is_some() {
            self.force_color = file.force_color;
        }
        if file.width.is_some() {
            self.width = file.width;
        }
        if let Some(target) = file.target {
            self.target = target;
        }
        if let Some(level) = file.log_level {
            self.log_level = Some(
                parse_level(&level)
                    .ok_or_else(|| config_err(format!("unknown log level '{level}'")))?,
            );
        }
        if let Some(v) = file.log_timestamps {
            self.log_timestamps = v;
        }
        if let Some(v) = file.log_targets {
            self.log_targets = v;
        }
        if let Some(v) = file.log_file_line {
            self.log_file_line = v;
        }
        if let Some(v) = file.show_backtrace {
            self.show_backtrace = v;
        }
        if file.syntax_theme.is_some() {
            self.syntax_theme = file.syntax_theme;
        }
        if let Some(speed) = file.speed.filter(|s| s.is_finite()) {
            self.speed = speed.max(0.0);
        }
        if let Some(v) = file.grid.cycles {
            self.grid_cycles = v;
        }
        if let Some(v) = file.grid.min_width {
            self.grid_min_width = v.max(1);
        }
        if let Some(v) = file.grid.people {
            self.grid_people = v;
        }
        Ok(self)
    }

    /// Apply environment overrides using `lookup` to read variables.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Display mode
        if lookup("RICHDEMO_FORCE_COLOR").is_some() {
            self.force_color = Some(true);
        }
        if lookup("RICHDEMO_PLAIN").is_some() || lookup("NO_COLOR").is_some() {
            self.force_plain = true;
        }
        if let Some(width) = lookup("RICHDEMO_WIDTH").and_then(|v| v.parse::<usize>().ok()) {
            self.width = Some(width.max(1));
        }

        // Logging
        if let Some(level) = lookup("RICHDEMO_LOG") {
            self.log_level = parse_level(&level);
        }
        if lookup("RICHDEMO_LOG_TIMESTAMPS")
            .map(|v| v == "0" || v.eq_ignore_ascii_case("false"))
            .unwrap_or(false)
        {
            self.log_timestamps = false;
        }

        // Demo pacing
        if let Some(speed) = lookup("RICHDEMO_SPEED")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|s| s.is_finite())
        {
            self.speed = speed.max(0.0);
        }
        if let Some(cycles) = lookup("RICHDEMO_GRID_CYCLES").and_then(|v| v.parse().ok()) {
            self.grid_cycles = cycles;
        }

        // Errors
        if let Some(value) = lookup("RUST_BACKTRACE") {
            self.show_backtrace = value != "0";
        }

        self
    }

    // ─────────────────────────────────────────────────
    // Builder Methods
    // ─────────────────────────────────────────────────

    /// Force color output
    #[must_use]
    pub fn force_color(mut self, force: bool) -> Self {
        self.force_color = Some(force);
        self
    }

    /// Enable plain text mode (no styling)
    #[must_use]
    pub fn plain_mode(mut self) -> Self {
        self.force_plain = true;
        self
    }

    /// Set the log level
    #[must_use]
    pub fn with_log_level(mut self, level: log::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Fix the render width
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width.max(1));
        self
    }

    /// Set display context explicitly
    #[must_use]
    pub fn with_context(mut self, context: DisplayContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Set the demo sleep multiplier
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed.max(0.0);
        self
    }

    // ─────────────────────────────────────────────────
    // Resolution Methods
    // ─────────────────────────────────────────────────

    /// Resolve the display context based on config, environment and
    /// whether the configured output stream is a terminal
    #[must_use]
    pub fn resolve_context(&self) -> DisplayContext {
        if self.force_plain {
            return DisplayContext::Agent;
        }
        if let Some(true) = self.force_color {
            return DisplayContext::Human;
        }
        self.context
            .unwrap_or_else(|| DisplayContext::detect_for(&self.target.term()))
    }

    /// Check if rich output should be used based on resolved context
    #[must_use]
    pub fn should_use_rich(&self) -> bool {
        self.resolve_context().is_human()
    }

    /// Effective log level (Info when unset)
    #[must_use]
    pub fn effective_log_level(&self) -> log::Level {
        self.log_level.unwrap_or(log::Level::Info)
    }

    /// Scale a nominal demo delay by `speed`, saturating at `Duration::MAX`.
    #[must_use]
    pub fn scaled(&self, nominal: std::time::Duration) -> std::time::Duration {
        let secs = nominal.as_secs_f64() * self.speed.max(0.0);
        std::time::Duration::try_from_secs_f64(secs).unwrap_or(std::time::Duration::MAX)
    }
}

fn parse_level(value: &str) -> Option<log::Level> {
    match value.to_lowercase().as_str() {
        "trace" => Some(log::Level::Trace),
        "debug" => Some(log::Level::Debug),
        "info" => Some(log::Level::Info),
        "warn" | "warning" => Some(log::Level::Warn),
        "error" => Some(log::Level::Error),
        _ => None,
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("richdemo").join("config.toml"))
}
