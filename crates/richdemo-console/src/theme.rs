//! Shared colour palette.

use std::sync::OnceLock;

use crate::content::StyleSpec;

/// Named styles used by every widget and the log formatter.
#[derive(Debug, Clone)]
pub struct DemoTheme {
    pub primary: StyleSpec,
    pub secondary: StyleSpec,
    pub success: StyleSpec,
    pub warning: StyleSpec,
    pub error: StyleSpec,
    pub critical: StyleSpec,
    pub info: StyleSpec,
    pub debug: StyleSpec,
    pub muted: StyleSpec,
    pub key: StyleSpec,
    pub value: StyleSpec,
    pub string: StyleSpec,
    pub number: StyleSpec,
    pub boolean: StyleSpec,
    pub null: StyleSpec,
    pub header: StyleSpec,
    pub border: StyleSpec,
    pub highlight: StyleSpec,
    pub rule: StyleSpec,
    pub timestamp: StyleSpec,
    /// syntect theme name used for code panels.
    pub syntax_theme: &'static str,
}

impl Default for DemoTheme {
    fn default() -> Self {
        Self {
            primary: StyleSpec::new("bold blue"),
            secondary: StyleSpec::new("magenta"),
            success: StyleSpec::new("green"),
            warning: StyleSpec::new("yellow"),
            error: StyleSpec::new("bold red"),
            critical: StyleSpec::new("bold white on red"),
            info: StyleSpec::new("blue"),
            debug: StyleSpec::new("green dim"),
            muted: StyleSpec::new("dim"),
            key: StyleSpec::new("cyan"),
            value: StyleSpec::new("yellow"),
            string: StyleSpec::new("green"),
            number: StyleSpec::new("bold cyan"),
            boolean: StyleSpec::new("italic bright_magenta"),
            null: StyleSpec::new("dim italic magenta"),
            header: StyleSpec::new("bold magenta"),
            border: StyleSpec::new("bright_blue"),
            highlight: StyleSpec::new("bright_yellow"),
            rule: StyleSpec::new("bright_green"),
            timestamp: StyleSpec::new("dim cyan"),
            syntax_theme: "base16-ocean.dark",
        }
    }
}

static THEME: OnceLock<DemoTheme> = OnceLock::new();

/// The process-wide theme.
#[must_use]
pub fn theme() -> &'static DemoTheme {
    THEME.get_or_init(DemoTheme::default)
}
