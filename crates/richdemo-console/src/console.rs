//! Configured console facade over the output coordinator

use std::io;
use std::sync::Arc;

use crate::config::{ConsoleConfig, OutputTarget};
use crate::content::{Content, Line, RenderRequest, StyleSpec};
use crate::coordinator::OutputCoordinator;
use crate::error::ConsoleResult;
use crate::render::renderer_for;
use crate::theme::DemoTheme;
use crate::widgets::{Renderable, Rule};

/// Producer-facing console handle.
///
/// Cheap to clone; every clone writes through the same
/// [`OutputCoordinator`]. Producers receive a handle at construction
/// instead of reaching for a global.
#[derive(Clone)]
pub struct DemoConsole {
    coordinator: Arc<OutputCoordinator>,
    theme: &'static DemoTheme,
    syntax_theme: String,
    height: Option<usize>,
}

impl DemoConsole {
    /// Build a console for stdout/stderr according to `config`.
    #[must_use]
    pub fn from_config(config: &ConsoleConfig) -> Self {
        let rich = config.should_use_rich();
        let term = config.target.term();
        let width = config
            .width
            .or_else(|| term.size_checked().map(|(_, cols)| usize::from(cols)))
            .unwrap_or(80);
        let redraw = rich && term.is_term();
        let height = term
            .is_term()
            .then(|| term.size_checked().map(|(rows, _)| usize::from(rows)))
            .flatten();

        let builder = match config.target {
            OutputTarget::Stdout => OutputCoordinator::builder(io::stdout()),
            OutputTarget::Stderr => OutputCoordinator::builder(io::stderr()),
        };
        let coordinator = builder
            .renderer(renderer_for(rich))
            .width(width)
            .redraw_live(redraw)
            .build();

        let mut console = Self::with_coordinator(Arc::new(coordinator));
        if let Some(name) = &config.syntax_theme {
            console.syntax_theme.clone_from(name);
        }
        console.height = height;
        console
    }

    /// Wrap an existing coordinator.
    #[must_use]
    pub fn with_coordinator(coordinator: Arc<OutputCoordinator>) -> Self {
        let theme = crate::theme::theme();
        Self {
            coordinator,
            theme,
            syntax_theme: theme.syntax_theme.to_string(),
            height: None,
        }
    }

    // ─────────────────────────────────────────────────
    // State Queries
    // ─────────────────────────────────────────────────

    /// Check if rich output is enabled
    pub fn is_rich(&self) -> bool {
        self.coordinator.is_rich()
    }

    /// Get the theme
    pub fn theme(&self) -> &'static DemoTheme {
        self.theme
    }

    /// syntect theme name for code panels
    pub fn syntax_theme(&self) -> &str {
        &self.syntax_theme
    }

    /// Render width in cells
    pub fn width(&self) -> usize {
        self.coordinator.width()
    }

    /// Terminal height in rows, when attached to one
    pub fn height(&self) -> Option<usize> {
        self.height
    }

    /// The shared coordinator
    pub fn coordinator(&self) -> &Arc<OutputCoordinator> {
        &self.coordinator
    }

    // ─────────────────────────────────────────────────
    // Output Methods
    // ─────────────────────────────────────────────────

    /// Print plain text
    pub fn print(&self, text: &str) -> ConsoleResult<()> {
        self.coordinator.write(Content::plain(text))
    }

    /// Print text with a style
    pub fn print_styled(&self, text: &str, style: impl Into<StyleSpec>) -> ConsoleResult<()> {
        self.coordinator
            .submit(RenderRequest::new(Content::plain(text)).with_style(style))
    }

    /// Print prepared content
    pub fn print_content(&self, content: impl Into<Content>) -> ConsoleResult<()> {
        self.coordinator.write(content)
    }

    /// Print already-rendered text verbatim
    pub fn print_raw(&self, text: &str) -> ConsoleResult<()> {
        self.coordinator.acquire().write_raw(text)
    }

    /// Render a widget at the console width
    pub fn render(&self, renderable: &dyn Renderable) -> ConsoleResult<()> {
        let content = renderable.render(self.width())?;
        self.coordinator.write(content)
    }

    // ─────────────────────────────────────────────────
    // Convenience Methods
    // ─────────────────────────────────────────────────

    /// Print a horizontal rule
    pub fn rule(&self, title: Option<&str>) -> ConsoleResult<()> {
        let rule = match title {
            Some(t) => Rule::with_title(Line::styled(t, self.theme.primary.clone())),
            None => Rule::new(),
        };
        self.render(&rule.style(self.theme.rule.clone()))
    }

    /// Print a blank line
    pub fn newline(&self) -> ConsoleResult<()> {
        self.coordinator.write(Line::new())
    }

    /// Clear the terminal (no-op when not attached to one)
    pub fn clear(&self) -> ConsoleResult<()> {
        self.coordinator.acquire().clear_screen()
    }
}

impl std::fmt::Debug for DemoConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoConsole")
            .field("rich", &self.is_rich())
            .field("width", &self.width())
            .finish()
    }
}
