//! Syntax highlighted source code.

use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::content::{Content, Line, Span, StyleSpec};
use crate::error::{ConsoleError, ConsoleResult};
use crate::theme::theme;

use super::Renderable;

fn syntax_set() -> &'static SyntaxSet {
    static SET: OnceLock<SyntaxSet> = OnceLock::new();
    SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    static SET: OnceLock<ThemeSet> = OnceLock::new();
    SET.get_or_init(ThemeSet::load_defaults)
}

/// Names of the bundled highlighting themes.
#[must_use]
pub fn available_themes() -> Vec<&'static str> {
    theme_set().themes.keys().map(String::as_str).collect()
}

/// A block of code highlighted by language.
#[derive(Debug, Clone)]
pub struct Syntax {
    code: String,
    language: String,
    theme: String,
    line_numbers: bool,
}

impl Syntax {
    /// `language` is a file extension or syntax name such as `"rs"` or
    /// `"python"`. Unknown languages render as plain text.
    #[must_use]
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            theme: theme().syntax_theme.to_string(),
            line_numbers: false,
        }
    }

    #[must_use]
    pub fn theme(mut self, name: impl Into<String>) -> Self {
        self.theme = name.into();
        self
    }

    #[must_use]
    pub fn line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = enabled;
        self
    }

    fn highlighted(&self) -> ConsoleResult<Vec<Line>> {
        let set = syntax_set();
        let syntax = set
            .find_syntax_by_token(&self.language)
            .unwrap_or_else(|| set.find_syntax_plain_text());
        let Some(theme) = theme_set().themes.get(&self.theme) else {
            return Err(ConsoleError::render_failure(format!(
                "unknown syntax theme '{}'",
                self.theme
            )));
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        let code = self.code.trim_matches('\n');
        let mut lines = Vec::new();
        for source in LinesWithEndings::from(code) {
            let ranges = highlighter
                .highlight_line(source, set)
                .map_err(|e| ConsoleError::render_failure(e.to_string()))?;
            let spans = ranges
                .into_iter()
                .filter_map(|(style, text)| {
                    let text = text.trim_end_matches(['\n', '\r']);
                    (!text.is_empty()).then(|| Span::styled(text.replace('\t', "    "), style_spec(style)))
                })
                .collect();
            lines.push(Line::from_spans(spans));
        }
        Ok(lines)
    }
}

fn style_spec(style: Style) -> StyleSpec {
    let fg = style.foreground;
    let mut spec = format!("#{:02x}{:02x}{:02x}", fg.r, fg.g, fg.b);
    if style.font_style.contains(FontStyle::BOLD) {
        spec.push_str(" bold");
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        spec.push_str(" italic");
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        spec.push_str(" underline");
    }
    StyleSpec::new(spec)
}

impl Renderable for Syntax {
    fn render(&self, width: usize) -> ConsoleResult<Content> {
        let lines = self.highlighted()?;
        if !self.line_numbers {
            return Ok(Content::from_lines(
                lines.iter().flat_map(|l| l.wrap(width)).collect(),
            ));
        }

        let digits = lines.len().max(1).to_string().len();
        let gutter = digits + 3;
        let body_width = width.saturating_sub(gutter).max(1);
        let number_style = theme().muted.clone();

        let mut out = Vec::new();
        for (idx, line) in lines.iter().enumerate() {
            for (part, wrapped) in line.wrap(body_width).into_iter().enumerate() {
                let label = if part == 0 {
                    format!("{:>digits$} │ ", idx + 1)
                } else {
                    format!("{:>digits$} │ ", "")
                };
                let mut row = Line::styled(label, number_style.clone());
                row.extend(wrapped);
                out.push(row);
            }
        }
        Ok(Content::from_lines(out))
    }

    fn measure(&self, max_width: usize) -> usize {
        let code = self.code.trim_matches('\n');
        let widest = code
            .lines()
            .map(|l| console::measure_text_width(&l.replace('\t', "    ")))
            .max()
            .unwrap_or(0);
        let gutter = if self.line_numbers {
            code.lines().count().max(1).to_string().len() + 3
        } else {
            0
        };
        (widest + gutter).min(max_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODE: &str = "\ndef greet(name):\n    return f\"hi {name}\"\n";

    #[test]
    fn test_text_survives_highlighting() {
        let content = Syntax::new(CODE, "py").render(80).unwrap();
        assert_eq!(
            content.plain_text(),
            "def greet(name):\n    return f\"hi {name}\""
        );
    }

    #[test]
    fn test_spans_carry_hex_colours() {
        let content = Syntax::new("let x = 1;", "rs").render(80).unwrap();
        let styled = content.lines()[0]
            .spans()
            .iter()
            .filter_map(Span::style)
            .all(|s| s.as_str().starts_with('#'));
        assert!(styled);
    }

    #[test]
    fn test_line_numbers() {
        let content = Syntax::new(CODE, "py").line_numbers(true).render(80).unwrap();
        let text = content.plain_text();
        assert!(text.starts_with("1 │ def greet"));
        assert!(text.contains("\n2 │     return"));
    }

    #[test]
    fn test_unknown_language_is_plain() {
        let content = Syntax::new("anything", "no-such-language").render(80).unwrap();
        assert_eq!(content.plain_text(), "anything");
    }

    #[test]
    fn test_unknown_theme_fails() {
        let err = Syntax::new("x", "py").theme("missing").render(80).unwrap_err();
        assert!(matches!(err, ConsoleError::RenderFailure { .. }));
    }

    #[test]
    fn test_default_theme_is_bundled() {
        assert!(available_themes().contains(&theme().syntax_theme));
    }

    #[test]
    fn test_measure() {
        assert_eq!(Syntax::new(CODE, "py").measure(80), 23);
        assert_eq!(Syntax::new(CODE, "py").measure(10), 10);
    }
}
