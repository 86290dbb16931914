//! Horizontal divider with an optional centred title.

use crate::content::{Content, Line, Span, StyleSpec};
use crate::error::ConsoleResult;

use super::Renderable;

#[derive(Debug, Clone, Default)]
pub struct Rule {
    title: Option<Line>,
    style: StyleSpec,
    character: Option<char>,
}

impl Rule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(title: impl Into<Line>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Style of the line characters.
    #[must_use]
    pub fn style(mut self, style: impl Into<StyleSpec>) -> Self {
        self.style = style.into();
        self
    }

    #[must_use]
    pub fn character(mut self, ch: char) -> Self {
        self.character = Some(ch);
        self
    }

    fn bar(&self, cells: usize) -> Span {
        let ch = self.character.unwrap_or('─');
        Span::styled(std::iter::repeat_n(ch, cells).collect::<String>(), self.style.clone())
    }
}

impl Renderable for Rule {
    fn render(&self, width: usize) -> ConsoleResult<Content> {
        let title = match &self.title {
            Some(title) if !title.is_empty() && width >= 6 => title.clone(),
            _ => return Ok(Content::from(Line::from(self.bar(width)))),
        };

        // " title " needs at least one bar cell on each side
        let title = title.truncate(width - 4);
        let remaining = width - title.width() - 2;
        let left = remaining / 2;
        let right = remaining - left;

        let mut line = Line::new();
        line.push(self.bar(left));
        line.push_str(" ");
        line.extend(title);
        line.push_str(" ");
        line.push(self.bar(right));
        Ok(Content::from(line))
    }

    fn measure(&self, max_width: usize) -> usize {
        max_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_rule_fills_width() {
        let content = Rule::new().render(10).unwrap();
        assert_eq!(content.plain_text(), "──────────");
    }

    #[test]
    fn test_title_is_centred() {
        let content = Rule::with_title("Hi").character('-').render(12).unwrap();
        assert_eq!(content.plain_text(), "---- Hi ----");
    }

    #[test]
    fn test_long_title_is_truncated() {
        let content = Rule::with_title("A very long title indeed").render(12).unwrap();
        assert_eq!(content.width(), 12);
        assert!(content.plain_text().contains('…'));
    }

    #[test]
    fn test_narrow_width_drops_title() {
        let content = Rule::with_title("Title").render(4).unwrap();
        assert_eq!(content.plain_text(), "────");
    }
}
