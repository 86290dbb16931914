//! Content values submitted for display.
//!
//! Style intent travels as data: a [`Span`] is either plain text or text
//! tagged with a [`StyleSpec`]. Nothing in this crate parses inline markup;
//! the renderer resolves the style when the content is written.

use std::fmt;

use console::measure_text_width;

/// An unresolved style descriptor such as `"bold red on white"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct StyleSpec(String);

impl StyleSpec {
    #[must_use]
    pub fn new(spec: impl Into<String>) -> Self {
        Self(spec.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Combine two specs; tokens of `other` are applied after `self`.
    #[must_use]
    pub fn with(&self, other: &StyleSpec) -> StyleSpec {
        match (self.is_empty(), other.is_empty()) {
            (true, _) => other.clone(),
            (_, true) => self.clone(),
            _ => StyleSpec(format!("{} {}", self.0, other.0)),
        }
    }
}

impl From<&str> for StyleSpec {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StyleSpec {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for StyleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A run of text with optional style intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Plain(String),
    Styled { text: String, style: StyleSpec },
}

impl Span {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    /// A styled span. An empty style collapses to plain text.
    #[must_use]
    pub fn styled(text: impl Into<String>, style: impl Into<StyleSpec>) -> Self {
        let style = style.into();
        if style.is_empty() {
            Self::Plain(text.into())
        } else {
            Self::Styled {
                text: text.into(),
                style,
            }
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Styled { text, .. } => text,
        }
    }

    #[must_use]
    pub fn style(&self) -> Option<&StyleSpec> {
        match self {
            Self::Plain(_) => None,
            Self::Styled { style, .. } => Some(style),
        }
    }

    /// Display width in terminal cells.
    #[must_use]
    pub fn width(&self) -> usize {
        measure_text_width(self.text())
    }

    /// Same text, with `base` applied underneath any existing style.
    #[must_use]
    pub fn with_base_style(self, base: &StyleSpec) -> Self {
        if base.is_empty() {
            return self;
        }
        match self {
            Self::Plain(text) => Self::Styled {
                text,
                style: base.clone(),
            },
            Self::Styled { text, style } => Self::Styled {
                text,
                style: base.with(&style),
            },
        }
    }
}

/// One terminal line made of spans. Embedded `\n` characters are split
/// into separate rows when the line is written (see [`Line::rows`]).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    spans: Vec<Span>,
}

impl Line {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            spans: vec![Span::plain(text)],
        }
    }

    #[must_use]
    pub fn styled(text: impl Into<String>, style: impl Into<StyleSpec>) -> Self {
        Self {
            spans: vec![Span::styled(text, style)],
        }
    }

    #[must_use]
    pub fn from_spans(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn push(&mut self, span: Span) {
        self.spans.push(span);
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    pub fn push_str(&mut self, text: impl Into<String>) {
        self.spans.push(Span::plain(text));
    }

    pub fn extend(&mut self, other: Line) {
        self.spans.extend(other.spans);
    }

    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text().is_empty())
    }

    /// Concatenated text without style information.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }

    /// Split at embedded newlines into one line per terminal row, keeping
    /// span styles. A line without newlines yields itself.
    #[must_use]
    pub fn rows(&self) -> Vec<Line> {
        if !self.spans.iter().any(|s| s.text().contains('\n')) {
            return vec![self.clone()];
        }
        let mut rows = Vec::new();
        let mut current = Line::new();
        for span in &self.spans {
            let mut parts = span.text().split('\n');
            if let Some(first) = parts.next() {
                if !first.is_empty() {
                    current.push(respan(span, first.trim_end_matches('\r').to_string()));
                }
            }
            for part in parts {
                rows.push(std::mem::take(&mut current));
                let part = part.trim_end_matches('\r');
                if !part.is_empty() {
                    current.push(respan(span, part.to_string()));
                }
            }
        }
        rows.push(current);
        rows
    }

    /// Apply `base` underneath every span.
    #[must_use]
    pub fn with_base_style(self, base: &StyleSpec) -> Self {
        Self {
            spans: self
                .spans
                .into_iter()
                .map(|s| s.with_base_style(base))
                .collect(),
        }
    }

    /// Cut the line to at most `max` cells, ending with `…` when cut.
    #[must_use]
    pub fn truncate(self, max: usize) -> Self {
        if self.width() <= max {
            return self;
        }
        if max == 0 {
            return Self::new();
        }

        let mut remaining = max - 1;
        let mut spans = Vec::new();
        for span in self.spans {
            if remaining == 0 {
                break;
            }
            let text = take_cells(span.text(), remaining);
            remaining -= measure_text_width(&text);
            spans.push(match span {
                Span::Plain(_) => Span::Plain(text),
                Span::Styled { style, .. } => Span::Styled { text, style },
            });
        }
        spans.push(Span::plain("…"));
        Self { spans }
    }

    /// Pad with spaces to exactly `width` cells (truncating if longer).
    #[must_use]
    pub fn pad_to(self, width: usize, justify: Justify) -> Self {
        let line = self.truncate(width);
        let gap = width.saturating_sub(line.width());
        if gap == 0 {
            return line;
        }
        let (left, right) = match justify {
            Justify::Left => (0, gap),
            Justify::Right => (gap, 0),
            Justify::Center => (gap / 2, gap - gap / 2),
        };
        let mut spans = Vec::with_capacity(line.spans.len() + 2);
        if left > 0 {
            spans.push(Span::plain(" ".repeat(left)));
        }
        spans.extend(line.spans);
        if right > 0 {
            spans.push(Span::plain(" ".repeat(right)));
        }
        Self { spans }
    }

    /// Word-wrap into lines of at most `width` cells, keeping span styles.
    #[must_use]
    pub fn wrap(&self, width: usize) -> Vec<Line> {
        if width == 0 || self.width() <= width {
            return vec![self.clone()];
        }

        let mut lines = Vec::new();
        let mut current = Line::new();
        for span in &self.spans {
            for word in split_keep_spaces(span.text()) {
                let word_width = measure_text_width(word);
                if current.width() + word_width > width && !current.is_empty() {
                    lines.push(current);
                    current = Line::new();
                    if word.trim().is_empty() {
                        continue;
                    }
                }
                let mut word = word.to_string();
                while measure_text_width(&word) > width {
                    let mut head = take_cells(&word, width);
                    if head.is_empty() {
                        head = word.chars().take(1).collect();
                    }
                    word = word[head.len()..].to_string();
                    lines.push(Line::from_spans(vec![respan(span, head)]));
                }
                current.push(respan(span, word));
            }
        }
        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        lines
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self::plain(s)
    }
}

impl From<String> for Line {
    fn from(s: String) -> Self {
        Self::plain(s)
    }
}

impl From<Span> for Line {
    fn from(span: Span) -> Self {
        Self { spans: vec![span] }
    }
}

/// Horizontal alignment inside a fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

/// A block of lines: the unit the coordinator writes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Content {
    lines: Vec<Line>,
}

impl Content {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text; embedded newlines become separate lines.
    #[must_use]
    pub fn plain(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(Line::plain).collect(),
        }
    }

    /// Styled text; embedded newlines become separate lines.
    #[must_use]
    pub fn styled(text: &str, style: impl Into<StyleSpec>) -> Self {
        let style = style.into();
        Self {
            lines: text
                .split('\n')
                .map(|l| Line::styled(l, style.clone()))
                .collect(),
        }
    }

    #[must_use]
    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn push(&mut self, line: impl Into<Line>) {
        self.lines.push(line.into());
    }

    pub fn append(&mut self, other: Content) {
        self.lines.extend(other.lines);
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Widest line in cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.lines.iter().map(Line::width).max().unwrap_or(0)
    }

    #[must_use]
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(Line::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Wrap every line to `width`.
    #[must_use]
    pub fn wrap(self, width: usize) -> Self {
        Self {
            lines: self.lines.iter().flat_map(|l| l.wrap(width)).collect(),
        }
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self::plain(s)
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self::plain(&s)
    }
}

impl From<Line> for Content {
    fn from(line: Line) -> Self {
        Self { lines: vec![line] }
    }
}

impl From<Span> for Content {
    fn from(span: Span) -> Self {
        Self::from(Line::from(span))
    }
}

impl From<Vec<Line>> for Content {
    fn from(lines: Vec<Line>) -> Self {
        Self { lines }
    }
}

/// Content handed to the coordinator. Consumed by value, so it is rendered
/// at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    content: Content,
    style: Option<StyleSpec>,
}

impl RenderRequest {
    #[must_use]
    pub fn new(content: impl Into<Content>) -> Self {
        Self {
            content: content.into(),
            style: None,
        }
    }

    /// Style applied underneath every span of the content.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<StyleSpec>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Resolve the request into the content that will be written.
    #[must_use]
    pub fn into_content(self) -> Content {
        match self.style {
            Some(style) => Content {
                lines: self
                    .content
                    .lines
                    .into_iter()
                    .map(|l| l.with_base_style(&style))
                    .collect(),
            },
            None => self.content,
        }
    }
}

fn take_cells(text: &str, max: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = measure_text_width(ch.encode_utf8(&mut [0; 4]));
        if used + w > max {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

fn respan(template: &Span, text: String) -> Span {
    match template {
        Span::Plain(_) => Span::Plain(text),
        Span::Styled { style, .. } => Span::Styled {
            text,
            style: style.clone(),
        },
    }
}

/// Split into words, each keeping its trailing whitespace.
fn split_keep_spaces(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_space = false;
    for (idx, ch) in text.char_indices() {
        if ch == ' ' {
            in_space = true;
        } else if in_space {
            parts.push(&text[start..idx]);
            start = idx;
            in_space = false;
        }
    }
    if start < text.len() {
        parts.push(&text[start..]);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_style_collapses_to_plain() {
        assert_eq!(Span::styled("x", ""), Span::Plain("x".to_string()));
    }

    #[test]
    fn test_style_spec_with() {
        let a = StyleSpec::new("bold");
        let b = StyleSpec::new("red");
        assert_eq!(a.with(&b).as_str(), "bold red");
        assert_eq!(StyleSpec::default().with(&b), b);
    }

    #[test]
    fn test_content_plain_splits_lines() {
        let content = Content::plain("one\ntwo");
        assert_eq!(content.len(), 2);
        assert_eq!(content.plain_text(), "one\ntwo");
    }

    #[test]
    fn test_line_rows_split_embedded_newlines() {
        let line = Line::from_spans(vec![Span::styled("head\nmid", "red"), Span::plain("dle\ntail")]);
        let rows = line.rows();
        let texts: Vec<String> = rows.iter().map(Line::plain_text).collect();
        assert_eq!(texts, vec!["head", "middle", "tail"]);
        assert_eq!(rows[1].spans()[0].style(), Some(&StyleSpec::new("red")));
        assert_eq!(Line::plain("single").rows(), vec![Line::plain("single")]);
    }

    #[test]
    fn test_line_truncate_adds_ellipsis() {
        let line = Line::plain("hello world").truncate(6);
        assert_eq!(line.plain_text(), "hello…");
        assert_eq!(line.width(), 6);
    }

    #[test]
    fn test_line_truncate_keeps_styles() {
        let line = Line::from_spans(vec![Span::styled("abc", "red"), Span::plain("def")])
            .truncate(3);
        assert_eq!(line.spans()[0].style(), Some(&StyleSpec::new("red")));
        assert_eq!(line.plain_text(), "ab…");
    }

    #[test]
    fn test_pad_to_justify() {
        assert_eq!(Line::plain("ab").pad_to(4, Justify::Right).plain_text(), "  ab");
        assert_eq!(Line::plain("ab").pad_to(5, Justify::Center).plain_text(), " ab  ");
        assert_eq!(Line::plain("ab").pad_to(3, Justify::Left).plain_text(), "ab ");
    }

    #[test]
    fn test_wrap_on_word_boundaries() {
        let lines = Line::plain("the quick brown fox").wrap(10);
        let texts: Vec<String> = lines.iter().map(|l| l.plain_text().trim_end().to_string()).collect();
        assert_eq!(texts, vec!["the quick", "brown fox"]);
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        let lines = Line::plain("abcdefghij").wrap(4);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.width() <= 4));
    }

    #[test]
    fn test_render_request_applies_base_style() {
        let content = RenderRequest::new(Line::from_spans(vec![
            Span::plain("a"),
            Span::styled("b", "red"),
        ]))
        .with_style("bold")
        .into_content();
        let spans = content.lines()[0].spans();
        assert_eq!(spans[0].style().map(StyleSpec::as_str), Some("bold"));
        assert_eq!(spans[1].style().map(StyleSpec::as_str), Some("bold red"));
    }
}
