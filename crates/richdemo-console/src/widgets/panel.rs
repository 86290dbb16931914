//! Bordered box around a renderable, with an optional title in the top edge.

use crate::content::{Content, Justify, Line, Span, StyleSpec};
use crate::error::ConsoleResult;

use super::{BoxChars, ROUNDED, Renderable};

pub struct Panel {
    body: Box<dyn Renderable>,
    title: Option<Line>,
    border_style: StyleSpec,
    box_chars: BoxChars,
    padding: (usize, usize),
    expand: bool,
}

impl Panel {
    /// A panel that fills the available width.
    pub fn new(body: impl Renderable + 'static) -> Self {
        Self {
            body: Box::new(body),
            title: None,
            border_style: StyleSpec::default(),
            box_chars: ROUNDED,
            padding: (0, 1),
            expand: true,
        }
    }

    /// A panel sized to its content.
    pub fn fit(body: impl Renderable + 'static) -> Self {
        Self {
            expand: false,
            ..Self::new(body)
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<Line>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn border_style(mut self, style: impl Into<StyleSpec>) -> Self {
        self.border_style = style.into();
        self
    }

    #[must_use]
    pub fn box_style(mut self, chars: BoxChars) -> Self {
        self.box_chars = chars;
        self
    }

    /// Vertical and horizontal padding inside the border.
    #[must_use]
    pub fn padding(mut self, vertical: usize, horizontal: usize) -> Self {
        self.padding = (vertical, horizontal);
        self
    }

    #[must_use]
    pub fn expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    fn chrome(&self) -> usize {
        2 + self.padding.1 * 2
    }

    fn border(&self, text: String) -> Span {
        Span::styled(text, self.border_style.clone())
    }

    fn top_edge(&self, inner: usize) -> Line {
        let chars = &self.box_chars;
        let fill = |n: usize| std::iter::repeat_n(chars.top, n).collect::<String>();

        let title = match &self.title {
            Some(title) if !title.is_empty() && inner >= 4 => title.clone().truncate(inner - 2),
            _ => {
                return Line::from(self.border(format!(
                    "{}{}{}",
                    chars.top_left,
                    fill(inner),
                    chars.top_right
                )));
            }
        };

        let remaining = inner - title.width() - 2;
        let left = remaining / 2;
        let mut line = Line::from(self.border(format!("{}{}", chars.top_left, fill(left))));
        line.push_str(" ");
        line.extend(title);
        line.push_str(" ");
        line.push(self.border(format!("{}{}", fill(remaining - left), chars.top_right)));
        line
    }
}

impl Renderable for Panel {
    fn render(&self, width: usize) -> ConsoleResult<Content> {
        let chrome = self.chrome();
        let max_inner = width.saturating_sub(chrome).max(1);
        let content_width = if self.expand {
            max_inner
        } else {
            let title_width = self.title.as_ref().map_or(0, |t| t.width() + 2);
            self.body
                .measure(max_inner)
                .max(title_width.saturating_sub(self.padding.1 * 2))
                .clamp(1, max_inner)
        };
        let inner = content_width + self.padding.1 * 2;

        let body = self.body.render(content_width)?;
        let chars = &self.box_chars;
        let side = self.border(chars.vertical.to_string());
        let pad = " ".repeat(self.padding.1);

        let mut lines = Vec::with_capacity(body.len() + 2 + self.padding.0 * 2);
        lines.push(self.top_edge(inner));

        let blank = std::iter::repeat_n(Line::new(), self.padding.0);
        let rows = blank.clone().chain(body.into_lines()).chain(blank);
        for row in rows {
            let mut line = Line::from(side.clone());
            line.push_str(pad.clone());
            line.extend(row.pad_to(content_width, Justify::Left));
            line.push_str(pad.clone());
            line.push(side.clone());
            lines.push(line);
        }

        lines.push(Line::from(self.border(format!(
            "{}{}{}",
            chars.bottom_left,
            std::iter::repeat_n(chars.bottom, inner).collect::<String>(),
            chars.bottom_right
        ))));
        Ok(Content::from_lines(lines))
    }

    fn measure(&self, max_width: usize) -> usize {
        if self.expand {
            return max_width;
        }
        let chrome = self.chrome();
        (self.body.measure(max_width.saturating_sub(chrome).max(1)) + chrome).min(max_width)
    }
}
