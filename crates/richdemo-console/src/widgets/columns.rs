//! Side-by-side layout.

use crate::content::{Content, Justify, Line};
use crate::error::ConsoleResult;

use super::Renderable;

/// Renderables laid out left to right in equal-width columns, wrapping onto
/// new rows after `per_row` items.
#[derive(Default)]
pub struct Columns {
    items: Vec<Box<dyn Renderable>>,
    per_row: Option<usize>,
    gap: usize,
}

impl Columns {
    #[must_use]
    pub fn new() -> Self {
        Self {
            gap: 1,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with(mut self, item: impl Renderable + 'static) -> Self {
        self.items.push(Box::new(item));
        self
    }

    pub fn push(&mut self, item: impl Renderable + 'static) {
        self.items.push(Box::new(item));
    }

    /// Items per row. Defaults to all of them.
    #[must_use]
    pub fn per_row(mut self, n: usize) -> Self {
        self.per_row = Some(n.max(1));
        self
    }

    /// Blank cells between columns.
    #[must_use]
    pub fn gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Renderable for Columns {
    fn render(&self, width: usize) -> ConsoleResult<Content> {
        if self.items.is_empty() {
            return Ok(Content::new());
        }
        let per_row = self.per_row.unwrap_or(self.items.len());
        let gaps = self.gap * (per_row - 1);
        let cell = (width.saturating_sub(gaps) / per_row).max(1);
        let spacer = " ".repeat(self.gap);

        let mut out = Content::new();
        for row in self.items.chunks(per_row) {
            let rendered = row
                .iter()
                .map(|item| item.render(cell))
                .collect::<ConsoleResult<Vec<_>>>()?;
            let height = rendered.iter().map(Content::len).max().unwrap_or(0);
            for i in 0..height {
                let mut line = Line::new();
                for (col, content) in rendered.iter().enumerate() {
                    if col > 0 {
                        line.push_str(spacer.clone());
                    }
                    let part = content.lines().get(i).cloned().unwrap_or_default();
                    line.extend(part.pad_to(cell, Justify::Left));
                }
                out.push(line);
            }
        }
        Ok(out)
    }

    fn measure(&self, max_width: usize) -> usize {
        max_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Panel;

    #[test]
    fn test_side_by_side() {
        let columns = Columns::new().with("left").with("right");
        assert_eq!(columns.render(21).unwrap().plain_text(), "left       right     ");
    }

    #[test]
    fn test_uneven_heights_are_padded() {
        let columns = Columns::new().with("a\nb\nc").with("x");
        let content = columns.render(9).unwrap();
        assert_eq!(content.len(), 3);
        assert!(content.lines().iter().all(|l| l.width() == 9));
    }

    #[test]
    fn test_wraps_into_rows() {
        let columns = Columns::new()
            .with(Panel::new("1"))
            .with(Panel::new("2"))
            .with(Panel::new("3"))
            .per_row(2);
        let content = columns.render(41).unwrap();
        // two rows of three-line panels
        assert_eq!(content.len(), 6);
        assert!(content.lines()[4].plain_text().starts_with("│ 3"));
    }
}
