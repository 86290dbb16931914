use crate::content::Content;
use crate::error::ConsoleResult;

use super::Renderable;

/// Renderables stacked vertically.
#[derive(Default)]
pub struct Group {
    items: Vec<Box<dyn Renderable>>,
    spacing: usize,
}

impl Group {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, item: impl Renderable + 'static) -> Self {
        self.items.push(Box::new(item));
        self
    }

    pub fn push(&mut self, item: impl Renderable + 'static) {
        self.items.push(Box::new(item));
    }

    /// Blank lines between items.
    #[must_use]
    pub fn spacing(mut self, lines: usize) -> Self {
        self.spacing = lines;
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Renderable for Group {
    fn render(&self, width: usize) -> ConsoleResult<Content> {
        let mut out = Content::new();
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                for _ in 0..self.spacing {
                    out.push("");
                }
            }
            out.append(item.render(width)?);
        }
        Ok(out)
    }

    fn measure(&self, max_width: usize) -> usize {
        self.items
            .iter()
            .map(|item| item.measure(max_width))
            .max()
            .unwrap_or(0)
    }
}
