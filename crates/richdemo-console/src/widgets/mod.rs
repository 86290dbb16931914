//! Renderable building blocks: rules, tables, panels, column and group
//! layouts, syntax highlighted code and pretty-printed values.
//!
//! Every widget produces [`Content`] for a given width. Nothing here writes
//! to the terminal; callers pass the result to the console, or nest widgets
//! inside each other (a table inside a panel inside a grid).

mod boxes;
mod columns;
mod group;
mod panel;
mod pretty;
mod rule;
mod syntax;
mod table;

pub use boxes::{ASCII, BoxChars, ROUNDED, SQUARE};
pub use columns::Columns;
pub use group::Group;
pub use panel::Panel;
pub use pretty::Pretty;
pub use rule::Rule;
pub use syntax::{Syntax, available_themes};
pub use table::{Column, Table};

use crate::content::{Content, Line};
use crate::error::ConsoleResult;

/// Something that can lay itself out in a given number of cells.
pub trait Renderable {
    /// Render to at most `width` cells per line.
    fn render(&self, width: usize) -> ConsoleResult<Content>;

    /// Width the renderable wants when given at most `max_width` cells.
    fn measure(&self, max_width: usize) -> usize {
        self.render(max_width)
            .map(|content| content.width().min(max_width))
            .unwrap_or(max_width)
    }
}

impl Renderable for Content {
    fn render(&self, width: usize) -> ConsoleResult<Content> {
        Ok(self.clone().wrap(width))
    }

    fn measure(&self, max_width: usize) -> usize {
        self.width().min(max_width)
    }
}

impl Renderable for Line {
    fn render(&self, width: usize) -> ConsoleResult<Content> {
        Ok(Content::from_lines(self.wrap(width)))
    }

    fn measure(&self, max_width: usize) -> usize {
        self.width().min(max_width)
    }
}

impl Renderable for String {
    fn render(&self, width: usize) -> ConsoleResult<Content> {
        Content::plain(self).render(width)
    }

    fn measure(&self, max_width: usize) -> usize {
        Content::plain(self).measure(max_width)
    }
}

impl Renderable for &str {
    fn render(&self, width: usize) -> ConsoleResult<Content> {
        Content::plain(self).render(width)
    }

    fn measure(&self, max_width: usize) -> usize {
        Content::plain(self).measure(max_width)
    }
}

impl<R: Renderable + ?Sized> Renderable for Box<R> {
    fn render(&self, width: usize) -> ConsoleResult<Content> {
        (**self).render(width)
    }

    fn measure(&self, max_width: usize) -> usize {
        (**self).measure(max_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_wraps_to_width() {
        let content = Content::plain("aaa bbb ccc").render(4).unwrap();
        assert_eq!(content.len(), 3);
    }

    #[test]
    fn test_measure_caps_at_max() {
        assert_eq!("hello world".measure(5), 5);
        assert_eq!("hi".measure(5), 2);
    }
}
