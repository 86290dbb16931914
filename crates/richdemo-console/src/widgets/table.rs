//! Tables and borderless grids.
//!
//! Column widths start at each column's natural width and shrink, widest
//! first, until the table fits. Grids made with [`Table::grid`] usually use
//! ratio columns instead, which split the available width evenly.

use crate::content::{Content, Justify, Line, Span, StyleSpec};
use crate::error::ConsoleResult;

use super::{BoxChars, ROUNDED, Renderable};

const MIN_COLUMN_WIDTH: usize = 3;

/// Column definition.
#[derive(Debug, Clone, Default)]
pub struct Column {
    header: String,
    style: StyleSpec,
    header_style: Option<StyleSpec>,
    justify: Justify,
    ratio: Option<usize>,
}

impl Column {
    #[must_use]
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Self::default()
        }
    }

    /// Style applied to every cell in the column.
    #[must_use]
    pub fn style(mut self, style: impl Into<StyleSpec>) -> Self {
        self.style = style.into();
        self
    }

    /// Header style for this column, overriding the table's.
    #[must_use]
    pub fn header_style(mut self, style: impl Into<StyleSpec>) -> Self {
        self.header_style = Some(style.into());
        self
    }

    #[must_use]
    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    /// Share of the available width, for expanded tables and grids.
    #[must_use]
    pub fn ratio(mut self, ratio: usize) -> Self {
        self.ratio = Some(ratio.max(1));
        self
    }
}

type Cell = Box<dyn Renderable>;

/// A table of renderable cells.
pub struct Table {
    title: Option<Line>,
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
    show_header: bool,
    header_style: StyleSpec,
    border_style: StyleSpec,
    box_chars: Option<BoxChars>,
    padding: usize,
    expand: bool,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// A bordered table with a header row.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            columns: Vec::new(),
            rows: Vec::new(),
            show_header: true,
            header_style: StyleSpec::new("bold"),
            border_style: StyleSpec::default(),
            box_chars: Some(ROUNDED),
            padding: 1,
            expand: false,
        }
    }

    /// A borderless, headerless, full-width layout grid.
    #[must_use]
    pub fn grid() -> Self {
        Self {
            show_header: false,
            box_chars: None,
            padding: 0,
            expand: true,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<Line>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn header_style(mut self, style: impl Into<StyleSpec>) -> Self {
        self.header_style = style.into();
        self
    }

    #[must_use]
    pub fn border_style(mut self, style: impl Into<StyleSpec>) -> Self {
        self.border_style = style.into();
        self
    }

    #[must_use]
    pub fn box_style(mut self, chars: BoxChars) -> Self {
        self.box_chars = Some(chars);
        self
    }

    #[must_use]
    pub fn show_header(mut self, show: bool) -> Self {
        self.show_header = show;
        self
    }

    #[must_use]
    pub fn expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Builder form of [`add_column`](Self::add_column).
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a row of renderable cells. Missing cells render empty; extra
    /// cells are ignored.
    pub fn add_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }

    /// Add a row of text cells.
    pub fn add_row_cells<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Line>,
    {
        self.rows.push(
            cells
                .into_iter()
                .map(|c| Box::new(c.into()) as Cell)
                .collect(),
        );
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of border and padding that are not column content.
    fn overhead(&self) -> usize {
        let n = self.columns.len();
        let borders = if self.box_chars.is_some() { n + 1 } else { 0 };
        borders + n * self.padding * 2
    }

    fn natural_width(&self, col: usize, max: usize) -> usize {
        let header = if self.show_header {
            console::measure_text_width(&self.columns[col].header)
        } else {
            0
        };
        self.rows
            .iter()
            .filter_map(|row| row.get(col))
            .map(|cell| cell.measure(max))
            .fold(header, usize::max)
    }

    fn column_widths(&self, width: usize) -> Vec<usize> {
        let n = self.columns.len();
        let available = width.saturating_sub(self.overhead()).max(n);

        if self.expand && self.columns.iter().any(|c| c.ratio.is_some()) {
            return split_by_ratio(
                available,
                &self
                    .columns
                    .iter()
                    .map(|c| c.ratio.unwrap_or(1))
                    .collect::<Vec<_>>(),
            );
        }

        let mut widths: Vec<usize> = (0..n)
            .map(|i| self.natural_width(i, available).max(1))
            .collect();

        // Shrink the widest column one cell at a time until everything fits.
        while widths.iter().sum::<usize>() > available {
            let Some((idx, &widest)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
                break;
            };
            if widest <= MIN_COLUMN_WIDTH {
                break;
            }
            widths[idx] -= 1;
        }

        if self.expand {
            let extra = available.saturating_sub(widths.iter().sum());
            for (i, share) in split_by_ratio(extra, &vec![1; n]).into_iter().enumerate() {
                widths[i] += share;
            }
        }
        widths
    }

    fn border_line(&self, text: String) -> Line {
        Line::styled(text, self.border_style.clone())
    }

    fn render_row(&self, cells: Vec<Content>, widths: &[usize], styles: &[StyleSpec]) -> Vec<Line> {
        let height = cells.iter().map(Content::len).max().unwrap_or(0).max(1);
        let pad = " ".repeat(self.padding);
        let mut out = Vec::with_capacity(height);

        for row in 0..height {
            let mut line = Line::new();
            if let Some(chars) = &self.box_chars {
                line.push(Span::styled(chars.vertical.to_string(), self.border_style.clone()));
            }
            for (col, width) in widths.iter().enumerate() {
                let cell_line = cells
                    .get(col)
                    .and_then(|c| c.lines().get(row))
                    .cloned()
                    .unwrap_or_default()
                    .with_base_style(&styles[col])
                    .pad_to(*width, self.columns[col].justify);
                if !pad.is_empty() {
                    line.push_str(pad.clone());
                }
                line.extend(cell_line);
                if !pad.is_empty() {
                    line.push_str(pad.clone());
                }
                if let Some(chars) = &self.box_chars {
                    line.push(Span::styled(chars.vertical.to_string(), self.border_style.clone()));
                }
            }
            out.push(line);
        }
        out
    }
}

impl Renderable for Table {
    fn render(&self, width: usize) -> ConsoleResult<Content> {
        if self.columns.is_empty() {
            return Ok(Content::new());
        }

        let widths = self.column_widths(width);
        let table_width: usize = widths.iter().sum::<usize>() + self.overhead();
        let mut lines = Vec::new();

        if let Some(title) = &self.title {
            lines.push(
                title
                    .clone()
                    .with_base_style(&StyleSpec::new("italic"))
                    .pad_to(table_width, Justify::Center),
            );
        }
        if let Some(chars) = &self.box_chars {
            lines.push(self.border_line(chars.top_edge(&padded(&widths, self.padding))));
        }

        if self.show_header {
            let headers = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(c, w)| Content::plain(&c.header).wrap(*w))
                .collect();
            let styles: Vec<StyleSpec> = self
                .columns
                .iter()
                .map(|c| c.header_style.clone().unwrap_or_else(|| self.header_style.clone()))
                .collect();
            lines.extend(self.render_row(headers, &widths, &styles));
            if let Some(chars) = &self.box_chars {
                lines.push(self.border_line(chars.mid_edge(&padded(&widths, self.padding))));
            }
        }

        let styles: Vec<StyleSpec> = self.columns.iter().map(|c| c.style.clone()).collect();
        for row in &self.rows {
            let mut cells = Vec::with_capacity(widths.len());
            for (col, w) in widths.iter().enumerate() {
                cells.push(match row.get(col) {
                    Some(cell) => cell.render(*w)?,
                    None => Content::new(),
                });
            }
            lines.extend(self.render_row(cells, &widths, &styles));
        }

        if let Some(chars) = &self.box_chars {
            lines.push(self.border_line(chars.bottom_edge(&padded(&widths, self.padding))));
        }
        Ok(Content::from_lines(lines))
    }

    fn measure(&self, max_width: usize) -> usize {
        if self.expand {
            return max_width;
        }
        let widths = self.column_widths(max_width);
        (widths.iter().sum::<usize>() + self.overhead()).min(max_width)
    }
}

fn padded(widths: &[usize], padding: usize) -> Vec<usize> {
    widths.iter().map(|w| w + padding * 2).collect()
}

/// Split `total` cells proportionally to `ratios`, handing leftovers to the
/// first columns.
fn split_by_ratio(total: usize, ratios: &[usize]) -> Vec<usize> {
    let sum: usize = ratios.iter().sum();
    if sum == 0 {
        return vec![0; ratios.len()];
    }
    let mut widths: Vec<usize> = ratios.iter().map(|r| total * r / sum).collect();
    let mut leftover = total - widths.iter().sum::<usize>();
    for w in &mut widths {
        if leftover == 0 {
            break;
        }
        *w += 1;
        leftover -= 1;
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new().title("Features");
        table.add_column(Column::new("Feature").style("cyan"));
        table.add_column(Column::new("Example").style("magenta"));
        table.add_row_cells(["Logging", "log.info('Message')"]);
        table.add_row_cells(["Tables", "Table(title='Example')"]);
        table
    }

    #[test]
    fn test_renders_borders_and_rows() {
        let text = sample().render(80).unwrap().plain_text();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("Features"));
        assert!(lines[1].starts_with('╭'));
        assert!(lines[2].contains("Feature") && lines[2].contains("Example"));
        assert!(lines[3].starts_with('├'));
        assert!(lines[4].contains("Logging"));
        assert!(lines[5].contains("Table(title='Example')"));
        assert!(lines[6].starts_with('╰'));
    }

    #[test]
    fn test_square_box_style() {
        let text = sample().box_style(crate::widgets::SQUARE).render(80).unwrap().plain_text();
        assert!(text.lines().any(|l| l.starts_with('┌')));
        assert!(text.lines().last().unwrap().starts_with('└'));
        assert!(!text.contains('╭'));
    }

    #[test]
    fn test_all_lines_same_width() {
        let content = sample().render(80).unwrap();
        let widths: Vec<usize> = content.lines()[1..].iter().map(Line::width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_shrinks_to_fit() {
        let content = sample().render(24).unwrap();
        assert!(content.lines().iter().all(|l| l.width() <= 24));
    }

    #[test]
    fn test_grid_splits_evenly() {
        let mut grid = Table::grid();
        grid.add_column(Column::new("").ratio(1));
        grid.add_column(Column::new("").ratio(1));
        grid.add_row_cells(["left", "right"]);
        let content = grid.render(20).unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content.lines()[0].plain_text(), "left      right     ");
    }

    #[test]
    fn test_missing_cells_render_empty() {
        let mut table = Table::new();
        table.add_column(Column::new("A"));
        table.add_column(Column::new("B"));
        table.add_row_cells(["only"]);
        let text = table.render(40).unwrap().plain_text();
        assert!(text.contains("only"));
    }

    #[test]
    fn test_bad_column_style_fails_at_render_time() {
        let mut table = Table::new();
        table.add_column(Column::new("A").style("nonsense"));
        table.add_row_cells(["x"]);
        // Layout succeeds; the renderer is the one that rejects the style.
        let content = table.render(40).unwrap();
        let renderer = crate::render::PlainRenderer;
        let failed = content
            .lines()
            .iter()
            .any(|l| crate::render::Renderer::render_line(&renderer, l).is_err());
        assert!(failed);
    }

    #[test]
    fn test_split_by_ratio() {
        assert_eq!(split_by_ratio(10, &[1, 1, 1]), vec![4, 3, 3]);
        assert_eq!(split_by_ratio(9, &[2, 1]), vec![6, 3]);
        assert_eq!(split_by_ratio(5, &[]), Vec::<usize>::new());
    }
}
