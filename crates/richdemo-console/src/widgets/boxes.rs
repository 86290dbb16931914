//! Border character sets.

/// Characters used to draw a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxChars {
    pub top_left: char,
    pub top: char,
    pub top_divider: char,
    pub top_right: char,
    pub vertical: char,
    pub mid_left: char,
    pub mid: char,
    pub cross: char,
    pub mid_right: char,
    pub bottom_left: char,
    pub bottom: char,
    pub bottom_divider: char,
    pub bottom_right: char,
}

impl BoxChars {
    /// Top edge with dividers after each column width.
    #[must_use]
    pub fn top_edge(&self, widths: &[usize]) -> String {
        self.edge(self.top_left, self.top, self.top_divider, self.top_right, widths)
    }

    /// Separator between header and body.
    #[must_use]
    pub fn mid_edge(&self, widths: &[usize]) -> String {
        self.edge(self.mid_left, self.mid, self.cross, self.mid_right, widths)
    }

    #[must_use]
    pub fn bottom_edge(&self, widths: &[usize]) -> String {
        self.edge(
            self.bottom_left,
            self.bottom,
            self.bottom_divider,
            self.bottom_right,
            widths,
        )
    }

    fn edge(&self, left: char, fill: char, divider: char, right: char, widths: &[usize]) -> String {
        let mut out = String::new();
        out.push(left);
        for (i, w) in widths.iter().enumerate() {
            if i > 0 {
                out.push(divider);
            }
            out.extend(std::iter::repeat_n(fill, *w));
        }
        out.push(right);
        out
    }
}

pub const ROUNDED: BoxChars = BoxChars {
    top_left: '╭',
    top: '─',
    top_divider: '┬',
    top_right: '╮',
    vertical: '│',
    mid_left: '├',
    mid: '─',
    cross: '┼',
    mid_right: '┤',
    bottom_left: '╰',
    bottom: '─',
    bottom_divider: '┴',
    bottom_right: '╯',
};

pub const SQUARE: BoxChars = BoxChars {
    top_left: '┌',
    top: '─',
    top_divider: '┬',
    top_right: '┐',
    vertical: '│',
    mid_left: '├',
    mid: '─',
    cross: '┼',
    mid_right: '┤',
    bottom_left: '└',
    bottom: '─',
    bottom_divider: '┴',
    bottom_right: '┘',
};

pub const ASCII: BoxChars = BoxChars {
    top_left: '+',
    top: '-',
    top_divider: '+',
    top_right: '+',
    vertical: '|',
    mid_left: '+',
    mid: '-',
    cross: '+',
    mid_right: '+',
    bottom_left: '+',
    bottom: '-',
    bottom_divider: '+',
    bottom_right: '+',
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        assert_eq!(ROUNDED.top_edge(&[2, 3]), "╭──┬───╮");
        assert_eq!(ROUNDED.mid_edge(&[2, 3]), "├──┼───┤");
        assert_eq!(ASCII.bottom_edge(&[1]), "+-+");
    }
}
