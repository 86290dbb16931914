//! A tiny terminal model for asserting on what is actually visible.
//!
//! Understands exactly the control sequences the coordinator emits
//! (`\n`, `\r`, cursor up, erase line, erase down, clear screen) and
//! ignores SGR colour codes.

/// Visible terminal contents after replaying an output stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualScreen {
    rows: Vec<Vec<char>>,
    row: usize,
    col: usize,
}

impl VirtualScreen {
    /// Replay `output` onto an empty screen.
    #[must_use]
    pub fn from_output(output: &str) -> Self {
        let mut screen = Self::default();
        screen.feed(output);
        screen
    }

    /// Apply more output.
    pub fn feed(&mut self, output: &str) {
        let mut chars = output.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\n' => {
                    self.row += 1;
                    self.col = 0;
                }
                '\r' => self.col = 0,
                '\x1b' => {
                    if chars.peek() != Some(&'[') {
                        continue;
                    }
                    chars.next();
                    let mut params = String::new();
                    let mut command = None;
                    for c in chars.by_ref() {
                        if c.is_ascii_digit() || c == ';' || c == '?' {
                            params.push(c);
                        } else {
                            command = Some(c);
                            break;
                        }
                    }
                    if let Some(command) = command {
                        self.control(command, &params);
                    }
                }
                _ => self.put(ch),
            }
        }
    }

    fn control(&mut self, command: char, params: &str) {
        let n = params
            .split(';')
            .next()
            .and_then(|p| p.parse::<usize>().ok());
        match command {
            'A' => self.row = self.row.saturating_sub(n.unwrap_or(1)),
            'B' => self.row += n.unwrap_or(1),
            'G' => self.col = n.unwrap_or(1).saturating_sub(1),
            'H' => {
                self.row = 0;
                self.col = 0;
            }
            'J' => match n.unwrap_or(0) {
                2 | 3 => self.rows.clear(),
                _ => {
                    self.rows.truncate(self.row + 1);
                    if let Some(row) = self.rows.get_mut(self.row) {
                        row.truncate(self.col);
                    }
                }
            },
            'K' => {
                if let Some(row) = self.rows.get_mut(self.row) {
                    match n.unwrap_or(0) {
                        2 => row.clear(),
                        _ => row.truncate(self.col),
                    }
                }
            }
            // SGR and anything else do not move text
            _ => {}
        }
    }

    fn put(&mut self, ch: char) {
        while self.rows.len() <= self.row {
            self.rows.push(Vec::new());
        }
        let row = &mut self.rows[self.row];
        while row.len() < self.col {
            row.push(' ');
        }
        if self.col < row.len() {
            row[self.col] = ch;
        } else {
            row.push(ch);
        }
        self.col += 1;
    }

    /// Visible lines, trailing blank lines dropped.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .rows
            .iter()
            .map(|r| r.iter().collect::<String>().trim_end().to_string())
            .collect();
        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        lines
    }

    /// Number of visible lines containing `needle`.
    #[must_use]
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines().iter().filter(|l| l.contains(needle)).count()
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}
