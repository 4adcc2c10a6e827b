//! Output formatting for the CLI.
//!
//! Command results (describe blocks, tables, confirmations) are written to
//! the writer handed to each handler; this module covers status messages and
//! the plain-text layouts those results use.

use console::{measure_text_width, style};

/// Output handler for CLI status messages.
#[derive(Clone, Default)]
pub struct Output;

impl Output {
    /// Create a new output handler.
    pub fn new() -> Self {
        Self
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        println!("{}", msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        println!("{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }
}

/// Fixed-order `Label: value` block for single-entity views.
#[derive(Debug, Default)]
pub struct Details {
    buf: String,
}

impl Details {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one `Label: value` line. Empty values still get their line.
    pub fn field(&mut self, label: &str, value: impl std::fmt::Display) -> &mut Self {
        self.buf.push_str(&format!("{}: {}\n", label, value));
        self
    }

    /// Append a label on its own line followed by a verbatim block.
    pub fn block(&mut self, label: &str, body: &str) -> &mut Self {
        self.buf.push_str(label);
        self.buf.push_str(":\n");
        self.buf.push_str(body);
        if !body.ends_with('\n') {
            self.buf.push('\n');
        }
        self
    }

    /// Append a raw line.
    pub fn line(&mut self, line: &str) -> &mut Self {
        self.buf.push_str(line);
        self.buf.push('\n');
        self
    }

    pub fn finish(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }
}

/// Left-aligned text table padded to the widest cell of each column.
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Spaces between columns.
const COLUMN_GAP: usize = 2;

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Render the table. A table without rows renders as nothing at all.
    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let width = measure_text_width(cell);
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(width),
                    None => widths.push(width),
                }
            }
        }

        let mut out = String::new();
        for line in std::iter::once(&self.headers).chain(self.rows.iter()) {
            let mut text = String::new();
            for (i, cell) in line.iter().enumerate() {
                text.push_str(cell);
                let pad = widths[i] - measure_text_width(cell) + COLUMN_GAP;
                text.push_str(&" ".repeat(pad));
            }
            out.push_str(text.trim_end());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_aligns_columns() {
        let mut table = Table::new(["ID", "NAME"]);
        table.row(vec!["1".into(), "alpha".into()]);
        table.row(vec!["1234".into(), "b".into()]);

        assert_eq!(table.render(), "ID    NAME\n1     alpha\n1234  b\n");
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        let table = Table::new(["ID", "NAME"]);
        assert_eq!(table.render(), "");
    }

    #[test]
    fn test_details_keeps_empty_fields() {
        let text = Details::new()
            .field("Name", "x")
            .field("Last Editor", "")
            .finish();
        assert_eq!(text, "Name: x\nLast Editor: \n");
    }

    #[test]
    fn test_details_block_ends_with_newline() {
        let text = Details::new().block("Code", "fn()").finish();
        assert_eq!(text, "Code:\nfn()\n");
    }
}
