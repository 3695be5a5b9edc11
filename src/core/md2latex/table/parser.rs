//! Pipe table row splitting and normalization

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// One cell of a separator row: `---`, `:--`, `--:`, `:-:`
    static ref SEPARATOR_CELL: Regex = Regex::new(r"^:?-+:?$").unwrap();
}

/// Column alignment taken from the separator row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnAlign {
    #[default]
    Default,
    Left,
    Center,
    Right,
}

impl ColumnAlign {
    /// Parse one separator cell
    pub fn from_separator(cell: &str) -> Self {
        let cell = cell.trim();
        match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => ColumnAlign::Center,
            (true, false) => ColumnAlign::Left,
            (false, true) => ColumnAlign::Right,
            (false, false) => ColumnAlign::Default,
        }
    }

    /// Convert to LaTeX column specification character
    pub fn to_latex_char(&self) -> char {
        match self {
            ColumnAlign::Default | ColumnAlign::Left => 'l',
            ColumnAlign::Center => 'c',
            ColumnAlign::Right => 'r',
        }
    }
}

/// A body row whose field count differed from the header's
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMismatch {
    /// Index into the buffered lines (0 = header)
    pub line_index: usize,
    /// Fields found before padding/truncation
    pub found: usize,
}

/// A parsed pipe table with every body row normalized to the header width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownTable {
    /// Raw header cell texts
    pub header: Vec<String>,
    /// One alignment per column
    pub alignments: Vec<ColumnAlign>,
    /// Raw body cell texts, `header.len()` cells each
    pub rows: Vec<Vec<String>>,
    /// Whether the second line was a well-formed separator row
    pub has_separator: bool,
    /// Body rows that had to be padded or truncated
    pub mismatches: Vec<RowMismatch>,
}

impl MarkdownTable {
    /// Parse buffered table lines.
    ///
    /// Returns `None` when fewer than two lines were buffered; the caller
    /// passes such input through unchanged.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Option<Self> {
        if lines.len() < 2 {
            return None;
        }

        let header = split_row(lines[0].as_ref());
        let col_count = header.len();

        // The second line is discarded either way; alignments are only
        // trusted when it really is a separator row.
        let parsed_alignments = parse_alignment_row(lines[1].as_ref());
        let has_separator = parsed_alignments.is_some();
        let mut alignments = parsed_alignments.unwrap_or_default();
        alignments.resize(col_count, ColumnAlign::Default);

        let mut rows = Vec::with_capacity(lines.len() - 2);
        let mut mismatches = Vec::new();
        for (offset, line) in lines[2..].iter().enumerate() {
            let mut cells = split_row(line.as_ref());
            if cells.len() != col_count {
                mismatches.push(RowMismatch {
                    line_index: offset + 2,
                    found: cells.len(),
                });
                cells.resize(col_count, String::new());
            }
            rows.push(cells);
        }

        Some(MarkdownTable {
            header,
            alignments,
            rows,
            has_separator,
            mismatches,
        })
    }

    /// Number of columns (header field count)
    pub fn col_count(&self) -> usize {
        self.header.len()
    }

    /// Lower-cased header text, used for layout rule matching
    pub fn header_text(&self) -> String {
        self.header.join(" ").to_lowercase()
    }
}

/// Split a pipe row into trimmed cells.
///
/// Exactly one leading and one trailing `|` are removed before splitting.
pub fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
    trimmed.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// Parse a separator row, returning `None` if any cell is not a separator.
pub fn parse_alignment_row(line: &str) -> Option<Vec<ColumnAlign>> {
    let cells = split_row(line);
    if cells.iter().all(|c| SEPARATOR_CELL.is_match(c)) {
        Some(cells.iter().map(|c| ColumnAlign::from_separator(c)).collect())
    } else {
        None
    }
}
