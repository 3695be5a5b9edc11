//! Markdown pipe table → LaTeX table conversion
//!
//! Tables are accumulated line by line by the block converter and rendered in
//! one go once the first non-table line is seen.
//!
//! # Architecture
//!
//! ```text
//! buffered rows -> MarkdownTable::parse -> choose_layout -> render_table
//! ```
//!
//! # Example
//!
//! ```ignore
//! use table::{choose_layout, render_table, MarkdownTable};
//!
//! let table = MarkdownTable::parse(&rows)?;
//! let layout = choose_layout(&table, &options);
//! let lines = render_table(&table, &layout, caption.as_ref(), &formatter, &options);
//! ```

mod generator;
mod layout;
mod parser;


// Re-export public API
pub use generator::{render_table, FloatCaption};
pub use layout::{choose_layout, TableLayout, TableLayoutRule};
pub use parser::{parse_alignment_row, split_row, ColumnAlign, MarkdownTable, RowMismatch};
