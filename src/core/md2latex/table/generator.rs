//! LaTeX table float generation

use super::layout::TableLayout;
use super::parser::MarkdownTable;
use crate::core::md2latex::context::M2LOptions;
use crate::core::md2latex::inline::InlineFormatter;

/// Caption attached to a generated table or figure float
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatCaption {
    /// Raw caption text
    pub text: String,
    /// Label, emitted only when present
    pub label: Option<String>,
}

impl FloatCaption {
    pub fn new(text: impl Into<String>, label: Option<String>) -> Self {
        FloatCaption {
            text: text.into(),
            label,
        }
    }

    /// `\caption` line, followed by `\label` when a label is set
    pub fn render(&self, formatter: &InlineFormatter) -> Vec<String> {
        let mut lines = vec![format!("\\caption{{{}}}", formatter.escape(&self.text))];
        if let Some(ref label) = self.label {
            lines.push(format!("\\label{{{}}}", label));
        }
        lines
    }
}

/// Render a table float, one output line per vector entry.
///
/// Every row, header included, ends with `\\` followed by an `\hline` line.
pub fn render_table(
    table: &MarkdownTable,
    layout: &TableLayout,
    caption: Option<&FloatCaption>,
    formatter: &InlineFormatter,
    options: &M2LOptions,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(table.rows.len() * 2 + 10);

    lines.push(format!("\\begin{{table}}{}", options.placement_suffix()));
    lines.push("\\centering".to_string());
    lines.push(layout.begin());
    lines.push("\\hline".to_string());

    let header: Vec<String> = table
        .header
        .iter()
        .map(|cell| {
            let text = formatter.format(cell);
            if options.bold_table_header {
                format!("\\textbf{{{}}}", text)
            } else {
                text
            }
        })
        .collect();
    lines.push(format!("{} \\\\", header.join(" & ")));
    lines.push("\\hline".to_string());

    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(|cell| formatter.format(cell)).collect();
        lines.push(format!("{} \\\\", cells.join(" & ")));
        lines.push("\\hline".to_string());
    }

    lines.push(layout.end());

    if let Some(caption) = caption {
        lines.extend(caption.render(formatter));
    }

    lines.push("\\end{table}".to_string());
    lines
}
