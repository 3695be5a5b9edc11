//! Column layout selection for converted tables
//!
//! Layout is a presentation choice: a configured rule wins when its header
//! keywords match, otherwise the last column expands.

use super::parser::MarkdownTable;
use crate::core::md2latex::context::{M2LOptions, TableStyle};

/// Header-keyword driven column layout
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    any(feature = "config", feature = "wasm"),
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TableLayoutRule {
    /// Every keyword must occur in the lower-cased header text
    pub keywords: Vec<String>,
    /// Restrict the rule to tables with this many columns
    pub column_count: Option<usize>,
    /// Column specification, e.g. `|l|p{4cm}|X|`
    pub columns: String,
    /// Caption used when no caption marker precedes the table
    pub caption: Option<String>,
    /// Label used together with `caption`
    pub label: Option<String>,
}

impl TableLayoutRule {
    pub fn new<I, S>(keywords: I, columns: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TableLayoutRule {
            keywords: keywords.into_iter().map(Into::into).collect(),
            column_count: None,
            columns: columns.into(),
            caption: None,
            label: None,
        }
    }

    pub fn with_column_count(mut self, count: usize) -> Self {
        self.column_count = Some(count);
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>, label: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self.label = Some(label.into());
        self
    }

    /// Check the rule against a table's lower-cased header text and width
    pub fn matches(&self, header_text: &str, col_count: usize) -> bool {
        if let Some(count) = self.column_count {
            if count != col_count {
                return false;
            }
        }
        self.keywords
            .iter()
            .all(|k| header_text.contains(k.to_lowercase().as_str()))
    }
}

/// Resolved layout for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    /// Column specification
    pub columns: String,
    /// Caption supplied by a rule
    pub caption: Option<String>,
    /// Label supplied by a rule
    pub label: Option<String>,
}

impl TableLayout {
    /// `tabularx` when any column expands, `tabular` otherwise
    pub fn env_name(&self) -> &'static str {
        if self.columns.contains('X') {
            "tabularx"
        } else {
            "tabular"
        }
    }

    /// Opening line of the tabular environment
    pub fn begin(&self) -> String {
        match self.env_name() {
            "tabularx" => format!("\\begin{{tabularx}}{{\\textwidth}}{{{}}}", self.columns),
            env => format!("\\begin{{{}}}{{{}}}", env, self.columns),
        }
    }

    /// Closing line of the tabular environment
    pub fn end(&self) -> String {
        format!("\\end{{{}}}", self.env_name())
    }
}

/// Choose the layout for a parsed table
pub fn choose_layout(table: &MarkdownTable, options: &M2LOptions) -> TableLayout {
    let header_text = table.header_text();
    if let Some(rule) = options
        .table_rules
        .iter()
        .find(|r| r.matches(&header_text, table.col_count()))
    {
        return TableLayout {
            columns: rule.columns.clone(),
            caption: rule.caption.clone(),
            label: rule.label.clone(),
        };
    }

    TableLayout {
        columns: default_columns(table, options.table_style),
        caption: None,
        label: None,
    }
}

/// Bordered column spec built from the separator alignments.
///
/// For `tabularx` the last column becomes `X` so the table fills the text
/// width; the fixed columns keep their alignment.
fn default_columns(table: &MarkdownTable, style: TableStyle) -> String {
    let mut specs: Vec<char> = table
        .alignments
        .iter()
        .map(|a| a.to_latex_char())
        .collect();

    if style == TableStyle::Tabularx {
        if let Some(last) = specs.last_mut() {
            *last = 'X';
        }
    }

    let mut columns = String::with_capacity(specs.len() * 2 + 1);
    columns.push('|');
    for spec in specs {
        columns.push(spec);
        columns.push('|');
    }
    columns
}
