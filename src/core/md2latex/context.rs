//! Conversion context and options for Markdown to LaTeX conversion
//!
//! This module handles the per-document converter state, output buffering,
//! and conversion options.

use fxhash::FxHashMap;

use super::table::TableLayoutRule;
use super::{ConversionWarning, WarningKind};
#[cfg(feature = "config")]
use crate::utils::error::{ConversionError, ConversionResult};

/// Top-level sectioning division used for `#` headings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    any(feature = "config", feature = "wasm"),
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TopLevel {
    /// `#` → `\chapter` (book/report classes)
    #[default]
    Chapter,
    /// `#` → `\section` (article class)
    Section,
}

/// Environment used for fenced code blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    any(feature = "config", feature = "wasm"),
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum CodeEnvironment {
    /// `\begin{minted}{lang}`
    #[default]
    Minted,
    /// `\begin{verbatim}` (language dropped)
    Verbatim,
    /// `\begin{lstlisting}[language=...]`
    Listings,
}

impl CodeEnvironment {
    /// LaTeX environment name
    pub fn env_name(&self) -> &'static str {
        match self {
            CodeEnvironment::Minted => "minted",
            CodeEnvironment::Verbatim => "verbatim",
            CodeEnvironment::Listings => "lstlisting",
        }
    }
}

/// Tabular environment family used for Markdown tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    any(feature = "config", feature = "wasm"),
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TableStyle {
    /// `tabularx` spanning `\textwidth`, one expanding `X` column
    #[default]
    Tabularx,
    /// Plain `tabular` with one `l`/`c`/`r` column per field
    Tabular,
}

/// Options for Markdown to LaTeX conversion
#[derive(Debug, Clone)]
#[cfg_attr(
    any(feature = "config", feature = "wasm"),
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct M2LOptions {
    /// Sectioning command used for level-1 headings
    pub top_level: TopLevel,
    /// Environment for fenced code blocks
    pub code_environment: CodeEnvironment,
    /// Language used when a fence carries no info string
    pub default_code_language: String,
    /// Float placement specifier for `table`/`figure` (empty = none)
    pub float_placement: String,
    /// Tabular family for tables without a matching layout rule
    pub table_style: TableStyle,
    /// Wrap header cells in `\textbf{}`
    pub bold_table_header: bool,
    /// Header-keyword driven column layouts, checked in order
    pub table_rules: Vec<TableLayoutRule>,
    /// Caption for tables that have neither a caption marker nor a rule caption
    pub default_table_caption: Option<String>,
    /// Replace checkboxes and emoji with LaTeX commands
    pub replace_symbols: bool,
    /// Whether to wrap output in a complete LaTeX document
    pub full_document: bool,
    /// Document class to use (default: "book")
    pub document_class: String,
    /// Document title (optional)
    pub title: Option<String>,
    /// Document author (optional)
    pub author: Option<String>,
}

impl Default for M2LOptions {
    fn default() -> Self {
        Self {
            top_level: TopLevel::Chapter,
            code_environment: CodeEnvironment::Minted,
            default_code_language: "text".to_string(),
            float_placement: "H".to_string(),
            table_style: TableStyle::Tabularx,
            bold_table_header: true,
            table_rules: Vec::new(),
            default_table_caption: None,
            replace_symbols: false,
            full_document: false,
            document_class: "book".to_string(),
            title: None,
            author: None,
        }
    }
}

impl M2LOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn full_document() -> Self {
        Self {
            full_document: true,
            ..Default::default()
        }
    }

    /// Options for article-style output (`#` → `\section`)
    pub fn article() -> Self {
        Self {
            top_level: TopLevel::Section,
            document_class: "article".to_string(),
            ..Default::default()
        }
    }

    /// Float placement as it appears after `\begin{env}`
    pub fn placement_suffix(&self) -> String {
        if self.float_placement.is_empty() {
            String::new()
        } else {
            format!("[{}]", self.float_placement)
        }
    }

    /// Parse options from a TOML document
    #[cfg(feature = "config")]
    pub fn from_toml_str(source: &str) -> ConversionResult<Self> {
        toml::from_str(source).map_err(|e| ConversionError::config(e.to_string()))
    }

    /// Load options from a TOML file
    #[cfg(all(feature = "config", not(target_arch = "wasm32")))]
    pub fn load(path: impl AsRef<std::path::Path>) -> ConversionResult<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }
}

/// List environment style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    Bullet,
    Numbered,
}

impl ListStyle {
    /// LaTeX environment name
    pub fn env_name(&self) -> &'static str {
        match self {
            ListStyle::Bullet => "itemize",
            ListStyle::Numbered => "enumerate",
        }
    }
}

/// The block currently open across lines.
///
/// Lists, quotes and code fences exclude each other; opening one closes the
/// other first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OpenBlock {
    #[default]
    None,
    List(ListStyle),
    Quote,
    CodeFence { language: Option<String>, line: usize },
}

/// Float kind a caption marker targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionKind {
    Figure,
    Table,
}

impl CaptionKind {
    /// LaTeX float environment name
    pub fn env_name(&self) -> &'static str {
        match self {
            CaptionKind::Figure => "figure",
            CaptionKind::Table => "table",
        }
    }
}

/// A caption seen ahead of the container it describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionMarker {
    pub kind: CaptionKind,
    /// Label slug derived from the marker's kind word
    pub label: String,
    /// Raw caption text (escaped on output)
    pub text: String,
    /// Source line of the marker (1-based)
    pub line: usize,
}

/// Initial capacity for the output line buffer
const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Conversion state for one document
pub struct ConvertContext {
    /// Conversion options
    pub options: M2LOptions,
    /// Emitted LaTeX lines
    pub output: Vec<String>,
    /// Block left open by previous lines
    pub open: OpenBlock,
    /// Raw rows of the table being accumulated
    pub table_buffer: Vec<String>,
    /// Source line of the first buffered table row
    pub table_start_line: usize,
    /// Caption waiting for its table or figure
    pub pending_caption: Option<CaptionMarker>,
    /// Current source line (1-based)
    pub line_number: usize,
    /// Collected warnings during conversion
    pub warnings: Vec<ConversionWarning>,
    /// Labels emitted so far, with their use count
    pub labels: FxHashMap<String, usize>,
}

impl ConvertContext {
    /// Create a new context with pre-allocated buffer
    pub fn new(options: M2LOptions) -> Self {
        Self {
            options,
            output: Vec::with_capacity(INITIAL_BUFFER_CAPACITY),
            open: OpenBlock::None,
            table_buffer: Vec::new(),
            table_start_line: 0,
            pending_caption: None,
            line_number: 0,
            warnings: Vec::new(),
            labels: FxHashMap::default(),
        }
    }

    /// Push one output line
    pub fn emit(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    /// Add a warning at the current source line
    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        let line = self.line_number;
        self.warn_at(kind, message, line);
    }

    /// Add a warning at a specific source line
    pub fn warn_at(&mut self, kind: WarningKind, message: impl Into<String>, line: usize) {
        self.warnings.push(ConversionWarning::at_line(kind, message, line));
    }

    /// Record a label; reused labels produce a warning
    pub fn register_label(&mut self, label: &str, line: usize) {
        let count = self.labels.entry(label.to_string()).or_insert(0);
        *count += 1;
        if *count > 1 {
            let message = format!("label '{}' is used {} times", label, count);
            self.warn_at(WarningKind::DuplicateLabel, message, line);
        }
    }

    /// Check if a quote is open
    pub fn in_quote(&self) -> bool {
        matches!(self.open, OpenBlock::Quote)
    }

    /// Check if a code fence is open
    pub fn in_code_fence(&self) -> bool {
        matches!(self.open, OpenBlock::CodeFence { .. })
    }

    /// Close an open list, if any
    pub fn close_list(&mut self) {
        if let OpenBlock::List(style) = self.open {
            self.emit(format!("\\end{{{}}}", style.env_name()));
            self.open = OpenBlock::None;
        }
    }

    /// Close an open quote, if any
    pub fn close_quote(&mut self) {
        if self.in_quote() {
            self.emit("\\end{quote}");
            self.open = OpenBlock::None;
        }
    }

    /// Close an open code fence, if any
    pub fn close_code_fence(&mut self) {
        if self.in_code_fence() {
            let env = self.options.code_environment.env_name();
            self.emit(format!("\\end{{{}}}", env));
            self.open = OpenBlock::None;
        }
    }

    /// Close whichever block is open
    pub fn close_open_block(&mut self) {
        match self.open {
            OpenBlock::None => {}
            OpenBlock::List(_) => self.close_list(),
            OpenBlock::Quote => self.close_quote(),
            OpenBlock::CodeFence { .. } => self.close_code_fence(),
        }
    }

    /// Take the emitted lines and warnings
    pub fn finish(self) -> (Vec<String>, Vec<ConversionWarning>) {
        (self.output, self.warnings)
    }
}

impl Default for ConvertContext {
    fn default() -> Self {
        Self::new(M2LOptions::default())
    }
}
