//! Markdown to LaTeX converter
//!
//! This module converts the Markdown dialect used for book chapters into
//! LaTeX body text. Conversion is line-oriented and single-pass: every line is
//! classified on its own and fed to a small state machine that tracks the
//! open list/quote/code block, a buffered table and a pending caption.

pub mod block;
pub mod context;
pub mod inline;
pub mod table;
pub mod utils;

pub use block::{classify_line, BlockConverter, LineKind};
pub use context::{
    CaptionKind, CodeEnvironment, ConvertContext, ListStyle, M2LOptions, OpenBlock, TableStyle,
    TopLevel,
};
pub use inline::{format_inline, InlineFormatter, SpanKind};
pub use table::{FloatCaption, MarkdownTable, TableLayout, TableLayoutRule};
pub use utils::{escape_latex_text, slugify_label, wrap_in_document};

// =============================================================================
// Warning System
// =============================================================================

/// Kind of warning generated during Markdown to LaTeX conversion.
///
/// Conversion never fails; every recoverable oddity in the input is reported
/// with one of these kinds and the converter carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A caption marker was not followed by the container it describes
    OrphanedCaption,
    /// Buffered table rows could not be read as a pipe table
    MalformedTable,
    /// A body row has a different cell count than the header
    CellCountMismatch,
    /// A code fence was still open at end of input
    UnterminatedCodeFence,
    /// The same `\label` was emitted more than once
    DuplicateLabel,
    /// A heading marker with no text
    EmptyHeading,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::OrphanedCaption => write!(f, "orphaned caption"),
            WarningKind::MalformedTable => write!(f, "malformed table"),
            WarningKind::CellCountMismatch => write!(f, "cell count mismatch"),
            WarningKind::UnterminatedCodeFence => write!(f, "unterminated code fence"),
            WarningKind::DuplicateLabel => write!(f, "duplicate label"),
            WarningKind::EmptyHeading => write!(f, "empty heading"),
        }
    }
}

/// A warning generated during Markdown to LaTeX conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionWarning {
    /// The kind of warning (for programmatic handling)
    pub kind: WarningKind,
    /// Human-readable warning message
    pub message: String,
    /// Source line the warning refers to (1-based)
    pub line: Option<usize>,
}

impl ConversionWarning {
    /// Create a new warning with a kind and message.
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
        }
    }

    /// Create a new warning attached to a source line.
    pub fn at_line(kind: WarningKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line: Some(line),
        }
    }
}

impl std::fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(line) = self.line {
            write!(f, "[{}] line {}: {}", self.kind, line, self.message)
        } else {
            write!(f, "[{}] {}", self.kind, self.message)
        }
    }
}

impl From<ConversionWarning> for crate::utils::error::CliDiagnostic {
    fn from(warning: ConversionWarning) -> Self {
        use crate::utils::error::{CliDiagnostic, DiagnosticSeverity};

        let severity = match warning.kind {
            WarningKind::MalformedTable | WarningKind::UnterminatedCodeFence => {
                DiagnosticSeverity::Error
            }
            WarningKind::OrphanedCaption
            | WarningKind::CellCountMismatch
            | WarningKind::DuplicateLabel => DiagnosticSeverity::Warning,
            WarningKind::EmptyHeading => DiagnosticSeverity::Info,
        };

        let mut diag = CliDiagnostic::new(severity, warning.kind.to_string(), warning.message);
        if let Some(line) = warning.line {
            diag = diag.with_location(format!("line {}", line));
        }
        diag
    }
}

/// Result of a Markdown to LaTeX conversion with diagnostics.
///
/// Holds the converted output along with any warnings generated during
/// conversion, so callers can handle diagnostics without scraping stderr.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// The converted LaTeX output
    pub output: String,
    /// Warnings generated during conversion
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionReport {
    /// Create a successful result with no warnings.
    pub fn ok(output: String) -> Self {
        Self {
            output,
            warnings: Vec::new(),
        }
    }

    /// Create a result with warnings.
    pub fn with_warnings(output: String, warnings: Vec<ConversionWarning>) -> Self {
        Self { output, warnings }
    }

    /// Check if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get warnings as formatted strings.
    pub fn format_warnings(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Convert a sequence of Markdown lines to LaTeX lines.
///
/// This is the core transformation; the string-based functions below split
/// their input and delegate here. The result is never wrapped in a document,
/// whatever `options.full_document` says.
pub fn convert_lines<S: AsRef<str>>(lines: &[S], options: &M2LOptions) -> Vec<String> {
    convert_lines_with_diagnostics(lines, options).0
}

/// Convert Markdown lines, returning the output lines and all warnings.
pub fn convert_lines_with_diagnostics<S: AsRef<str>>(
    lines: &[S],
    options: &M2LOptions,
) -> (Vec<String>, Vec<ConversionWarning>) {
    BlockConverter::convert(lines, options)
}

/// Convert Markdown text to LaTeX
pub fn markdown_to_latex(input: &str) -> String {
    markdown_to_latex_with_options(input, &M2LOptions::default())
}

/// Convert Markdown text to LaTeX with options
pub fn markdown_to_latex_with_options(input: &str, options: &M2LOptions) -> String {
    markdown_to_latex_with_diagnostics(input, options).output
}

/// Convert a Markdown chapter to a complete LaTeX document
pub fn markdown_document_to_latex(input: &str) -> String {
    markdown_to_latex_with_options(input, &M2LOptions::full_document())
}

/// Convert Markdown text to LaTeX, returning full diagnostics.
///
/// This is the **recommended** function for library/integration use. The
/// output is the converted lines joined with `\n`, wrapped in a document when
/// `options.full_document` is set; the warnings are returned instead of being
/// printed.
///
/// # Example
/// ```
/// use mdlatex::core::md2latex::{markdown_to_latex_with_diagnostics, M2LOptions};
///
/// let report = markdown_to_latex_with_diagnostics("```rust\nfn main() {}", &M2LOptions::default());
/// assert!(report.output.ends_with("\\end{minted}"));
/// for warning in &report.warnings {
///     eprintln!("Warning: {}", warning);
/// }
/// assert!(report.has_warnings());
/// ```
pub fn markdown_to_latex_with_diagnostics(input: &str, options: &M2LOptions) -> ConversionReport {
    let lines: Vec<&str> = input.lines().collect();
    let (output, warnings) = BlockConverter::convert(&lines, options);

    let mut result = output.join("\n");
    if options.full_document {
        result = wrap_in_document(&result, options);
    }

    ConversionReport::with_warnings(result, warnings)
}
