//! Core conversion modules
//!
//! This module contains the conversion engine:
//! - `md2latex`: Markdown to LaTeX converter (line-oriented state machine)

pub mod md2latex;

// Re-export main types and functions from md2latex
pub use md2latex::{
    convert_lines, convert_lines_with_diagnostics, markdown_document_to_latex, markdown_to_latex,
    markdown_to_latex_with_diagnostics, markdown_to_latex_with_options, BlockConverter,
    ConversionReport, ConversionWarning, M2LOptions, WarningKind,
};
