//! # mdlatex
//!
//! Markdown book chapters to LaTeX converter written in Rust.
//!
//! ## Features
//!
//! - **Single pass**: line-oriented state machine, no AST, no backtracking
//! - **Safe escaping**: every LaTeX special character escaped exactly once,
//!   never inside markup the converter inserted itself
//! - **Structure**: chapters and sections, lists, quotes, code listings
//! - **Tables and captions**: pipe tables as `tabularx` floats, caption
//!   markers attached to the following table or figure
//! - **Diagnostics**: every recoverable oddity reported as a typed warning
//! - **WASM Support**: Compiles to WebAssembly for browser usage
//!
//! ## Usage Examples
//!
//! ### Inline Formatting
//!
//! ```rust
//! use mdlatex::format_inline;
//!
//! assert_eq!(format_inline("**a** & `b_c`"), r"\textbf{a} \& \texttt{b\_c}");
//! ```
//!
//! ### Chapter Conversion
//!
//! ```rust
//! use mdlatex::{markdown_to_latex_with_diagnostics, M2LOptions};
//!
//! let report = markdown_to_latex_with_diagnostics(
//!     "# Introducción\n\n* uno\n* dos",
//!     &M2LOptions::default(),
//! );
//! assert!(report.output.starts_with(r"\chapter{Introducción}"));
//! assert!(report.output.ends_with(r"\end{itemize}"));
//! assert!(!report.has_warnings());
//! ```

/// Core conversion modules
pub mod core;

/// Data layer - static mappings and constants
pub mod data;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export core conversion functions
pub use core::md2latex;
pub use core::md2latex::{
    convert_lines, convert_lines_with_diagnostics, escape_latex_text, format_inline,
    markdown_document_to_latex, markdown_to_latex, markdown_to_latex_with_diagnostics,
    markdown_to_latex_with_options, BlockConverter, CodeEnvironment, ConversionReport,
    ConversionWarning, InlineFormatter, M2LOptions, TableLayoutRule, TableStyle, TopLevel,
    WarningKind,
};

// Re-export data modules
pub use data::constants;
pub use data::symbols;

// Re-export utilities
pub use utils::diagnostics;
pub use utils::error::{CliDiagnostic, ConversionError, ConversionResult, DiagnosticSeverity};
pub use utils::files;

#[cfg(not(target_arch = "wasm32"))]
pub use utils::files::convert_file;
