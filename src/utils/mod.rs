//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Diagnostics for generated LaTeX
//! - File reading/writing and batch helpers
//! - Error types and result types

pub mod diagnostics;
pub mod error;
pub mod files;

// Re-export commonly used items
pub use diagnostics::{check_latex, format_diagnostics, CheckResult, Diagnostic, DiagnosticLevel};
pub use error::{CliDiagnostic, ConversionError, ConversionResult, DiagnosticSeverity};
pub use files::{convert_file_with, output_path_for, FileResolver, MemoryFileResolver};

#[cfg(not(target_arch = "wasm32"))]
pub use files::{convert_file, markdown_files_in, StdFileResolver};
