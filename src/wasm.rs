//! WASM bindings for mdlatex
//!
//! This module provides JavaScript-accessible functions for Markdown → LaTeX
//! conversion.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::core::md2latex::{markdown_to_latex_with_diagnostics, M2LOptions};

/// Conversion result with additional metadata
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct ConvertResult {
    /// The converted output
    pub output: String,
    /// Whether the conversion was successful
    pub success: bool,
    /// Error message if conversion failed
    pub error: Option<String>,
    /// Warnings during conversion
    pub warnings: Vec<String>,
}

#[cfg(feature = "wasm")]
impl ConvertResult {
    fn failed(error: String) -> Self {
        Self {
            output: String::new(),
            success: false,
            error: Some(error),
            warnings: vec![],
        }
    }
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert Markdown to a LaTeX fragment with default options
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "markdownToLatex")]
pub fn markdown_to_latex_wasm(input: &str) -> String {
    crate::markdown_to_latex(input)
}

/// Convert a Markdown chapter to a complete LaTeX document
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "markdownDocumentToLatex")]
pub fn markdown_document_to_latex_wasm(input: &str) -> String {
    crate::markdown_document_to_latex(input)
}

/// Convert Markdown to LaTeX with options.
///
/// `options` is a plain object with the fields of `M2LOptions` (snake_case,
/// all optional). Returns a `ConvertResult` object.
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "markdownToLatexWithOptions")]
pub fn markdown_to_latex_with_options_wasm(input: &str, options: JsValue) -> JsValue {
    let opts: M2LOptions = if options.is_undefined() || options.is_null() {
        M2LOptions::default()
    } else {
        match serde_wasm_bindgen::from_value(options) {
            Ok(opts) => opts,
            Err(e) => {
                let result = ConvertResult::failed(format!("Invalid options: {}", e));
                return serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL);
            }
        }
    };

    let result = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        markdown_to_latex_with_diagnostics(input, &opts)
    })) {
        Ok(report) => ConvertResult {
            warnings: report.format_warnings(),
            output: report.output,
            success: true,
            error: None,
        },
        Err(e) => {
            // Try to extract panic message for better error reporting
            let error_msg = if let Some(s) = e.downcast_ref::<&str>() {
                format!("Conversion failed: {}", s)
            } else if let Some(s) = e.downcast_ref::<String>() {
                format!("Conversion failed: {}", s)
            } else {
                "Conversion failed: unknown error (check browser console for details)".to_string()
            };
            ConvertResult::failed(error_msg)
        }
    };

    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Format one line of inline Markdown (code, bold, italic) as LaTeX
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "formatInline")]
pub fn format_inline_wasm(input: &str) -> String {
    crate::format_inline(input)
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Check LaTeX for potential issues
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "checkLatex")]
pub fn check_latex_wasm(input: &str) -> JsValue {
    use crate::diagnostics::DiagnosticLevel;

    let result = crate::diagnostics::check_latex(input);

    // Group diagnostics by level
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for d in &result.diagnostics {
        match d.level {
            DiagnosticLevel::Error => errors.push(d.message.clone()),
            DiagnosticLevel::Warning => warnings.push(d.message.clone()),
            DiagnosticLevel::Info => infos.push(d.message.clone()),
        }
    }

    let summary = CheckSummary {
        errors,
        warnings,
        infos,
        has_errors: result.has_errors(),
    };
    serde_wasm_bindgen::to_value(&summary).unwrap_or(JsValue::NULL)
}

/// Summary of LaTeX check results
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct CheckSummary {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
    pub has_errors: bool,
}
