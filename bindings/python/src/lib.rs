//! Python bindings for mdlatex

use pyo3::prelude::*;

/// Convert Markdown to a LaTeX fragment.
#[pyfunction]
#[pyo3(signature = (input, full_document = false, article = false))]
fn markdown_to_latex(input: &str, full_document: bool, article: bool) -> String {
    let mut options = if article {
        mdlatex::M2LOptions::article()
    } else {
        mdlatex::M2LOptions::default()
    };
    options.full_document = full_document;
    mdlatex::markdown_to_latex_with_options(input, &options)
}

/// Convert Markdown to LaTeX, returning `(output, warnings)`.
#[pyfunction]
fn markdown_to_latex_with_warnings(input: &str) -> (String, Vec<String>) {
    let report =
        mdlatex::markdown_to_latex_with_diagnostics(input, &mdlatex::M2LOptions::default());
    let warnings = report.format_warnings();
    (report.output, warnings)
}

/// Format one line of inline Markdown as LaTeX.
#[pyfunction]
fn format_inline(input: &str) -> String {
    mdlatex::format_inline(input)
}

#[pymodule]
fn _native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(markdown_to_latex, m)?)?;
    m.add_function(wrap_pyfunction!(markdown_to_latex_with_warnings, m)?)?;
    m.add_function(wrap_pyfunction!(format_inline, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
