//! LaTeX output diagnostics
//!
//! This module checks the LaTeX produced by the converter (or any LaTeX
//! fragment) for structural problems. It can identify:
//!
//! - Unbalanced braces
//! - Unclosed, unmatched and mismatched environments
//! - Markdown markers that survived conversion
//!
//! Bodies of verbatim-like environments (`minted`, `verbatim`, `lstlisting`)
//! are skipped, since code may contain anything.
//!
//! ## Example
//!
//! ```rust
//! use mdlatex::diagnostics::{check_latex, DiagnosticLevel};
//!
//! let result = check_latex(r"\begin{itemize}");
//! assert!(result.has_errors());
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref BEGIN_ENV: Regex = Regex::new(r"\\begin\{([^}]*)\}").unwrap();
    static ref END_ENV: Regex = Regex::new(r"\\end\{([^}]*)\}").unwrap();
    /// Either marker, so that matches come out in source order
    static ref ENV_MARKER: Regex = Regex::new(r"\\(begin|end)\{([^}]*)\}").unwrap();
    /// `**` left behind by an unmatched bold delimiter
    static ref STRAY_BOLD: Regex = Regex::new(r"\*\*").unwrap();
}

/// Environments whose bodies are raw text
const VERBATIM_ENVIRONMENTS: &[&str] = &["minted", "verbatim", "lstlisting"];

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - the document probably compiles but looks wrong
    Warning,
    /// Error - the document will not compile
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Human-readable message
    pub message: String,
    /// Line number (1-indexed)
    pub line: Option<usize>,
    /// Column number (1-indexed)
    pub column: Option<usize>,
    /// Relevant source text
    pub source_text: Option<String>,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            line: None,
            column: None,
            source_text: None,
            suggestion: None,
        }
    }

    /// Add location information
    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Add source text
    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    /// Add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: level: message
        //         --> line:column
        //         |
        //         | source text
        //         = help: suggestion

        write!(f, "{}: {}", self.level, self.message)?;

        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, "\n  --> line {}:{}", line, col)?;
        }

        if let Some(ref source) = self.source_text {
            write!(f, "\n  |\n  | {}", source)?;
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Check result with summary
#[derive(Debug, Default)]
pub struct CheckResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Number of errors
    pub errors: usize,
    /// Number of warnings
    pub warnings: usize,
    /// Number of info messages
    pub infos: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Check if there are any issues at all
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.errors > 0 {
            parts.push(format!(
                "{} error{}",
                self.errors,
                if self.errors == 1 { "" } else { "s" }
            ));
        }
        if self.warnings > 0 {
            parts.push(format!(
                "{} warning{}",
                self.warnings,
                if self.warnings == 1 { "" } else { "s" }
            ));
        }
        if self.infos > 0 {
            parts.push(format!(
                "{} note{}",
                self.infos,
                if self.infos == 1 { "" } else { "s" }
            ));
        }
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// One line of checkable LaTeX, with verbatim bodies already removed
struct CheckLine<'a> {
    /// 1-based line number
    number: usize,
    text: &'a str,
}

/// Check LaTeX source for issues
pub fn check_latex(input: &str) -> CheckResult {
    let mut result = CheckResult::new();
    let lines = checkable_lines(input);

    check_brace_balance(&lines, &mut result);
    check_environment_balance(&lines, &mut result);
    check_leftover_markdown(&lines, &mut result);

    result
}

/// Drop the bodies of verbatim-like environments and trailing `%` comments
fn checkable_lines(input: &str) -> Vec<CheckLine<'_>> {
    let mut lines = Vec::new();
    let mut verbatim: Option<&str> = None;

    for (index, raw) in input.lines().enumerate() {
        let number = index + 1;

        if let Some(env) = verbatim {
            let closes = END_ENV
                .captures(raw)
                .and_then(|c| c.get(1))
                .is_some_and(|m| m.as_str() == env);
            if closes {
                verbatim = None;
                lines.push(CheckLine { number, text: raw });
            }
            continue;
        }

        let text = strip_comment(raw);
        if let Some(name) = BEGIN_ENV.captures(text).and_then(|c| c.get(1)) {
            if let Some(env) = VERBATIM_ENVIRONMENTS.iter().find(|e| **e == name.as_str()) {
                verbatim = Some(*env);
            }
        }
        lines.push(CheckLine { number, text });
    }

    lines
}

/// Cut a line at its first unescaped `%`
fn strip_comment(line: &str) -> &str {
    let mut escaped = false;
    for (offset, c) in line.char_indices() {
        match c {
            '\\' => escaped = !escaped,
            '%' if !escaped => return &line[..offset],
            _ => escaped = false,
        }
    }
    line
}

/// Check for unbalanced braces
fn check_brace_balance(lines: &[CheckLine<'_>], result: &mut CheckResult) {
    let mut depth = 0i32;
    let mut last_open_line = 0;

    for line in lines {
        let mut escaped = false;
        for (offset, c) in line.text.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '{' => {
                    if depth == 0 {
                        last_open_line = line.number;
                    }
                    depth += 1;
                }
                '}' => {
                    depth -= 1;
                    if depth < 0 {
                        result.add(
                            Diagnostic::new(DiagnosticLevel::Error, "unmatched closing brace '}'")
                                .with_location(line.number, offset + 1)
                                .with_source(line.text)
                                .with_suggestion("Check for missing opening brace"),
                        );
                        depth = 0;
                    }
                }
                _ => {}
            }
        }
    }

    if depth > 0 {
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Error,
                format!(
                    "{} unclosed brace{} (opened around line {})",
                    depth,
                    if depth == 1 { "" } else { "s" },
                    last_open_line
                ),
            )
            .with_suggestion("Check for missing closing brace '}'"),
        );
    }
}

/// Check for unbalanced environments
fn check_environment_balance(lines: &[CheckLine<'_>], result: &mut CheckResult) {
    let mut env_stack: Vec<(String, usize)> = Vec::new();

    for line in lines {
        for caps in ENV_MARKER.captures_iter(line.text) {
            let (Some(marker), Some(name)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let env_name = name.as_str();
            let column = marker.start();

            if marker.as_str() == "begin" {
                env_stack.push((env_name.to_string(), line.number));
                continue;
            }

            match env_stack.pop() {
                Some((open_name, open_line)) if open_name != env_name => {
                    result.add(
                        Diagnostic::new(
                            DiagnosticLevel::Error,
                            format!(
                                "mismatched environment: opened '{}' at line {}, closed '{}' at line {}",
                                open_name, open_line, env_name, line.number
                            ),
                        )
                        .with_location(line.number, column)
                        .with_suggestion(format!("Use \\end{{{}}}", open_name)),
                    );
                }
                Some(_) => {}
                None => {
                    result.add(
                        Diagnostic::new(
                            DiagnosticLevel::Error,
                            format!("unmatched \\end{{{}}}", env_name),
                        )
                        .with_location(line.number, column)
                        .with_suggestion("Check for missing \\begin"),
                    );
                }
            }
        }
    }

    // Report unclosed environments
    for (env_name, line) in env_stack {
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Error,
                format!(
                    "unclosed environment '{}' (opened at line {})",
                    env_name, line
                ),
            )
            .with_suggestion(format!("Add \\end{{{}}}", env_name)),
        );
    }
}

/// Flag `**` that made it into the output
fn check_leftover_markdown(lines: &[CheckLine<'_>], result: &mut CheckResult) {
    for line in lines {
        if let Some(m) = STRAY_BOLD.find(line.text) {
            result.add(
                Diagnostic::new(DiagnosticLevel::Info, "literal '**' in output")
                    .with_location(line.number, m.start() + 1)
                    .with_source(line.text)
                    .with_suggestion("Check the source for an unmatched bold delimiter"),
            );
        }
    }
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m",   // Red
                DiagnosticLevel::Warning => "\x1b[33m", // Yellow
                DiagnosticLevel::Info => "\x1b[34m",    // Blue
            };
            output.push_str(color);
            output.push_str(&format!("{}", diag));
            output.push_str("\x1b[0m\n\n");
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    // Summary
    if use_color {
        if result.has_errors() {
            output.push_str("\x1b[31m");
        } else if result.warnings > 0 {
            output.push_str("\x1b[33m");
        } else {
            output.push_str("\x1b[32m");
        }
    }

    output.push_str(&format!("Summary: {}", result.summary()));

    if use_color {
        output.push_str("\x1b[0m");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_braces() {
        let result = check_latex(r"\textbf{a \textit{b}}");
        assert!(!result.has_errors(), "Should pass for balanced braces");
    }

    #[test]
    fn test_unbalanced_braces() {
        let result = check_latex(r"\textbf{a");
        assert!(result.has_errors(), "Should fail for unbalanced braces");
    }

    #[test]
    fn test_escaped_braces_ignored() {
        let result = check_latex(r"\{ only an opening brace and \textbackslash{}");
        assert!(result.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_comment_ignored() {
        let result = check_latex("texto % {\n50\\% {}");
        assert!(result.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_balanced_environments() {
        let result = check_latex("\\begin{itemize}\n\\item a\n\\end{itemize}");
        assert!(
            !result.has_errors(),
            "Should pass for balanced environments"
        );
    }

    #[test]
    fn test_unclosed_environment() {
        let result = check_latex("\\begin{quote}\nx");
        assert!(result.has_errors(), "Should fail for unclosed environment");
        assert!(result.diagnostics[0].message.contains("quote"));
    }

    #[test]
    fn test_mismatched_environments() {
        let result = check_latex("\\begin{itemize}\n\\end{enumerate}");
        assert!(
            result.has_errors(),
            "Should fail for mismatched environments"
        );
    }

    #[test]
    fn test_unmatched_end() {
        let result = check_latex("\\end{table}");
        assert_eq!(result.errors, 1);
        assert_eq!(result.diagnostics[0].line, Some(1));
    }

    #[test]
    fn test_two_environments_on_one_line() {
        let result = check_latex(r"\begin{center}\begin{tabular}{|l|}\end{tabular}\end{center}");
        assert!(result.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_verbatim_body_skipped() {
        let result = check_latex("\\begin{minted}{rust}\nfn main() { \\begin{x}\n\\end{minted}");
        assert!(result.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_stray_bold_is_a_note() {
        let result = check_latex("texto **suelto");
        assert!(!result.has_errors());
        assert_eq!(result.infos, 1);
    }

    #[test]
    fn test_summary_format() {
        let mut result = CheckResult::new();
        result.add(Diagnostic::new(DiagnosticLevel::Error, "test"));
        result.add(Diagnostic::new(DiagnosticLevel::Warning, "test"));

        let summary = result.summary();
        assert!(summary.contains("1 error"));
        assert!(summary.contains("1 warning"));
        assert_eq!(CheckResult::new().summary(), "no issues found");
    }

    #[test]
    fn test_format_diagnostics_plain() {
        let result = check_latex("\\begin{quote}");
        let text = format_diagnostics(&result, false);
        assert!(text.starts_with("error: unclosed environment 'quote'"));
        assert!(text.ends_with("Summary: 1 error"));
    }
}
