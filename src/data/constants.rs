//! Constants and mapping tables for Markdown to LaTeX conversion
//!
//! - Sectioning commands per heading level
//! - Language mappings for fenced code blocks (minted / listings names)

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::core::md2latex::context::TopLevel;

// ============================================================================
// Sectioning Commands
// ============================================================================

/// Heading levels 1..=5 when the top-level division is a chapter (book class)
pub const TOP_CHAPTER_LEVELS: [&str; 5] = [
    "chapter",
    "section",
    "subsection",
    "subsubsection",
    "paragraph",
];

/// Heading levels 1..=5 when the top-level division is a section (article class)
pub const TOP_SECTION_LEVELS: [&str; 5] = [
    "section",
    "subsection",
    "subsubsection",
    "paragraph",
    "subparagraph",
];

/// Get the sectioning command name for a Markdown heading level.
///
/// Levels deeper than five clamp to the lowest division.
pub fn sectioning_command(level: usize, top_level: TopLevel) -> &'static str {
    let table = match top_level {
        TopLevel::Chapter => &TOP_CHAPTER_LEVELS,
        TopLevel::Section => &TOP_SECTION_LEVELS,
    };
    let index = level.clamp(1, table.len()) - 1;
    table[index]
}

// ============================================================================
// Language Mappings for Code Environments
// ============================================================================

lazy_static! {
    /// Fence info-string aliases mapped to the lexer names understood by
    /// minted (Pygments). Unknown tags pass through lower-cased.
    pub static ref LANGUAGE_MAP: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();

        m.insert("py", "python");
        m.insert("python3", "python");
        m.insert("rs", "rust");
        m.insert("js", "javascript");
        m.insert("mjs", "javascript");
        m.insert("jsx", "jsx");
        m.insert("ts", "typescript");
        m.insert("tsx", "tsx");
        m.insert("sh", "bash");
        m.insert("shell", "bash");
        m.insert("zsh", "bash");
        m.insert("console", "console");
        m.insert("ps", "powershell");
        m.insert("ps1", "powershell");
        m.insert("yml", "yaml");
        m.insert("md", "markdown");
        m.insert("htm", "html");
        m.insert("c++", "cpp");
        m.insert("cxx", "cpp");
        m.insert("cs", "csharp");
        m.insert("c#", "csharp");
        m.insert("kt", "kotlin");
        m.insert("rb", "ruby");
        m.insert("golang", "go");
        m.insert("tex", "latex");
        m.insert("plaintext", "text");
        m.insert("txt", "text");

        m
    };

    /// Lexer names mapped to the language names of the listings package.
    /// Languages listings does not know map to `None`.
    pub static ref LISTINGS_LANGUAGE_MAP: HashMap<&'static str, Option<&'static str>> = {
        let mut m = HashMap::new();

        m.insert("python", Some("Python"));
        m.insert("java", Some("Java"));
        m.insert("c", Some("C"));
        m.insert("cpp", Some("C++"));
        m.insert("bash", Some("bash"));
        m.insert("sql", Some("SQL"));
        m.insert("html", Some("HTML"));
        m.insert("xml", Some("XML"));
        m.insert("ruby", Some("Ruby"));
        m.insert("go", Some("Go"));
        m.insert("latex", Some("TeX"));
        m.insert("javascript", None);
        m.insert("typescript", None);
        m.insert("rust", None);
        m.insert("json", None);
        m.insert("yaml", None);
        m.insert("text", None);

        m
    };
}

/// Normalize a fence info string to a minted lexer name.
pub fn normalize_code_language(tag: &str) -> String {
    let lower = tag.trim().to_lowercase();
    match LANGUAGE_MAP.get(lower.as_str()) {
        Some(name) => (*name).to_string(),
        None => lower,
    }
}

/// Get the listings language for a normalized lexer name, if listings has one.
pub fn listings_language(lexer: &str) -> Option<&'static str> {
    LISTINGS_LANGUAGE_MAP.get(lexer).copied().flatten()
}
