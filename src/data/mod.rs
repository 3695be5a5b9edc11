//! Data layer - Static mappings and constants
//!
//! This module contains all static data used for Markdown → LaTeX conversion:
//! - LaTeX special character escapes
//! - Sectioning command tables
//! - Code language mappings for listing environments
//! - Symbol replacements (checkboxes, emoji)

pub mod constants;
pub mod symbols;

// Re-export commonly used items
pub use constants::{
    listings_language, normalize_code_language, sectioning_command, LANGUAGE_MAP,
    TOP_CHAPTER_LEVELS, TOP_SECTION_LEVELS,
};
pub use symbols::{apply_symbol_replacements, LATEX_ESCAPES, SYMBOL_REPLACEMENTS};
