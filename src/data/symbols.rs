//! Character-level data: LaTeX escapes and symbol replacements

use phf::phf_map;

/// LaTeX text-mode escapes for the ten special characters.
///
/// Looked up one character at a time, so no replacement is ever re-scanned.
pub static LATEX_ESCAPES: phf::Map<char, &'static str> = phf_map! {
    '\\' => "\\textbackslash{}",
    '&' => "\\&",
    '%' => "\\%",
    '$' => "\\$",
    '#' => "\\#",
    '_' => "\\_",
    '{' => "\\{",
    '}' => "\\}",
    '~' => "\\textasciitilde{}",
    '^' => "\\textasciicircum{}",
};

/// Replacements applied to already-escaped text when symbol replacement is
/// enabled. Order matters: entries carrying a variation selector come before
/// their bare form. Control words end in `{}` so following letters stay text.
pub static SYMBOL_REPLACEMENTS: &[(&str, &str)] = &[
    ("[x]", "\\textbf{[x]}"),
    ("[ ]", "\\textbf{[ ]}"),
    ("✅", "\\checkmark{}"),
    ("⚠️", "!"),
    ("⚠", "!"),
    ("🔒", "\\faLock{}"),
    ("🎓", "\\faGraduationCap{}"),
    ("🧠", "\\faBrain{}"),
    ("👶", "\\faChild{}"),
    ("🍼", "\\faChild{}"),
    ("⚖️", "\\faBalanceScale{}"),
    ("💼", "\\faBriefcase{}"),
    ("📚", "\\faBook{}"),
    ("🎭", "\\faExclamationTriangle{}"),
    ("🛠️", "\\faWrench{}"),
    ("📝", "\\faPencilSquareO{}"),
    ("🥊", "\\faGavel{}"),
    ("🧮", "\\faCalculator{}"),
];

/// Apply [`SYMBOL_REPLACEMENTS`] to escaped text.
pub fn apply_symbol_replacements(text: &str) -> String {
    let mut result = text.to_string();
    for (symbol, latex) in SYMBOL_REPLACEMENTS {
        if result.contains(symbol) {
            result = result.replace(symbol, latex);
        }
    }
    result
}
