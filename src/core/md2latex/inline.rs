//! Inline span formatting: code, bold, italic and LaTeX escaping
//!
//! Spans are swapped out for sentinel tokens before the surrounding text is
//! escaped, then restored newest-first so that a span captured inside another
//! span's text is resolved after its container has been written back.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::core::md2latex::utils::escape_latex_text;
use crate::data::symbols::apply_symbol_replacements;

lazy_static! {
    static ref CODE_SPAN: Regex = Regex::new(r"`([^`]*)`").unwrap();
    static ref BOLD_SPAN: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
    static ref ITALIC_SPAN: Regex = Regex::new(r"\*([^*]+)\*").unwrap();
}

/// Sentinel delimiters (Unicode private use area, never escaped)
const SENTINEL_OPEN: char = '\u{E000}';
const SENTINEL_CLOSE: char = '\u{E001}';

/// Kind of protected inline span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Code,
    Bold,
    Italic,
}

impl SpanKind {
    /// LaTeX command wrapping the span
    pub fn command(&self) -> &'static str {
        match self {
            SpanKind::Code => "texttt",
            SpanKind::Bold => "textbf",
            SpanKind::Italic => "textit",
        }
    }
}

/// Spans protected during one `format` call, in creation order
#[derive(Debug, Default)]
struct Placeholders {
    spans: IndexMap<String, (String, SpanKind)>,
}

impl Placeholders {
    fn insert(&mut self, inner: String, kind: SpanKind) -> String {
        let token = format!("{}{}{}", SENTINEL_OPEN, self.spans.len(), SENTINEL_CLOSE);
        self.spans.insert(token.clone(), (inner, kind));
        token
    }
}

/// Formats inline Markdown into escaped LaTeX
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineFormatter {
    /// Replace checkboxes and emoji after escaping
    pub replace_symbols: bool,
}

impl InlineFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbols(replace_symbols: bool) -> Self {
        InlineFormatter { replace_symbols }
    }

    /// Escape plain text (no emphasis), applying symbol replacement if enabled
    pub fn escape(&self, text: &str) -> String {
        let escaped = escape_latex_text(text);
        if self.replace_symbols {
            apply_symbol_replacements(&escaped)
        } else {
            escaped
        }
    }

    /// Format one line or cell of inline Markdown
    pub fn format(&self, text: &str) -> String {
        let mut placeholders = Placeholders::default();

        // Sentinels already present in the input would collide with real tokens
        let text: String = text
            .chars()
            .filter(|c| *c != SENTINEL_OPEN && *c != SENTINEL_CLOSE)
            .collect();

        let text = protect(&text, &CODE_SPAN, SpanKind::Code, &mut placeholders);
        let text = protect(&text, &BOLD_SPAN, SpanKind::Bold, &mut placeholders);
        let text = protect(&text, &ITALIC_SPAN, SpanKind::Italic, &mut placeholders);

        let mut result = self.escape(&text);

        for (token, (inner, kind)) in placeholders.spans.iter().rev() {
            let body = match kind {
                SpanKind::Code => escape_latex_text(inner),
                SpanKind::Bold | SpanKind::Italic => self.escape(inner),
            };
            let markup = format!("\\{}{{{}}}", kind.command(), body);
            result = result.replacen(token.as_str(), &markup, 1);
        }

        result
    }
}

/// Replace every match of `pattern` with a fresh sentinel, repeating until the
/// text stops changing.
///
/// Italic spans inside a bold span are protected before the bold token is
/// created, keeping creation order innermost-first.
fn protect(
    text: &str,
    pattern: &Regex,
    kind: SpanKind,
    placeholders: &mut Placeholders,
) -> String {
    let mut current = text.to_string();
    loop {
        if !pattern.is_match(&current) {
            return current;
        }

        let mut next = String::with_capacity(current.len());
        let mut last = 0;
        for caps in pattern.captures_iter(&current) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            next.push_str(&current[last..whole.start()]);

            let inner = match kind {
                SpanKind::Bold => {
                    protect(inner.as_str(), &ITALIC_SPAN, SpanKind::Italic, placeholders)
                }
                SpanKind::Code | SpanKind::Italic => inner.as_str().to_string(),
            };
            next.push_str(&placeholders.insert(inner, kind));
            last = whole.end();
        }
        next.push_str(&current[last..]);

        if next == current {
            return current;
        }
        current = next;
    }
}

/// Format inline Markdown with default settings
pub fn format_inline(text: &str) -> String {
    InlineFormatter::new().format(text)
}
