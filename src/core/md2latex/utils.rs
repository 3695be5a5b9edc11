//! Utility functions for Markdown to LaTeX conversion
//!
//! Helper functions for text escaping, label slugs and document wrapping.

use crate::data::symbols::LATEX_ESCAPES;

use super::context::{CodeEnvironment, M2LOptions};

/// Escape special LaTeX characters in text.
///
/// Single pass over the input: the output of one replacement is never
/// looked at again, so `\` → `\textbackslash{}` keeps its braces.
pub fn escape_latex_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 4);
    for ch in text.chars() {
        match LATEX_ESCAPES.get(&ch) {
            Some(escaped) => result.push_str(escaped),
            None => result.push(ch),
        }
    }
    result
}

/// Turn a caption kind word into a label slug: lower-cased, whitespace
/// collapsed to `_`, characters that break `\label` dropped.
pub fn slugify_label(kind: &str) -> String {
    let mut slug = String::with_capacity(kind.len());
    for word in kind.split_whitespace() {
        if !slug.is_empty() {
            slug.push('_');
        }
        slug.extend(
            word.chars()
                .flat_map(char::to_lowercase)
                .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | ':' | '_')),
        );
    }
    slug
}

/// Wrap a converted fragment in a complete LaTeX document
pub fn wrap_in_document(content: &str, options: &M2LOptions) -> String {
    let mut doc = String::new();

    // Document class
    let doc_class = if options.document_class.is_empty() {
        "book"
    } else {
        &options.document_class
    };
    doc.push_str(&format!("\\documentclass{{{}}}\n", doc_class));

    // Packages for the constructs the converter emits
    doc.push_str("\\usepackage[utf8]{inputenc}\n");
    doc.push_str("\\usepackage[T1]{fontenc}\n");
    doc.push_str("\\usepackage{graphicx}\n");
    doc.push_str("\\usepackage{tabularx}\n");
    doc.push_str("\\usepackage{float}\n"); // For [H] placement
    match options.code_environment {
        CodeEnvironment::Minted => doc.push_str("\\usepackage{minted}\n"),
        CodeEnvironment::Listings => doc.push_str("\\usepackage{listings}\n"),
        CodeEnvironment::Verbatim => {}
    }
    if options.replace_symbols {
        doc.push_str("\\usepackage{amssymb}\n"); // \checkmark
        doc.push_str("\\usepackage{fontawesome}\n");
    }
    doc.push_str("\\usepackage{hyperref}\n");

    // Title and author
    if let Some(ref title) = options.title {
        doc.push_str(&format!("\\title{{{}}}\n", escape_latex_text(title)));
    }
    if let Some(ref author) = options.author {
        doc.push_str(&format!("\\author{{{}}}\n", escape_latex_text(author)));
    }

    doc.push('\n');
    doc.push_str("\\begin{document}\n\n");

    // Include \maketitle if title is set
    if options.title.is_some() {
        doc.push_str("\\maketitle\n\n");
    }

    doc.push_str(content);

    doc.push_str("\n\n\\end{document}");

    doc
}
