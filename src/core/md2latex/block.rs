//! Line-oriented block conversion
//!
//! Each input line is classified on its own by [`classify_line`]; the
//! [`BlockConverter`] then applies the transition for that line kind against
//! the open-block state held in its [`ConvertContext`].
//!
//! | line kind      | closes first          | effect                                  |
//! |----------------|-----------------------|-----------------------------------------|
//! | table row      | list, quote           | buffered until the first non-table line |
//! | heading        | list, quote, caption  | sectioning command                      |
//! | list item      | quote, other list     | opens list if needed, `\item`           |
//! | quote          | list, caption         | opens `quote` if needed                 |
//! | caption marker | list, quote, caption  | becomes the pending caption             |
//! | code fence     | list, quote, caption  | raw passthrough until the closing fence |
//! | image          | list, quote           | `figure`, claims a figure caption       |
//! | blank          | quote                 | blank line, lists stay open             |
//! | paragraph      | list, quote, caption  | formatted text                          |

use lazy_static::lazy_static;
use regex::Regex;

use super::context::{
    CaptionKind, CaptionMarker, CodeEnvironment, ConvertContext, ListStyle, M2LOptions, OpenBlock,
};
use super::inline::InlineFormatter;
use super::table::{choose_layout, render_table, FloatCaption, MarkdownTable};
use super::utils::slugify_label;
use super::{ConversionWarning, WarningKind};
use crate::data::constants::{listings_language, normalize_code_language, sectioning_command};

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"^(#+)\s+(.*)$").unwrap();
    static ref BULLET_ITEM: Regex = Regex::new(r"^\s*[*-]\s+(.*)$").unwrap();
    static ref NUMBERED_ITEM: Regex = Regex::new(r"^\s*\d+\.\s+(.*)$").unwrap();
    static ref CAPTION_MARKER: Regex =
        Regex::new(r"^\*\*\[((?:Figura|Tabla|Figure|Table)[^:\]]*):\s*(.*?)\]\*\*").unwrap();
    static ref IMAGE: Regex =
        Regex::new(r#"^!\[([^\]]*)\]\(\s*([^)\s]+)(?:\s+"[^"]*")?\s*\)$"#).unwrap();
}

const CODE_FENCE: &str = "```";

/// Classification of a single input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    CodeFence {
        language: Option<&'a str>,
    },
    /// Pipe row, with any quote prefix already stripped
    TableRow(&'a str),
    Heading {
        level: usize,
        text: &'a str,
    },
    ListItem {
        style: ListStyle,
        text: &'a str,
    },
    Caption {
        kind: CaptionKind,
        kind_word: &'a str,
        text: &'a str,
    },
    /// Quote content after the `>` marker
    Quote(&'a str),
    Image {
        alt: &'a str,
        path: &'a str,
    },
    Paragraph(&'a str),
}

/// Check whether a line opens or closes a code fence
pub fn is_fence_line(line: &str) -> bool {
    line.trim_start().starts_with(CODE_FENCE)
}

/// Classify a line outside of any code fence
pub fn classify_line(line: &str) -> LineKind<'_> {
    let raw = line.trim_end_matches(['\r', '\n']);
    let line = line.trim_end();
    let trimmed = line.trim_start();

    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    if let Some(rest) = trimmed.strip_prefix(CODE_FENCE) {
        let language = rest.trim_matches('`').trim();
        return LineKind::CodeFence {
            language: (!language.is_empty()).then_some(language),
        };
    }

    if trimmed.starts_with('|') {
        return LineKind::TableRow(trimmed);
    }

    if trimmed.starts_with('>') {
        let content = trimmed.trim_start_matches(['>', ' ', '\t']).trim();
        if content.starts_with('|') {
            return LineKind::TableRow(content);
        }
        if let Some(caps) = CAPTION_MARKER.captures(content) {
            if let (Some(kind_word), Some(text)) = (caps.get(1), caps.get(2)) {
                let kind = if kind_word.as_str().starts_with("Fig") {
                    CaptionKind::Figure
                } else {
                    CaptionKind::Table
                };
                return LineKind::Caption {
                    kind,
                    kind_word: kind_word.as_str().trim(),
                    text: text.as_str().trim(),
                };
            }
        }
        return LineKind::Quote(content);
    }

    // Matched before trailing whitespace is lost so `# ` stays a heading
    if let Some(caps) = HEADING.captures(raw) {
        if let (Some(marks), Some(text)) = (caps.get(1), caps.get(2)) {
            return LineKind::Heading {
                level: marks.as_str().len(),
                text: text.as_str().trim(),
            };
        }
    }

    if let Some(text) = BULLET_ITEM.captures(line).and_then(|c| c.get(1)) {
        return LineKind::ListItem {
            style: ListStyle::Bullet,
            text: text.as_str(),
        };
    }

    if let Some(text) = NUMBERED_ITEM.captures(line).and_then(|c| c.get(1)) {
        return LineKind::ListItem {
            style: ListStyle::Numbered,
            text: text.as_str(),
        };
    }

    if let Some(caps) = IMAGE.captures(trimmed) {
        if let (Some(alt), Some(path)) = (caps.get(1), caps.get(2)) {
            return LineKind::Image {
                alt: alt.as_str().trim(),
                path: path.as_str(),
            };
        }
    }

    LineKind::Paragraph(line)
}

/// Single-pass Markdown → LaTeX block converter
pub struct BlockConverter {
    ctx: ConvertContext,
    formatter: InlineFormatter,
}

impl BlockConverter {
    pub fn new(options: M2LOptions) -> Self {
        let formatter = InlineFormatter::with_symbols(options.replace_symbols);
        BlockConverter {
            ctx: ConvertContext::new(options),
            formatter,
        }
    }

    /// Convert a whole document
    pub fn convert<S: AsRef<str>>(
        lines: &[S],
        options: &M2LOptions,
    ) -> (Vec<String>, Vec<ConversionWarning>) {
        let mut converter = BlockConverter::new(options.clone());
        for line in lines {
            converter.push_line(line.as_ref());
        }
        converter.finish()
    }

    /// Current converter state
    pub fn context(&self) -> &ConvertContext {
        &self.ctx
    }

    /// Feed one input line
    pub fn push_line(&mut self, line: &str) {
        self.ctx.line_number += 1;
        let line = line.trim_end_matches(['\r', '\n']);

        if self.ctx.in_code_fence() {
            if is_fence_line(line) {
                self.ctx.close_code_fence();
            } else {
                self.ctx.emit(line);
            }
            return;
        }

        match classify_line(line) {
            LineKind::TableRow(row) => self.push_table_row(row),
            kind => {
                self.flush_table();
                self.apply(kind);
            }
        }
    }

    /// Force-close everything still open and return the output.
    ///
    /// Order: buffered table (with its caption), leftover caption, list or
    /// quote, unterminated code fence.
    pub fn finish(mut self) -> (Vec<String>, Vec<ConversionWarning>) {
        self.flush_table();
        self.flush_caption();
        self.ctx.close_list();
        self.ctx.close_quote();
        if let OpenBlock::CodeFence { line, .. } = self.ctx.open {
            self.ctx.warn_at(
                WarningKind::UnterminatedCodeFence,
                "code block is never closed; closed at end of input",
                line,
            );
            self.ctx.close_code_fence();
        }
        self.ctx.finish()
    }

    fn apply(&mut self, kind: LineKind<'_>) {
        match kind {
            LineKind::Blank => {
                self.ctx.close_quote();
                self.ctx.emit("");
            }
            LineKind::CodeFence { language } => {
                self.flush_caption();
                self.ctx.close_open_block();
                self.open_code_fence(language);
            }
            LineKind::Heading { level, text } => {
                self.flush_caption();
                self.ctx.close_open_block();
                if text.is_empty() {
                    self.ctx.warn(WarningKind::EmptyHeading, "heading has no text");
                }
                let command = sectioning_command(level, self.ctx.options.top_level);
                let text = self.formatter.escape(text);
                self.ctx.emit(format!("\\{}{{{}}}", command, text));
            }
            LineKind::ListItem { style, text } => {
                self.flush_caption();
                self.open_list(style);
                let item = self.formatter.format(text);
                self.ctx.emit(format!("\\item {}", item));
            }
            LineKind::Caption {
                kind,
                kind_word,
                text,
            } => {
                self.ctx.close_open_block();
                self.flush_caption();
                self.ctx.pending_caption = Some(CaptionMarker {
                    kind,
                    label: slugify_label(kind_word),
                    text: text.to_string(),
                    line: self.ctx.line_number,
                });
            }
            LineKind::Quote(content) => {
                if content.is_empty() {
                    // Bare `>`: paragraph break inside an open quote, else ends a list
                    if self.ctx.in_quote() {
                        self.ctx.emit("");
                    } else {
                        self.ctx.close_open_block();
                    }
                    return;
                }
                self.flush_caption();
                if !self.ctx.in_quote() {
                    self.ctx.close_open_block();
                    self.ctx.emit("\\begin{quote}");
                    self.ctx.open = OpenBlock::Quote;
                }
                let text = self.formatter.format(content);
                self.ctx.emit(text);
            }
            LineKind::Image { alt, path } => {
                self.ctx.close_open_block();
                self.emit_figure(alt, path);
            }
            LineKind::Paragraph(text) => {
                self.flush_caption();
                self.ctx.close_open_block();
                let text = self.formatter.format(text);
                self.ctx.emit(text);
            }
            LineKind::TableRow(row) => self.push_table_row(row),
        }
    }

    fn open_list(&mut self, style: ListStyle) {
        match self.ctx.open {
            OpenBlock::List(current) if current == style => return,
            _ => self.ctx.close_open_block(),
        }
        self.ctx.emit(format!("\\begin{{{}}}", style.env_name()));
        self.ctx.open = OpenBlock::List(style);
    }

    fn open_code_fence(&mut self, language: Option<&str>) {
        let language = match language {
            Some(tag) => normalize_code_language(tag),
            None => self.ctx.options.default_code_language.clone(),
        };
        let begin = match self.ctx.options.code_environment {
            CodeEnvironment::Minted => format!("\\begin{{minted}}{{{}}}", language),
            CodeEnvironment::Verbatim => "\\begin{verbatim}".to_string(),
            CodeEnvironment::Listings => match listings_language(&language) {
                Some(name) => format!("\\begin{{lstlisting}}[language={}]", name),
                None => "\\begin{lstlisting}".to_string(),
            },
        };
        self.ctx.emit(begin);
        self.ctx.open = OpenBlock::CodeFence {
            language: Some(language),
            line: self.ctx.line_number,
        };
    }

    fn push_table_row(&mut self, row: &str) {
        self.ctx.close_list();
        self.ctx.close_quote();
        if self.ctx.table_buffer.is_empty() {
            self.ctx.table_start_line = self.ctx.line_number;
            if matches!(self.ctx.pending_caption, Some(ref c) if c.kind == CaptionKind::Figure) {
                self.flush_caption();
            }
        }
        self.ctx.table_buffer.push(row.to_string());
    }

    fn flush_table(&mut self) {
        if self.ctx.table_buffer.is_empty() {
            return;
        }
        let rows = std::mem::take(&mut self.ctx.table_buffer);
        let start = self.ctx.table_start_line;

        let Some(table) = MarkdownTable::parse(&rows) else {
            self.ctx.warn_at(
                WarningKind::MalformedTable,
                "table has no separator row; passed through unchanged",
                start,
            );
            for row in rows {
                self.ctx.emit(row);
            }
            return;
        };

        if !table.has_separator {
            self.ctx.warn_at(
                WarningKind::MalformedTable,
                "second table row is not a separator row; discarded anyway",
                start + 1,
            );
        }
        for mismatch in &table.mismatches {
            let message = format!(
                "row has {} cells but the header has {}; padded or truncated",
                mismatch.found,
                table.col_count()
            );
            self.ctx
                .warn_at(WarningKind::CellCountMismatch, message, start + mismatch.line_index);
        }

        let layout = choose_layout(&table, &self.ctx.options);
        let caption = match self.take_caption(CaptionKind::Table) {
            Some(marker) => Some(FloatCaption::new(marker.text, Some(marker.label))),
            None => layout
                .caption
                .clone()
                .map(|text| FloatCaption::new(text, layout.label.clone()))
                .or_else(|| {
                    self.ctx
                        .options
                        .default_table_caption
                        .clone()
                        .map(|text| FloatCaption::new(text, None))
                }),
        };
        if let Some(label) = caption.as_ref().and_then(|c| c.label.as_deref()) {
            self.ctx.register_label(label, start);
        }

        let lines = render_table(
            &table,
            &layout,
            caption.as_ref(),
            &self.formatter,
            &self.ctx.options,
        );
        self.ctx.output.extend(lines);
    }

    /// Take the pending caption if it targets `kind`
    fn take_caption(&mut self, kind: CaptionKind) -> Option<CaptionMarker> {
        match self.ctx.pending_caption {
            Some(ref marker) if marker.kind == kind => self.ctx.pending_caption.take(),
            _ => None,
        }
    }

    /// Emit a pending caption as its own float around an empty placeholder
    fn flush_caption(&mut self) {
        let Some(marker) = self.ctx.pending_caption.take() else {
            return;
        };
        let env = marker.kind.env_name();
        self.ctx.warn_at(
            WarningKind::OrphanedCaption,
            format!(
                "{} caption \"{}\" is not followed by a {}; emitted on its own",
                env, marker.text, env
            ),
            marker.line,
        );
        self.ctx.register_label(&marker.label, marker.line);

        let caption = FloatCaption::new(marker.text, Some(marker.label));
        let placement = self.ctx.options.placement_suffix();
        self.ctx.emit(format!("\\begin{{{}}}{}", env, placement));
        self.ctx.emit("\\centering");
        self.ctx.emit("% placeholder: no content followed this caption");
        self.ctx.output.extend(caption.render(&self.formatter));
        self.ctx.emit(format!("\\end{{{}}}", env));
    }

    fn emit_figure(&mut self, alt: &str, path: &str) {
        // A table caption cannot describe a figure
        if matches!(self.ctx.pending_caption, Some(ref c) if c.kind == CaptionKind::Table) {
            self.flush_caption();
        }
        let caption = match self.take_caption(CaptionKind::Figure) {
            Some(marker) => {
                self.ctx.register_label(&marker.label, marker.line);
                Some(FloatCaption::new(marker.text, Some(marker.label)))
            }
            None => (!alt.is_empty()).then(|| FloatCaption::new(alt, None)),
        };

        let placement = self.ctx.options.placement_suffix();
        self.ctx.emit(format!("\\begin{{figure}}{}", placement));
        self.ctx.emit("\\centering");
        self.ctx
            .emit(format!("\\includegraphics[width=0.8\\textwidth]{{{}}}", path));
        if let Some(caption) = caption {
            self.ctx.output.extend(caption.render(&self.formatter));
        }
        self.ctx.emit("\\end{figure}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_heading() {
        assert_eq!(
            classify_line("## Alcance"),
            LineKind::Heading {
                level: 2,
                text: "Alcance"
            }
        );
        assert_eq!(classify_line("#hashtag"), LineKind::Paragraph("#hashtag"));
        assert_eq!(classify_line("# "), LineKind::Heading { level: 1, text: "" });
        assert_eq!(classify_line("#"), LineKind::Paragraph("#"));
    }

    #[test]
    fn test_classify_list_items() {
        assert_eq!(
            classify_line("* one"),
            LineKind::ListItem {
                style: ListStyle::Bullet,
                text: "one"
            }
        );
        assert_eq!(
            classify_line("  - two"),
            LineKind::ListItem {
                style: ListStyle::Bullet,
                text: "two"
            }
        );
        assert_eq!(
            classify_line("12. twelve"),
            LineKind::ListItem {
                style: ListStyle::Numbered,
                text: "twelve"
            }
        );
        // Bold at line start is not a bullet
        assert_eq!(
            classify_line("**Nota:** texto"),
            LineKind::Paragraph("**Nota:** texto")
        );
    }

    #[test]
    fn test_classify_table_rows() {
        assert_eq!(classify_line("| a | b |"), LineKind::TableRow("| a | b |"));
        assert_eq!(classify_line("> | a | b |"), LineKind::TableRow("| a | b |"));
    }

    #[test]
    fn test_classify_caption_marker() {
        assert_eq!(
            classify_line("> **[Figura: Arquitectura general]**"),
            LineKind::Caption {
                kind: CaptionKind::Figure,
                kind_word: "Figura",
                text: "Arquitectura general"
            }
        );
        assert_eq!(
            classify_line("> **[Tabla 3: Costos]**"),
            LineKind::Caption {
                kind: CaptionKind::Table,
                kind_word: "Tabla 3",
                text: "Costos"
            }
        );
        assert_eq!(
            classify_line("> **[Tabla: Costos]** (fuente)"),
            LineKind::Caption {
                kind: CaptionKind::Table,
                kind_word: "Tabla",
                text: "Costos"
            }
        );
        // Not a caption: falls back to quote text
        assert_eq!(
            classify_line("> **[Nota: algo]**"),
            LineKind::Quote("**[Nota: algo]**")
        );
    }

    #[test]
    fn test_classify_code_fence_and_image() {
        assert_eq!(
            classify_line("```python"),
            LineKind::CodeFence {
                language: Some("python")
            }
        );
        assert_eq!(classify_line("```"), LineKind::CodeFence { language: None });
        assert_eq!(
            classify_line("![Diagrama](img/diagrama.png)"),
            LineKind::Image {
                alt: "Diagrama",
                path: "img/diagrama.png"
            }
        );
    }

    #[test]
    fn test_classify_blank_and_quote() {
        assert_eq!(classify_line("   "), LineKind::Blank);
        assert_eq!(classify_line("> cita"), LineKind::Quote("cita"));
        assert_eq!(classify_line(">"), LineKind::Quote(""));
    }

    fn convert(input: &str) -> (Vec<String>, Vec<ConversionWarning>) {
        let lines: Vec<&str> = input.lines().collect();
        BlockConverter::convert(&lines, &M2LOptions::default())
    }

    #[test]
    fn test_list_style_switch_is_immediate() {
        let (out, _) = convert("* a\n1. b\n- c");
        assert_eq!(
            out,
            vec![
                "\\begin{itemize}",
                "\\item a",
                "\\end{itemize}",
                "\\begin{enumerate}",
                "\\item b",
                "\\end{enumerate}",
                "\\begin{itemize}",
                "\\item c",
                "\\end{itemize}",
            ]
        );
    }

    #[test]
    fn test_blank_line_keeps_list_open() {
        let (out, _) = convert("* a\n\n* b");
        assert_eq!(
            out,
            vec!["\\begin{itemize}", "\\item a", "", "\\item b", "\\end{itemize}"]
        );
    }

    #[test]
    fn test_quote_lines_share_one_environment() {
        let (out, _) = convert("> uno\n> dos\nfin");
        assert_eq!(
            out,
            vec!["\\begin{quote}", "uno", "dos", "\\end{quote}", "fin"]
        );
    }

    #[test]
    fn test_blank_line_closes_quote() {
        let (out, _) = convert("> uno\n\n> dos");
        assert_eq!(
            out,
            vec![
                "\\begin{quote}",
                "uno",
                "\\end{quote}",
                "",
                "\\begin{quote}",
                "dos",
                "\\end{quote}",
            ]
        );
    }

    #[test]
    fn test_code_fence_is_verbatim() {
        let (out, warnings) = convert("```rust\nlet x = a_b & c; // **no**\n```");
        assert_eq!(
            out,
            vec![
                "\\begin{minted}{rust}",
                "let x = a_b & c; // **no**",
                "\\end{minted}",
            ]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_code_fence_closes_list() {
        let (out, _) = convert("* a\n```\nx\n```");
        assert_eq!(
            out,
            vec![
                "\\begin{itemize}",
                "\\item a",
                "\\end{itemize}",
                "\\begin{minted}{text}",
                "x",
                "\\end{minted}",
            ]
        );
    }

    #[test]
    fn test_unterminated_code_fence_closed_at_end() {
        let (out, warnings) = convert("```\nx");
        assert_eq!(out.last().map(String::as_str), Some("\\end{minted}"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::UnterminatedCodeFence);
        assert_eq!(warnings[0].line, Some(1));
    }

    #[test]
    fn test_caption_then_heading_flushes_first() {
        let (out, warnings) = convert("> **[Figura: Flujo]**\n# Siguiente");
        assert_eq!(
            out,
            vec![
                "\\begin{figure}[H]",
                "\\centering",
                "% placeholder: no content followed this caption",
                "\\caption{Flujo}",
                "\\label{figura}",
                "\\end{figure}",
                "\\chapter{Siguiente}",
            ]
        );
        assert_eq!(warnings[0].kind, WarningKind::OrphanedCaption);
    }

    #[test]
    fn test_figure_caption_claimed_by_image() {
        let (out, warnings) = convert("> **[Figura: Flujo]**\n\n![alt](flujo.png)");
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(
            out,
            vec![
                "",
                "\\begin{figure}[H]",
                "\\centering",
                "\\includegraphics[width=0.8\\textwidth]{flujo.png}",
                "\\caption{Flujo}",
                "\\label{figura}",
                "\\end{figure}",
            ]
        );
    }

    #[test]
    fn test_table_caption_not_claimed_by_image() {
        let (out, warnings) = convert("> **[Tabla: Costos]**\n![](x.png)");
        assert_eq!(out[0], "\\begin{table}[H]");
        assert!(out.contains(&"\\begin{figure}[H]".to_string()));
        assert!(!out.iter().any(|l| l.starts_with("\\caption{}")));
        assert_eq!(warnings[0].kind, WarningKind::OrphanedCaption);
    }

    #[test]
    fn test_malformed_table_passes_through() {
        let (out, warnings) = convert("| solo |\ntexto");
        assert_eq!(out, vec!["| solo |", "texto"]);
        assert_eq!(warnings[0].kind, WarningKind::MalformedTable);
    }

    #[test]
    fn test_heading_escapes_without_emphasis() {
        let (out, _) = convert("### Costos & **beneficios** 100%");
        assert_eq!(
            out,
            vec!["\\subsection{Costos \\& **beneficios** 100\\%}"]
        );
    }

    #[test]
    fn test_deep_heading_clamps() {
        let (out, _) = convert("###### Muy profundo");
        assert_eq!(out, vec!["\\paragraph{Muy profundo}"]);
    }

    #[test]
    fn test_empty_heading_warns() {
        let (out, warnings) = convert("# \n#");
        assert_eq!(out, vec!["\\chapter{}", "\\#"]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::EmptyHeading);
        assert_eq!(warnings[0].line, Some(1));
    }

    #[test]
    fn test_caption_marker_ignores_trailing_text() {
        let (out, warnings) =
            convert("> **[Tabla: Costos]** (fuente)\n| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert!(!out.contains(&"\\begin{quote}".to_string()));
        assert!(out.contains(&"\\caption{Costos}".to_string()));
        assert!(out.contains(&"\\label{tabla}".to_string()));
    }

    #[test]
    fn test_bare_quote_marker_closes_list() {
        let (out, _) = convert("* a\n>\n* b");
        assert_eq!(
            out,
            vec![
                "\\begin{itemize}",
                "\\item a",
                "\\end{itemize}",
                "\\begin{itemize}",
                "\\item b",
                "\\end{itemize}",
            ]
        );
    }

    #[test]
    fn test_paragraph_closes_list() {
        let (out, _) = convert("* a\nTexto");
        assert_eq!(
            out,
            vec!["\\begin{itemize}", "\\item a", "\\end{itemize}", "Texto"]
        );
    }

    #[test]
    fn test_state_after_push_line() {
        let mut converter = BlockConverter::new(M2LOptions::default());
        converter.push_line("1. uno");
        assert_eq!(
            converter.context().open,
            OpenBlock::List(ListStyle::Numbered)
        );
        converter.push_line("| a |");
        assert_eq!(converter.context().open, OpenBlock::None);
        assert_eq!(converter.context().table_buffer.len(), 1);
    }
}
