//! Integration tests for mdlatex chapter conversion

use pretty_assertions::assert_eq;

use mdlatex::{
    convert_lines, diagnostics::check_latex, format_inline, markdown_to_latex,
    markdown_to_latex_with_diagnostics, markdown_to_latex_with_options, CodeEnvironment,
    M2LOptions, TableLayoutRule, TableStyle, WarningKind,
};

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

// ============================================================================
// Inline Formatting
// ============================================================================

mod inline {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text_identity() {
        for text in ["Hola mundo", "Capítulo 3: introducción", "a, b; c. (d)"] {
            assert_eq!(format_inline(text), text);
        }
    }

    #[test]
    fn test_each_special_char_escaped_once() {
        let cases = [
            ("\\", "\\textbackslash{}"),
            ("&", "\\&"),
            ("%", "\\%"),
            ("$", "\\$"),
            ("#", "\\#"),
            ("_", "\\_"),
            ("{", "\\{"),
            ("}", "\\}"),
            ("~", "\\textasciitilde{}"),
            ("^", "\\textasciicircum{}"),
        ];
        for (raw, escaped) in cases {
            let out = format_inline(&format!("a{}b", raw));
            assert_eq!(out, format!("a{}b", escaped), "escaping {:?}", raw);
        }
    }

    #[test]
    fn test_wrappers() {
        assert_eq!(format_inline("**x**"), "\\textbf{x}");
        assert_eq!(format_inline("*x*"), "\\textit{x}");
        assert_eq!(format_inline("`a_b`"), "\\texttt{a\\_b}");
    }

    #[test]
    fn test_nested_emphasis_no_sentinel_leak() {
        let out = format_inline("**a *b* c**");
        assert_eq!(out, "\\textbf{a \\textit{b} c}");
        assert!(!out.contains('\u{E000}'));
        assert!(!out.contains('\u{E001}'));
    }

    #[test]
    fn test_non_greedy_bold() {
        assert_eq!(
            format_inline("**a** y **b**"),
            "\\textbf{a} y \\textbf{b}"
        );
    }

    #[test]
    fn test_lone_delimiters_stay_literal() {
        assert_eq!(format_inline("2 ** 3"), "2 ** 3");
        assert_eq!(format_inline("a ` b"), "a ` b");
    }
}

// ============================================================================
// Block Structure
// ============================================================================

mod blocks {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_end_to_end_title_scenario() {
        let out = markdown_to_latex("# Title\n\n* one\n* two\n\nText & more.\n");
        assert_eq!(
            out,
            "\\chapter{Title}\n\
             \n\
             \\begin{itemize}\n\
             \\item one\n\
             \\item two\n\
             \n\
             \\end{itemize}\n\
             Text \\& more."
        );
        assert_eq!(count(&out, "\\chapter{Title}"), 1);
        assert_eq!(count(&out, "\\begin{itemize}"), 1);
        assert_eq!(count(&out, "\\item"), 2);
    }

    #[test]
    fn test_bullets_with_blank_lines_share_environment() {
        let input = "* a\n\n* b\n\n\n* c\n* d";
        let out = markdown_to_latex(input);
        assert_eq!(count(&out, "\\begin{itemize}"), 1);
        assert_eq!(count(&out, "\\end{itemize}"), 1);
        assert_eq!(count(&out, "\\item "), 4);
    }

    #[test]
    fn test_input_ending_in_list_is_balanced() {
        for input in ["* a\n* b", "1. a\n2. b\n", "> x\n> y", "```\ncode"] {
            let out = markdown_to_latex(input);
            assert_eq!(
                count(&out, "\\begin{"),
                count(&out, "\\end{"),
                "unbalanced output for {:?}:\n{}",
                input,
                out
            );
            assert!(!check_latex(&out).has_errors());
        }
    }

    #[test]
    fn test_numbered_then_bullet_switch() {
        let out = markdown_to_latex("1. uno\n2. dos\n- tres");
        assert_eq!(
            out,
            "\\begin{enumerate}\n\
             \\item uno\n\
             \\item dos\n\
             \\end{enumerate}\n\
             \\begin{itemize}\n\
             \\item tres\n\
             \\end{itemize}"
        );
    }

    #[test]
    fn test_heading_closes_quote() {
        let out = markdown_to_latex("> cita\n## Sección");
        assert_eq!(out, "\\begin{quote}\ncita\n\\end{quote}\n\\section{Sección}");
    }

    #[test]
    fn test_code_block_passthrough() {
        let input = "Antes\n```python\ndef f(x):  # 100% _raw_\n    return {x}\n```\nDespués";
        let out = markdown_to_latex(input);
        assert_eq!(
            out,
            "Antes\n\
             \\begin{minted}{python}\n\
             def f(x):  # 100% _raw_\n    return {x}\n\
             \\end{minted}\n\
             Después"
        );
    }

    #[test]
    fn test_convert_lines_matches_string_api() {
        let lines = ["# A", "", "texto"];
        let joined = convert_lines(&lines, &M2LOptions::default()).join("\n");
        assert_eq!(joined, markdown_to_latex(&lines.join("\n")));
    }
}

// ============================================================================
// Tables and Captions
// ============================================================================

mod tables {
    use super::*;
    use pretty_assertions::assert_eq;

    const TABLE: &str = "| Nombre | Rol | Horas |\n\
                         |---|:---:|---:|\n\
                         | Ana | Dev | 10 |\n\
                         | Luis | QA |\n\
                         | Eva | PM | 5 | extra |";

    #[test]
    fn test_rows_normalized_to_header_width() {
        let report = markdown_to_latex_with_diagnostics(TABLE, &M2LOptions::default());
        let rows: Vec<&str> = report
            .output
            .lines()
            .filter(|l| l.ends_with("\\\\"))
            .collect();
        assert_eq!(rows.len(), 4);
        for row in &rows {
            assert_eq!(row.matches(" & ").count(), 2, "row {:?}", row);
        }
        assert_eq!(count(&report.output, "\\hline"), 5);

        let kinds: Vec<WarningKind> = report.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![WarningKind::CellCountMismatch, WarningKind::CellCountMismatch]
        );
        assert_eq!(report.warnings[0].line, Some(4));
        assert_eq!(report.warnings[1].line, Some(5));
    }

    #[test]
    fn test_caption_attaches_to_table() {
        let input = format!("> **[Tabla 2: Equipo]**\n{}", TABLE);
        let out = markdown_to_latex(&input);
        assert_eq!(count(&out, "\\begin{table}"), 1);
        assert!(out.contains("\\end{tabularx}\n\\caption{Equipo}\n\\label{tabla_2}\n\\end{table}"));
    }

    #[test]
    fn test_caption_before_heading_flushed_first() {
        let report = markdown_to_latex_with_diagnostics(
            "> **[Tabla: Pendiente]**\n# Capítulo",
            &M2LOptions::default(),
        );
        let out = &report.output;
        let float = out.find("\\begin{table}").unwrap();
        let heading = out.find("\\chapter{Capítulo}").unwrap();
        assert!(float < heading);
        assert!(out.contains("\\caption{Pendiente}"));
        assert_eq!(report.warnings[0].kind, WarningKind::OrphanedCaption);
    }

    #[test]
    fn test_quoted_table_rows() {
        let out = markdown_to_latex("> | a | b |\n> |---|---|\n> | 1 | 2 |");
        assert!(!out.contains("\\begin{quote}"));
        assert!(out.contains("1 & 2 \\\\"));
    }

    #[test]
    fn test_layout_rule_from_options() {
        let options = M2LOptions {
            table_rules: vec![TableLayoutRule::new(["nombre", "rol"], "|l|p{3cm}|r|")
                .with_caption("Equipo del proyecto", "tab:equipo")],
            ..Default::default()
        };
        let out = markdown_to_latex_with_options(TABLE, &options);
        assert!(out.contains("\\begin{tabular}{|l|p{3cm}|r|}"));
        assert!(out.contains("\\caption{Equipo del proyecto}\n\\label{tab:equipo}"));
    }

    #[test]
    fn test_caption_marker_beats_rule_caption() {
        let options = M2LOptions {
            table_rules: vec![TableLayoutRule::new(["nombre"], "|l|l|X|")
                .with_caption("De la regla", "tab:regla")],
            ..Default::default()
        };
        let input = format!("> **[Tabla: Del marcador]**\n{}", TABLE);
        let out = markdown_to_latex_with_options(&input, &options);
        assert!(out.contains("\\caption{Del marcador}"));
        assert!(!out.contains("De la regla"));
    }

    #[test]
    fn test_default_table_caption() {
        let options = M2LOptions {
            default_table_caption: Some("Tabla sin título".to_string()),
            table_style: TableStyle::Tabular,
            ..Default::default()
        };
        let out = markdown_to_latex_with_options("| a |\n|---|", &options);
        assert!(out.contains("\\begin{tabular}{|l|}"));
        assert!(out.contains("\\caption{Tabla sin título}"));
        assert!(!out.contains("\\label"));
    }

    #[test]
    fn test_single_row_table_passes_through() {
        let report =
            markdown_to_latex_with_diagnostics("| solo & sin escapar |", &M2LOptions::default());
        assert_eq!(report.output, "| solo & sin escapar |");
        assert_eq!(report.warnings[0].kind, WarningKind::MalformedTable);
    }
}

// ============================================================================
// Figures
// ============================================================================

mod figures {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_image_with_alt_caption() {
        let out = markdown_to_latex("![Arquitectura general](img/arq.png)");
        assert_eq!(
            out,
            "\\begin{figure}[H]\n\
             \\centering\n\
             \\includegraphics[width=0.8\\textwidth]{img/arq.png}\n\
             \\caption{Arquitectura general}\n\
             \\end{figure}"
        );
    }

    #[test]
    fn test_image_claims_figure_caption() {
        let out = markdown_to_latex("> **[Figura 1: Flujo de datos]**\n![](flujo.png)");
        assert_eq!(count(&out, "\\begin{figure}"), 1);
        assert!(out.contains("\\caption{Flujo de datos}\n\\label{figura_1}"));
    }

    #[test]
    fn test_figure_caption_without_image_is_placeholder() {
        let report = markdown_to_latex_with_diagnostics(
            "> **[Figure: Pipeline]**\nTexto siguiente",
            &M2LOptions::default(),
        );
        let out = &report.output;
        assert!(out.starts_with("\\begin{figure}[H]\n\\centering\n%"));
        assert!(out.ends_with("\\end{figure}\nTexto siguiente"));
        assert_eq!(report.warnings.len(), 1);
    }
}

// ============================================================================
// Options and Full Documents
// ============================================================================

mod options {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_listings_unknown_language() {
        let options = M2LOptions {
            code_environment: CodeEnvironment::Listings,
            ..Default::default()
        };
        let out = markdown_to_latex_with_options("```ts\nlet x = 1;\n```", &options);
        assert!(out.starts_with("\\begin{lstlisting}\n"));
    }

    #[test]
    fn test_full_document_round() {
        let options = M2LOptions {
            title: Some("Tesis".to_string()),
            author: Some("A. Pérez".to_string()),
            ..M2LOptions::full_document()
        };
        let out = markdown_to_latex_with_options("# Uno\n\n![x](a.png)", &options);
        assert!(out.starts_with("\\documentclass{book}\n"));
        assert!(out.contains("\\title{Tesis}\n\\author{A. Pérez}"));
        assert!(out.contains("\\maketitle"));
        assert!(!check_latex(&out).has_errors());
    }

    #[test]
    fn test_empty_float_placement() {
        let options = M2LOptions {
            float_placement: String::new(),
            ..Default::default()
        };
        let out = markdown_to_latex_with_options("| a |\n|---|", &options);
        assert!(out.starts_with("\\begin{table}\n"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_options_from_toml_drive_conversion() {
        let options = M2LOptions::from_toml_str(
            r#"
top_level = "section"
replace_symbols = true
"#,
        )
        .unwrap();
        let out = markdown_to_latex_with_options("# Estado ✅", &options);
        assert_eq!(out, "\\section{Estado \\checkmark{}}");
    }
}
