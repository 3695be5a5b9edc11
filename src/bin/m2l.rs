//! mdlatex CLI - Markdown book chapters to LaTeX converter

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use mdlatex::{
    diagnostics::{check_latex, format_diagnostics},
    files::{markdown_files_in, output_path_for},
    markdown_to_latex_with_diagnostics, CliDiagnostic, CodeEnvironment, ConversionReport,
    M2LOptions, TableStyle, TopLevel,
};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::Path;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "m2l")]
#[command(version)]
#[command(about = "mdlatex - Markdown book chapters to LaTeX converter", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    #[command(flatten)]
    convert: ConvertArgs,

    /// Strict mode: exit with error if any conversion warnings occur
    #[arg(long)]
    strict: bool,

    /// Quiet mode: suppress warning output to stderr
    #[arg(short, long)]
    quiet: bool,

    /// Embed warnings as `%` comments at the end of the output
    #[arg(long)]
    embed_warnings: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

/// Options shared by every converting command
#[cfg(feature = "cli")]
#[derive(Args, Clone)]
struct ConvertArgs {
    /// Load conversion options from a TOML file (flags below override it)
    #[arg(short, long)]
    config: Option<String>,

    /// Wrap the output in a complete LaTeX document
    #[arg(short = 'f', long)]
    full_document: bool,

    /// Division produced by `#` headings
    #[arg(long, value_enum)]
    top_level: Option<TopLevelArg>,

    /// Environment for fenced code blocks
    #[arg(long, value_enum)]
    code: Option<CodeArg>,

    /// Tabular family for tables without a matching layout rule
    #[arg(long, value_enum)]
    table: Option<TableArg>,

    /// Replace checkboxes and emoji with LaTeX commands
    #[arg(long)]
    symbols: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Convert, then check the generated LaTeX for structural problems
    Check {
        /// Input file to check
        input: Option<String>,

        #[command(flatten)]
        convert: ConvertArgs,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Batch convert every Markdown file in a directory
    Batch {
        /// Input directory
        input: String,

        /// Output directory
        #[arg(short, long)]
        output_dir: String,

        #[command(flatten)]
        convert: ConvertArgs,
    },

    /// Show version and feature info
    Info,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum TopLevelArg {
    /// `#` → `\chapter`
    Chapter,
    /// `#` → `\section`
    Section,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum CodeArg {
    Minted,
    Verbatim,
    Listings,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum TableArg {
    Tabularx,
    Tabular,
}

#[cfg(feature = "cli")]
impl ConvertArgs {
    /// Resolve options: config file first, then command-line overrides
    fn to_options(&self) -> M2LOptions {
        let mut options = match self.config {
            Some(ref path) => match M2LOptions::load(path) {
                Ok(options) => options,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(2);
                }
            },
            None => M2LOptions::default(),
        };

        if self.full_document {
            options.full_document = true;
        }
        if let Some(top_level) = self.top_level {
            options.top_level = match top_level {
                TopLevelArg::Chapter => TopLevel::Chapter,
                TopLevelArg::Section => TopLevel::Section,
            };
        }
        if let Some(code) = self.code {
            options.code_environment = match code {
                CodeArg::Minted => CodeEnvironment::Minted,
                CodeArg::Verbatim => CodeEnvironment::Verbatim,
                CodeArg::Listings => CodeEnvironment::Listings,
            };
        }
        if let Some(table) = self.table {
            options.table_style = match table {
                TableArg::Tabularx => TableStyle::Tabularx,
                TableArg::Tabular => TableStyle::Tabular,
            };
        }
        if self.symbols {
            options.replace_symbols = true;
        }
        options
    }
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();

    // Handle subcommands first
    if let Some(cmd) = cli.command {
        return handle_subcommand(cmd);
    }

    let input = read_input(cli.input_file.as_deref())?;
    let options = cli.convert.to_options();
    let use_color = !cli.no_color;

    // Convert with diagnostics - collect warnings as CliDiagnostic
    let report = markdown_to_latex_with_diagnostics(&input, &options);
    let diagnostics = collect_diagnostics(&report);

    // Print diagnostics to stderr (unless quiet mode)
    if !cli.quiet && !diagnostics.is_empty() {
        print_diagnostics_to_stderr(&diagnostics, use_color);
    }

    // Check strict mode
    if cli.strict && !diagnostics.is_empty() {
        eprintln!(
            "Error: {} conversion warning(s) in strict mode",
            diagnostics.len()
        );
        std::process::exit(1);
    }

    // Embed diagnostics as comments if requested
    let result = if cli.embed_warnings && !diagnostics.is_empty() {
        embed_diagnostics_as_comments(&report.output, &diagnostics)
    } else {
        report.output
    };

    // Output
    match cli.output {
        Some(path) => {
            if cli.input_file.as_deref() == Some(path.as_str()) {
                eprintln!("Error: output path is the same as the input path: {}", path);
                std::process::exit(2);
            }
            let mut file = fs::File::create(&path)?;
            writeln!(file, "{}", result)?;
            if diagnostics.is_empty() {
                eprintln!("✓ Output written to: {}", path);
            } else {
                eprintln!(
                    "⚠ Output written to: {} ({} warning(s))",
                    path,
                    diagnostics.len()
                );
            }
        }
        None => {
            println!("{}", result);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn handle_subcommand(cmd: Commands) -> io::Result<()> {
    match cmd {
        Commands::Check {
            input,
            convert,
            no_color,
        } => {
            let content = read_input(input.as_deref())?;
            let report = markdown_to_latex_with_diagnostics(&content, &convert.to_options());

            let diagnostics = collect_diagnostics(&report);
            if !diagnostics.is_empty() {
                print_diagnostics_to_stderr(&diagnostics, !no_color);
            }

            let result = check_latex(&report.output);
            let output = format_diagnostics(&result, !no_color);
            println!("{}", output);

            if result.has_errors() {
                std::process::exit(1);
            }
        }

        Commands::Batch {
            input,
            output_dir,
            convert,
        } => {
            let options = convert.to_options();
            let out_dir = Path::new(&output_dir);
            fs::create_dir_all(out_dir)?;

            let files = match markdown_files_in(&input) {
                Ok(files) => files,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(2);
                }
            };

            let mut success_count = 0;
            let mut error_count = 0;
            let mut warning_count = 0;

            for file_path in files {
                let output_path = output_path_for(&file_path, out_dir);

                match mdlatex::convert_file(&file_path, &output_path, &options) {
                    Ok(report) => {
                        if report.has_warnings() {
                            eprintln!(
                                "⚠ {} ({} warning(s))",
                                output_path.display(),
                                report.warnings.len()
                            );
                            for warning in &report.warnings {
                                eprintln!("    {}", warning);
                            }
                            warning_count += report.warnings.len();
                        } else {
                            eprintln!("✓ {}", output_path.display());
                        }
                        success_count += 1;
                    }
                    Err(e) => {
                        eprintln!("✗ {} - {}", file_path.display(), e);
                        error_count += 1;
                    }
                }
            }

            eprintln!(
                "\nBatch conversion complete: {} succeeded, {} failed, {} warning(s)",
                success_count, error_count, warning_count
            );

            if error_count > 0 {
                std::process::exit(1);
            }
        }

        Commands::Info => {
            println!("mdlatex - Markdown book chapters to LaTeX converter");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Features:");
            println!("  ✓ Headings → \\chapter … \\paragraph (or \\section …)");
            println!("  ✓ Bullet/numbered lists, quotes, code listings");
            println!("  ✓ Pipe tables → table + tabularx/tabular floats");
            println!("  ✓ Figure/table caption markers with labels");
            println!("  ✓ Batch file processing");
            println!("  ✓ LaTeX output checking");
            println!();
            println!("Code environments: minted, verbatim, lstlisting");
            println!();
        }
    }

    Ok(())
}

/// Read a file, or stdin when no path is given
#[cfg(feature = "cli")]
fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(feature = "cli")]
fn collect_diagnostics(report: &ConversionReport) -> Vec<CliDiagnostic> {
    report
        .warnings
        .iter()
        .cloned()
        .map(CliDiagnostic::from)
        .collect()
}

/// Print diagnostics to stderr with optional color coding.
#[cfg(feature = "cli")]
fn print_diagnostics_to_stderr(diagnostics: &[CliDiagnostic], use_color: bool) {
    eprintln!();
    eprintln!(
        "{}Conversion Warnings ({}):{}",
        if use_color { "\x1b[33m" } else { "" },
        diagnostics.len(),
        if use_color { "\x1b[0m" } else { "" }
    );
    eprintln!();

    for diag in diagnostics {
        let color = if use_color { diag.color_code() } else { "" };
        let reset = if use_color { "\x1b[0m" } else { "" };

        if let Some(ref loc) = diag.location {
            eprintln!(
                "  {}[{}]{} {}: {}",
                color, diag.kind, reset, loc, diag.message
            );
        } else {
            eprintln!("  {}[{}]{} {}", color, diag.kind, reset, diag.message);
        }
    }
    eprintln!();
}

/// Embed diagnostics as LaTeX comments at the end of the output.
#[cfg(feature = "cli")]
fn embed_diagnostics_as_comments(output: &str, diagnostics: &[CliDiagnostic]) -> String {
    let mut result = output.to_string();
    result.push_str("\n\n% ═══════════════════════════════════════════════════════════════\n");
    result.push_str("% Conversion Warnings\n");
    result.push_str("% ═══════════════════════════════════════════════════════════════\n");

    for diag in diagnostics {
        result.push_str(&format!("% {}\n", diag));
    }

    result
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install mdlatex --features cli");
    eprintln!("  m2l [OPTIONS] [INPUT_FILE]");
}
