//! File handling for Markdown → LaTeX conversion
//!
//! The converter core never touches the filesystem. This module owns reading
//! sources and writing results, behind the `FileResolver` trait so the same
//! code runs against the real filesystem (CLI) or an in-memory store (tests,
//! embedding).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::md2latex::{markdown_to_latex_with_diagnostics, ConversionReport, M2LOptions};
use crate::utils::error::{ConversionError, ConversionResult};

/// Extension recognised as Markdown input
pub const MARKDOWN_EXTENSION: &str = "md";

/// Extension given to generated files
pub const LATEX_EXTENSION: &str = "tex";

/// Trait for reading sources and writing results
///
/// Implementations:
/// - `StdFileResolver`: Uses std::fs for real file system access (CLI)
/// - `MemoryFileResolver`: In-memory file storage (testing)
pub trait FileResolver {
    /// Read a file's contents
    fn read_file(&self, path: &Path) -> ConversionResult<String>;

    /// Write a file, replacing any previous contents
    fn write_file(&mut self, path: &Path, content: &str) -> ConversionResult<()>;

    /// Check if a file exists
    fn file_exists(&self, path: &Path) -> bool;
}

/// Standard filesystem resolver (for CLI usage)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileResolver;

#[cfg(not(target_arch = "wasm32"))]
impl FileResolver for StdFileResolver {
    fn read_file(&self, path: &Path) -> ConversionResult<String> {
        std::fs::read_to_string(path).map_err(|e| ConversionError::IoError {
            message: format!("{}: {}", path.display(), e),
        })
    }

    fn write_file(&mut self, path: &Path, content: &str) -> ConversionResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| ConversionError::IoError {
            message: format!("{}: {}", path.display(), e),
        })
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// In-memory file resolver
#[derive(Debug, Default, Clone)]
pub struct MemoryFileResolver {
    files: HashMap<PathBuf, String>,
}

impl MemoryFileResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Contents of a stored file
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }
}

impl FileResolver for MemoryFileResolver {
    fn read_file(&self, path: &Path) -> ConversionResult<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ConversionError::IoError {
                message: format!("File not found: {}", path.display()),
            })
    }

    fn write_file(&mut self, path: &Path, content: &str) -> ConversionResult<()> {
        self.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}

/// Convert one Markdown file to a LaTeX file through a resolver
pub fn convert_file_with<R: FileResolver>(
    resolver: &mut R,
    input: &Path,
    output: &Path,
    options: &M2LOptions,
) -> ConversionResult<ConversionReport> {
    if input == output {
        return Err(ConversionError::invalid(format!(
            "refusing to overwrite the input file {}",
            input.display()
        )));
    }
    let source = resolver.read_file(input)?;
    let report = markdown_to_latex_with_diagnostics(&source, options);
    resolver.write_file(output, &report.output)?;
    Ok(report)
}

/// Convert one Markdown file to a LaTeX file on disk
#[cfg(not(target_arch = "wasm32"))]
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &M2LOptions,
) -> ConversionResult<ConversionReport> {
    convert_file_with(&mut StdFileResolver, input.as_ref(), output.as_ref(), options)
}

/// Check whether a path has the Markdown extension (case-insensitive)
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
}

/// Markdown files directly inside `dir`, sorted by path
#[cfg(not(target_arch = "wasm32"))]
pub fn markdown_files_in(dir: impl AsRef<Path>) -> ConversionResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(ConversionError::invalid(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_markdown_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Output path for `input` inside `out_dir`, with the `.tex` extension
pub fn output_path_for(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    out_dir.join(stem).with_extension(LATEX_EXTENSION)
}
