use crate::ignores::IgnoreRegistry;
use crate::matchers;
use crate::resolver::ImportResolver;
use crate::utils::{is_test_file, LineIndex};
use crate::violation::Violation;
use anyhow::Result;
use rayon::prelude::*;
use rustpython_parser::{parse, Mode};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Raised when the source text cannot be parsed as Python.
///
/// The engine never returns a partial violation list for unparseable input;
/// the caller decides whether to skip the file or abort.
#[derive(Debug, thiserror::Error)]
#[error("failed to parse Python source: {0}")]
pub struct ParseError(#[from] rustpython_parser::ParseError);

/// Detects mock usage in a single Python source text.
///
/// This is the core entry point: a pure function of the source text and the
/// suppression-mode flag. It parses once, runs the import resolver, the five
/// matchers, and (unless `respect_ignores` is false) the ignore registry over
/// the same tree, then returns the surviving violations ordered by line
/// number, with same-line ties broken by category order and then by
/// first-seen-in-tree order.
pub fn detect_mocks(
    source: &str,
    respect_ignores: bool,
) -> std::result::Result<Vec<Violation>, ParseError> {
    let tree = parse(source, Mode::Module, "<source>")?;

    let rustpython_ast::Mod::Module(module) = &tree else {
        return Ok(Vec::new());
    };

    let line_index = LineIndex::new(source);
    let resolver = ImportResolver::from_module(&module.body);
    let mut violations = matchers::run_all(&module.body, &resolver, &line_index);

    if respect_ignores {
        let ignores = IgnoreRegistry::from_source(source);
        violations.retain(|v| !ignores.is_suppressed(v.line));
    }

    // Stable sort: within one (line, category) pair, tree order survives.
    violations.sort_by_key(|v| (v.line, v.category));

    Ok(violations)
}

/// Per-file result of a directory scan.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// The analyzed file.
    pub file: PathBuf,
    /// Violations found in the file, in engine order.
    pub violations: Vec<Violation>,
    /// Set when the file could not be read or parsed; such a file
    /// contributes no violations.
    pub error: Option<String>,
}

/// Summary statistics for a directory scan.
#[derive(Debug, Serialize)]
pub struct AnalysisSummary {
    /// Total number of files analyzed.
    pub total_files: usize,
    /// Files with at least one violation.
    pub files_with_violations: usize,
    /// Total violation count across all files.
    pub violation_count: usize,
    /// Files skipped because they failed to read or parse.
    pub skipped_files: usize,
}

/// Result of scanning a path, serialized to JSON if requested.
#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    /// One report per analyzed file, sorted by path.
    pub reports: Vec<FileReport>,
    /// Aggregate counts.
    pub analysis_summary: AnalysisSummary,
}

impl AnalysisResult {
    /// Total violation count across all files.
    pub fn violation_count(&self) -> usize {
        self.analysis_summary.violation_count
    }
}

/// The multi-file scanner: a thin shell that walks a path, runs the engine
/// on each file, and aggregates the reports.
pub struct MockBuster {
    /// Whether `# mockbuster: ignore` markers are honored.
    pub respect_ignores: bool,
    /// Analyze every `.py` file instead of just test files.
    pub include_all: bool,
}

impl MockBuster {
    /// Creates a new `MockBuster` scanner with the given configuration.
    pub fn new(respect_ignores: bool, include_all: bool) -> Self {
        Self {
            respect_ignores,
            include_all,
        }
    }

    /// Scans `path` (a file or a directory tree) for mock usage.
    ///
    /// Files are analyzed in parallel; the engine itself is pure and holds no
    /// shared state, so cross-file ordering is irrelevant and the reports are
    /// sorted by path afterwards for deterministic output. A file that fails
    /// to read or parse is recorded with its error and skipped.
    pub fn analyze(&self, path: &Path) -> Result<AnalysisResult> {
        let files: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "py"))
            .filter(|e| self.include_all || is_test_file(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        let mut reports: Vec<FileReport> = files
            .par_iter()
            .map(|file| {
                let source = match fs::read_to_string(file) {
                    Ok(source) => source,
                    Err(err) => {
                        return FileReport {
                            file: file.clone(),
                            violations: Vec::new(),
                            error: Some(err.to_string()),
                        }
                    }
                };
                match detect_mocks(&source, self.respect_ignores) {
                    Ok(violations) => FileReport {
                        file: file.clone(),
                        violations,
                        error: None,
                    },
                    Err(err) => FileReport {
                        file: file.clone(),
                        violations: Vec::new(),
                        error: Some(err.to_string()),
                    },
                }
            })
            .collect();

        reports.sort_by(|a, b| a.file.cmp(&b.file));

        let total_files = reports.len();
        let files_with_violations = reports
            .iter()
            .filter(|r| !r.violations.is_empty())
            .count();
        let violation_count = reports.iter().map(|r| r.violations.len()).sum();
        let skipped_files = reports.iter().filter(|r| r.error.is_some()).count();

        Ok(AnalysisResult {
            reports,
            analysis_summary: AnalysisSummary {
                total_files,
                files_with_violations,
                violation_count,
                skipped_files,
            },
        })
    }
}
