use regex::Regex;
use rustpython_ast::TextSize;
use std::path::Path;

/// A utility struct to convert byte offsets to line numbers.
///
/// The AST parser works with byte offsets, but violations are reported with
/// 1-based line numbers.
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a `TextSize` (byte offset) to a 1-indexed line number.
    pub fn line_index(&self, offset: TextSize) -> usize {
        let offset = offset.to_usize();
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }
}

lazy_static::lazy_static! {
    // Files in test/tests directories, or named test_*.py / *_test.py.
    static ref TEST_FILE_RE: Regex =
        Regex::new(r"(?:^|[/\\])tests?[/\\]|(?:^|[/\\])test_[^/\\]*\.py$|_test\.py$").unwrap();
}

/// Returns true if the path looks like a Python test file.
///
/// The default scan only analyzes test files since that is where mocking
/// discipline applies; `--all` widens the scan to every `.py` file.
pub fn is_test_file(path: &Path) -> bool {
    TEST_FILE_RE.is_match(&path.to_string_lossy())
}
