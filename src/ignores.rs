use crate::utils::LineIndex;
use regex::Regex;
use rustpython_parser::{lexer, Mode, Tok};
use std::collections::HashSet;

lazy_static::lazy_static! {
    // `mockbuster`, a colon, then the word `ignore`; case-insensitive, with
    // flexible whitespace around the colon. `\b` rejects `ignoreme`.
    static ref MARKER_RE: Regex = Regex::new(r"(?i)mockbuster\s*:\s*ignore\b").unwrap();
}

/// The set of lines suppressed by `# mockbuster: ignore` comments.
///
/// Built fresh for every `detect_mocks` call from the lexer's comment trivia,
/// so marker-shaped text inside string literals never counts. Two forms:
///
/// - a trailing comment on a code line suppresses that line;
/// - a comment on its own line suppresses the comment line and the nearest
///   following line holding a code token, skipping blank lines and further
///   comment-only lines. This covers multi-line statements whose anchor is
///   their first physical line (e.g. a parenthesized import).
pub struct IgnoreRegistry {
    lines: HashSet<usize>,
}

impl IgnoreRegistry {
    /// Scans the source's comment trivia and builds the suppressed-line set.
    ///
    /// Lexical errors (e.g. an unterminated bracket at EOF) end the scan
    /// gracefully; whatever was collected up to that point is kept.
    pub fn from_source(source: &str) -> Self {
        let line_index = LineIndex::new(source);
        let mut lines = HashSet::new();

        let mut last_code_line: Option<usize> = None;
        let mut pending_standalone = false;

        for result in lexer::lex(source, Mode::Module) {
            let Ok((tok, range)) = result else {
                break;
            };
            let line = line_index.line_index(range.start());
            match &tok {
                Tok::Comment(text) => {
                    if MARKER_RE.is_match(text) {
                        lines.insert(line);
                        // Standalone if no code preceded it on its own line.
                        if last_code_line != Some(line) {
                            pending_standalone = true;
                        }
                    }
                }
                Tok::Newline
                | Tok::NonLogicalNewline
                | Tok::Indent
                | Tok::Dedent
                | Tok::EndOfFile => {}
                _ => {
                    last_code_line = Some(line);
                    if pending_standalone {
                        lines.insert(line);
                        pending_standalone = false;
                    }
                }
            }
        }

        Self { lines }
    }

    /// The single query the registry exposes: is this line suppressed?
    pub fn is_suppressed(&self, line: usize) -> bool {
        self.lines.contains(&line)
    }

    /// Number of suppressed lines, mostly useful for diagnostics and tests.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when no marker was found.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_line_marker() {
        let registry =
            IgnoreRegistry::from_source("from unittest.mock import Mock  # mockbuster: ignore");
        assert!(registry.is_suppressed(1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_standalone_marker_covers_next_code_line() {
        let registry =
            IgnoreRegistry::from_source("# mockbuster: ignore\nfrom unittest.mock import Mock\n");
        assert!(registry.is_suppressed(1));
        assert!(registry.is_suppressed(2));
    }

    #[test]
    fn test_marker_inside_string_is_not_a_comment() {
        let source = "x = \"# mockbuster: ignore\"\ny = '''\n# mockbuster: ignore\n'''\n";
        let registry = IgnoreRegistry::from_source(source);
        assert!(registry.is_empty());
    }
}
