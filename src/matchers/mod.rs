/// Mock-family instantiation matcher (`Mock()`, `mock.MagicMock()`, ...).
pub mod instantiation;

/// Patch-family matcher: decorators, `with` items, and qualified calls.
pub mod patch;

/// Fixture matchers for the pytest `mocker` and `monkeypatch` parameters.
pub mod fixtures;

use crate::resolver::ImportResolver;
use crate::utils::LineIndex;
use crate::violation::Violation;
use rustpython_ast::Stmt;

/// Runs every matcher over the module body and collects their raw matches.
///
/// Each matcher is an independent pass over the same tree; none of them sees
/// another's output. The caller (the aggregator) applies suppression and the
/// final ordering.
pub fn run_all(
    body: &[Stmt],
    resolver: &ImportResolver,
    line_index: &LineIndex,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut instantiation =
        instantiation::InstantiationMatcher::new(resolver, line_index);
    for stmt in body {
        instantiation.visit_stmt(stmt);
    }
    violations.extend(instantiation.findings);

    let mut patch = patch::PatchMatcher::new(line_index);
    for stmt in body {
        patch.visit_stmt(stmt);
    }
    violations.extend(patch.findings);

    let mut mocker = fixtures::FixtureMatcher::mocker(line_index);
    for stmt in body {
        mocker.visit_stmt(stmt);
    }
    violations.extend(mocker.findings);

    let mut monkeypatch = fixtures::FixtureMatcher::monkeypatch(line_index);
    for stmt in body {
        monkeypatch.visit_stmt(stmt);
    }
    violations.extend(monkeypatch.findings);

    violations
}
