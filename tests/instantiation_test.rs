use mockbuster_rs::analyzer::detect_mocks;
use mockbuster_rs::violation::Category;

#[test]
fn test_all_four_class_names_bare() {
    for class_name in ["Mock", "MagicMock", "AsyncMock", "PropertyMock"] {
        let code = format!("def test_foo():\n    obj = {}()\n", class_name);
        let violations = detect_mocks(&code, true).unwrap();
        assert_eq!(violations.len(), 1, "expected one violation for {}", class_name);
        assert_eq!(violations[0].line, 2);
        assert_eq!(violations[0].category, Category::MockInstantiation);
        assert_eq!(violations[0].subject, class_name);
        assert!(violations[0]
            .message
            .starts_with(&format!("{}() instantiation detected", class_name)));
    }
}

#[test]
fn test_qualified_receivers_of_any_depth() {
    for callee in ["mock.Mock", "unittest.mock.Mock", "a.b.c.MagicMock"] {
        let code = format!("def test_foo():\n    obj = {}()\n", callee);
        let violations = detect_mocks(&code, true).unwrap();
        assert_eq!(violations.len(), 1, "expected one violation for {}", callee);
        assert_eq!(violations[0].line, 2);
        assert_eq!(violations[0].category, Category::MockInstantiation);
    }
}

#[test]
fn test_async_function_body() {
    let code = r#"
async def test_foo():
    mock = AsyncMock()
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 3);
    assert!(violations[0].message.contains("AsyncMock()"));
}

#[test]
fn test_user_defined_class_named_mock_still_matches() {
    // Intentionally unrepresentative: identifier-based matching does not
    // special-case a local class that happens to be named Mock.
    let code = r#"
class Mock:
    pass

def test_foo():
    obj = Mock()
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 6);
}

#[test]
fn test_aliased_from_import_resolves_to_mock_class() {
    let code = r#"
from unittest.mock import MagicMock as MM

def test_foo():
    obj = MM()
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 5);
    assert_eq!(violations[0].subject, "MagicMock");
}

#[test]
fn test_module_alias_does_not_match_as_bare_name() {
    // `um` names a module, not a class; only `um.Mock()` style is a match.
    let code = r#"
import unittest.mock as um

def test_foo():
    factory = um
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_call_in_nested_expression() {
    let code = r#"
def test_foo():
    payload = {"service": build(Mock(), retries=3)}
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 3);
}

#[test]
fn test_match_subject_guard_and_case_body_are_scanned() {
    let code = r#"
def test_foo(value):
    match build(MagicMock()):
        case "a":
            obj = Mock()
        case _ if check(AsyncMock()):
            pass
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 3);
    assert!(violations
        .iter()
        .all(|v| v.category == Category::MockInstantiation));
    let lines: Vec<usize> = violations.iter().map(|v| v.line).collect();
    assert_eq!(lines, vec![3, 5, 6]);
}

#[test]
fn test_raise_expression_is_scanned() {
    let code = r#"
def test_foo():
    raise RuntimeError(Mock())
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 3);
    assert_eq!(violations[0].subject, "Mock");
}

#[test]
fn test_attribute_reference_without_call_is_not_flagged() {
    let code = r#"
def test_foo():
    klass = unittest.mock.Mock
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_non_callable_variants_are_not_matched() {
    let code = r#"
def test_foo():
    a = NonCallableMock()
    b = NonCallableMagicMock()
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert!(violations.is_empty());
}
