use mockbuster_rs::analyzer::detect_mocks;
use mockbuster_rs::violation::Category;

#[test]
fn test_mocker_declared_and_referenced() {
    let code = r#"
def test_foo(mocker):
    mocker.patch('something')
"#;
    let violations = detect_mocks(code, true).unwrap();
    // One fixture violation on the def line, plus the mocker.patch() call.
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].line, 2);
    assert_eq!(violations[0].category, Category::MockerFixture);
    assert!(violations[0].message.contains("mocker"));
    assert_eq!(violations[1].line, 3);
    assert_eq!(violations[1].category, Category::PatchCall);
}

#[test]
fn test_mocker_declared_but_unused_is_not_flagged() {
    let code = r#"
def test_foo(mocker):
    assert 1 + 1 == 2
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_many_uses_still_one_fixture_violation() {
    let code = r#"
def test_foo(mocker):
    mocker.resetall()
    mocker.stopall()
    mocker.resetall()
"#;
    let violations = detect_mocks(code, true).unwrap();
    let fixture_count = violations
        .iter()
        .filter(|v| v.category == Category::MockerFixture)
        .count();
    assert_eq!(fixture_count, 1);
    assert_eq!(violations[0].line, 2);
}

#[test]
fn test_monkeypatch_fixture() {
    let code = r#"
def test_foo(monkeypatch):
    monkeypatch.setattr(module, "func", fake_func)
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 2);
    assert_eq!(violations[0].category, Category::MonkeypatchFixture);
    assert!(violations[0].message.contains("monkeypatch"));
}

#[test]
fn test_monkeypatch_among_other_fixtures() {
    let code = r#"
def test_foo(monkeypatch, tmp_path):
    monkeypatch.setenv("VAR", "value")
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].category, Category::MonkeypatchFixture);
}

#[test]
fn test_both_fixtures_yield_two_violations_on_def_line() {
    let code = r#"
def test_foo(mocker, monkeypatch):
    mocker.stopall()
    monkeypatch.setenv("VAR", "value")
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 2);
    assert!(violations.iter().all(|v| v.line == 2));
    assert_eq!(violations[0].category, Category::MockerFixture);
    assert_eq!(violations[1].category, Category::MonkeypatchFixture);
}

#[test]
fn test_fixture_anchor_is_def_line_not_use_site() {
    let code = r#"
def test_foo(monkeypatch):
    x = 1
    y = 2
    monkeypatch.setenv("VAR", "value")
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 2);
}

#[test]
fn test_keyword_only_parameter_counts() {
    let code = r#"
def test_foo(*, mocker):
    mocker.stopall()
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].category, Category::MockerFixture);
}

#[test]
fn test_direct_call_counts_as_reference() {
    let code = r#"
def test_foo(mocker):
    mocker()
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].category, Category::MockerFixture);
}

#[test]
fn test_bare_mention_is_not_a_reference() {
    let code = r#"
def test_foo(mocker):
    helper(mocker)
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_async_test_function() {
    let code = r#"
async def test_foo(mocker):
    mocker.stopall()
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 2);
}

#[test]
fn test_method_inside_test_class() {
    let code = r#"
class TestSuite:
    def test_foo(self, mocker):
        mocker.stopall()
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 3);
}

#[test]
fn test_use_inside_match_case_counts() {
    let code = r#"
def test_foo(monkeypatch, value):
    match value:
        case "a":
            monkeypatch.setenv("VAR", "1")
        case _:
            pass
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 2);
    assert_eq!(violations[0].category, Category::MonkeypatchFixture);
}

#[test]
fn test_use_inside_try_star_counts() {
    let code = r#"
def test_foo(monkeypatch):
    try:
        monkeypatch.setenv("VAR", "1")
    except* ValueError:
        pass
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 2);
}

#[test]
fn test_use_inside_nested_block_counts() {
    let code = r#"
def test_foo(monkeypatch):
    if True:
        monkeypatch.setenv("VAR", "value")
"#;
    let violations = detect_mocks(code, true).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 2);
}
