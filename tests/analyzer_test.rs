use mockbuster_rs::analyzer::MockBuster;
use std::fs::File;
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_analyze_reports_violations_per_file() {
    let dir = tempdir().unwrap();

    let mocked = dir.path().join("test_mocked.py");
    let mut file = File::create(&mocked).unwrap();
    write!(
        file,
        "{}",
        r#"
from unittest.mock import Mock

def test_foo():
    obj = Mock()
"#
    )
    .unwrap();

    let clean = dir.path().join("test_clean.py");
    let mut file = File::create(&clean).unwrap();
    write!(
        file,
        "{}",
        r#"
def test_bar():
    assert 1 + 1 == 2
"#
    )
    .unwrap();

    let buster = MockBuster::new(true, false);
    let result = buster.analyze(dir.path()).unwrap();

    assert_eq!(result.analysis_summary.total_files, 2);
    assert_eq!(result.analysis_summary.violation_count, 1);
    assert_eq!(result.analysis_summary.files_with_violations, 1);
    assert_eq!(result.analysis_summary.skipped_files, 0);

    let mocked_report = result
        .reports
        .iter()
        .find(|r| r.file.ends_with("test_mocked.py"))
        .unwrap();
    assert_eq!(mocked_report.violations.len(), 1);
    assert_eq!(mocked_report.violations[0].line, 5);
}

#[test]
fn test_analyze_skips_non_test_files_by_default() {
    let dir = tempdir().unwrap();

    let app = dir.path().join("app.py");
    let mut file = File::create(&app).unwrap();
    write!(file, "from unittest.mock import Mock\nobj = Mock()\n").unwrap();

    let buster = MockBuster::new(true, false);
    let result = buster.analyze(dir.path()).unwrap();
    assert_eq!(result.analysis_summary.total_files, 0);

    let buster = MockBuster::new(true, true);
    let result = buster.analyze(dir.path()).unwrap();
    assert_eq!(result.analysis_summary.total_files, 1);
    assert_eq!(result.analysis_summary.violation_count, 1);
}

#[test]
fn test_analyze_respects_ignore_markers() {
    let dir = tempdir().unwrap();

    let path = dir.path().join("test_ignored.py");
    let mut file = File::create(&path).unwrap();
    write!(
        file,
        "{}",
        r#"
def test_foo():
    obj = Mock()  # mockbuster: ignore
    other = MagicMock()
"#
    )
    .unwrap();

    let buster = MockBuster::new(true, false);
    let result = buster.analyze(dir.path()).unwrap();
    assert_eq!(result.analysis_summary.violation_count, 1);

    let buster = MockBuster::new(false, false);
    let result = buster.analyze(dir.path()).unwrap();
    assert_eq!(result.analysis_summary.violation_count, 2);
}

#[test]
fn test_analyze_records_parse_failures_and_continues() {
    let dir = tempdir().unwrap();

    let broken = dir.path().join("test_broken.py");
    let mut file = File::create(&broken).unwrap();
    write!(file, "def broken(:\n").unwrap();

    let ok = dir.path().join("test_ok.py");
    let mut file = File::create(&ok).unwrap();
    write!(file, "def test_foo(mocker):\n    mocker.resetall()\n").unwrap();

    let buster = MockBuster::new(true, false);
    let result = buster.analyze(dir.path()).unwrap();

    assert_eq!(result.analysis_summary.total_files, 2);
    assert_eq!(result.analysis_summary.skipped_files, 1);
    assert_eq!(result.analysis_summary.violation_count, 1);

    let broken_report = result
        .reports
        .iter()
        .find(|r| r.file.ends_with("test_broken.py"))
        .unwrap();
    assert!(broken_report.error.is_some());
    assert!(broken_report.violations.is_empty());
}

#[test]
fn test_analyze_single_file_path() {
    let dir = tempdir().unwrap();

    let path = dir.path().join("test_single.py");
    let mut file = File::create(&path).unwrap();
    write!(file, "def test_foo(monkeypatch):\n    monkeypatch.undo()\n").unwrap();

    let buster = MockBuster::new(true, false);
    let result = buster.analyze(&path).unwrap();
    assert_eq!(result.analysis_summary.total_files, 1);
    assert_eq!(result.analysis_summary.violation_count, 1);
}
