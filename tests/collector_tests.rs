mod common;

use std::io::Write;
use std::sync::{Arc, Mutex};

use common::{ASSERTION_TRACE, FakePage};
use testrun_report::capture::screenshot::ScreenshotSource;
use testrun_report::report::html::group_by_file;
use testrun_report::{
    Phase, PhaseOutcome, PhaseReport, ReportError, ReporterConfig, ResultCollector, TestStatus,
};

// ============================================================================
// Helpers
// ============================================================================

fn collector_in(dir: &std::path::Path) -> ResultCollector {
    let config = ReporterConfig {
        report_dir: dir.join("reports"),
        ..ReporterConfig::default()
    };
    ResultCollector::new(config)
}

fn three_test_run(collector: &mut ResultCollector) {
    collector.on_test_phase_finished("a.py::t1", PhaseReport::call(PhaseOutcome::Passed, 120.0));
    collector.on_test_phase_finished(
        "a.py::t2",
        PhaseReport::call(PhaseOutcome::Failed, 300.0).with_trace(ASSERTION_TRACE),
    );
    collector.on_test_phase_finished(
        "b.py::t3",
        PhaseReport::call(PhaseOutcome::Skipped, 0.0).with_expected_failure(true),
    );
}

#[derive(Clone)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn capture_logs<F: FnOnce()>(f: F) -> String {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let writer = LogBuffer(buf.clone());
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_target(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buf.lock().expect("log buffer lock").clone();
    String::from_utf8_lossy(&bytes).to_string()
}

// ============================================================================
// 1. End-to-end: three tests, two files
// ============================================================================

#[test]
fn end_to_end_summary_and_grouping() {
    let dir = tempfile::tempdir().unwrap();
    let mut collector = collector_in(dir.path());
    three_test_run(&mut collector);

    let outcome = collector.on_run_finished().unwrap();
    let s = &outcome.summary;
    assert_eq!((s.total, s.passed, s.failed, s.error, s.skipped), (3, 1, 1, 0, 1));
    assert_eq!(s.flaky, 0);

    let groups = group_by_file(&outcome.records);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].file_path, "a.py");
    let names: Vec<_> = groups[0].records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["t1", "t2"]);
    assert_eq!(groups[1].file_path, "b.py");
    assert_eq!(groups[1].records[0].name, "t3");

    assert_eq!(outcome.report_path, dir.path().join("reports").join("report.html"));
    let html = std::fs::read_to_string(&outcome.report_path).unwrap();
    let a = html.find(">a.py<").unwrap();
    let b = html.find(">b.py<").unwrap();
    assert!(a < b);
    assert!(html.find(">t1<").unwrap() < html.find(">t2<").unwrap());
}

// ============================================================================
// 2. Only the call phase is recorded
// ============================================================================

#[test]
fn setup_and_teardown_are_ignored() {
    let mut collector = ResultCollector::new(ReporterConfig::default());
    let setup = PhaseReport::new(Phase::Setup, PhaseOutcome::Error, 5.0).with_trace("fixture 'page' not found");
    let teardown = PhaseReport::new(Phase::Teardown, PhaseOutcome::Passed, 1.0);

    assert!(collector.on_test_phase_finished("a.py::t1", setup).is_none());
    assert!(collector.on_test_phase_finished("a.py::t1", teardown).is_none());
    assert!(collector.records().is_empty());
}

// ============================================================================
// 3. Status derivation and trace invariant
// ============================================================================

#[test]
fn error_outcome_is_reclassified_by_trace() {
    let mut collector = ResultCollector::new(ReporterConfig::default());
    collector.on_test_phase_finished(
        "a.py::assertion",
        PhaseReport::call(PhaseOutcome::Error, 10.0).with_trace("E   AssertionError: 1 != 2"),
    );
    collector.on_test_phase_finished(
        "a.py::timeout",
        PhaseReport::call(PhaseOutcome::Error, 10.0).with_trace("E   TimeoutError: 30000ms"),
    );

    let records = collector.records();
    assert_eq!(records[0].status, TestStatus::Failed);
    assert_eq!(records[1].status, TestStatus::Error);
}

#[test]
fn trace_present_exactly_for_failures() {
    let mut collector = ResultCollector::new(ReporterConfig::default());
    // A trace supplied for a passing or skipped test is dropped.
    collector.on_test_phase_finished(
        "a.py::p",
        PhaseReport::call(PhaseOutcome::Passed, 1.0).with_trace("warning output"),
    );
    collector.on_test_phase_finished(
        "a.py::s",
        PhaseReport::call(PhaseOutcome::Skipped, 0.0).with_trace("skipped: no browser"),
    );
    // A failure without a trace still gets one.
    collector.on_test_phase_finished("a.py::f", PhaseReport::call(PhaseOutcome::Failed, 1.0));
    collector.on_test_phase_finished(
        "a.py::e",
        PhaseReport::call(PhaseOutcome::Error, 1.0).with_trace("ConnectionRefused"),
    );

    for record in collector.records() {
        assert_eq!(
            record.status.is_failure(),
            record.error_trace.is_some(),
            "record {}",
            record.name
        );
    }
}

#[test]
fn custom_classifier_replaces_marker() {
    let classifier = |trace: &str| trace.contains("expect(");
    let mut collector =
        ResultCollector::new(ReporterConfig::default()).with_classifier(Box::new(classifier));
    collector.on_test_phase_finished(
        "a.py::t",
        PhaseReport::call(PhaseOutcome::Error, 1.0).with_trace("expect(locator).to_be_visible()"),
    );
    collector.on_test_phase_finished(
        "a.py::u",
        PhaseReport::call(PhaseOutcome::Error, 1.0).with_trace("AssertionError"),
    );
    assert_eq!(collector.records()[0].status, TestStatus::Failed);
    assert_eq!(collector.records()[1].status, TestStatus::Error);
}

#[test]
fn failure_markers_come_from_config() {
    let config = ReporterConfig {
        failure_markers: vec!["AssertError".into()],
        ..ReporterConfig::default()
    };
    let mut collector = ResultCollector::new(config);
    collector.on_test_phase_finished(
        "a.py::t",
        PhaseReport::call(PhaseOutcome::Error, 1.0).with_trace("AssertError: boom"),
    );
    assert_eq!(collector.records()[0].status, TestStatus::Failed);
}

// ============================================================================
// 4. Identity handling
// ============================================================================

#[test]
fn parametrized_name_is_stripped_and_browser_detected() {
    let mut collector = ResultCollector::new(ReporterConfig::default());
    let record = collector
        .on_test_phase_finished(
            "tests/test_example.py::test_has_title[firefox] [retry]",
            PhaseReport::call(PhaseOutcome::Passed, 50.0),
        )
        .cloned()
        .unwrap();
    assert_eq!(record.file_path, "tests/test_example.py");
    assert_eq!(record.name, "test_has_title");
    assert_eq!(record.browser.as_deref(), Some("firefox"));
}

#[test]
fn default_browser_badge_applies_when_identity_names_none() {
    let config = ReporterConfig {
        default_browser: None,
        ..ReporterConfig::default()
    };
    let mut collector = ResultCollector::new(config);
    collector.on_test_phase_finished("a.py::t", PhaseReport::call(PhaseOutcome::Passed, 1.0));
    assert_eq!(collector.records()[0].browser, None);

    let mut collector = ResultCollector::new(ReporterConfig::default());
    collector.on_test_phase_finished("a.py::t", PhaseReport::call(PhaseOutcome::Passed, 1.0));
    assert_eq!(collector.records()[0].browser.as_deref(), Some("chromium"));
}

#[test]
fn identity_without_separator_degrades_gracefully() {
    let mut collector = ResultCollector::new(ReporterConfig::default());
    collector.on_test_phase_finished("doctest_module.py", PhaseReport::call(PhaseOutcome::Passed, 1.0));
    let record = &collector.records()[0];
    assert_eq!(record.file_path, "doctest_module.py");
    assert_eq!(record.name, "");
}

#[test]
fn empty_configured_separator_keeps_file_path() {
    let config = ReporterConfig {
        identity_separator: String::new(),
        ..ReporterConfig::default()
    };
    let mut collector = ResultCollector::new(config);
    collector.on_test_phase_finished("a.py::t1", PhaseReport::call(PhaseOutcome::Passed, 1.0));
    let record = &collector.records()[0];
    assert_eq!(record.file_path, "a.py");
    assert_eq!(record.name, "t1");
}

#[test]
fn reruns_are_not_deduplicated() {
    let mut collector = ResultCollector::new(ReporterConfig::default());
    collector.on_test_phase_finished(
        "a.py::t",
        PhaseReport::call(PhaseOutcome::Failed, 1.0).with_trace(ASSERTION_TRACE),
    );
    collector.on_test_phase_finished("a.py::t", PhaseReport::call(PhaseOutcome::Passed, 1.0));

    let summary = collector.summary();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.flaky, 0);
}

// ============================================================================
// 5. Screenshot capture
// ============================================================================

#[test]
fn failing_call_phase_gets_screenshot() {
    let mut collector = ResultCollector::new(ReporterConfig::default());
    let mut page = FakePage::ok(&[0x89, b'P', b'N', b'G']);
    let mut report = PhaseReport::call(PhaseOutcome::Failed, 10.0).with_trace(ASSERTION_TRACE);

    collector.capture_failure_screenshot(&mut report, Some(&mut page as &mut dyn ScreenshotSource));
    collector.on_test_phase_finished("a.py::t", report);

    assert_eq!(page.calls, 1);
    assert_eq!(collector.records()[0].screenshot_base64.as_deref(), Some("iVBORw=="));
}

#[test]
fn screenshot_attached_by_runner_is_embedded() {
    let dir = tempfile::tempdir().unwrap();
    let mut collector = collector_in(dir.path());
    let report = PhaseReport::call(PhaseOutcome::Failed, 10.0)
        .with_trace(ASSERTION_TRACE)
        .with_screenshot(vec![0x89, b'P', b'N', b'G']);

    collector.on_test_phase_finished("a.py::t", report);
    assert_eq!(collector.records()[0].screenshot_base64.as_deref(), Some("iVBORw=="));

    let expected_path = collector.config().report_path();
    let outcome = collector.on_run_finished().unwrap();
    assert_eq!(outcome.report_path, expected_path);
    let html = std::fs::read_to_string(&expected_path).unwrap();
    assert!(html.contains("data:image/png;base64,iVBORw=="));
}

#[test]
fn passing_test_is_not_captured() {
    let collector = ResultCollector::new(ReporterConfig::default());
    let mut page = FakePage::ok(b"png");
    let mut report = PhaseReport::call(PhaseOutcome::Passed, 10.0);

    collector.capture_failure_screenshot(&mut report, Some(&mut page));
    assert_eq!(page.calls, 0);
    assert!(report.screenshot_png.is_none());
}

#[test]
fn failing_setup_is_not_captured() {
    let collector = ResultCollector::new(ReporterConfig::default());
    let mut page = FakePage::ok(b"png");
    let mut report = PhaseReport::new(Phase::Setup, PhaseOutcome::Error, 10.0);

    collector.capture_failure_screenshot(&mut report, Some(&mut page));
    assert_eq!(page.calls, 0);
}

#[test]
fn capture_failure_is_logged_and_test_still_reported() {
    let mut collector = ResultCollector::new(ReporterConfig::default());
    let mut page = FakePage::broken("page closed");

    let logs = capture_logs(|| {
        let mut report = PhaseReport::call(PhaseOutcome::Failed, 10.0).with_trace(ASSERTION_TRACE);
        collector.capture_failure_screenshot(&mut report, Some(&mut page));
        collector.on_test_phase_finished("a.py::t", report);
    });

    assert!(logs.contains("Failed to capture screenshot"), "logs: {logs}");
    assert!(logs.contains("page closed"));
    let record = &collector.records()[0];
    assert_eq!(record.status, TestStatus::Failed);
    assert!(record.screenshot_base64.is_none());
}

#[test]
fn missing_page_is_not_an_error() {
    let mut collector = ResultCollector::new(ReporterConfig::default());
    let mut report = PhaseReport::call(PhaseOutcome::Failed, 10.0).with_trace(ASSERTION_TRACE);
    collector.capture_failure_screenshot(&mut report, None);
    collector.on_test_phase_finished("a.py::t", report);
    assert!(collector.records()[0].screenshot_base64.is_none());
}

// ============================================================================
// 6. Run finish
// ============================================================================

#[test]
fn run_duration_override_is_used() {
    let mut collector = ResultCollector::new(ReporterConfig::default());
    collector.set_run_duration(42.5);
    let (_, summary) = collector.finish();
    assert_eq!(summary.duration_seconds, 42.5);
}

#[test]
fn summary_total_is_sum_of_statuses() {
    let mut collector = ResultCollector::new(ReporterConfig::default());
    three_test_run(&mut collector);
    collector.on_test_phase_finished(
        "c.py::t4",
        PhaseReport::call(PhaseOutcome::Error, 5.0).with_trace("OSError"),
    );
    let s = collector.summary();
    assert_eq!(s.total, s.passed + s.failed + s.error + s.skipped);
    assert_eq!(s.error, 1);
    assert!(!s.all_passed());
}

#[test]
fn existing_report_dir_is_reused() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("reports")).unwrap();

    let mut collector = collector_in(dir.path());
    three_test_run(&mut collector);
    let outcome = collector.on_run_finished().unwrap();
    assert!(outcome.report_path.exists());
}

#[test]
fn unwritable_report_dir_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file in the way").unwrap();

    let config = ReporterConfig {
        report_dir: blocker.join("reports"),
        ..ReporterConfig::default()
    };
    let mut collector = ResultCollector::new(config);
    three_test_run(&mut collector);

    match collector.on_run_finished() {
        Err(ReportError::Io { path, .. }) => assert!(path.starts_with(&blocker)),
        other => panic!("expected Io error, got {:?}", other.map(|o| o.report_path)),
    }
}
