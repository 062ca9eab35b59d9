use crate::report::report_model::{RunSummary, TestRecord, TestStatus};

// ============================================================================
// JUnit XML for CI
// ============================================================================

/// Generate a JUnit XML report for CI systems (Jenkins, GitHub Actions, GitLab CI).
///
/// Produces standard JUnit XML:
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuite name="..." tests="3" failures="1" errors="0" skipped="1" time="2.400">
///   <testcase name="t1" classname="tests/a.py" time="0.120" />
///   <testcase name="t2" classname="tests/a.py" time="0.300">
///     <failure message="AssertionError: ..." type="failed">...</failure>
///   </testcase>
///   <testcase name="t3" classname="tests/b.py" time="0.000"><skipped /></testcase>
/// </testsuite>
/// ```
pub fn generate_junit_xml(records: &[TestRecord], summary: &RunSummary, suite_name: &str) -> String {
    let mut cases = String::new();
    for record in records {
        let open = format!(
            "  <testcase name=\"{name}\" classname=\"{class}\" time=\"{time:.3}\"",
            name = escape_xml(&record.name),
            class = escape_xml(&record.file_path),
            time = record.duration_ms / 1000.0,
        );

        match record.status {
            TestStatus::Passed => cases.push_str(&format!("{} />\n", open)),
            TestStatus::Skipped => cases.push_str(&format!("{}>\n    <skipped />\n  </testcase>\n", open)),
            TestStatus::Failed | TestStatus::Error => {
                let element = if record.status == TestStatus::Failed {
                    "failure"
                } else {
                    "error"
                };
                let trace = record.error_trace.as_deref().unwrap_or("");
                cases.push_str(&format!(
                    "{open}>\n    <{element} message=\"{message}\" type=\"{status}\">{body}</{element}>\n  </testcase>\n",
                    open = open,
                    element = element,
                    message = escape_xml(&failure_message(trace)),
                    status = record.status,
                    body = escape_xml(trace),
                ));
            }
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\" errors=\"{errors}\" skipped=\"{skipped}\" time=\"{time:.3}\">\n{cases}</testsuite>\n",
        name = escape_xml(suite_name),
        tests = summary.total,
        failures = summary.failed,
        errors = summary.error,
        skipped = summary.skipped,
        time = summary.duration_seconds,
        cases = cases,
    )
}

/// Short message for the `message` attribute: the first `E ` line, else the
/// last non-empty line of the trace.
fn failure_message(trace: &str) -> String {
    trace
        .lines()
        .find_map(|l| l.trim_start().strip_prefix("E "))
        .or_else(|| trace.lines().rev().find(|l| !l.trim().is_empty()))
        .map(|l| l.trim().to_string())
        .unwrap_or_else(|| "test failed".to_string())
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
