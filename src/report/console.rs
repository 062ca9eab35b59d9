use crate::report::html::{format_duration_ms, format_seconds, group_by_file};
use crate::report::report_model::{RunSummary, TestRecord, TestStatus};

// ============================================================================
// Console reporter
// ============================================================================

/// Format collected results for terminal output.
///
/// Produces output like:
/// ```text
/// tests/test_login.py
///   ✓ PASS   test_has_title (120ms)
///   ✗ FAIL   test_get_started_link (1.3s)
///
/// === Results: 1 passed, 1 failed, 0 error, 0 skipped (2 total) in 2.4s ===
/// ```
pub fn format_console_summary(records: &[TestRecord], summary: &RunSummary) -> String {
    let mut out = String::new();

    for group in group_by_file(records) {
        out.push_str(&format!("{}\n", group.file_path));
        for record in group.records {
            out.push_str(&format!(
                "  {}  {} ({})\n",
                status_marker(record.status),
                record.name,
                format_duration_ms(record.duration_ms)
            ));

            // First `E ` line is usually the assertion message
            if let Some(line) = record
                .error_trace
                .as_deref()
                .and_then(|t| t.lines().find(|l| l.trim_start().starts_with("E ")))
            {
                out.push_str(&format!("      {}\n", line.trim()));
            }
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed, {} error, {} skipped ({} total) in {} ===\n",
        summary.passed,
        summary.failed,
        summary.error,
        summary.skipped,
        summary.total,
        format_seconds(summary.duration_seconds)
    ));

    out
}

fn status_marker(status: TestStatus) -> &'static str {
    match status {
        TestStatus::Passed => "\u{2713} PASS ",
        TestStatus::Failed => "\u{2717} FAIL ",
        TestStatus::Error => "! ERROR",
        TestStatus::Skipped => "- SKIP ",
    }
}
