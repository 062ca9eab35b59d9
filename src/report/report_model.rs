use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Per-test record and run summary
// ============================================================================

/// Final status of one test, as shown in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
    Error,
}

impl TestStatus {
    /// Lowercase name used for CSS classes and filter tabs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Skipped => "skipped",
            TestStatus::Error => "error",
        }
    }

    /// Failed and Error are the statuses that carry a trace.
    pub fn is_failure(&self) -> bool {
        matches!(self, TestStatus::Failed | TestStatus::Error)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed test (call phase only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    /// Enclosing file or module
    pub file_path: String,

    /// Test name with parametrization tags stripped
    pub name: String,

    pub status: TestStatus,

    /// Duration of the call phase in milliseconds
    pub duration_ms: f64,

    /// Failure trace; present exactly when `status.is_failure()`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_trace: Option<String>,

    /// Base64 PNG captured when the test failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_base64: Option<String>,

    /// Browser badge shown next to the test name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
}

/// Aggregated counts for a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub error: usize,
    pub skipped: usize,

    /// No rerun detection exists, so this is always zero
    pub flaky: usize,

    /// Wall clock from collector construction to run finish
    pub duration_seconds: f64,
}

impl RunSummary {
    /// Count statuses across `records`.
    pub fn from_records(records: &[TestRecord], duration_seconds: f64) -> Self {
        let count = |status: TestStatus| records.iter().filter(|r| r.status == status).count();
        let passed = count(TestStatus::Passed);
        let failed = count(TestStatus::Failed);
        let error = count(TestStatus::Error);
        let skipped = count(TestStatus::Skipped);
        Self {
            total: passed + failed + error + skipped,
            passed,
            failed,
            error,
            skipped,
            flaky: 0,
            duration_seconds,
        }
    }

    /// Whether the run had no failed or errored tests.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.error == 0
    }
}
