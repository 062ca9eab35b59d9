use serde::{Deserialize, Serialize};

/// Phase of a single test's execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Call,
    Teardown,
}

/// Raw outcome reported by the runner for one phase.
///
/// `Error` is the runner's catch-all for anything that is not a clean
/// assertion failure; the collector may still reclassify it as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseOutcome {
    Passed,
    Failed,
    Skipped,
    Error,
}

impl PhaseOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, PhaseOutcome::Failed | PhaseOutcome::Error)
    }
}

/// Outcome of one phase of one test, as delivered by the runner.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseReport {
    pub phase: Phase,
    pub outcome: PhaseOutcome,
    pub duration_ms: f64,
    pub trace: Option<String>,

    /// The test was marked as an expected failure
    pub expected_failure: bool,

    /// PNG bytes attached by the capture hook
    pub screenshot_png: Option<Vec<u8>>,
}

impl PhaseReport {
    pub fn new(phase: Phase, outcome: PhaseOutcome, duration_ms: f64) -> Self {
        Self {
            phase,
            outcome,
            duration_ms,
            trace: None,
            expected_failure: false,
            screenshot_png: None,
        }
    }

    /// Shorthand for a call-phase report.
    pub fn call(outcome: PhaseOutcome, duration_ms: f64) -> Self {
        Self::new(Phase::Call, outcome, duration_ms)
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    pub fn with_expected_failure(mut self, expected: bool) -> Self {
        self.expected_failure = expected;
        self
    }

    pub fn with_screenshot(mut self, png: Vec<u8>) -> Self {
        self.screenshot_png = Some(png);
        self
    }

    /// True for a failing call phase, the only case that warrants a screenshot.
    pub fn wants_screenshot(&self) -> bool {
        self.phase == Phase::Call && self.outcome.is_failure()
    }
}

// ============================================================================
// Event log (NDJSON) model
// ============================================================================

/// One line of an event log replayed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    PhaseFinished {
        identity: String,
        phase: Phase,
        outcome: PhaseOutcome,
        #[serde(default)]
        duration_ms: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace: Option<String>,
        #[serde(default)]
        expected_failure: bool,
        /// PNG written to disk by the browser driver at failure time
        #[serde(default, skip_serializing_if = "Option::is_none")]
        screenshot_path: Option<String>,
    },
    RunFinished {
        /// Wall-clock length of the original run, when the runner knows it
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_seconds: Option<f64>,
    },
}
