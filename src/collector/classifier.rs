use crate::collector::event::{PhaseOutcome, PhaseReport};
use crate::report::report_model::TestStatus;

/// Marker used when no other markers are configured.
pub const DEFAULT_ASSERTION_MARKER: &str = "AssertionError";

/// Decides whether an errored test's trace is really an assertion failure.
///
/// Some runners fold assertion failures and environment errors into one
/// "error" outcome; the classifier restores the distinction.
pub trait FailureClassifier {
    fn is_assertion_failure(&self, trace: &str) -> bool;
}

impl<F> FailureClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn is_assertion_failure(&self, trace: &str) -> bool {
        self(trace)
    }
}

/// Substring match against a list of markers.
#[derive(Debug, Clone)]
pub struct MarkerClassifier {
    markers: Vec<String>,
}

impl MarkerClassifier {
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }
}

impl Default for MarkerClassifier {
    fn default() -> Self {
        Self::new(vec![DEFAULT_ASSERTION_MARKER.to_string()])
    }
}

impl FailureClassifier for MarkerClassifier {
    fn is_assertion_failure(&self, trace: &str) -> bool {
        self.markers.iter().any(|m| trace.contains(m.as_str()))
    }
}

/// Map a call-phase report to the status shown in the report.
pub fn derive_status(report: &PhaseReport, classifier: &dyn FailureClassifier) -> TestStatus {
    match report.outcome {
        // Expected failures arrive as skips and stay skips.
        PhaseOutcome::Skipped => TestStatus::Skipped,
        PhaseOutcome::Passed => TestStatus::Passed,
        PhaseOutcome::Failed => TestStatus::Failed,
        PhaseOutcome::Error => {
            let trace = report.trace.as_deref().unwrap_or("");
            if classifier.is_assertion_failure(trace) {
                TestStatus::Failed
            } else {
                TestStatus::Error
            }
        }
    }
}
