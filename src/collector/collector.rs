use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use tracing::{debug, info};

use crate::capture::screenshot::{ScreenshotSource, capture, encode_png};
use crate::collector::classifier::{FailureClassifier, MarkerClassifier, derive_status};
use crate::collector::event::{Phase, PhaseReport};
use crate::collector::identity::TestIdentity;
use crate::config::ReporterConfig;
use crate::error::Result;
use crate::report::html::{RenderOptions, render_html};
use crate::report::report_model::{RunSummary, TestRecord};
use crate::report::writer::write_report;

/// What a finished run leaves behind.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub report_path: PathBuf,
    pub records: Vec<TestRecord>,
}

/// Collects call-phase results for one test run.
///
/// Construct one per run and drive it with runner events. Finishing the
/// run consumes the collector, so no event can arrive after the report
/// has been written.
pub struct ResultCollector {
    config: ReporterConfig,
    classifier: Box<dyn FailureClassifier>,
    records: Vec<TestRecord>,
    started: Instant,
    duration_override: Option<f64>,
}

impl ResultCollector {
    pub fn new(config: ReporterConfig) -> Self {
        let classifier = MarkerClassifier::new(config.failure_markers.clone());
        Self {
            config,
            classifier: Box::new(classifier),
            records: Vec::new(),
            started: Instant::now(),
            duration_override: None,
        }
    }

    /// Replace the marker-based classifier.
    pub fn with_classifier(mut self, classifier: Box<dyn FailureClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Use a known run duration instead of the time since construction.
    ///
    /// Replayed event logs know how long the original run took; the replay
    /// itself finishes almost instantly.
    pub fn set_run_duration(&mut self, seconds: f64) {
        self.duration_override = Some(seconds);
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Records collected so far, in completion order.
    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    /// Attach a screenshot to a failing call-phase report.
    ///
    /// Runs before the report is handed to [`Self::on_test_phase_finished`].
    /// Capture problems are logged and leave the report untouched.
    pub fn capture_failure_screenshot(
        &self,
        report: &mut PhaseReport,
        source: Option<&mut dyn ScreenshotSource>,
    ) {
        if !report.wants_screenshot() {
            return;
        }
        let Some(source) = source else {
            debug!("no screenshot source for failing test");
            return;
        };
        if let Some(png) = capture(source).into_png() {
            report.screenshot_png = Some(png);
        }
    }

    /// Normalise a phase report into a record. Only the call phase counts.
    pub fn on_test_phase_finished(
        &mut self,
        identity: &str,
        report: PhaseReport,
    ) -> Option<&TestRecord> {
        if report.phase != Phase::Call {
            debug!(identity, phase = ?report.phase, "ignoring non-call phase");
            return None;
        }

        let parsed = TestIdentity::parse(identity, &self.config.identity_separator);
        let status = derive_status(&report, self.classifier.as_ref());
        let error_trace = if status.is_failure() {
            Some(report.trace.clone().unwrap_or_default())
        } else {
            None
        };
        let screenshot_base64 = report.screenshot_png.as_deref().map(encode_png);
        let browser = parsed
            .browser()
            .map(str::to_string)
            .or_else(|| self.config.default_browser.clone());

        debug!(identity, %status, duration_ms = report.duration_ms, "recorded test");

        self.records.push(TestRecord {
            file_path: parsed.file_path,
            name: parsed.name,
            status,
            duration_ms: report.duration_ms,
            error_trace,
            screenshot_base64,
            browser,
        });
        self.records.last()
    }

    /// Summary of what has been collected so far.
    pub fn summary(&self) -> RunSummary {
        let duration = self
            .duration_override
            .unwrap_or_else(|| self.started.elapsed().as_secs_f64());
        RunSummary::from_records(&self.records, duration)
    }

    /// End the run without writing anything.
    pub fn finish(self) -> (Vec<TestRecord>, RunSummary) {
        let summary = self.summary();
        (self.records, summary)
    }

    /// End the run: summarise, render and write the HTML report.
    pub fn on_run_finished(self) -> Result<RunOutcome> {
        let options = RenderOptions::from_config(&self.config);
        let report_dir = self.config.report_dir.clone();
        let (records, summary) = self.finish();

        let html = render_html(&records, &summary, Local::now(), &options);
        let report_path = write_report(&report_dir, &html)?;

        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            error = summary.error,
            skipped = summary.skipped,
            "report written to {}",
            report_path.display()
        );

        Ok(RunOutcome {
            summary,
            report_path,
            records,
        })
    }
}
