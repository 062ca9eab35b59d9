//! Collect per-test outcomes from a test runner and render them into one
//! self-contained, interactive HTML report.
//!
//! A run is driven through [`collector::collector::ResultCollector`]: feed it
//! one [`collector::event::PhaseReport`] per finished test phase, then call
//! `on_run_finished` to write `reports/report.html`.

pub mod capture;
pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod report;

pub use collector::collector::{ResultCollector, RunOutcome};
pub use collector::event::{Phase, PhaseOutcome, PhaseReport};
pub use config::ReporterConfig;
pub use error::ReportError;
pub use report::report_model::{RunSummary, TestRecord, TestStatus};
