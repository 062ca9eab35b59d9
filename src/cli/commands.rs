use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::Local;
use tracing::{info, warn};

use crate::capture::screenshot::FileScreenshot;
use crate::collector::collector::ResultCollector;
use crate::collector::event::{PhaseReport, RunEvent};
use crate::config::ReporterConfig;
use crate::error::{ReportError, Result};
use crate::report::console::format_console_summary;
use crate::report::html::{RenderOptions, render_html};
use crate::report::json::records_to_json;
use crate::report::junit::generate_junit_xml;
use crate::report::report_model::RunSummary;
use crate::report::writer::write_file;

// ============================================================================
// render subcommand
// ============================================================================

/// Replay an event log and write the report. Returns whether every test passed.
pub fn cmd_render(
    events_path: &str,
    format: &str,
    output: Option<&str>,
    config: ReporterConfig,
) -> Result<bool> {
    let collector = collect_from_log(events_path, config)?;

    let summary = match (format, output) {
        ("html", None) => {
            let outcome = collector.on_run_finished()?;
            println!("Report written to {}", outcome.report_path.display());
            outcome.summary
        }
        _ => {
            let options = RenderOptions::from_config(collector.config());
            let suite_name = collector.config().title.clone();
            let (records, summary) = collector.finish();

            let content = match format {
                "html" => render_html(&records, &summary, Local::now(), &options),
                "junit" => generate_junit_xml(&records, &summary, &suite_name),
                "json" => records_to_json(&records, &summary)?,
                _ => format_console_summary(&records, &summary),
            };

            match output {
                Some(path) => {
                    let written = write_file(Path::new(path), &content)?;
                    println!("Report written to {}", written.display());
                }
                None => print!("{}", content),
            }
            summary
        }
    };

    Ok(summary.all_passed())
}

// ============================================================================
// summary subcommand
// ============================================================================

pub fn cmd_summary(events_path: &str, config: ReporterConfig) -> Result<RunSummary> {
    let collector = collect_from_log(events_path, config)?;
    let (records, summary) = collector.finish();
    print!("{}", format_console_summary(&records, &summary));
    Ok(summary)
}

// ============================================================================
// Event log replay
// ============================================================================

/// Parse an NDJSON event log. Blank lines are skipped.
pub fn load_events(path: &Path) -> Result<Vec<RunEvent>> {
    let file = File::open(path).map_err(|source| ReportError::EventLog {
        path: path.to_path_buf(),
        source,
    })?;

    let mut events = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| ReportError::EventLog {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let event: RunEvent = serde_json::from_str(&line).map_err(|source| {
            ReportError::EventParse {
                line: index + 1,
                source,
            }
        })?;
        events.push(event);
    }
    Ok(events)
}

/// Feed events into `collector` until `run_finished`.
///
/// Screenshot paths are resolved against `base_dir`. Returns the number of
/// events ignored because they arrived after `run_finished`.
pub fn replay_events(collector: &mut ResultCollector, events: Vec<RunEvent>, base_dir: &Path) -> usize {
    let mut events = events.into_iter();

    while let Some(event) = events.next() {
        match event {
            RunEvent::PhaseFinished {
                identity,
                phase,
                outcome,
                duration_ms,
                trace,
                expected_failure,
                screenshot_path,
            } => {
                let mut report = PhaseReport::new(phase, outcome, duration_ms)
                    .with_expected_failure(expected_failure);
                report.trace = trace;

                match screenshot_path {
                    Some(path) => {
                        let mut source = FileScreenshot::new(base_dir.join(path));
                        collector.capture_failure_screenshot(&mut report, Some(&mut source));
                    }
                    None => collector.capture_failure_screenshot(&mut report, None),
                }
                collector.on_test_phase_finished(&identity, report);
            }
            RunEvent::RunFinished { duration_seconds } => {
                if let Some(seconds) = duration_seconds {
                    collector.set_run_duration(seconds);
                }
                let ignored = events.by_ref().count();
                if ignored > 0 {
                    warn!("ignoring {} events after run_finished", ignored);
                }
                return ignored;
            }
        }
    }

    info!("event log ended without run_finished; finishing at end of log");
    0
}

fn collect_from_log(events_path: &str, config: ReporterConfig) -> Result<ResultCollector> {
    let path = Path::new(events_path);
    let events = load_events(path)?;
    info!("replaying {} events from {}", events.len(), path.display());

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut collector = ResultCollector::new(config);
    replay_events(&mut collector, events, base_dir);
    Ok(collector)
}
