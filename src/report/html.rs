use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use sha1::{Digest, Sha1};

use crate::config::ReporterConfig;
use crate::report::report_model::{RunSummary, TestRecord};
use crate::report::trace_lines::format_trace;

// ============================================================================
// Single-file interactive HTML report
// ============================================================================

const REPORT_STYLE: &str = include_str!("assets/report.css");
const REPORT_SCRIPT: &str = include_str!("assets/report.js");

/// Presentation settings that do not come from the records themselves.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub title: String,
    pub metadata: BTreeMap<String, String>,
}

impl RenderOptions {
    pub fn from_config(config: &ReporterConfig) -> Self {
        Self {
            title: config.title.clone(),
            metadata: config.metadata.clone(),
        }
    }
}

/// Records sharing one source file, in append order.
#[derive(Debug, Clone, PartialEq)]
pub struct FileGroup<'a> {
    pub file_path: &'a str,
    pub records: Vec<&'a TestRecord>,
}

/// Group records by file. Files keep first-seen order, tests keep append order.
pub fn group_by_file(records: &[TestRecord]) -> Vec<FileGroup<'_>> {
    let mut groups: Vec<FileGroup<'_>> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|g| g.file_path == record.file_path) {
            Some(group) => group.records.push(record),
            None => groups.push(FileGroup {
                file_path: &record.file_path,
                records: vec![record],
            }),
        }
    }
    groups
}

/// Per-test duration: whole milliseconds below one second, else seconds.
///
/// `999.4` → `"999ms"`, `1500.0` → `"1.5s"`. The unit is chosen before
/// rounding, so `999.6` renders as `"1000ms"`.
pub fn format_duration_ms(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{:.0}ms", ms)
    } else {
        format!("{:.1}s", ms / 1000.0)
    }
}

/// Run duration, always seconds with one decimal.
pub fn format_seconds(seconds: f64) -> String {
    format!("{:.1}s", seconds)
}

/// Stable element id for a file section, usable as a URL fragment.
pub fn file_anchor(file_path: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(file_path.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("file-{}", &digest[..12])
}

/// Render the complete report document.
///
/// `generated_at` is the only time-dependent input; identical arguments
/// produce byte-identical output.
pub fn render_html(
    records: &[TestRecord],
    summary: &RunSummary,
    generated_at: DateTime<Local>,
    options: &RenderOptions,
) -> String {
    let title = escape_html(&options.title);
    let tabs = render_tabs(summary);
    let metadata = render_metadata(&options.metadata);
    let results: String = group_by_file(records).iter().map(render_file_group).collect();

    format!(
        r##"<!DOCTYPE html>
<html lang="en" data-theme="dark">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
{style}
</style>
</head>
<body>
<div class="container">
<div class="header">
<div class="title-row">
<h1 class="title">{title}</h1>
<button type="button" class="theme-toggle" id="themeToggle">Toggle theme</button>
</div>
<div class="controls">
<input type="text" class="search-bar" placeholder="Search" id="searchInput">
<div class="tabs">
{tabs}</div>
</div>
{metadata}</div>
<div class="timestamp">{timestamp} · Total time: {duration}</div>
<div id="testResults">
{results}</div>
</div>
<script>
{script}
</script>
</body>
</html>
"##,
        title = title,
        style = REPORT_STYLE,
        tabs = tabs,
        metadata = metadata,
        timestamp = generated_at.format("%m/%d/%Y, %I:%M:%S %p"),
        duration = format_seconds(summary.duration_seconds),
        results = results,
        script = REPORT_SCRIPT,
    )
}

fn render_tabs(summary: &RunSummary) -> String {
    let tabs = [
        ("all", "All", summary.total),
        ("passed", "Passed", summary.passed),
        ("failed", "Failed", summary.failed),
        ("error", "Error", summary.error),
        ("flaky", "Flaky", summary.flaky),
        ("skipped", "Skipped", summary.skipped),
    ];

    tabs.iter()
        .map(|(status, label, count)| {
            let active = if *status == "all" { " active" } else { "" };
            format!(
                "<div class=\"tab{active}\" data-status=\"{status}\">{label} <span class=\"tab-count\">{count}</span></div>\n"
            )
        })
        .collect()
}

fn render_metadata(metadata: &BTreeMap<String, String>) -> String {
    if metadata.is_empty() {
        return String::new();
    }
    let rows: String = metadata
        .iter()
        .map(|(key, value)| {
            format!(
                "<tr><th>{}</th><td>{}</td></tr>\n",
                escape_html(key),
                escape_html(value)
            )
        })
        .collect();
    format!("<table class=\"metadata\">\n{}</table>\n", rows)
}

fn render_file_group(group: &FileGroup<'_>) -> String {
    let mut out = format!(
        r#"<div class="file-item" id="{anchor}">
<div class="file-header">
<svg class="chevron" width="16" height="16" viewBox="0 0 16 16" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M6 12L10 8L6 4" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"/></svg>
<span class="file-name">{file}</span>
</div>
"#,
        anchor = file_anchor(group.file_path),
        file = escape_html(group.file_path),
    );

    for record in &group.records {
        out.push_str(&render_test(record));
    }

    out.push_str("</div>\n");
    out
}

fn render_test(record: &TestRecord) -> String {
    let status = record.status.as_str();
    let browser = record
        .browser
        .as_deref()
        .map(|b| format!("<div class=\"test-browser\">{}</div>\n", escape_html(b)))
        .unwrap_or_default();

    let mut out = format!(
        r#"<div class="test-item" data-status="{status}">
<div class="test-header">
<div class="test-status status-{status}" data-status="{status}" title="{status}"></div>
<div class="test-name">{name}</div>
{browser}<div class="test-duration">{duration}</div>
</div>
</div>
"#,
        status = status,
        name = escape_html(&record.name),
        browser = browser,
        duration = format_duration_ms(record.duration_ms),
    );

    if record.error_trace.is_none() && record.screenshot_base64.is_none() {
        return out;
    }

    out.push_str("<div class=\"test-details\">\n");
    if let Some(trace) = &record.error_trace {
        out.push_str(&format!(
            "<div class=\"error-trace\"><pre><code class=\"trace\">{}</code></pre></div>\n",
            format_trace(trace)
        ));
    }
    if let Some(png) = &record.screenshot_base64 {
        out.push_str(&format!(
            "<img class=\"test-screenshot\" src=\"data:image/png;base64,{}\" alt=\"Test failure screenshot\">\n",
            png
        ));
    }
    out.push_str("</div>\n");
    out
}

/// Escape HTML special characters for text and attribute positions.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
