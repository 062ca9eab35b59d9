use serde::Serialize;

use crate::error::{ReportError, Result};
use crate::report::report_model::{RunSummary, TestRecord};

/// Machine-readable dump of a finished run.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub summary: &'a RunSummary,
    pub records: &'a [TestRecord],
}

/// Pretty-printed JSON with the summary first, then records in run order.
pub fn records_to_json(records: &[TestRecord], summary: &RunSummary) -> Result<String> {
    serde_json::to_string_pretty(&JsonReport { summary, records }).map_err(|source| {
        ReportError::Serialize {
            context: "JSON report".into(),
            source,
        }
    })
}
