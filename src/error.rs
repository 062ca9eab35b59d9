use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the collector, the report writers and the CLI.
///
/// Screenshot capture problems are not represented here; they surface as
/// [`crate::capture::screenshot::CaptureOutcome::Failed`].
#[derive(Error, Debug)]
pub enum ReportError {
    /// Report directory or file could not be created or written
    #[error("failed to write report at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Event log could not be opened or read
    #[error("failed to read event log '{}': {source}", .path.display())]
    EventLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of the event log is not a valid event
    #[error("invalid event on line {line}: {source}")]
    EventParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Config file exists but could not be read
    #[error("failed to read config file '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file exists but is not valid YAML for `ReporterConfig`
    #[error("invalid config file '{}': {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON output could not be produced
    #[error("failed to serialize {context}: {source}")]
    Serialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;
