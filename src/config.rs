use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::collector::classifier::DEFAULT_ASSERTION_MARKER;
use crate::collector::identity::DEFAULT_SEPARATOR;
use crate::error::{ReportError, Result};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "testrun-report.yaml";

/// File name of the HTML report inside `report_dir`.
pub const REPORT_FILE_NAME: &str = "report.html";

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Reporter settings: `testrun-report.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Directory the report is written into
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Heading and `<title>` of the HTML report
    #[serde(default = "default_title")]
    pub title: String,

    /// Badge for tests whose identity names no browser
    #[serde(default = "default_browser")]
    pub default_browser: Option<String>,

    #[serde(default = "default_separator")]
    pub identity_separator: String,

    /// Trace substrings that turn an "error" outcome into a failure
    #[serde(default = "default_failure_markers")]
    pub failure_markers: Vec<String>,

    /// Key/value pairs shown in the report's environment table
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
            title: default_title(),
            default_browser: default_browser(),
            identity_separator: default_separator(),
            failure_markers: default_failure_markers(),
            metadata: BTreeMap::new(),
        }
    }
}

impl ReporterConfig {
    /// Full path of the HTML report.
    pub fn report_path(&self) -> PathBuf {
        self.report_dir.join(REPORT_FILE_NAME)
    }
}

// Serde default helpers
fn default_report_dir() -> PathBuf { PathBuf::from("reports") }
fn default_title() -> String { "Test Results".to_string() }
fn default_browser() -> Option<String> { Some("chromium".to_string()) }
fn default_separator() -> String { DEFAULT_SEPARATOR.to_string() }
fn default_failure_markers() -> Vec<String> { vec![DEFAULT_ASSERTION_MARKER.to_string()] }

// ============================================================================
// Config File Loading
// ============================================================================

/// Read and parse a config file. `Ok(None)` only when the file does not exist.
pub fn try_load_config(path: &Path) -> Result<Option<ReporterConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("no config at {}", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(ReportError::ConfigRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|source| ReportError::Config {
            path: path.to_path_buf(),
            source,
        })
}

/// Load config from a YAML file. Returns defaults if the file is missing,
/// unreadable or malformed; the last two are logged as warnings.
pub fn load_config(path: Option<&str>) -> ReporterConfig {
    let config_path = Path::new(path.unwrap_or(DEFAULT_CONFIG_FILE));
    match try_load_config(config_path) {
        Ok(Some(config)) => config,
        Ok(None) => ReporterConfig::default(),
        Err(e) => {
            warn!("{}; using defaults", e);
            ReporterConfig::default()
        }
    }
}
