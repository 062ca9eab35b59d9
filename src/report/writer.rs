use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::REPORT_FILE_NAME;
use crate::error::{ReportError, Result};

/// Write `html` to `<dir>/report.html`, creating `dir` when needed.
///
/// The document is written in a single call; an existing report is replaced.
pub fn write_report(dir: &Path, html: &str) -> Result<PathBuf> {
    write_file(&dir.join(REPORT_FILE_NAME), html)
}

/// Write any rendered report to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, content).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(bytes = content.len(), "wrote {}", path.display());
    Ok(path.to_path_buf())
}
