use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a screenshot could not be taken.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No page or browser context was attached to the test
    #[error("no page available for capture: {0}")]
    Unavailable(String),

    /// Reading the captured image failed
    #[error("failed to read screenshot '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The capture produced no bytes
    #[error("screenshot is empty")]
    Empty,
}

/// Anything that can produce a PNG of the page under test.
pub trait ScreenshotSource {
    fn capture_png(&mut self) -> Result<Vec<u8>, CaptureError>;
}

/// Result of a best-effort capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured(Vec<u8>),
    Failed(String),
}

impl CaptureOutcome {
    pub fn into_png(self) -> Option<Vec<u8>> {
        match self {
            CaptureOutcome::Captured(png) => Some(png),
            CaptureOutcome::Failed(_) => None,
        }
    }
}

/// Ask `source` for a PNG, logging instead of propagating any failure.
pub fn capture(source: &mut dyn ScreenshotSource) -> CaptureOutcome {
    match source.capture_png() {
        Ok(png) if png.is_empty() => {
            warn!("Failed to capture screenshot: {}", CaptureError::Empty);
            CaptureOutcome::Failed(CaptureError::Empty.to_string())
        }
        Ok(png) => {
            debug!(bytes = png.len(), "captured failure screenshot");
            CaptureOutcome::Captured(png)
        }
        Err(e) => {
            warn!("Failed to capture screenshot: {}", e);
            CaptureOutcome::Failed(e.to_string())
        }
    }
}

/// Base64 text embedded in the report's `data:image/png` URIs.
pub fn encode_png(png: &[u8]) -> String {
    STANDARD.encode(png)
}

// ============================================================================
// File-backed source
// ============================================================================

/// A screenshot already written to disk by an external browser driver.
#[derive(Debug, Clone)]
pub struct FileScreenshot {
    path: PathBuf,
}

impl FileScreenshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScreenshotSource for FileScreenshot {
    fn capture_png(&mut self) -> Result<Vec<u8>, CaptureError> {
        std::fs::read(&self.path).map_err(|source| CaptureError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
