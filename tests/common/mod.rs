#![allow(dead_code)]

use chrono::{DateTime, Local, TimeZone};
use testrun_report::capture::screenshot::{CaptureError, ScreenshotSource};
use testrun_report::{TestRecord, TestStatus};

pub const ASSERTION_TRACE: &str = "page = <Page url='https://playwright.dev/'>

    def test_get_started_link(page: Page):
        page.goto(\"https://playwright.dev/\")
>       expect(page.get_by_role(\"heading\", name=\"Installationt\")).to_be_visible()
E       AssertionError: Locator expected to be visible

tests/test_example.py:21: AssertionError";

pub fn record(file: &str, name: &str, status: TestStatus, duration_ms: f64) -> TestRecord {
    TestRecord {
        file_path: file.to_string(),
        name: name.to_string(),
        status,
        duration_ms,
        error_trace: status.is_failure().then(|| ASSERTION_TRACE.to_string()),
        screenshot_base64: None,
        browser: Some("chromium".to_string()),
    }
}

pub fn fixed_time() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 3, 4, 15, 6, 7)
        .single()
        .expect("unambiguous local time")
}

/// Stand-in for a browser page handle.
pub struct FakePage {
    pub result: Result<Vec<u8>, String>,
    pub calls: usize,
}

impl FakePage {
    pub fn ok(png: &[u8]) -> Self {
        Self { result: Ok(png.to_vec()), calls: 0 }
    }

    pub fn broken(reason: &str) -> Self {
        Self { result: Err(reason.to_string()), calls: 0 }
    }
}

impl ScreenshotSource for FakePage {
    fn capture_png(&mut self) -> Result<Vec<u8>, CaptureError> {
        self.calls += 1;
        self.result.clone().map_err(CaptureError::Unavailable)
    }
}
