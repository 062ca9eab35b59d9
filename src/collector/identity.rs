use std::sync::LazyLock;

use regex::Regex;

/// Separator between file path and test name in a runner identity.
pub const DEFAULT_SEPARATOR: &str = "::";

/// Browser names recognised inside a parametrization tag.
const KNOWN_BROWSERS: [&str; 3] = ["chromium", "firefox", "webkit"];

static PARAM_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[[^\]]+\]\s*").expect("static regex is valid"));

/// A runner identity split into its file and test-name parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestIdentity {
    pub file_path: String,
    pub name: String,

    /// Contents of the bracketed tags that were stripped from the name
    pub tags: Vec<String>,
}

impl TestIdentity {
    /// Split `raw` at the first `separator`.
    ///
    /// Without a separator the whole string becomes the file path and the
    /// name is empty. An empty `separator` means [`DEFAULT_SEPARATOR`].
    pub fn parse(raw: &str, separator: &str) -> Self {
        let separator = if separator.is_empty() {
            DEFAULT_SEPARATOR
        } else {
            separator
        };
        let (file_path, raw_name) = match raw.split_once(separator) {
            Some((file, name)) => (file, name),
            None => (raw, ""),
        };

        Self {
            file_path: file_path.to_string(),
            name: strip_parametrization(raw_name),
            tags: parametrization_tags(raw_name),
        }
    }

    /// First tag naming a known browser, e.g. `firefox` from `test_x[firefox]`.
    pub fn browser(&self) -> Option<&str> {
        self.tags
            .iter()
            .map(String::as_str)
            .find(|tag| KNOWN_BROWSERS.contains(tag))
    }
}

/// Remove every bracketed tag, collapsing surrounding whitespace.
///
/// `"test_foo[chromium] [retry]"` becomes `"test_foo"`.
pub fn strip_parametrization(name: &str) -> String {
    PARAM_TAG.replace_all(name, " ").trim().to_string()
}

fn parametrization_tags(name: &str) -> Vec<String> {
    PARAM_TAG
        .find_iter(name)
        .map(|m| {
            m.as_str()
                .trim()
                .trim_start_matches('[')
                .trim_end_matches(']')
                .to_string()
        })
        .collect()
}
