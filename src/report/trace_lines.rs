// ============================================================================
// Failure trace presentation
// ============================================================================

/// Presentational class of one trace line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceLineKind {
    /// `E   AssertionError: ...`
    Error,
    /// `def test_x(page):`, `class ...`, decorators
    Definition,
    /// `File "x.py", line 3: in test_x`
    FileReference,
    /// `>       expect(page).to_have_title(...)`
    Context,
    Plain,
}

impl TraceLineKind {
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            TraceLineKind::Error => Some("error-line"),
            TraceLineKind::Definition => Some("def-line"),
            TraceLineKind::FileReference => Some("file-line"),
            TraceLineKind::Context => Some("context-line"),
            TraceLineKind::Plain => None,
        }
    }
}

/// Classify a single raw trace line. First matching rule wins.
pub fn classify_line(line: &str) -> TraceLineKind {
    let trimmed = line.trim();
    if trimmed.starts_with("E ") {
        TraceLineKind::Error
    } else if ["def ", "class ", "@", "async def"]
        .iter()
        .any(|p| trimmed.starts_with(p))
    {
        TraceLineKind::Definition
    } else if line.contains(": ") && (line.contains("File \"") || line.contains("line ")) {
        TraceLineKind::FileReference
    } else if trimmed.starts_with('>') {
        TraceLineKind::Context
    } else {
        TraceLineKind::Plain
    }
}

/// Escape only `&`, `<` and `>` so the trace reads verbatim inside `<pre>`.
pub fn escape_trace(trace: &str) -> String {
    trace
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a trace and wrap each classified line in a `<span>`.
pub fn format_trace(trace: &str) -> String {
    trace
        .split('\n')
        .map(|raw| {
            let kind = classify_line(raw);
            let escaped = escape_trace(raw);
            match kind.css_class() {
                Some(class) => format!("<span class=\"{}\">{}</span>", class, escaped),
                None => escaped,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
