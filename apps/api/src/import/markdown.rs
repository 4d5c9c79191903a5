use std::sync::OnceLock;

use regex::Regex;

fn blank_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("invalid blank-run pattern"))
}

/// Normalizes a markdown document for extraction and storage:
/// line endings unified to `\n`, runs of blank lines collapsed to a single
/// blank line, leading/trailing whitespace trimmed. Idempotent.
pub fn normalize_markdown(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let collapsed = blank_run().replace_all(&unified, "\n\n");
    collapsed.trim().to_string()
}

/// Whether `filename` is eligible input for the markdown importer.
/// Pure suffix test — no content sniffing.
pub fn is_markdown_file(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".md")
}
