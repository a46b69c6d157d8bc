// src/extractors/clean.rs
use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<br\s*/?>").expect("Failed to compile LINE_BREAK_RE")
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>").expect("Failed to compile TAG_RE")
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE")
});

/// Normalises the raw body of a table cell into plain text.
///
/// `<br>` variants become a space, every other tag is dropped, whitespace
/// runs collapse to a single space and the result is trimmed.
pub fn clean_cell_text(raw: &str) -> String {
    let text = LINE_BREAK_RE.replace_all(raw, " ");
    let text = TAG_RE.replace_all(&text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}
