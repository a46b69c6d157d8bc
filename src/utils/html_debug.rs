// src/utils/html_debug.rs
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use crate::extractors::fund::{self, ExtractionReport};
use crate::utils::error::AppError;

/// Saves the document to a file with the given byte ranges highlighted.
/// Ranges overlapping an earlier highlight are dropped.
pub fn save_debug_html(html: &str, filename: &Path, highlights: &[(usize, usize, &str)]) -> Result<(), AppError> {
    let mut file = File::create(filename)?;
    file.write_all(render_debug_html(html, highlights).as_bytes())?;

    tracing::info!("Saved debug HTML to {}", filename.display());
    Ok(())
}

fn render_debug_html(html: &str, highlights: &[(usize, usize, &str)]) -> String {
    // Add debug styling in head
    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n");

    // CSS for highlight colors
    debug_html.push_str(".highlight-row { background-color: #FFFF00; }\n");
    debug_html.push_str(".highlight-anchor { background-color: #90EE90; }\n");
    debug_html.push_str(".highlight-cell { background-color: #ADD8E6; }\n");
    debug_html.push_str(".highlight-custom { background-color: #FFC0CB; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let mut last_pos = 0;
    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0); // Sort by position

    for (start, end, highlight_type) in sorted_highlights {
        if start < last_pos {
            continue;
        }
        // Add content before the highlight
        debug_html.push_str(&html[last_pos..start]);

        let css_class = match highlight_type {
            "row" => "highlight-row",
            "anchor" => "highlight-anchor",
            "cell" => "highlight-cell",
            _ => "highlight-custom",
        };

        debug_html.push_str(&format!("<span class=\"{}\" title=\"Position: {}-{}, Type: {}\">",
            css_class, start, end, highlight_type));
        debug_html.push_str(&html[start..end]);
        debug_html.push_str("</span>");

        last_pos = end;
    }

    // Add any remaining content
    if last_pos < html.len() {
        debug_html.push_str(&html[last_pos..]);
    }

    debug_html.push_str("\n</body>\n</html>");
    debug_html
}

/// Creates a debug version of a document with locations of specified regex patterns highlighted
pub fn create_debug_html(html: &str, filename: &Path, patterns: &[(&str, &str)]) -> Result<(), AppError> {
    use regex::Regex;

    let mut highlights = Vec::new();

    for (pattern, highlight_type) in patterns {
        let re = Regex::new(pattern).map_err(|e| {
            AppError::Config(format!("Invalid regex pattern '{}': {}", pattern, e))
        })?;

        for mat in re.find_iter(html) {
            highlights.push((mat.start(), mat.end(), *highlight_type));
        }
    }

    save_debug_html(html, filename, &highlights)
}

/// Writes the annotated document and a plain-text skip report into `debug_dir`.
pub fn write_extraction_debug(document: &str, report: &ExtractionReport, debug_dir: &Path) -> Result<(PathBuf, PathBuf), AppError> {
    fs::create_dir_all(debug_dir)?;

    let anchor_patterns = [
        (regex::escape(fund::ROW_MARKER), "row"),
        (fund::SYMBOL_ANCHOR_PATTERN.to_string(), "anchor"),
        (fund::BOLD_CELL_ANCHOR_PATTERN.to_string(), "anchor"),
        (r"<td[^>]*>".to_string(), "cell"),
    ];
    let patterns: Vec<(&str, &str)> = anchor_patterns
        .iter()
        .map(|(pattern, kind)| (pattern.as_str(), *kind))
        .collect();

    let html_path = debug_dir.join("document_annotated.html");
    create_debug_html(document, &html_path, &patterns)?;

    let report_path = debug_dir.join("skipped_rows.txt");
    fs::write(&report_path, render_skip_report(report))?;
    tracing::info!("Saved skip report to {}", report_path.display());

    Ok((html_path, report_path))
}

fn render_skip_report(report: &ExtractionReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Extraction report generated {}\n", chrono::Utc::now().to_rfc3339()));
    out.push_str(&format!(
        "Rows: {}  Records: {}  Skipped: {}  Anchor fallbacks: {}\n\n",
        report.rows_seen(),
        report.records.len(),
        report.skipped.len(),
        report.anchor_fallbacks
    ));
    for (kind, count) in report.skip_counts() {
        out.push_str(&format!("{:<24}{}\n", kind, count));
    }
    out.push('\n');
    // Header and separator rows are noise here
    for skipped in report.skipped.iter().filter(|s| s.reason.kind() != "no_anchor") {
        out.push_str(&format!("row {:>5}: {}\n", skipped.row_index, skipped.reason));
    }
    out
}
