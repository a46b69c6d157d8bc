// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::extractors::fund::{FundRecord, COLUMN_HEADERS};
use crate::utils::error::StorageError;

const MARKDOWN_TITLE: &str = "# Thai RMF Funds Database";

/// Creates the parent directory of `path` if it doesn't exist
fn ensure_parent_dir(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Writes the records as CSV with a fixed header row.
/// Returns `None` without touching the filesystem when there is nothing to write.
pub fn write_csv(records: &[FundRecord], path: &Path) -> Result<Option<PathBuf>, StorageError> {
    if records.is_empty() {
        tracing::warn!("No funds to write, skipping CSV output {}", path.display());
        return Ok(None);
    }

    ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    write_csv_rows(&mut writer, records)?;
    writer.flush()?;

    tracing::info!("CSV file written: {} ({} funds)", path.display(), records.len());
    Ok(Some(path.to_path_buf()))
}

fn write_csv_rows<W: std::io::Write>(writer: &mut csv::Writer<W>, records: &[FundRecord]) -> Result<(), StorageError> {
    writer.write_record(COLUMN_HEADERS)?;
    for record in records {
        writer.write_record(record.fields())?;
    }
    Ok(())
}

/// Renders the Markdown report: title, record count and an eight-column table.
pub fn render_markdown(records: &[FundRecord]) -> String {
    let mut md = String::new();
    md.push_str(MARKDOWN_TITLE);
    md.push_str("\n\n");
    md.push_str(&format!("Complete list of {} Thai Retirement Mutual Funds (RMF)\n\n", records.len()));

    md.push_str(&format!("| {} |\n", COLUMN_HEADERS.join(" | ")));
    let separator: Vec<String> = COLUMN_HEADERS.iter().map(|h| "-".repeat(h.len() + 2)).collect();
    md.push_str(&format!("|{}|\n", separator.join("|")));

    for record in records {
        let cells: Vec<String> = record.fields().iter().map(|f| escape_pipes(f)).collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    md
}

fn escape_pipes(field: &str) -> String {
    field.replace('|', "\\|")
}

/// Writes the Markdown report.
/// Returns `None` without touching the filesystem when there is nothing to write.
pub fn write_markdown(records: &[FundRecord], path: &Path) -> Result<Option<PathBuf>, StorageError> {
    if records.is_empty() {
        tracing::warn!("No funds to write, skipping Markdown output {}", path.display());
        return Ok(None);
    }

    ensure_parent_dir(path)?;
    fs::write(path, render_markdown(records))?;

    tracing::info!("Markdown file written: {} ({} funds)", path.display(), records.len());
    Ok(Some(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symbol: &str, name: &str, amc: &str) -> FundRecord {
        FundRecord {
            symbol: symbol.to_string(),
            fund_name: name.to_string(),
            amc: amc.to_string(),
            classification: "Equity General".to_string(),
            management_style: "Active Management".to_string(),
            dividend_policy: "No Dividend".to_string(),
            risk: "6".to_string(),
            tax_allowance_fund: "RMF".to_string(),
        }
    }

    #[test]
    fn test_csv_round_trip_with_commas_and_quotes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("rmf-funds.csv");
        let records = vec![
            record("ABC-RMF", "Fund Name", "Sample AMC"),
            record("K-EQRMF", "K Equity, Retirement \"Plus\"", "Kasikorn Asset Management Co., Ltd."),
        ];

        let written = write_csv(&records, &path).unwrap();
        assert_eq!(written.as_deref(), Some(path.as_path()));

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text.lines().next(),
            Some("Symbol,Fund Name,AMC,Fund Classification (AIMC),Management Style,Dividend Policy,Risk,Fund for tax allowance")
        );
        assert!(text.contains("\"Kasikorn Asset Management Co., Ltd.\""));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, COLUMN_HEADERS.to_vec());
        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        assert_eq!(rows.len(), 2);
        for (row, original) in rows.iter().zip(&records) {
            assert_eq!(row.iter().map(String::as_str).collect::<Vec<_>>(), original.fields().to_vec());
        }
    }

    #[test]
    fn test_plain_rows_split_cleanly_on_commas() {
        let records = vec![record("ABC-RMF", "Fund Name", "Sample AMC")];
        let mut buf = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buf);
            write_csv_rows(&mut writer, &records).unwrap();
            writer.flush().unwrap();
        }
        let text = String::from_utf8(buf).unwrap();

        let data_line = text.lines().nth(1).unwrap();
        let split: Vec<&str> = data_line.split(',').collect();
        assert_eq!(split, records[0].fields().to_vec());
    }

    #[test]
    fn test_markdown_layout() {
        let records = vec![
            record("ABC-RMF", "Fund Name", "Sample AMC"),
            record("PIPE-RMF", "Growth | Income", "AMC"),
        ];
        let md = render_markdown(&records);
        let lines: Vec<&str> = md.lines().collect();

        assert_eq!(lines[0], "# Thai RMF Funds Database");
        assert_eq!(lines[2], "Complete list of 2 Thai Retirement Mutual Funds (RMF)");
        assert_eq!(
            lines[4],
            "| Symbol | Fund Name | AMC | Fund Classification (AIMC) | Management Style | Dividend Policy | Risk | Fund for tax allowance |"
        );
        assert_eq!(
            lines[5],
            "|--------|-----------|-----|----------------------------|------------------|-----------------|------|------------------------|"
        );
        assert_eq!(
            lines[6],
            "| ABC-RMF | Fund Name | Sample AMC | Equity General | Active Management | No Dividend | 6 | RMF |"
        );
        assert!(lines[7].contains("Growth \\| Income"));
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_empty_records_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("rmf-funds.csv");
        let md_path = dir.path().join("rmf-funds.md");

        assert!(write_csv(&[], &csv_path).unwrap().is_none());
        assert!(write_markdown(&[], &md_path).unwrap().is_none());
        assert!(!csv_path.exists());
        assert!(!md_path.exists());
    }

    #[test]
    fn test_write_markdown_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs").join("rmf-funds.md");
        let records = vec![record("ABC-RMF", "Fund Name", "Sample AMC")];

        write_markdown(&records, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), render_markdown(&records));
    }
}
