// src/extractors/fund.rs

// --- Imports ---
use crate::extractors::clean::clean_cell_text;
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

// --- Constants ---
pub const ROW_MARKER: &str = "<tr>";

/// Minimum number of `<td>` cells a row needs before it is considered at all.
pub const MIN_CELLS: usize = 7;

/// Value used when a row has no cell at anchor offset +7.
pub const DEFAULT_TAX_ALLOWANCE: &str = "RMF";

/// Output column names, in record field order.
pub const COLUMN_HEADERS: [&str; 8] = [
    "Symbol",
    "Fund Name",
    "AMC",
    "Fund Classification (AIMC)",
    "Management Style",
    "Dividend Policy",
    "Risk",
    "Fund for tax allowance",
];

// --- Regex Patterns ---
// Primary anchor: <b><u>SYMBOL</u></b>
pub const SYMBOL_ANCHOR_PATTERN: &str = r"<b><u>([^<]+)</u></b>";
// Secondary anchor for rows whose symbol is bold but not underlined
pub const BOLD_CELL_ANCHOR_PATTERN: &str = r"<td><b>([A-Z0-9 \-()]+)</b></td>";
pub const CELL_PATTERN: &str = r"(?s)<td[^>]*>(.*?)</td>";

static SYMBOL_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(SYMBOL_ANCHOR_PATTERN).expect("Failed to compile SYMBOL_ANCHOR_RE")
});

static BOLD_CELL_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(BOLD_CELL_ANCHOR_PATTERN).expect("Failed to compile BOLD_CELL_ANCHOR_RE")
});

static CELL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(CELL_PATTERN).expect("Failed to compile CELL_RE")
});

// --- Data Structures ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundRecord {
    pub symbol: String,
    pub fund_name: String,
    pub amc: String,
    pub classification: String,
    pub management_style: String,
    pub dividend_policy: String,
    pub risk: String,
    pub tax_allowance_fund: String,
}

impl FundRecord {
    /// Field values in `COLUMN_HEADERS` order.
    pub fn fields(&self) -> [&str; 8] {
        [
            self.symbol.as_str(),
            self.fund_name.as_str(),
            self.amc.as_str(),
            self.classification.as_str(),
            self.management_style.as_str(),
            self.dividend_policy.as_str(),
            self.risk.as_str(),
            self.tax_allowance_fund.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRow {
    pub record: FundRecord,
    /// True when no cell contained the symbol and cell 0 was used as the anchor.
    pub anchor_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoAnchor,
    EmptySymbol,
    TooFewCells { found: usize },
    OffsetOutOfRange { symbol: String, anchor_index: usize, cells: usize },
    MissingRequiredField { symbol: String },
}

impl SkipReason {
    /// Stable short label, used as a key when counting skips.
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::NoAnchor => "no_anchor",
            SkipReason::EmptySymbol => "empty_symbol",
            SkipReason::TooFewCells { .. } => "too_few_cells",
            SkipReason::OffsetOutOfRange { .. } => "offset_out_of_range",
            SkipReason::MissingRequiredField { .. } => "missing_required_field",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoAnchor => write!(f, "no symbol anchor"),
            SkipReason::EmptySymbol => write!(f, "symbol anchor is blank"),
            SkipReason::TooFewCells { found } => {
                write!(f, "only {} cells, need at least {}", found, MIN_CELLS)
            }
            SkipReason::OffsetOutOfRange { symbol, anchor_index, cells } => write!(
                f,
                "{}: anchor at cell {} leaves too few of {} cells",
                symbol, anchor_index, cells
            ),
            SkipReason::MissingRequiredField { symbol } => {
                write!(f, "{}: fund name or AMC is empty", symbol)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Extracted(ExtractedRow),
    Skipped(SkipReason),
}

impl RowOutcome {
    pub fn into_record(self) -> Option<FundRecord> {
        match self {
            RowOutcome::Extracted(row) => Some(row.record),
            RowOutcome::Skipped(_) => None,
        }
    }
}

/// A row that was not turned into a record, with its position among the row segments.
#[derive(Debug, Clone)]
pub struct SkippedRow {
    pub row_index: usize,
    pub reason: SkipReason,
}

/// Everything one pass over a document produced.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub records: Vec<FundRecord>,
    pub skipped: Vec<SkippedRow>,
    pub anchor_fallbacks: usize,
}

impl ExtractionReport {
    pub fn rows_seen(&self) -> usize {
        self.records.len() + self.skipped.len()
    }

    pub fn skip_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for skipped in &self.skipped {
            *counts.entry(skipped.reason.kind()).or_insert(0) += 1;
        }
        counts
    }
}

// --- Row Strategies ---

/// Turns one row segment (the text following a `<tr>` marker) into an outcome.
pub trait RowStrategy {
    fn extract_row(&self, segment: &str) -> RowOutcome;
}

/// Locates the symbol anchor, finds the cell holding it, and reads the
/// remaining fields at fixed offsets from that cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorOffsetStrategy;

impl AnchorOffsetStrategy {
    fn find_symbol(segment: &str) -> Option<&str> {
        SYMBOL_ANCHOR_RE
            .captures(segment)
            .or_else(|| BOLD_CELL_ANCHOR_RE.captures(segment))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
    }
}

impl RowStrategy for AnchorOffsetStrategy {
    fn extract_row(&self, segment: &str) -> RowOutcome {
        let symbol = match Self::find_symbol(segment) {
            Some(symbol) if !symbol.is_empty() => symbol,
            Some(_) => return RowOutcome::Skipped(SkipReason::EmptySymbol),
            None => return RowOutcome::Skipped(SkipReason::NoAnchor),
        };

        let cells: Vec<&str> = CELL_RE
            .captures_iter(segment)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect();

        if cells.len() < MIN_CELLS {
            return RowOutcome::Skipped(SkipReason::TooFewCells { found: cells.len() });
        }

        let (anchor_index, anchor_fallback) = match cells.iter().position(|cell| cell.contains(symbol)) {
            Some(idx) => (idx, false),
            None => {
                tracing::warn!("Symbol '{}' not found in any cell, using cell 0 as anchor", symbol);
                (0, true)
            }
        };

        // Offsets +1..+6 are required; +7 is optional.
        if anchor_index + 6 >= cells.len() {
            return RowOutcome::Skipped(SkipReason::OffsetOutOfRange {
                symbol: symbol.to_string(),
                anchor_index,
                cells: cells.len(),
            });
        }
        let field = |offset: usize| clean_cell_text(cells[anchor_index + offset]);

        let record = FundRecord {
            symbol: symbol.to_string(),
            fund_name: field(1),
            amc: field(2),
            classification: field(3),
            management_style: field(4),
            dividend_policy: field(5),
            risk: field(6),
            tax_allowance_fund: cells
                .get(anchor_index + 7)
                .map(|cell| clean_cell_text(cell))
                .unwrap_or_else(|| DEFAULT_TAX_ALLOWANCE.to_string()),
        };

        if record.fund_name.is_empty() || record.amc.is_empty() {
            return RowOutcome::Skipped(SkipReason::MissingRequiredField { symbol: record.symbol });
        }

        RowOutcome::Extracted(ExtractedRow { record, anchor_fallback })
    }
}

// --- Main Extractor Structure ---
pub struct FundExtractor<S = AnchorOffsetStrategy> {
    strategy: S,
}

impl FundExtractor {
    pub fn new() -> Self {
        Self { strategy: AnchorOffsetStrategy }
    }
}

impl Default for FundExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RowStrategy> FundExtractor<S> {
    pub fn with_strategy(strategy: S) -> Self {
        Self { strategy }
    }

    /// Lazily yields one outcome per `<tr>` segment. Text before the first
    /// marker is never a row.
    pub fn rows<'a>(&'a self, document: &'a str) -> impl Iterator<Item = RowOutcome> + 'a {
        document
            .split(ROW_MARKER)
            .skip(1)
            .map(move |segment| self.strategy.extract_row(segment))
    }

    /// Lazily yields only the rows that produced a record.
    pub fn records<'a>(&'a self, document: &'a str) -> impl Iterator<Item = FundRecord> + 'a {
        self.rows(document).filter_map(RowOutcome::into_record)
    }

    /// Runs a full pass and collects records alongside skip diagnostics.
    pub fn extract_with_report(&self, document: &str) -> ExtractionReport {
        let mut report = ExtractionReport::default();

        for (row_index, outcome) in self.rows(document).enumerate() {
            match outcome {
                RowOutcome::Extracted(row) => {
                    if row.anchor_fallback {
                        report.anchor_fallbacks += 1;
                    }
                    report.records.push(row.record);
                }
                RowOutcome::Skipped(reason) => {
                    match &reason {
                        SkipReason::NoAnchor => tracing::trace!("Row {} skipped: {}", row_index, reason),
                        _ => tracing::debug!("Row {} skipped: {}", row_index, reason),
                    }
                    report.skipped.push(SkippedRow { row_index, reason });
                }
            }
        }

        tracing::debug!(
            "Extraction pass finished: {} rows, {} records, {} skipped",
            report.rows_seen(),
            report.records.len(),
            report.skipped.len()
        );
        report
    }
}

/// Extracts every fund record from `document`, in document order.
pub fn extract_records(document: &str) -> impl Iterator<Item = FundRecord> + '_ {
    document
        .split(ROW_MARKER)
        .skip(1)
        .filter_map(|segment| AnchorOffsetStrategy.extract_row(segment).into_record())
}

/// Reads the source document from disk.
pub fn read_document(path: &Path) -> Result<String, ExtractError> {
    std::fs::read_to_string(path).map_err(|source| ExtractError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}
