// src/extractors/mod.rs
pub mod clean;
pub mod fund;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use fund::{
    extract_records,
    AnchorOffsetStrategy,
    ExtractionReport,
    FundExtractor,
    FundRecord,
    RowOutcome,
    RowStrategy,
    SkipReason,
};
