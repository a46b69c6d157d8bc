// src/lib.rs
pub mod utils;
pub mod extractors;
pub mod storage;
pub mod mcp;
pub mod smoke;
