// src/mcp/mod.rs
pub mod client;
pub mod models;

pub use client::{default_probe_url, McpClient, McpClientConfig, DEFAULT_MCP_URL};
pub use models::ToolCallResponse;
