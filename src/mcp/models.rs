// src/mcp/models.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::utils::error::McpError;

/// JSON-RPC 2.0 request envelope for a `tools/call`.
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: ToolCallParams<'a>,
}

#[derive(Debug, Serialize)]
pub struct ToolCallParams<'a> {
    pub name: &'a str,
    pub arguments: &'a Value,
}

impl<'a> JsonRpcRequest<'a> {
    pub fn tools_call(id: u64, name: &'a str, arguments: &'a Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: "tools/call",
            params: ToolCallParams { name, arguments },
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// One item of `result.content`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ContentItem {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A successful (non-error) JSON-RPC reply to a tool call.
#[derive(Debug, Clone)]
pub struct ToolCallResponse {
    /// The envelope exactly as received.
    pub envelope: Value,
    /// `result.content`, when the result has that shape.
    pub content: Option<Vec<ContentItem>>,
}

impl ToolCallResponse {
    pub fn from_envelope(envelope: Value) -> Result<Self, McpError> {
        let parsed: JsonRpcResponse = serde_json::from_value(envelope.clone())?;
        if let Some(error) = parsed.error {
            return Err(McpError::Rpc { code: error.code, message: error.message });
        }

        let content = parsed
            .result
            .as_ref()
            .and_then(|result| result.get("content"))
            .and_then(|content| serde_json::from_value::<Vec<ContentItem>>(content.clone()).ok());

        Ok(Self { envelope, content })
    }

    /// The text of the first content item, or a diagnostic string when the
    /// envelope doesn't have the expected shape.
    pub fn summary_text(&self) -> String {
        match self.content.as_deref() {
            Some([first, ..]) => first
                .text
                .clone()
                .unwrap_or_else(|| "No text in response".to_string()),
            _ => format!(
                "Unexpected response: {}",
                serde_json::to_string_pretty(&self.envelope).unwrap_or_else(|_| self.envelope.to_string())
            ),
        }
    }

    /// Parses the text of content item `index` as JSON.
    pub fn json_payload(&self, index: usize) -> Option<Value> {
        let text = self.content.as_ref()?.get(index)?.text.as_deref()?;
        serde_json::from_str(text).ok()
    }
}
