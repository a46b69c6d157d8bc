// src/mcp/client.rs
use crate::mcp::models::{JsonRpcRequest, ToolCallResponse};
use crate::utils::error::McpError;
use reqwest::header;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const DEFAULT_MCP_URL: &str = "http://localhost:5000/mcp";
const ACCEPT_VALUE: &str = "application/json, text/event-stream";
const READINESS_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct McpClientConfig {
    /// Full URL of the `tools/call` endpoint.
    pub endpoint: String,
    /// Timeout applied to each call.
    pub timeout: Duration,
}

impl Default for McpClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_MCP_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Sequential JSON-RPC client for an MCP tool endpoint.
pub struct McpClient {
    config: McpClientConfig,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl McpClient {
    pub fn new(config: McpClientConfig) -> Result<Self, McpError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, client, next_id: AtomicU64::new(1) })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Calls `name` with `arguments` and returns the decoded reply.
    pub async fn call_tool(&self, name: &str, arguments: &Value) -> Result<ToolCallResponse, McpError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::tools_call(id, name, arguments);
        tracing::debug!("Calling tool {} (id {}) at {}", name, id, self.config.endpoint);

        let response = self.client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("HTTP error status: {} for tool {}", status, name);
            return Err(McpError::Http(status));
        }

        let is_event_stream = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("text/event-stream"))
            .unwrap_or(false);

        let body = response.text().await?;
        tracing::trace!("Received {} bytes for tool {}", body.len(), name);

        let envelope: Value = if is_event_stream {
            let data = last_event_data(&body)
                .ok_or_else(|| McpError::Parse("event stream carried no data".to_string()))?;
            serde_json::from_str(&data)?
        } else {
            serde_json::from_str(&body)?
        };

        ToolCallResponse::from_envelope(envelope)
    }

    /// Like `call_tool`, but never fails: errors come back as an `ERROR: ...` string.
    pub async fn call_tool_text(&self, name: &str, arguments: &Value) -> String {
        match self.call_tool(name, arguments).await {
            Ok(response) => response.summary_text(),
            Err(e) => {
                tracing::debug!("Tool {} failed: {}", name, e);
                format!("ERROR: {}", e)
            }
        }
    }

    /// Polls `probe_url` until the server answers at all, sleeping `interval`
    /// between failed attempts.
    pub async fn wait_until_ready(&self, probe_url: &str, attempts: u32, interval: Duration) -> Result<(), McpError> {
        for attempt in 1..=attempts {
            match self.client.get(probe_url).timeout(READINESS_PROBE_TIMEOUT).send().await {
                Ok(response) => {
                    tracing::info!("Server is ready ({} after {} attempt(s))", response.status(), attempt);
                    return Ok(());
                }
                Err(e) => {
                    tracing::debug!("Readiness attempt {}/{} failed: {}", attempt, attempts, e);
                    if attempt < attempts {
                        tokio::time::sleep(interval).await;
                    }
                }
            }
        }

        tracing::error!("Server never became ready!");
        Err(McpError::NotReady { url: probe_url.to_string(), attempts })
    }
}

/// The origin of `endpoint` (`scheme://host:port/`), used as the readiness probe.
pub fn default_probe_url(endpoint: &str) -> Result<String, McpError> {
    let url = reqwest::Url::parse(endpoint)
        .map_err(|e| McpError::Parse(format!("invalid endpoint URL '{}': {}", endpoint, e)))?;
    let origin = url
        .join("/")
        .map_err(|e| McpError::Parse(format!("invalid endpoint URL '{}': {}", endpoint, e)))?;
    Ok(origin.to_string())
}

/// Returns the `data:` payload of the last event in a `text/event-stream` body.
/// Multiple `data:` lines within one event are joined with newlines.
fn last_event_data(body: &str) -> Option<String> {
    let normalized = body.replace("\r\n", "\n");
    let mut last = None;

    for raw_event in normalized.split("\n\n") {
        let mut data = String::new();
        let mut has_data = false;

        for line in raw_event.lines() {
            if line.starts_with(':') {
                continue;
            }
            if let Some(value) = line.strip_prefix("data:") {
                if has_data {
                    data.push('\n');
                }
                data.push_str(value.strip_prefix(' ').unwrap_or(value));
                has_data = true;
            }
        }

        if has_data {
            last = Some(data);
        }
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(header_end) = find(&buf, b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
                let content_length = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Serves exactly one HTTP response and hands back the raw request it received.
    async fn serve_once(status: &'static str, content_type: &'static str, body: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                content_type,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{}/mcp", addr), handle)
    }

    fn client_for(endpoint: String) -> McpClient {
        McpClient::new(McpClientConfig { endpoint, timeout: Duration::from_secs(5) }).unwrap()
    }

    fn unused_local_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/mcp", addr)
    }

    #[tokio::test]
    async fn test_call_tool_text_returns_first_content_text() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"content": [{"type": "text", "text": "กองทุน RMF 5 อันดับแรก"}]}
        })
        .to_string();
        let (url, server) = serve_once("200 OK", "application/json", body).await;

        let client = client_for(url);
        let text = client.call_tool_text("get_rmf_fund_performance", &json!({"period": "ytd", "limit": 5})).await;
        assert_eq!(text, "กองทุน RMF 5 อันดับแรก");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /mcp HTTP/1.1"));
        assert!(request.to_lowercase().contains("accept: application/json, text/event-stream"));
        assert!(request.contains("\"method\":\"tools/call\""));
        assert!(request.contains("\"name\":\"get_rmf_fund_performance\""));
        assert!(request.contains("\"period\":\"ytd\""));
    }

    #[tokio::test]
    async fn test_event_stream_body_is_decoded() {
        let payload = json!({"jsonrpc": "2.0", "id": 1, "result": {"content": [{"type": "text", "text": "from sse"}]}});
        let body = format!("event: message\ndata: {}\n\n", payload);
        let (url, server) = serve_once("200 OK", "text/event-stream", body).await;

        let response = client_for(url).call_tool("get_rmf_funds", &json!({})).await.unwrap();
        assert_eq!(response.summary_text(), "from sse");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_error_status_is_reported() {
        let (url, server) = serve_once("500 Internal Server Error", "text/plain", "boom".to_string()).await;

        let text = client_for(url).call_tool_text("get_rmf_funds", &json!({})).await;
        assert!(text.starts_with("ERROR: HTTP error: 500"), "got {}", text);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unexpected_shape_falls_back_to_diagnostic() {
        let (url, server) = serve_once("200 OK", "application/json", json!({"jsonrpc": "2.0", "id": 1, "result": {}}).to_string()).await;

        let text = client_for(url).call_tool_text("search_rmf_funds", &json!({"limit": 3})).await;
        assert!(text.starts_with("Unexpected response: "), "got {}", text);
        server.await.unwrap();
    }

    #[test]
    fn test_unreachable_server_yields_error_string() {
        let client = client_for(unused_local_url());
        let text = tokio_test::block_on(client.call_tool_text("get_rmf_funds", &json!({"page": 1})));
        assert!(text.starts_with("ERROR: "), "got {}", text);
    }

    #[test]
    fn test_wait_until_ready_gives_up() {
        let url = unused_local_url();
        let client = client_for(url.clone());
        let result = tokio_test::block_on(client.wait_until_ready(&url, 2, Duration::from_millis(10)));
        match result {
            Err(McpError::NotReady { attempts, .. }) => assert_eq!(attempts, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wait_until_ready_accepts_any_response() {
        let (url, server) = serve_once("404 Not Found", "text/plain", String::new()).await;
        let probe = default_probe_url(&url).unwrap();

        client_for(url).wait_until_ready(&probe, 3, Duration::from_millis(10)).await.unwrap();
        let request = server.await.unwrap();
        assert!(request.starts_with("GET / HTTP/1.1"));
    }

    #[test]
    fn test_default_probe_url_is_origin() {
        assert_eq!(default_probe_url("http://localhost:5000/mcp").unwrap(), "http://localhost:5000/");
        assert_eq!(default_probe_url("https://example.com/api/mcp?x=1").unwrap(), "https://example.com/");
        assert!(default_probe_url("not a url").is_err());
    }

    #[test]
    fn test_last_event_data() {
        let body = ": keepalive\r\n\r\nevent: message\r\ndata: {\"a\":1}\r\n\r\ndata: {\"b\":\r\ndata: 2}\r\n\r\n";
        assert_eq!(last_event_data(body).as_deref(), Some("{\"b\":\n2}"));
        assert_eq!(last_event_data("event: ping\n\n"), None);
    }
}
