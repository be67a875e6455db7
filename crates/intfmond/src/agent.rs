//! Control-plane agent access.
//!
//! Defines the [`CounterSource`] trait the monitor core depends on, plus
//! [`AgentClient`], the production implementation speaking a line-delimited
//! JSON request/response protocol to the local control-plane agent over a
//! unix domain socket. The core never sees this serialization; it only
//! calls the trait.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{MonitorError, MonitorResult};
use crate::types::ErrorCounters;

/// RPC method names understood by the agent.
pub const METHOD_LIST_CONNECTED: &str = "intf.list_connected";
pub const METHOD_ERROR_COUNTERS: &str = "intf.error_counters";
pub const METHOD_ADMIN_DISABLE: &str = "intf.admin_disable";

/// Source of interface connectivity and error counter data.
#[async_trait]
pub trait CounterSource: Send + Sync {
    /// Lists the names of currently connected interfaces.
    async fn list_connected_interfaces(&self) -> MonitorResult<Vec<String>>;

    /// Reads `{fcs, symbol}` error counters for the named interfaces.
    /// Only interfaces the agent recognizes appear in the result.
    async fn read_error_counters(
        &self,
        names: &[String],
    ) -> MonitorResult<HashMap<String, ErrorCounters>>;

    /// Administratively shuts down an interface. Idempotent from the
    /// caller's perspective.
    async fn disable_interface(&self, name: &str) -> MonitorResult<()>;
}

#[derive(Debug, Deserialize)]
struct Response {
    id: u64,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Per-interface counter row as the agent reports it.
#[derive(Debug, Deserialize)]
struct CounterRow {
    fcs: u64,
    symbol: u64,
}

struct AgentConnection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    next_id: u64,
}

/// Client for the local control-plane agent.
///
/// The connection is established once at startup; a connect failure is
/// fatal before the poll loop is entered. Mid-loop RPC failures surface as
/// retryable fetch errors the loop absorbs.
pub struct AgentClient {
    endpoint: String,
    conn: Mutex<AgentConnection>,
}

impl AgentClient {
    /// Connects to the agent socket. Fails with a connection error when
    /// the agent is unreachable.
    pub async fn connect(socket_path: &Path) -> MonitorResult<Self> {
        let endpoint = socket_path.display().to_string();
        let stream = UnixStream::connect(socket_path)
            .await
            .map_err(|e| MonitorError::connection(&endpoint, e.to_string()))?;
        let (read_half, write_half) = stream.into_split();

        debug!(endpoint = %endpoint, "Connected to control-plane agent");

        Ok(Self {
            endpoint,
            conn: Mutex::new(AgentConnection {
                reader: BufReader::new(read_half),
                writer: write_half,
                next_id: 0,
            }),
        })
    }

    /// Returns the socket path this client dialed.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one request line and reads one response line. Returns the
    /// raw error string so callers can wrap it in the variant matching
    /// the operation.
    async fn rpc(&self, method: &str, params: Value) -> Result<Value, String> {
        let mut conn = self.conn.lock().await;
        conn.next_id += 1;
        let id = conn.next_id;

        let request = json!({ "id": id, "method": method, "params": params });
        let mut line = request.to_string();
        line.push('\n');

        conn.writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| format!("write: {}", e))?;

        let mut reply = String::new();
        let n = conn
            .reader
            .read_line(&mut reply)
            .await
            .map_err(|e| format!("read: {}", e))?;
        if n == 0 {
            return Err("agent closed the connection".to_string());
        }

        let response: Response =
            serde_json::from_str(reply.trim()).map_err(|e| format!("decode: {}", e))?;
        if response.id != id {
            return Err(format!(
                "response id {} does not match request id {}",
                response.id, id
            ));
        }
        if let Some(error) = response.error {
            return Err(error);
        }
        response.result.ok_or_else(|| "missing result".to_string())
    }
}

#[async_trait]
impl CounterSource for AgentClient {
    async fn list_connected_interfaces(&self) -> MonitorResult<Vec<String>> {
        let result = self
            .rpc(METHOD_LIST_CONNECTED, json!({}))
            .await
            .map_err(|e| MonitorError::fetch(METHOD_LIST_CONNECTED, e))?;
        serde_json::from_value(result)
            .map_err(|e| MonitorError::fetch(METHOD_LIST_CONNECTED, e.to_string()))
    }

    async fn read_error_counters(
        &self,
        names: &[String],
    ) -> MonitorResult<HashMap<String, ErrorCounters>> {
        let result = self
            .rpc(METHOD_ERROR_COUNTERS, json!({ "interfaces": names }))
            .await
            .map_err(|e| MonitorError::fetch(METHOD_ERROR_COUNTERS, e))?;
        let rows: HashMap<String, CounterRow> = serde_json::from_value(result)
            .map_err(|e| MonitorError::fetch(METHOD_ERROR_COUNTERS, e.to_string()))?;
        Ok(rows
            .into_iter()
            .map(|(name, row)| {
                (
                    name,
                    ErrorCounters {
                        fcs: row.fcs,
                        symbol: row.symbol,
                    },
                )
            })
            .collect())
    }

    async fn disable_interface(&self, name: &str) -> MonitorResult<()> {
        self.rpc(METHOD_ADMIN_DISABLE, json!({ "interface": name }))
            .await
            .map(|_| ())
            .map_err(|e| MonitorError::disable_command(name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::UnixListener;

    /// Minimal agent stub: answers the three monitor RPCs with canned data.
    async fn serve_one_client(listener: UnixListener) {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line).await.unwrap() == 0 {
                return;
            }
            let request: Value = serde_json::from_str(line.trim()).unwrap();
            let id = request["id"].as_u64().unwrap();
            let reply = match request["method"].as_str().unwrap() {
                METHOD_LIST_CONNECTED => {
                    json!({ "id": id, "result": ["Ethernet0", "Ethernet4"] })
                }
                METHOD_ERROR_COUNTERS => json!({
                    "id": id,
                    "result": {
                        "Ethernet0": { "fcs": 50, "symbol": 3 },
                        "Ethernet4": { "fcs": 0, "symbol": 0 },
                    }
                }),
                METHOD_ADMIN_DISABLE => {
                    if request["params"]["interface"] == "Ethernet4" {
                        json!({ "id": id, "result": true })
                    } else {
                        json!({ "id": id, "error": "unknown interface" })
                    }
                }
                other => json!({ "id": id, "error": format!("unknown method {}", other) }),
            };
            let mut out = reply.to_string();
            out.push('\n');
            write_half.write_all(out.as_bytes()).await.unwrap();
        }
    }

    async fn connect_stub() -> (AgentClient, tokio::task::JoinHandle<()>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.sock");
        let listener = UnixListener::bind(&path).unwrap();
        let server = tokio::spawn(serve_one_client(listener));
        let client = AgentClient::connect(&path).await.unwrap();
        (client, server, dir)
    }

    #[tokio::test]
    async fn test_connect_failure() {
        let dir = tempfile::tempdir().unwrap();
        let result = AgentClient::connect(&dir.path().join("missing.sock")).await;
        match result {
            Err(MonitorError::Connection { .. }) => {}
            other => panic!("Expected Connection error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_list_connected() {
        let (client, _server, _dir) = connect_stub().await;
        let names = client.list_connected_interfaces().await.unwrap();
        assert_eq!(names, vec!["Ethernet0", "Ethernet4"]);
    }

    #[tokio::test]
    async fn test_read_error_counters() {
        let (client, _server, _dir) = connect_stub().await;
        let names = vec!["Ethernet0".to_string(), "Ethernet4".to_string()];
        let counters = client.read_error_counters(&names).await.unwrap();
        assert_eq!(counters.len(), 2);
        assert_eq!(counters["Ethernet0"].fcs, 50);
        assert_eq!(counters["Ethernet0"].symbol, 3);
    }

    #[tokio::test]
    async fn test_disable_interface() {
        let (client, _server, _dir) = connect_stub().await;
        client.disable_interface("Ethernet4").await.unwrap();

        let result = client.disable_interface("Ethernet99").await;
        match result {
            Err(MonitorError::DisableCommand { interface, .. }) => {
                assert_eq!(interface, "Ethernet99");
            }
            other => panic!("Expected DisableCommand error, got {:?}", other),
        }
    }
}
