//! In-memory MCP session
//!
//! Serves an [`McpServer`] over a duplex pipe and speaks raw JSON-RPC lines
//! to it, so tests see exactly what a host would read from stdout.

use crate::server::McpServer;
use rmcp::ServiceExt;
use serde_json::{json, Value};
use std::io;
use tokio::io::{
    AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf,
};
use tokio::task::JoinHandle;
use tracing::debug;

const PIPE_CAPACITY: usize = 64 * 1024;

pub struct McpSession {
    writer: WriteHalf<DuplexStream>,
    lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
    server: JoinHandle<()>,
}

impl McpSession {
    /// Start serving `server`; no handshake is sent
    pub fn connect(server: McpServer) -> Self {
        let (client_io, server_io) = tokio::io::duplex(PIPE_CAPACITY);
        let server = tokio::spawn(async move {
            match server.serve(server_io).await {
                Ok(service) => {
                    let reason = service.waiting().await;
                    debug!(reason = ?reason, "Test session closed");
                }
                Err(e) => debug!(error = %e, "Test session ended before initialization"),
            }
        });

        let (reader, writer) = tokio::io::split(client_io);
        Self {
            writer,
            lines: BufReader::new(reader).lines(),
            server,
        }
    }

    /// Connect and complete the `initialize` handshake; returns the
    /// `initialize` response
    pub async fn initialized(server: McpServer) -> io::Result<(Self, Value)> {
        let mut session = Self::connect(server);
        let response = session
            .request(
                0,
                "initialize",
                json!({
                    "protocolVersion": "2025-06-18",
                    "capabilities": {},
                    "clientInfo": {"name": "coles-mcp-tests", "version": "0.0.0"}
                }),
            )
            .await?;
        session.notify("notifications/initialized").await?;
        Ok((session, response))
    }

    /// Write one message as a single line
    pub async fn send(&mut self, message: &Value) -> io::Result<()> {
        let mut line = serde_json::to_vec(message)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.writer.flush().await
    }

    /// Next message from the server; `None` once the server closes the pipe
    pub async fn receive(&mut self) -> io::Result<Option<Value>> {
        match self.lines.next_line().await? {
            Some(line) => Ok(Some(serde_json::from_str(&line)?)),
            None => Ok(None),
        }
    }

    /// Send a request and wait for the response carrying the same id.
    /// `Value::Null` params are omitted.
    pub async fn request(&mut self, id: u64, method: &str, params: Value) -> io::Result<Value> {
        let mut message = json!({"jsonrpc": "2.0", "id": id, "method": method});
        if !params.is_null() {
            message["params"] = params;
        }
        self.send(&message).await?;

        while let Some(message) = self.receive().await? {
            if message["id"] == json!(id) {
                return Ok(message);
            }
        }
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("server closed the session before answering request {id}"),
        ))
    }

    pub async fn notify(&mut self, method: &str) -> io::Result<()> {
        self.send(&json!({"jsonrpc": "2.0", "method": method})).await
    }

    pub async fn call_tool(&mut self, id: u64, name: &str, arguments: Value) -> io::Result<Value> {
        self.request(
            id,
            "tools/call",
            json!({"name": name, "arguments": arguments}),
        )
        .await
    }

    /// Close the input side, collect anything the server still writes and
    /// wait for it to stop
    pub async fn close(mut self) -> Vec<Value> {
        let mut remaining = Vec::new();
        if self.writer.shutdown().await.is_ok() {
            while let Ok(Some(message)) = self.receive().await {
                remaining.push(message);
            }
        }
        let _ = self.server.await;
        remaining
    }
}
