//! Transport between the MCP host and the server
//!
//! The host launches this process and speaks newline-delimited JSON-RPC over
//! its stdin/stdout. rmcp does the framing; stdout carries protocol lines only.

use crate::server::McpServer;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Runtime;
use tracing::info;

/// How long shutdown waits for blocking-pool work before abandoning it
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("MCP session failed to initialize: {0}")]
    Initialize(String),
    #[error("MCP session task failed: {0}")]
    Session(String),
}

/// Serve MCP over the process's stdin/stdout until the host closes stdin
pub async fn serve_stdio(server: McpServer) -> Result<(), TransportError> {
    let service = server
        .serve(stdio())
        .await
        .map_err(|e| TransportError::Initialize(e.to_string()))?;

    let reason = service
        .waiting()
        .await
        .map_err(|e| TransportError::Session(e.to_string()))?;

    info!(reason = ?reason, "MCP session closed");
    Ok(())
}

/// Shut the runtime down without waiting on the stdin reader.
///
/// A pending stdin read holds a blocking-pool thread that cannot be
/// cancelled; a plain drop of the runtime after Ctrl-C would never return.
pub fn shutdown_runtime(runtime: Runtime) {
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_shutdown_does_not_wait_for_blocked_reader() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();

        // Stands in for a stdin read that never completes
        runtime.spawn_blocking(|| std::thread::sleep(Duration::from_secs(30)));
        std::thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        shutdown_runtime(runtime);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_error_display() {
        let error = TransportError::Initialize("connection closed: initialize request".into());
        assert_eq!(
            error.to_string(),
            "MCP session failed to initialize: connection closed: initialize request"
        );
    }
}
