//! Testing utilities and mock implementations
//!
//! Lets the server be tested without reaching the real Coles API or a real
//! MCP host.

pub mod mocks;
pub mod session;

pub use mocks::*;
pub use session::McpSession;
