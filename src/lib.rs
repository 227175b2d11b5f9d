//! Coles MCP server
//!
//! Exposes Coles product search, product detail lookup and slug construction
//! as Model Context Protocol tools over stdio.
//!
//! # Overview
//!
//! - [`api`]: client for the Coles `_next/data` JSON endpoints
//! - [`tools`]: the three tools and the registry that validates and runs them
//! - [`server`]: rmcp `ServerHandler` answering `initialize`, `tools/list` and
//!   `tools/call`
//! - [`transport`]: stdio serving and runtime shutdown
//!
//! # Quick Start
//!
//! ```rust
//! use coles_mcp::api::build_slug;
//!
//! let slug = build_slug("Coles", "Full Cream Milk", "3L", "8150288");
//! assert_eq!(slug, "coles-full-cream-milk-3l-8150288");
//! ```
//!
//! ```no_run
//! use coles_mcp::{api::ColesClient, config::ApiConfig};
//!
//! # async fn example() -> Result<(), coles_mcp::api::ApiError> {
//! let client = ColesClient::new(&ApiConfig::default())?;
//! let results = client.search("milk").await?;
//! println!("{results}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod observability;
pub mod server;
pub mod testing;
pub mod tools;
pub mod transport;

pub use api::{ApiError, ColesClient};
pub use config::{ApiConfig, AppConfig, ConfigError};
pub use error::{AppError, AppResult};
pub use server::McpServer;
pub use tools::{Tool, ToolDescription, ToolError, ToolSystem};
