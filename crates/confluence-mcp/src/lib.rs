//! MCP (Model Context Protocol) server for Confluence content.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  McpServer                                                  │
//! │  - initialize, ping, tools/list, tools/call                 │
//! │  - content failures become isError tool results             │
//! └─────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ToolRegistry                                               │
//! │  - one Tool per ContentManager operation                    │
//! └─────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  StdioTransport                                             │
//! │  - newline-delimited or Content-Length framed JSON-RPC      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use confluence_mcp::{McpServer, ToolRegistry};
//!
//! let manager = ContentManager::new(Arc::new(client));
//! let server = McpServer::new(ToolRegistry::with_content_tools(manager));
//! server.serve_stdio().await?;
//! ```

pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use error::{McpError, Result};
pub use protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, ServerInfo, ToolContent, ToolInfo,
};
pub use server::McpServer;
pub use tools::{Tool, ToolError, ToolRegistry};
pub use transport::{Frame, Framing, MAX_MESSAGE_BYTES, StdioTransport};
