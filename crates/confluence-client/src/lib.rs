//! HTTP client for the Confluence REST API.
//!
//! This crate provides a typed client for the subset of the Confluence
//! Server/Data Center REST API (`/rest/api`) used by the MCP adapter,
//! authenticated with a personal access token.
//!
//! # Example
//!
//! ```no_run
//! use confluence_client::{ConfluenceClient, Result};
//!
//! # async fn example() -> Result<()> {
//! // Validates the settings, then checks reachability with a one-space listing
//! let client = ConfluenceClient::builder()
//!     .base_url("https://wiki.example.com")
//!     .token("personal-access-token")
//!     .connect()
//!     .await?;
//!
//! let spaces = client.spaces().list(0, 10).await?;
//! println!("{} spaces", spaces["size"]);
//!
//! if let Some(page) = client.content().get("12345", Some("body.storage,version")).await? {
//!     println!("{}", page["title"]);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Spaces**: list, get by key
//! - **Content**: get by id or title, list in space, children, labels,
//!   attachments, create, update, page properties
//! - **Search**: CQL queries

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientBuilder, ConfluenceClient};
pub use error::{Error, Result};
pub use types::*;
