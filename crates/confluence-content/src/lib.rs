//! Content facade for the Confluence MCP adapter.
//!
//! [`ContentManager`] exposes one operation per supported action (spaces,
//! pages, search, labels, attachments, create, update). Each operation calls
//! through a [`ContentBackend`], reshapes the response into a compact form and
//! reports failures as a single [`ConfluenceError`].
//!
//! ```text
//! caller ─▶ ContentManager ─▶ ContentBackend (ConfluenceClient) ─▶ Confluence
//!        ◀─ reshaped result ◀─ raw JSON ◀────────────────────────────┘
//! ```
//!
//! The backend is an explicit dependency so tests can substitute a fake
//! service.

pub mod backend;
pub mod cql;
pub mod error;
pub mod manager;
pub mod normalize;

pub use backend::ContentBackend;
pub use cql::{CqlQuery, escape_cql_value};
pub use error::{ConfluenceError, Result};
pub use manager::{
    ContentManager, DEFAULT_CONTENT_TYPE, DEFAULT_MAX_RESULTS, DEFAULT_PAGE_LIMIT,
    DEFAULT_SPACE_LIMIT, NewPage, PageLookup, PageUpdate, resolve_representation,
};
pub use normalize::{ContentSummary, PageSummary, filter_content, filter_pages, remove_nulls};

pub use confluence_client::Representation;
