//! Spaces API.

use serde_json::Value;

use crate::client::ConfluenceClient;
use crate::error::Result;

/// Expansions requested when fetching a single space.
const SPACE_EXPAND: &str = "description.plain,homepage";

/// Spaces API client.
pub struct SpacesApi {
    client: ConfluenceClient,
}

impl SpacesApi {
    pub(crate) fn new(client: ConfluenceClient) -> Self {
        Self { client }
    }

    /// List spaces starting at `start`.
    ///
    /// Returns the raw envelope so callers keep `start`/`limit`/`size`.
    pub async fn list(&self, start: u32, limit: u32) -> Result<Value> {
        self.client
            .get_with_query(&["space"], &[("start", start), ("limit", limit)])
            .await
    }

    /// Get a space by key.
    pub async fn get(&self, key: &str) -> Result<Value> {
        self.client
            .get_with_query(&["space", key], &[("expand", SPACE_EXPAND)])
            .await
    }
}
