//! CQL search API.

use crate::client::ConfluenceClient;
use crate::error::Result;
use crate::types::ResultEnvelope;

/// Search API client.
pub struct SearchApi {
    client: ConfluenceClient,
}

impl SearchApi {
    pub(crate) fn new(client: ConfluenceClient) -> Self {
        Self { client }
    }

    /// Run a CQL query and return one page of results.
    pub async fn cql(&self, cql: &str, limit: u32) -> Result<ResultEnvelope> {
        let limit = limit.to_string();
        self.client
            .get_with_query(&["search"], &[("cql", cql), ("limit", limit.as_str())])
            .await
    }
}
