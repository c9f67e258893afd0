//! Content API: pages, children, labels, attachments and properties.

use serde_json::Value;

use crate::client::ConfluenceClient;
use crate::error::Result;
use crate::types::{CreatePageRequest, PropertyRequest, ResultEnvelope, UpdatePageRequest};

/// Batch size used when walking every page of a space.
pub const PAGE_BATCH_SIZE: u32 = 100;

/// Content API client.
pub struct ContentApi {
    client: ConfluenceClient,
}

impl ContentApi {
    pub(crate) fn new(client: ConfluenceClient) -> Self {
        Self { client }
    }

    /// Get a content item by ID.
    ///
    /// `expand` names the nested sections to include, e.g.
    /// `"body.storage,version,space"`. A 404 yields `Ok(None)`.
    pub async fn get(&self, id: &str, expand: Option<&str>) -> Result<Option<Value>> {
        let path = ["content", id];
        let result = match expand {
            Some(expand) => self.client.get_with_query(&path, &[("expand", expand)]).await,
            None => self.client.get(&path).await,
        };

        match result {
            Ok(page) => Ok(Some(page)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Find a page by exact title within a space.
    pub async fn get_by_title(
        &self,
        space_key: &str,
        title: &str,
        expand: Option<&str>,
    ) -> Result<Option<Value>> {
        let mut query = vec![
            ("type", "page"),
            ("spaceKey", space_key),
            ("title", title),
            ("limit", "1"),
        ];
        if let Some(expand) = expand {
            query.push(("expand", expand));
        }

        let envelope: ResultEnvelope = self.client.get_with_query(&["content"], &query).await?;
        Ok(envelope.results.into_iter().next())
    }

    /// List current pages of a space, one page of results.
    pub async fn list_in_space(
        &self,
        space_key: &str,
        start: u32,
        limit: u32,
    ) -> Result<ResultEnvelope> {
        let start = start.to_string();
        let limit = limit.to_string();
        self.client
            .get_with_query(
                &["content"],
                &[
                    ("type", "page"),
                    ("status", "current"),
                    ("spaceKey", space_key),
                    ("start", start.as_str()),
                    ("limit", limit.as_str()),
                ],
            )
            .await
    }

    /// List every current page of a space by following the `next` links.
    pub async fn list_all_in_space(&self, space_key: &str) -> Result<Vec<Value>> {
        let mut pages = Vec::new();
        let mut start = 0u32;

        loop {
            let envelope = self.list_in_space(space_key, start, PAGE_BATCH_SIZE).await?;
            let fetched = envelope.results.len();
            let has_next = envelope.has_next();
            pages.extend(envelope.results);

            if fetched == 0 || !has_next {
                break;
            }
            start += fetched as u32;
            tracing::trace!(space_key, start, "fetching next batch of pages");
        }

        Ok(pages)
    }

    /// List the direct child pages of a page.
    pub async fn children(&self, id: &str, start: u32, limit: u32) -> Result<ResultEnvelope> {
        self.client
            .get_with_query(
                &["content", id, "child", "page"],
                &[("start", start), ("limit", limit)],
            )
            .await
    }

    /// Get the labels of a content item.
    pub async fn labels(&self, id: &str) -> Result<Value> {
        self.client.get(&["content", id, "label"]).await
    }

    /// Get the attachments of a content item.
    pub async fn attachments(&self, id: &str) -> Result<ResultEnvelope> {
        self.client
            .get(&["content", id, "child", "attachment"])
            .await
    }

    /// Create a page.
    pub async fn create(&self, request: &CreatePageRequest) -> Result<Value> {
        self.client.post(&["content"], request).await
    }

    /// Update a page. The request must carry the next version number.
    pub async fn update(&self, request: &UpdatePageRequest) -> Result<Value> {
        self.client
            .put(&["content", request.id.as_str()], request)
            .await
    }

    /// Set a content property.
    pub async fn set_property(&self, id: &str, key: &str, value: Value) -> Result<Value> {
        let request = PropertyRequest {
            key: key.to_string(),
            value,
        };
        self.client
            .post(&["content", id, "property"], &request)
            .await
    }
}
