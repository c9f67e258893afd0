//! Capability interface the facade needs from the remote service.

use async_trait::async_trait;
use serde_json::Value;

use confluence_client::{ConfluenceClient, CreatePageRequest, Result, UpdatePageRequest};

/// Remote content service operations used by [`crate::ContentManager`].
///
/// Implemented by [`ConfluenceClient`]; tests provide in-memory fakes.
#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// List spaces, returning the raw paginated envelope.
    async fn list_spaces(&self, start: u32, limit: u32) -> Result<Value>;

    /// Get a space by key.
    async fn get_space(&self, key: &str) -> Result<Value>;

    /// One page of the pages in a space.
    async fn list_pages_in_space(&self, space_key: &str, start: u32, limit: u32)
    -> Result<Vec<Value>>;

    /// Every page in a space.
    async fn list_all_pages_in_space(&self, space_key: &str) -> Result<Vec<Value>>;

    /// Get a page by ID with the given expansions; `None` when it does not exist.
    async fn get_page(&self, page_id: &str, expand: Option<&str>) -> Result<Option<Value>>;

    /// Find a page by title within a space.
    async fn get_page_by_title(
        &self,
        space_key: &str,
        title: &str,
        expand: Option<&str>,
    ) -> Result<Option<Value>>;

    /// Direct child pages of a page.
    async fn get_child_pages(&self, page_id: &str, start: u32, limit: u32) -> Result<Vec<Value>>;

    /// Run a CQL query, returning the result items.
    async fn cql(&self, cql: &str, limit: u32) -> Result<Vec<Value>>;

    /// Labels of a page, as returned by the service.
    async fn get_labels(&self, page_id: &str) -> Result<Value>;

    /// Attachment records of a page.
    async fn get_attachments(&self, page_id: &str) -> Result<Vec<Value>>;

    /// Create a page.
    async fn create_page(&self, request: &CreatePageRequest) -> Result<Value>;

    /// Update a page with an explicit version number.
    async fn update_page(&self, request: &UpdatePageRequest) -> Result<Value>;

    /// Set a page property.
    async fn set_page_property(&self, page_id: &str, key: &str, value: Value) -> Result<Value>;
}

#[async_trait]
impl ContentBackend for ConfluenceClient {
    async fn list_spaces(&self, start: u32, limit: u32) -> Result<Value> {
        self.spaces().list(start, limit).await
    }

    async fn get_space(&self, key: &str) -> Result<Value> {
        self.spaces().get(key).await
    }

    async fn list_pages_in_space(
        &self,
        space_key: &str,
        start: u32,
        limit: u32,
    ) -> Result<Vec<Value>> {
        Ok(self
            .content()
            .list_in_space(space_key, start, limit)
            .await?
            .results)
    }

    async fn list_all_pages_in_space(&self, space_key: &str) -> Result<Vec<Value>> {
        self.content().list_all_in_space(space_key).await
    }

    async fn get_page(&self, page_id: &str, expand: Option<&str>) -> Result<Option<Value>> {
        self.content().get(page_id, expand).await
    }

    async fn get_page_by_title(
        &self,
        space_key: &str,
        title: &str,
        expand: Option<&str>,
    ) -> Result<Option<Value>> {
        self.content().get_by_title(space_key, title, expand).await
    }

    async fn get_child_pages(&self, page_id: &str, start: u32, limit: u32) -> Result<Vec<Value>> {
        Ok(self.content().children(page_id, start, limit).await?.results)
    }

    async fn cql(&self, cql: &str, limit: u32) -> Result<Vec<Value>> {
        Ok(self.search().cql(cql, limit).await?.results)
    }

    async fn get_labels(&self, page_id: &str) -> Result<Value> {
        self.content().labels(page_id).await
    }

    async fn get_attachments(&self, page_id: &str) -> Result<Vec<Value>> {
        Ok(self.content().attachments(page_id).await?.results)
    }

    async fn create_page(&self, request: &CreatePageRequest) -> Result<Value> {
        self.content().create(request).await
    }

    async fn update_page(&self, request: &UpdatePageRequest) -> Result<Value> {
        self.content().update(request).await
    }

    async fn set_page_property(&self, page_id: &str, key: &str, value: Value) -> Result<Value> {
        self.content().set_property(page_id, key, value).await
    }
}
