//! Content operations over a [`ContentBackend`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use confluence_client::{
    CreatePageRequest, Error as ClientError, Representation, UpdatePageRequest,
};

use crate::backend::ContentBackend;
use crate::cql::CqlQuery;
use crate::error::{ConfluenceError, Result};
use crate::normalize::{
    ContentSummary, PageSummary, filter_content, filter_pages, lenient, remove_nulls, text,
};

/// Default number of spaces returned by [`ContentManager::list_spaces`].
pub const DEFAULT_SPACE_LIMIT: u32 = 50;
/// Default number of pages returned by [`ContentManager::list_pages_in_space`].
pub const DEFAULT_PAGE_LIMIT: u32 = 20;
/// Default number of search and label results.
pub const DEFAULT_MAX_RESULTS: u32 = 10;
/// Default content type for CQL queries.
pub const DEFAULT_CONTENT_TYPE: &str = "page";

const CHILD_PAGE_LIMIT: u32 = 25;
const PAGE_EXPAND: &str = "body.storage,version,space,ancestors,descendants.page";
const PAGE_BY_TITLE_EXPAND: &str = "body.storage,version,space,ancestors";
const VERSION_COMMENT_KEY: &str = "version-comment";

/// Outcome of a page lookup by ID.
///
/// A missing page is a value, not an error; it serializes as
/// `{"error": "No page found with ID: <id>"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageLookup {
    Found(Value),
    NotFound { error: String },
}

impl PageLookup {
    fn not_found(page_id: &str) -> Self {
        PageLookup::NotFound {
            error: format!("No page found with ID: {}", page_id),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PageLookup::Found(_))
    }
}

/// Parameters for creating a page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPage {
    pub space_key: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Body representation name; unknown names fall back to storage.
    #[serde(default)]
    pub representation: Option<String>,
}

/// Parameters for updating a page. Omitted or empty title and body keep the
/// stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub representation: Option<String>,
    #[serde(default)]
    pub version_comment: Option<String>,
}

/// Parse a representation name, falling back to storage.
pub fn resolve_representation(name: Option<&str>) -> Representation {
    match name {
        None => Representation::default(),
        Some(name) => name.parse().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to storage representation");
            Representation::default()
        }),
    }
}

/// Page fields read before an update.
#[derive(Debug, Default, Deserialize)]
struct CurrentPage {
    #[serde(default, deserialize_with = "text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    version: Option<CurrentVersion>,
}

#[derive(Debug, Default, Deserialize)]
struct CurrentVersion {
    #[serde(default, deserialize_with = "lenient")]
    number: Option<u64>,
}

impl CurrentPage {
    fn version_number(&self) -> u64 {
        self.version.as_ref().and_then(|v| v.number).unwrap_or(0)
    }
}

fn fail(context: String, source: ClientError) -> ConfluenceError {
    let err = ConfluenceError::with_source(context, source);
    tracing::error!("{}", err);
    err
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Facade exposing one operation per supported content action.
#[derive(Clone)]
pub struct ContentManager {
    backend: Arc<dyn ContentBackend>,
}

impl std::fmt::Debug for ContentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentManager").finish_non_exhaustive()
    }
}

impl ContentManager {
    pub fn new(backend: Arc<dyn ContentBackend>) -> Self {
        Self { backend }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Spaces
    // ─────────────────────────────────────────────────────────────────────────

    /// List spaces; the envelope is returned unmodified.
    pub async fn list_spaces(&self, limit: u32) -> Result<Value> {
        tracing::info!(limit, "retrieving spaces");
        let spaces = self
            .backend
            .list_spaces(0, limit)
            .await
            .map_err(|e| fail("Failed to retrieve spaces".to_string(), e))?;

        let count = spaces
            .get("results")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        tracing::info!(count, "retrieved spaces");
        Ok(spaces)
    }

    /// Total number of spaces visible to the token.
    pub async fn count_spaces(&self) -> Result<u64> {
        let envelope = self
            .backend
            .list_spaces(0, 1)
            .await
            .map_err(|e| fail("Error counting spaces".to_string(), e))?;
        Ok(envelope.get("size").and_then(Value::as_u64).unwrap_or(0))
    }

    pub async fn get_space(&self, space_key: &str) -> Result<Value> {
        let space = self
            .backend
            .get_space(space_key)
            .await
            .map_err(|e| fail(format!("Error getting space {}", space_key), e))?;
        Ok(remove_nulls(space))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pages
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_pages_in_space(
        &self,
        space_key: &str,
        limit: u32,
    ) -> Result<Vec<PageSummary>> {
        tracing::info!(space_key, limit, "getting pages in space");
        let pages = self
            .backend
            .list_pages_in_space(space_key, 0, limit)
            .await
            .map_err(|e| fail(format!("Error getting pages for space {}", space_key), e))?;
        Ok(filter_pages(pages))
    }

    /// Number of pages in a space. Any failure counts as zero.
    pub async fn count_pages_in_space(&self, space_key: &str) -> u64 {
        match self.backend.list_all_pages_in_space(space_key).await {
            Ok(pages) => pages.len() as u64,
            Err(e) => {
                tracing::warn!(space_key, error = %e, "error counting pages, reporting 0");
                0
            }
        }
    }

    /// Full page with body, version, space, ancestors and child pages.
    pub async fn get_page(&self, page_id: &str) -> Result<PageLookup> {
        tracing::info!(page_id, "getting page");
        let page = self
            .backend
            .get_page(page_id, Some(PAGE_EXPAND))
            .await
            .map_err(|e| fail(format!("Error fetching page with ID {}", page_id), e))?;

        Ok(match page {
            Some(page) => PageLookup::Found(remove_nulls(page)),
            None => {
                tracing::warn!(page_id, "page not found");
                PageLookup::not_found(page_id)
            }
        })
    }

    pub async fn get_page_by_title(&self, space_key: &str, title: &str) -> Result<Option<Value>> {
        self.backend
            .get_page_by_title(space_key, title, Some(PAGE_BY_TITLE_EXPAND))
            .await
            .map_err(|e| {
                fail(
                    format!("Error getting page '{}' in space {}", title, space_key),
                    e,
                )
            })
            .map(|page| page.map(remove_nulls))
    }

    pub async fn get_child_pages(&self, page_id: &str) -> Result<Vec<PageSummary>> {
        let children = self
            .backend
            .get_child_pages(page_id, 0, CHILD_PAGE_LIMIT)
            .await
            .map_err(|e| fail(format!("Error getting child pages for {}", page_id), e))?;
        Ok(filter_pages(children))
    }

    /// Ancestors of a page, root first; empty when the page is missing.
    pub async fn get_page_ancestors(&self, page_id: &str) -> Result<Vec<PageSummary>> {
        let page = self
            .backend
            .get_page(page_id, Some("ancestors"))
            .await
            .map_err(|e| fail(format!("Error getting ancestors for page {}", page_id), e))?;

        let ancestors = match page {
            Some(Value::Object(mut page)) => match page.remove("ancestors") {
                Some(Value::Array(ancestors)) => ancestors,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Ok(filter_pages(ancestors))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search and labels
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn search_content(
        &self,
        query: &str,
        content_type: &str,
        space_key: Option<&str>,
        max_results: u32,
    ) -> Result<Vec<ContentSummary>> {
        let cql = CqlQuery::of_type(content_type)
            .text(query)
            .space(space_key)
            .build();
        tracing::info!(%cql, "searching content");

        let results = self.backend.cql(&cql, max_results).await.map_err(|e| {
            fail(
                format!("Error searching content with query '{}'", query),
                e,
            )
        })?;
        tracing::info!(count = results.len(), "search complete");
        Ok(filter_content(results))
    }

    /// Labels of a page; the envelope is returned unmodified.
    pub async fn get_page_labels(&self, page_id: &str) -> Result<Value> {
        self.backend
            .get_labels(page_id)
            .await
            .map_err(|e| fail(format!("Error getting labels for page {}", page_id), e))
    }

    pub async fn get_content_by_label(
        &self,
        label: &str,
        space_key: Option<&str>,
        content_type: &str,
        max_results: u32,
    ) -> Result<Vec<ContentSummary>> {
        let cql = CqlQuery::of_type(content_type)
            .label(label)
            .space(space_key)
            .build();
        tracing::info!(%cql, "searching content by label");

        let results = self
            .backend
            .cql(&cql, max_results)
            .await
            .map_err(|e| fail(format!("Error getting content with label {}", label), e))?;
        Ok(filter_content(results))
    }

    pub async fn get_page_attachments(&self, page_id: &str) -> Result<Vec<Value>> {
        self.backend
            .get_attachments(page_id)
            .await
            .map_err(|e| fail(format!("Error getting attachments for page {}", page_id), e))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a page, optionally under a parent page.
    pub async fn create_page(&self, page: &NewPage) -> Result<Value> {
        let representation = resolve_representation(page.representation.as_deref());
        tracing::info!(
            space_key = %page.space_key,
            title = %page.title,
            parent_id = ?page.parent_id,
            "creating page"
        );

        let mut request =
            CreatePageRequest::new(&page.space_key, &page.title, &page.body, representation);
        if let Some(parent_id) = non_empty(page.parent_id.as_deref()) {
            request = request.with_parent(parent_id);
        }

        let created = self.backend.create_page(&request).await.map_err(|e| {
            fail(
                format!(
                    "Failed to create page '{}' in space '{}'",
                    page.title, page.space_key
                ),
                e,
            )
        })?;

        tracing::info!(page_id = ?created.get("id"), "created page");
        Ok(remove_nulls(created))
    }

    /// Update a page, reading the current version first.
    ///
    /// The new version is the current one plus one. A version comment is
    /// stored as the `version-comment` page property; failing to store it is
    /// logged and does not fail the update.
    pub async fn update_page(&self, page_id: &str, update: &PageUpdate) -> Result<Value> {
        let representation = resolve_representation(update.representation.as_deref());
        let context = || format!("Failed to update page '{}'", page_id);

        let current = self
            .backend
            .get_page(page_id, Some("version"))
            .await
            .map_err(|e| fail(context(), e))?
            .ok_or_else(|| {
                let err = ConfluenceError::new(format!(
                    "{}: Page with ID '{}' not found",
                    context(),
                    page_id
                ));
                tracing::error!("{}", err);
                err
            })?;

        let current = CurrentPage::deserialize(current).unwrap_or_default();
        let next_version = current.version_number() + 1;

        let title = match non_empty(update.title.as_deref()) {
            Some(title) => title.to_string(),
            None => current.title.unwrap_or_default(),
        };

        let body = match non_empty(update.body.as_deref()) {
            Some(body) => body.to_string(),
            None => self
                .current_body(page_id, representation)
                .await
                .map_err(|e| fail(context(), e))?,
        };

        tracing::info!(page_id, version = next_version, "updating page");
        let request = UpdatePageRequest::new(page_id, title, body, representation, next_version);
        let updated = self
            .backend
            .update_page(&request)
            .await
            .map_err(|e| fail(context(), e))?;

        if let Some(comment) = non_empty(update.version_comment.as_deref()) {
            if let Err(e) = self
                .backend
                .set_page_property(page_id, VERSION_COMMENT_KEY, json!({ "comment": comment }))
                .await
            {
                tracing::warn!(page_id, error = %e, "page updated but version comment was not stored");
            }
        }

        Ok(remove_nulls(updated))
    }

    /// Stored body of a page in the given representation, empty if absent.
    async fn current_body(
        &self,
        page_id: &str,
        representation: Representation,
    ) -> confluence_client::Result<String> {
        let expand = format!("body.{}", representation);
        let page = self.backend.get_page(page_id, Some(&expand)).await?;
        Ok(page
            .as_ref()
            .and_then(|p| p.get("body"))
            .and_then(|b| b.get(representation.as_str()))
            .and_then(|r| r.get("value"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_serialization() {
        let lookup = PageLookup::not_found("123");
        assert!(!lookup.is_found());
        assert_eq!(
            serde_json::to_value(&lookup).unwrap(),
            json!({"error": "No page found with ID: 123"})
        );
    }

    #[test]
    fn test_found_serializes_as_page() {
        let lookup = PageLookup::Found(json!({"id": "1"}));
        assert_eq!(serde_json::to_value(&lookup).unwrap(), json!({"id": "1"}));
    }

    #[test]
    fn test_resolve_representation() {
        assert_eq!(resolve_representation(None), Representation::Storage);
        assert_eq!(resolve_representation(Some("view")), Representation::View);
        assert_eq!(
            resolve_representation(Some("wiki")),
            Representation::Storage
        );
    }

    #[test]
    fn test_page_update_deserializes_partial() {
        let update: PageUpdate = serde_json::from_value(json!({"body": "<p>x</p>"})).unwrap();
        assert_eq!(update.body.as_deref(), Some("<p>x</p>"));
        assert!(update.title.is_none());
        assert!(update.version_comment.is_none());
    }

    #[test]
    fn test_current_page_tolerates_missing_version() {
        let page: CurrentPage = serde_json::from_value(json!({"title": "T"})).unwrap();
        assert_eq!(page.version_number(), 0);
    }

    #[test]
    fn test_current_page_keeps_title_when_version_is_odd() {
        let page: CurrentPage = serde_json::from_value(json!({
            "title": "Home",
            "version": {"number": null}
        }))
        .unwrap();
        assert_eq!(page.title.as_deref(), Some("Home"));
        assert_eq!(page.version_number(), 0);

        let page: CurrentPage = serde_json::from_value(json!({
            "title": "Home",
            "version": "seven"
        }))
        .unwrap();
        assert_eq!(page.title.as_deref(), Some("Home"));
        assert_eq!(page.version_number(), 0);
    }
}
