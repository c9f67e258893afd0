//! Page read tools.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use confluence_content::ContentManager;

use super::{Tool, ToolError, default_page_limit, output, parse_params};

#[derive(Deserialize)]
struct PageIdParams {
    page_id: String,
}

#[derive(Deserialize)]
struct SpaceKeyParams {
    space_key: String,
}

fn page_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "page_id": {
                "type": "string",
                "description": "The ID of the Confluence page"
            }
        },
        "required": ["page_id"]
    })
}

fn space_key_property() -> Value {
    json!({
        "type": "string",
        "description": "The key of the Confluence space"
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Space listings
// ─────────────────────────────────────────────────────────────────────────────

/// One page of the pages in a space, as summaries.
pub struct GetPagesInSpaceTool {
    manager: ContentManager,
}

impl GetPagesInSpaceTool {
    pub fn new(manager: ContentManager) -> Self {
        Self { manager }
    }
}

#[derive(Deserialize)]
struct PagesInSpaceParams {
    space_key: String,
    #[serde(default = "default_page_limit")]
    limit: u32,
}

#[async_trait]
impl Tool for GetPagesInSpaceTool {
    fn name(&self) -> &str {
        "get_pages_in_space"
    }

    fn description(&self) -> &str {
        "Retrieve pages from a specific Confluence space."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "space_key": space_key_property(),
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of pages to return",
                    "default": default_page_limit()
                }
            },
            "required": ["space_key"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: PagesInSpaceParams = parse_params(self.name(), params)?;
        output(
            self.manager
                .list_pages_in_space(&params.space_key, params.limit)
                .await?,
        )
    }
}

/// Number of pages in a space; zero when the listing fails.
pub struct GetPageCountForSpaceTool {
    manager: ContentManager,
}

impl GetPageCountForSpaceTool {
    pub fn new(manager: ContentManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for GetPageCountForSpaceTool {
    fn name(&self) -> &str {
        "get_page_count_for_space"
    }

    fn description(&self) -> &str {
        "Retrieve the count of pages for a specific Confluence space."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"space_key": space_key_property()},
            "required": ["space_key"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: SpaceKeyParams = parse_params(self.name(), params)?;
        output(self.manager.count_pages_in_space(&params.space_key).await)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Single pages
// ─────────────────────────────────────────────────────────────────────────────

/// Full page by ID.
pub struct GetPageTool {
    manager: ContentManager,
}

impl GetPageTool {
    pub fn new(manager: ContentManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for GetPageTool {
    fn name(&self) -> &str {
        "get_page"
    }

    fn description(&self) -> &str {
        "Retrieve details of a specific Confluence page, including its content."
    }

    fn parameters(&self) -> Value {
        page_id_schema()
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: PageIdParams = parse_params(self.name(), params)?;
        output(self.manager.get_page(&params.page_id).await?)
    }
}

/// Page by exact title within a space.
pub struct GetPageByTitleTool {
    manager: ContentManager,
}

impl GetPageByTitleTool {
    pub fn new(manager: ContentManager) -> Self {
        Self { manager }
    }
}

#[derive(Deserialize)]
struct TitleParams {
    space_key: String,
    title: String,
}

#[async_trait]
impl Tool for GetPageByTitleTool {
    fn name(&self) -> &str {
        "get_page_by_title"
    }

    fn description(&self) -> &str {
        "Retrieve a page by its title in a specific space. Returns null if not found."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "space_key": space_key_property(),
                "title": {
                    "type": "string",
                    "description": "The title of the page to find"
                }
            },
            "required": ["space_key", "title"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: TitleParams = parse_params(self.name(), params)?;
        output(
            self.manager
                .get_page_by_title(&params.space_key, &params.title)
                .await?,
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page hierarchy and metadata
// ─────────────────────────────────────────────────────────────────────────────

/// Direct children of a page.
pub struct GetChildPagesTool {
    manager: ContentManager,
}

impl GetChildPagesTool {
    pub fn new(manager: ContentManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for GetChildPagesTool {
    fn name(&self) -> &str {
        "get_child_pages"
    }

    fn description(&self) -> &str {
        "Retrieve child pages of a specific Confluence page."
    }

    fn parameters(&self) -> Value {
        page_id_schema()
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: PageIdParams = parse_params(self.name(), params)?;
        output(self.manager.get_child_pages(&params.page_id).await?)
    }
}

/// Ancestors of a page.
pub struct GetPageAncestorsTool {
    manager: ContentManager,
}

impl GetPageAncestorsTool {
    pub fn new(manager: ContentManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for GetPageAncestorsTool {
    fn name(&self) -> &str {
        "get_page_ancestors"
    }

    fn description(&self) -> &str {
        "Retrieve ancestors of a specific Confluence page."
    }

    fn parameters(&self) -> Value {
        page_id_schema()
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: PageIdParams = parse_params(self.name(), params)?;
        output(self.manager.get_page_ancestors(&params.page_id).await?)
    }
}

pub struct GetPageLabelsTool {
    manager: ContentManager,
}

impl GetPageLabelsTool {
    pub fn new(manager: ContentManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for GetPageLabelsTool {
    fn name(&self) -> &str {
        "get_page_labels"
    }

    fn description(&self) -> &str {
        "Retrieve labels for a specific Confluence page."
    }

    fn parameters(&self) -> Value {
        page_id_schema()
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: PageIdParams = parse_params(self.name(), params)?;
        Ok(self.manager.get_page_labels(&params.page_id).await?)
    }
}

pub struct GetPageAttachmentsTool {
    manager: ContentManager,
}

impl GetPageAttachmentsTool {
    pub fn new(manager: ContentManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for GetPageAttachmentsTool {
    fn name(&self) -> &str {
        "get_page_attachments"
    }

    fn description(&self) -> &str {
        "Retrieve attachments for a specific Confluence page."
    }

    fn parameters(&self) -> Value {
        page_id_schema()
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: PageIdParams = parse_params(self.name(), params)?;
        output(self.manager.get_page_attachments(&params.page_id).await?)
    }
}
