//! Page creation and update tools.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use confluence_content::{ContentManager, NewPage, PageUpdate, Representation};

use super::{Tool, ToolError, parse_params};

fn representation_schema() -> Value {
    let names: Vec<&str> = Representation::ALL.iter().map(|r| r.as_str()).collect();
    json!({
        "type": "string",
        "description": "Content representation format",
        "enum": names,
        "default": Representation::default().as_str()
    })
}

/// Creates a page, optionally as a child page.
pub struct CreatePageTool {
    manager: ContentManager,
}

impl CreatePageTool {
    pub fn new(manager: ContentManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for CreatePageTool {
    fn name(&self) -> &str {
        "create_page"
    }

    fn description(&self) -> &str {
        "Create a new page in Confluence."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "space_key": {
                    "type": "string",
                    "description": "The key of the space where the page will be created"
                },
                "title": {
                    "type": "string",
                    "description": "The title of the new page"
                },
                "body": {
                    "type": "string",
                    "description": "The content of the new page"
                },
                "parent_id": {
                    "type": "string",
                    "description": "Optional parent page ID if this is a child page"
                },
                "representation": representation_schema()
            },
            "required": ["space_key", "title", "body"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let page: NewPage = parse_params(self.name(), params)?;
        Ok(self.manager.create_page(&page).await?)
    }
}

/// Updates a page's title and/or body.
pub struct UpdatePageTool {
    manager: ContentManager,
}

impl UpdatePageTool {
    pub fn new(manager: ContentManager) -> Self {
        Self { manager }
    }
}

#[derive(Deserialize)]
struct UpdateParams {
    page_id: String,
    #[serde(flatten)]
    update: PageUpdate,
}

#[async_trait]
impl Tool for UpdatePageTool {
    fn name(&self) -> &str {
        "update_page"
    }

    fn description(&self) -> &str {
        "Update an existing Confluence page. Omitted title or body keep their current values."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "page_id": {
                    "type": "string",
                    "description": "The ID of the page to update"
                },
                "title": {
                    "type": "string",
                    "description": "The new title of the page"
                },
                "body": {
                    "type": "string",
                    "description": "The new content of the page"
                },
                "representation": representation_schema(),
                "version_comment": {
                    "type": "string",
                    "description": "Optional comment for the version history"
                }
            },
            "required": ["page_id"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: UpdateParams = parse_params(self.name(), params)?;
        Ok(self
            .manager
            .update_page(&params.page_id, &params.update)
            .await?)
    }
}
