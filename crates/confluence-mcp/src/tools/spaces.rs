//! Space tools.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use confluence_content::ContentManager;

use super::{Tool, ToolError, default_space_limit, output, parse_params};

/// Lists spaces visible to the token.
pub struct GetSpacesTool {
    manager: ContentManager,
}

impl GetSpacesTool {
    pub fn new(manager: ContentManager) -> Self {
        Self { manager }
    }
}

#[derive(Deserialize)]
struct GetSpacesParams {
    #[serde(default = "default_space_limit")]
    limit: u32,
}

#[async_trait]
impl Tool for GetSpacesTool {
    fn name(&self) -> &str {
        "get_spaces"
    }

    fn description(&self) -> &str {
        "Retrieve all available Confluence spaces."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of spaces to return",
                    "default": default_space_limit()
                }
            }
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: GetSpacesParams = parse_params(self.name(), params)?;
        Ok(self.manager.list_spaces(params.limit).await?)
    }
}

/// Counts spaces.
pub struct GetSpaceCountTool {
    manager: ContentManager,
}

impl GetSpaceCountTool {
    pub fn new(manager: ContentManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for GetSpaceCountTool {
    fn name(&self) -> &str {
        "get_space_count"
    }

    fn description(&self) -> &str {
        "Retrieve the count of all active Confluence spaces."
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _params: Value) -> Result<Value, ToolError> {
        output(self.manager.count_spaces().await?)
    }
}

/// Details of one space.
pub struct GetSpaceTool {
    manager: ContentManager,
}

impl GetSpaceTool {
    pub fn new(manager: ContentManager) -> Self {
        Self { manager }
    }
}

#[derive(Deserialize)]
struct SpaceKeyParams {
    space_key: String,
}

#[async_trait]
impl Tool for GetSpaceTool {
    fn name(&self) -> &str {
        "get_space"
    }

    fn description(&self) -> &str {
        "Retrieve details for a specific Confluence space."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "space_key": {
                    "type": "string",
                    "description": "The key of the Confluence space"
                }
            },
            "required": ["space_key"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: SpaceKeyParams = parse_params(self.name(), params)?;
        Ok(self.manager.get_space(&params.space_key).await?)
    }
}
