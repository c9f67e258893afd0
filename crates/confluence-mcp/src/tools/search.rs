//! CQL-backed search tools.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use confluence_content::ContentManager;

use super::{
    Tool, ToolError, default_content_type, default_max_results, output, parse_params,
};

/// Full-text search.
pub struct SearchContentTool {
    manager: ContentManager,
}

impl SearchContentTool {
    pub fn new(manager: ContentManager) -> Self {
        Self { manager }
    }
}

#[derive(Deserialize)]
struct SearchParams {
    query: String,
    #[serde(default = "default_content_type")]
    content_type: String,
    #[serde(default)]
    space_key: Option<String>,
    #[serde(default = "default_max_results")]
    max_results: u32,
}

#[async_trait]
impl Tool for SearchContentTool {
    fn name(&self) -> &str {
        "search_content"
    }

    fn description(&self) -> &str {
        "Search for Confluence content matching a query."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The text to search for"
                },
                "content_type": {
                    "type": "string",
                    "description": "The type of content to search for",
                    "default": default_content_type()
                },
                "space_key": {
                    "type": "string",
                    "description": "Optional space key to restrict search to"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return",
                    "default": default_max_results()
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: SearchParams = parse_params(self.name(), params)?;
        let results = self
            .manager
            .search_content(
                &params.query,
                &params.content_type,
                params.space_key.as_deref(),
                params.max_results,
            )
            .await?;
        output(results)
    }
}

/// Content carrying a label.
pub struct GetContentByLabelTool {
    manager: ContentManager,
}

impl GetContentByLabelTool {
    pub fn new(manager: ContentManager) -> Self {
        Self { manager }
    }
}

#[derive(Deserialize)]
struct LabelParams {
    label: String,
    #[serde(default)]
    space_key: Option<String>,
    #[serde(default = "default_content_type")]
    content_type: String,
    #[serde(default = "default_max_results")]
    max_results: u32,
}

#[async_trait]
impl Tool for GetContentByLabelTool {
    fn name(&self) -> &str {
        "get_content_by_label"
    }

    fn description(&self) -> &str {
        "Find Confluence content with a specific label."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "label": {
                    "type": "string",
                    "description": "The label to search for"
                },
                "space_key": {
                    "type": "string",
                    "description": "Optional space key to restrict search to"
                },
                "content_type": {
                    "type": "string",
                    "description": "The type of content to search for",
                    "default": default_content_type()
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return",
                    "default": default_max_results()
                }
            },
            "required": ["label"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: LabelParams = parse_params(self.name(), params)?;
        let results = self
            .manager
            .get_content_by_label(
                &params.label,
                params.space_key.as_deref(),
                &params.content_type,
                params.max_results,
            )
            .await?;
        output(results)
    }
}
