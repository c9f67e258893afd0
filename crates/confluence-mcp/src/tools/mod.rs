//! Tools exposed over MCP, one per content operation.
//!
//! Each tool declares a JSON Schema for its arguments and maps a call onto a
//! [`ContentManager`] operation. Argument problems are reported as
//! [`ToolError::InvalidArguments`]; content failures keep their message so
//! the server can hand it back as an error result.

mod pages;
mod search;
mod spaces;
mod write;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use confluence_content::{ConfluenceError, ContentManager};

use crate::protocol::ToolInfo;

pub use pages::{
    GetChildPagesTool, GetPageAncestorsTool, GetPageAttachmentsTool, GetPageByTitleTool,
    GetPageCountForSpaceTool, GetPageLabelsTool, GetPageTool, GetPagesInSpaceTool,
};
pub use search::{GetContentByLabelTool, SearchContentTool};
pub use spaces::{GetSpaceCountTool, GetSpaceTool, GetSpacesTool};
pub use write::{CreatePageTool, UpdatePageTool};

// ─────────────────────────────────────────────────────────────────────────────
// Tool Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Failure of a tool call.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Arguments did not match the tool's schema.
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    /// The content operation failed.
    #[error(transparent)]
    Content(#[from] ConfluenceError),

    /// The result could not be rendered as JSON.
    #[error("failed to render result: {0}")]
    Output(#[from] serde_json::Error),
}

/// A callable tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name.
    fn name(&self) -> &str;

    /// What the tool does, shown to the caller.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's arguments.
    fn parameters(&self) -> Value;

    /// Run the tool with arguments matching [`Tool::parameters`].
    async fn execute(&self, params: Value) -> Result<Value, ToolError>;
}

/// Deserialize tool arguments; absent arguments read as an empty object.
pub(crate) fn parse_params<T: DeserializeOwned>(tool: &str, params: Value) -> Result<T, ToolError> {
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(params).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn output<T: Serialize>(value: T) -> Result<Value, ToolError> {
    Ok(serde_json::to_value(value)?)
}

pub(crate) fn default_space_limit() -> u32 {
    confluence_content::DEFAULT_SPACE_LIMIT
}

pub(crate) fn default_page_limit() -> u32 {
    confluence_content::DEFAULT_PAGE_LIMIT
}

pub(crate) fn default_max_results() -> u32 {
    confluence_content::DEFAULT_MAX_RESULTS
}

pub(crate) fn default_content_type() -> String {
    confluence_content::DEFAULT_CONTENT_TYPE.to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Tools by name, kept in registration order.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every content tool bound to `manager`.
    pub fn with_content_tools(manager: ContentManager) -> Self {
        let mut registry = Self::new();
        registry.register(CreatePageTool::new(manager.clone()));
        registry.register(UpdatePageTool::new(manager.clone()));
        registry.register(GetSpacesTool::new(manager.clone()));
        registry.register(GetSpaceCountTool::new(manager.clone()));
        registry.register(GetSpaceTool::new(manager.clone()));
        registry.register(GetPagesInSpaceTool::new(manager.clone()));
        registry.register(GetPageCountForSpaceTool::new(manager.clone()));
        registry.register(GetPageTool::new(manager.clone()));
        registry.register(GetPageByTitleTool::new(manager.clone()));
        registry.register(GetChildPagesTool::new(manager.clone()));
        registry.register(GetPageAncestorsTool::new(manager.clone()));
        registry.register(SearchContentTool::new(manager.clone()));
        registry.register(GetPageLabelsTool::new(manager.clone()));
        registry.register(GetContentByLabelTool::new(manager.clone()));
        registry.register(GetPageAttachmentsTool::new(manager));
        registry
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let tool: Arc<dyn Tool> = Arc::new(tool);
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// Get all tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Definitions for `tools/list`.
    pub fn list(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.parameters(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the arguments"
        }

        fn parameters(&self) -> Value {
            json!({"type": "object"})
        }

        async fn execute(&self, params: Value) -> Result<Value, ToolError> {
            Ok(params)
        }
    }

    #[derive(Debug, Deserialize)]
    struct Params {
        page_id: String,
        #[serde(default = "default_page_limit")]
        limit: u32,
    }

    #[test]
    fn test_parse_params_defaults() {
        let params: Params = parse_params("t", json!({"page_id": "1"})).unwrap();
        assert_eq!(params.page_id, "1");
        assert_eq!(params.limit, 20);
    }

    #[test]
    fn test_parse_params_missing_field() {
        let err = parse_params::<Params>("get_page", Value::Null).unwrap_err();
        match err {
            ToolError::InvalidArguments { tool, message } => {
                assert_eq!(tool, "get_page");
                assert!(message.contains("page_id"));
            }
            other => panic!("expected invalid arguments, got {other:?}"),
        }
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);
        registry.register(EchoTool);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.list()[0].description, "Echo the arguments");
    }
}
