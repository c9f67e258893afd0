//! Error types for the MCP server.

use thiserror::Error;

use crate::protocol::JsonRpcError;

/// Result type for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;

/// Error type for MCP operations.
#[derive(Debug, Error)]
pub enum McpError {
    /// Failed to read or write a framed message.
    #[error("transport error: {0}")]
    Transport(String),

    /// Message was not a valid JSON-RPC request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No handler for the requested method.
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// Method or tool parameters did not match the schema.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// No tool registered under this name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl McpError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an invalid params error.
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    /// JSON-RPC error code reported for this error.
    pub fn code(&self) -> i64 {
        match self {
            Self::InvalidRequest(_) => JsonRpcError::INVALID_REQUEST,
            Self::MethodNotFound(_) => JsonRpcError::METHOD_NOT_FOUND,
            Self::InvalidParams(_) | Self::UnknownTool(_) => JsonRpcError::INVALID_PARAMS,
            Self::Json(_) => JsonRpcError::PARSE_ERROR,
            Self::Transport(_) | Self::Io(_) => JsonRpcError::INTERNAL_ERROR,
        }
    }
}

impl From<McpError> for JsonRpcError {
    fn from(err: McpError) -> Self {
        JsonRpcError::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(McpError::MethodNotFound("x".into()).code(), -32601);
        assert_eq!(McpError::invalid_params("x").code(), -32602);
        assert_eq!(McpError::UnknownTool("x".into()).code(), -32602);
        assert_eq!(McpError::InvalidRequest("x".into()).code(), -32600);
    }

    #[test]
    fn test_into_json_rpc_error() {
        let err: JsonRpcError = McpError::UnknownTool("delete_space".into()).into();
        assert_eq!(err.code, JsonRpcError::INVALID_PARAMS);
        assert_eq!(err.message, "unknown tool: delete_space");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: McpError = json_err.into();
        assert_eq!(err.code(), JsonRpcError::PARSE_ERROR);
    }
}
