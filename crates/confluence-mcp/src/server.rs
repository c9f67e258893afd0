//! Request dispatch and the stdio serve loop.

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::error::{McpError, Result};
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JSONRPC_VERSION,
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, ListToolsResult, MCP_PROTOCOL_VERSION,
    ServerCapabilities, ServerInfo, ToolsCapability,
};
use crate::tools::{ToolError, ToolRegistry};
use crate::transport::{Frame, StdioTransport};

/// MCP server answering one message at a time.
#[derive(Debug)]
pub struct McpServer {
    tools: ToolRegistry,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(tools: ToolRegistry) -> Self {
        Self {
            tools,
            info: ServerInfo::default(),
        }
    }

    /// Override the name and version reported by `initialize`.
    pub fn with_info(mut self, info: ServerInfo) -> Self {
        self.info = info;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Handle one raw message. Returns `None` when no reply is due.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "invalid JSON message");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(JsonRpcError::PARSE_ERROR, format!("Parse error: {}", e)),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                let err = McpError::InvalidRequest(e.to_string());
                return Some(JsonRpcResponse::failure(id, err.into()));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            let err = McpError::InvalidRequest(format!(
                "unsupported jsonrpc version '{}'",
                request.jsonrpc
            ));
            return Some(JsonRpcResponse::failure(id, err.into()));
        }

        self.handle_request(request).await
    }

    /// Handle a parsed request. Notifications never get a reply.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            match request.method.as_str() {
                "notifications/initialized" => tracing::info!("client initialized"),
                method => tracing::debug!(method, "ignoring notification"),
            }
            return None;
        };

        tracing::debug!(method = %request.method, "handling request");
        Some(match self.dispatch(&request.method, request.params).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                tracing::warn!(method = %request.method, error = %e, "request failed");
                JsonRpcResponse::failure(id, e.into())
            }
        })
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value> {
        match method {
            "initialize" => {
                let params: InitializeParams = params
                    .map(serde_json::from_value)
                    .transpose()
                    .map_err(|e| McpError::invalid_params(e.to_string()))?
                    .unwrap_or_default();
                let result = InitializeResult {
                    protocol_version: params
                        .protocol_version
                        .unwrap_or_else(|| MCP_PROTOCOL_VERSION.to_string()),
                    capabilities: ServerCapabilities {
                        tools: Some(ToolsCapability::default()),
                    },
                    server_info: self.info.clone(),
                };
                Ok(serde_json::to_value(result)?)
            }
            "ping" => Ok(json!({})),
            "tools/list" => Ok(serde_json::to_value(ListToolsResult {
                tools: self.tools.list(),
            })?),
            "tools/call" => {
                let params: CallToolParams = params
                    .ok_or_else(|| McpError::invalid_params("missing tools/call params"))
                    .and_then(|p| {
                        serde_json::from_value(p).map_err(|e| McpError::invalid_params(e.to_string()))
                    })?;
                let result = self
                    .call_tool(&params.name, params.arguments.unwrap_or(Value::Null))
                    .await?;
                Ok(serde_json::to_value(result)?)
            }
            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }

    /// Run a tool by name.
    ///
    /// Content failures become an error result rather than a protocol error;
    /// unknown tools and bad arguments are protocol errors.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<CallToolResult> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))?;

        tracing::info!(tool = name, "calling tool");
        match tool.execute(arguments).await {
            Ok(value) => Ok(CallToolResult::json(&value)),
            Err(ToolError::InvalidArguments { message, .. }) => {
                Err(McpError::InvalidParams(message))
            }
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool call failed");
                Ok(CallToolResult::error(e.to_string()))
            }
        }
    }

    /// Serve messages until the input closes.
    ///
    /// Malformed input is answered with a parse error and the loop goes on.
    pub async fn serve<R, W>(&self, transport: &mut StdioTransport<R, W>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        while let Some(frame) = transport.read_frame().await? {
            let framing = frame.framing();
            let response = match frame {
                Frame::Message { body, .. } => self.handle_message(&body).await,
                Frame::Malformed { reason, .. } => {
                    tracing::warn!(%reason, "malformed MCP input");
                    Some(JsonRpcResponse::failure(
                        Value::Null,
                        JsonRpcError::new(
                            JsonRpcError::PARSE_ERROR,
                            format!("Parse error: {}", reason),
                        ),
                    ))
                }
            };
            if let Some(response) = response {
                let body = serde_json::to_string(&response)?;
                transport.write_frame(&body, framing).await?;
            }
        }
        tracing::info!("input closed, stopping MCP server");
        Ok(())
    }

    /// Serve on stdin/stdout until EOF or Ctrl-C.
    pub async fn serve_stdio(&self) -> Result<()> {
        let mut transport = StdioTransport::stdio();
        tracing::info!(tools = self.tools.len(), "MCP server listening on stdio");
        tokio::select! {
            result = self.serve(&mut transport) => result,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, stopping MCP server");
                Ok(())
            }
        }
    }
}
