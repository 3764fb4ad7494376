// ABOUTME: MCP request processing and protocol routing
// ABOUTME: Validates JSON-RPC envelopes and dispatches methods to handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::protocol::{request_id, McpRequest, McpResponse};
use super::resources::ServerResources;
use super::tool_handlers::ToolHandlers;
use crate::constants::errors::ERROR_METHOD_NOT_FOUND;
use crate::constants::protocol::{mcp_protocol_version, server_name, JSONRPC_VERSION, SERVER_VERSION};
use crate::errors::{AppError, AppResult};
use crate::mcp::schema::InitializeResponse;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Processes MCP protocol requests with validation, routing, and execution
pub struct McpRequestProcessor {
    resources: Arc<ServerResources>,
}

impl McpRequestProcessor {
    /// Create a new MCP request processor
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Handle an MCP request and return a response
    ///
    /// Returns `None` for notifications, which are acknowledged without a
    /// response body per JSON-RPC.
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        let start_time = std::time::Instant::now();
        Self::log_request(&request);

        if request.method.starts_with("notifications/") {
            debug!(method = %request.method, "Notification received");
            Self::log_completion("notification", start_time);
            return None;
        }

        let response = match self.process_request(&request).await {
            Ok(response) => response,
            Err(e) => Self::create_error_response(&request, &e),
        };

        Self::log_completion("request", start_time);
        Some(response)
    }

    fn create_error_response(request: &McpRequest, e: &AppError) -> McpResponse {
        error!(
            method = %request.method,
            request_id = ?request.id,
            error = %e,
            "Failed to process MCP request"
        );
        McpResponse::error(request_id(request), e.code.jsonrpc_code(), e.to_string())
    }

    /// Process an MCP request and generate a response
    async fn process_request(&self, request: &McpRequest) -> AppResult<McpResponse> {
        Self::validate_request(request)?;

        match request.method.as_str() {
            "initialize" => Self::handle_initialize(request),
            "ping" => Ok(Self::handle_ping(request)),
            "tools/list" => Self::handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            _ => Ok(Self::handle_unknown_method(request)),
        }
    }

    /// Validate MCP request format and required fields
    fn validate_request(request: &McpRequest) -> AppResult<()> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(AppError::invalid_input(format!(
                "Invalid JSON-RPC version: got '{}', expected '{}'",
                request.jsonrpc, JSONRPC_VERSION
            )));
        }

        if request.method.is_empty() {
            return Err(AppError::invalid_input("Missing method"));
        }

        Ok(())
    }

    /// Handle MCP initialize request
    fn handle_initialize(request: &McpRequest) -> AppResult<McpResponse> {
        debug!("Handling initialize request");

        let response = InitializeResponse::new(
            mcp_protocol_version(),
            server_name(),
            SERVER_VERSION.to_owned(),
        );
        let result = serde_json::to_value(response)
            .map_err(|e| AppError::internal(format!("Failed to serialize initialize result: {e}")))?;

        Ok(McpResponse::success(request_id(request), result))
    }

    /// Handle MCP ping request
    fn handle_ping(request: &McpRequest) -> McpResponse {
        debug!("Handling ping request");
        McpResponse::success(request_id(request), serde_json::json!({}))
    }

    /// Handle tools/list request
    ///
    /// Tool discovery does not require authentication; individual tool calls
    /// check the bearer token at execution time.
    fn handle_tools_list(request: &McpRequest) -> AppResult<McpResponse> {
        debug!("Handling tools/list request");

        let tools = crate::mcp::schema::get_tools();
        Ok(McpResponse::success(
            request_id(request),
            serde_json::json!({ "tools": tools }),
        ))
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, request: &McpRequest) -> AppResult<McpResponse> {
        debug!("Handling tools/call request");

        request
            .params
            .as_ref()
            .ok_or_else(|| AppError::invalid_input("Missing parameters for tools/call"))?;

        Ok(ToolHandlers::handle_tools_call(request, &self.resources).await)
    }

    /// Handle unknown method
    fn handle_unknown_method(request: &McpRequest) -> McpResponse {
        warn!(method = %request.method, "Unknown MCP method");

        McpResponse::error(
            request_id(request),
            ERROR_METHOD_NOT_FOUND,
            format!("Unknown method: {}", request.method),
        )
    }

    /// Log incoming request with params truncated
    fn log_request(request: &McpRequest) {
        debug!(
            mcp_method = %request.method,
            mcp_id = ?request.id,
            mcp_params_preview = ?request.params.as_ref().map(|p| {
                let s = p.to_string();
                if s.len() > 100 {
                    let preview: String = s.chars().take(100).collect();
                    format!("{preview}...[truncated]")
                } else {
                    s
                }
            }),
            auth_present = request.auth_token.is_some(),
            "Received MCP request"
        );
    }

    /// Log request completion with timing
    fn log_completion(request_type: &str, start_time: std::time::Instant) {
        let duration = start_time.elapsed();
        debug!(
            duration_ms = u64::try_from(duration.as_millis()).unwrap_or(0),
            "Completed MCP {} processing", request_type
        );
    }
}
