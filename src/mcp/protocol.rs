// ABOUTME: JSON-RPC 2.0 message structures for MCP transport
// ABOUTME: Request, response, and error envelopes with constructor helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::constants::protocol::JSONRPC_VERSION;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MCP request envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Notifications carry no ID, regular requests do
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Authorization header value (Bearer token), injected by the HTTP layer
    #[serde(rename = "auth", skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

/// MCP response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
    pub id: Value,
}

/// JSON-RPC error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl McpError {
    #[must_use]
    pub const fn new(code: i32, message: String) -> Self {
        Self {
            code,
            message,
            data: None,
        }
    }
}

impl McpResponse {
    /// Create a successful response
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error response
    #[must_use]
    pub fn error(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            result: None,
            error: Some(McpError::new(code, message)),
            id,
        }
    }
}

/// Resolve the response ID for a request, substituting JSON null when absent
#[must_use]
pub fn request_id(request: &McpRequest) -> Value {
    request.id.clone().unwrap_or(Value::Null)
}
