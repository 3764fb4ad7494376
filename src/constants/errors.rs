// ABOUTME: Error code constants for JSON-RPC and MCP protocol errors
// ABOUTME: Defines the standard and MCP-specific error codes

//! Error codes for JSON-RPC and MCP protocols

/// Method not found
pub const ERROR_METHOD_NOT_FOUND: i32 = -32601;

/// Invalid parameters
pub const ERROR_INVALID_PARAMS: i32 = -32602;

/// Internal error
pub const ERROR_INTERNAL_ERROR: i32 = -32603;

/// Unauthorized - using standard JSON-RPC Internal Error for better Claude Desktop integration
pub const ERROR_UNAUTHORIZED: i32 = -32603;

/// MCP-specific error codes for better diagnostics
pub const ERROR_TOOL_EXECUTION: i32 = -32000; // Server error - tool execution failed
