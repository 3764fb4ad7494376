// ABOUTME: MCP protocol implementation for the nutrition tracking server
// ABOUTME: JSON-RPC message types, tool schemas, request routing, and tool execution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

pub mod protocol;
pub mod resources;
pub mod schema;
pub mod server;
pub mod tool_handlers;
