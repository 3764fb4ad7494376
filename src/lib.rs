// ABOUTME: Main library entry point for the Remy nutrition tracking platform
// ABOUTME: Provides MCP and REST API protocols for LLM-assisted nutrition logging
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # Remy MCP Server
//!
//! A Model Context Protocol (MCP) server for nutrition tracking. A client sends
//! a food name and quantity; the server asks a generative model for nutrition
//! facts, appends the result to a per-user ledger, and can later report daily
//! or running totals. A secondary tool scans grocery receipt photos through a
//! cloud OCR service and merges the detected items into the user's inventory.
//!
//! ## Architecture
//!
//! - **Normalizer**: turns loosely-structured model output into typed records
//! - **Ledger**: append-only nutrition event log with a running-totals projection
//! - **MCP**: JSON-RPC 2.0 protocol surface over HTTP
//! - **Collaborators**: Gemini text completion and Azure Vision Read OCR,
//!   behind traits so tests can script them
//!
//! ## Quick Start
//!
//! 1. Set `AUTH_TOKEN`, `MY_NUMBER`, and `GEMINI_API_KEY` in the environment
//! 2. Start the server with `remy-mcp-server`
//! 3. Connect from Claude or any other MCP client

/// Bearer token validation for the shared-token auth model
pub mod auth;

/// Configuration management from environment variables
pub mod config;

/// Application constants and protocol values
pub mod constants;

/// Unified error handling with typed failure taxonomy
pub mod errors;

/// Durable per-user ingredient inventory
pub mod inventory;

/// Append-only nutrition event ledger and summary queries
pub mod ledger;

/// Text completion collaborator (Gemini)
pub mod llm;

/// Logging configuration and structured logging setup
pub mod logging;

/// MCP protocol implementation (JSON-RPC types, schemas, tool handlers)
pub mod mcp;

/// Core data structures for nutrition tracking
pub mod models;

/// Model-output normalizers for nutrition records and dish lists
pub mod normalizer;

/// Receipt OCR collaborator (Azure Vision Read)
pub mod ocr;

/// HTTP routes for the MCP endpoint and the REST API
pub mod routes;
