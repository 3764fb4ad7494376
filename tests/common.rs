// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory stores, scripted providers, and resource builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

//! Shared test utilities for `remy_mcp_server`

use anyhow::Result;
use async_trait::async_trait;
use remy_mcp_server::{
    config::environment::{AuthConfig, DatabaseUrl, LlmConfig, LogLevel, ServerConfig},
    errors::UpstreamError,
    inventory::InventoryStore,
    ledger::LedgerStore,
    llm::CompletionProvider,
    mcp::resources::ServerResources,
    ocr::ReceiptOcr,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

/// Bearer token accepted by test resources
pub const TEST_TOKEN: &str = "test-bearer-token";

/// Number returned by the `validate` tool in tests
pub const TEST_NUMBER: &str = "911234567890";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Open an in-memory ledger store
pub async fn create_test_ledger() -> Result<LedgerStore> {
    init_test_logging();
    Ok(LedgerStore::connect("sqlite::memory:").await?)
}

/// Open an in-memory ledger plus an inventory store sharing its pool
pub async fn create_test_stores() -> Result<(LedgerStore, InventoryStore)> {
    let ledger = create_test_ledger().await?;
    let inventory = InventoryStore::new(ledger.pool().clone()).await?;
    Ok((ledger, inventory))
}

/// Server configuration for tests: in-memory database, fixed token
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        log_level: LogLevel::Warn,
        database_url: DatabaseUrl::Memory,
        auth: AuthConfig {
            token: TEST_TOKEN.to_owned(),
            my_number: TEST_NUMBER.to_owned(),
        },
        llm: LlmConfig {
            api_key: "unused-in-tests".to_owned(),
            model: "gemini-2.5-flash".to_owned(),
        },
        ocr: None,
        strict_missing_fields: true,
    }
}

/// Completion provider returning pre-scripted replies in order
pub struct ScriptedCompletions {
    replies: Mutex<VecDeque<Result<String, UpstreamError>>>,
}

impl ScriptedCompletions {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
        }
    }

    /// Script a single successful reply
    pub fn replying(text: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.push_ok(text);
        provider
    }

    pub fn push_ok(&self, text: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn push_err(&self, error: UpstreamError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }
}

impl Default for ScriptedCompletions {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletions {
    async fn complete(&self, _prompt: &str) -> Result<String, UpstreamError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(UpstreamError::ModelUnavailable(
                    "no scripted reply left".into(),
                ))
            })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// OCR provider returning a fixed set of lines
pub struct ScriptedOcr {
    lines: Vec<String>,
}

impl ScriptedOcr {
    pub fn with_lines(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|&s| s.to_owned()).collect(),
        }
    }
}

#[async_trait]
impl ReceiptOcr for ScriptedOcr {
    async fn read_text(&self, _image: &[u8]) -> Result<Vec<String>, UpstreamError> {
        Ok(self.lines.clone())
    }

    fn name(&self) -> &str {
        "scripted-ocr"
    }
}

/// Build full server resources over in-memory stores and a scripted provider
pub async fn create_test_resources(
    completions: ScriptedCompletions,
    ocr: Option<ScriptedOcr>,
) -> Result<Arc<ServerResources>> {
    let (ledger, inventory) = create_test_stores().await?;
    Ok(Arc::new(ServerResources::new(
        test_config(),
        ledger,
        inventory,
        Arc::new(completions),
        ocr.map(|o| Arc::new(o) as Arc<dyn ReceiptOcr>),
    )))
}
