// ABOUTME: Shared server resources container for dependency injection
// ABOUTME: Bundles stores, providers, and auth into one Arc passed to every handler
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::auth::BearerValidator;
use crate::config::environment::ServerConfig;
use crate::inventory::InventoryStore;
use crate::ledger::LedgerStore;
use crate::llm::CompletionProvider;
use crate::ocr::ReceiptOcr;
use std::sync::Arc;

/// Centralized resource container shared across all request handlers
///
/// Created once at startup and passed around as `Arc<ServerResources>` so
/// concurrent requests share the same pool, providers, and config.
pub struct ServerResources {
    pub config: Arc<ServerConfig>,
    pub ledger: Arc<LedgerStore>,
    pub inventory: Arc<InventoryStore>,
    pub completions: Arc<dyn CompletionProvider>,
    pub ocr: Option<Arc<dyn ReceiptOcr>>,
    pub bearer: BearerValidator,
}

impl ServerResources {
    /// Create a new resource container
    #[must_use]
    pub fn new(
        config: ServerConfig,
        ledger: LedgerStore,
        inventory: InventoryStore,
        completions: Arc<dyn CompletionProvider>,
        ocr: Option<Arc<dyn ReceiptOcr>>,
    ) -> Self {
        let bearer = BearerValidator::new(&config.auth.token);
        Self {
            config: Arc::new(config),
            ledger: Arc::new(ledger),
            inventory: Arc::new(inventory),
            completions,
            ocr,
            bearer,
        }
    }
}
