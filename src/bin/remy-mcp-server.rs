// ABOUTME: Server binary wiring config, stores, and providers into the HTTP server
// ABOUTME: Serves the MCP endpoint, REST API, and health check on one port
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Remy MCP Server Binary
//!
//! Starts the nutrition tracking server: loads configuration from the
//! environment, opens the SQLite ledger, builds the Gemini and (optional)
//! Azure OCR clients, and serves MCP plus REST on a single HTTP port.

use anyhow::Result;
use clap::Parser;
use remy_mcp_server::{
    config::environment::{DatabaseUrl, ServerConfig},
    inventory::InventoryStore,
    ledger::LedgerStore,
    llm::GeminiCompletions,
    logging,
    mcp::resources::ServerResources,
    ocr::{AzureReadClient, ReceiptOcr},
    routes,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "remy-mcp-server")]
#[command(about = "Remy - nutrition tracking MCP server backed by Gemini")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.http_port {
        config.http_port = port;
    }
    if let Some(url) = args.database_url {
        config.database_url = DatabaseUrl::parse_url(&url);
    }

    logging::init_from_env()?;
    info!("Starting server: {}", config.summary());

    let ledger = LedgerStore::connect(&config.database_url.to_connection_string())
        .await
        .map_err(|e| anyhow::anyhow!("failed to open ledger database: {e}"))?;
    let inventory = InventoryStore::new(ledger.pool().clone())
        .await
        .map_err(|e| anyhow::anyhow!("failed to open inventory store: {e}"))?;

    let completions = Arc::new(
        GeminiCompletions::new(config.llm.api_key.clone()).with_model(config.llm.model.clone()),
    );
    let ocr: Option<Arc<dyn ReceiptOcr>> = config
        .ocr
        .as_ref()
        .map(|c| Arc::new(AzureReadClient::new(c.key.clone(), c.endpoint.clone())) as _);

    let http_port = config.http_port;
    let resources = Arc::new(ServerResources::new(
        config, ledger, inventory, completions, ocr,
    ));

    let app = routes::router(resources);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", http_port)).await?;

    info!("MCP endpoint:  http://localhost:{http_port}/mcp");
    info!("REST API:      http://localhost:{http_port}/api");
    info!("Health check:  http://localhost:{http_port}/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    } else {
        info!("Shutdown signal received");
    }
}
