// ABOUTME: HTTP routing for the MCP endpoint, REST API, and health check
// ABOUTME: axum router wiring shared server resources into request handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # HTTP Routes
//!
//! One axum router serves three surfaces on a single port:
//! - `POST /mcp` — the JSON-RPC MCP endpoint (bearer token per tool call)
//! - `POST /api/log_food`, `POST /api/nutrition_summary` — plain REST access
//!   to the same core operations
//! - `GET /health` — liveness probe

use crate::errors::{AppError, ErrorResponse};
use crate::llm::prompts;
use crate::mcp::protocol::McpRequest;
use crate::mcp::resources::ServerResources;
use crate::mcp::server::McpRequestProcessor;
use crate::normalizer::normalize_nutrition;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Build the application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp))
        .route("/api/log_food", post(handle_log_food))
        .route("/api/nutrition_summary", post(handle_nutrition_summary))
        .route("/health", get(handle_health))
        .with_state(resources)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

/// JSON-RPC over HTTP POST. The `Authorization` header is forwarded into the
/// request envelope so tool calls can check it.
async fn handle_mcp(
    State(resources): State<Arc<ServerResources>>,
    headers: HeaderMap,
    Json(mut request): Json<McpRequest>,
) -> Response {
    if request.auth_token.is_none() {
        request.auth_token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
    }

    let processor = McpRequestProcessor::new(resources);
    match processor.handle_request(request).await {
        Some(response) => Json(response).into_response(),
        // Notifications are accepted without a body
        None => StatusCode::ACCEPTED.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct LogFoodRequest {
    user_id: String,
    food: String,
    amount: f64,
}

#[derive(Debug, Serialize)]
struct LogFoodResponse {
    food: String,
    amount: f64,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
}

/// REST food logging: estimate nutrition and append to the ledger
async fn handle_log_food(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<LogFoodRequest>,
) -> Result<Json<LogFoodResponse>, AppError> {
    let prompt = prompts::nutrition_facts(&request.food, request.amount);
    let raw = resources.completions.complete(&prompt).await?;
    let record = normalize_nutrition(&raw, resources.config.missing_field_policy())?;

    let event = resources
        .ledger
        .append_event(&request.user_id, &request.food, request.amount, record)
        .await?;

    info!(user_id = %event.user_id, food = %event.food, "Logged food via REST");

    Ok(Json(LogFoodResponse {
        food: event.food,
        amount: event.amount,
        calories: record.calories,
        protein: record.protein,
        carbs: record.carbs,
        fat: record.fat,
    }))
}

#[derive(Debug, Deserialize)]
struct NutritionSummaryRequest {
    user_id: String,
    date: Option<String>,
}

/// REST daily summary for one UTC calendar day, defaulting to today
async fn handle_nutrition_summary(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<NutritionSummaryRequest>,
) -> Result<Json<Value>, AppError> {
    let day = match request.date.as_deref() {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            AppError::invalid_input(format!("date must be YYYY-MM-DD, got '{raw}'"))
        })?,
        None => Utc::now().date_naive(),
    };

    let summary = resources.ledger.daily_summary(&request.user_id, day).await?;

    Ok(Json(json!({
        "user_id": request.user_id,
        "date": day,
        "calories": summary.calories,
        "protein": summary.protein,
        "carbs": summary.carbs,
        "fat": summary.fat,
    })))
}

/// Liveness probe reporting name, version, and database reachability
async fn handle_health(
    State(resources): State<Arc<ServerResources>>,
) -> Result<Json<Value>, AppError> {
    let database_ok = sqlx::query("SELECT 1")
        .fetch_one(resources.ledger.pool())
        .await
        .is_ok();

    Ok(Json(json!({
        "status": if database_ok { "ok" } else { "degraded" },
        "name": crate::constants::protocol::server_name(),
        "version": crate::constants::protocol::SERVER_VERSION,
        "database": database_ok,
    })))
}
