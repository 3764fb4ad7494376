// ABOUTME: Tool execution handlers behind the MCP tools/call method
// ABOUTME: Bearer auth gate, argument extraction, and the seven nutrition tools
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::protocol::{request_id, McpRequest, McpResponse};
use super::resources::ServerResources;
use super::schema::{Content, ToolResponse};
use crate::errors::{AppError, AppResult, UpstreamError};
use crate::llm::prompts;
use crate::normalizer::{normalize_dishes, normalize_nutrition};
use crate::ocr::filter_receipt_items;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Executes MCP tool calls against shared server resources
pub struct ToolHandlers;

impl ToolHandlers {
    /// Handle a `tools/call` request: authenticate, extract the tool name and
    /// arguments, and dispatch to the named tool.
    ///
    /// Every tool requires a valid bearer token. Tool failures come back as
    /// JSON-RPC error responses carrying the unified error code mapping.
    pub async fn handle_tools_call(
        request: &McpRequest,
        resources: &Arc<ServerResources>,
    ) -> McpResponse {
        let id = request_id(request);

        if let Err(e) = resources
            .bearer
            .validate_header(request.auth_token.as_deref())
        {
            warn!(method = %request.method, "Rejected unauthenticated tool call");
            return McpResponse::error(id, e.jsonrpc_code(), e.to_string());
        }

        match Self::execute(request, resources).await {
            Ok((text, structured)) => {
                let tool_response = ToolResponse {
                    content: vec![Content::Text { text }],
                    is_error: false,
                    structured_content: Some(structured),
                };
                match serde_json::to_value(tool_response) {
                    Ok(result) => McpResponse::success(id, result),
                    Err(e) => {
                        let error = AppError::internal(format!(
                            "Failed to serialize tool response: {e}"
                        ));
                        McpResponse::error(id, error.jsonrpc_code(), error.to_string())
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Tool execution failed");
                McpResponse::error(id, e.jsonrpc_code(), e.to_string())
            }
        }
    }

    /// Dispatch to the named tool, returning human-readable text plus a
    /// structured result value.
    async fn execute(
        request: &McpRequest,
        resources: &Arc<ServerResources>,
    ) -> AppResult<(String, Value)> {
        let params = request
            .params
            .as_ref()
            .ok_or_else(|| AppError::invalid_input("Missing parameters for tools/call"))?;
        let tool_name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::invalid_input("Missing tool name"))?;
        let empty_args = json!({});
        let args = params.get("arguments").unwrap_or(&empty_args);

        debug!(tool = %tool_name, "Executing tool");

        match tool_name {
            "validate" => Ok(Self::handle_validate(resources)),
            "log_food" => Self::handle_log_food(args, resources).await,
            "get_nutrition_totals" => Self::handle_get_totals(args, resources).await,
            "daily_summary" => Self::handle_daily_summary(args, resources).await,
            "nutrition_history" => Self::handle_nutrition_history(args, resources).await,
            "suggest_dishes" => Self::handle_suggest_dishes(args, resources).await,
            "scan_grocery_bill" => Self::handle_scan_grocery_bill(args, resources).await,
            other => Err(AppError::invalid_input(format!("Unknown tool: {other}"))),
        }
    }

    /// `validate` returns the operator's registered phone number
    fn handle_validate(resources: &Arc<ServerResources>) -> (String, Value) {
        let number = resources.config.auth.my_number.clone();
        (number.clone(), Value::String(number))
    }

    /// `log_food`: prompt the model for nutrition facts, normalize the reply,
    /// append the event, and report the updated totals.
    async fn handle_log_food(
        args: &Value,
        resources: &Arc<ServerResources>,
    ) -> AppResult<(String, Value)> {
        let user_id = required_str(args, "user_id")?;
        let food = required_str(args, "food")?;
        // Dishes logged without an explicit quantity count as one serving
        let amount = match args.get("amount") {
            Some(_) => required_number(args, "amount")?,
            None => 1.0,
        };

        let prompt = prompts::nutrition_facts(food, amount);
        let raw = resources.completions.complete(&prompt).await?;
        let record = normalize_nutrition(&raw, resources.config.missing_field_policy())?;

        let event = resources
            .ledger
            .append_event(user_id, food, amount, record)
            .await?;
        let totals = resources.ledger.get_totals(user_id).await?;

        info!(
            user_id = %user_id,
            food = %food,
            calories = record.calories,
            "Logged food event"
        );

        let text = format!(
            "Logged {amount} {food}: {} kcal, {}g protein, {}g carbs, {}g fat",
            record.calories, record.protein, record.carbs, record.fat
        );
        let structured = json!({
            "event_id": event.id,
            "food": food,
            "amount": amount,
            "nutrition": record,
            "totals": totals.record(),
        });
        Ok((text, structured))
    }

    /// `get_nutrition_totals` returns the user's lifetime running totals
    async fn handle_get_totals(
        args: &Value,
        resources: &Arc<ServerResources>,
    ) -> AppResult<(String, Value)> {
        let user_id = required_str(args, "user_id")?;
        let totals = resources.ledger.get_totals(user_id).await?;

        let text = format!(
            "Totals for {user_id}: {} kcal, {}g protein, {}g carbs, {}g fat",
            totals.calories, totals.protein, totals.carbs, totals.fat
        );
        let structured = serde_json::to_value(&totals)
            .map_err(|e| AppError::internal(format!("Failed to serialize totals: {e}")))?;
        Ok((text, structured))
    }

    /// `daily_summary` sums one UTC calendar day, defaulting to today
    async fn handle_daily_summary(
        args: &Value,
        resources: &Arc<ServerResources>,
    ) -> AppResult<(String, Value)> {
        let user_id = required_str(args, "user_id")?;
        let day = match optional_str(args, "date") {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                AppError::invalid_input(format!("date must be YYYY-MM-DD, got '{raw}'"))
            })?,
            None => Utc::now().date_naive(),
        };

        let summary = resources.ledger.daily_summary(user_id, day).await?;

        let text = format!(
            "On {day}, {user_id} consumed {} kcal, {}g protein, {}g carbs, {}g fat",
            summary.calories, summary.protein, summary.carbs, summary.fat
        );
        let structured = json!({
            "user_id": user_id,
            "date": day,
            "calories": summary.calories,
            "protein": summary.protein,
            "carbs": summary.carbs,
            "fat": summary.fat,
        });
        Ok((text, structured))
    }

    /// `nutrition_history` groups events by day over an optional date range.
    /// Malformed range bounds are ignored, not rejected.
    async fn handle_nutrition_history(
        args: &Value,
        resources: &Arc<ServerResources>,
    ) -> AppResult<(String, Value)> {
        let user_id = required_str(args, "user_id")?;
        let start_date = optional_str(args, "start_date");
        let end_date = optional_str(args, "end_date");

        let days = resources
            .ledger
            .range_summary(user_id, start_date, end_date)
            .await?;

        let text = if days.is_empty() {
            format!("No nutrition history for {user_id} in the requested range")
        } else {
            format!("{} day(s) of nutrition history for {user_id}", days.len())
        };
        let structured = json!({
            "user_id": user_id,
            "days": days,
        });
        Ok((text, structured))
    }

    /// `suggest_dishes` asks the model for dishes using an explicit
    /// ingredient list, or the user's scanned inventory when none is given
    async fn handle_suggest_dishes(
        args: &Value,
        resources: &Arc<ServerResources>,
    ) -> AppResult<(String, Value)> {
        let user_id = required_str(args, "user_id")?;

        let ingredients = match args.get("ingredients").and_then(Value::as_array) {
            Some(list) => list
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            None => resources.inventory.list(user_id).await?,
        };
        if ingredients.is_empty() {
            return Err(AppError::invalid_input(
                "No grocery items found for this user; scan a bill first",
            ));
        }

        let prompt = prompts::dish_suggestions(&ingredients);
        let raw = resources.completions.complete(&prompt).await?;
        let dishes = normalize_dishes(&raw)?;

        let text = format!("Suggested dishes: {}", dishes.join(", "));
        let structured = json!({
            "user_id": user_id,
            "ingredients": ingredients,
            "dishes": dishes,
        });
        Ok((text, structured))
    }

    /// `scan_grocery_bill` OCRs a receipt image and merges the detected
    /// items into the user's inventory.
    async fn handle_scan_grocery_bill(
        args: &Value,
        resources: &Arc<ServerResources>,
    ) -> AppResult<(String, Value)> {
        let user_id = required_str(args, "user_id")?;
        let image_base64 = required_str(args, "image_base64")?;

        let ocr = resources.ocr.as_ref().ok_or_else(|| {
            AppError::from(UpstreamError::OcrUnavailable(
                "OCR is not configured on this server".into(),
            ))
        })?;

        let image = BASE64_STANDARD
            .decode(image_base64)
            .map_err(|e| AppError::invalid_input(format!("image_base64 is not valid base64: {e}")))?;

        let lines = ocr.read_text(&image).await?;
        let items = filter_receipt_items(&lines);
        let added = resources.inventory.add_items(user_id, &items).await?;

        info!(
            user_id = %user_id,
            lines = lines.len(),
            items = items.len(),
            added = added,
            "Scanned grocery bill"
        );

        let text = if items.is_empty() {
            "No grocery items detected on the receipt".to_owned()
        } else {
            format!("Detected {} item(s), {added} new", items.len())
        };
        let structured = json!({
            "user_id": user_id,
            "items": items,
            "added": added,
        });
        Ok((text, structured))
    }
}

/// Extract a required string argument
fn required_str<'a>(args: &'a Value, key: &str) -> AppResult<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::invalid_input(format!("Missing required parameter: {key}")))
}

/// Extract an optional string argument
fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

/// Extract a required numeric argument, accepting JSON numbers or numeric
/// strings the way lenient clients send them
fn required_number(args: &Value, key: &str) -> AppResult<f64> {
    let value = args
        .get(key)
        .ok_or_else(|| AppError::invalid_input(format!("Missing required parameter: {key}")))?;

    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    number.ok_or_else(|| AppError::invalid_input(format!("Parameter '{key}' must be a number")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_str_rejects_blank_values() {
        let args = json!({"user_id": "  ", "food": "banana"});
        assert!(required_str(&args, "user_id").is_err());
        assert_eq!(required_str(&args, "food").unwrap(), "banana");
        assert!(required_str(&args, "missing").is_err());
    }

    #[test]
    fn test_required_number_accepts_numeric_strings() {
        let args = json!({"a": 2.5, "b": "3", "c": "many", "d": true});
        assert!((required_number(&args, "a").unwrap() - 2.5).abs() < f64::EPSILON);
        assert!((required_number(&args, "b").unwrap() - 3.0).abs() < f64::EPSILON);
        assert!(required_number(&args, "c").is_err());
        assert!(required_number(&args, "d").is_err());
    }
}
