// ABOUTME: MCP protocol schema definitions and tool catalog
// ABOUTME: Type-safe tool schemas, capabilities, and initialize response structures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! MCP Protocol Schema Definitions
//!
//! Type-safe definitions for MCP protocol messages, capabilities, and the
//! nutrition tool catalog. Keeping the schema in code avoids hardcoded JSON
//! and keeps `tools/list` in sync with the handlers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Server Information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// MCP Tool Schema Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonSchema,
}

/// JSON Schema Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, PropertySchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

/// JSON Schema Property Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Tool Response after execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<Content>,
    #[serde(rename = "isError")]
    pub is_error: bool,
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<serde_json::Value>,
}

/// Content types for MCP messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

/// MCP Server Capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

/// Tools capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCapability {
    #[serde(rename = "listChanged", skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Complete MCP Initialize Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResponse {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
    pub capabilities: ServerCapabilities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl InitializeResponse {
    /// Create a new initialize response with current server configuration
    #[must_use]
    pub fn new(protocol_version: String, server_name: String, server_version: String) -> Self {
        Self {
            protocol_version,
            server_info: ServerInfo {
                name: server_name,
                version: server_version,
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            instructions: Some(
                "This server tracks nutrition from natural-language food logs. Use `log_food` \
                 to record what a user ate, `daily_summary` and `nutrition_history` to query \
                 intake, and `scan_grocery_bill` to read items off a receipt photo."
                    .into(),
            ),
        }
    }
}

/// Get all available tools
#[must_use]
pub fn get_tools() -> Vec<ToolSchema> {
    vec![
        create_validate_tool(),
        create_log_food_tool(),
        create_get_nutrition_totals_tool(),
        create_daily_summary_tool(),
        create_nutrition_history_tool(),
        create_suggest_dishes_tool(),
        create_scan_grocery_bill_tool(),
    ]
}

fn user_id_property() -> PropertySchema {
    PropertySchema {
        property_type: "string".into(),
        description: Some("Identifier of the user whose nutrition is tracked".into()),
    }
}

fn object_schema(
    properties: HashMap<String, PropertySchema>,
    required: Vec<&str>,
) -> JsonSchema {
    JsonSchema {
        schema_type: "object".into(),
        properties: Some(properties),
        required: Some(required.into_iter().map(str::to_owned).collect()),
    }
}

/// Create the `validate` tool schema
fn create_validate_tool() -> ToolSchema {
    ToolSchema {
        name: "validate".into(),
        description: "Return the server owner's registered phone number for client validation"
            .into(),
        input_schema: JsonSchema {
            schema_type: "object".into(),
            properties: Some(HashMap::new()),
            required: None,
        },
    }
}

/// Create the `log_food` tool schema
fn create_log_food_tool() -> ToolSchema {
    let mut properties = HashMap::new();
    properties.insert("user_id".to_owned(), user_id_property());
    properties.insert(
        "food".to_owned(),
        PropertySchema {
            property_type: "string".into(),
            description: Some("Name of the food eaten (e.g., 'banana', 'chicken curry')".into()),
        },
    );
    properties.insert(
        "amount".to_owned(),
        PropertySchema {
            property_type: "number".into(),
            description: Some("Quantity eaten, in servings or units of the food (defaults to 1)".into()),
        },
    );

    ToolSchema {
        name: "log_food".into(),
        description: "Look up nutrition facts for a food and record it in the user's log".into(),
        input_schema: object_schema(properties, vec!["user_id", "food"]),
    }
}

/// Create the `get_nutrition_totals` tool schema
fn create_get_nutrition_totals_tool() -> ToolSchema {
    let mut properties = HashMap::new();
    properties.insert("user_id".to_owned(), user_id_property());

    ToolSchema {
        name: "get_nutrition_totals".into(),
        description: "Get the user's lifetime running totals of calories, protein, carbs, and fat"
            .into(),
        input_schema: object_schema(properties, vec!["user_id"]),
    }
}

/// Create the `daily_summary` tool schema
fn create_daily_summary_tool() -> ToolSchema {
    let mut properties = HashMap::new();
    properties.insert("user_id".to_owned(), user_id_property());
    properties.insert(
        "date".to_owned(),
        PropertySchema {
            property_type: "string".into(),
            description: Some("Day to summarize as YYYY-MM-DD (defaults to today, UTC)".into()),
        },
    );

    ToolSchema {
        name: "daily_summary".into(),
        description: "Summarize a user's nutrition intake for a single day".into(),
        input_schema: object_schema(properties, vec!["user_id"]),
    }
}

/// Create the `nutrition_history` tool schema
fn create_nutrition_history_tool() -> ToolSchema {
    let mut properties = HashMap::new();
    properties.insert("user_id".to_owned(), user_id_property());
    properties.insert(
        "start_date".to_owned(),
        PropertySchema {
            property_type: "string".into(),
            description: Some("Inclusive start of the range as YYYY-MM-DD".into()),
        },
    );
    properties.insert(
        "end_date".to_owned(),
        PropertySchema {
            property_type: "string".into(),
            description: Some("Inclusive end of the range as YYYY-MM-DD".into()),
        },
    );

    ToolSchema {
        name: "nutrition_history".into(),
        description: "Get per-day nutrition summaries for a date range, oldest first".into(),
        input_schema: object_schema(properties, vec!["user_id"]),
    }
}

/// Create the `suggest_dishes` tool schema
fn create_suggest_dishes_tool() -> ToolSchema {
    let mut properties = HashMap::new();
    properties.insert("user_id".to_owned(), user_id_property());
    properties.insert(
        "ingredients".to_owned(),
        PropertySchema {
            property_type: "array".into(),
            description: Some(
                "Explicit ingredient list; defaults to the user's scanned inventory".into(),
            ),
        },
    );

    ToolSchema {
        name: "suggest_dishes".into(),
        description: "Suggest dishes the user could cook from their scanned grocery items".into(),
        input_schema: object_schema(properties, vec!["user_id"]),
    }
}

/// Create the `scan_grocery_bill` tool schema
fn create_scan_grocery_bill_tool() -> ToolSchema {
    let mut properties = HashMap::new();
    properties.insert("user_id".to_owned(), user_id_property());
    properties.insert(
        "image_base64".to_owned(),
        PropertySchema {
            property_type: "string".into(),
            description: Some("Receipt photo encoded as base64".into()),
        },
    );

    ToolSchema {
        name: "scan_grocery_bill".into(),
        description: "OCR a grocery receipt image and add the items to the user's inventory"
            .into(),
        input_schema: object_schema(properties, vec!["user_id", "image_base64"]),
    }
}
