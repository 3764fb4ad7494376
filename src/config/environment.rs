// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, database URLs, and collaborator credentials
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Environment-based configuration management

use crate::normalizer::MissingFieldPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::warn;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Type-safe database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite { path: PathBuf },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/remy.db"),
        }
    }
}

impl std::fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Shared bearer token authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The single shared bearer token clients must present
    pub token: String,
    /// Operator contact number returned by the `validate` tool
    pub my_number: String,
}

/// Text completion collaborator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Gemini API key
    pub api_key: String,
    /// Model used for nutrition and dish prompts
    pub model: String,
}

/// Receipt OCR collaborator settings; absent when not configured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Azure Vision subscription key
    pub key: String,
    /// Azure Vision endpoint base URL
    pub endpoint: String,
}

/// Server configuration loaded from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP port serving the MCP endpoint and the REST API
    pub http_port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Database configuration
    pub database_url: DatabaseUrl,
    /// Authentication settings
    pub auth: AuthConfig,
    /// Completion collaborator settings
    pub llm: LlmConfig,
    /// OCR collaborator settings, `None` when `VISION_KEY`/`VISION_ENDPOINT`
    /// are unset; the scan tool then fails at call time
    pub ocr: Option<OcrConfig>,
    /// Missing-field handling for the nutrition normalizer
    pub strict_missing_fields: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file first when one exists. `AUTH_TOKEN`, `MY_NUMBER`,
    /// and `GEMINI_API_KEY` are required; OCR credentials are optional.
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing or malformed.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        Ok(Self {
            http_port: env_var_or("HTTP_PORT", "8086")
                .parse()
                .context("Invalid HTTP_PORT value")?,
            log_level: LogLevel::from_str_or_default(&env_var_or("RUST_LOG", "info")),
            database_url: DatabaseUrl::parse_url(&env_var_or(
                "DATABASE_URL",
                "sqlite:./data/remy.db",
            )),
            auth: AuthConfig {
                token: required_env("AUTH_TOKEN")?,
                my_number: required_env("MY_NUMBER")?,
            },
            llm: LlmConfig {
                api_key: required_env("GEMINI_API_KEY")?,
                model: env_var_or("GEMINI_MODEL", "gemini-2.5-flash"),
            },
            ocr: match (env::var("VISION_KEY"), env::var("VISION_ENDPOINT")) {
                (Ok(key), Ok(endpoint)) => Some(OcrConfig { key, endpoint }),
                _ => {
                    warn!("VISION_KEY/VISION_ENDPOINT not set; receipt scanning disabled");
                    None
                }
            },
            strict_missing_fields: env_var_or("STRICT_NUTRITION_FIELDS", "true")
                .parse()
                .context("Invalid STRICT_NUTRITION_FIELDS value")?,
        })
    }

    /// The normalizer policy selected by `strict_missing_fields`
    #[must_use]
    pub fn missing_field_policy(&self) -> MissingFieldPolicy {
        if self.strict_missing_fields {
            MissingFieldPolicy::Strict
        } else {
            MissingFieldPolicy::ZeroFill
        }
    }

    /// One-line configuration summary safe for startup logs (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "http_port={} database={} model={} ocr={} strict_missing_fields={}",
            self.http_port,
            self.database_url,
            self.llm.model,
            if self.ocr.is_some() {
                "configured"
            } else {
                "disabled"
            },
            self.strict_missing_fields,
        )
    }
}

fn env_var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_owned())
}

fn required_env(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} must be set in the environment or .env file"))
}
