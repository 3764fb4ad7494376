// ABOUTME: Unified error handling with typed normalization, validation, and upstream failures
// ABOUTME: Maps every failure to a stable error code, HTTP status, and JSON-RPC error code
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Unified Error Handling System
//!
//! This module provides the centralized error handling for the Remy MCP Server.
//! The core taxonomy is deliberately small: normalization failures (model output
//! could not be turned into a typed record), validation failures (caller input
//! rejected), and upstream failures (a collaborator call did not succeed).
//! None of these are retried internally; they are surfaced verbatim so the
//! protocol layer can map them to client-facing error envelopes.

use crate::constants::errors::{
    ERROR_INTERNAL_ERROR, ERROR_INVALID_PARAMS, ERROR_TOOL_EXECUTION, ERROR_UNAUTHORIZED,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failures turning raw model text into a typed record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    /// No `{...}` or `[...]` span was found in the model output
    #[error("no JSON object found in model response")]
    NoObjectFound,
    /// A span was found but did not parse as JSON of the expected shape
    #[error("model response contained invalid JSON: {0}")]
    InvalidJson(String),
    /// A canonical nutrition key was absent under the strict policy
    #[error("missing key: {0}")]
    MissingField(String),
    /// A nutrition value could not be coerced to a non-negative number
    #[error("value for '{0}' is not a valid number")]
    NotANumber(String),
    /// The dish response was not a non-empty list of strings
    #[error("model response is not a list of strings")]
    NotAStringList,
}

/// Caller input rejected before touching storage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `user_id` must be non-empty
    #[error("user_id must not be empty")]
    EmptyUserId,
    /// `food` must be non-empty
    #[error("food name must not be empty")]
    EmptyFoodName,
    /// Event input carried a non-finite or non-positive value
    #[error("nutrition input is incomplete or out of range: {0}")]
    IncompleteNutritionInput(String),
}

/// A collaborator call failed; never retried by this server
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The text completion call failed or returned a transport-level error
    #[error("completion model unavailable: {0}")]
    ModelUnavailable(String),
    /// The OCR call failed, timed out, or was not configured
    #[error("OCR service unavailable: {0}")]
    OcrUnavailable(String),
}

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication (1000-1999)
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,

    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    #[serde(rename = "NORMALIZATION_FAILED")]
    NormalizationFailed = 3001,

    // External services (5000-5999)
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidInput | Self::NormalizationFailed => 400,

            // 401 Unauthorized
            Self::AuthRequired | Self::AuthInvalid => 401,

            // 502 Bad Gateway
            Self::ExternalServiceError => 502,

            // 503 Service Unavailable
            Self::ExternalServiceUnavailable => 503,

            // 500 Internal Server Error
            Self::ConfigError | Self::InternalError | Self::DatabaseError => 500,
        }
    }

    /// Get the JSON-RPC error code for this error
    #[must_use]
    pub fn jsonrpc_code(self) -> i32 {
        match self {
            Self::InvalidInput => ERROR_INVALID_PARAMS,
            Self::AuthRequired | Self::AuthInvalid => ERROR_UNAUTHORIZED,
            Self::NormalizationFailed
            | Self::ExternalServiceError
            | Self::ExternalServiceUnavailable => ERROR_TOOL_EXECUTION,
            Self::ConfigError | Self::InternalError | Self::DatabaseError => ERROR_INTERNAL_ERROR,
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message naming the offending field or input
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Get the JSON-RPC error code for this error
    #[must_use]
    pub fn jsonrpc_code(&self) -> i32 {
        self.code.jsonrpc_code()
    }

    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Invalid authentication
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<NormalizationError> for AppError {
    fn from(error: NormalizationError) -> Self {
        Self::new(ErrorCode::NormalizationFailed, error.to_string()).with_source(error)
    }
}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        Self::new(ErrorCode::InvalidInput, error.to_string()).with_source(error)
    }
}

impl From<UpstreamError> for AppError {
    fn from(error: UpstreamError) -> Self {
        let code = match &error {
            UpstreamError::ModelUnavailable(_) => ErrorCode::ExternalServiceError,
            UpstreamError::OcrUnavailable(_) => ErrorCode::ExternalServiceUnavailable,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::new(ErrorCode::DatabaseError, format!("database operation failed: {error}"))
            .with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorResponseDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message.clone(),
            },
        }
    }
}
