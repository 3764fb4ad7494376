// ABOUTME: Shared bearer token validation for the MCP and REST surfaces
// ABOUTME: Constant-time comparison against the single operator-configured token
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Bearer Token Authentication
//!
//! This server uses a single shared bearer token (`AUTH_TOKEN`). The
//! transport layer extracts the `Authorization` header and this validator
//! checks it in constant time. Anything heavier (JWT, key rotation, scopes)
//! is out of scope for this deployment model.

use crate::errors::{AppError, AppResult};
use subtle::ConstantTimeEq;

/// Validates presented bearer tokens against the configured shared token
#[derive(Clone)]
pub struct BearerValidator {
    token: String,
}

impl BearerValidator {
    /// Create a validator for the given shared token
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Validate an `Authorization` header value (`Bearer <token>`).
    ///
    /// # Errors
    ///
    /// - `AuthRequired` when no header was presented
    /// - `AuthInvalid` when the header is malformed or the token mismatches
    pub fn validate_header(&self, header: Option<&str>) -> AppResult<()> {
        let header = header.ok_or_else(AppError::auth_required)?;
        let presented = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::auth_invalid("Authorization header must be a bearer token"))?;
        self.validate_token(presented)
    }

    /// Validate a bare token value.
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` when the token does not match.
    pub fn validate_token(&self, presented: &str) -> AppResult<()> {
        if presented.as_bytes().ct_eq(self.token.as_bytes()).into() {
            Ok(())
        } else {
            Err(AppError::auth_invalid("bearer token mismatch"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_valid_bearer_header() {
        let validator = BearerValidator::new("sesame");
        assert!(validator.validate_header(Some("Bearer sesame")).is_ok());
    }

    #[test]
    fn test_missing_header_is_auth_required() {
        let validator = BearerValidator::new("sesame");
        let error = validator.validate_header(None).unwrap_err();
        assert_eq!(error.code, ErrorCode::AuthRequired);
    }

    #[test]
    fn test_malformed_and_mismatched_tokens_rejected() {
        let validator = BearerValidator::new("sesame");
        assert!(validator.validate_header(Some("Basic sesame")).is_err());
        assert!(validator.validate_header(Some("Bearer wrong")).is_err());
        // Prefix of the real token must not pass
        assert!(validator.validate_token("sesam").is_err());
    }
}
