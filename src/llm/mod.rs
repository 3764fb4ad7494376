// ABOUTME: Text completion collaborator abstraction for pluggable model integration
// ABOUTME: Defines the CompletionProvider trait implemented by Gemini and test fakes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Completion Provider Interface
//!
//! The server treats the generative model as a black-box text completion
//! function: one prompt in, one text blob out. The call is synchronous from
//! the core's point of view and never retried here; a failed call surfaces
//! immediately as [`UpstreamError::ModelUnavailable`]. Tests inject scripted
//! fakes through this trait.

mod gemini;
pub mod prompts;

pub use gemini::GeminiCompletions;

use crate::errors::UpstreamError;
use async_trait::async_trait;

/// A black-box text completion collaborator
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete a single prompt into raw model text.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::ModelUnavailable`] when the call fails at the
    /// transport or API level. The raw (unnormalized) reply is not an error.
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
