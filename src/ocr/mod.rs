// ABOUTME: Receipt OCR abstraction and line filtering for grocery bill scanning
// ABOUTME: Trait-based provider seam plus noise-keyword filtering of raw OCR lines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Receipt OCR
//!
//! Provider-agnostic OCR interface for extracting text lines from grocery
//! receipt images, plus the keyword filter that drops non-item lines
//! (totals, prices, tax rows) before the items reach the inventory.

use crate::constants::RECEIPT_NOISE_KEYWORDS;
use crate::errors::UpstreamError;
use async_trait::async_trait;

mod azure;

pub use azure::AzureReadClient;

/// OCR provider that turns a receipt image into text lines
#[async_trait]
pub trait ReceiptOcr: Send + Sync {
    /// Extract text lines from an image, in reading order
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::OcrUnavailable`] when the provider cannot be
    /// reached or the job fails.
    async fn read_text(&self, image: &[u8]) -> Result<Vec<String>, UpstreamError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Filter raw OCR lines down to probable grocery items
///
/// Drops blank lines and any line containing a noise keyword (totals,
/// prices, quantities, tax) as a case-insensitive substring.
#[must_use]
pub fn filter_receipt_items(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .filter(|line| {
            let lowered = line.to_lowercase();
            !RECEIPT_NOISE_KEYWORDS
                .iter()
                .any(|keyword| lowered.contains(keyword))
        })
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn test_filter_drops_noise_lines() {
        let raw = lines(&[
            "Bananas",
            "TOTAL 12.50",
            "Milk 2L",
            "Amount Due",
            "Price: 3.99",
            "Qty 2",
            "Tax 0.40",
            "$4.20",
            "Eggs",
        ]);
        assert_eq!(filter_receipt_items(&raw), lines(&["Bananas", "Milk 2L", "Eggs"]));
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let raw = lines(&["ToTaL", "bread"]);
        assert_eq!(filter_receipt_items(&raw), lines(&["bread"]));
    }

    #[test]
    fn test_filter_trims_and_drops_blank_lines() {
        let raw = lines(&["  apples  ", "   ", ""]);
        assert_eq!(filter_receipt_items(&raw), lines(&["apples"]));
    }

    #[test]
    fn test_filter_matches_substring_keywords() {
        // "rs" matches inside words, mirroring the deliberately blunt filter
        let raw = lines(&["Pears", "Onions"]);
        assert_eq!(filter_receipt_items(&raw), lines(&["Onions"]));
    }
}
