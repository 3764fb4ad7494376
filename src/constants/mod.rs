// ABOUTME: Application constants organized by domain area
// ABOUTME: Centralizes protocol values, error codes, and receipt scanning heuristics
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Application constants

pub mod errors;
pub mod protocol;

/// Lines on a scanned receipt containing any of these keywords (matched
/// case-insensitively as substrings) are treated as totals/price/tax noise
/// rather than purchased items.
pub const RECEIPT_NOISE_KEYWORDS: &[&str] =
    &["total", "amount", "price", "rs", "$", "qty", "tax"];
