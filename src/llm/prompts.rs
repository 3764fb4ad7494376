// ABOUTME: Prompt templates for the nutrition estimation and dish suggestion calls
// ABOUTME: Keeps the exact wording the normalizers are tuned against in one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Prompt Templates
//!
//! The normalizers in [`crate::normalizer`] are tuned against these prompts:
//! the nutrition prompt demands the four fields as numbers in one JSON object
//! with `0` for unknowns, and the dish prompt demands a bare JSON array of
//! strings. Changing the wording here changes what the normalizers see.

/// Build the nutrition-facts prompt for a food and amount
#[must_use]
pub fn nutrition_facts(food: &str, amount: f64) -> String {
    format!(
        "Give me the nutrition facts for {amount} {food}. \
         Return calories, protein (g), carbs (g), and fat (g) as numbers in JSON format. \
         If you cannot determine a value for any field, return 0 for that field \
         (do not use null, empty, or omit the field). \
         Only return the JSON object."
    )
}

/// Build the dish-suggestion prompt for an ingredient list
#[must_use]
pub fn dish_suggestions(ingredients: &[String]) -> String {
    format!(
        "You are a helpful kitchen assistant. Suggest 3 creative, healthy dish names \
         using ONLY these ingredients: {}. \
         Return a JSON array of 3 dish names (strings). \
         Do not include any text or explanation, only the JSON array.",
        ingredients.join(", ")
    )
}
