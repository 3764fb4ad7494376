// ABOUTME: Normalizers turning raw model output text into typed nutrition records and dish lists
// ABOUTME: Handles code fences, embedded prose, key aliases, and strict vs zero-fill missing fields
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Model Output Normalizers
//!
//! Generative models return loosely-structured text: a JSON object or array
//! somewhere inside prose, often wrapped in Markdown code fences. These pure
//! functions locate the structured span, parse it, fold key-spelling variants
//! into the canonical schema, and coerce values into validated records. No
//! partial results are ever returned; every failure names what was wrong.

use crate::errors::NormalizationError;
use crate::models::NutritionRecord;
use serde_json::Value;

/// The four canonical nutrition keys, in schema order
const CANONICAL_KEYS: [&str; 4] = ["calories", "protein", "carbs", "fat"];

/// Variant spellings folded into canonical keys before field lookup
const KEY_ALIASES: &[(&str, &str)] = &[
    ("calories (kcal)", "calories"),
    ("calories_kcal", "calories"),
    ("protein (g)", "protein"),
    ("protein_g", "protein"),
    ("carbs (g)", "carbs"),
    ("carbs_g", "carbs"),
    ("fat (g)", "fat"),
    ("fat_g", "fat"),
];

/// How to treat a canonical key that is absent from the model's JSON.
///
/// The prompt instructs the model to emit `0` for unknown values, but models
/// drift; both behaviors shipped at different points, so the choice is a
/// configuration flag (`STRICT_NUTRITION_FIELDS`) rather than hardcoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingFieldPolicy {
    /// Fail with `MissingField(key)` when a canonical key is absent
    #[default]
    Strict,
    /// Substitute `0` for absent keys (and JSON `null` values)
    ZeroFill,
}

/// Normalize a model reply into a fully-populated [`NutritionRecord`].
///
/// Strips fence markup and surrounding prose, extracts the first balanced
/// `{...}` span, parses it, folds key aliases, applies the missing-field
/// policy, and coerces every value to a non-negative finite number.
///
/// # Errors
///
/// - `NoObjectFound` when the text contains no `{...}` span
/// - `InvalidJson` when the span does not parse to a JSON object
/// - `MissingField(key)` under [`MissingFieldPolicy::Strict`]
/// - `NotANumber(key)` when a value is not coercible to a non-negative number
pub fn normalize_nutrition(
    raw_text: &str,
    policy: MissingFieldPolicy,
) -> Result<NutritionRecord, NormalizationError> {
    let stripped = strip_preamble(raw_text);
    let span = find_balanced_span(stripped, '{', '}').ok_or(NormalizationError::NoObjectFound)?;

    let value: Value = serde_json::from_str(span)
        .map_err(|e| NormalizationError::InvalidJson(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(NormalizationError::InvalidJson(
            "expected a JSON object".into(),
        ));
    };

    // Fold alias spellings onto the canonical keys without clobbering an
    // already-present canonical entry.
    let mut folded = map;
    for (alias, canonical) in KEY_ALIASES {
        if let Some(value) = folded.remove(*alias) {
            folded.entry((*canonical).to_owned()).or_insert(value);
        }
    }

    let mut fields = [0.0f64; 4];
    for (slot, key) in fields.iter_mut().zip(CANONICAL_KEYS) {
        *slot = match folded.get(key) {
            Some(value) => coerce_number(key, value, policy)?,
            None => match policy {
                MissingFieldPolicy::Strict => {
                    return Err(NormalizationError::MissingField(key.to_owned()));
                }
                MissingFieldPolicy::ZeroFill => 0.0,
            },
        };
    }

    let [calories, protein, carbs, fat] = fields;
    Ok(NutritionRecord::new(calories, protein, carbs, fat))
}

/// Normalize a model reply into a non-empty list of dish names.
///
/// Extracts the first balanced `[...]` span and requires every element to be
/// a string. The caller's prompt asks for exactly three dishes, but any
/// non-empty all-string list is accepted; models legitimately vary the count.
///
/// # Errors
///
/// - `NoObjectFound` when the text contains no `[...]` span
/// - `InvalidJson` when the span does not parse as JSON
/// - `NotAStringList` when the array is empty or holds non-string elements
pub fn normalize_dishes(raw_text: &str) -> Result<Vec<String>, NormalizationError> {
    let stripped = strip_preamble(raw_text);
    let span = find_balanced_span(stripped, '[', ']').ok_or(NormalizationError::NoObjectFound)?;

    let value: Value = serde_json::from_str(span)
        .map_err(|e| NormalizationError::InvalidJson(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(NormalizationError::NotAStringList);
    };
    if items.is_empty() {
        return Err(NormalizationError::NotAStringList);
    }

    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            _ => Err(NormalizationError::NotAStringList),
        })
        .collect()
}

/// Strip leading/trailing whitespace, leading code-fence backticks, and a
/// leading `json` language tag.
fn strip_preamble(text: &str) -> &str {
    let trimmed = text.trim().trim_start_matches(['`', ' ', '\n']);
    if trimmed
        .get(..4)
        .is_some_and(|tag| tag.eq_ignore_ascii_case("json"))
    {
        trimmed[4..].trim_start_matches([' ', '\n'])
    } else {
        trimmed
    }
}

/// Locate the first balanced `open...close` span, respecting JSON string
/// literals and escapes so braces inside values don't end the scan early.
fn find_balanced_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Coerce one field value to a non-negative finite `f64`.
///
/// Accepts JSON numbers and numeric strings. `null` counts as `0` under
/// `ZeroFill` only. Negative and non-finite values are rejected; record
/// fields are non-negative by invariant.
fn coerce_number(
    key: &str,
    value: &Value,
    policy: MissingFieldPolicy,
) -> Result<f64, NormalizationError> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null if policy == MissingFieldPolicy::ZeroFill => Some(0.0),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(NormalizationError::NotANumber(key.to_owned())),
    }
}
