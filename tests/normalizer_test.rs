// ABOUTME: Integration tests for model output normalization
// ABOUTME: Covers fence stripping, alias folding, missing-field policies, and dish lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

mod common;

use remy_mcp_server::errors::NormalizationError;
use remy_mcp_server::models::NutritionRecord;
use remy_mcp_server::normalizer::{normalize_dishes, normalize_nutrition, MissingFieldPolicy};

#[test]
fn test_clean_json_object_normalizes_exactly() {
    common::init_test_logging();

    let raw = r#"{"calories": 95.0, "protein": 0.5, "carbs": 25.0, "fat": 0.3}"#;
    let record = normalize_nutrition(raw, MissingFieldPolicy::Strict).unwrap();
    assert_eq!(record, NutritionRecord::new(95.0, 0.5, 25.0, 0.3));
}

#[test]
fn test_fenced_reply_with_preamble_normalizes() {
    let raw = "Sure! Here you go:\n```json\n{\"calories\": 95, \"protein\": 0.5, \"carbs\": 25, \"fat\": 0.3}\n```";
    let record = normalize_nutrition(raw, MissingFieldPolicy::Strict).unwrap();
    assert_eq!(record, NutritionRecord::new(95.0, 0.5, 25.0, 0.3));
}

#[test]
fn test_prose_without_json_is_no_object_found() {
    let result = normalize_nutrition("no data here", MissingFieldPolicy::Strict);
    assert_eq!(result.unwrap_err(), NormalizationError::NoObjectFound);
}

#[test]
fn test_alias_spellings_fold_onto_canonical_keys() {
    let raw = r#"{"calories": 100, "protein (g)": 2, "carbs_g": 3, "fat_g": 1}"#;
    let record = normalize_nutrition(raw, MissingFieldPolicy::Strict).unwrap();
    assert_eq!(record, NutritionRecord::new(100.0, 2.0, 3.0, 1.0));
}

#[test]
fn test_canonical_key_wins_over_alias() {
    let raw = r#"{"calories": 100, "calories (kcal)": 999, "protein": 1, "carbs": 2, "fat": 3}"#;
    let record = normalize_nutrition(raw, MissingFieldPolicy::Strict).unwrap();
    assert!((record.calories - 100.0).abs() < f64::EPSILON);
}

#[test]
fn test_numeric_strings_coerce() {
    let raw = r#"{"calories": "95", "protein": "0.5", "carbs": 25, "fat": 0.3}"#;
    let record = normalize_nutrition(raw, MissingFieldPolicy::Strict).unwrap();
    assert_eq!(record, NutritionRecord::new(95.0, 0.5, 25.0, 0.3));
}

#[test]
fn test_negative_value_is_not_a_number() {
    let raw = r#"{"calories": -5, "protein": 0, "carbs": 0, "fat": 0}"#;
    let result = normalize_nutrition(raw, MissingFieldPolicy::Strict);
    assert_eq!(
        result.unwrap_err(),
        NormalizationError::NotANumber("calories".into())
    );
}

#[test]
fn test_policies_differ_exactly_on_missing_keys() {
    let raw = r#"{"calories": 95, "protein": 0.5, "carbs": 25}"#;

    let strict = normalize_nutrition(raw, MissingFieldPolicy::Strict);
    assert_eq!(
        strict.unwrap_err(),
        NormalizationError::MissingField("fat".into())
    );

    let zero_fill = normalize_nutrition(raw, MissingFieldPolicy::ZeroFill).unwrap();
    assert_eq!(zero_fill, NutritionRecord::new(95.0, 0.5, 25.0, 0.0));

    // With all keys present the policies agree
    let complete = r#"{"calories": 95, "protein": 0.5, "carbs": 25, "fat": 0.3}"#;
    assert_eq!(
        normalize_nutrition(complete, MissingFieldPolicy::Strict).unwrap(),
        normalize_nutrition(complete, MissingFieldPolicy::ZeroFill).unwrap()
    );
}

#[test]
fn test_malformed_span_is_invalid_json() {
    let raw = r#"{"calories": 95, "protein": }"#;
    let result = normalize_nutrition(raw, MissingFieldPolicy::Strict);
    assert!(matches!(
        result.unwrap_err(),
        NormalizationError::InvalidJson(_)
    ));
}

#[test]
fn test_dish_list_preserves_order_verbatim() {
    let raw = r#"["Spinach Omelette", "Paneer Stir Fry", "Veggie Wrap"]"#;
    let dishes = normalize_dishes(raw).unwrap();
    assert_eq!(
        dishes,
        vec!["Spinach Omelette", "Paneer Stir Fry", "Veggie Wrap"]
    );
}

#[test]
fn test_dish_list_in_fenced_reply() {
    let raw = "Here are some ideas:\n```json\n[\"Tomato Soup\", \"Bruschetta\"]\n```";
    let dishes = normalize_dishes(raw).unwrap();
    assert_eq!(dishes, vec!["Tomato Soup", "Bruschetta"]);
}

#[test]
fn test_empty_or_mixed_dish_list_rejected() {
    assert_eq!(
        normalize_dishes("[]").unwrap_err(),
        NormalizationError::NotAStringList
    );
    assert_eq!(
        normalize_dishes(r#"["Soup", 42]"#).unwrap_err(),
        NormalizationError::NotAStringList
    );
    assert_eq!(
        normalize_dishes("no list at all").unwrap_err(),
        NormalizationError::NoObjectFound
    );
}
