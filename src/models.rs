// ABOUTME: Core data structures for nutrition tracking shared across ledger, normalizer, and protocol layers
// ABOUTME: Defines nutrition records, ledger events, totals projections, and daily aggregation rows
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Core data models for the nutrition ledger

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use uuid::Uuid;

/// A validated 4-field nutrition record.
///
/// All four fields are always present and non-negative; a value missing from
/// an upstream source is coerced to `0` by the normalizer, never left out.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionRecord {
    /// Energy in kilocalories
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fat in grams
    pub fat: f64,
}

impl NutritionRecord {
    /// Create a record with the given values
    #[must_use]
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    /// All-zero record, used for users or days with no events
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// True when every field is a finite number
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.calories.is_finite()
            && self.protein.is_finite()
            && self.carbs.is_finite()
            && self.fat.is_finite()
    }
}

impl AddAssign for NutritionRecord {
    fn add_assign(&mut self, rhs: Self) {
        self.calories += rhs.calories;
        self.protein += rhs.protein;
        self.carbs += rhs.carbs;
        self.fat += rhs.fat;
    }
}

/// A single logged food event. Immutable once appended to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionEvent {
    /// Unique event identifier
    pub id: Uuid,
    /// Owner of the event
    pub user_id: String,
    /// Food or dish name as the caller supplied it
    pub food: String,
    /// Quantity of the food; defaults to `1` for locked-in dishes
    pub amount: f64,
    /// Estimated nutrition for the given amount
    pub nutrition: NutritionRecord,
    /// UTC instant the event was appended
    pub timestamp: DateTime<Utc>,
}

/// Running elementwise sum of every event's nutrition for one user.
///
/// Created lazily on the user's first event, updated additively on every
/// append, never evicted. Always equals the rebuild-from-log sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalsProjection {
    /// Owner of the totals
    pub user_id: String,
    /// Energy in kilocalories
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fat in grams
    pub fat: f64,
}

impl TotalsProjection {
    /// Zero-valued projection for a user with no events
    #[must_use]
    pub fn zero(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
        }
    }

    /// The projection's sums as a plain record
    #[must_use]
    pub fn record(&self) -> NutritionRecord {
        NutritionRecord::new(self.calories, self.protein, self.carbs, self.fat)
    }
}

/// One row of a date-grouped summary: all events on `date` summed per field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyNutrition {
    /// UTC calendar date
    pub date: NaiveDate,
    /// Summed nutrition for that date
    #[serde(flatten)]
    pub nutrition: NutritionRecord,
}
