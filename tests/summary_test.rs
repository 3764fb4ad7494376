// ABOUTME: Integration tests for daily and date-range summary queries
// ABOUTME: Covers day bracketing, range grouping, ordering, and lenient bounds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

mod common;

use anyhow::Result;
use chrono::NaiveDate;
use remy_mcp_server::ledger::LedgerStore;
use remy_mcp_server::models::NutritionRecord;

/// Backdate an event so multi-day queries can be exercised. Appends through
/// the public API never leave "now", so tests write the log row directly.
async fn insert_event_at(
    ledger: &LedgerStore,
    user_id: &str,
    food: &str,
    record: NutritionRecord,
    timestamp: &str,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO nutrition_log (id, user_id, food, amount, calories, protein, carbs, fat, timestamp)
         VALUES (?, ?, ?, 1.0, ?, ?, ?, ?, ?)",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(food)
    .bind(record.calories)
    .bind(record.protein)
    .bind(record.carbs)
    .bind(record.fat)
    .bind(timestamp)
    .execute(ledger.pool())
    .await?;
    Ok(())
}

#[tokio::test]
async fn test_daily_summary_sums_only_that_day() -> Result<()> {
    let ledger = common::create_test_ledger().await?;

    insert_event_at(
        &ledger,
        "alice",
        "banana",
        NutritionRecord::new(95.0, 0.5, 25.0, 0.3),
        "2025-08-01T08:30:00.000000Z",
    )
    .await?;
    insert_event_at(
        &ledger,
        "alice",
        "egg",
        NutritionRecord::new(70.0, 6.0, 0.5, 5.0),
        "2025-08-01T20:15:00.000000Z",
    )
    .await?;
    insert_event_at(
        &ledger,
        "alice",
        "toast",
        NutritionRecord::new(80.0, 3.0, 15.0, 1.0),
        "2025-08-02T07:00:00.000000Z",
    )
    .await?;

    let day = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    let summary = ledger.daily_summary("alice", day).await?;
    assert_eq!(summary, NutritionRecord::new(165.0, 6.5, 25.5, 5.3));
    Ok(())
}

#[tokio::test]
async fn test_daily_summary_empty_day_is_zero() -> Result<()> {
    let ledger = common::create_test_ledger().await?;
    let day = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    let summary = ledger.daily_summary("alice", day).await?;
    assert_eq!(summary, NutritionRecord::zero());
    Ok(())
}

#[tokio::test]
async fn test_range_summary_groups_by_day_ascending() -> Result<()> {
    let ledger = common::create_test_ledger().await?;

    // Inserted out of order to check the query sorts by date
    insert_event_at(
        &ledger,
        "alice",
        "toast",
        NutritionRecord::new(80.0, 3.0, 15.0, 1.0),
        "2025-08-03T07:00:00.000000Z",
    )
    .await?;
    insert_event_at(
        &ledger,
        "alice",
        "banana",
        NutritionRecord::new(95.0, 0.5, 25.0, 0.3),
        "2025-08-01T08:30:00.000000Z",
    )
    .await?;
    insert_event_at(
        &ledger,
        "alice",
        "egg",
        NutritionRecord::new(70.0, 6.0, 0.5, 5.0),
        "2025-08-01T20:15:00.000000Z",
    )
    .await?;

    let days = ledger.range_summary("alice", None, None).await?;
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
    assert_eq!(days[0].nutrition, NutritionRecord::new(165.0, 6.5, 25.5, 5.3));
    assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2025, 8, 3).unwrap());
    assert_eq!(days[1].nutrition, NutritionRecord::new(80.0, 3.0, 15.0, 1.0));
    Ok(())
}

#[tokio::test]
async fn test_single_day_range_equals_daily_summary() -> Result<()> {
    let ledger = common::create_test_ledger().await?;

    insert_event_at(
        &ledger,
        "alice",
        "banana",
        NutritionRecord::new(95.0, 0.5, 25.0, 0.3),
        "2025-08-01T08:30:00.000000Z",
    )
    .await?;
    insert_event_at(
        &ledger,
        "alice",
        "toast",
        NutritionRecord::new(80.0, 3.0, 15.0, 1.0),
        "2025-08-02T07:00:00.000000Z",
    )
    .await?;

    let day = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    let range = ledger
        .range_summary("alice", Some("2025-08-01"), Some("2025-08-01"))
        .await?;
    assert_eq!(range.len(), 1);
    assert_eq!(range[0].date, day);
    assert_eq!(range[0].nutrition, ledger.daily_summary("alice", day).await?);
    Ok(())
}

#[tokio::test]
async fn test_malformed_range_bounds_are_ignored() -> Result<()> {
    let ledger = common::create_test_ledger().await?;

    insert_event_at(
        &ledger,
        "alice",
        "banana",
        NutritionRecord::new(95.0, 0.5, 25.0, 0.3),
        "2025-08-01T08:30:00.000000Z",
    )
    .await?;

    // Garbage bounds behave as if no bound was supplied
    let days = ledger
        .range_summary("alice", Some("not-a-date"), Some("01/08/2025"))
        .await?;
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].nutrition, NutritionRecord::new(95.0, 0.5, 25.0, 0.3));
    Ok(())
}

#[tokio::test]
async fn test_range_summary_respects_user_boundary() -> Result<()> {
    let ledger = common::create_test_ledger().await?;

    insert_event_at(
        &ledger,
        "alice",
        "banana",
        NutritionRecord::new(95.0, 0.5, 25.0, 0.3),
        "2025-08-01T08:30:00.000000Z",
    )
    .await?;
    insert_event_at(
        &ledger,
        "bob",
        "steak",
        NutritionRecord::new(600.0, 50.0, 0.0, 40.0),
        "2025-08-01T12:00:00.000000Z",
    )
    .await?;

    let days = ledger.range_summary("alice", None, None).await?;
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].nutrition, NutritionRecord::new(95.0, 0.5, 25.0, 0.3));
    Ok(())
}
