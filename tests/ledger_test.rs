// ABOUTME: Integration tests for the ledger store's append, totals, and durability
// ABOUTME: Covers validation failures, per-user isolation, concurrency, and restarts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

mod common;

use anyhow::Result;
use remy_mcp_server::errors::ErrorCode;
use remy_mcp_server::ledger::LedgerStore;
use remy_mcp_server::models::NutritionRecord;

#[tokio::test]
async fn test_totals_are_elementwise_sum_of_events() -> Result<()> {
    let ledger = common::create_test_ledger().await?;

    ledger
        .append_event("alice", "banana", 1.0, NutritionRecord::new(95.0, 0.5, 25.0, 0.3))
        .await?;
    ledger
        .append_event("alice", "egg", 2.0, NutritionRecord::new(140.0, 12.0, 1.0, 10.0))
        .await?;

    let totals = ledger.get_totals("alice").await?;
    assert_eq!(totals.record(), NutritionRecord::new(235.0, 12.5, 26.0, 10.3));
    Ok(())
}

#[tokio::test]
async fn test_users_are_isolated() -> Result<()> {
    let ledger = common::create_test_ledger().await?;

    ledger
        .append_event("alice", "banana", 1.0, NutritionRecord::new(95.0, 0.5, 25.0, 0.3))
        .await?;
    ledger
        .append_event("bob", "steak", 1.0, NutritionRecord::new(600.0, 50.0, 0.0, 40.0))
        .await?;

    let alice = ledger.get_totals("alice").await?;
    let bob = ledger.get_totals("bob").await?;
    assert_eq!(alice.record(), NutritionRecord::new(95.0, 0.5, 25.0, 0.3));
    assert_eq!(bob.record(), NutritionRecord::new(600.0, 50.0, 0.0, 40.0));
    Ok(())
}

#[tokio::test]
async fn test_unknown_user_gets_zero_totals() -> Result<()> {
    let ledger = common::create_test_ledger().await?;
    let totals = ledger.get_totals("nobody").await?;
    assert_eq!(totals.record(), NutritionRecord::zero());
    Ok(())
}

#[tokio::test]
async fn test_append_validation_failures() -> Result<()> {
    let ledger = common::create_test_ledger().await?;
    let record = NutritionRecord::new(95.0, 0.5, 25.0, 0.3);

    let empty_user = ledger.append_event("", "banana", 1.0, record).await;
    assert_eq!(empty_user.unwrap_err().code, ErrorCode::InvalidInput);

    let empty_food = ledger.append_event("alice", "  ", 1.0, record).await;
    assert_eq!(empty_food.unwrap_err().code, ErrorCode::InvalidInput);

    let bad_amount = ledger.append_event("alice", "banana", 0.0, record).await;
    assert_eq!(bad_amount.unwrap_err().code, ErrorCode::InvalidInput);

    let nan_record = NutritionRecord::new(f64::NAN, 0.0, 0.0, 0.0);
    let bad_record = ledger.append_event("alice", "banana", 1.0, nan_record).await;
    assert_eq!(bad_record.unwrap_err().code, ErrorCode::InvalidInput);

    // Nothing landed in the ledger
    let totals = ledger.get_totals("alice").await?;
    assert_eq!(totals.record(), NutritionRecord::zero());
    Ok(())
}

#[tokio::test]
async fn test_concurrent_appends_lose_no_updates() -> Result<()> {
    let ledger = common::create_test_ledger().await?;
    let record = NutritionRecord::new(10.0, 1.0, 2.0, 0.5);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger.append_event("alice", "snack", 1.0, record).await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let totals = ledger.get_totals("alice").await?;
    assert_eq!(totals.record(), NutritionRecord::new(160.0, 16.0, 32.0, 8.0));
    Ok(())
}

#[tokio::test]
async fn test_file_backed_store_survives_reopen() -> Result<()> {
    common::init_test_logging();
    let dir = tempfile::tempdir()?;
    let url = format!("sqlite:{}", dir.path().join("ledger.db").display());

    {
        let ledger = LedgerStore::connect(&url).await?;
        ledger
            .append_event("alice", "banana", 1.0, NutritionRecord::new(95.0, 0.5, 25.0, 0.3))
            .await?;
    }

    let reopened = LedgerStore::connect(&url).await?;
    let totals = reopened.get_totals("alice").await?;
    assert_eq!(totals.record(), NutritionRecord::new(95.0, 0.5, 25.0, 0.3));

    let today = chrono::Utc::now().date_naive();
    let summary = reopened.daily_summary("alice", today).await?;
    assert_eq!(summary, NutritionRecord::new(95.0, 0.5, 25.0, 0.3));
    Ok(())
}
