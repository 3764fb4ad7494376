// ABOUTME: Durable per-user ingredient inventory with case-insensitive deduplication
// ABOUTME: Backs the dish suggestion and receipt scanning tools
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Inventory Store
//!
//! Small durable store for each user's known ingredients. Receipt scans merge
//! detected items in here; dish suggestions read from it when the caller does
//! not supply an explicit ingredient list. Items deduplicate case-insensitively
//! with the first-seen casing preserved, and listing returns insertion order.

use crate::errors::{AppResult, ValidationError};
use chrono::{SecondsFormat, Utc};
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

/// Durable per-user ingredient list sharing the ledger's database
#[derive(Clone)]
pub struct InventoryStore {
    pool: Pool<Sqlite>,
}

impl InventoryStore {
    /// Create the store on an existing pool and run its migration.
    ///
    /// # Errors
    ///
    /// Returns an error if the migration fails.
    pub async fn new(pool: Pool<Sqlite>) -> AppResult<Self> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_inventory (
                user_id    TEXT NOT NULL,
                ingredient TEXT NOT NULL,
                added_at   TEXT NOT NULL,
                PRIMARY KEY (user_id, ingredient COLLATE NOCASE)
            )
            ",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Merge items into the user's inventory, skipping case-insensitive
    /// duplicates and blank entries. Returns the number of items added.
    ///
    /// # Errors
    ///
    /// Fails with a validation error when `user_id` is empty.
    pub async fn add_items(&self, user_id: &str, items: &[String]) -> AppResult<u64> {
        if user_id.trim().is_empty() {
            return Err(ValidationError::EmptyUserId.into());
        }

        let added_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let mut added = 0u64;
        for item in items {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let result = sqlx::query(
                "INSERT OR IGNORE INTO user_inventory (user_id, ingredient, added_at)
                 VALUES (?, ?, ?)",
            )
            .bind(user_id)
            .bind(item)
            .bind(&added_at)
            .execute(&self.pool)
            .await?;
            added += result.rows_affected();
        }

        debug!(user_id = %user_id, added = added, "Merged items into inventory");
        Ok(added)
    }

    /// List the user's ingredients in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error only when the underlying query fails.
    pub async fn list(&self, user_id: &str) -> AppResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT ingredient FROM user_inventory WHERE user_id = ? ORDER BY rowid",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("ingredient").map_err(Into::into))
            .collect()
    }
}
