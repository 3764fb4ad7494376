// ABOUTME: Append-only nutrition event ledger with a per-user running-totals projection
// ABOUTME: Single durable SQLite store with transactional append and date-grouped summary queries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Ledger Store
//!
//! This module owns the nutrition event log and its running-totals projection.
//! Events are immutable once appended; totals only grow (there is no delete or
//! decrement operation). The projection is maintained inside the same
//! transaction as the log insert via an atomic `ON CONFLICT .. DO UPDATE`
//! increment, so concurrent appends for one user can never lose an update and
//! readers observe either the pre- or post-state of a whole event, never a
//! partially applied record.

use crate::errors::{AppError, AppResult, ValidationError};
use crate::models::{DailyNutrition, NutritionEvent, NutritionRecord, TotalsProjection};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

/// Durable store for nutrition events and per-user totals
#[derive(Clone)]
pub struct LedgerStore {
    pool: Pool<Sqlite>,
}

impl LedgerStore {
    /// Open (creating if necessary) the ledger database and run migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") && !is_memory(database_url)
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        // An in-memory SQLite database exists per connection, so a pool of
        // them would give each connection its own empty schema.
        let pool = if is_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect(&connection_options)
                .await?
        } else {
            SqlitePool::connect(&connection_options).await?
        };

        let store = Self { pool };
        store.migrate().await?;
        info!("Ledger store initialized: {database_url}");
        Ok(store)
    }

    /// Run database migrations
    async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS nutrition_log (
                id         TEXT PRIMARY KEY,
                user_id    TEXT NOT NULL,
                food       TEXT NOT NULL,
                amount     REAL NOT NULL,
                calories   REAL NOT NULL,
                protein    REAL NOT NULL,
                carbs      REAL NOT NULL,
                fat        REAL NOT NULL,
                timestamp  TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_nutrition_log_user_time
             ON nutrition_log(user_id, timestamp)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS nutrition_totals (
                user_id  TEXT PRIMARY KEY,
                calories REAL NOT NULL DEFAULT 0,
                protein  REAL NOT NULL DEFAULT 0,
                carbs    REAL NOT NULL DEFAULT 0,
                fat      REAL NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Access the underlying pool so sibling stores can share one database
    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Append a nutrition event and update the user's totals projection.
    ///
    /// The log insert and the totals increment happen in one transaction;
    /// the increment is a single SQL statement, not a read-modify-write.
    ///
    /// # Errors
    ///
    /// Fails with a validation error when `user_id` or `food` is empty, when
    /// `amount` is not a positive finite number, or when the record carries a
    /// non-finite field.
    pub async fn append_event(
        &self,
        user_id: &str,
        food: &str,
        amount: f64,
        record: NutritionRecord,
    ) -> AppResult<NutritionEvent> {
        if user_id.trim().is_empty() {
            return Err(ValidationError::EmptyUserId.into());
        }
        if food.trim().is_empty() {
            return Err(ValidationError::EmptyFoodName.into());
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::invalid_input(format!(
                "amount must be a positive number, got {amount}"
            )));
        }
        if !record.is_finite() {
            return Err(ValidationError::IncompleteNutritionInput(
                "nutrition fields must be finite numbers".into(),
            )
            .into());
        }

        let event = NutritionEvent {
            id: Uuid::new_v4(),
            user_id: user_id.to_owned(),
            food: food.to_owned(),
            amount,
            nutrition: record,
            timestamp: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO nutrition_log (id, user_id, food, amount, calories, protein, carbs, fat, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(event.id.to_string())
        .bind(&event.user_id)
        .bind(&event.food)
        .bind(event.amount)
        .bind(record.calories)
        .bind(record.protein)
        .bind(record.carbs)
        .bind(record.fat)
        .bind(format_timestamp(event.timestamp))
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO nutrition_totals (user_id, calories, protein, carbs, fat)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                calories = calories + excluded.calories,
                protein  = protein  + excluded.protein,
                carbs    = carbs    + excluded.carbs,
                fat      = fat      + excluded.fat
            ",
        )
        .bind(&event.user_id)
        .bind(record.calories)
        .bind(record.protein)
        .bind(record.carbs)
        .bind(record.fat)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            user_id = %event.user_id,
            food = %event.food,
            amount = %event.amount,
            "Appended nutrition event"
        );
        Ok(event)
    }

    /// Return the user's running totals projection.
    ///
    /// A user with no events gets a zero-valued projection; this never fails
    /// for unknown users.
    ///
    /// # Errors
    ///
    /// Returns an error only when the underlying query fails.
    pub async fn get_totals(&self, user_id: &str) -> AppResult<TotalsProjection> {
        let row = sqlx::query(
            "SELECT calories, protein, carbs, fat FROM nutrition_totals WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(TotalsProjection {
                user_id: user_id.to_owned(),
                calories: row.try_get("calories")?,
                protein: row.try_get("protein")?,
                carbs: row.try_get("carbs")?,
                fat: row.try_get("fat")?,
            }),
            None => Ok(TotalsProjection::zero(user_id)),
        }
    }

    /// Sum every event for the user whose timestamp falls within the given
    /// UTC calendar day. Returns an all-zero record when none match.
    ///
    /// # Errors
    ///
    /// Returns an error only when the underlying query fails.
    pub async fn daily_summary(&self, user_id: &str, day: NaiveDate) -> AppResult<NutritionRecord> {
        // The COALESCE defaults must stay 0.0: an integer 0 makes the empty-day
        // sum decode as SQLite INTEGER, which sqlx refuses to read into f64.
        let row = sqlx::query(
            r"
            SELECT COALESCE(SUM(calories), 0.0) AS calories,
                   COALESCE(SUM(protein), 0.0)  AS protein,
                   COALESCE(SUM(carbs), 0.0)    AS carbs,
                   COALESCE(SUM(fat), 0.0)      AS fat
            FROM nutrition_log
            WHERE user_id = ? AND timestamp BETWEEN ? AND ?
            ",
        )
        .bind(user_id)
        .bind(day_start(day))
        .bind(day_end(day))
        .fetch_one(&self.pool)
        .await?;

        Ok(NutritionRecord::new(
            row.try_get("calories")?,
            row.try_get("protein")?,
            row.try_get("carbs")?,
            row.try_get("fat")?,
        ))
    }

    /// Group the user's events by UTC calendar date, summing each field,
    /// ordered ascending by date. Bounds are inclusive; the end bound extends
    /// to the end of its day.
    ///
    /// A malformed `start_date` or `end_date` string is ignored (the bound is
    /// simply not applied) rather than rejected. That leniency is deliberate
    /// and load-bearing for existing clients; do not tighten it silently.
    ///
    /// # Errors
    ///
    /// Returns an error only when the underlying query fails.
    pub async fn range_summary(
        &self,
        user_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> AppResult<Vec<DailyNutrition>> {
        let start_bound = start_date.and_then(parse_lenient_date).map(day_start);
        let end_bound = end_date.and_then(parse_lenient_date).map(day_end);

        let mut sql = String::from(
            r"
            SELECT date(timestamp) AS day,
                   SUM(calories) AS calories,
                   SUM(protein)  AS protein,
                   SUM(carbs)    AS carbs,
                   SUM(fat)      AS fat
            FROM nutrition_log
            WHERE user_id = ?
            ",
        );
        if start_bound.is_some() {
            sql.push_str(" AND timestamp >= ?");
        }
        if end_bound.is_some() {
            sql.push_str(" AND timestamp <= ?");
        }
        sql.push_str(" GROUP BY date(timestamp) ORDER BY date(timestamp)");

        let mut query = sqlx::query(&sql).bind(user_id);
        if let Some(bound) = &start_bound {
            query = query.bind(bound);
        }
        if let Some(bound) = &end_bound {
            query = query.bind(bound);
        }

        let rows = query.fetch_all(&self.pool).await?;

        let mut days = Vec::with_capacity(rows.len());
        for row in rows {
            let day: String = row.try_get("day")?;
            let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                .map_err(|e| AppError::database(format!("unparseable date group '{day}': {e}")))?;
            days.push(DailyNutrition {
                date,
                nutrition: NutritionRecord::new(
                    row.try_get("calories")?,
                    row.try_get("protein")?,
                    row.try_get("carbs")?,
                    row.try_get("fat")?,
                ),
            });
        }
        Ok(days)
    }
}

fn is_memory(database_url: &str) -> bool {
    database_url.contains(":memory:")
}

/// Timestamps are stored as fixed-width RFC 3339 UTC text so that string
/// comparison orders them chronologically.
fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn day_start(day: NaiveDate) -> String {
    format!("{}T00:00:00.000000Z", day.format("%Y-%m-%d"))
}

fn day_end(day: NaiveDate) -> String {
    format!("{}T23:59:59.999999Z", day.format("%Y-%m-%d"))
}

fn parse_lenient_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
