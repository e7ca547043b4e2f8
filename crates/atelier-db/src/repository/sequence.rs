//! # Document Number Allocation
//!
//! Atomic per-series counters backing the business document numbers.
//!
//! ## Why a counter table?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  ❌ WRONG: count rows, use count+1                                   │
//! │     Two concurrent creations read the same count and both emit      │
//! │     SO-000042. Duplicate numbers, broken references downstream.     │
//! │                                                                     │
//! │  ✅ CORRECT: single-row atomic upsert                                │
//! │     INSERT .. ON CONFLICT DO UPDATE SET last_value = last_value + 1 │
//! │     RETURNING last_value                                            │
//! │                                                                     │
//! │  The row update serializes allocations per series; running it as    │
//! │  the FIRST statement of the document transaction also takes the     │
//! │  SQLite write lock up front.                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Allocation must happen inside the transaction that inserts the numbered
//! document: a rollback returns the number to the gap-free sequence only if
//! nothing else allocated meanwhile (gaps after rollbacks are acceptable;
//! duplicates are not).

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use atelier_core::NumberSeries;

/// Allocates the next number in `series`, formatted (`SO-000042`).
///
/// Runs on the caller's connection so it participates in the surrounding
/// transaction.
pub async fn allocate(conn: &mut SqliteConnection, series: NumberSeries) -> DbResult<String> {
    let value: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO number_sequences (series, last_value)
        VALUES (?1, 1)
        ON CONFLICT(series) DO UPDATE SET last_value = last_value + 1
        RETURNING last_value
        "#,
    )
    .bind(series.key())
    .fetch_one(conn)
    .await?;

    let number = series.format(value);
    debug!(series = series.key(), number = %number, "Allocated document number");
    Ok(number)
}

/// Returns the last value handed out for `series` (0 if none yet).
/// Diagnostics only; never use this to derive the next number.
pub async fn last_value(conn: &mut SqliteConnection, series: NumberSeries) -> DbResult<i64> {
    let value: Option<i64> =
        sqlx::query_scalar("SELECT last_value FROM number_sequences WHERE series = ?1")
            .bind(series.key())
            .fetch_optional(conn)
            .await?;

    Ok(value.unwrap_or(0))
}

// =============================================================================
// Unit Tests
// =============================================================================
