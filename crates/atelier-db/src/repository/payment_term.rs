//! # Payment Term Repository
//!
//! Database operations for payment terms.
//!
//! The system-wide default term is resolved by the `is_default` flag (a
//! partial unique index allows at most one such row), never by matching on
//! the term's display name.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use atelier_core::PaymentTerm;

const TERM_COLUMNS: &str = "id, name, is_default, created_at";

/// Repository for payment term database operations.
#[derive(Debug, Clone)]
pub struct PaymentTermRepository {
    pool: SqlitePool,
}

impl PaymentTermRepository {
    /// Creates a new PaymentTermRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentTermRepository { pool }
    }

    /// Gets a payment term by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<PaymentTerm>> {
        let term = sqlx::query_as::<_, PaymentTerm>(&format!(
            "SELECT {TERM_COLUMNS} FROM payment_terms WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(term)
    }

    /// Gets the system-wide default payment term.
    pub async fn get_default(&self) -> DbResult<Option<PaymentTerm>> {
        let term = sqlx::query_as::<_, PaymentTerm>(&format!(
            "SELECT {TERM_COLUMNS} FROM payment_terms WHERE is_default = 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(term)
    }

    /// Lists all payment terms.
    pub async fn list(&self) -> DbResult<Vec<PaymentTerm>> {
        let terms = sqlx::query_as::<_, PaymentTerm>(&format!(
            "SELECT {TERM_COLUMNS} FROM payment_terms ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(terms)
    }

    /// Inserts a new (non-default) payment term.
    pub async fn insert(&self, term: &PaymentTerm) -> DbResult<()> {
        debug!(id = %term.id, name = %term.name, "Inserting payment term");

        sqlx::query(
            "INSERT INTO payment_terms (id, name, is_default, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&term.id)
        .bind(&term.name)
        .bind(term.is_default)
        .bind(term.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Generates a new payment term ID.
pub fn generate_payment_term_id() -> String {
    Uuid::new_v4().to_string()
}
