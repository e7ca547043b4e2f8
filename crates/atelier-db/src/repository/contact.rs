//! # Contact Repository
//!
//! Database operations for contacts (customers and vendors).

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use atelier_core::Contact;

const CONTACT_COLUMNS: &str =
    "id, name, contact_type, email, mobile, city, state, pincode, created_at";

/// Repository for contact database operations.
#[derive(Debug, Clone)]
pub struct ContactRepository {
    pool: SqlitePool,
}

impl ContactRepository {
    /// Creates a new ContactRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ContactRepository { pool }
    }

    /// Gets a contact by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    /// Gets a contact by email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    /// Inserts a new contact.
    pub async fn insert(&self, contact: &Contact) -> DbResult<()> {
        debug!(id = %contact.id, name = %contact.name, "Inserting contact");

        sqlx::query(
            r#"
            INSERT INTO contacts (
                id, name, contact_type, email, mobile, city, state, pincode, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&contact.id)
        .bind(&contact.name)
        .bind(contact.contact_type)
        .bind(&contact.email)
        .bind(&contact.mobile)
        .bind(&contact.city)
        .bind(&contact.state)
        .bind(&contact.pincode)
        .bind(contact.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Generates a new contact ID.
pub fn generate_contact_id() -> String {
    Uuid::new_v4().to_string()
}
