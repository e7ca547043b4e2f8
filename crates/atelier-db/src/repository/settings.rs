//! # System Settings Repository
//!
//! Key/value flags read by the services, notably the invoicing policy.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use atelier_core::{InvoicingPolicy, SystemSetting, SETTING_AUTOMATIC_INVOICING};

/// Repository for system settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Gets a setting by key.
    pub async fn get(&self, key: &str) -> DbResult<Option<SystemSetting>> {
        let setting = sqlx::query_as::<_, SystemSetting>(
            "SELECT key, value, updated_at FROM system_settings WHERE key = ?1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting)
    }

    /// Sets a setting, inserting or overwriting.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, value = %value, "Writing system setting");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO system_settings (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                           updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Resolves the invoicing policy from `automatic_invoicing`.
    pub async fn invoicing_policy(&self) -> DbResult<InvoicingPolicy> {
        let setting = self.get(SETTING_AUTOMATIC_INVOICING).await?;
        let value = setting.as_ref().and_then(|s| s.value.as_deref());
        Ok(InvoicingPolicy::from_setting(value))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_invoicing_policy_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.settings();

        // seeded default is automatic
        assert_eq!(
            repo.invoicing_policy().await.unwrap(),
            InvoicingPolicy::Automatic
        );

        repo.set(SETTING_AUTOMATIC_INVOICING, "false").await.unwrap();
        assert_eq!(
            repo.invoicing_policy().await.unwrap(),
            InvoicingPolicy::Manual
        );

        repo.set(SETTING_AUTOMATIC_INVOICING, "true").await.unwrap();
        assert_eq!(
            repo.invoicing_policy().await.unwrap(),
            InvoicingPolicy::Automatic
        );
    }
}
