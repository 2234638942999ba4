//! # Rate Sheet Repository
//!
//! The shop's rate sheet: named operations with their standard rate per
//! minute. Migrations seed the six standard operations; the sheet is
//! edited as shop rates change.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;

/// One rate sheet entry.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RateSheetEntry {
    /// Unique identifier.
    pub id: String,
    /// Operation name, unique.
    pub name: String,
    /// Standard rate in currency per minute.
    pub rate_per_minute: f64,
}

/// Repository for the rate sheet.
///
/// ## Usage
/// ```rust,ignore
/// let rate = db.rates().get_by_name("Сверление").await?;
/// ```
#[derive(Debug, Clone)]
pub struct RateRepository {
    pool: SqlitePool,
}

impl RateRepository {
    /// Creates a new RateRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RateRepository { pool }
    }

    /// Lists the rate sheet ordered by operation name.
    pub async fn list(&self) -> DbResult<Vec<RateSheetEntry>> {
        let rates = sqlx::query_as::<_, RateSheetEntry>(
            "SELECT id, name, rate_per_minute FROM operations_list ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rates)
    }

    /// Gets one entry by operation name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<RateSheetEntry>> {
        let rate = sqlx::query_as::<_, RateSheetEntry>(
            "SELECT id, name, rate_per_minute FROM operations_list WHERE name = ?1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rate)
    }

    /// Inserts or updates a rate sheet entry by name.
    pub async fn upsert(&self, name: &str, rate_per_minute: f64) -> DbResult<RateSheetEntry> {
        debug!(name = %name, rate = %rate_per_minute, "Upserting rate");

        if let Some(existing) = self.get_by_name(name).await? {
            sqlx::query("UPDATE operations_list SET rate_per_minute = ?2 WHERE id = ?1")
                .bind(&existing.id)
                .bind(rate_per_minute)
                .execute(&self.pool)
                .await?;

            return Ok(RateSheetEntry {
                rate_per_minute,
                ..existing
            });
        }

        let entry = RateSheetEntry {
            id: generate_id(),
            name: name.to_string(),
            rate_per_minute,
        };

        sqlx::query("INSERT INTO operations_list (id, name, rate_per_minute) VALUES (?1, ?2, ?3)")
            .bind(&entry.id)
            .bind(&entry.name)
            .bind(entry.rate_per_minute)
            .execute(&self.pool)
            .await?;

        Ok(entry)
    }

    /// Removes a rate sheet entry. Existing operation lines keep their
    /// recorded rate; only future entries lose the preset.
    pub async fn remove(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Removing rate");

        let result = sqlx::query("DELETE FROM operations_list WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Rate", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_seeded_rates_present() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let drilling = db.rates().get_by_name("Сверление").await.unwrap().unwrap();
        assert_eq!(drilling.rate_per_minute, 1.5);

        let turning = db.rates().get_by_name("Токарная обработка").await.unwrap().unwrap();
        assert_eq!(turning.rate_per_minute, 2.5);
    }

    #[tokio::test]
    async fn test_upsert_updates_existing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let updated = db.rates().upsert("Сверление", 1.8).await.unwrap();
        assert_eq!(updated.rate_per_minute, 1.8);

        // still six entries, not seven
        assert_eq!(db.rates().list().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_upsert_inserts_new() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.rates().upsert("Гибка", 2.1).await.unwrap();
        assert_eq!(db.rates().list().await.unwrap().len(), 7);
    }
}
