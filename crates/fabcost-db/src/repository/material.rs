//! # Material Catalog Repository
//!
//! Database operations for the material catalog.
//!
//! The catalog is reference data: loaded in bulk from an external import,
//! searched and read constantly by the entry forms, edited rarely.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use fabcost_core::MaterialCatalogEntry;

pub(crate) const MATERIAL_COLUMNS: &str = r#"
    id, category, name,
    diameter_mm, section_length_mm, section_width_mm, thickness_mm,
    weight_per_meter,
    purchase_price_t, delivery_price_t, waste_price, final_price_kg,
    unit_of_measurement, our_price_per_kg
"#;

/// Repository for material catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = MaterialRepository::new(pool);
///
/// let pipes = repo.list_by_category("Труба").await?;
/// let hits = repo.search("труба 25", 20).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MaterialRepository {
    pool: SqlitePool,
}

impl MaterialRepository {
    /// Creates a new MaterialRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MaterialRepository { pool }
    }

    /// Searches materials by name or category substring.
    ///
    /// ## Arguments
    /// * `query` - Search term (can be partial)
    /// * `limit` - Maximum results to return
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<MaterialCatalogEntry>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching materials");

        if query.is_empty() {
            return self.list(limit).await;
        }

        let pattern = format!("%{}%", query);

        let sql = format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials \
             WHERE name LIKE ?1 OR category LIKE ?1 \
             ORDER BY category, name LIMIT ?2"
        );
        let materials = sqlx::query_as::<_, MaterialCatalogEntry>(&sql)
            .bind(&pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = materials.len(), "Search returned materials");
        Ok(materials)
    }

    /// Lists materials ordered by category and name.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<MaterialCatalogEntry>> {
        let sql = format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials ORDER BY category, name LIMIT ?1"
        );
        let materials = sqlx::query_as::<_, MaterialCatalogEntry>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(materials)
    }

    /// Lists all materials of one category.
    pub async fn list_by_category(&self, category: &str) -> DbResult<Vec<MaterialCatalogEntry>> {
        let sql = format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE category = ?1 ORDER BY name"
        );
        let materials = sqlx::query_as::<_, MaterialCatalogEntry>(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;

        Ok(materials)
    }

    /// Lists the distinct categories present in the catalog.
    pub async fn list_categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT category FROM materials WHERE category != '' ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets a material by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(entry))` - Material found
    /// * `Ok(None)` - Material not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MaterialCatalogEntry>> {
        let sql = format!("SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = ?1");
        let material = sqlx::query_as::<_, MaterialCatalogEntry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(material)
    }

    /// Inserts a new catalog entry.
    pub async fn insert(&self, entry: &MaterialCatalogEntry) -> DbResult<()> {
        debug!(name = %entry.name, "Inserting material");

        sqlx::query(
            r#"
            INSERT INTO materials (
                id, category, name,
                diameter_mm, section_length_mm, section_width_mm, thickness_mm,
                weight_per_meter,
                purchase_price_t, delivery_price_t, waste_price, final_price_kg,
                unit_of_measurement, our_price_per_kg
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.category)
        .bind(&entry.name)
        .bind(entry.diameter_mm)
        .bind(entry.section_length_mm)
        .bind(entry.section_width_mm)
        .bind(entry.thickness_mm)
        .bind(entry.weight_per_meter)
        .bind(entry.purchase_price_t)
        .bind(entry.delivery_price_t)
        .bind(entry.waste_price)
        .bind(entry.final_price_kg)
        .bind(&entry.unit_of_measurement)
        .bind(entry.our_price_per_kg)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a batch of catalog entries in one transaction.
    ///
    /// ## Usage
    /// Bulk import from an external sheet. All-or-nothing: a single bad
    /// row rolls the whole import back.
    pub async fn insert_many(&self, entries: &[MaterialCatalogEntry]) -> DbResult<usize> {
        debug!(count = entries.len(), "Bulk-inserting materials");

        let mut tx = self.pool.begin().await?;

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO materials (
                    id, category, name,
                    diameter_mm, section_length_mm, section_width_mm, thickness_mm,
                    weight_per_meter,
                    purchase_price_t, delivery_price_t, waste_price, final_price_kg,
                    unit_of_measurement, our_price_per_kg
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                "#,
            )
            .bind(&entry.id)
            .bind(&entry.category)
            .bind(&entry.name)
            .bind(entry.diameter_mm)
            .bind(entry.section_length_mm)
            .bind(entry.section_width_mm)
            .bind(entry.thickness_mm)
            .bind(entry.weight_per_meter)
            .bind(entry.purchase_price_t)
            .bind(entry.delivery_price_t)
            .bind(entry.waste_price)
            .bind(entry.final_price_kg)
            .bind(&entry.unit_of_measurement)
            .bind(entry.our_price_per_kg)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(entries.len())
    }

    /// Updates an existing catalog entry.
    ///
    /// ## Note
    /// Changing a material's price does NOT touch already-persisted line
    /// costs; call `BomRepository::recost_product` for affected products.
    pub async fn update(&self, entry: &MaterialCatalogEntry) -> DbResult<()> {
        debug!(id = %entry.id, "Updating material");

        let result = sqlx::query(
            r#"
            UPDATE materials SET
                category = ?2,
                name = ?3,
                diameter_mm = ?4,
                section_length_mm = ?5,
                section_width_mm = ?6,
                thickness_mm = ?7,
                weight_per_meter = ?8,
                purchase_price_t = ?9,
                delivery_price_t = ?10,
                waste_price = ?11,
                final_price_kg = ?12,
                unit_of_measurement = ?13,
                our_price_per_kg = ?14
            WHERE id = ?1
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.category)
        .bind(&entry.name)
        .bind(entry.diameter_mm)
        .bind(entry.section_length_mm)
        .bind(entry.section_width_mm)
        .bind(entry.thickness_mm)
        .bind(entry.weight_per_meter)
        .bind(entry.purchase_price_t)
        .bind(entry.delivery_price_t)
        .bind(entry.waste_price)
        .bind(entry.final_price_kg)
        .bind(&entry.unit_of_measurement)
        .bind(entry.our_price_per_kg)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Material", &entry.id));
        }

        Ok(())
    }

    /// Deletes a catalog entry.
    ///
    /// Fails with a foreign key violation while any product still
    /// references the material.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting material");

        let result = sqlx::query("DELETE FROM materials WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Material", id));
        }

        Ok(())
    }

    /// Counts catalog entries (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM materials")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use crate::repository::generate_id;
    use fabcost_core::MaterialCatalogEntry;

    fn pipe(name: &str) -> MaterialCatalogEntry {
        MaterialCatalogEntry {
            id: generate_id(),
            category: "Труба".to_string(),
            name: name.to_string(),
            diameter_mm: 25.0,
            section_length_mm: 0.0,
            section_width_mm: 0.0,
            thickness_mm: 2.0,
            weight_per_meter: 1.5,
            purchase_price_t: 15000.0,
            delivery_price_t: 1000.0,
            waste_price: 200.0,
            final_price_kg: 18.0,
            unit_of_measurement: "м".to_string(),
            our_price_per_kg: 20.0,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let entry = pipe("Труба 25х2");

        db.materials().insert(&entry).await.unwrap();

        let fetched = db.materials().get_by_id(&entry.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Труба 25х2");
        assert_eq!(fetched.unit_price(), 20.0);
    }

    #[tokio::test]
    async fn test_search_and_categories() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.materials().insert(&pipe("Труба 25х2")).await.unwrap();
        db.materials().insert(&pipe("Труба 32х3")).await.unwrap();

        // SQLite LIKE is case-insensitive for ASCII only, so match case here
        let hits = db.materials().search("Труба", 10).await.unwrap();
        assert_eq!(hits.len(), 2);

        let categories = db.materials().list_categories().await.unwrap();
        assert_eq!(categories, vec!["Труба".to_string()]);
    }

    #[tokio::test]
    async fn test_bulk_insert() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let entries = vec![pipe("Труба 25х2"), pipe("Труба 32х3"), pipe("Труба 40х3")];

        let inserted = db.materials().insert_many(&entries).await.unwrap();
        assert_eq!(inserted, 3);
        assert_eq!(db.materials().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_delete_missing_material() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.materials().delete("missing").await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
