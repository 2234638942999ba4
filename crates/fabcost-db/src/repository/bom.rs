//! # Bill-of-Materials Repository
//!
//! Material lines per product, with cost write-through.
//!
//! ## Cost Write-Through
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_line / update_line                                                 │
//! │       │                                                                 │
//! │       ├── validate dimensions for the material's shape class           │
//! │       ├── compute weight + cost (fabcost-core)                         │
//! │       └── persist the line WITH its cost                               │
//! │                                                                         │
//! │  The persisted cost is what pricing runs read later; it is NOT         │
//! │  recomputed on every read. After catalog price changes, call           │
//! │  recost_product to bring affected lines back in sync.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use fabcost_core::material_cost::{material_cost_for_entry, MaterialDimensions};
use fabcost_core::validation::validate_material_dimensions;
use fabcost_core::{BomLine, MaterialCatalogEntry, ProductMaterialLine};

const LINE_COLUMNS: &str = r#"
    id, product_id, material_id,
    length_m, width_m, thickness_m, quantity, cost
"#;

// Joined view read by the pricing engine: line dims + catalog geometry,
// with the unit price resolved at fetch time.
const BOM_SELECT: &str = r#"
    SELECT
        pm.material_id,
        m.category,
        m.name AS material_name,
        pm.length_m,
        pm.width_m,
        pm.thickness_m,
        pm.quantity,
        pm.cost,
        m.weight_per_meter,
        m.diameter_mm,
        m.section_length_mm,
        m.section_width_mm,
        CASE WHEN m.our_price_per_kg > 0
             THEN m.our_price_per_kg
             ELSE m.final_price_kg
        END AS price_per_kg
    FROM product_materials pm
    INNER JOIN materials m ON m.id = pm.material_id
    WHERE pm.product_id = ?1
    ORDER BY m.category, m.name
"#;

/// Repository for bill-of-materials lines.
///
/// ## Usage
/// ```rust,ignore
/// let dims = MaterialDimensions { length_m: 2.0, quantity: 3, ..Default::default() };
/// let line = db.bom().add_line(&product.id, &material.id, &dims).await?;
/// assert!(line.cost > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct BomRepository {
    pool: SqlitePool,
}

impl BomRepository {
    /// Creates a new BomRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BomRepository { pool }
    }

    /// Adds a material line to a product.
    ///
    /// Validates the dimensions for the material's shape class, computes
    /// the line cost, and persists both.
    ///
    /// ## Returns
    /// * `Ok(ProductMaterialLine)` - The persisted line with its cost
    /// * `Err(DbError::NotFound)` - Material doesn't exist
    /// * `Err(DbError::Validation)` - Dimensions rejected for the shape class
    pub async fn add_line(
        &self,
        product_id: &str,
        material_id: &str,
        dims: &MaterialDimensions,
    ) -> DbResult<ProductMaterialLine> {
        let material = self.fetch_material(material_id).await?;

        validate_material_dimensions(material.shape_class(), dims)?;
        let cost = material_cost_for_entry(&material, dims).cost;

        debug!(product_id = %product_id, material = %material.name, cost = %cost, "Adding BOM line");

        let line = ProductMaterialLine {
            id: generate_id(),
            product_id: product_id.to_string(),
            material_id: material_id.to_string(),
            length_m: dims.length_m,
            width_m: dims.width_m,
            thickness_m: dims.thickness_m,
            quantity: dims.quantity,
            cost,
        };

        sqlx::query(
            r#"
            INSERT INTO product_materials (
                id, product_id, material_id,
                length_m, width_m, thickness_m, quantity, cost
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&line.id)
        .bind(&line.product_id)
        .bind(&line.material_id)
        .bind(line.length_m)
        .bind(line.width_m)
        .bind(line.thickness_m)
        .bind(line.quantity)
        .bind(line.cost)
        .execute(&self.pool)
        .await?;

        Ok(line)
    }

    /// Updates a line's dimensions, recomputing its cost.
    pub async fn update_line(
        &self,
        line_id: &str,
        dims: &MaterialDimensions,
    ) -> DbResult<ProductMaterialLine> {
        let existing = self
            .get_line(line_id)
            .await?
            .ok_or_else(|| DbError::not_found("BOM line", line_id))?;
        let material = self.fetch_material(&existing.material_id).await?;

        validate_material_dimensions(material.shape_class(), dims)?;
        let cost = material_cost_for_entry(&material, dims).cost;

        debug!(line_id = %line_id, cost = %cost, "Updating BOM line");

        sqlx::query(
            r#"
            UPDATE product_materials SET
                length_m = ?2, width_m = ?3, thickness_m = ?4,
                quantity = ?5, cost = ?6
            WHERE id = ?1
            "#,
        )
        .bind(line_id)
        .bind(dims.length_m)
        .bind(dims.width_m)
        .bind(dims.thickness_m)
        .bind(dims.quantity)
        .bind(cost)
        .execute(&self.pool)
        .await?;

        Ok(ProductMaterialLine {
            length_m: dims.length_m,
            width_m: dims.width_m,
            thickness_m: dims.thickness_m,
            quantity: dims.quantity,
            cost,
            ..existing
        })
    }

    /// Removes a line from a product.
    pub async fn remove_line(&self, line_id: &str) -> DbResult<()> {
        debug!(line_id = %line_id, "Removing BOM line");

        let result = sqlx::query("DELETE FROM product_materials WHERE id = ?1")
            .bind(line_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("BOM line", line_id));
        }

        Ok(())
    }

    /// Gets one line by its ID.
    pub async fn get_line(&self, line_id: &str) -> DbResult<Option<ProductMaterialLine>> {
        let sql = format!("SELECT {LINE_COLUMNS} FROM product_materials WHERE id = ?1");
        let line = sqlx::query_as::<_, ProductMaterialLine>(&sql)
            .bind(line_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(line)
    }

    /// Lists the raw lines of one product.
    pub async fn lines_for_product(&self, product_id: &str) -> DbResult<Vec<ProductMaterialLine>> {
        let sql = format!("SELECT {LINE_COLUMNS} FROM product_materials WHERE product_id = ?1");
        let lines = sqlx::query_as::<_, ProductMaterialLine>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }

    /// Fetches the joined bill of materials the pricing engine reads.
    pub async fn bom_for_product(&self, product_id: &str) -> DbResult<Vec<BomLine>> {
        let lines = sqlx::query_as::<_, BomLine>(BOM_SELECT)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }

    /// Recomputes and persists every line cost of one product.
    ///
    /// ## When To Call
    /// After catalog price or weight changes, so persisted line costs
    /// match what the current catalog would produce.
    ///
    /// ## Returns
    /// The number of lines updated.
    pub async fn recost_product(&self, product_id: &str) -> DbResult<usize> {
        let lines = self.lines_for_product(product_id).await?;

        debug!(product_id = %product_id, lines = lines.len(), "Recosting product");

        let mut tx = self.pool.begin().await?;
        let mut updated = 0;

        for line in &lines {
            let sql = format!(
                "SELECT {} FROM materials WHERE id = ?1",
                crate::repository::material::MATERIAL_COLUMNS
            );
            let material = sqlx::query_as::<_, MaterialCatalogEntry>(&sql)
                .bind(&line.material_id)
                .fetch_one(&mut *tx)
                .await?;

            let dims = MaterialDimensions {
                length_m: line.length_m,
                width_m: line.width_m,
                thickness_m: line.thickness_m,
                quantity: line.quantity,
            };
            let cost = material_cost_for_entry(&material, &dims).cost;

            sqlx::query("UPDATE product_materials SET cost = ?2 WHERE id = ?1")
                .bind(&line.id)
                .bind(cost)
                .execute(&mut *tx)
                .await?;
            updated += 1;
        }

        tx.commit().await?;

        Ok(updated)
    }

    async fn fetch_material(&self, material_id: &str) -> DbResult<MaterialCatalogEntry> {
        let sql = format!(
            "SELECT {} FROM materials WHERE id = ?1",
            crate::repository::material::MATERIAL_COLUMNS
        );
        sqlx::query_as::<_, MaterialCatalogEntry>(&sql)
            .bind(material_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Material", material_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use crate::repository::generate_id;
    use fabcost_core::material_cost::MaterialDimensions;
    use fabcost_core::MaterialCatalogEntry;

    async fn setup() -> (Database, String, MaterialCatalogEntry) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.products().create("СТ-001", "", "Рама").await.unwrap();

        let material = MaterialCatalogEntry {
            id: generate_id(),
            category: "Труба".to_string(),
            name: "Труба 25х2".to_string(),
            diameter_mm: 25.0,
            section_length_mm: 0.0,
            section_width_mm: 0.0,
            thickness_mm: 2.0,
            weight_per_meter: 1.5,
            purchase_price_t: 0.0,
            delivery_price_t: 0.0,
            waste_price: 0.0,
            final_price_kg: 18.0,
            unit_of_measurement: "м".to_string(),
            our_price_per_kg: 20.0,
        };
        db.materials().insert(&material).await.unwrap();

        (db, product.id, material)
    }

    #[tokio::test]
    async fn test_add_line_persists_computed_cost() {
        let (db, product_id, material) = setup().await;

        let dims = MaterialDimensions {
            length_m: 2.0,
            quantity: 3,
            ..Default::default()
        };
        let line = db.bom().add_line(&product_id, &material.id, &dims).await.unwrap();

        // 2m × 1.5kg/m × 3 × 20/kg = 180
        assert!((line.cost - 180.0).abs() < 1e-9);

        let stored = db.bom().lines_for_product(&product_id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!((stored[0].cost - 180.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_add_line_rejects_bad_dimensions() {
        let (db, product_id, material) = setup().await;

        let no_length = MaterialDimensions {
            quantity: 3,
            ..Default::default()
        };
        let err = db
            .bom()
            .add_line(&product_id, &material.id, &no_length)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("length"));
    }

    #[tokio::test]
    async fn test_bom_join_resolves_price_and_geometry() {
        let (db, product_id, material) = setup().await;

        let dims = MaterialDimensions {
            length_m: 2.0,
            quantity: 3,
            ..Default::default()
        };
        db.bom().add_line(&product_id, &material.id, &dims).await.unwrap();

        let bom = db.bom().bom_for_product(&product_id).await.unwrap();
        assert_eq!(bom.len(), 1);
        assert_eq!(bom[0].material_name, "Труба 25х2");
        assert_eq!(bom[0].diameter_mm, 25.0);
        // our_price_per_kg wins over final_price_kg
        assert_eq!(bom[0].price_per_kg, 20.0);
    }

    #[tokio::test]
    async fn test_recost_after_price_change() {
        let (db, product_id, mut material) = setup().await;

        let dims = MaterialDimensions {
            length_m: 2.0,
            quantity: 3,
            ..Default::default()
        };
        db.bom().add_line(&product_id, &material.id, &dims).await.unwrap();

        material.our_price_per_kg = 25.0;
        db.materials().update(&material).await.unwrap();

        // stored cost is stale until recost
        let stale = db.bom().lines_for_product(&product_id).await.unwrap();
        assert!((stale[0].cost - 180.0).abs() < 1e-9);

        let updated = db.bom().recost_product(&product_id).await.unwrap();
        assert_eq!(updated, 1);

        let fresh = db.bom().lines_for_product(&product_id).await.unwrap();
        assert!((fresh[0].cost - 225.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_update_and_remove_line() {
        let (db, product_id, material) = setup().await;

        let dims = MaterialDimensions {
            length_m: 2.0,
            quantity: 3,
            ..Default::default()
        };
        let line = db.bom().add_line(&product_id, &material.id, &dims).await.unwrap();

        let longer = MaterialDimensions {
            length_m: 4.0,
            quantity: 3,
            ..Default::default()
        };
        let updated = db.bom().update_line(&line.id, &longer).await.unwrap();
        assert!((updated.cost - 360.0).abs() < 1e-9);

        db.bom().remove_line(&line.id).await.unwrap();
        assert!(db.bom().lines_for_product(&product_id).await.unwrap().is_empty());
    }
}
