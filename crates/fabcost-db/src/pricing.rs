//! # Pricing Service
//!
//! Fetches a product's stored records, runs the costing engine, and
//! persists the write-backs.
//!
//! ## One Pricing Run
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  price_product(id)                                                      │
//! │       │                                                                 │
//! │       ├── fetch product            → NotFound is the ONLY hard failure │
//! │       ├── fetch bill of materials  → empty list is fine                │
//! │       ├── fetch operation lines    → empty list is fine                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  fabcost_core::pricing::price_product(...)   (pure, always completes)  │
//! │       │                                                                 │
//! │       ├── write back total_paint_area (display value on the product)   │
//! │       └── return PricingResult                                          │
//! │                                                                         │
//! │  Persisting calculated_price and approving a price are EXPLICIT        │
//! │  separate calls — a pricing run alone never touches them.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::bom::BomRepository;
use crate::repository::operation::OperationRepository;
use crate::repository::product::ProductRepository;
use fabcost_core::pricing::price_product;
use fabcost_core::{PaintSpec, PricingResult};

/// Service composing repositories with the costing engine.
///
/// ## Usage
/// ```rust,ignore
/// let result = db.pricing().price_product(&product.id).await?;
/// println!("{}", result.indicators.calculated_price);
/// ```
#[derive(Debug, Clone)]
pub struct PricingService {
    pool: SqlitePool,
}

impl PricingService {
    /// Creates a new PricingService.
    pub fn new(pool: SqlitePool) -> Self {
        PricingService { pool }
    }

    /// Prices a product with the default painting assumptions.
    pub async fn price_product(&self, product_id: &str) -> DbResult<PricingResult> {
        self.price_product_with_spec(product_id, &PaintSpec::default())
            .await
    }

    /// Prices a product with explicit painting assumptions.
    ///
    /// ## Returns
    /// * `Ok(PricingResult)` - The complete breakdown; per-line problems
    ///   are on `result.line_errors`, never an `Err`
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn price_product_with_spec(
        &self,
        product_id: &str,
        paint_spec: &PaintSpec,
    ) -> DbResult<PricingResult> {
        let products = ProductRepository::new(self.pool.clone());
        let product = products
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", product_id))?;

        let materials = BomRepository::new(self.pool.clone())
            .bom_for_product(product_id)
            .await?;
        let operations = OperationRepository::new(self.pool.clone())
            .operations_for_product(product_id)
            .await?;

        debug!(
            product = %product.product_id,
            materials = materials.len(),
            operations = operations.len(),
            "Pricing product"
        );

        let result = price_product(&product, &materials, &operations, paint_spec);

        if !result.line_errors.is_empty() {
            warn!(
                product = %product.product_id,
                skipped = result.line_errors.len(),
                "Pricing run skipped malformed lines"
            );
        }

        if result.paint.material_id.is_none() && result.paint.total_area_m2 > 0.0 {
            info!(
                product = %product.product_id,
                area_m2 = result.paint.total_area_m2,
                "Painted area present but no paint line on the bill"
            );
        }

        // Keep the display value on the product row in sync with the
        // latest geometry.
        sqlx::query("UPDATE products SET total_paint_area = ?2 WHERE id = ?1")
            .bind(product_id)
            .bind(result.product.total_paint_area_m2)
            .execute(&self.pool)
            .await?;

        Ok(result)
    }

    /// Recomputes and persists a product's calculated price.
    ///
    /// This is the explicit save path; an ordinary pricing run leaves
    /// the stored `calculated_price` untouched.
    pub async fn save_calculated_price(&self, product_id: &str) -> DbResult<PricingResult> {
        let result = self.price_product(product_id).await?;

        info!(
            product = %result.product.product_id,
            calculated = result.indicators.calculated_price,
            "Saving calculated price"
        );

        sqlx::query("UPDATE products SET calculated_price = ?2 WHERE id = ?1")
            .bind(product_id)
            .bind(result.indicators.calculated_price)
            .execute(&self.pool)
            .await?;

        Ok(result)
    }

    /// Stores a manually confirmed sale price.
    ///
    /// Setting 0 clears the approval: the next pricing run falls back to
    /// mirroring `calculated_price` again.
    pub async fn approve_price(&self, product_id: &str, price: f64) -> DbResult<()> {
        info!(product_id = %product_id, price = %price, "Approving price");

        let result = sqlx::query("UPDATE products SET approved_price = ?2 WHERE id = ?1")
            .bind(product_id)
            .bind(price)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product_id));
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
    use crate::repository::generate_id;
    use fabcost_core::material_cost::MaterialDimensions;
    use fabcost_core::MaterialCatalogEntry;

    fn material(category: &str, name: &str) -> MaterialCatalogEntry {
        MaterialCatalogEntry {
            id: generate_id(),
            category: category.to_string(),
            name: name.to_string(),
            diameter_mm: 0.0,
            section_length_mm: 0.0,
            section_width_mm: 0.0,
            thickness_mm: 0.0,
            weight_per_meter: 0.0,
            purchase_price_t: 0.0,
            delivery_price_t: 0.0,
            waste_price: 0.0,
            final_price_kg: 0.0,
            unit_of_measurement: "".to_string(),
            our_price_per_kg: 0.0,
        }
    }

    #[tokio::test]
    async fn test_pricing_missing_product_is_hard_failure() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.pricing().price_product("missing").await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_end_to_end_pricing_run() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.products().create("СТ-001", "A-1", "Рама").await.unwrap();

        // Pipe: 2m × 1.5kg/m × 3 pcs × 20/kg = 180
        let mut pipe = material("Труба", "Труба 25х2");
        pipe.diameter_mm = 25.0;
        pipe.weight_per_meter = 1.5;
        pipe.our_price_per_kg = 20.0;
        db.materials().insert(&pipe).await.unwrap();
        db.bom()
            .add_line(
                &product.id,
                &pipe.id,
                &MaterialDimensions {
                    length_m: 2.0,
                    quantity: 3,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Drilling: 10 pcs in 15 min at 1.5/min → 2.25
        db.operations()
            .add_operation(&product.id, "Сверление", 10, 15.0, 1.5, None)
            .await
            .unwrap();

        let result = db.pricing().price_product(&product.id).await.unwrap();

        assert!(result.line_errors.is_empty());
        assert_eq!(result.labor_cost, 2.25);
        let pipes = &result.materials_by_category["Труба"];
        assert!((pipes.total_cost - 180.0).abs() < 1e-9);

        // prime = 2.25 + 180 (no paint line → paint cost 0, informational only)
        assert_eq!(result.paint.cost, 0.0);
        assert!(result.paint.material_id.is_none());
        assert!(result.paint.total_area_m2 > 0.0);
        assert!((result.indicators.prime_cost - 182.25).abs() < 1e-9);

        // painted area was written back to the product row
        let fetched = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert!((fetched.total_paint_area - result.product.total_paint_area_m2).abs() < 1e-9);
        assert!(fetched.total_paint_area > 0.0);
    }

    #[tokio::test]
    async fn test_pricing_run_does_not_persist_calculated_price() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.products().create("СТ-002", "", "Опора").await.unwrap();

        db.operations()
            .add_operation(&product.id, "Сборка", 1, 10.0, 1.8, None)
            .await
            .unwrap();

        let result = db.pricing().price_product(&product.id).await.unwrap();
        assert!(result.indicators.calculated_price > 0.0);

        // stored value untouched until the explicit save
        let fetched = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.calculated_price, 0.0);

        db.pricing().save_calculated_price(&product.id).await.unwrap();
        let fetched = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.calculated_price, result.indicators.calculated_price);
    }

    #[tokio::test]
    async fn test_approved_price_is_preserved_across_runs() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.products().create("СТ-003", "", "Щит").await.unwrap();

        db.operations()
            .add_operation(&product.id, "Сборка", 1, 100.0, 1.8, None)
            .await
            .unwrap();

        db.pricing().approve_price(&product.id, 1234.56).await.unwrap();

        let result = db.pricing().price_product(&product.id).await.unwrap();
        assert_eq!(result.indicators.approved_price, 1234.56);
        assert_ne!(
            result.indicators.approved_price,
            result.indicators.calculated_price
        );
    }
}
