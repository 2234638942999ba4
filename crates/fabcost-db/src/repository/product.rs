//! # Product Repository
//!
//! Database operations for fabricated products.
//!
//! ## Pricing Parameters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  overhead_percent / profit_percent   NULL → domain default (0.55/0.30)  │
//! │  approved_price                      0 → "not yet confirmed"            │
//! │  calculated_price, total_paint_area  written by explicit save calls     │
//! │                                       from the pricing service only     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use fabcost_core::Product;

const PRODUCT_COLUMNS: &str = r#"
    id, product_id, article, name,
    overhead_percent, profit_percent,
    approved_price, calculated_price, total_paint_area,
    created_at
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.create("СТ-001", "A-17", "Кронштейн").await?;
/// let found = repo.get_by_id(&product.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a new product with default pricing parameters.
    ///
    /// Markups start at NULL (domain defaults apply), approved and
    /// calculated prices at 0.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The created product
    /// * `Err(DbError::UniqueViolation)` - `product_id` already exists
    pub async fn create(&self, product_id: &str, article: &str, name: &str) -> DbResult<Product> {
        debug!(product_id = %product_id, "Creating product");

        let product = Product {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            article: article.to_string(),
            name: name.to_string(),
            overhead_percent: None,
            profit_percent: None,
            approved_price: 0.0,
            calculated_price: 0.0,
            total_paint_area: 0.0,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO products (
                id, product_id, article, name,
                overhead_percent, profit_percent,
                approved_price, calculated_price, total_paint_area,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.product_id)
        .bind(&product.article)
        .bind(&product.name)
        .bind(product.overhead_percent)
        .bind(product.profit_percent)
        .bind(product.approved_price)
        .bind(product.calculated_price)
        .bind(product.total_paint_area)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its UUID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its human-readable display identifier.
    pub async fn get_by_product_id(&self, product_id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Searches products by display identifier, article, or name.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        if query.is_empty() {
            return self.list(limit).await;
        }

        let pattern = format!("%{}%", query);

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE product_id LIKE ?1 OR article LIKE ?1 OR name LIKE ?1 \
             ORDER BY product_id LIMIT ?2"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(&pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Lists products ordered by display identifier.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY product_id LIMIT ?1");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Updates a product's identity fields.
    pub async fn update_info(
        &self,
        id: &str,
        product_id: &str,
        article: &str,
        name: &str,
    ) -> DbResult<()> {
        debug!(id = %id, "Updating product info");

        let result = sqlx::query(
            "UPDATE products SET product_id = ?2, article = ?3, name = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(product_id)
        .bind(article)
        .bind(name)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Stores per-product markup overrides.
    ///
    /// `None` clears the override back to the domain default.
    pub async fn set_markups(
        &self,
        id: &str,
        overhead_percent: Option<f64>,
        profit_percent: Option<f64>,
    ) -> DbResult<()> {
        debug!(id = %id, "Setting product markups");

        let result = sqlx::query(
            "UPDATE products SET overhead_percent = ?2, profit_percent = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(overhead_percent)
        .bind(profit_percent)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product. BOM and operation lines cascade.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
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

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let created = db
            .products()
            .create("СТ-001", "A-17", "Кронштейн")
            .await
            .unwrap();

        let fetched = db.products().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.product_id, "СТ-001");
        assert_eq!(fetched.approved_price, 0.0);
        assert!(fetched.overhead_percent.is_none());
        // markup accessors fall back to domain defaults
        assert_eq!(fetched.overhead().fraction(), 0.55);
        assert_eq!(fetched.profit().fraction(), 0.30);
    }

    #[tokio::test]
    async fn test_duplicate_product_id_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.products().create("СТ-001", "", "А").await.unwrap();
        let err = db.products().create("СТ-001", "", "Б").await.unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[tokio::test]
    async fn test_set_markups_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.products().create("СТ-002", "", "Рама").await.unwrap();

        db.products()
            .set_markups(&product.id, Some(0.40), Some(0.25))
            .await
            .unwrap();

        let fetched = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.overhead_percent, Some(0.40));
        assert_eq!(fetched.profit_percent, Some(0.25));

        // clearing restores the defaults
        db.products()
            .set_markups(&product.id, None, None)
            .await
            .unwrap();
        let fetched = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.overhead().fraction(), 0.55);
    }

    #[tokio::test]
    async fn test_get_by_product_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products().create("СТ-003", "", "Опора").await.unwrap();

        let fetched = db
            .products()
            .get_by_product_id("СТ-003")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.name, "Опора");
        assert!(db.products().get_by_product_id("нет").await.unwrap().is_none());
    }
}
