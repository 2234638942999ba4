//! # Labor Operation Repository
//!
//! Operation lines per product, with time-per-unit derivation.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_operation(product, name, measured qty, measured time, rate)       │
//! │       │                                                                 │
//! │       ├── validate inputs (non-negative; zero qty allowed)             │
//! │       ├── time_per_unit = time_measured / quantity_measured  (guarded) │
//! │       ├── cost = time_per_unit × rate_per_minute                       │
//! │       └── persist                                                       │
//! │                                                                         │
//! │  approved_rate lives beside the computed cost as TEXT; the labor       │
//! │  aggregator decides at pricing time whether it overrides.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use fabcost_core::validation::validate_operation_inputs;
use fabcost_core::OperationLine;

// Joined with employees so pricing output can show who did the work.
const OPERATION_SELECT: &str = r#"
    SELECT
        o.id,
        o.product_id,
        o.operation_name,
        o.quantity_measured,
        o.time_measured,
        o.time_per_unit,
        o.rate_per_minute,
        o.cost,
        o.employee_id,
        e.name AS employee_name,
        o.approved_rate
    FROM operations o
    LEFT JOIN employees e ON e.id = o.employee_id
"#;

/// Repository for labor operation lines.
///
/// ## Usage
/// ```rust,ignore
/// let op = db.operations()
///     .add_operation(&product.id, "Сверление", 10, 15.0, 1.5, None)
///     .await?;
/// assert_eq!(op.time_per_unit, 1.5);
/// ```
#[derive(Debug, Clone)]
pub struct OperationRepository {
    pool: SqlitePool,
}

impl OperationRepository {
    /// Creates a new OperationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OperationRepository { pool }
    }

    /// Adds an operation line to a product.
    ///
    /// Derives `time_per_unit` from the batch measurement (guarding the
    /// zero-quantity division) and persists the computed cost.
    pub async fn add_operation(
        &self,
        product_id: &str,
        operation_name: &str,
        quantity_measured: i64,
        time_measured: f64,
        rate_per_minute: f64,
        employee_id: Option<&str>,
    ) -> DbResult<OperationLine> {
        validate_operation_inputs(quantity_measured, time_measured, rate_per_minute)?;

        let time_per_unit = OperationLine::derive_time_per_unit(time_measured, quantity_measured);
        let cost = time_per_unit * rate_per_minute;

        debug!(product_id = %product_id, operation = %operation_name, cost = %cost, "Adding operation");

        let line = OperationLine {
            id: generate_id(),
            product_id: product_id.to_string(),
            operation_name: operation_name.to_string(),
            quantity_measured,
            time_measured,
            time_per_unit,
            rate_per_minute,
            cost,
            employee_id: employee_id.map(str::to_string),
            employee_name: None,
            approved_rate: None,
        };

        sqlx::query(
            r#"
            INSERT INTO operations (
                id, product_id, operation_name,
                quantity_measured, time_measured, time_per_unit,
                rate_per_minute, cost, employee_id, approved_rate
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&line.id)
        .bind(&line.product_id)
        .bind(&line.operation_name)
        .bind(line.quantity_measured)
        .bind(line.time_measured)
        .bind(line.time_per_unit)
        .bind(line.rate_per_minute)
        .bind(line.cost)
        .bind(&line.employee_id)
        .bind(&line.approved_rate)
        .execute(&self.pool)
        .await?;

        Ok(line)
    }

    /// Updates an operation's measurements, re-deriving time and cost.
    pub async fn update_measurements(
        &self,
        operation_id: &str,
        quantity_measured: i64,
        time_measured: f64,
        rate_per_minute: f64,
    ) -> DbResult<()> {
        validate_operation_inputs(quantity_measured, time_measured, rate_per_minute)?;

        let time_per_unit = OperationLine::derive_time_per_unit(time_measured, quantity_measured);
        let cost = time_per_unit * rate_per_minute;

        debug!(operation_id = %operation_id, cost = %cost, "Updating operation measurements");

        let result = sqlx::query(
            r#"
            UPDATE operations SET
                quantity_measured = ?2, time_measured = ?3,
                time_per_unit = ?4, rate_per_minute = ?5, cost = ?6
            WHERE id = ?1
            "#,
        )
        .bind(operation_id)
        .bind(quantity_measured)
        .bind(time_measured)
        .bind(time_per_unit)
        .bind(rate_per_minute)
        .bind(cost)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Operation", operation_id));
        }

        Ok(())
    }

    /// Stores or clears an operation's approved rate.
    ///
    /// The value is kept as raw text; whether it overrides the computed
    /// cost is decided by the labor aggregator at pricing time.
    pub async fn set_approved_rate(
        &self,
        operation_id: &str,
        approved_rate: Option<&str>,
    ) -> DbResult<()> {
        debug!(operation_id = %operation_id, "Setting approved rate");

        let result = sqlx::query("UPDATE operations SET approved_rate = ?2 WHERE id = ?1")
            .bind(operation_id)
            .bind(approved_rate)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Operation", operation_id));
        }

        Ok(())
    }

    /// Assigns (or unassigns) an employee to an operation.
    pub async fn assign_employee(
        &self,
        operation_id: &str,
        employee_id: Option<&str>,
    ) -> DbResult<()> {
        let result = sqlx::query("UPDATE operations SET employee_id = ?2 WHERE id = ?1")
            .bind(operation_id)
            .bind(employee_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Operation", operation_id));
        }

        Ok(())
    }

    /// Removes an operation line.
    pub async fn remove_operation(&self, operation_id: &str) -> DbResult<()> {
        debug!(operation_id = %operation_id, "Removing operation");

        let result = sqlx::query("DELETE FROM operations WHERE id = ?1")
            .bind(operation_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Operation", operation_id));
        }

        Ok(())
    }

    /// Lists the operation lines of one product, with employee names.
    pub async fn operations_for_product(&self, product_id: &str) -> DbResult<Vec<OperationLine>> {
        let sql = format!("{OPERATION_SELECT} WHERE o.product_id = ?1 ORDER BY o.operation_name");
        let operations = sqlx::query_as::<_, OperationLine>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(operations)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
