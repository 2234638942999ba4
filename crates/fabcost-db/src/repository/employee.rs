//! # Employee Repository
//!
//! Workers assignable to labor operations.
//!
//! A default "Не назначен" row is seeded by migrations so operations can
//! always be recorded before staffing is decided.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;

/// One employee row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Employee {
    /// Unique identifier (UUID v4, or a fixed ID for seeded rows).
    pub id: String,
    /// Full name, unique.
    pub name: String,
}

/// Repository for employee operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Lists all employees ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT id, name FROM employees ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Gets an employee by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT id, name FROM employees WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Adds an employee.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - name already exists
    pub async fn add(&self, name: &str) -> DbResult<Employee> {
        let employee = Employee {
            id: generate_id(),
            name: name.trim().to_string(),
        };

        debug!(name = %employee.name, "Adding employee");

        sqlx::query("INSERT INTO employees (id, name) VALUES (?1, ?2)")
            .bind(&employee.id)
            .bind(&employee.name)
            .execute(&self.pool)
            .await?;

        Ok(employee)
    }

    /// Imports a batch of names, skipping ones already present.
    ///
    /// ## Returns
    /// The number of rows actually inserted.
    pub async fn import_names(&self, names: &[String]) -> DbResult<usize> {
        debug!(count = names.len(), "Importing employees");

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for name in names {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }

            let result = sqlx::query("INSERT OR IGNORE INTO employees (id, name) VALUES (?1, ?2)")
                .bind(generate_id())
                .bind(name)
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected() as usize;
        }

        tx.commit().await?;

        Ok(inserted)
    }

    /// Removes an employee. Operations that reference them keep the
    /// foreign key, so removal fails while assignments exist.
    pub async fn remove(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Removing employee");

        let result = sqlx::query("DELETE FROM employees WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", id));
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
    async fn test_default_employee_is_seeded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let employees = db.employees().list().await.unwrap();
        assert!(employees.iter().any(|e| e.name == "Не назначен"));
    }

    #[tokio::test]
    async fn test_add_and_duplicate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.employees().add("Иванов Иван Иванович").await.unwrap();
        let err = db.employees().add("Иванов Иван Иванович").await.unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[tokio::test]
    async fn test_import_skips_duplicates_and_blanks() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let names = vec![
            "Иванов Иван Иванович".to_string(),
            "Петров Петр Петрович".to_string(),
            "  ".to_string(),
            "Иванов Иван Иванович".to_string(),
        ];
        let inserted = db.employees().import_names(&names).await.unwrap();
        assert_eq!(inserted, 2);
    }
}
