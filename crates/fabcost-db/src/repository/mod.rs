//! # Repository Module
//!
//! Database repository implementations for Fabcost.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Caller (forms, PricingService)                                        │
//! │       │                                                                 │
//! │       │  db.bom().add_line(&product_id, &material_id, &dims)           │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  BomRepository                                                         │
//! │  ├── validate dimensions (fabcost-core)                                │
//! │  ├── compute the line cost (fabcost-core)                              │
//! │  └── persist the line                                                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test against an in-memory database                          │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`material::MaterialRepository`] - Material catalog CRUD and search
//! - [`product::ProductRepository`] - Product CRUD and pricing parameters
//! - [`bom::BomRepository`] - Bill-of-materials lines with cost write-through
//! - [`operation::OperationRepository`] - Labor operation lines
//! - [`employee::EmployeeRepository`] - Employees assignable to operations
//! - [`rate::RateRepository`] - The rate sheet (operation → rate/minute)

pub mod bom;
pub mod employee;
pub mod material;
pub mod operation;
pub mod product;
pub mod rate;

use uuid::Uuid;

/// Generates a new UUID v4 row ID.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
