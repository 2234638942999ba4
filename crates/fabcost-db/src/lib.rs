//! # fabcost-db: Persistence Layer for Fabcost
//!
//! This crate provides database access for the Fabcost costing engine.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fabcost Data Flow                                │
//! │                                                                         │
//! │  Caller (entry forms, spreadsheet export)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    fabcost-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌───────────────┐  │   │
//! │  │   │   Database    │   │  Repositories  │   │  Migrations   │  │   │
//! │  │   │   (pool.rs)   │   │ material, bom, │   │  (embedded)   │  │   │
//! │  │   │               │   │ product, ops,  │   │ 001_init.sql  │  │   │
//! │  │   │ SqlitePool    │◄──│ employee, rate │   │ 002_rates.sql │  │   │
//! │  │   │ Management    │   └────────────────┘   └───────────────┘  │   │
//! │  │   └───────────────┘           │                                │   │
//! │  │                               ▼                                │   │
//! │  │                    ┌────────────────────┐                      │   │
//! │  │                    │  PricingService    │ → fabcost-core      │   │
//! │  │                    │  fetch → engine →  │   (pure functions)  │   │
//! │  │                    │  persist           │                      │   │
//! │  │                    └────────────────────┘                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (fabcost.db, WAL mode)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations per entity
//! - [`pricing`] - PricingService composing repositories with the engine
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fabcost_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/fabcost.db")).await?;
//!
//! let product = db.products().create("СТ-001", "A-17", "Кронштейн").await?;
//! let result = db.pricing().price_product(&product.id).await?;
//! println!("price: {}", result.indicators.calculated_price);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod pricing;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};
pub use pricing::PricingService;

// Repository re-exports for convenience
pub use repository::bom::BomRepository;
pub use repository::employee::{Employee, EmployeeRepository};
pub use repository::material::MaterialRepository;
pub use repository::operation::OperationRepository;
pub use repository::product::ProductRepository;
pub use repository::rate::{RateRepository, RateSheetEntry};
