//! # fabcost-core: Pure Costing Engine for Fabcost
//!
//! This crate is the **heart** of Fabcost. It turns a fabricated product's
//! material and labor records into a single, reproducible price breakdown,
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fabcost Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Presentation / Export (forms, spreadsheets)            │   │
//! │  │          consume PricingResult as an opaque value               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                fabcost-db (PricingService)                      │   │
//! │  │    fetches records, calls the engine, persists write-backs     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fabcost-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────────┐ ┌────────┐ ┌───────┐ ┌────────┐ ┌─────────┐ │   │
//! │  │  │material_cost │ │ paint  │ │ labor │ │ rollup │ │ pricing │ │   │
//! │  │  │ weight+cost  │ │ area,  │ │ rates,│ │ prime, │ │ compose │ │   │
//! │  │  │ per shape    │ │ kg, ₴  │ │ totals│ │ markups│ │ all four│ │   │
//! │  │  └──────────────┘ └────────┘ └───────┘ └────────┘ └─────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO FILES • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, BomLine, OperationLine, PricingResult)
//! - [`shape`] - Material shape classes resolved from catalog categories
//! - [`material_cost`] - Geometry-dependent material cost/weight formulas
//! - [`paint`] - Painted area and paint consumption estimation
//! - [`labor`] - Labor cost aggregation with approved-rate overrides
//! - [`rollup`] - Overhead/profit rollup and approved-price resolution
//! - [`pricing`] - The orchestrator composing the calculators
//! - [`validation`] - Caller-side input validation
//! - [`error`] - Typed domain errors
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same stored records in, same PricingResult out
//! 2. **No I/O**: fetching records and persisting results is fabcost-db's job
//! 3. **One bad line never aborts a computation**: per-line failures are
//!    collected as [`error::LineError`] values on the result
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod labor;
pub mod material_cost;
pub mod paint;
pub mod pricing;
pub mod rollup;
pub mod round;
pub mod shape;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use fabcost_core::PricingResult` instead of
// `use fabcost_core::types::PricingResult`

pub use error::{LineError, ValidationError};
pub use shape::ShapeClass;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Density of structural steel in kg/m³, used for sheet-material weight.
///
/// ## Why a constant?
/// The sheet formula (volume × density × price/kg) historically hard-coded
/// this literal at every call site. It lives here once, so the cost
/// calculator and any future alloy support share a single source.
pub const STEEL_DENSITY_KG_M3: f64 = 7850.0;

/// Default overhead markup applied to prime cost when a product has no
/// stored `overhead_percent`.
///
/// ## Business Reason
/// 0.55 is the shop's standard indirect-cost ratio, not an arbitrary
/// number. It is a fallback only: a stored per-product value always wins.
pub const DEFAULT_OVERHEAD_PERCENT: f64 = 0.55;

/// Default profit markup applied to (prime cost + overhead) when a product
/// has no stored `profit_percent`.
pub const DEFAULT_PROFIT_PERCENT: f64 = 0.30;

/// Default paint consumption in kg per m² per layer.
pub const DEFAULT_PAINT_CONSUMPTION_KG_PER_M2_PER_LAYER: f64 = 0.10;

/// Default number of paint layers.
pub const DEFAULT_PAINT_LAYERS: u32 = 2;

/// Default loss coefficient applied to estimated paint mass to account for
/// material waste during application.
pub const DEFAULT_PAINT_LOSS_COEFFICIENT: f64 = 1.10;

/// Category label for material lines whose catalog entry has no category.
pub const UNCATEGORIZED: &str = "Без категории";
