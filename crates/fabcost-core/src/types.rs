//! # Domain Types
//!
//! Core domain types used throughout Fabcost.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────────┐  ┌──────────────────┐  │
//! │  │     Product      │  │ MaterialCatalogEntry │  │  OperationLine   │  │
//! │  │  ──────────────  │  │  ──────────────────  │  │  ──────────────  │  │
//! │  │  id (UUID)       │  │  category (shape)    │  │  operation_name  │  │
//! │  │  product_id      │  │  diameter/section    │  │  qty/time/rate   │  │
//! │  │  article, name   │  │  weight_per_meter    │  │  cost            │  │
//! │  │  overhead/profit │  │  our_price_per_kg    │  │  approved_rate   │  │
//! │  │  approved_price  │  └──────────────────────┘  └──────────────────┘  │
//! │  └──────────────────┘                                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐      ┌──────────────────────────────────┐    │
//! │  │ ProductMaterialLine  │ join │            BomLine               │    │
//! │  │  material ref + dims │ ───► │  line dims + catalog geometry    │    │
//! │  │  persisted cost      │      │  (what the pricing engine reads) │    │
//! │  └──────────────────────┘      └──────────────────────────────────┘    │
//! │                                                                         │
//! │  PricingResult = materials summary + labor + paint + cost indicators   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! A product has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `product_id`: human-readable display identifier, potentially mutable
//!
//! ## Units
//! Material-line dimensions (`length_m`, `width_m`, `thickness_m`) are in
//! **meters**; catalog geometry (`diameter_mm`, `section_*_mm`) is in
//! **millimeters** as imported, converted inside the paint estimator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::LineError;
use crate::shape::{self, ShapeClass};
use crate::{DEFAULT_OVERHEAD_PERCENT, DEFAULT_PAINT_CONSUMPTION_KG_PER_M2_PER_LAYER,
    DEFAULT_PAINT_LAYERS, DEFAULT_PAINT_LOSS_COEFFICIENT, DEFAULT_PROFIT_PERCENT};

// =============================================================================
// Markup
// =============================================================================

/// A markup ratio expressed as a fraction (0.55 = 55%).
///
/// ## Why a newtype?
/// Overhead and profit percentages travel through the rollup together
/// with absolute prices; wrapping the fraction keeps the two from being
/// confused and centralizes the domain defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Markup(f64);

impl Markup {
    /// Creates a markup from a fraction (0.55 = 55%).
    #[inline]
    pub const fn from_fraction(fraction: f64) -> Self {
        Markup(fraction)
    }

    /// Returns the markup as a fraction.
    #[inline]
    pub const fn fraction(&self) -> f64 {
        self.0
    }

    /// Returns the markup as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 * 100.0
    }

    /// The domain-standard overhead markup (55%).
    #[inline]
    pub const fn default_overhead() -> Self {
        Markup(DEFAULT_OVERHEAD_PERCENT)
    }

    /// The domain-standard profit markup (30%).
    #[inline]
    pub const fn default_profit() -> Self {
        Markup(DEFAULT_PROFIT_PERCENT)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A fabricated product owned by the catalog.
///
/// Created once; the pricing parameters (`overhead_percent`,
/// `profit_percent`, `approved_price`) are mutated only through the
/// pricing service's save path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-readable display identifier.
    pub product_id: String,

    /// Article number.
    pub article: String,

    /// Display name.
    pub name: String,

    /// Stored overhead markup fraction. `None` falls back to the
    /// domain-standard 0.55.
    pub overhead_percent: Option<f64>,

    /// Stored profit markup fraction. `None` falls back to the
    /// domain-standard 0.30.
    pub profit_percent: Option<f64>,

    /// Manually confirmed sale price. 0 means "not yet set"; a non-zero
    /// value is preserved verbatim however far `calculated_price` drifts.
    pub approved_price: f64,

    /// Last fully-derived price persisted by an explicit save call.
    pub calculated_price: f64,

    /// Last computed total painted area in m² (display/reporting value).
    pub total_paint_area: f64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the overhead markup, falling back to the domain default.
    #[inline]
    pub fn overhead(&self) -> Markup {
        self.overhead_percent
            .map(Markup::from_fraction)
            .unwrap_or_else(Markup::default_overhead)
    }

    /// Returns the profit markup, falling back to the domain default.
    #[inline]
    pub fn profit(&self) -> Markup {
        self.profit_percent
            .map(Markup::from_fraction)
            .unwrap_or_else(Markup::default_profit)
    }
}

// =============================================================================
// Material Catalog Entry
// =============================================================================

/// A reusable material definition.
///
/// Immutable reference data, loaded in bulk from an external import;
/// never created by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MaterialCatalogEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Shape category string from the import sheet (see [`ShapeClass`]).
    pub category: String,

    /// Material name.
    pub name: String,

    /// Diameter in mm (round stock), 0 when not applicable.
    pub diameter_mm: f64,

    /// Cross-section length in mm (rectangular profiles), 0 when n/a.
    pub section_length_mm: f64,

    /// Cross-section width in mm (rectangular profiles), 0 when n/a.
    pub section_width_mm: f64,

    /// Nominal thickness in mm, 0 when n/a.
    pub thickness_mm: f64,

    /// Weight of one linear meter in kg.
    pub weight_per_meter: f64,

    /// Purchase price per tonne.
    pub purchase_price_t: f64,

    /// Delivery surcharge per tonne.
    pub delivery_price_t: f64,

    /// Waste/offcut surcharge.
    pub waste_price: f64,

    /// Computed purchase price per kg.
    pub final_price_kg: f64,

    /// Unit of measurement label from the import sheet.
    pub unit_of_measurement: String,

    /// Our sale price per kg (per piece for fasteners).
    pub our_price_per_kg: f64,
}

impl MaterialCatalogEntry {
    /// Resolves this entry's shape class from its category string.
    #[inline]
    pub fn shape_class(&self) -> ShapeClass {
        ShapeClass::from_category(&self.category)
    }

    /// Returns the unit price used for costing: `our_price_per_kg`,
    /// falling back to the computed `final_price_kg`.
    #[inline]
    pub fn unit_price(&self) -> f64 {
        if self.our_price_per_kg > 0.0 {
            self.our_price_per_kg
        } else {
            self.final_price_kg
        }
    }
}

// =============================================================================
// Product Material Line
// =============================================================================

/// One material used on one product.
///
/// ## Cost Invariant
/// `cost` is persisted at add/update time and must be reproducible from
/// (material reference, dimensions, quantity) via the material cost
/// calculator for the material's shape class. It is not recomputed on
/// every read; `BomRepository::recost_product` is the explicit re-run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductMaterialLine {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning product.
    pub product_id: String,

    /// Referenced catalog material.
    pub material_id: String,

    /// Linear length in meters (0 for fasteners).
    pub length_m: f64,

    /// Width in meters (sheets only).
    pub width_m: f64,

    /// Thickness in meters (sheets only; always explicit, never defaulted).
    pub thickness_m: f64,

    /// Piece count.
    pub quantity: i64,

    /// Persisted cost computed at add/update time.
    pub cost: f64,
}

// =============================================================================
// BOM Line (joined view)
// =============================================================================

/// One material line joined with its catalog attributes.
///
/// This is the record shape the pricing engine reads: line dimensions and
/// persisted cost from [`ProductMaterialLine`], geometry and unit price
/// from [`MaterialCatalogEntry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BomLine {
    /// Referenced catalog material.
    pub material_id: String,

    /// Catalog category (may be empty).
    pub category: String,

    /// Material name.
    pub material_name: String,

    /// Linear length in meters.
    pub length_m: f64,

    /// Width in meters.
    pub width_m: f64,

    /// Thickness in meters.
    pub thickness_m: f64,

    /// Piece count.
    pub quantity: i64,

    /// Persisted line cost.
    pub cost: f64,

    /// Weight of one linear meter in kg.
    pub weight_per_meter: f64,

    /// Diameter in mm, 0 when not applicable.
    pub diameter_mm: f64,

    /// Cross-section length in mm, 0 when not applicable.
    pub section_length_mm: f64,

    /// Cross-section width in mm, 0 when not applicable.
    pub section_width_mm: f64,

    /// Unit price per kg (`our_price_per_kg` with `final_price_kg`
    /// fallback, resolved at fetch time).
    pub price_per_kg: f64,
}

impl BomLine {
    /// Resolves this line's shape class from the joined category.
    #[inline]
    pub fn shape_class(&self) -> ShapeClass {
        ShapeClass::from_category(&self.category)
    }

    /// Checks whether this line is a paint or varnish material.
    #[inline]
    pub fn is_paint_like(&self) -> bool {
        shape::is_paint_like(&self.material_name, &self.category)
    }

    /// Returns the line's category, or the uncategorized label when the
    /// catalog entry carries none.
    pub fn category_label(&self) -> &str {
        let trimmed = self.category.trim();
        if trimmed.is_empty() {
            crate::UNCATEGORIZED
        } else {
            trimmed
        }
    }
}

// =============================================================================
// Operation Line
// =============================================================================

/// One labor operation on one product, joined with the employee name.
///
/// ## Cost Invariant
/// `cost` equals `time_per_unit * rate_per_minute`; the labor aggregator
/// replaces it with `approved_rate` when that parses as a number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OperationLine {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning product.
    pub product_id: String,

    /// Operation name (from the rate sheet).
    pub operation_name: String,

    /// Measured piece count. May be 0; see [`OperationLine::derive_time_per_unit`].
    pub quantity_measured: i64,

    /// Measured time in minutes for the whole batch.
    pub time_measured: f64,

    /// Derived minutes per piece (persisted).
    pub time_per_unit: f64,

    /// Rate in currency per minute.
    pub rate_per_minute: f64,

    /// Computed cost (`time_per_unit * rate_per_minute`, persisted).
    pub cost: f64,

    /// Assigned employee, if any.
    pub employee_id: Option<String>,

    /// Joined employee name, if any.
    pub employee_name: Option<String>,

    /// Optional approved rate. When present and numeric it is an
    /// **absolute cost override** for this operation, not a rate
    /// multiplier. Kept as text: a non-numeric value must not abort
    /// aggregation.
    pub approved_rate: Option<String>,
}

impl OperationLine {
    /// Derives minutes-per-piece from a batch measurement.
    ///
    /// ## Division Guard
    /// `quantity_measured == 0` yields 0.0 rather than dividing by zero.
    ///
    /// ## Example
    /// ```rust
    /// use fabcost_core::types::OperationLine;
    ///
    /// assert_eq!(OperationLine::derive_time_per_unit(12.0, 4), 3.0);
    /// assert_eq!(OperationLine::derive_time_per_unit(12.0, 0), 0.0);
    /// ```
    #[inline]
    pub fn derive_time_per_unit(time_measured: f64, quantity_measured: i64) -> f64 {
        if quantity_measured == 0 {
            0.0
        } else {
            time_measured / quantity_measured as f64
        }
    }

    /// Returns the computed (non-overridden) cost for this line.
    #[inline]
    pub fn computed_cost(&self) -> f64 {
        self.time_per_unit * self.rate_per_minute
    }
}

// =============================================================================
// Paint Spec
// =============================================================================

/// Painting assumptions for the paint estimator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaintSpec {
    /// Paint consumption in kg per m² per layer.
    pub consumption_kg_per_m2_per_layer: f64,

    /// Number of layers applied.
    pub layers: u32,

    /// Multiplier for material waste during application.
    pub loss_coefficient: f64,

    /// Whether to apply the loss coefficient.
    pub apply_loss_coefficient: bool,
}

impl Default for PaintSpec {
    fn default() -> Self {
        PaintSpec {
            consumption_kg_per_m2_per_layer: DEFAULT_PAINT_CONSUMPTION_KG_PER_M2_PER_LAYER,
            layers: DEFAULT_PAINT_LAYERS,
            loss_coefficient: DEFAULT_PAINT_LOSS_COEFFICIENT,
            apply_loss_coefficient: true,
        }
    }
}

// =============================================================================
// Pricing Result
// =============================================================================

/// Product identity and physical totals on a pricing result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfo {
    /// Human-readable display identifier.
    pub product_id: String,
    /// Article number.
    pub article: String,
    /// Display name.
    pub name: String,
    /// Total weight of all material lines in kg.
    pub total_weight_kg: f64,
    /// Total painted area in m².
    pub total_paint_area_m2: f64,
}

/// Per-category materials rollup.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Total weight in kg (by the category's shape-class formula).
    pub total_weight_kg: f64,
    /// Total persisted cost.
    pub total_cost: f64,
    /// Total painted area in m².
    pub total_paint_area_m2: f64,
}

/// Paint requirement derived from part geometry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaintRequirement {
    /// Total paintable area in m².
    pub total_area_m2: f64,
    /// Required paint mass in kg (consumption × layers, with loss).
    pub required_kg: f64,
    /// Paint cost; 0 when the product has no paint-like material line.
    pub cost: f64,
    /// The paint-like material line used for pricing, if any.
    pub material_id: Option<String>,
}

/// Cost indicators produced by the rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostIndicators {
    /// Labor + materials (including paint), before markups.
    pub prime_cost: f64,
    /// Overhead markup fraction used.
    pub overhead_percent: f64,
    /// `prime_cost * overhead_percent`.
    pub overhead_cost: f64,
    /// Profit markup fraction used.
    pub profit_percent: f64,
    /// `(prime_cost + overhead_cost) * profit_percent`.
    pub profit_cost: f64,
    /// Fully-derived sale price.
    pub calculated_price: f64,
    /// Resolved approved price: the stored value when non-zero, else
    /// `calculated_price` for this computation only (never auto-persisted).
    pub approved_price: f64,
    /// Total material cost including paint.
    pub total_material_cost: f64,
}

/// The complete price breakdown for one product.
///
/// Transient: recomputed fully on every pricing request and discarded
/// after use; never partially updated. Export collaborators consume it
/// as an opaque read-only value.
#[derive(Debug, Clone, Serialize)]
pub struct PricingResult {
    /// Product identity and physical totals.
    pub product: ProductInfo,

    /// Materials summary keyed by category.
    ///
    /// BTreeMap keeps category order deterministic so recomputing on
    /// unchanged data yields identical output.
    pub materials_by_category: BTreeMap<String, CategorySummary>,

    /// Total labor cost (2 dp).
    pub labor_cost: f64,

    /// Paint requirement.
    pub paint: PaintRequirement,

    /// Cost indicators.
    pub indicators: CostIndicators,

    /// Lines skipped during summarization. Empty on a clean run; the
    /// computation always completes.
    pub line_errors: Vec<LineError>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product_with(overhead: Option<f64>, profit: Option<f64>) -> Product {
        Product {
            id: "p-1".to_string(),
            product_id: "СТ-001".to_string(),
            article: "A-1".to_string(),
            name: "Кронштейн".to_string(),
            overhead_percent: overhead,
            profit_percent: profit,
            approved_price: 0.0,
            calculated_price: 0.0,
            total_paint_area: 0.0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_markup_fraction_and_percentage() {
        let m = Markup::from_fraction(0.55);
        assert_eq!(m.fraction(), 0.55);
        assert!((m.percentage() - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_product_markup_fallbacks() {
        let p = product_with(None, None);
        assert_eq!(p.overhead().fraction(), 0.55);
        assert_eq!(p.profit().fraction(), 0.30);

        let p = product_with(Some(0.40), Some(0.25));
        assert_eq!(p.overhead().fraction(), 0.40);
        assert_eq!(p.profit().fraction(), 0.25);
    }

    #[test]
    fn test_unit_price_fallback() {
        let mut entry = MaterialCatalogEntry {
            id: "m-1".to_string(),
            category: "Труба".to_string(),
            name: "Труба 25".to_string(),
            diameter_mm: 25.0,
            section_length_mm: 0.0,
            section_width_mm: 0.0,
            thickness_mm: 0.0,
            weight_per_meter: 1.5,
            purchase_price_t: 0.0,
            delivery_price_t: 0.0,
            waste_price: 0.0,
            final_price_kg: 18.0,
            unit_of_measurement: "м".to_string(),
            our_price_per_kg: 20.0,
        };
        assert_eq!(entry.unit_price(), 20.0);

        entry.our_price_per_kg = 0.0;
        assert_eq!(entry.unit_price(), 18.0);
    }

    #[test]
    fn test_time_per_unit_division_guard() {
        assert_eq!(OperationLine::derive_time_per_unit(10.0, 5), 2.0);
        assert_eq!(OperationLine::derive_time_per_unit(10.0, 0), 0.0);
    }

    #[test]
    fn test_paint_spec_defaults() {
        let spec = PaintSpec::default();
        assert_eq!(spec.consumption_kg_per_m2_per_layer, 0.10);
        assert_eq!(spec.layers, 2);
        assert_eq!(spec.loss_coefficient, 1.10);
        assert!(spec.apply_loss_coefficient);
    }

    #[test]
    fn test_category_label_for_empty_category() {
        let line = BomLine {
            material_id: "m-1".to_string(),
            category: "  ".to_string(),
            material_name: "Нечто".to_string(),
            length_m: 1.0,
            width_m: 0.0,
            thickness_m: 0.0,
            quantity: 1,
            cost: 0.0,
            weight_per_meter: 0.0,
            diameter_mm: 0.0,
            section_length_mm: 0.0,
            section_width_mm: 0.0,
            price_per_kg: 0.0,
        };
        assert_eq!(line.category_label(), crate::UNCATEGORIZED);
    }
}
