//! # Material Cost Calculator
//!
//! Pure function: (material geometry + quantity + unit price) → cost and
//! weight, branching on the material's shape class.
//!
//! ## Formulas
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LengthQuantity (pipe, wire, profile, rod)                              │
//! │     weight = length_m × weight_per_meter × quantity                     │
//! │     cost   = weight × unit_price_per_kg                                 │
//! │                                                                         │
//! │  Dimensions (sheet)                                                     │
//! │     volume = length_m × width_m × thickness_m × quantity                │
//! │     weight = volume × 7850 kg/m³                                        │
//! │     cost   = weight × unit_price_per_kg                                 │
//! │                                                                         │
//! │  QuantityOnly (fasteners)                                               │
//! │     cost   = unit_price × quantity      (weight contribution is 0)      │
//! │                                                                         │
//! │  Unknown                                                                │
//! │     cost = weight = 0                   (never an error)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract
//! Inputs are assumed already validated (strictly positive dimensions and
//! quantity for the relevant class — see [`crate::validation`]); the only
//! tolerated irregularity is an unrecognized category, which passes
//! through as a zero contribution so that a product with a
//! newly-introduced material type still prices the rest of its bill of
//! materials. Sheet thickness is always explicit: it is a caller error to
//! omit it, never silently defaulted here.

use serde::{Deserialize, Serialize};

use crate::shape::ShapeClass;
use crate::types::MaterialCatalogEntry;
use crate::STEEL_DENSITY_KG_M3;

// =============================================================================
// Inputs / Outputs
// =============================================================================

/// Dimensional inputs for one material line.
///
/// Fields not used by the line's shape class are ignored (a fastener's
/// length, a pipe's width).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MaterialDimensions {
    /// Linear length in meters.
    pub length_m: f64,
    /// Width in meters (sheets).
    pub width_m: f64,
    /// Thickness in meters (sheets).
    pub thickness_m: f64,
    /// Piece count.
    pub quantity: i64,
}

/// The weight and cost of one material line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialCost {
    /// Weight in kg. 0 for fasteners and unrecognized categories.
    pub weight_kg: f64,
    /// Cost in currency.
    pub cost: f64,
}

impl MaterialCost {
    /// A zero contribution (unrecognized category).
    #[inline]
    pub const fn zero() -> Self {
        MaterialCost {
            weight_kg: 0.0,
            cost: 0.0,
        }
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Computes weight and cost for one material line.
///
/// ## Arguments
/// * `shape` - The material's shape class (resolved once from the catalog)
/// * `dims` - Validated line dimensions
/// * `weight_per_meter` - Catalog weight of one linear meter in kg
/// * `unit_price` - Catalog price per kg (per piece for fasteners)
///
/// ## Example
/// ```rust
/// use fabcost_core::material_cost::{material_cost, MaterialDimensions};
/// use fabcost_core::shape::ShapeClass;
///
/// let dims = MaterialDimensions { length_m: 2.0, quantity: 3, ..Default::default() };
/// let mc = material_cost(ShapeClass::LengthQuantity, &dims, 1.5, 20.0);
/// assert_eq!(mc.weight_kg, 9.0);
/// assert_eq!(mc.cost, 180.0);
/// ```
pub fn material_cost(
    shape: ShapeClass,
    dims: &MaterialDimensions,
    weight_per_meter: f64,
    unit_price: f64,
) -> MaterialCost {
    let quantity = dims.quantity as f64;

    match shape {
        ShapeClass::LengthQuantity => {
            let weight_kg = dims.length_m * weight_per_meter * quantity;
            MaterialCost {
                weight_kg,
                cost: weight_kg * unit_price,
            }
        }

        ShapeClass::Dimensions => {
            let volume_m3 = dims.length_m * dims.width_m * dims.thickness_m * quantity;
            let weight_kg = volume_m3 * STEEL_DENSITY_KG_M3;
            MaterialCost {
                weight_kg,
                cost: weight_kg * unit_price,
            }
        }

        ShapeClass::QuantityOnly => MaterialCost {
            weight_kg: 0.0,
            cost: unit_price * quantity,
        },

        ShapeClass::Unknown => MaterialCost::zero(),
    }
}

/// Computes weight and cost for a line of a given catalog material.
///
/// Convenience wrapper resolving shape class and unit price from the
/// catalog entry; used by the persistence layer at add/update time to
/// produce the line cost that is then stored.
pub fn material_cost_for_entry(
    entry: &MaterialCatalogEntry,
    dims: &MaterialDimensions,
) -> MaterialCost {
    material_cost(
        entry.shape_class(),
        dims,
        entry.weight_per_meter,
        entry.unit_price(),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_quantity_cost() {
        // length=2m, weight_per_meter=1.5kg, quantity=3, price=20/kg
        let dims = MaterialDimensions {
            length_m: 2.0,
            quantity: 3,
            ..Default::default()
        };
        let mc = material_cost(ShapeClass::LengthQuantity, &dims, 1.5, 20.0);
        assert_eq!(mc.weight_kg, 9.0);
        assert_eq!(mc.cost, 180.0);
    }

    #[test]
    fn test_sheet_cost_by_volume_and_density() {
        // length=1m, width=0.5m, thickness=0.002m, quantity=4, price=10/kg
        // weight = 1 * 0.5 * 0.002 * 4 * 7850 = 31.4 kg, cost = 314.0
        let dims = MaterialDimensions {
            length_m: 1.0,
            width_m: 0.5,
            thickness_m: 0.002,
            quantity: 4,
        };
        let mc = material_cost(ShapeClass::Dimensions, &dims, 0.0, 10.0);
        assert!((mc.weight_kg - 31.4).abs() < 1e-9);
        assert!((mc.cost - 314.0).abs() < 1e-9);
    }

    #[test]
    fn test_fastener_cost_has_no_weight() {
        let dims = MaterialDimensions {
            quantity: 100,
            ..Default::default()
        };
        let mc = material_cost(ShapeClass::QuantityOnly, &dims, 0.0, 0.45);
        assert_eq!(mc.weight_kg, 0.0);
        assert!((mc.cost - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_category_contributes_zero() {
        let dims = MaterialDimensions {
            length_m: 3.0,
            width_m: 1.0,
            thickness_m: 0.01,
            quantity: 2,
        };
        let mc = material_cost(ShapeClass::Unknown, &dims, 1.5, 20.0);
        assert_eq!(mc, MaterialCost::zero());
    }

    #[test]
    fn test_entry_wrapper_uses_price_fallback() {
        let entry = MaterialCatalogEntry {
            id: "m-1".to_string(),
            category: "Проволока".to_string(),
            name: "Проволока 3мм".to_string(),
            diameter_mm: 3.0,
            section_length_mm: 0.0,
            section_width_mm: 0.0,
            thickness_mm: 0.0,
            weight_per_meter: 0.055,
            purchase_price_t: 0.0,
            delivery_price_t: 0.0,
            waste_price: 0.0,
            final_price_kg: 30.0,
            unit_of_measurement: "м".to_string(),
            our_price_per_kg: 0.0, // falls back to final_price_kg
        };
        let dims = MaterialDimensions {
            length_m: 10.0,
            quantity: 2,
            ..Default::default()
        };
        let mc = material_cost_for_entry(&entry, &dims);
        assert!((mc.weight_kg - 1.1).abs() < 1e-9);
        assert!((mc.cost - 33.0).abs() < 1e-9);
    }
}
