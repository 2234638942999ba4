//! # Material Shape Classes
//!
//! The geometric category of a material governs which cost and paint-area
//! formula applies. Catalog rows carry a free-text category (the import
//! sheet's vocabulary); it is resolved **once** into a closed
//! [`ShapeClass`] instead of re-matching strings at every call site.
//!
//! ## Category Vocabulary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog category              →  ShapeClass        →  Cost formula     │
//! │                                                                         │
//! │  Труба, Проволока, Профиль,    →  LengthQuantity    →  L × kg/m × qty  │
//! │  Профиль г/к, Прут                                                      │
//! │  Лист                          →  Dimensions        →  L×W×T × ρ × qty │
//! │  Метизы                        →  QuantityOnly      →  price × qty     │
//! │  anything else                 →  Unknown           →  zero, no error  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An unrecognized category must never raise: a product with a
//! newly-introduced material type still prices the rest of its bill of
//! materials.

use serde::{Deserialize, Serialize};

/// Categories priced by length × weight-per-meter (pipe, wire, profile, rod).
const LENGTH_QUANTITY_CATEGORIES: &[&str] =
    &["Труба", "Проволока", "Профиль", "Профиль г/к", "Прут"];

/// Categories priced by volume × steel density (sheet stock).
const DIMENSIONS_CATEGORIES: &[&str] = &["Лист"];

/// Categories priced by unit price × quantity (fasteners).
const QUANTITY_ONLY_CATEGORIES: &[&str] = &["Метизы"];

/// Category substrings identifying sheet/panel-like materials for the
/// paint-area formula (matched case-insensitively).
const SHEET_LIKE_MARKERS: &[&str] = &["лист", "дсп", "мдф", "панель"];

/// Name/category substrings identifying a paint or varnish material
/// (matched case-insensitively).
const PAINT_MARKERS: &[&str] = &["краска", "лак"];

// =============================================================================
// Shape Class
// =============================================================================

/// The geometric category of a material, resolved from the catalog
/// category string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeClass {
    /// Linear stock: pipe, wire, profile, rod. Priced per meter of length.
    LengthQuantity,
    /// Sheet stock. Priced by volume × steel density.
    Dimensions,
    /// Fasteners. Priced per piece; contributes no weight.
    QuantityOnly,
    /// Category not recognized. Contributes zero cost, weight, and area.
    Unknown,
}

impl ShapeClass {
    /// Resolves a catalog category string into a shape class.
    ///
    /// ## Example
    /// ```rust
    /// use fabcost_core::shape::ShapeClass;
    ///
    /// assert_eq!(ShapeClass::from_category("Труба"), ShapeClass::LengthQuantity);
    /// assert_eq!(ShapeClass::from_category("Лист"), ShapeClass::Dimensions);
    /// assert_eq!(ShapeClass::from_category("Метизы"), ShapeClass::QuantityOnly);
    /// assert_eq!(ShapeClass::from_category("Краска"), ShapeClass::Unknown);
    /// ```
    pub fn from_category(category: &str) -> Self {
        let category = category.trim();

        if LENGTH_QUANTITY_CATEGORIES.contains(&category) {
            ShapeClass::LengthQuantity
        } else if DIMENSIONS_CATEGORIES.contains(&category) {
            ShapeClass::Dimensions
        } else if QUANTITY_ONLY_CATEGORIES.contains(&category) {
            ShapeClass::QuantityOnly
        } else {
            ShapeClass::Unknown
        }
    }
}

// =============================================================================
// Marker Checks
// =============================================================================

/// Checks whether a category names a sheet/panel-like material.
///
/// Used by the paint estimator's both-faces formula, which also covers
/// panel materials (ДСП, МДФ) that the cost calculator treats as Unknown.
pub fn is_sheet_like(category: &str) -> bool {
    let category = category.to_lowercase();
    SHEET_LIKE_MARKERS.iter().any(|m| category.contains(m))
}

/// Checks whether a material name or category marks a paint-like material
/// (paint or varnish).
pub fn is_paint_like(name: &str, category: &str) -> bool {
    let name = name.to_lowercase();
    let category = category.to_lowercase();
    PAINT_MARKERS
        .iter()
        .any(|m| name.contains(m) || category.contains(m))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_quantity_categories() {
        for cat in ["Труба", "Проволока", "Профиль", "Профиль г/к", "Прут"] {
            assert_eq!(ShapeClass::from_category(cat), ShapeClass::LengthQuantity);
        }
    }

    #[test]
    fn test_sheet_and_fastener_categories() {
        assert_eq!(ShapeClass::from_category("Лист"), ShapeClass::Dimensions);
        assert_eq!(ShapeClass::from_category("Метизы"), ShapeClass::QuantityOnly);
    }

    #[test]
    fn test_unknown_category_is_not_an_error() {
        assert_eq!(ShapeClass::from_category(""), ShapeClass::Unknown);
        assert_eq!(ShapeClass::from_category("Композит"), ShapeClass::Unknown);
    }

    #[test]
    fn test_category_is_trimmed() {
        assert_eq!(ShapeClass::from_category(" Труба "), ShapeClass::LengthQuantity);
    }

    #[test]
    fn test_sheet_like_markers() {
        assert!(is_sheet_like("Лист"));
        assert!(is_sheet_like("дсп ламинированная"));
        assert!(is_sheet_like("Панель МДФ"));
        assert!(!is_sheet_like("Труба"));
    }

    #[test]
    fn test_paint_markers() {
        assert!(is_paint_like("Краска ПФ-115", ""));
        assert!(is_paint_like("", "Лак"));
        assert!(!is_paint_like("Проволока", "Проволока"));
    }
}
