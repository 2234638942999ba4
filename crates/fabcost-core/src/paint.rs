//! # Paint Estimator
//!
//! Pure function: (part geometry, coverage assumptions) → painted surface
//! area, paint mass required, paint cost.
//!
//! ## Painted-Area Priority Ladder
//! Per material line, chosen by available geometry:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. diameter present        →  π × D × L          (cylinder lateral)    │
//! │  2. rectangular section     →  2(a + b) × L       (profile perimeter)   │
//! │  3. sheet-like category     →  L × W × 2          (both faces)          │
//! │  4. otherwise               →  0                  (never an error)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Each result is multiplied by the line quantity. Diameter and
//! cross-section come from the catalog in millimeters; line length and
//! width are in meters.
//!
//! ## Paint Cost
//! The paint price comes from whichever material line is paint-like
//! (name or category containing a paint/varnish marker). A product
//! without one simply requires no paint: cost is 0 and the condition is
//! informational, not an error.

use std::f64::consts::PI;

use crate::round::{round2, round3};
use crate::types::{BomLine, PaintRequirement, PaintSpec};

const MM_PER_M: f64 = 1000.0;

// =============================================================================
// Painted Area
// =============================================================================

/// Computes the painted area in m² for one material line (all pieces).
///
/// Returns 0 for non-positive lengths and for unknown geometry; an
/// unpaintable line must not abort the estimate.
///
/// ## Example
/// ```rust
/// use fabcost_core::paint::painted_area_m2;
/// # use fabcost_core::types::BomLine;
/// # fn cylinder() -> BomLine {
/// #     BomLine {
/// #         material_id: "m-1".into(), category: "Труба".into(),
/// #         material_name: "Труба 20".into(), length_m: 1.0, width_m: 0.0,
/// #         thickness_m: 0.0, quantity: 5, cost: 0.0, weight_per_meter: 0.0,
/// #         diameter_mm: 20.0, section_length_mm: 0.0, section_width_mm: 0.0,
/// #         price_per_kg: 0.0,
/// #     }
/// # }
///
/// // diameter 20mm, length 1m, quantity 5: π × 0.02 × 1 × 5 ≈ 0.314 m²
/// let area = painted_area_m2(&cylinder());
/// assert!((area - 0.314159).abs() < 1e-4);
/// ```
pub fn painted_area_m2(line: &BomLine) -> f64 {
    if line.length_m <= 0.0 {
        return 0.0;
    }

    let quantity = line.quantity as f64;

    // Round profile: lateral surface of a cylinder.
    if line.diameter_mm > 0.0 {
        let diameter_m = line.diameter_mm / MM_PER_M;
        return PI * diameter_m * line.length_m * quantity;
    }

    // Rectangular profile: cross-section perimeter × length.
    if line.section_length_mm > 0.0 && line.section_width_mm > 0.0 {
        let a_m = line.section_length_mm / MM_PER_M;
        let b_m = line.section_width_mm / MM_PER_M;
        let perimeter_m = 2.0 * (a_m + b_m);
        return perimeter_m * line.length_m * quantity;
    }

    // Sheet/panel: both faces.
    if crate::shape::is_sheet_like(&line.category) && line.width_m > 0.0 {
        return line.length_m * line.width_m * 2.0 * quantity;
    }

    // Unknown geometry contributes nothing.
    0.0
}

/// Sums painted area over all material lines.
pub fn total_painted_area_m2(lines: &[BomLine]) -> f64 {
    lines.iter().map(painted_area_m2).sum()
}

// =============================================================================
// Paint Requirement
// =============================================================================

/// Finds the first paint-like material line, if any.
pub fn find_paint_line(lines: &[BomLine]) -> Option<&BomLine> {
    lines.iter().find(|line| line.is_paint_like())
}

/// Estimates the paint requirement for a product's bill of materials.
///
/// Required mass is derived from geometry regardless of whether paint is
/// on the bill; the cost is priced only when a paint-like line exists
/// (otherwise it stays 0 and `material_id` is `None`).
pub fn estimate_paint(lines: &[BomLine], spec: &PaintSpec) -> PaintRequirement {
    let total_area = total_painted_area_m2(lines);

    let mut required_kg = total_area * spec.consumption_kg_per_m2_per_layer * spec.layers as f64;
    if spec.apply_loss_coefficient {
        required_kg *= spec.loss_coefficient;
    }

    let (cost, material_id) = match find_paint_line(lines) {
        Some(paint) => (required_kg * paint.price_per_kg, Some(paint.material_id.clone())),
        None => (0.0, None),
    };

    PaintRequirement {
        total_area_m2: round3(total_area),
        required_kg: round3(required_kg),
        cost: round2(cost),
        material_id,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(category: &str, name: &str) -> BomLine {
        BomLine {
            material_id: "m-1".to_string(),
            category: category.to_string(),
            material_name: name.to_string(),
            length_m: 0.0,
            width_m: 0.0,
            thickness_m: 0.0,
            quantity: 1,
            cost: 0.0,
            weight_per_meter: 0.0,
            diameter_mm: 0.0,
            section_length_mm: 0.0,
            section_width_mm: 0.0,
            price_per_kg: 0.0,
        }
    }

    #[test]
    fn test_cylinder_lateral_surface() {
        // diameter=0.02m, length=1m, quantity=5: π*0.02*1*5 ≈ 0.314 m²
        let mut l = line("Труба", "Труба 20");
        l.diameter_mm = 20.0;
        l.length_m = 1.0;
        l.quantity = 5;

        let area = painted_area_m2(&l);
        assert!((area - PI * 0.02 * 1.0 * 5.0).abs() < 1e-12);
        assert!((area - 0.314).abs() < 1e-3);
    }

    #[test]
    fn test_rectangular_profile_perimeter() {
        // 40×20mm section, 2m long, 3 pieces: 2*(0.04+0.02)*2*3 = 0.72 m²
        let mut l = line("Профиль", "Профиль 40х20");
        l.section_length_mm = 40.0;
        l.section_width_mm = 20.0;
        l.length_m = 2.0;
        l.quantity = 3;

        assert!((painted_area_m2(&l) - 0.72).abs() < 1e-12);
    }

    #[test]
    fn test_sheet_counts_both_faces() {
        let mut l = line("Лист", "Лист 2мм");
        l.length_m = 1.0;
        l.width_m = 0.5;
        l.quantity = 4;

        // 1 * 0.5 * 2 * 4 = 4 m²
        assert!((painted_area_m2(&l) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_diameter_wins_over_section_and_sheet() {
        let mut l = line("Лист", "Пруток");
        l.diameter_mm = 10.0;
        l.section_length_mm = 40.0;
        l.section_width_mm = 20.0;
        l.length_m = 1.0;
        l.width_m = 1.0;
        l.quantity = 1;

        assert!((painted_area_m2(&l) - PI * 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_geometry_and_zero_length_contribute_nothing() {
        let mut unknown = line("Метизы", "Болт М8");
        unknown.quantity = 100;
        assert_eq!(painted_area_m2(&unknown), 0.0);

        let mut zero_len = line("Труба", "Труба 20");
        zero_len.diameter_mm = 20.0;
        zero_len.length_m = 0.0;
        assert_eq!(painted_area_m2(&zero_len), 0.0);
    }

    #[test]
    fn test_estimate_with_paint_line() {
        let mut sheet = line("Лист", "Лист 2мм");
        sheet.length_m = 1.0;
        sheet.width_m = 0.5;
        sheet.quantity = 4; // 4 m²

        let mut paint = line("Краска", "Краска ПФ-115 серая");
        paint.material_id = "paint-1".to_string();
        paint.price_per_kg = 95.0;

        let spec = PaintSpec {
            consumption_kg_per_m2_per_layer: 0.10,
            layers: 2,
            loss_coefficient: 1.10,
            apply_loss_coefficient: true,
        };
        let req = estimate_paint(&[sheet, paint], &spec);

        // 4 * 0.10 * 2 * 1.10 = 0.88 kg, cost = 0.88 * 95 = 83.6
        assert!((req.total_area_m2 - 4.0).abs() < 1e-9);
        assert!((req.required_kg - 0.88).abs() < 1e-9);
        assert!((req.cost - 83.6).abs() < 1e-9);
        assert_eq!(req.material_id.as_deref(), Some("paint-1"));
    }

    #[test]
    fn test_estimate_without_loss_coefficient() {
        let mut sheet = line("Лист", "Лист 2мм");
        sheet.length_m = 1.0;
        sheet.width_m = 0.5;
        sheet.quantity = 4;

        let spec = PaintSpec {
            apply_loss_coefficient: false,
            ..PaintSpec::default()
        };
        let req = estimate_paint(&[sheet], &spec);
        assert!((req.required_kg - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_no_paint_line_prices_zero() {
        let mut sheet = line("Лист", "Лист 2мм");
        sheet.length_m = 1.0;
        sheet.width_m = 1.0;
        sheet.quantity = 1;

        let req = estimate_paint(&[sheet], &PaintSpec::default());
        assert!(req.required_kg > 0.0); // geometry still estimated
        assert_eq!(req.cost, 0.0);
        assert!(req.material_id.is_none());
    }

    #[test]
    fn test_varnish_marker_in_category() {
        let mut varnish = line("Лак", "НЦ-218");
        varnish.price_per_kg = 120.0;
        assert!(find_paint_line(std::slice::from_ref(&varnish)).is_some());
    }
}
