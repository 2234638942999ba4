//! # Pricing Orchestrator
//!
//! Composes the four calculators into the complete price breakdown for
//! one product.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BomLines ──► screen ──► summarize per category ──► weight / cost      │
//! │  OperationLines ──► labor aggregation ──► total labor cost             │
//! │  screened lines + PaintSpec ──► paint estimate ──► area, kg, cost      │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  rollup(labor, materials + paint, markups, stored approved price)     │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                        PricingResult                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Discipline
//! A malformed stored line is reported in `PricingResult::line_errors`
//! and contributes zero; the computation itself always completes. The
//! only hard failure in a pricing run is "product not found", and that
//! happens in the persistence layer before this module is reached.

use std::collections::BTreeMap;

use crate::error::LineError;
use crate::labor::total_labor_cost;
use crate::material_cost::{material_cost, MaterialDimensions};
use crate::paint::{estimate_paint, painted_area_m2};
use crate::round::{round2, round3};
use crate::rollup::cost_indicators;
use crate::types::{
    BomLine, CategorySummary, OperationLine, PaintSpec, PricingResult, Product, ProductInfo,
};

// =============================================================================
// Material Summarization
// =============================================================================

/// Screens one stored material line before it enters the summary.
fn check_line(line: &BomLine) -> Result<(), LineError> {
    let malformed = |reason: &str| LineError::MaterialLine {
        material_id: line.material_id.clone(),
        material_name: line.material_name.clone(),
        reason: reason.to_string(),
    };

    if line.quantity <= 0 {
        return Err(malformed("quantity must be positive"));
    }
    if !line.cost.is_finite() || line.cost < 0.0 {
        return Err(malformed("stored cost is not a non-negative number"));
    }
    if line.length_m < 0.0 || line.width_m < 0.0 || line.thickness_m < 0.0 {
        return Err(malformed("dimensions must not be negative"));
    }
    if !(line.length_m.is_finite() && line.width_m.is_finite() && line.thickness_m.is_finite()) {
        return Err(malformed("dimensions must be finite numbers"));
    }
    Ok(())
}

/// Screens stored lines, separating priceable ones from malformed ones.
///
/// Every downstream stage (category summaries, paint estimate) sees only
/// the lines that pass; a rejected line is reported once and contributes
/// nothing anywhere.
fn screen_lines(lines: &[BomLine]) -> (Vec<BomLine>, Vec<LineError>) {
    let mut valid = Vec::with_capacity(lines.len());
    let mut errors = Vec::new();

    for line in lines {
        match check_line(line) {
            Ok(()) => valid.push(line.clone()),
            Err(err) => errors.push(err),
        }
    }

    (valid, errors)
}

/// Rolls screened material lines up into per-category summaries.
///
/// Weight is recomputed from the line's geometry via its shape-class
/// formula; cost is taken from the persisted line cost.
fn summarize_materials(lines: &[BomLine]) -> BTreeMap<String, CategorySummary> {
    let mut by_category: BTreeMap<String, CategorySummary> = BTreeMap::new();

    for line in lines {
        let dims = MaterialDimensions {
            length_m: line.length_m,
            width_m: line.width_m,
            thickness_m: line.thickness_m,
            quantity: line.quantity,
        };
        let mc = material_cost(
            line.shape_class(),
            &dims,
            line.weight_per_meter,
            line.price_per_kg,
        );

        let summary = by_category
            .entry(line.category_label().to_string())
            .or_default();
        summary.total_weight_kg += mc.weight_kg;
        summary.total_cost += line.cost;
        summary.total_paint_area_m2 += painted_area_m2(line);
    }

    for summary in by_category.values_mut() {
        summary.total_weight_kg = round3(summary.total_weight_kg);
        summary.total_cost = round2(summary.total_cost);
        summary.total_paint_area_m2 = round3(summary.total_paint_area_m2);
    }

    by_category
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Prices one product from its stored records.
///
/// ## Arguments
/// * `product` - The product with its stored markups and approved price
/// * `materials` - Bill-of-materials lines joined with catalog geometry
/// * `operations` - Labor operation lines
/// * `paint_spec` - Painting assumptions (consumption, layers, loss)
///
/// ## Example
/// ```rust
/// use fabcost_core::pricing::price_product;
/// use fabcost_core::types::PaintSpec;
/// # use chrono::Utc;
/// # use fabcost_core::types::Product;
/// # let product = Product {
/// #     id: "p-1".into(), product_id: "СТ-001".into(), article: "A-1".into(),
/// #     name: "Кронштейн".into(), overhead_percent: None, profit_percent: None,
/// #     approved_price: 0.0, calculated_price: 0.0, total_paint_area: 0.0,
/// #     created_at: Utc::now(),
/// # };
///
/// let result = price_product(&product, &[], &[], &PaintSpec::default());
/// assert_eq!(result.indicators.calculated_price, 0.0);
/// assert!(result.line_errors.is_empty());
/// ```
pub fn price_product(
    product: &Product,
    materials: &[BomLine],
    operations: &[OperationLine],
    paint_spec: &PaintSpec,
) -> PricingResult {
    let (material_lines, mut line_errors) = screen_lines(materials);
    let materials_by_category = summarize_materials(&material_lines);
    let (labor_cost, labor_errors) = total_labor_cost(operations);
    line_errors.extend(labor_errors);

    let paint = estimate_paint(&material_lines, paint_spec);

    let materials_cost: f64 = materials_by_category
        .values()
        .map(|summary| summary.total_cost)
        .sum();
    let total_weight_kg: f64 = materials_by_category
        .values()
        .map(|summary| summary.total_weight_kg)
        .sum();

    let indicators = cost_indicators(
        labor_cost,
        materials_cost + paint.cost,
        product.overhead(),
        product.profit(),
        product.approved_price,
    );

    PricingResult {
        product: ProductInfo {
            product_id: product.product_id.clone(),
            article: product.article.clone(),
            name: product.name.clone(),
            total_weight_kg: round3(total_weight_kg),
            total_paint_area_m2: paint.total_area_m2,
        },
        materials_by_category,
        labor_cost,
        paint,
        indicators,
        line_errors,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
