//! # Cost Rollup
//!
//! Pure function: (labor cost, material cost incl. paint, markups, stored
//! approved price) → cost indicators.
//!
//! ## Formulas
//! ```text
//! prime_cost       = labor_cost + material_cost
//! overhead_cost    = prime_cost * overhead_percent
//! profit_cost      = (prime_cost + overhead_cost) * profit_percent
//! calculated_price = prime_cost + overhead_cost + profit_cost
//! ```
//!
//! ## Approved-Price Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stored approved_price == 0  (never set / new product)                  │
//! │      → resolved approved price = calculated_price FOR THIS RUN ONLY;   │
//! │        the default is never persisted by the engine                    │
//! │                                                                         │
//! │  stored approved_price != 0                                             │
//! │      → preserved verbatim, however far calculated_price has drifted;   │
//! │        callers surface the divergence (highlight), never reconcile it  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Changing the markups recomputes `calculated_price` but never touches
//! the stored approved price.

use crate::round::round2;
use crate::types::{CostIndicators, Markup};

/// Computes the cost indicators for one product.
///
/// ## Arguments
/// * `labor_cost` - Total labor cost
/// * `total_material_cost` - Materials plus paint
/// * `overhead` / `profit` - Markup fractions (stored or domain defaults)
/// * `stored_approved_price` - Persisted approved price, 0 when unset
///
/// ## Example
/// ```rust
/// use fabcost_core::rollup::cost_indicators;
/// use fabcost_core::types::Markup;
///
/// let ind = cost_indicators(
///     400.0,
///     600.0,
///     Markup::from_fraction(0.55),
///     Markup::from_fraction(0.30),
///     0.0,
/// );
/// assert_eq!(ind.prime_cost, 1000.0);
/// assert_eq!(ind.overhead_cost, 550.0);
/// assert_eq!(ind.profit_cost, 465.0);
/// assert_eq!(ind.calculated_price, 2015.0);
/// assert_eq!(ind.approved_price, 2015.0); // first-time default, not persisted
/// ```
pub fn cost_indicators(
    labor_cost: f64,
    total_material_cost: f64,
    overhead: Markup,
    profit: Markup,
    stored_approved_price: f64,
) -> CostIndicators {
    let prime_cost = labor_cost + total_material_cost;
    let overhead_cost = prime_cost * overhead.fraction();
    let profit_cost = (prime_cost + overhead_cost) * profit.fraction();
    let calculated_price = prime_cost + overhead_cost + profit_cost;

    let approved_price = if stored_approved_price == 0.0 {
        calculated_price
    } else {
        stored_approved_price
    };

    CostIndicators {
        prime_cost: round2(prime_cost),
        overhead_percent: overhead.fraction(),
        overhead_cost: round2(overhead_cost),
        profit_percent: profit.fraction(),
        profit_cost: round2(profit_cost),
        calculated_price: round2(calculated_price),
        approved_price: round2(approved_price),
        total_material_cost: round2(total_material_cost),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
