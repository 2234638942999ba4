//! # Labor Cost Aggregator
//!
//! Pure function: (operation records) → total labor cost, honoring a
//! per-operation manual override.
//!
//! ## Override Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  approved_rate present and numeric                                      │
//! │      → added to the total AS-IS: it is an already-settled absolute     │
//! │        cost for that operation, NOT a rate multiplier                  │
//! │                                                                         │
//! │  approved_rate absent, empty, or non-numeric                            │
//! │      → fall back to the line's computed cost                           │
//! │        (time_per_unit × rate_per_minute); a garbage override must      │
//! │        never abort aggregation                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::LineError;
use crate::round::round2;
use crate::types::OperationLine;

// =============================================================================
// Per-Line Cost
// =============================================================================

/// Parses an approved rate string into an absolute cost override.
///
/// Returns `None` for absent, blank, or non-numeric values ("none"
/// included — legacy rows stored it literally).
fn parse_approved_rate(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Computes one operation's labor contribution.
///
/// ## Errors
/// A line whose stored numbers are negative or non-finite is reported as
/// a [`LineError`] so the caller can skip it and keep aggregating.
pub fn line_labor_cost(op: &OperationLine) -> Result<f64, LineError> {
    let malformed = |reason: &str| LineError::OperationLine {
        operation_name: op.operation_name.clone(),
        reason: reason.to_string(),
    };

    if !op.cost.is_finite() || !op.time_per_unit.is_finite() || !op.rate_per_minute.is_finite() {
        return Err(malformed("stored cost is not a finite number"));
    }
    if op.cost < 0.0 || op.rate_per_minute < 0.0 || op.time_measured < 0.0 {
        return Err(malformed("stored cost or rate is negative"));
    }

    match parse_approved_rate(op.approved_rate.as_deref()) {
        Some(approved) => Ok(approved),
        None => Ok(op.cost),
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Aggregates total labor cost over all operation lines.
///
/// Returns the total rounded to 2 decimal places plus any per-line
/// errors; a bad line contributes zero and never aborts the run.
///
/// ## Example
/// ```rust
/// use fabcost_core::labor::total_labor_cost;
///
/// let (total, errors) = total_labor_cost(&[]);
/// assert_eq!(total, 0.0);
/// assert!(errors.is_empty());
/// ```
pub fn total_labor_cost(operations: &[OperationLine]) -> (f64, Vec<LineError>) {
    let mut total = 0.0;
    let mut errors = Vec::new();

    for op in operations {
        match line_labor_cost(op) {
            Ok(cost) => total += cost,
            Err(err) => errors.push(err),
        }
    }

    (round2(total), errors)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn op(name: &str, time_per_unit: f64, rate: f64, approved: Option<&str>) -> OperationLine {
        OperationLine {
            id: "op-1".to_string(),
            product_id: "p-1".to_string(),
            operation_name: name.to_string(),
            quantity_measured: 10,
            time_measured: time_per_unit * 10.0,
            time_per_unit,
            rate_per_minute: rate,
            cost: time_per_unit * rate,
            employee_id: None,
            employee_name: None,
            approved_rate: approved.map(str::to_string),
        }
    }

    #[test]
    fn test_computed_cost_without_override() {
        let (total, errors) = total_labor_cost(&[op("Сверление", 2.0, 1.5, None)]);
        assert_eq!(total, 3.0);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_approved_rate_is_absolute_override() {
        // Override wins regardless of rate_per_minute.
        let a = op("Токарная обработка", 2.0, 2.5, Some("42.50"));
        let b = op("Токарная обработка", 2.0, 999.0, Some("42.50"));

        assert_eq!(line_labor_cost(&a).unwrap(), 42.5);
        assert_eq!(line_labor_cost(&b).unwrap(), 42.5);
    }

    #[test]
    fn test_non_numeric_override_falls_back() {
        let garbage = op("Шлифовка", 1.0, 2.0, Some("уточнить"));
        assert_eq!(line_labor_cost(&garbage).unwrap(), 2.0);

        let blank = op("Шлифовка", 1.0, 2.0, Some("   "));
        assert_eq!(line_labor_cost(&blank).unwrap(), 2.0);

        let legacy_none = op("Шлифовка", 1.0, 2.0, Some("None"));
        assert_eq!(line_labor_cost(&legacy_none).unwrap(), 2.0);
    }

    #[test]
    fn test_one_bad_line_does_not_abort_aggregation() {
        let good = op("Сборка", 3.0, 1.8, None); // 5.4
        let mut bad = op("Покраска", 1.0, 2.2, None);
        bad.cost = f64::NAN;
        let overridden = op("Фрезерование", 5.0, 3.0, Some("10")); // 10.0

        let (total, errors) = total_labor_cost(&[good, bad, overridden]);
        assert!((total - 15.4).abs() < 1e-9);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_total_is_rounded_to_two_places() {
        let a = op("Сверление", 1.0, 1.111, None); // 1.111
        let b = op("Сверление", 1.0, 2.222, None); // 2.222
        let (total, _) = total_labor_cost(&[a, b]);
        assert_eq!(total, 3.33);
    }

    #[test]
    fn test_empty_operations_total_zero() {
        let (total, errors) = total_labor_cost(&[]);
        assert_eq!(total, 0.0);
        assert!(errors.is_empty());
    }
}
