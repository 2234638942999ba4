//! # Validation Module
//!
//! Caller-side input validation for material and operation lines.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Entry forms (external)                                       │
//! │  └── Immediate user feedback on empty/zero fields                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE, called by the repositories before persisting    │
//! │  └── Per-shape-class positivity rules; the calculators assume          │
//! │      already-validated inputs                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Pricing run                                                  │
//! │  └── Stored lines that still violate the rules become LineErrors,      │
//! │      contribute zero, and never abort the computation                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::material_cost::MaterialDimensions;
use crate::shape::ShapeClass;

/// Validates one field as a strictly positive finite number.
fn require_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    if value <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates one field as a non-negative finite number.
fn require_non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Material Line Validation
// =============================================================================

/// Validates material-line dimensions for a shape class.
///
/// ## Rules
/// - every class: quantity > 0
/// - LengthQuantity: length > 0
/// - Dimensions: length, width, **thickness** > 0 — thickness is never
///   defaulted; omitting it is a caller error
/// - QuantityOnly and Unknown: no dimensional requirements
///
/// ## Example
/// ```rust
/// use fabcost_core::material_cost::MaterialDimensions;
/// use fabcost_core::shape::ShapeClass;
/// use fabcost_core::validation::validate_material_dimensions;
///
/// let dims = MaterialDimensions { length_m: 2.0, quantity: 3, ..Default::default() };
/// assert!(validate_material_dimensions(ShapeClass::LengthQuantity, &dims).is_ok());
///
/// let sheet_without_thickness = MaterialDimensions {
///     length_m: 1.0, width_m: 0.5, thickness_m: 0.0, quantity: 1,
/// };
/// assert!(validate_material_dimensions(ShapeClass::Dimensions, &sheet_without_thickness).is_err());
/// ```
pub fn validate_material_dimensions(
    shape: ShapeClass,
    dims: &MaterialDimensions,
) -> ValidationResult<()> {
    if dims.quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    match shape {
        ShapeClass::LengthQuantity => require_positive("length", dims.length_m),
        ShapeClass::Dimensions => {
            require_positive("length", dims.length_m)?;
            require_positive("width", dims.width_m)?;
            require_positive("thickness", dims.thickness_m)
        }
        ShapeClass::QuantityOnly | ShapeClass::Unknown => Ok(()),
    }
}

// =============================================================================
// Operation Line Validation
// =============================================================================

/// Validates measured operation inputs.
///
/// `quantity_measured` may be 0 (the time-per-unit derivation guards the
/// division); it just must not be negative. Time and rate must be
/// non-negative finite numbers.
pub fn validate_operation_inputs(
    quantity_measured: i64,
    time_measured: f64,
    rate_per_minute: f64,
) -> ValidationResult<()> {
    if quantity_measured < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity_measured".to_string(),
        });
    }
    require_non_negative("time_measured", time_measured)?;
    require_non_negative("rate_per_minute", rate_per_minute)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_quantity_requires_length_and_quantity() {
        let ok = MaterialDimensions {
            length_m: 2.0,
            quantity: 3,
            ..Default::default()
        };
        assert!(validate_material_dimensions(ShapeClass::LengthQuantity, &ok).is_ok());

        let no_length = MaterialDimensions {
            quantity: 3,
            ..Default::default()
        };
        assert!(validate_material_dimensions(ShapeClass::LengthQuantity, &no_length).is_err());

        let no_quantity = MaterialDimensions {
            length_m: 2.0,
            ..Default::default()
        };
        assert!(validate_material_dimensions(ShapeClass::LengthQuantity, &no_quantity).is_err());
    }

    #[test]
    fn test_sheet_thickness_is_never_defaulted() {
        let missing_thickness = MaterialDimensions {
            length_m: 1.0,
            width_m: 0.5,
            thickness_m: 0.0,
            quantity: 1,
        };
        let err = validate_material_dimensions(ShapeClass::Dimensions, &missing_thickness)
            .unwrap_err();
        assert_eq!(err.to_string(), "thickness must be positive");
    }

    #[test]
    fn test_fasteners_only_need_quantity() {
        let dims = MaterialDimensions {
            quantity: 50,
            ..Default::default()
        };
        assert!(validate_material_dimensions(ShapeClass::QuantityOnly, &dims).is_ok());
    }

    #[test]
    fn test_nan_dimension_rejected() {
        let dims = MaterialDimensions {
            length_m: f64::NAN,
            quantity: 1,
            ..Default::default()
        };
        assert!(matches!(
            validate_material_dimensions(ShapeClass::LengthQuantity, &dims),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_operation_inputs() {
        assert!(validate_operation_inputs(10, 25.0, 2.5).is_ok());
        // zero quantity is allowed: the derivation guards the division
        assert!(validate_operation_inputs(0, 25.0, 2.5).is_ok());
        assert!(validate_operation_inputs(-1, 25.0, 2.5).is_err());
        assert!(validate_operation_inputs(10, -1.0, 2.5).is_err());
        assert!(validate_operation_inputs(10, 25.0, f64::INFINITY).is_err());
    }
}
