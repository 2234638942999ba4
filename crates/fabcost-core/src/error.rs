//! # Error Types
//!
//! Domain-specific error types for fabcost-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fabcost-core errors (this file)                                       │
//! │  ├── ValidationError  - Input validation failures (reject up front)    │
//! │  └── LineError        - One stored line failed during a pricing run;   │
//! │                         collected on PricingResult, never fatal        │
//! │                                                                         │
//! │  fabcost-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures, incl. NotFound    │
//! │                                                                         │
//! │  Flow: ValidationError → DbError (on write)                            │
//! │        LineError       → PricingResult.line_errors (on read/compute)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (material name, operation name)
//! 3. Errors are enum variants, never String
//! 4. A single bad line must not abort a whole pricing computation:
//!    per-line failures become `LineError` values, the run completes

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before a line is persisted; the calculators
/// themselves assume already-validated positive inputs.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    ///
    /// ## When This Occurs
    /// - Zero or negative length/width/quantity on a material line
    /// - Zero or negative thickness on a sheet line (thickness is never
    ///   defaulted; a missing thickness is a caller error)
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value is NaN or infinite.
    #[error("{field} is not a finite number")]
    NotFinite { field: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Line Error
// =============================================================================

/// A failure while summarizing one material or operation line.
///
/// ## Recovery Semantics
/// The line's contribution is treated as zero and the computation
/// continues; every `LineError` is returned on
/// [`crate::types::PricingResult::line_errors`] so callers can surface the
/// skipped lines instead of silently losing them.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineError {
    /// A material line had invalid or missing numeric data.
    #[error("material line '{material_name}' skipped: {reason}")]
    MaterialLine {
        material_id: String,
        material_name: String,
        reason: String,
    },

    /// An operation line had invalid numeric data.
    #[error("operation '{operation_name}' skipped: {reason}")]
    OperationLine {
        operation_name: String,
        reason: String,
    },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "thickness".to_string(),
        };
        assert_eq!(err.to_string(), "thickness must be positive");

        let err = ValidationError::NotFinite {
            field: "cost".to_string(),
        };
        assert_eq!(err.to_string(), "cost is not a finite number");
    }

    #[test]
    fn test_line_error_messages() {
        let err = LineError::MaterialLine {
            material_id: "m-1".to_string(),
            material_name: "Труба 25х25".to_string(),
            reason: "quantity must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "material line 'Труба 25х25' skipped: quantity must be positive"
        );
    }
}
