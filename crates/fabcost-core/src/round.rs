//! # Rounding Helpers
//!
//! Fixed-precision rounding applied at result boundaries.
//!
//! ## Where Precision Is Fixed
//! - money (costs, prices): 2 decimal places
//! - weights (kg) and areas (m²): 3 decimal places
//!
//! Intermediate math is never rounded; only the values that land on a
//! `PricingResult` (or in the database) are.

/// Rounds to 2 decimal places (monetary values).
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds to 3 decimal places (weights in kg, areas in m²).
#[inline]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005), 1.0); // 1.005 is stored below 1.005
        assert_eq!(round2(180.0), 180.0);
        assert_eq!(round2(2.675_000_1), 2.68);
        assert_eq!(round2(-5.555), -5.56);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(31.4000004), 31.4);
        assert_eq!(round3(0.31415), 0.314);
    }
}
