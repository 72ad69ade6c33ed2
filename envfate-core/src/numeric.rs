//! Guarded arithmetic shared by the partitioning layer and the process
//! calculators.
//!
//! A compartment that is absent from a scenario shows up everywhere as a zero
//! volume, zero capacity, or zero flow. Every ratio whose denominator can
//! vanish that way goes through [`safe_div`], which defines $0/0 := 0$ so a
//! physically-absent flow path contributes nothing instead of poisoning the
//! derivative with NaN.

/// Division with 0/0 defined as 0.
///
/// A zero denominator always yields 0, including when the numerator is
/// non-zero: a flux into a non-existent capacity is no flux.
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_over_zero_is_zero() {
        assert_eq!(safe_div(0.0, 0.0), 0.0);
    }

    #[test]
    fn nonzero_over_zero_is_zero() {
        assert_eq!(safe_div(3.5, 0.0), 0.0, "no capacity means no flux");
    }

    #[test]
    fn ordinary_division_unaffected() {
        assert_eq!(safe_div(6.0, 3.0), 2.0);
        assert_eq!(safe_div(-1.0, 4.0), -0.25);
    }
}
