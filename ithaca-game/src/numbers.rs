//! Numeric conversion helpers centralizing the casts used by the shuffler and generator.

use num_traits::cast::cast;

/// Scale a unit-interval sample onto `0..bound`, i.e. `floor(value * bound)`.
///
/// Non-finite or out-of-range samples are clamped so the result is always a
/// valid index when `bound > 0`. A zero bound yields 0.
#[must_use]
pub fn unit_to_index(value: f64, bound: usize) -> usize {
    if bound == 0 {
        return 0;
    }
    let sample = if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let scale = cast::<usize, f64>(bound).unwrap_or(0.0);
    let index = cast::<f64, usize>((sample * scale).floor()).unwrap_or(0);
    index.min(bound - 1)
}

/// Convert a unit-interval sample into an integer in `0..modulus` by flooring.
#[must_use]
pub fn unit_to_u64(value: f64, modulus: u64) -> u64 {
    if !value.is_finite() || modulus == 0 {
        return 0;
    }
    let scale = cast::<u64, f64>(modulus).unwrap_or(0.0);
    let scaled = (value.clamp(0.0, 1.0) * scale).floor();
    cast::<f64, u64>(scaled).unwrap_or(0).min(modulus - 1)
}

/// Ratio of two integers as a float, allowing precision loss in a single location.
#[must_use]
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let num = cast::<u64, f64>(numerator).unwrap_or(0.0);
    let den = cast::<u64, f64>(denominator).unwrap_or(1.0);
    num / den
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_to_index_floors_and_clamps() {
        assert_eq!(unit_to_index(0.0, 5), 0);
        assert_eq!(unit_to_index(0.99, 5), 4);
        assert_eq!(unit_to_index(0.5, 2), 1);
        assert_eq!(unit_to_index(1.0, 3), 2);
        assert_eq!(unit_to_index(f64::NAN, 3), 0);
        assert_eq!(unit_to_index(0.7, 0), 0);
    }

    #[test]
    fn unit_to_u64_stays_below_modulus() {
        assert_eq!(unit_to_u64(0.5, 10), 5);
        assert_eq!(unit_to_u64(1.0, 10), 9);
        assert_eq!(unit_to_u64(f64::INFINITY, 10), 0);
    }

    #[test]
    fn ratio_handles_zero_denominator() {
        assert!((ratio(1, 4) - 0.25).abs() < f64::EPSILON);
        assert!(ratio(3, 0).abs() < f64::EPSILON);
    }
}
