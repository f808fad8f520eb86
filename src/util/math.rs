//! Numeric helpers for pixel rounding.

use crate::geometry::Rounding;

/// Rounds to the nearest integer with an explicit tie rule.
pub(crate) fn round_to_i64(value: f64, rounding: Rounding) -> i64 {
    let rounded = match rounding {
        Rounding::TiesToEven => value.round_ties_even(),
        Rounding::TiesAwayFromZero => value.round(),
    };
    rounded as i64
}

/// Ceiling of a non-negative length, saturating at zero for negatives/NaN.
pub(crate) fn ceil_len(value: f64) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    value.ceil() as usize
}
