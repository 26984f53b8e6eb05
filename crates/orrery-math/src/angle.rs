//! Angle normalization.

use std::f64::consts::{PI, TAU};

/// Wraps an angle into `[0, 2π)`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Shortest unsigned distance between two angles on the circle, in `[0, π]`.
pub fn angle_distance(a: f64, b: f64) -> f64 {
    let d = wrap_angle(a - b);
    if d > PI { TAU - d } else { d }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_positive() {
        assert!((wrap_angle(20.0) - (20.0 - 3.0 * TAU)).abs() < 1e-12);
    }

    #[test]
    fn test_wrap_negative() {
        let w = wrap_angle(-0.5);
        assert!((w - (TAU - 0.5)).abs() < 1e-12);
        assert!((0.0..TAU).contains(&w));
    }

    #[test]
    fn test_wrap_tiny_negative_stays_in_range() {
        let w = wrap_angle(-1e-18);
        assert!((0.0..TAU).contains(&w), "got {w}");
    }

    #[test]
    fn test_angle_distance_across_zero() {
        assert!((angle_distance(0.1, TAU - 0.1) - 0.2).abs() < 1e-12);
        assert!((angle_distance(TAU - 0.1, 0.1) - 0.2).abs() < 1e-12);
        assert!(angle_distance(1.0, 1.0) < 1e-12);
    }
}
