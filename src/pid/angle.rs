// src/pid/angle.rs

//! # Angle Arithmetic
//!
//! Wrap-safe angle helpers in degrees. Heading errors fed to a PID loop must
//! be the shortest angular path, never a raw subtraction, or the loop sees a
//! 360 degree jump when the heading crosses the ±180 degree seam.

use num_traits::Float;

fn half_turn<T: Float + From<f32>>() -> T {
    <T as From<f32>>::from(180.0)
}

/// Shortest signed rotation in degrees from `current` to `target`.
///
/// The result lies in (-180, 180]. `delta_angle(170.0, -170.0)` is `20.0`.
pub fn delta_angle<T: Float + From<f32>>(current: T, target: T) -> T {
    let half = half_turn::<T>();
    let full = half + half;
    let delta = (target - current) % full;
    if delta > half {
        delta - full
    } else if delta <= -half {
        delta + full
    } else {
        delta
    }
}

/// Wraps an angle in degrees into (-180, 180].
pub fn normalize_angle<T: Float + From<f32>>(angle: T) -> T {
    delta_angle(T::zero(), angle)
}

/// Maps a value to its position between `a` and `b`, clamped to [0, 1].
///
/// Returns zero when the interval is degenerate.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Linear interpolation with `t` clamped to [0, 1].
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_delta_angle_across_seam() {
        assert!(value_close(20.0, delta_angle(170.0_f32, -170.0)));
        assert!(value_close(-20.0, delta_angle(-170.0_f32, 170.0)));
    }

    #[test]
    fn test_delta_angle_range() {
        assert!(value_close(180.0, delta_angle(0.0_f32, 180.0)));
        assert!(value_close(180.0, delta_angle(0.0_f32, -180.0)));
        assert!(value_close(-90.0, delta_angle(45.0_f32, 315.0)));
        assert!(value_close(10.0, delta_angle(0.0_f32, 730.0)));
        assert!(value_close(0.0, delta_angle(-725.0_f32, 715.0)));
    }

    #[test]
    fn test_delta_angle_f64() {
        assert!((delta_angle(179.0_f64, -179.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_angle() {
        assert!(value_close(-170.0, normalize_angle(190.0_f32)));
        assert!(value_close(90.0, normalize_angle(-270.0_f32)));
        assert!(value_close(180.0, normalize_angle(-180.0_f32)));
    }

    #[test]
    fn test_inverse_lerp() {
        // Closeness to an obstacle: 1.5 m safety radius, 0 m is contact.
        assert!(value_close(0.0, inverse_lerp(1.5, 0.0, 1.5)));
        assert!(value_close(0.5, inverse_lerp(1.5, 0.0, 0.75)));
        assert!(value_close(1.0, inverse_lerp(1.5, 0.0, -1.0)));
        assert!(value_close(0.0, inverse_lerp(2.0, 2.0, 1.0)));
    }

    #[test]
    fn test_lerp_clamps() {
        assert!(value_close(3.0, lerp(0.0, 6.0, 0.5)));
        assert!(value_close(6.0, lerp(0.0, 6.0, 4.0)));
        assert!(value_close(0.0, lerp(0.0, 6.0, -4.0)));
    }
}
