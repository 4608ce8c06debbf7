// src/test_utils.rs

//! This module contains utilities for testing.

use crate::frames::VehicleState;
use nalgebra::Vector3;

/// A constant defining the tolerance within which floating-point values
/// are considered close enough to be equal.
pub const TEST_TOLERANCE: f32 = 1e-5;

/// Checks if two floating point numbers are close enough to be considered
/// equal.
///
/// # Arguments
/// * `target` - The target value.
/// * `value` - The value to compare against the target.
///
/// # Returns
/// `true` if the absolute difference between `target` and `value` is less than
/// `TEST_TOLERANCE`, otherwise `false`.
pub fn value_close(target: f32, value: f32) -> bool {
    (target - value).abs() < TEST_TOLERANCE
}

/// Checks if two floating point numbers are not close enough to be
/// considered equal.
pub fn value_not_close(target: f32, value: f32) -> bool {
    TEST_TOLERANCE <= (target - value).abs()
}

/// Checks if each of the components in a vector is close enough to
/// be considered equal.
///
/// # Arguments
/// * `target` - The target vector.
/// * `value` - The vector to compare against the target.
///
/// # Returns
/// `true` if each component of `target` and `value` is close as per `value_close`,
/// otherwise `false`.
pub fn vector_close(target: Vector3<f32>, value: Vector3<f32>) -> bool {
    value_close(target.x, value.x) && value_close(target.y, value.y) && value_close(target.z, value.z)
}

/// A level vehicle hovering motionless at `altitude` above the origin,
/// facing `yaw` degrees.
pub fn hovering_at(altitude: f32, yaw: f32) -> VehicleState {
    VehicleState::at_rest(
        Vector3::new(0.0, altitude, 0.0),
        crate::frames::Attitude::level(yaw),
    )
}
