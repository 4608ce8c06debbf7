// src/frames.rs

//! # Vehicle Frames and State
//!
//! Kinematic state of the vehicle as consumed by the controller and the
//! reward engine, and the explicit conversions between the simulator frame
//! and the external (ROS) convention.
//!
//! The simulator world is y-up. Body axes are x to the right, y up and z
//! forward. Attitude angles are in degrees: pitch is positive nose-up, roll
//! is positive right-wing-down and yaw is positive turning right.

use nalgebra::{Quaternion, Rotation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Euler attitude of the vehicle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Attitude {
    /// Rotation about the lateral axis, positive nose-up.
    pub pitch: f32,
    /// Rotation about the longitudinal axis, positive right-wing-down.
    pub roll: f32,
    /// Heading, positive turning right.
    pub yaw: f32,
}

impl Attitude {
    /// Creates an attitude from pitch, roll and yaw in degrees.
    pub const fn new(pitch: f32, roll: f32, yaw: f32) -> Self {
        Self { pitch, roll, yaw }
    }

    /// A level attitude with the given heading.
    pub const fn level(yaw: f32) -> Self {
        Self::new(0.0, 0.0, yaw)
    }

    /// Body-to-world rotation. Roll is applied first, then pitch, then yaw.
    pub fn rotation(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw.to_radians())
            * Rotation3::from_axis_angle(&Vector3::x_axis(), -self.pitch.to_radians())
            * Rotation3::from_axis_angle(&Vector3::z_axis(), -self.roll.to_radians())
    }

    /// Body-to-world rotation as a unit quaternion.
    pub fn orientation(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_rotation_matrix(&self.rotation())
    }

    /// Recovers the attitude of an orientation.
    pub fn from_orientation(orientation: &UnitQuaternion<f32>) -> Self {
        let m = orientation.to_rotation_matrix().into_inner();
        let pitch = m[(1, 2)].clamp(-1.0, 1.0).asin();
        let roll = -m[(1, 0)].atan2(m[(1, 1)]);
        let yaw = m[(0, 2)].atan2(m[(2, 2)]);
        Self::new(pitch.to_degrees(), roll.to_degrees(), yaw.to_degrees())
    }
}

/// Kinematic state of the vehicle at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleState {
    /// World position in metres.
    pub position: Vector3<f32>,
    /// World linear velocity in metres per second.
    pub velocity: Vector3<f32>,
    /// Euler attitude.
    pub attitude: Attitude,
    /// World angular velocity in degrees per second.
    pub angular_velocity: Vector3<f32>,
}

impl VehicleState {
    /// A vehicle at rest at `position` with the given attitude.
    pub fn at_rest(position: Vector3<f32>, attitude: Attitude) -> Self {
        Self {
            position,
            attitude,
            ..Self::default()
        }
    }

    /// Expresses a world vector in the body frame.
    pub fn to_body(&self, world: &Vector3<f32>) -> Vector3<f32> {
        self.attitude.rotation().inverse() * world
    }

    /// Linear velocity in the body frame (x right, y up, z forward).
    pub fn body_velocity(&self) -> Vector3<f32> {
        self.to_body(&self.velocity)
    }

    /// Angular velocity in the body frame, degrees per second.
    pub fn body_angular_velocity(&self) -> Vector3<f32> {
        self.to_body(&self.angular_velocity)
    }

    /// Unit forward axis in world coordinates.
    pub fn forward(&self) -> Vector3<f32> {
        self.attitude.rotation() * Vector3::z()
    }

    /// Unit up axis in world coordinates.
    pub fn up(&self) -> Vector3<f32> {
        self.attitude.rotation() * Vector3::y()
    }

    /// Angle between the vehicle up axis and world up, in degrees.
    pub fn tilt_degrees(&self) -> f32 {
        self.up().y.clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// Rate of change of heading in degrees per second.
    pub fn yaw_rate(&self) -> f32 {
        self.angular_velocity.y
    }

    /// Linear speed in metres per second.
    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }

    /// Angular speed in degrees per second.
    pub fn angular_speed(&self) -> f32 {
        self.angular_velocity.norm()
    }

    /// Straight-line distance to a point.
    pub fn distance_to(&self, point: &Vector3<f32>) -> f32 {
        (point - self.position).norm()
    }

    /// Unit world direction toward a point, or zero when already there.
    pub fn direction_to(&self, point: &Vector3<f32>) -> Vector3<f32> {
        (point - self.position)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }
}

/// Converts a ROS (x forward, y left, z up) position into the simulator frame.
pub fn ros_to_sim_position(ros: &Vector3<f32>) -> Vector3<f32> {
    Vector3::new(-ros.y, ros.z, ros.x)
}

/// Converts a simulator position into the ROS (x forward, y left, z up) frame.
pub fn sim_to_ros_position(sim: &Vector3<f32>) -> Vector3<f32> {
    Vector3::new(sim.z, -sim.x, sim.y)
}

/// Remaps the components of a raw ROS orientation into the simulator frame.
///
/// The quaternion is not normalized; a zero quaternion stays zero so the
/// caller can detect and replace it.
pub fn ros_to_sim_orientation(ros: &Quaternion<f32>) -> Quaternion<f32> {
    Quaternion::new(ros.w, -ros.j, ros.k, -ros.i)
}

/// Inverse of [`ros_to_sim_orientation`].
pub fn sim_to_ros_orientation(sim: &Quaternion<f32>) -> Quaternion<f32> {
    Quaternion::new(sim.w, -sim.k, -sim.i, sim.j)
}

/// Heading in degrees of a simulator-frame orientation.
pub fn heading_degrees(orientation: &UnitQuaternion<f32>) -> f32 {
    Attitude::from_orientation(orientation).yaw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_level_attitude_axes() {
        let state = VehicleState::at_rest(Vector3::zeros(), Attitude::level(0.0));
        assert_relative_eq!(state.forward(), Vector3::z(), epsilon = 1e-6);
        assert_relative_eq!(state.up(), Vector3::y(), epsilon = 1e-6);
        assert!(value_close(0.0, state.tilt_degrees()));
    }

    #[test]
    fn test_positive_yaw_turns_right() {
        let state = VehicleState::at_rest(Vector3::zeros(), Attitude::level(90.0));
        assert_relative_eq!(state.forward(), Vector3::x(), epsilon = 1e-6);
    }

    #[test]
    fn test_nose_down_pitch_tilts_thrust_forward() {
        let state = VehicleState::at_rest(Vector3::zeros(), Attitude::new(-10.0, 0.0, 0.0));
        assert!(state.up().z > 0.0, "Nose-down should tilt thrust forward.");
        assert!(state.forward().y < 0.0, "Nose-down should point forward below the horizon.");
        assert!(value_close(10.0, state.tilt_degrees()));
    }

    #[test]
    fn test_right_roll_tilts_thrust_right() {
        let state = VehicleState::at_rest(Vector3::zeros(), Attitude::new(0.0, 15.0, 0.0));
        assert!(state.up().x > 0.0, "Right roll should tilt thrust to the right.");
        assert!(value_close(15.0, state.tilt_degrees()));
    }

    #[test]
    fn test_body_velocity_follows_heading() {
        let state = VehicleState {
            velocity: Vector3::new(2.0, 0.5, 0.0),
            attitude: Attitude::level(90.0),
            ..VehicleState::default()
        };
        // Facing +x, so world +x motion is forward.
        assert_relative_eq!(
            state.body_velocity(),
            Vector3::new(0.0, 0.5, 2.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_attitude_recovered_from_orientation() {
        let attitude = Attitude::new(12.0, -20.0, 135.0);
        let recovered = Attitude::from_orientation(&attitude.orientation());
        assert!((12.0 - recovered.pitch).abs() < 1e-3);
        assert!((-20.0 - recovered.roll).abs() < 1e-3);
        assert!((135.0 - recovered.yaw).abs() < 1e-3);
    }

    #[test]
    fn test_ros_position_conversions_are_inverse() {
        let ros = Vector3::new(4.0, -1.5, 2.0);
        let sim = ros_to_sim_position(&ros);
        assert_eq!(Vector3::new(1.5, 2.0, 4.0), sim);
        assert_eq!(ros, sim_to_ros_position(&sim));
    }

    #[test]
    fn test_ros_orientation_conversions_are_inverse() {
        let ros = Quaternion::new(0.7, 0.1, -0.2, 0.3);
        let back = sim_to_ros_orientation(&ros_to_sim_orientation(&ros));
        assert_eq!(ros, back);
    }

    #[test]
    fn test_heading_of_yawed_orientation() {
        let q = Attitude::level(-60.0).orientation();
        assert!((heading_degrees(&q) + 60.0).abs() < 1e-3);
    }
}
