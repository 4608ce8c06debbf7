// src/stabilizer/flight_stabilizer.rs

//! A module specifying the shared interface for PID-based flight stabilizers.
//! It includes the numeric bound used by the generic PID primitive, the
//! command and actuation types that cross the controller boundary, and a
//! trait defining the stabilization functionality.

use crate::frames::VehicleState;
use nalgebra::Vector3;
use piddiy::Number as PiddiyNumber;
use serde::{Deserialize, Serialize};

/// Custom trait to encapsulate base number requirements.
pub trait Number: PiddiyNumber {
    /// Clamps generic PartialOrd values within a given range.
    fn clamp(self, min: Self, max: Self) -> Self {
        if self < min {
            min
        } else if max < self {
            max
        } else {
            self
        }
    }
}

impl<T: PiddiyNumber> Number for T {}

/// Absolute heading the yaw loop steers toward, tagged with its source.
///
/// The arbiter picks exactly one source per tick: a scripted rotation target
/// wins over a waypoint heading, which wins over the heading integrated from
/// the policy's yaw-rate command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HeadingTarget {
    /// Absolute yaw held by a running scripted action.
    Scripted(f32),
    /// Yaw of the waypoint currently being navigated to.
    Waypoint(f32),
    /// Yaw integrated freely from the commanded yaw rate.
    Free(f32),
}

impl HeadingTarget {
    /// The setpoint in degrees, regardless of source.
    pub fn degrees(&self) -> f32 {
        match *self {
            HeadingTarget::Scripted(yaw) | HeadingTarget::Waypoint(yaw) | HeadingTarget::Free(yaw) => {
                yaw
            }
        }
    }
}

impl Default for HeadingTarget {
    fn default() -> Self {
        HeadingTarget::Free(0.0)
    }
}

/// High-level motion command consumed by a flight stabilizer.
///
/// Velocities are body-frame: `target_velocity_x` is forward speed and
/// `target_velocity_z` is rightward speed, both in metres per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlightCommand {
    /// Desired forward speed.
    pub target_velocity_x: f32,
    /// Desired rightward speed.
    pub target_velocity_z: f32,
    /// Desired yaw rate in degrees per second.
    pub target_yaw_rate: f32,
    /// Desired altitude in metres.
    pub target_altitude: f32,
    /// Heading setpoint for the yaw loop.
    pub heading: HeadingTarget,
}

impl FlightCommand {
    /// Holds position at `altitude` while steering toward `heading`.
    pub fn hover(altitude: f32, heading: HeadingTarget) -> Self {
        Self {
            target_altitude: altitude,
            heading,
            ..Self::default()
        }
    }

    /// Whether the command asks for any horizontal motion.
    pub fn is_moving(&self) -> bool {
        self.target_velocity_x != 0.0 || self.target_velocity_z != 0.0
    }
}

/// Body-frame torque and scalar thrust produced by a stabilizer.
///
/// Torque components are `x` about the lateral axis (positive pitches the
/// nose up), `y` about the vertical axis (positive turns right) and `z`
/// about the longitudinal axis (positive rolls right-wing-down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Actuation {
    /// Attitude torque.
    pub torque: Vector3<f32>,
    /// Thrust along the vehicle up axis in newtons.
    pub thrust: f32,
}

impl Actuation {
    /// Thrust expressed as a world-frame force for the given attitude.
    pub fn world_force(&self, state: &VehicleState) -> Vector3<f32> {
        state.up() * self.thrust
    }
}

/// A trait for PID-based flight stabilizers that turn a [`FlightCommand`]
/// and the current vehicle state into torque and thrust.
pub trait FlightStabilizer {
    /// Computes the actuation for one tick.
    ///
    /// - `command`: The desired motion for this tick.
    /// - `state`: Current kinematic state of the vehicle.
    /// - `dt`: Time delta since the last update. A zero delta yields zero
    ///   loop outputs.
    fn control(&mut self, command: &FlightCommand, state: &VehicleState, dt: f32) -> Actuation;

    /// Discards the accumulated state of every loop.
    fn reset(&mut self);

    /// Discards the accumulated state of the attitude and yaw loops only.
    fn reset_attitude(&mut self);
}
