// src/stabilizer/cascade.rs

//! # Cascaded Flight Controller
//!
//! Seven clamped PID loops composed into two cascades and a heading loop.
//!
//! ## Overview
//!
//! - **Horizontal**: the velocity loops turn forward and lateral speed error
//!   into desired pitch and roll. Forward motion needs a nose-down pitch, so
//!   the forward loop output is negated. Both angles are clamped to the
//!   configured maximum before they feed the attitude loops, which produce
//!   pitch and roll torque.
//! - **Heading**: a single loop fed with the shortest angular path from the
//!   current yaw to the heading setpoint, so crossing the ±180 degree seam
//!   never produces a 360 degree error.
//! - **Vertical**: the altitude loop produces a target climb rate, clamped
//!   to the configured maximum; the vertical-velocity loop turns the climb
//!   rate error into a thrust correction. The corrected hover thrust is
//!   scaled by a tilt compensation factor bounded at high tilt.

use crate::config::{AutopilotConfig, GainSchedule, VehicleConfig};
use crate::frames::VehicleState;
use crate::pid::{delta_angle, PidLoop};
use crate::{Actuation, FlightCommand, FlightStabilizer};
use nalgebra::Vector3;

/// Smallest cosine used by [`tilt_compensation`].
pub const MIN_TILT_COSINE: f32 = 0.01;

/// Thrust scale that keeps the vertical component constant at `tilt_degrees`.
///
/// The factor is `1 / max(0.01, cos(tilt))`, so it never exceeds 100 even at
/// or beyond a 90 degree tilt.
pub fn tilt_compensation(tilt_degrees: f32) -> f32 {
    1.0 / tilt_degrees.to_radians().cos().max(MIN_TILT_COSINE)
}

/// Intermediate setpoints of the most recent control step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CascadeTrace {
    /// Pitch requested by the forward velocity loop, degrees.
    pub desired_pitch: f32,
    /// Roll requested by the lateral velocity loop, degrees.
    pub desired_roll: f32,
    /// Shortest path from the current yaw to the heading setpoint, degrees.
    pub yaw_error: f32,
    /// Climb rate requested by the altitude loop.
    pub target_vertical_velocity: f32,
    /// Output of the vertical velocity loop.
    pub thrust_correction: f32,
    /// Tilt compensation factor applied to the thrust.
    pub tilt_compensation: f32,
}

/// Cascaded velocity, attitude, heading and altitude controller.
pub struct CascadedFlightController {
    velocity_x: PidLoop<f32>,
    velocity_z: PidLoop<f32>,
    vertical_velocity: PidLoop<f32>,
    pitch: PidLoop<f32>,
    roll: PidLoop<f32>,
    yaw: PidLoop<f32>,
    altitude: PidLoop<f32>,
    vehicle: VehicleConfig,
    trace: CascadeTrace,
}

impl CascadedFlightController {
    /// Creates a new controller using the provided gains and vehicle limits.
    pub fn new(gains: &GainSchedule, vehicle: &VehicleConfig) -> Self {
        Self {
            velocity_x: PidLoop::with_gains(gains.velocity_x),
            velocity_z: PidLoop::with_gains(gains.velocity_z),
            vertical_velocity: PidLoop::with_gains(gains.vertical_velocity),
            pitch: PidLoop::with_gains(gains.pitch),
            roll: PidLoop::with_gains(gains.roll),
            yaw: PidLoop::with_gains(gains.yaw),
            altitude: PidLoop::with_gains(gains.altitude),
            vehicle: *vehicle,
            trace: CascadeTrace::default(),
        }
    }

    /// Creates a controller from a complete configuration.
    pub fn with_config(config: &AutopilotConfig) -> Self {
        Self::new(&config.gains, &config.vehicle)
    }

    /// Thrust that balances gravity when level.
    pub fn hover_thrust(&self) -> f32 {
        self.vehicle.hover_thrust()
    }

    /// Intermediate setpoints of the most recent [`FlightStabilizer::control`] call.
    pub fn trace(&self) -> &CascadeTrace {
        &self.trace
    }

    /// Whether every loop is freshly reset.
    pub fn is_reset(&self) -> bool {
        self.loops().iter().all(|pid| !pid.is_initialized())
    }

    fn loops(&self) -> [&PidLoop<f32>; 7] {
        [
            &self.velocity_x,
            &self.velocity_z,
            &self.vertical_velocity,
            &self.pitch,
            &self.roll,
            &self.yaw,
            &self.altitude,
        ]
    }
}

impl FlightStabilizer for CascadedFlightController {
    fn control(&mut self, command: &FlightCommand, state: &VehicleState, dt: f32) -> Actuation {
        let body_velocity = state.body_velocity();
        let max_pitch = self.vehicle.max_pitch;
        let max_roll = self.vehicle.max_roll;

        // Horizontal cascade
        let desired_pitch = -self
            .velocity_x
            .calculate(command.target_velocity_x, body_velocity.z, dt);
        let desired_pitch = desired_pitch.clamp(-max_pitch, max_pitch);
        let desired_roll = self
            .velocity_z
            .calculate(command.target_velocity_z, body_velocity.x, dt)
            .clamp(-max_roll, max_roll);

        let pitch_torque = self.pitch.calculate(desired_pitch, state.attitude.pitch, dt);
        let roll_torque = self.roll.calculate(desired_roll, state.attitude.roll, dt);

        // Heading
        let yaw_error = delta_angle(state.attitude.yaw, command.heading.degrees());
        let yaw_torque = self.yaw.calculate(yaw_error, 0.0, dt);

        // Vertical cascade
        let max_climb = self.vehicle.max_vertical_velocity;
        let target_vertical_velocity = self
            .altitude
            .calculate(command.target_altitude, state.position.y, dt)
            .clamp(-max_climb, max_climb);
        let thrust_correction =
            self.vertical_velocity
                .calculate(target_vertical_velocity, body_velocity.y, dt);
        let compensation = tilt_compensation(state.tilt_degrees());
        let thrust = (self.hover_thrust() + thrust_correction) * compensation;

        self.trace = CascadeTrace {
            desired_pitch,
            desired_roll,
            yaw_error,
            target_vertical_velocity,
            thrust_correction,
            tilt_compensation: compensation,
        };
        log::trace!("cascade {:?}", self.trace);

        Actuation {
            torque: Vector3::new(pitch_torque, yaw_torque, roll_torque),
            thrust,
        }
    }

    fn reset(&mut self) {
        self.velocity_x.reset();
        self.velocity_z.reset();
        self.vertical_velocity.reset();
        self.altitude.reset();
        self.reset_attitude();
    }

    fn reset_attitude(&mut self) {
        self.pitch.reset();
        self.roll.reset();
        self.yaw.reset();
    }
}
