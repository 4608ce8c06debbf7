// src/command.rs

//! # Policy Command Shaping
//!
//! Turns the raw continuous action of a learned policy into a
//! [`FlightCommand`]. Each action component lies in [-1, 1] and scales the
//! matching vehicle limit; the altitude component spans the envelope height.
//! The shaped setpoints are low-pass filtered, optionally perturbed with
//! exploration noise, and the yaw rate is integrated into a free heading.

use crate::config::{AutopilotConfig, Envelope, PolicyConfig, VehicleConfig};
use crate::pid::{lerp, normalize_angle};
use crate::{FlightCommand, HeadingTarget};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of components in a policy action.
pub const ACTION_SIZE: usize = 4;

/// Builds and holds the policy-driven setpoints between ticks.
pub struct CommandShaper {
    vehicle: VehicleConfig,
    envelope: Envelope,
    policy: PolicyConfig,
    setpoints: FlightCommand,
    free_yaw: f32,
    rng: StdRng,
}

impl CommandShaper {
    /// Creates a shaper seeded from `policy.seed`, or from entropy when unset.
    pub fn new(config: &AutopilotConfig) -> Self {
        let rng = match config.policy.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Creates a shaper drawing exploration noise from `rng`.
    pub fn with_rng(config: &AutopilotConfig, rng: StdRng) -> Self {
        Self {
            vehicle: config.vehicle,
            envelope: config.envelope,
            policy: config.policy,
            setpoints: FlightCommand::hover(config.envelope.min.y, HeadingTarget::Free(0.0)),
            free_yaw: 0.0,
            rng,
        }
    }

    /// Shapes one policy action into a command steering toward the free heading.
    ///
    /// Non-finite components are treated as zero and every component is
    /// clamped to [-1, 1]. Exploration noise is added only when `explore`
    /// is set.
    pub fn apply(&mut self, action: [f32; ACTION_SIZE], dt: f32, explore: bool) -> FlightCommand {
        let action = action.map(|a| if a.is_finite() { a.clamp(-1.0, 1.0) } else { 0.0 });

        let raw_velocity_x = action[0] * self.vehicle.max_velocity_x;
        let raw_velocity_z = action[1] * self.vehicle.max_velocity_z;
        let raw_yaw_rate = action[2] * self.vehicle.max_yaw_rate;
        let raw_altitude = lerp(self.envelope.min.y, self.envelope.max.y, (action[3] + 1.0) / 2.0);

        let weight = 1.0 - self.policy.smoothing;
        let s = &mut self.setpoints;
        s.target_velocity_x = lerp(s.target_velocity_x, raw_velocity_x, weight);
        s.target_velocity_z = lerp(s.target_velocity_z, raw_velocity_z, weight);
        s.target_yaw_rate = lerp(s.target_yaw_rate, raw_yaw_rate, weight);
        s.target_altitude = lerp(s.target_altitude, raw_altitude, weight);

        if explore && self.policy.noise > 0.0 {
            let noise = self.policy.noise;
            s.target_velocity_x += self.rng.gen_range(-1.0..=1.0) * noise * self.vehicle.max_velocity_x;
            s.target_velocity_z += self.rng.gen_range(-1.0..=1.0) * noise * self.vehicle.max_velocity_z;
        }

        self.free_yaw = normalize_angle(self.free_yaw + s.target_yaw_rate * dt);
        s.heading = HeadingTarget::Free(self.free_yaw);
        self.setpoints
    }

    /// Stops all horizontal motion and rotation and re-anchors the free
    /// heading at `current_yaw`. The altitude setpoint is kept.
    pub fn hover(&mut self, current_yaw: f32) -> FlightCommand {
        self.zero_motion();
        self.free_yaw = normalize_angle(current_yaw);
        self.setpoints.heading = HeadingTarget::Free(self.free_yaw);
        self.setpoints
    }

    /// Zeroes the velocity and yaw rate setpoints.
    pub fn zero_motion(&mut self) {
        self.setpoints.target_velocity_x = 0.0;
        self.setpoints.target_velocity_z = 0.0;
        self.setpoints.target_yaw_rate = 0.0;
    }

    /// Restarts from a hover at `altitude` facing `yaw`.
    pub fn reset(&mut self, altitude: f32, yaw: f32) {
        self.setpoints = FlightCommand::hover(altitude, HeadingTarget::Free(0.0));
        let _ = self.hover(yaw);
    }

    /// Overrides the altitude setpoint.
    pub fn set_altitude(&mut self, altitude: f32) {
        self.setpoints.target_altitude = altitude;
    }

    /// The most recent setpoints.
    pub fn setpoints(&self) -> &FlightCommand {
        &self.setpoints
    }

    /// The heading integrated from the yaw rate command.
    pub fn free_yaw(&self) -> f32 {
        self.free_yaw
    }

    /// Setpoints scaled back into the policy's action range.
    ///
    /// Velocities and yaw rate are divided by their limits; the altitude is
    /// its fraction of the envelope height, in [0, 1].
    pub fn normalized_setpoints(&self) -> [f32; ACTION_SIZE] {
        let s = &self.setpoints;
        [
            s.target_velocity_x / self.vehicle.max_velocity_x,
            s.target_velocity_z / self.vehicle.max_velocity_z,
            s.target_yaw_rate / self.vehicle.max_yaw_rate,
            (s.target_altitude - self.envelope.min.y) / self.envelope.height(),
        ]
    }
}
