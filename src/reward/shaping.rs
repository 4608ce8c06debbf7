// src/reward/shaping.rs

//! # Dense Reward Shaping
//!
//! Per-tick shaping terms scored from the same state the controller
//! consumes. Terms depend on whether the current target is the final
//! destination, where the vehicle should brake and align, or an
//! intermediate waypoint it should fly through.

use super::ObstacleProbe;
use crate::config::{AutopilotConfig, RewardConfig, ZoneConfig};
use crate::frames::VehicleState;
use crate::pid::inverse_lerp;
use nalgebra::Vector3;

/// Every shaping term of one tick. Penalties are negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapedReward {
    /// Progress toward the target.
    pub potential: f32,
    /// Heading alignment inside the terminal zone.
    pub alignment: f32,
    /// Braking profile inside the terminal zone.
    pub speed_control: f32,
    /// Velocity pointing at an intermediate waypoint.
    pub approach_direction: f32,
    /// Flat penalty while flying to an intermediate waypoint.
    pub waypoint_step: f32,
    /// Hovering in place instead of progressing.
    pub stagnation: f32,
    /// Side-stepping, or stalling in front of, an obstacle ahead.
    pub evasion: f32,
    /// Flying close to an obstacle.
    pub proximity: f32,
    /// Constant time cost.
    pub time: f32,
    /// Spinning too fast.
    pub angular_velocity: f32,
    /// Jerky setpoint changes.
    pub action_change: f32,
    /// Squared speed.
    pub energy: f32,
}

impl ShapedReward {
    /// Sum of every term.
    pub fn total(&self) -> f32 {
        self.potential
            + self.alignment
            + self.speed_control
            + self.approach_direction
            + self.waypoint_step
            + self.stagnation
            + self.evasion
            + self.proximity
            + self.time
            + self.angular_velocity
            + self.action_change
            + self.energy
    }
}

/// Inputs to one shaping evaluation besides the vehicle state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapingInput {
    /// Position being flown to.
    pub target: Vector3<f32>,
    /// Distance to the target at the previous tick.
    pub previous_distance: f32,
    /// Whether the target is where the vehicle should stop.
    pub final_destination: bool,
    /// Local target range sizing the zones.
    pub local_range: f32,
    /// `|Δ velocity x setpoint| + |Δ velocity z setpoint|` since last tick.
    pub setpoint_change: f32,
}

/// Scores shaping terms from a fixed configuration.
#[derive(Debug, Clone, Copy)]
pub struct RewardShaper {
    rewards: RewardConfig,
    zones: ZoneConfig,
    max_velocity_x: f32,
}

impl RewardShaper {
    /// Creates a shaper from the reward, zone and vehicle sections.
    pub fn new(config: &AutopilotConfig) -> Self {
        Self {
            rewards: config.rewards,
            zones: config.zones,
            max_velocity_x: config.vehicle.max_velocity_x,
        }
    }

    /// Scores one tick.
    pub fn shape(&self, state: &VehicleState, input: &ShapingInput, probe: &dyn ObstacleProbe) -> ShapedReward {
        let r = &self.rewards;
        let distance = state.distance_to(&input.target);
        let direction = state.direction_to(&input.target);
        let speed = state.speed();

        let mut shaped = ShapedReward {
            potential: (input.previous_distance - distance) * r.potential_multiplier,
            time: r.time_penalty,
            action_change: input.setpoint_change * r.action_change_penalty,
            energy: speed * speed * r.energy_penalty,
            ..ShapedReward::default()
        };

        if input.final_destination {
            let terminal = self.zones.terminal_distance(input.local_range);
            if distance <= terminal {
                let alignment = state.forward().dot(&direction);
                if alignment > 0.0 {
                    shaped.alignment = alignment * alignment * r.terminal_alignment_bonus;
                }
                let ideal_speed = if input.local_range > 0.0 {
                    (distance * self.max_velocity_x / input.local_range).clamp(0.0, self.max_velocity_x)
                } else {
                    0.0
                };
                shaped.speed_control = (-(speed - ideal_speed).abs()).exp() * r.terminal_speed_bonus;
            } else if speed < r.stagnation_speed {
                shaped.stagnation = r.stagnation_penalty;
            }
        } else {
            let approach = self.zones.approach_distance(input.local_range);
            if distance <= approach && speed > r.approach_min_speed {
                let heading_match = (state.velocity / speed).dot(&direction);
                if heading_match > 0.0 {
                    shaped.approach_direction = heading_match * r.approach_direction_bonus;
                }
            }
            if speed < r.stagnation_speed {
                shaped.stagnation = r.stagnation_penalty;
            }
            shaped.waypoint_step = r.waypoint_step_penalty;
        }

        let forward = state.forward();
        let target_ahead = state.to_body(&direction).z > r.target_forward_threshold;
        if target_ahead
            && probe.obstacle_ahead(&state.position, &forward, r.obstacle_probe_radius, r.obstacle_probe_range)
        {
            shaped.evasion = if state.body_velocity().x.abs() > r.evasive_lateral_speed {
                r.evasive_bonus
            } else {
                r.obstacle_stagnation_penalty
            };
        }

        if let Some(nearest) = probe.nearest_obstacle(&state.position, r.safety_radius) {
            let closeness = inverse_lerp(r.safety_radius, 0.0, nearest);
            shaped.proximity = closeness * closeness * r.proximity_penalty;
        }

        if state.angular_speed() > r.angular_velocity_threshold {
            shaped.angular_velocity = r.excess_angular_velocity_penalty;
        }

        shaped
    }
}
