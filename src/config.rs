// src/config.rs

//! # Configuration
//!
//! Every tunable of the autopilot, loaded from YAML with serde. Each section
//! carries defaults taken from a tuned vehicle, so a partial document is
//! valid and an empty one reproduces the defaults.
//!
//! ```
//! use free_flight_autopilot::config::{AutopilotConfig, Regime};
//!
//! let config = AutopilotConfig::from_yaml_str(
//!     "
//! vehicle:
//!   mass: 1.4
//! episode:
//!   regime: external_command
//! ",
//! )
//! .unwrap();
//!
//! assert_eq!(1.4, config.vehicle.mass);
//! assert_eq!(Regime::ExternalCommand, config.episode.regime);
//! assert_eq!(45.0, config.vehicle.max_pitch);
//! ```

use crate::error::ConfigError;
use crate::pid::ControlGains;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration of one autopilot agent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    /// Physical constants and command limits.
    pub vehicle: VehicleConfig,
    /// Gains of the seven feedback loops.
    pub gains: GainSchedule,
    /// Flight envelope bounding box.
    pub envelope: Envelope,
    /// Arrival and shaping zones.
    pub zones: ZoneConfig,
    /// Reward and penalty magnitudes.
    pub rewards: RewardConfig,
    /// Policy action shaping.
    pub policy: PolicyConfig,
    /// Scripted maneuver tolerances and defaults.
    pub maneuvers: ManeuverConfig,
    /// Episode lifecycle.
    pub episode: EpisodeConfig,
}

impl AutopilotConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Checks every range the tick pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.vehicle.validate()?;
        self.gains.validate()?;
        self.envelope.validate()?;
        self.zones.validate()?;
        self.rewards.validate()?;
        self.policy.validate()?;
        self.maneuvers.validate()?;
        self.episode.validate()
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive and finite, got {}", value)))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be non-negative and finite, got {}", value)))
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be finite, got {}", value)))
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must lie in [0, 1], got {}", value)))
    }
}

/// Physical constants of the vehicle and the magnitude limits of commands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Mass in kilograms.
    pub mass: f32,
    /// Gravity magnitude in metres per second squared.
    pub gravity: f32,
    /// Scale applied to the weight to obtain hover thrust.
    pub hover_multiplier: f32,
    /// Largest pitch the velocity loop may request, degrees.
    pub max_pitch: f32,
    /// Largest roll the velocity loop may request, degrees.
    pub max_roll: f32,
    /// Largest forward speed command, metres per second.
    pub max_velocity_x: f32,
    /// Largest lateral speed command, metres per second.
    pub max_velocity_z: f32,
    /// Largest yaw rate command, degrees per second.
    pub max_yaw_rate: f32,
    /// Largest climb or descent rate requested by the altitude loop.
    pub max_vertical_velocity: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            gravity: 9.81,
            hover_multiplier: 1.0,
            max_pitch: 45.0,
            max_roll: 45.0,
            max_velocity_x: 5.0,
            max_velocity_z: 5.0,
            max_yaw_rate: 90.0,
            max_vertical_velocity: 3.0,
        }
    }
}

impl VehicleConfig {
    /// Thrust that balances gravity when level.
    pub fn hover_thrust(&self) -> f32 {
        self.mass * self.gravity.abs() * self.hover_multiplier
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("vehicle.mass", self.mass)?;
        positive("vehicle.gravity", self.gravity)?;
        positive("vehicle.hover_multiplier", self.hover_multiplier)?;
        positive("vehicle.max_pitch", self.max_pitch)?;
        positive("vehicle.max_roll", self.max_roll)?;
        positive("vehicle.max_velocity_x", self.max_velocity_x)?;
        positive("vehicle.max_velocity_z", self.max_velocity_z)?;
        positive("vehicle.max_yaw_rate", self.max_yaw_rate)?;
        positive("vehicle.max_vertical_velocity", self.max_vertical_velocity)
    }
}

/// Gains of every loop in the cascade, one set per physical axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainSchedule {
    /// Forward velocity to desired pitch.
    pub velocity_x: ControlGains<f32>,
    /// Lateral velocity to desired roll.
    pub velocity_z: ControlGains<f32>,
    /// Vertical velocity to thrust correction.
    pub vertical_velocity: ControlGains<f32>,
    /// Pitch angle to pitch torque.
    pub pitch: ControlGains<f32>,
    /// Roll angle to roll torque.
    pub roll: ControlGains<f32>,
    /// Heading error to yaw torque.
    pub yaw: ControlGains<f32>,
    /// Altitude to target vertical velocity.
    pub altitude: ControlGains<f32>,
}

impl Default for GainSchedule {
    fn default() -> Self {
        Self {
            velocity_x: ControlGains::pid(0.5, 0.0, 0.1),
            velocity_z: ControlGains::pid(0.5, 0.0, 0.1),
            vertical_velocity: ControlGains::pid(2.5, 0.5, 0.5),
            pitch: ControlGains::pid(6.0, 0.0, 0.4),
            roll: ControlGains::pid(6.0, 0.0, 0.4),
            yaw: ControlGains::pid(1.0, 0.0, 0.0),
            altitude: ControlGains::pid(0.8, 0.1, 0.2),
        }
    }
}

impl GainSchedule {
    fn validate(&self) -> Result<(), ConfigError> {
        let loops = [
            ("gains.velocity_x", &self.velocity_x),
            ("gains.velocity_z", &self.velocity_z),
            ("gains.vertical_velocity", &self.vertical_velocity),
            ("gains.pitch", &self.pitch),
            ("gains.roll", &self.roll),
            ("gains.yaw", &self.yaw),
            ("gains.altitude", &self.altitude),
        ];
        for (field, gains) in loops {
            finite(field, gains.kp)?;
            finite(field, gains.ki)?;
            finite(field, gains.kd)?;
            non_negative(field, gains.integral_limit)?;
            non_negative(field, gains.output_limit)?;
        }
        Ok(())
    }
}

/// Axis-aligned box the vehicle must stay inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    /// Lower corner in metres.
    pub min: Vector3<f32>,
    /// Upper corner in metres.
    pub max: Vector3<f32>,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            min: Vector3::new(-32.0, 0.0, -45.0),
            max: Vector3::new(40.0, 6.0, 40.0),
        }
    }
}

impl Envelope {
    /// Whether `position` lies inside the box, boundary included.
    pub fn contains(&self, position: &Vector3<f32>) -> bool {
        (0..3).all(|axis| position[axis] >= self.min[axis] && position[axis] <= self.max[axis])
    }

    /// Clamps `position` into the box.
    pub fn clamp(&self, position: &Vector3<f32>) -> Vector3<f32> {
        position.sup(&self.min).inf(&self.max)
    }

    /// Height of the box in metres.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let ordered = (0..3).all(|axis| {
            self.min[axis].is_finite() && self.max[axis].is_finite() && self.min[axis] < self.max[axis]
        });
        if ordered {
            Ok(())
        } else {
            Err(ConfigError::invalid(
                "envelope",
                format!("min {:?} must be below max {:?} on every axis", self.min, self.max),
            ))
        }
    }
}

/// Distance thresholds for arrival and zone-dependent shaping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Distance below which a target counts as reached, metres.
    pub arrival_distance: f32,
    /// Approach zone as a fraction of the local target range.
    pub approach_ratio: f32,
    /// Terminal zone as a fraction of the local target range.
    pub terminal_ratio: f32,
    /// Radius within which local targets are placed, metres.
    pub local_target_range: f32,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            arrival_distance: 1.0,
            approach_ratio: 0.8,
            terminal_ratio: 0.4,
            local_target_range: 5.0,
        }
    }
}

impl ZoneConfig {
    /// Radius of the approach zone for a given local range.
    pub fn approach_distance(&self, local_range: f32) -> f32 {
        local_range * self.approach_ratio
    }

    /// Radius of the terminal zone for a given local range.
    pub fn terminal_distance(&self, local_range: f32) -> f32 {
        local_range * self.terminal_ratio
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("zones.arrival_distance", self.arrival_distance)?;
        positive("zones.local_target_range", self.local_target_range)?;
        unit_interval("zones.approach_ratio", self.approach_ratio)?;
        unit_interval("zones.terminal_ratio", self.terminal_ratio)
    }
}

/// Reward and penalty magnitudes. Penalties are stored with their sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Fixed reward on arrival.
    pub arrival_reward: f32,
    /// Fixed reward on collision or leaving the envelope.
    pub failure_penalty: f32,
    /// Scale of the soft-landing bonus `exp(-speed)`.
    pub landing_bonus: f32,
    /// Scale of the potential-based progress term.
    pub potential_multiplier: f32,
    /// Scale of the terminal-zone heading alignment bonus.
    pub terminal_alignment_bonus: f32,
    /// Scale of the terminal-zone speed control bonus.
    pub terminal_speed_bonus: f32,
    /// Scale of the approach-zone direction match bonus.
    pub approach_direction_bonus: f32,
    /// Scale of the lateral evasion bonus.
    pub evasive_bonus: f32,
    /// Constant per-tick penalty.
    pub time_penalty: f32,
    /// Penalty when angular speed exceeds its threshold.
    pub excess_angular_velocity_penalty: f32,
    /// Angular speed above which the excess penalty applies, degrees per second.
    pub angular_velocity_threshold: f32,
    /// Penalty for hovering in place far from the target.
    pub stagnation_penalty: f32,
    /// Speed below which the vehicle counts as stagnating.
    pub stagnation_speed: f32,
    /// Penalty for stagnating in front of an obstacle.
    pub obstacle_stagnation_penalty: f32,
    /// Scale of the setpoint change penalty.
    pub action_change_penalty: f32,
    /// Scale of the squared speed penalty.
    pub energy_penalty: f32,
    /// Scale of the squared obstacle closeness penalty.
    pub proximity_penalty: f32,
    /// Obstacle distance at which the proximity penalty starts, metres.
    pub safety_radius: f32,
    /// Flat per-tick penalty while approaching an intermediate waypoint.
    pub waypoint_step_penalty: f32,
    /// Minimum speed for the approach direction bonus.
    pub approach_min_speed: f32,
    /// Lateral speed above which evasion is rewarded.
    pub evasive_lateral_speed: f32,
    /// Minimum forward component of the target direction for the evasion term.
    pub target_forward_threshold: f32,
    /// Radius of the obstacle-ahead probe, metres.
    pub obstacle_probe_radius: f32,
    /// Range of the obstacle-ahead probe, metres.
    pub obstacle_probe_range: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            arrival_reward: 1.0,
            failure_penalty: -1.0,
            landing_bonus: 0.2,
            potential_multiplier: 0.1,
            terminal_alignment_bonus: 0.001,
            terminal_speed_bonus: 0.002,
            approach_direction_bonus: 0.0005,
            evasive_bonus: 0.01,
            time_penalty: -0.0001,
            excess_angular_velocity_penalty: -0.001,
            angular_velocity_threshold: 45.0,
            stagnation_penalty: -0.001,
            stagnation_speed: 0.2,
            obstacle_stagnation_penalty: -0.005,
            action_change_penalty: -0.00005,
            energy_penalty: -0.00002,
            proximity_penalty: -0.002,
            safety_radius: 1.5,
            waypoint_step_penalty: -0.001,
            approach_min_speed: 0.5,
            evasive_lateral_speed: 0.5,
            target_forward_threshold: 0.1,
            obstacle_probe_radius: 0.5,
            obstacle_probe_range: 3.0,
        }
    }
}

impl RewardConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let magnitudes = [
            ("rewards.arrival_reward", self.arrival_reward),
            ("rewards.failure_penalty", self.failure_penalty),
            ("rewards.landing_bonus", self.landing_bonus),
            ("rewards.potential_multiplier", self.potential_multiplier),
            ("rewards.terminal_alignment_bonus", self.terminal_alignment_bonus),
            ("rewards.terminal_speed_bonus", self.terminal_speed_bonus),
            ("rewards.approach_direction_bonus", self.approach_direction_bonus),
            ("rewards.evasive_bonus", self.evasive_bonus),
            ("rewards.time_penalty", self.time_penalty),
            ("rewards.excess_angular_velocity_penalty", self.excess_angular_velocity_penalty),
            ("rewards.stagnation_penalty", self.stagnation_penalty),
            ("rewards.obstacle_stagnation_penalty", self.obstacle_stagnation_penalty),
            ("rewards.action_change_penalty", self.action_change_penalty),
            ("rewards.energy_penalty", self.energy_penalty),
            ("rewards.proximity_penalty", self.proximity_penalty),
            ("rewards.waypoint_step_penalty", self.waypoint_step_penalty),
        ];
        for (field, value) in magnitudes {
            finite(field, value)?;
        }
        non_negative("rewards.angular_velocity_threshold", self.angular_velocity_threshold)?;
        non_negative("rewards.stagnation_speed", self.stagnation_speed)?;
        positive("rewards.safety_radius", self.safety_radius)?;
        non_negative("rewards.approach_min_speed", self.approach_min_speed)?;
        non_negative("rewards.evasive_lateral_speed", self.evasive_lateral_speed)?;
        finite("rewards.target_forward_threshold", self.target_forward_threshold)?;
        positive("rewards.obstacle_probe_radius", self.obstacle_probe_radius)?;
        positive("rewards.obstacle_probe_range", self.obstacle_probe_range)
    }
}

/// How the raw policy action is turned into a command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Low-pass factor in [0, 1). Zero applies the raw action directly.
    pub smoothing: f32,
    /// Exploration noise as a fraction of the velocity limits.
    pub noise: f32,
    /// Seed for exploration noise and curriculum sampling.
    pub seed: Option<u64>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.5,
            noise: 0.1,
            seed: None,
        }
    }
}

impl PolicyConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(ConfigError::invalid(
                "policy.smoothing",
                format!("must lie in [0, 1), got {}", self.smoothing),
            ));
        }
        non_negative("policy.noise", self.noise)
    }
}

/// Tolerances, timeouts and parameter defaults for scripted maneuvers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManeuverConfig {
    /// Hover time after a maneuver before it is reported complete, seconds.
    pub stabilization_wait: f32,
    /// Time a rotation may take before it is abandoned, seconds.
    pub rotation_timeout: f32,
    /// Time the heading must stay within tolerance to finish a rotation.
    pub settle_time: f32,
    /// Time a takeoff or landing may take before it is abandoned, seconds.
    pub maneuver_timeout: f32,
    /// Heading tolerance, degrees.
    pub angle_tolerance: f32,
    /// Yaw rate tolerance, degrees per second.
    pub rate_tolerance: f32,
    /// Altitude tolerance for takeoff, metres.
    pub takeoff_tolerance: f32,
    /// Altitude commanded while landing, metres.
    pub land_altitude: f32,
    /// Height at which a landing is complete, metres.
    pub landed_height: f32,
    /// Height below which an idle vehicle reports being on the ground.
    pub ground_height: f32,
    /// Backup distance when none is given, metres.
    pub default_backup_distance: f32,
    /// Backup duration when none is given, seconds.
    pub default_backup_duration: f32,
    /// Wait duration when none is given, seconds.
    pub default_wait_duration: f32,
    /// Takeoff altitude when none is given, metres.
    pub default_takeoff_altitude: f32,
    /// Camera pitch duration when none is given, seconds.
    pub default_camera_duration: f32,
}

impl Default for ManeuverConfig {
    fn default() -> Self {
        Self {
            stabilization_wait: 0.5,
            rotation_timeout: 10.0,
            settle_time: 0.3,
            maneuver_timeout: 20.0,
            angle_tolerance: 2.5,
            rate_tolerance: 1.0,
            takeoff_tolerance: 0.1,
            land_altitude: 0.3,
            landed_height: 0.2,
            ground_height: 0.2,
            default_backup_distance: 2.0,
            default_backup_duration: 2.5,
            default_wait_duration: 5.0,
            default_takeoff_altitude: 3.0,
            default_camera_duration: 2.0,
        }
    }
}

impl ManeuverConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("maneuvers.stabilization_wait", self.stabilization_wait)?;
        positive("maneuvers.rotation_timeout", self.rotation_timeout)?;
        non_negative("maneuvers.settle_time", self.settle_time)?;
        positive("maneuvers.maneuver_timeout", self.maneuver_timeout)?;
        positive("maneuvers.angle_tolerance", self.angle_tolerance)?;
        positive("maneuvers.rate_tolerance", self.rate_tolerance)?;
        positive("maneuvers.takeoff_tolerance", self.takeoff_tolerance)?;
        non_negative("maneuvers.land_altitude", self.land_altitude)?;
        non_negative("maneuvers.landed_height", self.landed_height)?;
        non_negative("maneuvers.ground_height", self.ground_height)?;
        non_negative("maneuvers.default_backup_distance", self.default_backup_distance)?;
        positive("maneuvers.default_backup_duration", self.default_backup_duration)?;
        non_negative("maneuvers.default_wait_duration", self.default_wait_duration)?;
        non_negative("maneuvers.default_takeoff_altitude", self.default_takeoff_altitude)?;
        non_negative("maneuvers.default_camera_duration", self.default_camera_duration)
    }
}

/// Top-level regime chosen once per episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// The policy flies autonomously toward sampled targets.
    #[default]
    Training,
    /// An external caller supplies waypoints and maneuvers.
    ExternalCommand,
}

/// Episode lifecycle settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    /// Training or external-command operation.
    pub regime: Regime,
    /// Step count that ends an episode. Zero disables the timeout.
    pub max_steps: u64,
    /// Steps between windowed success-rate reports.
    pub report_interval: u64,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            regime: Regime::Training,
            max_steps: 0,
            report_interval: 50_000,
        }
    }
}

impl EpisodeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.report_interval == 0 {
            return Err(ConfigError::invalid("episode.report_interval", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AutopilotConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = AutopilotConfig::from_yaml_str("{}").unwrap();
        assert_eq!(AutopilotConfig::default(), config);
    }

    #[test]
    fn test_partial_document_overrides_fields() {
        let config = AutopilotConfig::from_yaml_str(
            "
gains:
  yaw:
    kp: 2.0
    ki: 0.0
    kd: 0.1
    integral_limit: 5.0
    output_limit: 50.0
envelope:
  min: [-10.0, 0.0, -10.0]
  max: [10.0, 4.0, 10.0]
episode:
  max_steps: 3000
",
        )
        .unwrap();

        assert_eq!(ControlGains::new(2.0, 0.0, 0.1, 5.0, 50.0), config.gains.yaw);
        assert_eq!(GainSchedule::default().pitch, config.gains.pitch);
        assert_eq!(4.0, config.envelope.max.y);
        assert_eq!(3000, config.episode.max_steps);
        assert_eq!(Regime::Training, config.episode.regime);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let error = AutopilotConfig::from_yaml_str("vehicle:\n  mass: -1.0\n").unwrap_err();
        assert!(matches!(
            error,
            ConfigError::Invalid {
                field: "vehicle.mass",
                ..
            }
        ));

        let error = AutopilotConfig::from_yaml_str("policy:\n  smoothing: 1.0\n").unwrap_err();
        assert!(matches!(
            error,
            ConfigError::Invalid {
                field: "policy.smoothing",
                ..
            }
        ));

        let error =
            AutopilotConfig::from_yaml_str("envelope:\n  min: [0, 5, 0]\n  max: [1, 5, 1]\n")
                .unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { field: "envelope", .. }));
    }

    #[test]
    fn test_malformed_yaml_is_a_parse_error() {
        let error = AutopilotConfig::from_yaml_str("vehicle: [1, 2").unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let error = AutopilotConfig::from_yaml_file("/nonexistent/autopilot.yaml").unwrap_err();
        assert!(matches!(error, ConfigError::Io(_)));
    }

    #[test]
    fn test_envelope_contains_and_clamps() {
        let envelope = Envelope::default();
        assert!(envelope.contains(&Vector3::new(0.0, 6.0, 0.0)));
        assert!(!envelope.contains(&Vector3::new(0.0, 7.0, 0.0)));
        assert_eq!(
            Vector3::new(40.0, 0.0, -45.0),
            envelope.clamp(&Vector3::new(50.0, -1.0, -60.0))
        );
    }

    #[test]
    fn test_hover_thrust() {
        let vehicle = VehicleConfig {
            mass: 2.0,
            hover_multiplier: 1.5,
            ..VehicleConfig::default()
        };
        assert!((29.43 - vehicle.hover_thrust()).abs() < 1e-4);
    }
}
