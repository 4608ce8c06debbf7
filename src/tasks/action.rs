// src/tasks/action.rs

//! # Scripted Actions
//!
//! A closed set of maneuvers an external caller may request, parsed and
//! validated at the boundary, and the per-tick state machine that runs a
//! started maneuver to completion or timeout without blocking the
//! simulation loop.

use crate::config::ManeuverConfig;
use crate::error::ActionError;
use crate::frames::VehicleState;
use crate::pid::{delta_angle, lerp, normalize_angle};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A predefined maneuver that interrupts policy or navigation control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptedAction {
    /// Turn by `angle` degrees relative to the heading at start.
    RotateYawRelative {
        /// Relative turn in degrees, positive to the right.
        angle: f32,
    },
    /// Hover in place for `duration` seconds.
    Wait {
        /// Hover time in seconds.
        duration: f32,
    },
    /// Fly backward `distance` metres over `duration` seconds.
    Backup {
        /// Distance in metres.
        distance: f32,
        /// Time in seconds.
        duration: f32,
    },
    /// Climb to `altitude` metres.
    Takeoff {
        /// Target altitude in metres.
        altitude: f32,
    },
    /// Descend until on the ground.
    Land,
    /// Move the camera gimbal to `angle` degrees of pitch over `duration` seconds.
    AdjustCameraPitch {
        /// Target gimbal pitch in degrees.
        angle: f32,
        /// Time in seconds.
        duration: f32,
    },
}

impl ScriptedAction {
    /// Action type names accepted by [`ScriptedAction::parse`].
    pub const WIRE_NAMES: [&'static str; 6] = [
        "rotate_drone_yaw_relative",
        "wait",
        "backup",
        "takeoff",
        "land",
        "adjust_camera_pitch",
    ];

    /// Parses an external request into an action.
    ///
    /// Optional parameters fall back to the defaults in `maneuvers`. Unknown
    /// parameter keys are ignored.
    pub fn parse(
        action_type: &str,
        params: &HashMap<String, f32>,
        maneuvers: &ManeuverConfig,
    ) -> Result<Self, ActionError> {
        let action = match action_type {
            "rotate_drone_yaw_relative" => ScriptedAction::RotateYawRelative {
                angle: required(params, "rotate_drone_yaw_relative", "angle_degrees")?,
            },
            "wait" => ScriptedAction::Wait {
                duration: non_negative(
                    "duration",
                    optional(params, "duration", maneuvers.default_wait_duration)?,
                )?,
            },
            "backup" => {
                let distance = optional(params, "distance", maneuvers.default_backup_distance)?;
                let duration = optional(params, "duration", maneuvers.default_backup_duration)?;
                if duration <= 0.0 {
                    return Err(ActionError::InvalidParameter {
                        parameter: "duration",
                        value: duration,
                    });
                }
                ScriptedAction::Backup {
                    distance: non_negative("distance", distance)?,
                    duration,
                }
            }
            "takeoff" => ScriptedAction::Takeoff {
                altitude: non_negative(
                    "altitude",
                    optional(params, "altitude", maneuvers.default_takeoff_altitude)?,
                )?,
            },
            "land" => ScriptedAction::Land,
            "adjust_camera_pitch" => ScriptedAction::AdjustCameraPitch {
                angle: required(params, "adjust_camera_pitch", "pitch_angle")?,
                duration: non_negative(
                    "duration",
                    optional(params, "duration", maneuvers.default_camera_duration)?,
                )?,
            },
            unknown => return Err(ActionError::UnknownActionType(unknown.to_string())),
        };
        Ok(action)
    }

    /// The action type name this action parses from.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ScriptedAction::RotateYawRelative { .. } => "rotate_drone_yaw_relative",
            ScriptedAction::Wait { .. } => "wait",
            ScriptedAction::Backup { .. } => "backup",
            ScriptedAction::Takeoff { .. } => "takeoff",
            ScriptedAction::Land => "land",
            ScriptedAction::AdjustCameraPitch { .. } => "adjust_camera_pitch",
        }
    }

    /// Starts the action from the current vehicle state and gimbal pitch.
    pub fn start(&self, state: &VehicleState, gimbal_pitch: f32) -> ActionProgress {
        let phase = match *self {
            ScriptedAction::RotateYawRelative { angle } => Phase::Rotate {
                target_yaw: normalize_angle(state.attitude.yaw + angle),
                stable_for: 0.0,
            },
            ScriptedAction::Wait { duration } => Phase::Wait { duration },
            ScriptedAction::Backup { distance, duration } => Phase::Backup {
                speed: distance / duration,
                duration,
            },
            ScriptedAction::Takeoff { altitude } => Phase::Takeoff { altitude },
            ScriptedAction::Land => Phase::Land,
            ScriptedAction::AdjustCameraPitch { angle, duration } => Phase::Camera {
                from: gimbal_pitch,
                to: angle,
                duration,
            },
        };
        ActionProgress {
            action: *self,
            elapsed: 0.0,
            phase,
        }
    }
}

impl fmt::Display for ScriptedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptedAction::RotateYawRelative { angle } => write!(f, "rotate {} deg", angle),
            ScriptedAction::Wait { duration } => write!(f, "wait {} s", duration),
            ScriptedAction::Backup { distance, duration } => {
                write!(f, "backup {} m over {} s", distance, duration)
            }
            ScriptedAction::Takeoff { altitude } => write!(f, "takeoff to {} m", altitude),
            ScriptedAction::Land => write!(f, "land"),
            ScriptedAction::AdjustCameraPitch { angle, duration } => {
                write!(f, "camera pitch {} deg over {} s", angle, duration)
            }
        }
    }
}

fn checked(parameter: &str, value: f32) -> Result<f32, ActionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ActionError::NonFiniteParameter {
            parameter: parameter.to_string(),
            value,
        })
    }
}

fn required(
    params: &HashMap<String, f32>,
    action: &'static str,
    parameter: &'static str,
) -> Result<f32, ActionError> {
    let value = params
        .get(parameter)
        .copied()
        .ok_or(ActionError::MissingParameter { action, parameter })?;
    checked(parameter, value)
}

fn optional(params: &HashMap<String, f32>, parameter: &str, default: f32) -> Result<f32, ActionError> {
    match params.get(parameter) {
        Some(&value) => checked(parameter, value),
        None => Ok(default),
    }
}

fn non_negative(parameter: &'static str, value: f32) -> Result<f32, ActionError> {
    if value < 0.0 {
        Err(ActionError::InvalidParameter { parameter, value })
    } else {
        Ok(value)
    }
}

/// How a finished action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// The completion predicate held.
    Completed,
    /// The safety timeout fired first.
    TimedOut,
}

/// What the running action asks of the hover command this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionDirective {
    /// Hold position and the current heading.
    Hold,
    /// Steer toward an absolute heading in degrees.
    Heading(f32),
    /// Hold position at an altitude in metres.
    Altitude(f32),
    /// Fly backward at a speed in metres per second.
    Reverse(f32),
    /// Hold position and set the camera gimbal pitch in degrees.
    Gimbal(f32),
}

/// Result of advancing an action by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionStep {
    /// What to command this tick.
    pub directive: ActionDirective,
    /// Set once the action has finished.
    pub outcome: Option<ActionOutcome>,
}

impl ActionStep {
    fn running(directive: ActionDirective) -> Self {
        Self {
            directive,
            outcome: None,
        }
    }

    fn finished(directive: ActionDirective, outcome: ActionOutcome) -> Self {
        Self {
            directive,
            outcome: Some(outcome),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Rotate { target_yaw: f32, stable_for: f32 },
    Wait { duration: f32 },
    Backup { speed: f32, duration: f32 },
    Takeoff { altitude: f32 },
    Land,
    Camera { from: f32, to: f32, duration: f32 },
}

/// Progress of a started action, advanced once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionProgress {
    action: ScriptedAction,
    elapsed: f32,
    phase: Phase,
}

impl ActionProgress {
    /// The action being run.
    pub fn action(&self) -> &ScriptedAction {
        &self.action
    }

    /// Seconds since the action started.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Absolute heading held by a rotation, if this is one.
    pub fn target_yaw(&self) -> Option<f32> {
        match self.phase {
            Phase::Rotate { target_yaw, .. } => Some(target_yaw),
            _ => None,
        }
    }

    /// Advances the action by `dt` seconds against the observed state.
    pub fn advance(&mut self, state: &VehicleState, dt: f32, maneuvers: &ManeuverConfig) -> ActionStep {
        match &mut self.phase {
            Phase::Rotate {
                target_yaw,
                stable_for,
            } => {
                let directive = ActionDirective::Heading(*target_yaw);
                let angle_ok =
                    delta_angle(state.attitude.yaw, *target_yaw).abs() < maneuvers.angle_tolerance;
                let rate_ok = state.yaw_rate().abs() < maneuvers.rate_tolerance;
                if angle_ok && rate_ok {
                    *stable_for += dt;
                } else {
                    *stable_for = 0.0;
                }
                if *stable_for >= maneuvers.settle_time {
                    log::info!(
                        "rotation settled at {:.2} deg (target {:.2} deg)",
                        state.attitude.yaw,
                        target_yaw
                    );
                    return ActionStep::finished(directive, ActionOutcome::Completed);
                }
                self.elapsed += dt;
                if self.elapsed >= maneuvers.rotation_timeout {
                    log::error!(
                        "rotation timed out before reaching {:.2} deg: yaw {:.2} deg, rate {:.2} deg/s",
                        target_yaw,
                        state.attitude.yaw,
                        state.yaw_rate()
                    );
                    return ActionStep::finished(directive, ActionOutcome::TimedOut);
                }
                ActionStep::running(directive)
            }
            Phase::Wait { duration } => {
                self.elapsed += dt;
                if self.elapsed >= *duration {
                    ActionStep::finished(ActionDirective::Hold, ActionOutcome::Completed)
                } else {
                    ActionStep::running(ActionDirective::Hold)
                }
            }
            Phase::Backup { speed, duration } => {
                self.elapsed += dt;
                if self.elapsed >= *duration {
                    ActionStep::finished(ActionDirective::Hold, ActionOutcome::Completed)
                } else {
                    ActionStep::running(ActionDirective::Reverse(*speed))
                }
            }
            Phase::Takeoff { altitude } => {
                let directive = ActionDirective::Altitude(*altitude);
                if state.position.y >= *altitude - maneuvers.takeoff_tolerance {
                    log::info!("takeoff finished at {:.2} m", state.position.y);
                    return ActionStep::finished(directive, ActionOutcome::Completed);
                }
                self.timed(directive, dt, maneuvers.maneuver_timeout, "takeoff")
            }
            Phase::Land => {
                let directive = ActionDirective::Altitude(maneuvers.land_altitude);
                if state.position.y <= maneuvers.landed_height {
                    log::info!("landing finished at {:.2} m", state.position.y);
                    return ActionStep::finished(directive, ActionOutcome::Completed);
                }
                self.timed(directive, dt, maneuvers.maneuver_timeout, "landing")
            }
            Phase::Camera { from, to, duration } => {
                self.elapsed += dt;
                let t = if *duration > 0.0 {
                    self.elapsed / *duration
                } else {
                    1.0
                };
                let directive = ActionDirective::Gimbal(lerp(*from, *to, t));
                if t >= 1.0 {
                    ActionStep::finished(directive, ActionOutcome::Completed)
                } else {
                    ActionStep::running(directive)
                }
            }
        }
    }

    fn timed(&mut self, directive: ActionDirective, dt: f32, timeout: f32, what: &str) -> ActionStep {
        self.elapsed += dt;
        if self.elapsed >= timeout {
            log::error!("{} timed out after {:.1} s", what, self.elapsed);
            ActionStep::finished(directive, ActionOutcome::TimedOut)
        } else {
            ActionStep::running(directive)
        }
    }
}
