// src/telemetry.rs

//! # Outbound Telemetry
//!
//! Status, pose and completion events for the telemetry collaborator. Raw
//! simulator-frame values are reported alongside their ROS-frame
//! conversions; transport and serialization are left to the collaborator.

use crate::arbiter::Mode;
use crate::frames::{sim_to_ros_orientation, sim_to_ros_position, VehicleState};
use nalgebra::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse activity reported to the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    /// Flying under policy control.
    Idle,
    /// Flying toward a waypoint.
    Navigating,
    /// Running a scripted maneuver.
    PerformingAction,
    /// Airborne and awaiting a target.
    Hovering,
    /// On the ground and awaiting a target.
    IdleOnGround,
}

impl FlightStatus {
    /// Derives the status from the arbiter mode and the vehicle height.
    ///
    /// A vehicle below `ground_height` that is neither navigating nor
    /// performing an action is on the ground.
    pub fn from_mode(mode: Mode, height: f32, ground_height: f32) -> Self {
        match mode {
            Mode::Navigating => FlightStatus::Navigating,
            Mode::ScriptedAction => FlightStatus::PerformingAction,
            _ if height < ground_height => FlightStatus::IdleOnGround,
            Mode::AwaitingExternalTarget => FlightStatus::Hovering,
            Mode::PolicyControl => FlightStatus::Idle,
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Idle => "IDLE",
            FlightStatus::Navigating => "NAVIGATING",
            FlightStatus::PerformingAction => "PERFORMING_ACTION",
            FlightStatus::Hovering => "HOVERING",
            FlightStatus::IdleOnGround => "IDLE_ON_GROUND",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event sent to the telemetry collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionFeedback {
    /// A scripted action finished and the vehicle has settled.
    ActionComplete,
}

impl ActionFeedback {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionFeedback::ActionComplete => "ACTION_COMPLETE",
        }
    }
}

/// Pose and motion snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Activity at the time of the snapshot.
    pub status: FlightStatus,
    /// Simulator-frame position.
    pub position: Vector3<f32>,
    /// Simulator-frame orientation.
    pub orientation: Quaternion<f32>,
    /// Simulator-frame linear velocity.
    pub velocity: Vector3<f32>,
    /// Simulator-frame angular velocity, degrees per second.
    pub angular_velocity: Vector3<f32>,
    /// Position in the ROS frame.
    pub ros_position: Vector3<f32>,
    /// Orientation in the ROS frame.
    pub ros_orientation: Quaternion<f32>,
    /// Linear velocity in the ROS frame.
    pub ros_velocity: Vector3<f32>,
}

impl Telemetry {
    /// Captures `state` with the given status.
    pub fn capture(status: FlightStatus, state: &VehicleState) -> Self {
        let orientation = state.attitude.orientation().into_inner();
        Self {
            status,
            position: state.position,
            orientation,
            velocity: state.velocity,
            angular_velocity: state.angular_velocity,
            ros_position: sim_to_ros_position(&state.position),
            ros_orientation: sim_to_ros_orientation(&orientation),
            ros_velocity: sim_to_ros_position(&state.velocity),
        }
    }
}
