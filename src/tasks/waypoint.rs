// src/tasks/waypoint.rs

//! # Waypoints
//!
//! Target poses supplied by an external caller and the FIFO that holds them
//! until the arbiter navigates to each in turn.

use crate::frames::heading_degrees;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A target pose in the simulator frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Target position in metres.
    pub position: Vector3<f32>,
    /// Orientation to hold on arrival.
    pub orientation: UnitQuaternion<f32>,
}

impl Waypoint {
    /// A waypoint with identity orientation.
    pub fn at(position: Vector3<f32>) -> Self {
        Self {
            position,
            orientation: UnitQuaternion::identity(),
        }
    }

    /// Builds a waypoint from a raw orientation.
    ///
    /// A zero or non-finite quaternion is replaced with identity. The flag is
    /// set when that correction happened.
    pub fn from_target(position: Vector3<f32>, orientation: Quaternion<f32>) -> (Self, bool) {
        let finite = orientation.coords.iter().all(|c| c.is_finite());
        if !finite || orientation.norm() <= f32::EPSILON {
            return (Self::at(position), true);
        }
        let waypoint = Self {
            position,
            orientation: UnitQuaternion::from_quaternion(orientation),
        };
        (waypoint, false)
    }

    /// Heading of the waypoint orientation in degrees.
    pub fn heading(&self) -> f32 {
        heading_degrees(&self.orientation)
    }
}

/// FIFO of waypoints awaiting navigation.
#[derive(Debug, Clone, Default)]
pub struct WaypointQueue {
    waypoints: VecDeque<Waypoint>,
}

impl WaypointQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a waypoint.
    pub fn push(&mut self, waypoint: Waypoint) {
        self.waypoints.push_back(waypoint);
    }

    /// Removes the oldest waypoint.
    pub fn pop(&mut self) -> Option<Waypoint> {
        self.waypoints.pop_front()
    }

    /// The oldest waypoint, left in place.
    pub fn peek(&self) -> Option<&Waypoint> {
        self.waypoints.front()
    }

    /// Number of queued waypoints.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether no waypoint is queued.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Drops every queued waypoint.
    pub fn clear(&mut self) {
        self.waypoints.clear();
    }
}
