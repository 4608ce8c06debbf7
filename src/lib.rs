// src/lib.rs

//! # Free Flight Autopilot
//!
//! Flight control and task orchestration for a simulated rotorcraft trained
//! with reinforcement learning.
//!
//! - [`pid`] is the clamped PID primitive, generic over any [`Number`].
//! - [`stabilizer`] holds the cascaded flight controller, which turns a
//!   [`FlightCommand`] into body torque and tilt-compensated thrust.
//! - [`arbiter`] decides every tick whether the policy, a scripted maneuver
//!   or waypoint navigation governs the command.
//! - [`reward`] scores each tick and detects terminal outcomes.
//! - [`agent`] wires these into one per-tick pipeline with a thread-safe
//!   request handle.
//!
//! Physics, rendering, transport and policy inference are collaborators:
//! the crate consumes vehicle state and obstacle queries and emits torque
//! and thrust.

#![deny(missing_docs)]

pub mod agent;
pub mod arbiter;
pub mod command;
pub mod config;
pub mod episode;
pub mod error;
pub mod frames;
pub mod metrics;
pub mod observation;
pub mod pid;
pub mod reward;
pub mod stabilizer;
pub mod tasks;
pub mod telemetry;

#[doc(inline)]
pub use stabilizer::*;

#[cfg(test)]
mod test_utils;
