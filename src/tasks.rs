// src/tasks.rs

//! # Tasks
//!
//! Work submitted by an external caller: scripted maneuvers and waypoints,
//! each held in a strict FIFO until the arbiter consumes it.

pub mod action;
pub use action::*;
pub mod queue;
pub use queue::*;
pub mod waypoint;
pub use waypoint::*;
