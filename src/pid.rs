// src/pid.rs

//! # PID Control Module
//!
//! This module provides the clamped feedback loop shared by every axis of
//! the cascaded flight controller, and the wrap-safe angle arithmetic the
//! yaw loop depends on.

pub mod angle;
pub use angle::*;
pub mod clamped;
pub use clamped::*;
