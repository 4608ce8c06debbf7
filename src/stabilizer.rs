// src/stabilizer.rs

//! # Flight Stabilization
//!
//! The shared stabilizer interface and the cascaded controller that turns
//! high-level motion commands into torque and thrust.

pub mod cascade;
pub use cascade::*;
pub mod flight_stabilizer;
pub use flight_stabilizer::*;
