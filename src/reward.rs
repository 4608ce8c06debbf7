// src/reward.rs

//! Reward shaping and terminal detection for reinforcement learning.

pub mod engine;
pub use engine::*;

pub mod probe;
pub use probe::*;

pub mod shaping;
pub use shaping::*;

pub mod terminal;
pub use terminal::*;
