// src/reward/terminal.rs

//! Terminal outcomes and the per-tick result of reward evaluation.

use super::ShapedReward;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the vehicle hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    /// A static or generated obstacle.
    Obstacle,
    /// The ground plane.
    Ground,
}

impl fmt::Display for CollisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionKind::Obstacle => f.write_str("Collision with obstacle"),
            CollisionKind::Ground => f.write_str("Collision with ground"),
        }
    }
}

/// How an episode ended, or a terminal event in the external regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The target was reached.
    Arrival,
    /// The vehicle collided.
    Collision(CollisionKind),
    /// The vehicle left the flight envelope.
    OutOfBounds,
    /// The step budget ran out.
    Timeout,
}

impl Outcome {
    /// Whether this counts as a successful episode.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Arrival)
    }

    /// Whether this carries the failure penalty.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Collision(_) | Outcome::OutOfBounds)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Arrival => f.write_str("Arrived"),
            Outcome::Collision(kind) => kind.fmt(f),
            Outcome::OutOfBounds => f.write_str("Out of Bounds"),
            Outcome::Timeout => f.write_str("Timeout"),
        }
    }
}

/// Reward and terminal signal produced for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepResult {
    /// Everything awarded this tick.
    pub reward: f32,
    /// The terminal part of `reward`.
    pub terminal_reward: f32,
    /// Breakdown of the shaping part, when shaping ran.
    pub shaped: Option<ShapedReward>,
    /// Terminal event detected this tick.
    pub outcome: Option<Outcome>,
    /// Whether the episode is over and must be restarted.
    pub episode_over: bool,
}

impl StepResult {
    /// A result that only carries shaping.
    pub fn shaped(shaped: ShapedReward) -> Self {
        Self {
            reward: shaped.total(),
            shaped: Some(shaped),
            ..Self::default()
        }
    }

    /// A terminal result carrying `reward` and nothing else.
    pub fn terminal(outcome: Outcome, reward: f32, episode_over: bool) -> Self {
        Self {
            reward,
            terminal_reward: reward,
            shaped: None,
            outcome: Some(outcome),
            episode_over,
        }
    }
}
