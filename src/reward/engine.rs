// src/reward/engine.rs

//! # Reward Engine
//!
//! Scores each tick after physics has advanced the vehicle and detects the
//! terminal conditions of an episode. Checks run in a fixed order: leaving
//! the envelope, arrival, dense shaping, then the step budget.
//!
//! In the external-command regime nothing ends the episode. Leaving the
//! envelope and collisions are still tallied, and arrival is left to the
//! arbiter, which advances to the next waypoint.

use super::{CollisionKind, ObstacleProbe, Outcome, RewardShaper, ShapingInput, StepResult};
use crate::config::{AutopilotConfig, Envelope, Regime, RewardConfig, ZoneConfig};
use crate::frames::VehicleState;
use crate::metrics::EpisodeMetrics;
use crate::FlightCommand;
use log::{debug, info};
use nalgebra::Vector3;
use std::sync::Arc;

/// Per-episode bookkeeping of the reward engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EpisodeContext {
    /// Distance to the target at the previous evaluation.
    pub last_distance: f32,
    /// Evaluations since the episode began.
    pub step_count: u64,
    /// Reward accumulated since the episode began.
    pub cumulative_reward: f32,
    /// Forward velocity setpoint at the previous evaluation.
    pub last_velocity_x: f32,
    /// Lateral velocity setpoint at the previous evaluation.
    pub last_velocity_z: f32,
    /// Whether a terminal outcome has ended the episode.
    pub finished: bool,
    /// Whether the vehicle was outside the envelope at the previous evaluation.
    pub out_of_bounds: bool,
}

/// What the engine needs to know about the current target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetContext {
    /// Position being flown to.
    pub position: Vector3<f32>,
    /// Whether the target is where the vehicle should stop.
    pub final_destination: bool,
    /// Local target range sizing the shaping zones.
    pub local_range: f32,
}

/// Reward evaluation and terminal detection for one agent.
pub struct RewardEngine {
    shaper: RewardShaper,
    rewards: RewardConfig,
    zones: ZoneConfig,
    envelope: Envelope,
    regime: Regime,
    max_steps: u64,
    metrics: Arc<EpisodeMetrics>,
    context: EpisodeContext,
}

impl RewardEngine {
    /// Creates an engine reporting into `metrics`.
    pub fn new(config: &AutopilotConfig, metrics: Arc<EpisodeMetrics>) -> Self {
        Self {
            shaper: RewardShaper::new(config),
            rewards: config.rewards,
            zones: config.zones,
            envelope: config.envelope,
            regime: config.episode.regime,
            max_steps: config.episode.max_steps,
            metrics,
            context: EpisodeContext::default(),
        }
    }

    /// Clears the episode context and measures the first distance.
    pub fn begin_episode(&mut self, state: &VehicleState, target: &Vector3<f32>) {
        self.context = EpisodeContext {
            last_distance: state.distance_to(target),
            ..EpisodeContext::default()
        };
    }

    /// Re-measures the distance after the target changed, so the potential
    /// term does not see a jump.
    pub fn retarget(&mut self, state: &VehicleState, target: &Vector3<f32>) {
        self.context.last_distance = state.distance_to(target);
    }

    /// The running episode context.
    pub fn context(&self) -> &EpisodeContext {
        &self.context
    }

    /// The shared metrics.
    pub fn metrics(&self) -> &Arc<EpisodeMetrics> {
        &self.metrics
    }

    fn ends_episodes(&self) -> bool {
        self.regime == Regime::Training
    }

    fn finish(&mut self, result: StepResult) -> StepResult {
        self.context.cumulative_reward += result.reward;
        if result.episode_over {
            self.context.finished = true;
            debug!(
                "episode over after {} steps with reward {:.3}",
                self.context.step_count, self.context.cumulative_reward
            );
        }
        result
    }

    /// Scores one tick.
    ///
    /// Once an episode is over every further evaluation returns an empty
    /// result until [`RewardEngine::begin_episode`] is called.
    pub fn evaluate(
        &mut self,
        state: &VehicleState,
        target: &TargetContext,
        setpoints: &FlightCommand,
        probe: &dyn ObstacleProbe,
    ) -> StepResult {
        if self.context.finished {
            return StepResult::default();
        }
        self.context.step_count += 1;
        let _ = self.metrics.record_step();

        let out_of_bounds = !self.envelope.contains(&state.position);
        let entered = out_of_bounds && !self.context.out_of_bounds;
        self.context.out_of_bounds = out_of_bounds;
        if out_of_bounds {
            if self.ends_episodes() || entered {
                self.metrics
                    .record_failure(&Outcome::OutOfBounds.to_string(), &state.position);
            }
            let result = StepResult::terminal(
                Outcome::OutOfBounds,
                self.rewards.failure_penalty,
                self.ends_episodes(),
            );
            return self.finish(result);
        }

        let distance = state.distance_to(&target.position);
        if self.ends_episodes() && distance < self.zones.arrival_distance {
            let reward = self.rewards.arrival_reward + (-state.speed()).exp() * self.rewards.landing_bonus;
            self.metrics.record_success();
            info!(
                "Arrived at ({:.2}, {:.2}, {:.2}) after {} steps",
                target.position.x, target.position.y, target.position.z, self.context.step_count
            );
            return self.finish(StepResult::terminal(Outcome::Arrival, reward, true));
        }

        let setpoint_change = (setpoints.target_velocity_x - self.context.last_velocity_x).abs()
            + (setpoints.target_velocity_z - self.context.last_velocity_z).abs();
        let input = ShapingInput {
            target: target.position,
            previous_distance: self.context.last_distance,
            final_destination: target.final_destination,
            local_range: target.local_range,
            setpoint_change,
        };
        let shaped = self.shaper.shape(state, &input, probe);
        self.context.last_distance = distance;
        self.context.last_velocity_x = setpoints.target_velocity_x;
        self.context.last_velocity_z = setpoints.target_velocity_z;

        let mut result = StepResult::shaped(shaped);
        if self.ends_episodes() && self.max_steps > 0 && self.context.step_count >= self.max_steps {
            self.metrics.record_timeout(&state.position);
            result.outcome = Some(Outcome::Timeout);
            result.episode_over = true;
        }
        self.finish(result)
    }

    /// Scores a collision reported by the physics collaborator.
    pub fn report_collision(&mut self, kind: CollisionKind, position: &Vector3<f32>) -> StepResult {
        if self.context.finished {
            return StepResult::default();
        }
        let outcome = Outcome::Collision(kind);
        self.metrics.record_failure(&outcome.to_string(), position);
        let result = StepResult::terminal(outcome, self.rewards.failure_penalty, self.ends_episodes());
        self.finish(result)
    }
}
