// src/agent.rs

//! # Flight Agent
//!
//! Wires the arbiter, the cascaded controller and the reward engine into the
//! per-tick pipeline of one vehicle, and exposes a cloneable handle through
//! which other threads request scripted actions and waypoints.
//!
//! Each simulation step calls [`FlightAgent::actuate`] before physics and
//! [`FlightAgent::evaluate`] after it:
//!
//! ```
//! use free_flight_autopilot::agent::AgentBuilder;
//! use free_flight_autopilot::episode::EpisodeSetup;
//! use free_flight_autopilot::frames::{Attitude, VehicleState};
//! use free_flight_autopilot::reward::OpenField;
//! use nalgebra::Vector3;
//!
//! let target = Vector3::new(0.0, 2.0, 4.0);
//! let mut agent = AgentBuilder::new("uav0").target(target).build().unwrap();
//!
//! let start = Vector3::new(0.0, 2.0, 0.0);
//! agent.begin_episode(&EpisodeSetup::single_target(start, 0.0, target, 5.0));
//!
//! let state = VehicleState::at_rest(start, Attitude::level(0.0));
//! let output = agent.actuate(&state, Some([0.5, 0.0, 0.0, 0.0]), 0.02);
//! assert!(output.actuation.thrust > 0.0);
//!
//! let step = agent.evaluate(&state, &OpenField);
//! assert!(!step.episode_over);
//! ```

use crate::arbiter::{ActionReport, ControllerReset, Mode, TaskArbiter};
use crate::command::ACTION_SIZE;
use crate::config::{AutopilotConfig, ManeuverConfig};
use crate::episode::{CurriculumSampler, EpisodeSetup};
use crate::error::ConfigError;
use crate::frames::{ros_to_sim_orientation, ros_to_sim_position, Attitude, VehicleState};
use crate::metrics::EpisodeMetrics;
use crate::observation::{observe, OBSERVATION_SIZE};
use crate::reward::{CollisionKind, ObstacleProbe, RewardEngine, StepResult, TargetContext};
use crate::tasks::{ActionQueue, ScriptedAction, Waypoint};
use crate::telemetry::{ActionFeedback, FlightStatus, Telemetry};
use crate::{Actuation, CascadedFlightController, FlightCommand, FlightStabilizer};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{error, info, warn};
use nalgebra::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Acknowledgement of an action request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    /// Whether the action was queued.
    pub success: bool,
    /// Human-readable detail.
    pub message: String,
}

impl ActionResponse {
    fn accepted() -> Self {
        Self {
            success: true,
            message: "Action queued successfully.".to_string(),
        }
    }

    fn rejected(reason: impl ToString) -> Self {
        Self {
            success: false,
            message: reason.to_string(),
        }
    }
}

/// Thread-safe entry point for external requests.
#[derive(Debug, Clone)]
pub struct AgentHandle {
    name: String,
    actions: Arc<ActionQueue>,
    targets: Sender<Waypoint>,
    maneuvers: ManeuverConfig,
}

impl AgentHandle {
    /// Parses and queues a scripted action. Unknown or malformed requests are
    /// rejected without touching the queue.
    pub fn execute_action(&self, action_type: &str, params: &HashMap<String, f32>) -> ActionResponse {
        match ScriptedAction::parse(action_type, params, &self.maneuvers) {
            Ok(action) => {
                let pending = self.actions.push(action);
                info!("[{}] queued action {} ({} pending)", self.name, action, pending);
                ActionResponse::accepted()
            }
            Err(err) => {
                error!("[{}] rejected action request '{}': {}", self.name, action_type, err);
                ActionResponse::rejected(err)
            }
        }
    }

    /// Sends a simulator-frame waypoint to the agent. It is applied at the
    /// start of the next tick.
    ///
    /// A zero or non-finite orientation is replaced with identity. Returns
    /// `false` when the agent no longer exists.
    pub fn set_target(&self, position: Vector3<f32>, orientation: Quaternion<f32>) -> bool {
        let (waypoint, corrected) = Waypoint::from_target(position, orientation);
        if corrected {
            warn!(
                "[{}] target orientation {:?} is invalid, using identity",
                self.name, orientation.coords
            );
        }
        if self.targets.send(waypoint).is_err() {
            warn!("[{}] agent is gone, dropping target", self.name);
            return false;
        }
        true
    }

    /// Like [`AgentHandle::set_target`] for a pose given in the ROS frame.
    pub fn set_ros_target(&self, position: Vector3<f32>, orientation: Quaternion<f32>) -> bool {
        self.set_target(ros_to_sim_position(&position), ros_to_sim_orientation(&orientation))
    }

    /// Name of the agent.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Output of [`FlightAgent::actuate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// Torque and thrust to apply.
    pub actuation: Actuation,
    /// Command the controller tracked.
    pub command: FlightCommand,
    /// Camera gimbal pitch in degrees.
    pub gimbal_pitch: f32,
    /// Mode after the tick.
    pub mode: Mode,
    /// Action whose completion was announced this tick.
    pub completed: Option<ActionReport>,
}

/// Builds a [`FlightAgent`].
pub struct AgentBuilder {
    name: String,
    config: AutopilotConfig,
    metrics: Option<Arc<EpisodeMetrics>>,
    feedback: Option<Sender<ActionFeedback>>,
    target: Option<Vector3<f32>>,
}

impl AgentBuilder {
    /// Starts a builder with the default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: AutopilotConfig::default(),
            metrics: None,
            feedback: None,
            target: None,
        }
    }

    /// Uses `config` instead of the defaults.
    pub fn config(mut self, config: AutopilotConfig) -> Self {
        self.config = config;
        self
    }

    /// Reports into shared `metrics`. A private collector is created otherwise.
    pub fn metrics(mut self, metrics: Arc<EpisodeMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Delivers completion events to `feedback`.
    pub fn feedback(mut self, feedback: Sender<ActionFeedback>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    /// Initial target. The agent holds there until the first episode begins.
    pub fn target(mut self, target: Vector3<f32>) -> Self {
        self.target = Some(target);
        self
    }

    /// Validates the configuration and builds the agent.
    pub fn build(self) -> Result<FlightAgent, ConfigError> {
        let name = self.name;
        if let Err(err) = self.config.validate() {
            error!("[{}] invalid configuration: {}", name, err);
            return Err(err);
        }
        let target = match self.target {
            Some(target) => target,
            None => {
                let err = ConfigError::MissingCollaborator("target");
                error!("[{}] {}, agent disabled", name, err);
                return Err(err);
            }
        };

        let config = self.config;
        let metrics = self
            .metrics
            .unwrap_or_else(|| Arc::new(EpisodeMetrics::new(config.episode.report_interval)));
        let actions = Arc::new(ActionQueue::new());
        let (targets, inbox) = unbounded();
        if self.feedback.is_none() {
            warn!("[{}] no feedback sink, action completions will not be delivered", name);
        }

        let mut agent = FlightAgent {
            arbiter: TaskArbiter::new(name.clone(), &config, actions),
            controller: CascadedFlightController::with_config(&config),
            rewards: RewardEngine::new(&config, metrics),
            targets,
            inbox,
            feedback: self.feedback,
            local_range: config.zones.local_target_range,
            last_command: FlightCommand::default(),
            config,
            name,
        };
        let local_range = agent.local_range;
        agent.begin_episode(&EpisodeSetup::single_target(target, 0.0, target, local_range));
        info!("[{}] agent ready in {:?}", agent.name, agent.config.episode.regime);
        Ok(agent)
    }
}

/// One autopiloted vehicle.
pub struct FlightAgent {
    name: String,
    config: AutopilotConfig,
    arbiter: TaskArbiter,
    controller: CascadedFlightController,
    rewards: RewardEngine,
    targets: Sender<Waypoint>,
    inbox: Receiver<Waypoint>,
    feedback: Option<Sender<ActionFeedback>>,
    local_range: f32,
    last_command: FlightCommand,
}

impl FlightAgent {
    /// A handle for requests from other threads.
    pub fn handle(&self) -> AgentHandle {
        AgentHandle {
            name: self.name.clone(),
            actions: Arc::clone(self.arbiter.actions()),
            targets: self.targets.clone(),
            maneuvers: self.config.maneuvers,
        }
    }

    /// Starts an episode from `setup`. The vehicle is assumed to be placed
    /// at rest at `setup.start` by the physics collaborator.
    pub fn begin_episode(&mut self, setup: &EpisodeSetup) {
        match self.arbiter.begin_episode(setup) {
            ControllerReset::Full => self.controller.reset(),
            ControllerReset::Attitude => self.controller.reset_attitude(),
        }
        self.local_range = setup.local_range;
        self.last_command = *self.arbiter.shaper().setpoints();
        let start = VehicleState::at_rest(setup.start, Attitude::level(setup.start_yaw));
        self.rewards.begin_episode(&start, &self.arbiter.target().position);
    }

    /// Samples a training episode, announces lesson changes and starts it.
    pub fn begin_sampled_episode(
        &mut self,
        sampler: &mut CurriculumSampler,
        probe: &dyn ObstacleProbe,
    ) -> EpisodeSetup {
        let _ = self.rewards.metrics().observe_lesson(sampler.curriculum());
        let setup = sampler.sample(probe);
        self.begin_episode(&setup);
        setup
    }

    /// Runs arbitration and control for one tick.
    pub fn actuate(&mut self, state: &VehicleState, action: Option<[f32; ACTION_SIZE]>, dt: f32) -> TickOutput {
        while let Ok(waypoint) = self.inbox.try_recv() {
            let _ = self.arbiter.enqueue_waypoint(waypoint);
        }

        let tick = self.arbiter.tick(state, action, dt);
        match tick.reset {
            Some(ControllerReset::Full) => self.controller.reset(),
            Some(ControllerReset::Attitude) => self.controller.reset_attitude(),
            None => {}
        }
        if tick.retargeted {
            self.rewards.retarget(state, &self.arbiter.target().position);
        }

        let actuation = self.controller.control(&tick.command, state, dt);
        if tick.completed.is_some() {
            self.announce_completion();
        }
        self.last_command = tick.command;

        TickOutput {
            actuation,
            command: tick.command,
            gimbal_pitch: tick.gimbal_pitch,
            mode: self.arbiter.mode(),
            completed: tick.completed,
        }
    }

    fn announce_completion(&self) {
        match &self.feedback {
            Some(feedback) => {
                if feedback.send(ActionFeedback::ActionComplete).is_err() {
                    warn!("[{}] feedback receiver is gone", self.name);
                }
            }
            None => warn!(
                "[{}] {} not delivered, no feedback sink",
                self.name,
                ActionFeedback::ActionComplete.as_str()
            ),
        }
    }

    /// Scores the state reached after physics advanced the vehicle.
    pub fn evaluate(&mut self, state: &VehicleState, probe: &dyn ObstacleProbe) -> StepResult {
        let target = TargetContext {
            position: self.arbiter.target().position,
            final_destination: self.arbiter.is_final_destination(),
            local_range: self.local_range,
        };
        let result = self.rewards.evaluate(state, &target, &self.last_command, probe);
        if let (Some(outcome), true) = (result.outcome, result.episode_over) {
            info!(
                "[{}] episode ended: {}, cumulative reward {:.3}",
                self.name,
                outcome,
                self.rewards.context().cumulative_reward
            );
        }
        result
    }

    /// Scores a collision reported by the physics collaborator.
    pub fn report_collision(&mut self, kind: CollisionKind, state: &VehicleState) -> StepResult {
        self.rewards.report_collision(kind, &state.position)
    }

    /// Observation for the policy.
    pub fn observation(&self, state: &VehicleState) -> [f32; OBSERVATION_SIZE] {
        observe(
            state,
            &self.arbiter.target().position,
            self.arbiter.lookahead().map(|waypoint| &waypoint.position),
            self.arbiter.shaper().normalized_setpoints(),
        )
    }

    /// Activity for the telemetry collaborator.
    pub fn status(&self, state: &VehicleState) -> FlightStatus {
        FlightStatus::from_mode(self.arbiter.mode(), state.position.y, self.config.maneuvers.ground_height)
    }

    /// Snapshot for the telemetry collaborator.
    pub fn telemetry(&self, state: &VehicleState) -> Telemetry {
        Telemetry::capture(self.status(state), state)
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.arbiter.mode()
    }

    /// The arbiter.
    pub fn arbiter(&self) -> &TaskArbiter {
        &self.arbiter
    }

    /// The flight controller.
    pub fn controller(&self) -> &CascadedFlightController {
        &self.controller
    }

    /// The reward engine.
    pub fn rewards(&self) -> &RewardEngine {
        &self.rewards
    }

    /// The configuration in use.
    pub fn config(&self) -> &AutopilotConfig {
        &self.config
    }

    /// Name used to prefix log lines.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Regime;
    use crate::error::ActionError;
    use crate::test_utils::*;
    use std::thread;

    fn external(feedback: Option<Sender<ActionFeedback>>) -> FlightAgent {
        let mut config = AutopilotConfig::default();
        config.episode.regime = Regime::ExternalCommand;
        config.policy.seed = Some(2);
        let mut builder = AgentBuilder::new("uav").config(config).target(Vector3::new(0.0, 2.0, 0.0));
        if let Some(feedback) = feedback {
            builder = builder.feedback(feedback);
        }
        let mut agent = builder.build().unwrap();
        agent.begin_episode(&EpisodeSetup::hold_at(Vector3::new(0.0, 2.0, 0.0), 0.0, 5.0));
        agent
    }

    fn params(pairs: &[(&str, f32)]) -> HashMap<String, f32> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    /// Test that a missing target or invalid configuration disables the agent.
    #[test]
    fn test_build_requires_target_and_valid_config() {
        let missing = AgentBuilder::new("uav").build();
        assert!(matches!(missing, Err(ConfigError::MissingCollaborator("target"))));

        let mut config = AutopilotConfig::default();
        config.vehicle.mass = 0.0;
        let invalid = AgentBuilder::new("uav").config(config).target(Vector3::zeros()).build();
        assert!(matches!(invalid, Err(ConfigError::Invalid { .. })));
    }

    /// Test that unknown actions are rejected without queuing anything.
    #[test]
    fn test_execute_action_validates() {
        let agent = external(None);
        let handle = agent.handle();

        let response = handle.execute_action("barrel_roll", &HashMap::new());
        assert!(!response.success);
        assert_eq!(
            ActionError::UnknownActionType("barrel_roll".into()).to_string(),
            response.message
        );
        assert!(agent.arbiter().actions().is_empty());

        let response = handle.execute_action("rotate_drone_yaw_relative", &HashMap::new());
        assert!(!response.success);
        assert!(agent.arbiter().actions().is_empty());

        let response = handle.execute_action("wait", &params(&[("duration", 1.0)]));
        assert!(response.success);
        assert_eq!("Action queued successfully.", response.message);
        assert_eq!(1, agent.arbiter().actions().len());
    }

    /// Test that a target set from another thread is applied on the next tick,
    /// with a zero orientation corrected to identity.
    #[test]
    fn test_set_target_from_another_thread() {
        let mut agent = external(None);
        let handle = agent.handle();

        let sent = thread::spawn(move || {
            handle.set_target(Vector3::new(0.0, 2.0, 6.0), Quaternion::new(0.0, 0.0, 0.0, 0.0))
        })
        .join()
        .unwrap();
        assert!(sent);
        assert_eq!(Mode::AwaitingExternalTarget, agent.mode());

        let state = hovering_at(2.0, 0.0);
        let output = agent.actuate(&state, None, 0.02);

        assert_eq!(Mode::Navigating, output.mode);
        assert_eq!(Vector3::new(0.0, 2.0, 6.0), agent.arbiter().target().position);
        assert!(value_close(0.0, agent.arbiter().target().heading()));
        assert!(agent.controller().trace().yaw_error.abs() < TEST_TOLERANCE);
        assert_eq!(FlightStatus::Navigating, agent.status(&state));
    }

    /// Test that a ROS-frame target lands in the simulator frame.
    #[test]
    fn test_set_ros_target_converts_frame() {
        let mut agent = external(None);
        let handle = agent.handle();
        assert!(handle.set_ros_target(Vector3::new(6.0, 0.0, 2.0), Quaternion::identity()));

        let _ = agent.actuate(&hovering_at(2.0, 0.0), None, 0.02);

        assert!(vector_close(Vector3::new(0.0, 2.0, 6.0), agent.arbiter().target().position));
    }

    /// Test that one completion event is delivered per finished action.
    #[test]
    fn test_action_complete_feedback() {
        let (sender, receiver) = unbounded();
        let mut agent = external(Some(sender));
        let handle = agent.handle();
        assert!(handle.execute_action("wait", &params(&[("duration", 0.5)])).success);

        let state = hovering_at(2.0, 0.0);
        let mut statuses = Vec::new();
        for _ in 0..6 {
            let output = agent.actuate(&state, None, 0.25);
            statuses.push(agent.status(&state));
            if output.completed.is_some() {
                break;
            }
        }

        assert_eq!(Ok(ActionFeedback::ActionComplete), receiver.try_recv());
        assert!(receiver.try_recv().is_err());
        assert_eq!(Some(&FlightStatus::PerformingAction), statuses.first());
        assert_eq!(FlightStatus::Hovering, agent.status(&state));
    }

    /// Test the observation and telemetry accessors.
    #[test]
    fn test_observation_and_telemetry() {
        let agent = external(None);
        let state = hovering_at(2.0, 0.0);

        let observation = agent.observation(&state);
        assert_eq!(OBSERVATION_SIZE, observation.len());
        assert_eq!(0.0, observation[13]);

        let telemetry = agent.telemetry(&state);
        assert_eq!(FlightStatus::Hovering, telemetry.status);
        assert_eq!(state.position, telemetry.position);

        let grounded = hovering_at(0.1, 0.0);
        assert_eq!(FlightStatus::IdleOnGround, agent.status(&grounded));
    }
}
