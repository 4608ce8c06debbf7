// src/arbiter.rs

//! # Task/Mode Arbiter
//!
//! Decides every tick which source governs the flight command: the learned
//! policy, a queued scripted maneuver, waypoint navigation, or a hover while
//! awaiting the next external target.
//!
//! The regime is fixed per episode. Training runs the policy toward a
//! sampled target; external-command operation navigates a FIFO of waypoints
//! supplied by a caller. Scripted actions interrupt either regime but never
//! start while a waypoint is being navigated, and once started they run to
//! completion or timeout, followed by a stabilization hover.
//!
//! Within one tick the arbiter checks arrival first, then starts a pending
//! action if allowed, then builds the command.

use crate::command::{CommandShaper, ACTION_SIZE};
use crate::config::{AutopilotConfig, ManeuverConfig, Regime};
use crate::episode::EpisodeSetup;
use crate::frames::VehicleState;
use crate::tasks::{
    ActionDirective, ActionOutcome, ActionProgress, ActionQueue, ScriptedAction, Waypoint, WaypointQueue,
};
use crate::{FlightCommand, HeadingTarget};
use log::{debug, error, info};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which source governs the flight command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// The learned policy flies toward the episode target.
    PolicyControl,
    /// A scripted maneuver runs, or the hover that follows it.
    ScriptedAction,
    /// Hovering until an external caller supplies a waypoint.
    AwaitingExternalTarget,
    /// Flying toward the current waypoint.
    Navigating,
}

/// Which controller loops must discard their accumulated state.
///
/// Ordered so that merging two requests keeps the wider one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ControllerReset {
    /// Pitch, roll and yaw loops.
    Attitude,
    /// Every loop.
    Full,
}

/// A scripted action that has finished and settled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionReport {
    /// The action.
    pub action: ScriptedAction,
    /// How it ended.
    pub outcome: ActionOutcome,
}

/// Everything the arbiter decided for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Command for the flight controller.
    pub command: FlightCommand,
    /// Controller state to discard before actuating.
    pub reset: Option<ControllerReset>,
    /// Whether the current target changed this tick.
    pub retargeted: bool,
    /// Action whose completion must be announced.
    pub completed: Option<ActionReport>,
    /// Camera gimbal pitch in degrees.
    pub gimbal_pitch: f32,
}

#[derive(Debug, Clone, Copy)]
enum Script {
    Idle,
    Running(ActionProgress),
    Settling { report: ActionReport, remaining: f32 },
}

/// Mode state machine of one agent.
pub struct TaskArbiter {
    name: String,
    regime: Regime,
    maneuvers: ManeuverConfig,
    arrival_distance: f32,
    mode: Mode,
    actions: Arc<ActionQueue>,
    waypoints: WaypointQueue,
    script: Script,
    scripted_heading: Option<f32>,
    waypoint_heading: Option<f32>,
    target: Waypoint,
    lookahead: Option<Waypoint>,
    final_destination: bool,
    shaper: CommandShaper,
    gimbal_pitch: f32,
    pending_reset: Option<ControllerReset>,
    retargeted: bool,
}

impl TaskArbiter {
    /// Creates an arbiter consuming `actions`. It hovers at the origin until
    /// [`TaskArbiter::begin_episode`] is called.
    pub fn new(name: impl Into<String>, config: &AutopilotConfig, actions: Arc<ActionQueue>) -> Self {
        Self::with_shaper(name, config, actions, CommandShaper::new(config))
    }

    /// Creates an arbiter shaping policy actions with `shaper`.
    pub fn with_shaper(
        name: impl Into<String>,
        config: &AutopilotConfig,
        actions: Arc<ActionQueue>,
        shaper: CommandShaper,
    ) -> Self {
        let regime = config.episode.regime;
        Self {
            name: name.into(),
            regime,
            maneuvers: config.maneuvers,
            arrival_distance: config.zones.arrival_distance,
            mode: match regime {
                Regime::Training => Mode::PolicyControl,
                Regime::ExternalCommand => Mode::AwaitingExternalTarget,
            },
            actions,
            waypoints: WaypointQueue::new(),
            script: Script::Idle,
            scripted_heading: None,
            waypoint_heading: None,
            target: Waypoint::at(Vector3::zeros()),
            lookahead: None,
            final_destination: true,
            shaper,
            gimbal_pitch: 0.0,
            pending_reset: None,
            retargeted: false,
        }
    }

    /// Restarts the state machine for a new episode. Every controller loop
    /// must be reset.
    ///
    /// Training clears both queues and flies to the sampled target. The
    /// external regime keeps queued requests, hovers at the start and picks
    /// up a waypoint that is already waiting.
    pub fn begin_episode(&mut self, setup: &EpisodeSetup) -> ControllerReset {
        self.shaper.reset(setup.start.y, setup.start_yaw);
        self.script = Script::Idle;
        self.scripted_heading = None;
        self.waypoint_heading = None;

        match self.regime {
            Regime::Training => {
                self.waypoints.clear();
                let dropped = self.actions.clear();
                if dropped > 0 {
                    debug!("[{}] dropped {} queued actions at episode start", self.name, dropped);
                }
                self.mode = Mode::PolicyControl;
                self.target = Waypoint::at(setup.target);
                self.lookahead = setup.lookahead.map(Waypoint::at);
                self.final_destination = setup.final_destination;
            }
            Regime::ExternalCommand => {
                self.mode = Mode::AwaitingExternalTarget;
                self.target = Waypoint::at(setup.start);
                self.lookahead = None;
                self.final_destination = true;
                if !self.waypoints.is_empty() {
                    self.advance_waypoint();
                }
            }
        }
        info!("[{}] episode started in {:?}", self.name, self.mode);

        self.pending_reset = None;
        self.retargeted = false;
        ControllerReset::Full
    }

    /// Appends a waypoint. Returns `false` when the training regime ignores it.
    pub fn enqueue_waypoint(&mut self, waypoint: Waypoint) -> bool {
        if self.regime == Regime::Training {
            info!("[{}] ignoring waypoint while training", self.name);
            return false;
        }
        self.waypoints.push(waypoint);
        info!(
            "[{}] waypoint queued at {:?}, {} pending",
            self.name,
            waypoint.position,
            self.waypoints.len()
        );
        match self.mode {
            Mode::AwaitingExternalTarget => self.advance_waypoint(),
            Mode::Navigating if self.lookahead.is_none() => {
                self.lookahead = Some(waypoint);
                self.final_destination = false;
            }
            _ => {}
        }
        true
    }

    fn request_reset(&mut self, reset: ControllerReset) {
        self.pending_reset = self.pending_reset.max(Some(reset));
    }

    fn advance_waypoint(&mut self) {
        match self.waypoints.pop() {
            Some(waypoint) => {
                self.mode = Mode::Navigating;
                self.target = waypoint;
                self.waypoint_heading = Some(waypoint.heading());
                self.lookahead = self.waypoints.peek().copied();
                self.final_destination = self.lookahead.is_none();
                self.shaper.zero_motion();
                self.request_reset(ControllerReset::Full);
                self.retargeted = true;
                info!(
                    "[{}] navigating to {:?}, heading {:.1}",
                    self.name,
                    waypoint.position,
                    waypoint.heading()
                );
            }
            None => {
                self.mode = Mode::AwaitingExternalTarget;
                self.lookahead = None;
                let yaw = self.waypoint_heading.take().unwrap_or_else(|| self.shaper.free_yaw());
                let _ = self.shaper.hover(yaw);
                info!("[{}] all waypoints reached, awaiting next target", self.name);
            }
        }
    }

    fn start_action(&mut self, action: ScriptedAction, state: &VehicleState) {
        let progress = action.start(state, self.gimbal_pitch);
        self.mode = Mode::ScriptedAction;
        self.request_reset(ControllerReset::Attitude);
        let _ = self.shaper.hover(state.attitude.yaw);
        self.waypoint_heading = None;
        self.scripted_heading = progress.target_yaw();
        self.script = Script::Running(progress);
        info!("[{}] starting action: {}", self.name, action);
    }

    fn finish_action(&mut self, report: ActionReport) {
        self.script = Script::Idle;
        if let Some(yaw) = self.scripted_heading.take() {
            let _ = self.shaper.hover(yaw);
        }
        info!("[{}] action finished: {} ({:?})", self.name, report.action, report.outcome);
        match self.regime {
            Regime::Training => self.mode = Mode::PolicyControl,
            Regime::ExternalCommand if self.waypoints.is_empty() => {
                self.mode = Mode::AwaitingExternalTarget;
            }
            Regime::ExternalCommand => self.advance_waypoint(),
        }
    }

    fn scripted_command(&mut self, state: &VehicleState, dt: f32) -> (FlightCommand, Option<ActionReport>) {
        self.shaper.zero_motion();
        let mut command = *self.shaper.setpoints();
        let mut completed = None;

        match self.script {
            Script::Running(mut progress) => {
                let step = progress.advance(state, dt, &self.maneuvers);
                match step.directive {
                    ActionDirective::Hold | ActionDirective::Heading(_) => {}
                    ActionDirective::Altitude(altitude) => {
                        self.shaper.set_altitude(altitude);
                        command.target_altitude = altitude;
                    }
                    ActionDirective::Reverse(speed) => command.target_velocity_x = -speed,
                    ActionDirective::Gimbal(pitch) => self.gimbal_pitch = pitch,
                }
                self.script = match step.outcome {
                    Some(outcome) => {
                        if outcome == ActionOutcome::TimedOut {
                            error!("[{}] action timed out: {}", self.name, progress.action());
                        }
                        self.request_reset(ControllerReset::Attitude);
                        Script::Settling {
                            report: ActionReport {
                                action: *progress.action(),
                                outcome,
                            },
                            remaining: self.maneuvers.stabilization_wait,
                        }
                    }
                    None => Script::Running(progress),
                };
            }
            Script::Settling { report, remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    completed = Some(report);
                } else {
                    self.script = Script::Settling { report, remaining };
                }
            }
            Script::Idle => {}
        }

        if let Some(yaw) = self.scripted_heading {
            command.heading = HeadingTarget::Scripted(yaw);
        }
        match completed {
            Some(report) => self.finish_action(report),
            None if matches!(self.script, Script::Idle) => {
                // Nothing left to run.
                self.mode = match self.regime {
                    Regime::Training => Mode::PolicyControl,
                    Regime::ExternalCommand => Mode::AwaitingExternalTarget,
                };
            }
            None => {}
        }
        (command, completed)
    }

    /// Advances the state machine by one tick and produces the command.
    ///
    /// `action` is the policy output for this tick, if the policy decided;
    /// without one the previous policy setpoints are held.
    pub fn tick(&mut self, state: &VehicleState, action: Option<[f32; ACTION_SIZE]>, dt: f32) -> Tick {
        if self.mode == Mode::Navigating && state.distance_to(&self.target.position) < self.arrival_distance {
            info!("[{}] reached waypoint {:?}", self.name, self.target.position);
            self.advance_waypoint();
        }

        if !matches!(self.mode, Mode::ScriptedAction | Mode::Navigating) {
            if let Some(next) = self.actions.pop() {
                self.start_action(next, state);
            }
        }

        let mut completed = None;
        let command = match self.mode {
            Mode::ScriptedAction => {
                let (command, report) = self.scripted_command(state, dt);
                completed = report;
                command
            }
            Mode::AwaitingExternalTarget => {
                self.shaper.zero_motion();
                *self.shaper.setpoints()
            }
            Mode::PolicyControl | Mode::Navigating => {
                let mut command = match action {
                    Some(action) => self.shaper.apply(action, dt, self.regime == Regime::Training),
                    None => *self.shaper.setpoints(),
                };
                if let (Mode::Navigating, Some(yaw)) = (self.mode, self.waypoint_heading) {
                    command.heading = HeadingTarget::Waypoint(yaw);
                }
                command
            }
        };

        Tick {
            command,
            reset: self.pending_reset.take(),
            retargeted: std::mem::take(&mut self.retargeted),
            completed,
            gimbal_pitch: self.gimbal_pitch,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Top-level regime.
    pub fn regime(&self) -> Regime {
        self.regime
    }

    /// The target being flown to.
    pub fn target(&self) -> &Waypoint {
        &self.target
    }

    /// The waypoint after the current target, if known.
    pub fn lookahead(&self) -> Option<&Waypoint> {
        self.lookahead.as_ref()
    }

    /// Whether the current target is where the vehicle should stop.
    pub fn is_final_destination(&self) -> bool {
        self.final_destination
    }

    /// Number of waypoints queued behind the current target.
    pub fn pending_waypoints(&self) -> usize {
        self.waypoints.len()
    }

    /// The scripted action in progress, if one is running.
    pub fn current_action(&self) -> Option<&ScriptedAction> {
        match &self.script {
            Script::Running(progress) => Some(progress.action()),
            Script::Settling { report, .. } => Some(&report.action),
            Script::Idle => None,
        }
    }

    /// Camera gimbal pitch in degrees.
    pub fn gimbal_pitch(&self) -> f32 {
        self.gimbal_pitch
    }

    /// The shared scripted action queue.
    pub fn actions(&self) -> &Arc<ActionQueue> {
        &self.actions
    }

    /// The policy command shaper.
    pub fn shaper(&self) -> &CommandShaper {
        &self.shaper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::Attitude;
    use crate::test_utils::*;
    use nalgebra::Quaternion;

    fn new_arbiter(regime: Regime) -> TaskArbiter {
        let mut config = AutopilotConfig::default();
        config.episode.regime = regime;
        config.policy.seed = Some(1);
        config.policy.noise = 0.0;
        let mut arbiter = TaskArbiter::new("test", &config, Arc::new(ActionQueue::new()));
        let reset = arbiter.begin_episode(&EpisodeSetup::hold_at(Vector3::new(0.0, 2.0, 0.0), 0.0, 5.0));
        assert_eq!(ControllerReset::Full, reset);
        arbiter
    }

    fn waypoint(x: f32, z: f32) -> Waypoint {
        Waypoint::at(Vector3::new(x, 2.0, z))
    }

    fn wait(duration: f32) -> ScriptedAction {
        ScriptedAction::Wait { duration }
    }

    /// Test that training starts under policy control and ignores waypoints.
    #[test]
    fn test_training_regime() {
        let mut arbiter = new_arbiter(Regime::Training);
        assert_eq!(Mode::PolicyControl, arbiter.mode());
        assert!(!arbiter.enqueue_waypoint(waypoint(3.0, 0.0)));
        assert_eq!(0, arbiter.pending_waypoints());

        let tick = arbiter.tick(&hovering_at(2.0, 0.0), Some([1.0, 0.0, 0.0, 0.0]), 0.02);
        assert_eq!(Mode::PolicyControl, arbiter.mode());
        assert!(tick.command.target_velocity_x > 0.0);
        assert_eq!(None, tick.reset);
    }

    /// Test that a waypoint arriving while awaiting starts navigation at once.
    #[test]
    fn test_waypoint_starts_navigation() {
        let mut arbiter = new_arbiter(Regime::ExternalCommand);
        assert_eq!(Mode::AwaitingExternalTarget, arbiter.mode());

        let (target, _) = Waypoint::from_target(
            Vector3::new(0.0, 2.0, 10.0),
            Attitude::level(45.0).orientation().into_inner(),
        );
        assert!(arbiter.enqueue_waypoint(target));
        assert_eq!(Mode::Navigating, arbiter.mode());
        assert!(arbiter.is_final_destination());

        let tick = arbiter.tick(&hovering_at(2.0, 0.0), None, 0.02);
        assert_eq!(Some(ControllerReset::Full), tick.reset);
        assert!(tick.retargeted);
        match tick.command.heading {
            HeadingTarget::Waypoint(yaw) => assert!((yaw - 45.0).abs() < 1e-3),
            other => panic!("expected a waypoint heading, got {:?}", other),
        }

        let tick = arbiter.tick(&hovering_at(2.0, 0.0), None, 0.02);
        assert_eq!(None, tick.reset);
        assert!(!tick.retargeted);
    }

    /// Test arrival, lookahead tracking and the return to awaiting.
    #[test]
    fn test_arrival_advances_with_lookahead() {
        let mut arbiter = new_arbiter(Regime::ExternalCommand);
        arbiter.enqueue_waypoint(waypoint(0.0, 5.0));
        arbiter.enqueue_waypoint(waypoint(0.0, 10.0));
        arbiter.enqueue_waypoint(waypoint(5.0, 10.0));

        // The first waypoint started navigation before the others arrived.
        assert_eq!(Vector3::new(0.0, 2.0, 5.0), arbiter.target().position);
        assert_eq!(2, arbiter.pending_waypoints());

        let near_first = VehicleState::at_rest(Vector3::new(0.0, 2.0, 4.5), Attitude::level(0.0));
        let tick = arbiter.tick(&near_first, None, 0.02);
        assert!(tick.retargeted);
        assert_eq!(Vector3::new(0.0, 2.0, 10.0), arbiter.target().position);
        assert_eq!(Vector3::new(5.0, 2.0, 10.0), arbiter.lookahead().unwrap().position);
        assert!(!arbiter.is_final_destination());

        let near_second = VehicleState::at_rest(Vector3::new(0.0, 2.0, 9.5), Attitude::level(0.0));
        let _ = arbiter.tick(&near_second, None, 0.02);
        assert!(arbiter.lookahead().is_none());
        assert!(arbiter.is_final_destination());

        let near_last = VehicleState::at_rest(Vector3::new(4.5, 2.0, 10.0), Attitude::level(0.0));
        let tick = arbiter.tick(&near_last, None, 0.02);
        assert_eq!(Mode::AwaitingExternalTarget, arbiter.mode());
        assert!(!tick.command.is_moving());
    }

    /// Test that a wait action completes only after the stabilization hover.
    #[test]
    fn test_action_lifecycle() {
        let mut arbiter = new_arbiter(Regime::ExternalCommand);
        arbiter.actions().push(wait(1.0));
        let state = hovering_at(2.0, 0.0);

        let tick = arbiter.tick(&state, None, 0.25);
        assert_eq!(Mode::ScriptedAction, arbiter.mode());
        assert_eq!(Some(ControllerReset::Attitude), tick.reset);
        assert_eq!(Some(&wait(1.0)), arbiter.current_action());

        for _ in 0..4 {
            let tick = arbiter.tick(&state, None, 0.25);
            assert_eq!(None, tick.completed);
            assert_eq!(Mode::ScriptedAction, arbiter.mode());
        }
        let tick = arbiter.tick(&state, None, 0.25);
        assert_eq!(
            Some(ActionReport {
                action: wait(1.0),
                outcome: ActionOutcome::Completed,
            }),
            tick.completed
        );
        assert_eq!(Mode::AwaitingExternalTarget, arbiter.mode());
        assert!(arbiter.current_action().is_none());
    }

    /// Test that the settling hover requests an attitude reset on completion.
    #[test]
    fn test_completion_resets_attitude() {
        let mut arbiter = new_arbiter(Regime::ExternalCommand);
        arbiter.actions().push(wait(0.25));
        let state = hovering_at(2.0, 0.0);

        let first = arbiter.tick(&state, None, 0.25);
        assert_eq!(Some(ControllerReset::Attitude), first.reset);
        assert_eq!(None, first.completed);
    }

    /// Test that actions wait for navigation to finish and that waypoints
    /// queued during an action are flown afterwards.
    #[test]
    fn test_actions_and_navigation_are_exclusive() {
        let mut arbiter = new_arbiter(Regime::ExternalCommand);
        arbiter.enqueue_waypoint(waypoint(0.0, 5.0));
        arbiter.actions().push(wait(0.25));

        let far = hovering_at(2.0, 0.0);
        let _ = arbiter.tick(&far, None, 0.25);
        assert_eq!(Mode::Navigating, arbiter.mode());
        assert_eq!(1, arbiter.actions().len());

        let there = VehicleState::at_rest(Vector3::new(0.0, 2.0, 5.0), Attitude::level(0.0));
        let _ = arbiter.tick(&there, None, 0.25);
        assert_eq!(Mode::ScriptedAction, arbiter.mode());

        assert!(arbiter.enqueue_waypoint(waypoint(0.0, 8.0)));
        assert_eq!(Mode::ScriptedAction, arbiter.mode());

        let mut completed = None;
        for _ in 0..8 {
            let tick = arbiter.tick(&there, None, 0.25);
            completed = completed.or(tick.completed);
            if completed.is_some() {
                break;
            }
        }
        assert!(completed.is_some());
        assert_eq!(Mode::Navigating, arbiter.mode());
        assert_eq!(Vector3::new(0.0, 2.0, 8.0), arbiter.target().position);
    }

    /// Test that scripted rotations steer toward an absolute heading.
    #[test]
    fn test_rotation_sets_scripted_heading() {
        let mut arbiter = new_arbiter(Regime::ExternalCommand);
        arbiter.actions().push(ScriptedAction::RotateYawRelative { angle: 90.0 });

        let tick = arbiter.tick(&hovering_at(2.0, 150.0), None, 0.1);

        assert_eq!(HeadingTarget::Scripted(-120.0), tick.command.heading);
        assert!(!tick.command.is_moving());
    }

    /// Test that a backup flies backward and a takeoff raises the altitude.
    #[test]
    fn test_motion_directives() {
        let mut arbiter = new_arbiter(Regime::ExternalCommand);
        arbiter.actions().push(ScriptedAction::Backup {
            distance: 2.0,
            duration: 1.0,
        });
        let tick = arbiter.tick(&hovering_at(2.0, 0.0), None, 0.25);
        assert!(value_close(-2.0, tick.command.target_velocity_x));

        let mut arbiter = new_arbiter(Regime::ExternalCommand);
        arbiter.actions().push(ScriptedAction::Takeoff { altitude: 4.0 });
        let tick = arbiter.tick(&hovering_at(2.0, 0.0), None, 0.25);
        assert_eq!(4.0, tick.command.target_altitude);
    }

    /// Test that the camera action moves the gimbal.
    #[test]
    fn test_camera_action_reports_gimbal() {
        let mut arbiter = new_arbiter(Regime::ExternalCommand);
        arbiter.actions().push(ScriptedAction::AdjustCameraPitch {
            angle: -40.0,
            duration: 1.0,
        });
        let tick = arbiter.tick(&hovering_at(2.0, 0.0), None, 0.5);
        assert!(value_close(-20.0, tick.gimbal_pitch));
    }

    /// Test that a training episode clears queued requests and that training
    /// resumes policy control after an action.
    #[test]
    fn test_training_actions_interrupt_policy() {
        let mut arbiter = new_arbiter(Regime::Training);
        arbiter.actions().push(wait(0.25));
        let state = hovering_at(2.0, 0.0);

        let _ = arbiter.tick(&state, Some([1.0, 0.0, 0.0, 0.0]), 0.25);
        assert_eq!(Mode::ScriptedAction, arbiter.mode());
        let mut ticks = 0;
        while arbiter.mode() == Mode::ScriptedAction && ticks < 10 {
            let tick = arbiter.tick(&state, Some([1.0, 0.0, 0.0, 0.0]), 0.25);
            if arbiter.mode() == Mode::ScriptedAction {
                assert!(!tick.command.is_moving());
            }
            ticks += 1;
        }
        assert_eq!(Mode::PolicyControl, arbiter.mode());

        arbiter.actions().push(wait(1.0));
        let _ = arbiter.begin_episode(&EpisodeSetup::single_target(
            Vector3::new(0.0, 2.0, 0.0),
            0.0,
            Vector3::new(0.0, 2.0, 4.0),
            5.0,
        ));
        assert!(arbiter.actions().is_empty());
        assert_eq!(Vector3::new(0.0, 2.0, 4.0), arbiter.target().position);
    }

    /// Test that an external episode picks up a waypoint queued beforehand.
    #[test]
    fn test_external_episode_resumes_queued_waypoint() {
        let mut arbiter = new_arbiter(Regime::ExternalCommand);
        let (corrected, _) = Waypoint::from_target(Vector3::new(3.0, 2.0, 3.0), Quaternion::new(0.0, 0.0, 0.0, 0.0));
        arbiter.enqueue_waypoint(waypoint(0.0, 5.0));
        arbiter.enqueue_waypoint(corrected);

        let _ = arbiter.begin_episode(&EpisodeSetup::hold_at(Vector3::new(0.0, 2.0, 0.0), 0.0, 5.0));

        assert_eq!(Mode::Navigating, arbiter.mode());
        assert_eq!(corrected.position, arbiter.target().position);
        assert_eq!(0, arbiter.pending_waypoints());
    }
}
