// tests/agent_scenarios.rs

use free_flight_autopilot::agent::{AgentBuilder, FlightAgent};
use free_flight_autopilot::arbiter::Mode;
use free_flight_autopilot::config::{AutopilotConfig, Regime};
use free_flight_autopilot::episode::{CurriculumSampler, EpisodeSetup};
use free_flight_autopilot::frames::{Attitude, VehicleState};
use free_flight_autopilot::metrics::EpisodeMetrics;
use free_flight_autopilot::reward::{CollisionKind, OpenField, Outcome};
use free_flight_autopilot::tasks::ScriptedAction;
use nalgebra::{Quaternion, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

fn agent(regime: Regime, max_steps: u64, metrics: Arc<EpisodeMetrics>) -> FlightAgent {
    let mut config = AutopilotConfig::default();
    config.episode.regime = regime;
    config.episode.max_steps = max_steps;
    config.policy.seed = Some(99);
    AgentBuilder::new("scenario")
        .config(config)
        .metrics(metrics)
        .target(Vector3::new(0.0, 2.0, 0.0))
        .build()
        .unwrap()
}

fn at(x: f32, y: f32, z: f32) -> VehicleState {
    VehicleState::at_rest(Vector3::new(x, y, z), Attitude::level(0.0))
}

fn wait(duration: f32) -> HashMap<String, f32> {
    HashMap::from([("duration".to_string(), duration)])
}

/// Test that reaching within the arrival distance ends a training episode
/// successfully with at least the arrival reward.
#[test]
fn test_arrival_scenario() {
    let metrics = Arc::new(EpisodeMetrics::new(1000));
    let mut agent = agent(Regime::Training, 0, Arc::clone(&metrics));
    let target = Vector3::new(0.0, 2.0, 5.0);
    agent.begin_episode(&EpisodeSetup::single_target(Vector3::new(0.0, 2.0, 0.0), 0.0, target, 5.0));

    let state = at(0.0, 2.0, 4.1);
    let _ = agent.actuate(&state, Some([0.0; 4]), 0.02);
    let result = agent.evaluate(&state, &OpenField);

    assert_eq!(Some(Outcome::Arrival), result.outcome);
    assert!(result.episode_over);
    assert!(result.reward >= agent.config().rewards.arrival_reward);
    assert_eq!(1, metrics.successful_episodes());
}

/// Test that leaving the envelope fails with the configured penalty no
/// matter how close the target is.
#[test]
fn test_out_of_bounds_scenario() {
    let metrics = Arc::new(EpisodeMetrics::new(1000));
    let mut agent = agent(Regime::Training, 0, Arc::clone(&metrics));
    let max_y = agent.config().envelope.max.y;
    let escaped = Vector3::new(0.0, max_y + 1.0, 0.0);
    agent.begin_episode(&EpisodeSetup::single_target(Vector3::new(0.0, 2.0, 0.0), 0.0, escaped, 5.0));

    let state = at(0.0, max_y + 1.0, 0.0);
    let result = agent.evaluate(&state, &OpenField);

    assert_eq!(Some(Outcome::OutOfBounds), result.outcome);
    assert_eq!(agent.config().rewards.failure_penalty, result.reward);
    assert!(result.episode_over);
    assert_eq!(1, metrics.total_episodes());
    assert_eq!(0, metrics.successful_episodes());
}

/// Test that the step budget ends the episode without a terminal reward or
/// a success.
#[test]
fn test_timeout_scenario() {
    let metrics = Arc::new(EpisodeMetrics::new(1000));
    let mut agent = agent(Regime::Training, 5, Arc::clone(&metrics));
    agent.begin_episode(&EpisodeSetup::single_target(
        Vector3::new(0.0, 2.0, 0.0),
        0.0,
        Vector3::new(0.0, 2.0, 4.0),
        5.0,
    ));

    let state = at(0.0, 2.0, 0.0);
    let mut last = None;
    for _ in 0..5 {
        let _ = agent.actuate(&state, Some([0.0; 4]), 0.02);
        last = Some(agent.evaluate(&state, &OpenField));
    }
    let result = last.unwrap();

    assert_eq!(Some(Outcome::Timeout), result.outcome);
    assert!(result.episode_over);
    assert_eq!(0.0, result.terminal_reward);
    assert_eq!(1, metrics.total_episodes());
    assert_eq!(0, metrics.successful_episodes());
}

/// Test that collisions are tallied as failures shared across agents.
#[test]
fn test_collisions_share_metrics() {
    let metrics = Arc::new(EpisodeMetrics::new(1000));
    let mut first = agent(Regime::Training, 0, Arc::clone(&metrics));
    let mut second = agent(Regime::Training, 0, Arc::clone(&metrics));
    let setup = EpisodeSetup::single_target(Vector3::new(0.0, 2.0, 0.0), 0.0, Vector3::new(0.0, 2.0, 4.0), 5.0);
    first.begin_episode(&setup);
    second.begin_episode(&setup);

    let state = at(0.0, 2.0, 0.0);
    assert!(first.report_collision(CollisionKind::Obstacle, &state).episode_over);
    assert!(second.report_collision(CollisionKind::Ground, &state).episode_over);

    assert_eq!(2, metrics.total_episodes());
    assert_eq!(0.0, metrics.success_rate());
}

/// Test that actions queued while another runs execute strictly in order.
#[test]
fn test_scripted_actions_run_in_fifo_order() {
    let mut agent = agent(Regime::ExternalCommand, 0, Arc::new(EpisodeMetrics::new(1000)));
    let handle = agent.handle();
    agent.begin_episode(&EpisodeSetup::hold_at(Vector3::new(0.0, 2.0, 0.0), 0.0, 5.0));

    assert!(handle.execute_action("wait", &wait(0.5)).success);
    let state = at(0.0, 2.0, 0.0);
    let _ = agent.actuate(&state, None, 0.25);
    assert_eq!(Mode::ScriptedAction, agent.mode());

    assert!(handle.execute_action("wait", &wait(0.75)).success);
    assert!(handle.execute_action("wait", &wait(0.25)).success);

    let mut completed = Vec::new();
    for _ in 0..40 {
        let output = agent.actuate(&state, None, 0.25);
        if let Some(report) = output.completed {
            completed.push(report.action);
        }
    }

    assert_eq!(
        vec![
            ScriptedAction::Wait { duration: 0.5 },
            ScriptedAction::Wait { duration: 0.75 },
            ScriptedAction::Wait { duration: 0.25 },
        ],
        completed
    );
}

/// Test that for any interleaving of requests and ticks a scripted action
/// and navigation are never active together.
#[test]
fn test_actions_and_navigation_never_overlap() {
    let mut agent = agent(Regime::ExternalCommand, 0, Arc::new(EpisodeMetrics::new(1000)));
    let handle = agent.handle();
    agent.begin_episode(&EpisodeSetup::hold_at(Vector3::new(0.0, 2.0, 0.0), 0.0, 5.0));
    let mut rng = StdRng::seed_from_u64(2024);
    let mut state = at(0.0, 2.0, 0.0);

    for _ in 0..3000 {
        match rng.gen_range(0..10) {
            0 => {
                let _ = handle.execute_action("wait", &wait(rng.gen_range(0.0..0.5)));
            }
            1 => {
                let target = Vector3::new(rng.gen_range(-3.0..3.0), 2.0, rng.gen_range(-3.0..3.0));
                let _ = handle.set_target(target, Quaternion::identity());
            }
            2 => {
                // Jump onto the current target to trigger arrival.
                state.position = agent.arbiter().target().position;
            }
            _ => {}
        }
        let output = agent.actuate(&state, Some([0.0; 4]), 0.1);

        match output.mode {
            Mode::ScriptedAction => assert!(agent.arbiter().current_action().is_some()),
            Mode::Navigating => assert!(agent.arbiter().current_action().is_none()),
            Mode::AwaitingExternalTarget => assert_eq!(0, agent.arbiter().pending_waypoints()),
            Mode::PolicyControl => panic!("policy control in the external regime"),
        }
    }
}

/// Test requests arriving concurrently from several threads.
#[test]
fn test_concurrent_requests() {
    let mut agent = agent(Regime::ExternalCommand, 0, Arc::new(EpisodeMetrics::new(1000)));
    agent.begin_episode(&EpisodeSetup::hold_at(Vector3::new(0.0, 2.0, 0.0), 0.0, 5.0));

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let handle = agent.handle();
            thread::spawn(move || {
                for _ in 0..5 {
                    assert!(handle.execute_action("wait", &wait(0.1)).success);
                }
                handle.set_target(Vector3::new(i as f32, 2.0, 3.0), Quaternion::identity())
            })
        })
        .collect();
    for worker in workers {
        assert!(worker.join().unwrap());
    }

    assert_eq!(20, agent.arbiter().actions().len());
    let _ = agent.actuate(&at(0.0, 2.0, 0.0), None, 0.02);
    assert_eq!(Mode::Navigating, agent.mode());
    assert_eq!(3, agent.arbiter().pending_waypoints());
}

/// Test a sampled training episode from start to arrival.
#[test]
fn test_sampled_episode_reaches_target() {
    let metrics = Arc::new(EpisodeMetrics::new(1000));
    let mut agent = agent(Regime::Training, 0, Arc::clone(&metrics));
    let mut sampler = CurriculumSampler::with_rng(agent.config(), Vector3::zeros(), StdRng::seed_from_u64(8));

    let setup = agent.begin_sampled_episode(&mut sampler, &OpenField);
    assert_eq!(setup.target, agent.arbiter().target().position);
    assert_eq!(setup.lookahead.is_none(), agent.arbiter().is_final_destination());

    let observation = agent.observation(&VehicleState::at_rest(setup.start, Attitude::level(setup.start_yaw)));
    assert!((observation[13] - (setup.target - setup.start).norm()).abs() < 1e-4);

    let arrived = VehicleState::at_rest(setup.target, Attitude::level(setup.start_yaw));
    let result = agent.evaluate(&arrived, &OpenField);
    assert_eq!(Some(Outcome::Arrival), result.outcome);
    assert_eq!(1, metrics.successful_episodes());
}
