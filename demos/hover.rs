// demos/hover.rs

use free_flight_autopilot::agent::AgentBuilder;
use free_flight_autopilot::config::{AutopilotConfig, Regime};
use free_flight_autopilot::episode::EpisodeSetup;
use free_flight_autopilot::frames::{Attitude, VehicleState};
use free_flight_autopilot::reward::OpenField;
use nalgebra::{Quaternion, Vector3};
use std::collections::HashMap;

// Toy point-mass response; rigid-body dynamics are out of scope here.
const ATTITUDE_RESPONSE: f32 = 4.0;
const DRAG: f32 = 0.4;

fn main() {
    let mut config = AutopilotConfig::default();
    config.episode.regime = Regime::ExternalCommand;
    config.policy.seed = Some(42);

    let start = Vector3::new(0.0, 1.0, 0.0);
    let mut agent = AgentBuilder::new("demo")
        .config(config.clone())
        .target(start)
        .build()
        .expect("default configuration is valid");
    agent.begin_episode(&EpisodeSetup::hold_at(start, 0.0, config.zones.local_target_range));

    // Requests arrive through the handle, as they would from a server thread.
    let handle = agent.handle();
    let takeoff = HashMap::from([("altitude".to_string(), 3.0)]);
    println!("takeoff: {:?}", handle.execute_action("takeoff", &takeoff));
    let rotate = HashMap::from([("angle_degrees".to_string(), 90.0)]);
    println!("rotate:  {:?}", handle.execute_action("rotate_drone_yaw_relative", &rotate));

    let mut state = VehicleState::at_rest(start, Attitude::level(0.0));
    let dt = 0.02;
    let mut t = 0.0;
    for step in 0..=1500 {
        if step == 600 {
            handle.set_target(Vector3::new(4.0, 3.0, 6.0), Quaternion::identity());
        }

        // Fly toward the target in the body frame.
        let observation = agent.observation(&state);
        let closing = observation[13].min(1.0);
        let altitude = agent.arbiter().target().position.y;
        let envelope = &config.envelope;
        let action = [
            observation[12] * closing,
            observation[10] * closing,
            0.0,
            2.0 * (altitude - envelope.min.y) / envelope.height() - 1.0,
        ];

        let output = agent.actuate(&state, Some(action), dt);

        // Integrate the toy response.
        let torque = output.actuation.torque;
        state.attitude.pitch += torque.x * ATTITUDE_RESPONSE * dt;
        state.attitude.yaw += torque.y * ATTITUDE_RESPONSE * dt;
        state.attitude.roll += torque.z * ATTITUDE_RESPONSE * dt;
        state.angular_velocity = Vector3::new(torque.x, torque.y, torque.z) * ATTITUDE_RESPONSE;
        let force = output.actuation.world_force(&state);
        let acceleration = force / config.vehicle.mass
            - Vector3::new(0.0, config.vehicle.gravity, 0.0)
            - state.velocity * DRAG;
        state.velocity += acceleration * dt;
        state.position += state.velocity * dt;

        let step_result = agent.evaluate(&state, &OpenField);

        if step % 100 == 0 {
            println!("t = {:.2}, mode = {:?}, status = {}", t, output.mode, agent.status(&state));
            println!(
                "    Position:  {:-8.3}, {:-8.3}, {:-8.3}",
                state.position.x, state.position.y, state.position.z
            );
            println!(
                "    Attitude:  {:-8.3}, {:-8.3}, {:-8.3}",
                state.attitude.pitch, state.attitude.roll, state.attitude.yaw
            );
            println!(
                "    Thrust:    {:-8.3}, reward {:-8.5}",
                output.actuation.thrust, step_result.reward
            );
        }
        if output.completed.is_some() {
            println!("t = {:.2}, ACTION_COMPLETE", t);
        }

        t += dt;
    }
}
