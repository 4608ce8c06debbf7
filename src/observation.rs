// src/observation.rs

//! # Policy Observation
//!
//! The fixed-size vector fed to the learned policy each decision step.
//!
//! | Range   | Content                                                  |
//! |---------|----------------------------------------------------------|
//! | 0..3    | body-frame angular velocity, degrees per second          |
//! | 3..6    | body-frame linear velocity                               |
//! | 6..10   | orientation quaternion as `i, j, k, w`                   |
//! | 10..13  | body-frame unit direction to the current target          |
//! | 13      | distance to the current target                           |
//! | 14..18  | normalized setpoints (velocity x, velocity z, yaw rate, altitude) |
//! | 18..21  | body-frame unit direction to the lookahead waypoint      |
//! | 21      | distance to the lookahead waypoint                       |
//!
//! Without a lookahead waypoint the last four entries repeat the current
//! target, meaning "the next point is this one".

use crate::command::ACTION_SIZE;
use crate::frames::VehicleState;
use nalgebra::Vector3;

/// Number of floats in an observation.
pub const OBSERVATION_SIZE: usize = 22;

/// Builds the observation for one decision step.
pub fn observe(
    state: &VehicleState,
    target: &Vector3<f32>,
    lookahead: Option<&Vector3<f32>>,
    normalized_setpoints: [f32; ACTION_SIZE],
) -> [f32; OBSERVATION_SIZE] {
    let mut observation = [0.0; OBSERVATION_SIZE];

    let angular = state.body_angular_velocity();
    let velocity = state.body_velocity();
    let orientation = state.attitude.orientation();
    let to_target = state.to_body(&state.direction_to(target));
    let next = lookahead.unwrap_or(target);
    let to_next = state.to_body(&state.direction_to(next));

    observation[0..3].copy_from_slice(angular.as_slice());
    observation[3..6].copy_from_slice(velocity.as_slice());
    observation[6..10].copy_from_slice(orientation.coords.as_slice());
    observation[10..13].copy_from_slice(to_target.as_slice());
    observation[13] = state.distance_to(target);
    observation[14..18].copy_from_slice(&normalized_setpoints);
    observation[18..21].copy_from_slice(to_next.as_slice());
    observation[21] = state.distance_to(next);

    observation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::Attitude;
    use crate::test_utils::*;

    #[test]
    fn test_observation_layout() {
        let state = VehicleState {
            position: Vector3::new(0.0, 2.0, 0.0),
            velocity: Vector3::new(1.0, 0.0, 0.0),
            attitude: Attitude::level(90.0),
            angular_velocity: Vector3::new(0.0, 10.0, 0.0),
        };
        let target = Vector3::new(4.0, 2.0, 0.0);

        let observation = observe(&state, &target, None, [0.1, 0.2, 0.3, 0.4]);

        // Facing +x: world +x is body forward.
        assert!(vector_close(Vector3::new(0.0, 10.0, 0.0), Vector3::from_column_slice(&observation[0..3])));
        assert!(vector_close(Vector3::new(0.0, 0.0, 1.0), Vector3::from_column_slice(&observation[3..6])));
        assert!(vector_close(Vector3::new(0.0, 0.0, 1.0), Vector3::from_column_slice(&observation[10..13])));
        assert!(value_close(4.0, observation[13]));
        assert_eq!([0.1, 0.2, 0.3, 0.4], observation[14..18]);
        assert_eq!(observation[10..14], observation[18..22]);

        let quaternion_norm: f32 = observation[6..10].iter().map(|q| q * q).sum();
        assert!(value_close(1.0, quaternion_norm));
    }

    #[test]
    fn test_lookahead_replaces_tail() {
        let state = VehicleState::at_rest(Vector3::zeros(), Attitude::level(0.0));
        let target = Vector3::new(0.0, 0.0, 3.0);
        let lookahead = Vector3::new(-6.0, 0.0, 0.0);

        let observation = observe(&state, &target, Some(&lookahead), [0.0; ACTION_SIZE]);

        assert!(vector_close(Vector3::new(-1.0, 0.0, 0.0), Vector3::from_column_slice(&observation[18..21])));
        assert!(value_close(6.0, observation[21]));
    }

    #[test]
    fn test_observation_at_target_is_finite() {
        let state = VehicleState::at_rest(Vector3::new(1.0, 1.0, 1.0), Attitude::level(0.0));
        let target = state.position;
        let observation = observe(&state, &target, None, [0.0; ACTION_SIZE]);
        assert!(observation.iter().all(|v| v.is_finite()));
        assert_eq!(0.0, observation[13]);
    }
}
