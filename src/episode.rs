// src/episode.rs

//! # Episodes and Curriculum
//!
//! What an episode starts from and how training episodes are sampled. The
//! curriculum widens the spawn area and the local target range as training
//! progresses; the sampler draws a safe start, a safe target near it and,
//! half of the time, a lookahead waypoint so the policy also learns to fly
//! through intermediate targets.

use crate::config::{AutopilotConfig, Envelope, ZoneConfig};
use crate::frames::Attitude;
use crate::pid::normalize_angle;
use crate::reward::ObstacleProbe;
use log::{debug, error, warn};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Clearance kept from obstacles and from the envelope walls at spawn.
pub const SPAWN_CLEARANCE: f32 = 2.0;
/// Minimum distance between a sampled start and its target.
pub const MIN_TARGET_SEPARATION: f32 = 3.0;
/// Fallback target distance ahead of the start.
pub const FALLBACK_TARGET_DISTANCE: f32 = 5.0;
/// Half-width of the box around the target in which a lookahead is placed.
pub const LOOKAHEAD_SPREAD: f32 = 5.0;

const MAX_ATTEMPTS: usize = 100;
const LESSON_EPSILON: f32 = 0.01;

/// Ranges of the current training lesson, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Curriculum {
    /// Width of the spawn area along x, measured from the area centre.
    pub spawn_range_x: f32,
    /// Width of the spawn area along z, measured from the area centre.
    pub spawn_range_z: f32,
    /// Side of the box around the start in which targets are placed.
    pub local_range: f32,
}

impl Default for Curriculum {
    fn default() -> Self {
        Self {
            spawn_range_x: 5.0,
            spawn_range_z: 5.0,
            local_range: ZoneConfig::default().local_target_range,
        }
    }
}

impl Curriculum {
    /// Whether any range moved by more than a centimetre.
    pub fn differs_from(&self, other: &Curriculum) -> bool {
        (self.spawn_range_x - other.spawn_range_x).abs() > LESSON_EPSILON
            || (self.spawn_range_z - other.spawn_range_z).abs() > LESSON_EPSILON
            || (self.local_range - other.local_range).abs() > LESSON_EPSILON
    }
}

/// Initial conditions of one episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSetup {
    /// Spawn position.
    pub start: Vector3<f32>,
    /// Spawn heading in degrees.
    pub start_yaw: f32,
    /// First target.
    pub target: Vector3<f32>,
    /// Waypoint after the target, if the target is intermediate.
    pub lookahead: Option<Vector3<f32>>,
    /// Whether the target is where the vehicle should stop.
    pub final_destination: bool,
    /// Local target range used to size the shaping zones.
    pub local_range: f32,
}

impl EpisodeSetup {
    /// Hover at `start` with the target on the spot. Used when targets come
    /// from an external caller.
    pub fn hold_at(start: Vector3<f32>, start_yaw: f32, local_range: f32) -> Self {
        Self {
            start,
            start_yaw,
            target: start,
            lookahead: None,
            final_destination: true,
            local_range,
        }
    }

    /// Fly from `start` to a single final `target`.
    pub fn single_target(start: Vector3<f32>, start_yaw: f32, target: Vector3<f32>, local_range: f32) -> Self {
        Self {
            start,
            start_yaw,
            target,
            lookahead: None,
            final_destination: true,
            local_range,
        }
    }
}

/// Samples training episodes from the current curriculum.
pub struct CurriculumSampler {
    envelope: Envelope,
    center: Vector3<f32>,
    curriculum: Curriculum,
    rng: StdRng,
}

impl CurriculumSampler {
    /// Creates a sampler around `center`, seeded from `policy.seed` or from
    /// entropy when unset.
    pub fn new(config: &AutopilotConfig, center: Vector3<f32>) -> Self {
        let rng = match config.policy.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, center, rng)
    }

    /// Creates a sampler drawing from `rng`.
    pub fn with_rng(config: &AutopilotConfig, center: Vector3<f32>, rng: StdRng) -> Self {
        Self {
            envelope: config.envelope,
            center,
            curriculum: Curriculum {
                local_range: config.zones.local_target_range,
                ..Curriculum::default()
            },
            rng,
        }
    }

    /// The lesson in use.
    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    /// Moves on to another lesson.
    pub fn set_curriculum(&mut self, curriculum: Curriculum) {
        self.curriculum = curriculum;
    }

    /// Draws the initial conditions of a training episode.
    pub fn sample(&mut self, probe: &dyn ObstacleProbe) -> EpisodeSetup {
        let start = self.sample_start(probe);
        let start_yaw = normalize_angle(self.rng.gen_range(0.0..360.0));
        let target = self.sample_target(&start, start_yaw, probe);

        let lookahead = if self.rng.gen_bool(0.5) {
            let candidate = target
                + Vector3::new(
                    self.rng.gen_range(-LOOKAHEAD_SPREAD..LOOKAHEAD_SPREAD),
                    0.0,
                    self.rng.gen_range(-LOOKAHEAD_SPREAD..LOOKAHEAD_SPREAD),
                );
            if probe.is_clear(&candidate, SPAWN_CLEARANCE) {
                Some(candidate)
            } else {
                Some(target)
            }
        } else {
            None
        };
        debug!(
            "sampled episode: start {:?}, target {:?}, lookahead {:?}",
            start, target, lookahead
        );

        EpisodeSetup {
            start,
            start_yaw,
            target,
            lookahead,
            final_destination: lookahead.is_none(),
            local_range: self.curriculum.local_range,
        }
    }

    fn sample_start(&mut self, probe: &dyn ObstacleProbe) -> Vector3<f32> {
        let (min, max) = (self.envelope.min, self.envelope.max);
        for _ in 0..MAX_ATTEMPTS {
            let candidate = Vector3::new(
                self.uniform(self.center.x, self.center.x + self.curriculum.spawn_range_x),
                self.uniform(min.y, max.y),
                self.uniform(self.center.z, self.center.z + self.curriculum.spawn_range_z),
            );
            let candidate = Vector3::from_fn(|axis, _| {
                inset_clamp(candidate[axis], min[axis], max[axis], SPAWN_CLEARANCE)
            });
            if probe.is_clear(&candidate, SPAWN_CLEARANCE) {
                return candidate;
            }
        }
        error!(
            "no safe spawn point found after {} attempts, falling back to the area centre",
            MAX_ATTEMPTS
        );
        self.center
    }

    fn sample_target(&mut self, start: &Vector3<f32>, start_yaw: f32, probe: &dyn ObstacleProbe) -> Vector3<f32> {
        let half = self.curriculum.local_range / 2.0;
        let (min_y, max_y) = (self.envelope.min.y, self.envelope.max.y);
        for _ in 0..MAX_ATTEMPTS {
            let candidate = Vector3::new(
                self.uniform(start.x - half, start.x + half),
                self.uniform(min_y, max_y),
                self.uniform(start.z - half, start.z + half),
            );
            let candidate = self.envelope.clamp(&candidate);
            if (candidate - start).norm() > MIN_TARGET_SEPARATION && probe.is_clear(&candidate, SPAWN_CLEARANCE) {
                return candidate;
            }
        }
        warn!(
            "no safe target found near {:?}, using a point {} m ahead",
            start, FALLBACK_TARGET_DISTANCE
        );
        let forward = Attitude::level(start_yaw).rotation() * Vector3::z();
        start + forward * FALLBACK_TARGET_DISTANCE
    }

    fn uniform(&mut self, low: f32, high: f32) -> f32 {
        if high > low {
            self.rng.gen_range(low..high)
        } else {
            low
        }
    }
}

/// Clamps into `[min + inset, max - inset]`, collapsing to the midpoint when
/// the inset range is empty.
fn inset_clamp(value: f32, min: f32, max: f32, inset: f32) -> f32 {
    let (low, high) = (min + inset, max - inset);
    if low > high {
        (min + max) / 2.0
    } else {
        value.clamp(low, high)
    }
}
