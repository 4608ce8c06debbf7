// src/reward/probe.rs

//! # Obstacle Probes
//!
//! Proximity queries the reward engine and the curriculum sampler make
//! against the world. The physics collaborator implements
//! [`ObstacleProbe`]; [`OpenField`] and [`SphereObstacles`] cover the empty
//! world and simple scenes.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Obstacle queries against the surrounding world.
pub trait ObstacleProbe {
    /// Distance from `position` to the nearest obstacle surface, if one lies
    /// within `radius`.
    fn nearest_obstacle(&self, position: &Vector3<f32>, radius: f32) -> Option<f32>;

    /// Whether a sphere of `radius` swept from `position` along the unit
    /// `direction` for `range` metres touches an obstacle.
    fn obstacle_ahead(
        &self,
        position: &Vector3<f32>,
        direction: &Vector3<f32>,
        radius: f32,
        range: f32,
    ) -> bool;

    /// Whether no obstacle lies within `clearance` of `position`.
    fn is_clear(&self, position: &Vector3<f32>, clearance: f32) -> bool {
        self.nearest_obstacle(position, clearance).is_none()
    }
}

/// A world without obstacles.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl ObstacleProbe for OpenField {
    fn nearest_obstacle(&self, _position: &Vector3<f32>, _radius: f32) -> Option<f32> {
        None
    }

    fn obstacle_ahead(
        &self,
        _position: &Vector3<f32>,
        _direction: &Vector3<f32>,
        _radius: f32,
        _range: f32,
    ) -> bool {
        false
    }
}

/// A spherical obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    /// Centre in metres.
    pub center: Vector3<f32>,
    /// Radius in metres.
    pub radius: f32,
}

/// A world made of spherical obstacles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SphereObstacles {
    /// The obstacles.
    pub spheres: Vec<Sphere>,
}

impl SphereObstacles {
    /// Creates a world from the given obstacles.
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }

    /// Adds an obstacle.
    pub fn add(&mut self, center: Vector3<f32>, radius: f32) {
        self.spheres.push(Sphere { center, radius });
    }
}

impl ObstacleProbe for SphereObstacles {
    fn nearest_obstacle(&self, position: &Vector3<f32>, radius: f32) -> Option<f32> {
        self.spheres
            .iter()
            .map(|sphere| ((position - sphere.center).norm() - sphere.radius).max(0.0))
            .filter(|&distance| distance <= radius)
            .min_by(|a, b| a.total_cmp(b))
    }

    fn obstacle_ahead(
        &self,
        position: &Vector3<f32>,
        direction: &Vector3<f32>,
        radius: f32,
        range: f32,
    ) -> bool {
        self.spheres.iter().any(|sphere| {
            let along = (sphere.center - position).dot(direction).clamp(0.0, range);
            let closest = position + direction * along;
            (sphere.center - closest).norm() <= sphere.radius + radius
        })
    }
}
