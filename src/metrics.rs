// src/metrics.rs

//! # Episode Metrics
//!
//! Success tallies shared by every agent in a training run. Counters are
//! atomics so agents on different threads can report through one
//! `Arc<EpisodeMetrics>` without locking. Every `report_interval` global
//! steps the windowed success rate is logged and the window restarts.

use crate::episode::Curriculum;
use log::{error, info};
use nalgebra::Vector3;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Success rate over one reporting window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowReport {
    /// Global step count at which the window closed.
    pub step: u64,
    /// Episodes finished in the window.
    pub episodes: u64,
    /// Successful episodes in the window.
    pub successes: u64,
    /// `successes / episodes`, zero for an empty window.
    pub success_rate: f32,
}

/// Run-wide episode and step counters.
#[derive(Debug)]
pub struct EpisodeMetrics {
    report_interval: u64,
    total_episodes: AtomicU64,
    successful_episodes: AtomicU64,
    window_episodes: AtomicU64,
    window_successes: AtomicU64,
    total_steps: AtomicU64,
    last_report_step: AtomicU64,
    lesson: Mutex<Option<(u64, Curriculum)>>,
}

fn rate(successes: u64, episodes: u64) -> f32 {
    if episodes == 0 {
        0.0
    } else {
        successes as f32 / episodes as f32
    }
}

impl EpisodeMetrics {
    /// Creates empty counters reporting every `report_interval` steps.
    pub fn new(report_interval: u64) -> Self {
        Self {
            report_interval: report_interval.max(1),
            total_episodes: AtomicU64::new(0),
            successful_episodes: AtomicU64::new(0),
            window_episodes: AtomicU64::new(0),
            window_successes: AtomicU64::new(0),
            total_steps: AtomicU64::new(0),
            last_report_step: AtomicU64::new(0),
            lesson: Mutex::new(None),
        }
    }

    /// Counts one environment step and closes the window when due.
    ///
    /// Exactly one caller receives the report for a given window even when
    /// several agents step concurrently.
    pub fn record_step(&self) -> Option<WindowReport> {
        let step = self.total_steps.fetch_add(1, Ordering::Relaxed) + 1;
        let last = self.last_report_step.load(Ordering::Relaxed);
        if step.saturating_sub(last) < self.report_interval {
            return None;
        }
        self.last_report_step
            .compare_exchange(last, step, Ordering::AcqRel, Ordering::Relaxed)
            .ok()?;

        let episodes = self.window_episodes.swap(0, Ordering::AcqRel);
        let successes = self.window_successes.swap(0, Ordering::AcqRel);
        let report = WindowReport {
            step,
            episodes,
            successes,
            success_rate: rate(successes, episodes),
        };
        info!(
            "Success rate over last {} steps: {:.2}% ({}/{}) at step {}",
            self.report_interval,
            report.success_rate * 100.0,
            successes,
            episodes,
            step
        );
        Some(report)
    }

    /// Counts a successful episode.
    pub fn record_success(&self) {
        self.count_episode(true);
    }

    /// Counts a failed episode and logs where it happened.
    pub fn record_failure(&self, reason: &str, position: &Vector3<f32>) {
        self.count_episode(false);
        error!(
            "Episode failed: {} at ({:.2}, {:.2}, {:.2})",
            reason, position.x, position.y, position.z
        );
    }

    /// Counts an episode that ran out of steps.
    pub fn record_timeout(&self, position: &Vector3<f32>) {
        self.count_episode(false);
        info!(
            "Episode timed out at ({:.2}, {:.2}, {:.2})",
            position.x, position.y, position.z
        );
    }

    fn count_episode(&self, success: bool) {
        self.total_episodes.fetch_add(1, Ordering::AcqRel);
        self.window_episodes.fetch_add(1, Ordering::AcqRel);
        if success {
            self.successful_episodes.fetch_add(1, Ordering::AcqRel);
            self.window_successes.fetch_add(1, Ordering::AcqRel);
        }
    }

    /// Notes the curriculum in use and announces a new lesson when its
    /// ranges moved by more than a centimetre. Returns the lesson number when
    /// a new one started.
    pub fn observe_lesson(&self, curriculum: &Curriculum) -> Option<u64> {
        let mut lesson = self.lesson.lock();
        let number = match lesson.as_ref() {
            Some((_, current)) if !current.differs_from(curriculum) => return None,
            Some((number, _)) => number + 1,
            None => 1,
        };
        *lesson = Some((number, *curriculum));
        info!(
            "LESSON {} STARTED: spawn range ({:.2}, {:.2}), local range {:.2}",
            number, curriculum.spawn_range_x, curriculum.spawn_range_z, curriculum.local_range
        );
        Some(number)
    }

    /// Episodes finished since the run started.
    pub fn total_episodes(&self) -> u64 {
        self.total_episodes.load(Ordering::Acquire)
    }

    /// Successful episodes since the run started.
    pub fn successful_episodes(&self) -> u64 {
        self.successful_episodes.load(Ordering::Acquire)
    }

    /// Steps counted since the run started.
    pub fn total_steps(&self) -> u64 {
        self.total_steps.load(Ordering::Acquire)
    }

    /// Overall success rate, zero before any episode finishes.
    pub fn success_rate(&self) -> f32 {
        rate(self.successful_episodes(), self.total_episodes())
    }
}

impl Default for EpisodeMetrics {
    fn default() -> Self {
        Self::new(crate::config::EpisodeConfig::default().report_interval)
    }
}
