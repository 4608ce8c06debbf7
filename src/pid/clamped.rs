// src/pid/clamped.rs

//! # Clamped PID Loop
//!
//! This module provides a compute function and control data structure for a
//! single feedback loop with a clamped integral term, plus [`PidLoop`], the
//! stateful wrapper that adds output clamping, the zero time-step guard and
//! derivative seeding on the first sample after a reset.

use crate::Number;
use piddiy::PidController;
use serde::{Deserialize, Serialize};

/// Gains and limits for one feedback loop.
///
/// One instance exists per physical axis. The values are fixed for the
/// lifetime of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlGains<T> {
    /// Proportional gain.
    pub kp: T,
    /// Integral gain.
    pub ki: T,
    /// Derivative gain.
    pub kd: T,
    /// Magnitude bound of the integral accumulator, used to prevent windup.
    pub integral_limit: T,
    /// Magnitude bound of the loop output.
    pub output_limit: T,
}

impl<T> ControlGains<T> {
    /// Creates a gain set from its five components.
    pub const fn new(kp: T, ki: T, kd: T, integral_limit: T, output_limit: T) -> Self {
        Self {
            kp,
            ki,
            kd,
            integral_limit,
            output_limit,
        }
    }
}

impl ControlGains<f32> {
    /// Integral limit used when none is tuned.
    pub const DEFAULT_INTEGRAL_LIMIT: f32 = 10.0;
    /// Output limit used when none is tuned.
    pub const DEFAULT_OUTPUT_LIMIT: f32 = 100.0;

    /// Creates a gain set with the default integral and output limits.
    pub const fn pid(kp: f32, ki: f32, kd: f32) -> Self {
        Self::new(
            kp,
            ki,
            kd,
            Self::DEFAULT_INTEGRAL_LIMIT,
            Self::DEFAULT_OUTPUT_LIMIT,
        )
    }
}

impl Default for ControlGains<f32> {
    fn default() -> Self {
        Self::pid(1.0, 0.0, 0.0)
    }
}

/// Control data for the clamped loop compute callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoopControlData<T> {
    /// The measured value of the controlled variable.
    pub measurement: T,
    /// The time delta since the last computation.
    pub dt: T,
    /// The maximum allowed value for the integral term, used to prevent integral windup.
    pub integral_limit: T,
    /// Set on the first sample after a reset. The previous error is taken to
    /// be the current one, so the derivative term starts at zero.
    pub first_sample: bool,
}

/// Clamped PID compute callback.
pub fn compute_clamped<T: Number>(
    pid: &mut PidController<T, LoopControlData<T>>,
    data: LoopControlData<T>,
) -> (T, T, T) {
    let error = pid.set_point - data.measurement;
    let previous_error = if data.first_sample { error } else { pid.error };
    let integral =
        (pid.integral + error * data.dt).clamp(-data.integral_limit, data.integral_limit);
    let derivative = (error - previous_error) / data.dt;

    (error, integral, derivative)
}

/// A single feedback loop with clamped integral and clamped output.
///
/// The accumulated state (integral, previous error, initialized flag) is
/// owned by the loop and discarded by [`PidLoop::reset`].
pub struct PidLoop<T: Number> {
    pid: PidController<T, LoopControlData<T>>,
    gains: ControlGains<T>,
    initialized: bool,
}

impl<T: Number> PidLoop<T> {
    /// Creates a new loop using the provided gains.
    pub fn with_gains(gains: ControlGains<T>) -> Self {
        let mut pid = PidController::new();
        pid.compute_fn(compute_clamped)
            .set_point(T::zero())
            .kp(gains.kp)
            .ki(gains.ki)
            .kd(gains.kd);

        PidLoop {
            pid,
            gains,
            initialized: false,
        }
    }

    /// Computes the clamped control output driving `current` toward `target`.
    ///
    /// A zero `dt` yields a zero output and leaves the loop state untouched.
    pub fn calculate(&mut self, target: T, current: T, dt: T) -> T {
        if dt == T::zero() {
            return T::zero();
        }

        self.pid.set_point(target);
        let data = LoopControlData {
            measurement: current,
            dt,
            integral_limit: self.gains.integral_limit,
            first_sample: !self.initialized,
        };
        self.initialized = true;

        self.pid
            .compute(data)
            .clamp(-self.gains.output_limit, self.gains.output_limit)
    }

    /// Discards the accumulated integral and previous error.
    pub fn reset(&mut self) {
        self.pid.integral = T::zero();
        self.pid.error = T::zero();
        self.initialized = false;
    }

    /// The current integral accumulator.
    pub fn integral(&self) -> T {
        self.pid.integral
    }

    /// The error seen on the most recent sample.
    pub fn previous_error(&self) -> T {
        self.pid.error
    }

    /// Whether a sample has been taken since the last reset.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The gains this loop was built with.
    pub fn gains(&self) -> &ControlGains<T> {
        &self.gains
    }
}
