// src/error.rs

//! # Error Types
//!
//! Errors surfaced at the edges of the autopilot: configuration loading and
//! agent construction, and parsing of externally requested actions. Nothing
//! at tick rate returns an error.

use thiserror::Error;

/// Failure to load, validate or wire up a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value is outside its permitted range.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// A collaborator the agent cannot run without was not supplied.
    #[error("missing required collaborator: {0}")]
    MissingCollaborator(&'static str),
    /// The YAML document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Rejection of an externally requested scripted action.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ActionError {
    /// The action type is not one the autopilot knows.
    #[error("unknown action type: {0}")]
    UnknownActionType(String),
    /// A parameter without a default was not supplied.
    #[error("{action} requires parameter {parameter}")]
    MissingParameter {
        /// Wire name of the action.
        action: &'static str,
        /// Wire name of the parameter.
        parameter: &'static str,
    },
    /// A parameter was NaN or infinite.
    #[error("parameter {parameter} is not finite: {value}")]
    NonFiniteParameter {
        /// Wire name of the parameter.
        parameter: String,
        /// The rejected value.
        value: f32,
    },
    /// A parameter is finite but outside its permitted range.
    #[error("parameter {parameter} is out of range: {value}")]
    InvalidParameter {
        /// Wire name of the parameter.
        parameter: &'static str,
        /// The rejected value.
        value: f32,
    },
}
