//! Error types for robot construction and configuration.

use thiserror::Error;

/// Errors raised while binding a robot to a loaded model.
///
/// Runtime failures (falling over, running out of time) are never errors:
/// they surface as a negative alive bonus.
#[derive(Debug, Error)]
pub enum RobotError {
    /// A joint the morphology drives by name is missing from the model.
    #[error("model '{model}' has no joint named '{name}'")]
    UnknownJoint {
        /// Model file the robot was loaded from.
        model: &'static str,
        /// The missing joint.
        name: String,
    },

    /// A body part the morphology reads by name is missing from the model.
    #[error("model '{model}' has no part named '{name}'")]
    UnknownPart {
        /// Model file the robot was loaded from.
        model: &'static str,
        /// The missing part.
        name: String,
    },

    /// The model's motorised joint count does not match the action space.
    #[error("model '{model}' expects {expected} actuated joints, loaded {found}")]
    JointCountMismatch {
        /// Model file the robot was loaded from.
        model: &'static str,
        /// Action dimension of the morphology.
        expected: usize,
        /// Joints the loader produced.
        found: usize,
    },

    /// The external model loader could not produce a body.
    #[error("failed to load '{model}': {reason}")]
    LoadFailed {
        /// Requested model file.
        model: String,
        /// Loader-specific description.
        reason: String,
    },

    /// Configuration could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for robot construction.
pub type RobotResult<T> = Result<T, RobotError>;
