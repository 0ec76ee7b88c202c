use std::cell::BorrowMutError;

use thiserror::Error;

/// Errors raised while assembling a robot body in the rapier world.
#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("no link named '{0}'")]
    UnknownLink(String),

    #[error("link '{0}' added twice")]
    DuplicateLink(String),

    #[error("joint '{name}' connects '{link}' to itself")]
    SelfJoint { name: String, link: String },

    /// Another handle holds the world.
    #[error("physics world is busy: {0}")]
    WorldBusy(#[from] BorrowMutError),
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;
