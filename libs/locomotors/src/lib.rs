//! Legged robot agents for physics-simulated locomotion benchmarks.
//!
//! Hopper, Walker2D, HalfCheetah, Ant, Humanoid (plus its flag-run
//! variants) and Atlas. The physics engine stays behind the traits in
//! [`body`], [`scene`] and [`model`].

pub mod body;
pub mod config;
pub mod error;
pub mod model;
pub mod morphology;
pub mod scene;
pub mod walker;

// Task variants
pub mod attack;
pub mod crawl;
pub mod goal;

pub mod env;
pub mod robot;

#[cfg(test)]
mod testing;

pub use body::{BodyPart, Joint, Pose};
pub use config::{RobotConfig, StadiumConfig};
pub use env::{LocomotionEnv, RewardBreakdown, StepResult};
pub use error::{RobotError, RobotResult};
pub use model::{LoadedModel, ModelLoader, ModelRequest};
pub use morphology::Morphology;
pub use robot::{Robot, RobotKind};
pub use scene::{PhysicsStep, Prop, PropFactory, Scene};
pub use walker::WalkerBase;
