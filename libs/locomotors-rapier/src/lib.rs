//! Rapier3D backing for `locomotors` robots: a Z-up stadium, joint and link
//! handles over a shared world, and a builder that assembles bodies.

use std::cell::RefCell;
use std::rc::Rc;

pub mod builder;
pub mod error;
pub mod joint;
pub mod part;
pub mod physics;
pub mod prop;
pub mod scene;

pub use builder::ModelBuilder;
pub use error::{PhysicsError, PhysicsResult};
pub use joint::RapierJoint;
pub use part::RapierPart;
pub use physics::PhysicsWorld;
pub use prop::RapierProp;
pub use scene::StadiumScene;

/// Every handle borrows the world for the duration of a single call.
pub type SharedWorld = Rc<RefCell<PhysicsWorld>>;
