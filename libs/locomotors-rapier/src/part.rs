use std::rc::Rc;

use locomotors::{BodyPart, Pose};
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use rapier3d::prelude::*;

use crate::SharedWorld;

/// One rigid link of a robot.
pub struct RapierPart {
    world: SharedWorld,
    handle: RigidBodyHandle,
    ground: ColliderHandle,
    /// Every link of the body this one belongs to, itself included.
    body: Rc<[RigidBodyHandle]>,
}

impl RapierPart {
    /// A link that stands alone.
    pub fn new(world: SharedWorld, handle: RigidBodyHandle, ground: ColliderHandle) -> Self {
        Self {
            world,
            handle,
            ground,
            body: Rc::from([handle]),
        }
    }

    /// A link of an articulated body. A pose reset carries all of `body`.
    pub fn with_body(mut self, body: Rc<[RigidBodyHandle]>) -> Self {
        self.body = body;
        self
    }

    pub fn handle(&self) -> RigidBodyHandle {
        self.handle
    }
}

impl BodyPart for RapierPart {
    fn pose(&self) -> Pose {
        let world = self.world.borrow();
        world
            .rigid_body_set
            .get(self.handle)
            .map(|body| Pose::new(*body.translation(), *body.rotation()))
            .unwrap_or_default()
    }

    fn speed(&self) -> Vector3<f32> {
        let world = self.world.borrow();
        world
            .rigid_body_set
            .get(self.handle)
            .map_or_else(Vector3::zeros, |body| *body.linvel())
    }

    fn in_ground_contact(&self) -> bool {
        let world = self.world.borrow();
        let Some(body) = world.rigid_body_set.get(self.handle) else {
            return false;
        };
        body.colliders().iter().any(|&collider| {
            world
                .narrow_phase
                .contact_pair(collider, self.ground)
                .is_some_and(|pair| pair.has_any_active_contact)
        })
    }

    /// Places this link on the pose and moves the rest of its body with it,
    /// keeping every joint as it was. The whole body comes to rest.
    fn reset_pose(&mut self, position: Vector3<f32>, orientation: UnitQuaternion<f32>) {
        let mut world = self.world.borrow_mut();
        let Some(current) = world.rigid_body_set.get(self.handle).map(|body| *body.position()) else {
            return;
        };
        let target = Isometry3::from_parts(Translation3::from(position), orientation);
        world.move_rigidly(&self.body, &(target * current.inverse()));
    }
}
