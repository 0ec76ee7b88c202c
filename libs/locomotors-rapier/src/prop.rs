use locomotors::Prop;
use nalgebra::Vector3;
use rapier3d::prelude::*;

use crate::SharedWorld;

/// A free body owned by the robot that spawned it. Dropping it removes the
/// body from the world.
pub struct RapierProp {
    world: SharedWorld,
    handle: RigidBodyHandle,
}

impl RapierProp {
    pub fn new(world: SharedWorld, handle: RigidBodyHandle) -> Self {
        Self { world, handle }
    }

    pub fn handle(&self) -> RigidBodyHandle {
        self.handle
    }
}

impl Prop for RapierProp {
    fn reset_position(&mut self, position: Vector3<f32>) {
        let mut world = self.world.borrow_mut();
        if let Some(body) = world.rigid_body_set.get_mut(self.handle) {
            body.set_translation(position, true);
            body.set_angvel(Vector3::zeros(), true);
        }
    }

    fn reset_velocity(&mut self, linear_velocity: Vector3<f32>) {
        let mut world = self.world.borrow_mut();
        if let Some(body) = world.rigid_body_set.get_mut(self.handle) {
            body.set_linvel(linear_velocity, true);
        }
    }
}

impl Drop for RapierProp {
    fn drop(&mut self) {
        match self.world.try_borrow_mut() {
            Ok(mut world) => {
                world.remove_body(self.handle);
            }
            Err(_) => log::warn!("physics world busy, prop {:?} left in place", self.handle),
        }
    }
}
