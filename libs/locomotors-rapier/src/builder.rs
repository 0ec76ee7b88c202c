//! Assembles a robot body link by link and hands it over as a `LoadedModel`.
//!
//! Parsing MJCF or URDF is up to the caller. Links and joints must be added
//! root first, so the joint list comes out in an order that resets cleanly.
//! The pose every link has when the body is built is where each episode
//! starts it again.

use std::collections::HashMap;
use std::rc::Rc;

use locomotors::LoadedModel;
use rapier3d::prelude::*;

use crate::error::{PhysicsError, PhysicsResult};
use crate::joint::RapierJoint;
use crate::part::RapierPart;
use crate::physics::{GROUND_GROUP, PROP_GROUP, ROBOT_GROUP};
use crate::SharedWorld;

pub struct ModelBuilder {
    world: SharedWorld,
    ground: ColliderHandle,
    groups: InteractionGroups,
    links: HashMap<String, RigidBodyHandle>,
    order: Vec<(String, RigidBodyHandle)>,
    model: LoadedModel,
}

impl ModelBuilder {
    pub fn new(world: SharedWorld, ground: ColliderHandle, self_collision: bool) -> Self {
        let filter = if self_collision {
            Group::ALL
        } else {
            GROUND_GROUP | PROP_GROUP
        };
        Self {
            world,
            ground,
            groups: InteractionGroups::new(ROBOT_GROUP, filter),
            links: HashMap::new(),
            order: Vec::new(),
            model: LoadedModel::new(),
        }
    }

    /// Add a link with its collision shape.
    pub fn link(&mut self, name: &str, body: RigidBodyBuilder, shape: ColliderBuilder) -> PhysicsResult<RigidBodyHandle> {
        if self.links.contains_key(name) {
            return Err(PhysicsError::DuplicateLink(name.to_string()));
        }

        let mut guard = self.world.try_borrow_mut()?;
        let world = &mut *guard;
        let handle = world.rigid_body_set.insert(body.build());
        let collider = shape.collision_groups(self.groups).build();
        world
            .collider_set
            .insert_with_parent(collider, handle, &mut world.rigid_body_set);
        drop(guard);

        self.links.insert(name.to_string(), handle);
        self.order.push((name.to_string(), handle));
        Ok(handle)
    }

    /// Add a motorised hinge between two links already added.
    pub fn revolute(
        &mut self,
        name: &str,
        parent: &str,
        child: &str,
        joint: RevoluteJointBuilder,
    ) -> PhysicsResult<ImpulseJointHandle> {
        if parent == child {
            return Err(PhysicsError::SelfJoint {
                name: name.to_string(),
                link: parent.to_string(),
            });
        }
        let parent = self.lookup(parent)?;
        let child = self.lookup(child)?;

        let handle = self
            .world
            .try_borrow_mut()?
            .impulse_joint_set
            .insert(parent, child, joint.contacts_enabled(false), true);
        self.model
            .joints
            .push((name.to_string(), Box::new(RapierJoint::new(self.world.clone(), handle))));
        Ok(handle)
    }

    fn lookup(&self, link: &str) -> PhysicsResult<RigidBodyHandle> {
        self.links
            .get(link)
            .copied()
            .ok_or_else(|| PhysicsError::UnknownLink(link.to_string()))
    }

    /// Finish the body and save its current pose as the episode start.
    pub fn build(mut self) -> PhysicsResult<LoadedModel> {
        let body: Rc<[RigidBodyHandle]> = self.order.iter().map(|(_, handle)| *handle).collect();
        self.world.try_borrow_mut()?.save_home(&body);

        for (name, handle) in self.order {
            let part = RapierPart::new(self.world.clone(), handle, self.ground).with_body(body.clone());
            self.model.parts.push((name, Box::new(part)));
        }
        log::debug!(
            "built body: {} links, {} joints",
            self.model.parts.len(),
            self.model.joints.len()
        );
        Ok(self.model)
    }
}
