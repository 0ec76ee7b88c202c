//! Revolute motor joint backed by an impulse joint.
//!
//! The joint frames follow rapier's convention: the local X axis of both
//! frames is the rotation axis, and the frames coincide at angle zero.

use locomotors::Joint;
use nalgebra::{Isometry3, Vector3};
use rapier3d::prelude::*;

use crate::SharedWorld;

pub struct RapierJoint {
    world: SharedWorld,
    handle: ImpulseJointHandle,
}

/// Raw joint reading in world terms.
#[derive(Clone, Copy, Debug, PartialEq)]
struct JointReading {
    angle: f32,
    speed: f32,
    limits: Option<[f32; 2]>,
}

impl RapierJoint {
    pub fn new(world: SharedWorld, handle: ImpulseJointHandle) -> Self {
        Self { world, handle }
    }

    pub fn handle(&self) -> ImpulseJointHandle {
        self.handle
    }

    fn read(&self) -> Option<JointReading> {
        let world = self.world.borrow();
        let joint = world.impulse_joint_set.get(self.handle)?;
        let parent = world.rigid_body_set.get(joint.body1)?;
        let child = world.rigid_body_set.get(joint.body2)?;

        let frame1 = parent.position() * joint.data.local_frame1;
        let frame2 = child.position() * joint.data.local_frame2;
        let axis = frame1.rotation * Vector3::x();

        Some(JointReading {
            angle: (frame1.rotation.inverse() * frame2.rotation).scaled_axis().x,
            speed: (child.angvel() - parent.angvel()).dot(&axis),
            limits: joint
                .data
                .limits(JointAxis::AngX)
                .map(|limits| [limits.min, limits.max]),
        })
    }

    /// Raw angle in radians.
    pub fn angle(&self) -> f32 {
        self.read().map_or(0.0, |reading| reading.angle)
    }
}

impl Joint for RapierJoint {
    fn current_relative_position(&self) -> (f32, f32) {
        let Some(reading) = self.read() else {
            return (0.0, 0.0);
        };
        let position = match reading.limits {
            Some([lower, upper]) if upper > lower => {
                let mid = 0.5 * (lower + upper);
                2.0 * (reading.angle - mid) / (upper - lower)
            }
            _ => reading.angle,
        };
        (position, 0.1 * reading.speed)
    }

    /// Places the child link at the requested angle relative to its parent.
    /// Links further down the chain move when their own joint is reset, so
    /// joints must be reset parent first.
    fn reset_current_position(&mut self, position: f32, velocity: f32) {
        let mut world = self.world.borrow_mut();
        let Some(joint) = world.impulse_joint_set.get(self.handle) else {
            log::warn!("reset on a removed joint");
            return;
        };
        let (parent, child) = (joint.body1, joint.body2);
        let (local_frame1, local_frame2) = (joint.data.local_frame1, joint.data.local_frame2);

        let Some(parent) = world.rigid_body_set.get(parent) else {
            return;
        };
        let frame1 = parent.position() * local_frame1;
        let pose = frame1 * Isometry3::rotation(Vector3::x() * position) * local_frame2.inverse();
        let axis = frame1.rotation * Vector3::x();
        let linvel = *parent.linvel();
        let angvel = parent.angvel() + axis * velocity;

        if let Some(child) = world.rigid_body_set.get_mut(child) {
            child.set_position(pose, true);
            child.set_linvel(linvel, true);
            child.set_angvel(angvel, true);
        }
    }

    fn set_motor_torque(&mut self, torque: f32) {
        let mut world = self.world.borrow_mut();
        let Some(joint) = world.impulse_joint_set.get(self.handle) else {
            return;
        };
        let (parent, child, local_frame1) = (joint.body1, joint.body2, joint.data.local_frame1);
        let Some(axis) = world
            .rigid_body_set
            .get(parent)
            .map(|body| (body.position() * local_frame1).rotation * Vector3::x())
        else {
            return;
        };

        // Equal and opposite on the two links
        if let Some(body) = world.rigid_body_set.get_mut(child) {
            body.add_torque(axis * torque, true);
        }
        if let Some(body) = world.rigid_body_set.get_mut(parent) {
            body.add_torque(-axis * torque, true);
        }
    }
}
