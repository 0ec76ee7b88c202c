//! The rapier world a stadium runs on, with the bookkeeping episodes need:
//! where each robot link started, and per-tick torque clearing.

use nalgebra::{Isometry3, Vector3};
use rapier3d::prelude::*;

/// Collision groups: ground, robot links, free props.
pub const GROUND_GROUP: Group = Group::GROUP_1;
pub const ROBOT_GROUP: Group = Group::GROUP_2;
pub const PROP_GROUP: Group = Group::GROUP_3;

pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub impulse_joint_set: ImpulseJointSet,
    pub narrow_phase: NarrowPhase,
    pub gravity: Vector<f32>,
    pub integration_parameters: IntegrationParameters,
    multibody_joint_set: MultibodyJointSet,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    ccd: CCDSolver,
    /// Build-time pose of every robot link, restored between episodes.
    home: Vec<(RigidBodyHandle, Isometry3<f32>)>,
}

impl PhysicsWorld {
    /// Z-up world stepping `timestep` seconds per `step`.
    pub fn new(timestep: f32) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: timestep,
            ..Default::default()
        };

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            narrow_phase: NarrowPhase::new(),
            gravity: vector![0.0, 0.0, -9.81],
            integration_parameters,
            multibody_joint_set: MultibodyJointSet::new(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            ccd: CCDSolver::new(),
            home: Vec::new(),
        }
    }

    /// One physics substep.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
    }

    /// One robot tick: `substeps` steps under the torques set for it, which
    /// are then cleared. Torques otherwise stay applied until removed.
    pub fn advance(&mut self, substeps: u32) {
        for _ in 0..substeps {
            self.step();
        }
        for (_, body) in self.rigid_body_set.iter_mut() {
            body.reset_torques(false);
        }
    }

    /// Infinite floor through the origin.
    pub fn add_ground(&mut self) -> ColliderHandle {
        let ground = ColliderBuilder::halfspace(Vector::z_axis())
            .friction(0.8)
            .collision_groups(InteractionGroups::new(GROUND_GROUP, Group::ALL))
            .build();
        self.collider_set.insert(ground)
    }

    /// Remove a body together with its colliders and joints.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.home.retain(|(home, _)| *home != handle);
        self.rigid_body_set
            .remove(
                handle,
                &mut self.islands,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some()
    }

    /// Record where these links are now as their episode start.
    pub fn save_home(&mut self, links: &[RigidBodyHandle]) {
        for &handle in links {
            let Some(body) = self.rigid_body_set.get(handle) else {
                continue;
            };
            let pose = *body.position();
            match self.home.iter_mut().find(|(home, _)| *home == handle) {
                Some((_, saved)) => *saved = pose,
                None => self.home.push((handle, pose)),
            }
        }
    }

    /// Put every saved link back on its home pose, at rest.
    pub fn restore_home(&mut self) {
        for (handle, pose) in &self.home {
            if let Some(body) = self.rigid_body_set.get_mut(*handle) {
                body.set_position(*pose, true);
                settle(body);
            }
        }
        log::debug!("restored {} links to their start", self.home.len());
    }

    /// Apply one rigid transform to a group of links and stop them.
    pub fn move_rigidly(&mut self, links: &[RigidBodyHandle], transform: &Isometry3<f32>) {
        for &handle in links {
            if let Some(body) = self.rigid_body_set.get_mut(handle) {
                let pose = transform * body.position();
                body.set_position(pose, true);
                settle(body);
            }
        }
    }
}

fn settle(body: &mut RigidBody) {
    body.set_linvel(Vector3::zeros(), true);
    body.set_angvel(Vector3::zeros(), true);
    body.reset_forces(true);
    body.reset_torques(true);
}
