//! In-memory stand-ins for the physics collaborators.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use nalgebra::{UnitQuaternion, Vector3};

use crate::body::{BodyPart, Joint, Pose};
use crate::config::{ATLAS_HEAD, ATLAS_KNEES, HUMANOID_MOTORS};
use crate::model::LoadedModel;
use crate::morphology::Morphology;
use crate::scene::{PhysicsStep, Prop, PropFactory, Scene};

#[derive(Debug, Default)]
pub struct FakeJointState {
    pub position: f32,
    pub velocity: f32,
    pub torque: f32,
    pub reset: Option<(f32, f32)>,
}

pub struct FakeJoint(Rc<RefCell<FakeJointState>>);

impl Joint for FakeJoint {
    fn current_relative_position(&self) -> (f32, f32) {
        let state = self.0.borrow();
        (state.position, state.velocity)
    }

    fn reset_current_position(&mut self, position: f32, velocity: f32) {
        self.0.borrow_mut().reset = Some((position, velocity));
    }

    fn set_motor_torque(&mut self, torque: f32) {
        self.0.borrow_mut().torque = torque;
    }
}

#[derive(Debug, Default)]
pub struct FakePartState {
    pub pose: Pose,
    pub speed: Vector3<f32>,
    pub contact: bool,
}

pub struct FakePart(Rc<RefCell<FakePartState>>);

impl BodyPart for FakePart {
    fn pose(&self) -> Pose {
        self.0.borrow().pose
    }

    fn speed(&self) -> Vector3<f32> {
        self.0.borrow().speed
    }

    fn in_ground_contact(&self) -> bool {
        self.0.borrow().contact
    }

    fn reset_pose(&mut self, position: Vector3<f32>, orientation: UnitQuaternion<f32>) {
        self.0.borrow_mut().pose = Pose::new(position, orientation);
    }
}

/// A fake body with the joint and part names a morphology expects.
pub struct Rig {
    joint_names: Vec<String>,
    joints: HashMap<String, Rc<RefCell<FakeJointState>>>,
    parts: HashMap<String, Rc<RefCell<FakePartState>>>,
    model: Option<LoadedModel>,
}

impl Rig {
    pub fn new(morphology: Morphology) -> Self {
        let config = morphology.config();
        let mut joint_names: Vec<String> = match morphology {
            Morphology::Walker2D => [
                "thigh_joint",
                "leg_joint",
                "foot_joint",
                "thigh_left_joint",
                "leg_left_joint",
                "foot_left_joint",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            Morphology::HalfCheetah => ["bthigh", "bshin", "bfoot", "fthigh", "fshin", "ffoot"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            // Load order deliberately differs from actuation order
            Morphology::Humanoid => HUMANOID_MOTORS.iter().rev().map(|(n, _)| n.to_string()).collect(),
            Morphology::Atlas => ATLAS_KNEES.iter().map(|s| s.to_string()).collect(),
            Morphology::Hopper | Morphology::Ant => Vec::new(),
        };
        let mut i = 0;
        while joint_names.len() < config.action_dim {
            joint_names.push(format!("joint_{}", i));
            i += 1;
        }

        let mut part_names: Vec<&str> = vec![config.torso];
        part_names.extend(config.foot_list.iter().copied());
        if morphology == Morphology::Atlas {
            part_names.push(ATLAS_HEAD);
        }

        let mut model = LoadedModel::new();
        let mut joints = HashMap::new();
        for name in &joint_names {
            let state = Rc::new(RefCell::new(FakeJointState::default()));
            model = model.with_joint(name.clone(), Box::new(FakeJoint(state.clone())));
            joints.insert(name.clone(), state);
        }
        let mut parts = HashMap::new();
        for name in part_names {
            let state = Rc::new(RefCell::new(FakePartState::default()));
            model = model.with_part(name, Box::new(FakePart(state.clone())));
            parts.insert(name.to_string(), state);
        }

        Self {
            joint_names,
            joints,
            parts,
            model: Some(model),
        }
    }

    /// Hand the model to a robot. Only once per rig.
    pub fn take_model(&mut self) -> LoadedModel {
        self.model.take().unwrap()
    }

    /// Joint names in load order.
    pub fn joint_names(&self) -> Vec<String> {
        self.joint_names.clone()
    }

    pub fn joint(&self, name: &str) -> &Rc<RefCell<FakeJointState>> {
        &self.joints[name]
    }

    pub fn part(&self, name: &str) -> &Rc<RefCell<FakePartState>> {
        &self.parts[name]
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Move every part to the same height, torso included.
    pub fn set_height(&self, z: f32) {
        for part in self.parts.values() {
            part.borrow_mut().pose.position.z = z;
        }
    }

    /// Move every part by the same planar offset.
    pub fn set_xy(&self, x: f32, y: f32) {
        for part in self.parts.values() {
            let mut part = part.borrow_mut();
            part.pose.position.x = x;
            part.pose.position.y = y;
        }
    }
}

#[derive(Debug, Default)]
pub struct FakePropState {
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    pub removed: bool,
}

pub struct FakeProp(Rc<RefCell<FakePropState>>);

impl Prop for FakeProp {
    fn reset_position(&mut self, position: Vector3<f32>) {
        self.0.borrow_mut().position = position;
    }

    fn reset_velocity(&mut self, linear_velocity: Vector3<f32>) {
        self.0.borrow_mut().velocity = linear_velocity;
    }
}

impl Drop for FakeProp {
    fn drop(&mut self) {
        self.0.borrow_mut().removed = true;
    }
}

pub struct FakeScene {
    pub dt: f32,
    pub halflen: f32,
    pub halfwidth: f32,
    pub introduced: Vec<String>,
    pub spheres: Vec<Rc<RefCell<FakePropState>>>,
    pub cubes: Vec<Rc<RefCell<FakePropState>>>,
    pub steps: usize,
    pub restores: usize,
}

impl Default for FakeScene {
    fn default() -> Self {
        Self {
            dt: 0.0165,
            halflen: 26.25,
            halfwidth: 12.5,
            introduced: Vec::new(),
            spheres: Vec::new(),
            cubes: Vec::new(),
            steps: 0,
            restores: 0,
        }
    }
}

impl PropFactory for FakeScene {
    fn spawn_sphere(&mut self, position: Vector3<f32>) -> Box<dyn Prop> {
        let state = Rc::new(RefCell::new(FakePropState {
            position,
            ..Default::default()
        }));
        self.spheres.push(state.clone());
        Box::new(FakeProp(state))
    }

    fn spawn_cube(&mut self, position: Vector3<f32>) -> Box<dyn Prop> {
        let state = Rc::new(RefCell::new(FakePropState {
            position,
            ..Default::default()
        }));
        self.cubes.push(state.clone());
        Box::new(FakeProp(state))
    }
}

impl Scene for FakeScene {
    fn dt(&self) -> f32 {
        self.dt
    }

    fn stadium_halflen(&self) -> f32 {
        self.halflen
    }

    fn stadium_halfwidth(&self) -> f32 {
        self.halfwidth
    }

    fn actor_introduce(&mut self, actor: &str) {
        self.introduced.push(actor.to_string());
    }
}

impl PhysicsStep for FakeScene {
    fn global_step(&mut self) {
        self.steps += 1;
    }

    fn restore_initial_state(&mut self) {
        self.restores += 1;
    }
}
