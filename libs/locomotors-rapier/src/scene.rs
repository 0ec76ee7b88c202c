//! Football stadium: a flat floor, fixed timing and the props robots spawn.

use std::cell::RefCell;
use std::rc::Rc;

use locomotors::{PhysicsStep, Prop, PropFactory, Scene, StadiumConfig};
use nalgebra::Vector3;
use rapier3d::prelude::*;

use crate::builder::ModelBuilder;
use crate::physics::{PhysicsWorld, PROP_GROUP};
use crate::prop::RapierProp;
use crate::SharedWorld;

const FLAG_RADIUS: f32 = 0.05;
const CUBE_HALF_EXTENT: f32 = 0.025;
const CUBE_MASS: f32 = 0.1;

pub struct StadiumScene {
    world: SharedWorld,
    config: StadiumConfig,
    ground: ColliderHandle,
    actors: Vec<String>,
}

impl StadiumScene {
    pub fn new(config: StadiumConfig) -> Self {
        let mut world = PhysicsWorld::new(config.timestep);
        let ground = world.add_ground();
        log::info!(
            "stadium {}x{} m, dt={:.4}s over {} substeps",
            2.0 * config.halflen,
            2.0 * config.halfwidth,
            config.dt(),
            config.frame_skip
        );

        Self {
            world: Rc::new(RefCell::new(world)),
            config,
            ground,
            actors: Vec::new(),
        }
    }

    pub fn world(&self) -> &SharedWorld {
        &self.world
    }

    pub fn ground(&self) -> ColliderHandle {
        self.ground
    }

    pub fn config(&self) -> &StadiumConfig {
        &self.config
    }

    /// Actors introduced since the scene was created.
    pub fn actors(&self) -> &[String] {
        &self.actors
    }

    /// Start a robot body in this stadium.
    pub fn model_builder(&self, self_collision: bool) -> ModelBuilder {
        ModelBuilder::new(self.world.clone(), self.ground, self_collision)
    }

    fn spawn(&mut self, body: RigidBody, collider: Collider) -> Box<dyn Prop> {
        let mut guard = self.world.borrow_mut();
        let world = &mut *guard;
        let handle = world.rigid_body_set.insert(body);
        world
            .collider_set
            .insert_with_parent(collider, handle, &mut world.rigid_body_set);
        drop(guard);
        Box::new(RapierProp::new(self.world.clone(), handle))
    }
}

impl Default for StadiumScene {
    fn default() -> Self {
        Self::new(StadiumConfig::default())
    }
}

impl PropFactory for StadiumScene {
    fn spawn_sphere(&mut self, position: Vector3<f32>) -> Box<dyn Prop> {
        let body = RigidBodyBuilder::fixed().translation(position).build();
        // Marker only, nothing collides with it
        let collider = ColliderBuilder::ball(FLAG_RADIUS)
            .sensor(true)
            .collision_groups(InteractionGroups::new(PROP_GROUP, Group::NONE))
            .build();
        self.spawn(body, collider)
    }

    fn spawn_cube(&mut self, position: Vector3<f32>) -> Box<dyn Prop> {
        let body = RigidBodyBuilder::dynamic()
            .translation(position)
            .ccd_enabled(true)
            .build();
        let collider = ColliderBuilder::cuboid(CUBE_HALF_EXTENT, CUBE_HALF_EXTENT, CUBE_HALF_EXTENT)
            .mass(CUBE_MASS)
            .collision_groups(InteractionGroups::new(PROP_GROUP, Group::ALL))
            .build();
        self.spawn(body, collider)
    }
}

impl Scene for StadiumScene {
    fn dt(&self) -> f32 {
        self.config.dt()
    }

    fn stadium_halflen(&self) -> f32 {
        self.config.halflen
    }

    fn stadium_halfwidth(&self) -> f32 {
        self.config.halfwidth
    }

    fn actor_introduce(&mut self, actor: &str) {
        if !self.actors.iter().any(|known| known == actor) {
            log::debug!("actor '{}' enters the stadium", actor);
            self.actors.push(actor.to_string());
        }
    }
}

impl PhysicsStep for StadiumScene {
    /// Torques set for this tick act over every substep, then clear.
    fn global_step(&mut self) {
        self.world.borrow_mut().advance(self.config.frame_skip);
    }

    fn restore_initial_state(&mut self) {
        self.world.borrow_mut().restore_home();
    }
}
