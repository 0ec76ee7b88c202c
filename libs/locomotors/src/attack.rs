//! Cube attacks on a standing humanoid.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::HarderConfig;
use crate::scene::{Prop, Scene};

/// Where a cube is placed and how fast it flies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Launch {
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
}

pub struct AttackScheduler {
    cube: Option<Box<dyn Prop>>,
    pub launches: u32,
}

impl AttackScheduler {
    pub fn new() -> Self {
        Self {
            cube: None,
            launches: 0,
        }
    }

    /// Place a fresh cube next to the start position.
    pub fn arm(&mut self, scene: &mut dyn Scene) {
        self.cube = None;
        self.cube = Some(scene.spawn_cube(Vector3::from(HarderConfig::CUBE_SPAWN)));
        self.launches = 0;
    }

    /// Attacks come every 30 ticks once the episode is past its first 100,
    /// and only while the robot is up.
    pub fn is_due(frame: u64, on_ground_frame_counter: u32) -> bool {
        frame % HarderConfig::ATTACK_PERIOD == 0
            && frame > HarderConfig::ATTACK_AFTER
            && on_ground_frame_counter == 0
    }

    /// Aim at where the robot will be when the cube arrives, assuming it
    /// keeps its current velocity.
    pub fn plan(body_xyz: Vector3<f32>, robot_speed: Vector3<f32>, rng: &mut StdRng) -> Launch {
        let angle = rng.random_range(-HarderConfig::ATTACK_ANGLE..HarderConfig::ATTACK_ANGLE);
        let from_dist = HarderConfig::ATTACK_DISTANCE;
        let attack_speed = rng.random_range(HarderConfig::ATTACK_SPEED_MIN..HarderConfig::ATTACK_SPEED_MAX);
        let time_to_travel = from_dist / attack_speed;
        let target = body_xyz + robot_speed * time_to_travel;

        let position = Vector3::new(
            target.x + from_dist * angle.cos(),
            target.y + from_dist * angle.sin(),
            target.z + HarderConfig::ATTACK_LIFT,
        );
        let noise = HarderConfig::ATTACK_NOISE;
        let jitter = Vector3::from_fn(|_, _| rng.random_range(-noise..noise));
        let velocity = (target - position).normalize() * attack_speed + jitter;

        Launch { position, velocity }
    }

    pub fn launch(&mut self, launch: &Launch) {
        if let Some(cube) = self.cube.as_mut() {
            cube.reset_position(launch.position);
            cube.reset_velocity(launch.velocity);
            self.launches += 1;
            log::debug!(
                "cube launched from ({:.2}, {:.2}, {:.2}) at {:.1} m/s",
                launch.position.x,
                launch.position.y,
                launch.position.z,
                launch.velocity.norm()
            );
        }
    }

    pub fn is_armed(&self) -> bool {
        self.cube.is_some()
    }
}

impl Default for AttackScheduler {
    fn default() -> Self {
        Self::new()
    }
}
