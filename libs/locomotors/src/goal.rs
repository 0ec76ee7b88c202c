//! Flag-run goal: a walk target that moves whenever it is reached or stale.

use nalgebra::{Vector2, Vector3};
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::FlagrunConfig;
use crate::scene::{Prop, Scene};

pub struct GoalTracker {
    pub target: Vector2<f32>,
    /// Ticks left before the flag moves on its own
    pub flag_timeout: i32,
    flag: Option<Box<dyn Prop>>,
}

impl GoalTracker {
    pub fn new() -> Self {
        Self {
            target: Vector2::zeros(),
            flag_timeout: FlagrunConfig::FLAG_TIMEOUT,
            flag: None,
        }
    }

    /// Pick a new target in the central part of the stadium and move the
    /// marker there. Returns the new target.
    pub fn flag_reposition(&mut self, scene: &mut dyn Scene, rng: &mut StdRng) -> Vector2<f32> {
        let halflen = scene.stadium_halflen();
        let halfwidth = scene.stadium_halfwidth();
        let x = rng.random_range(-halflen..=halflen) * FlagrunConfig::MORE_COMPACT;
        let y = rng.random_range(-halfwidth..=halfwidth) * FlagrunConfig::MORE_COMPACT;
        self.target = Vector2::new(x, y);

        // Drop the old marker before the new one appears
        self.flag = None;
        self.flag = Some(scene.spawn_sphere(Vector3::new(x, y, FlagrunConfig::FLAG_HEIGHT)));
        self.flag_timeout = FlagrunConfig::FLAG_TIMEOUT;

        log::debug!("flag moved to ({:.2}, {:.2})", x, y);
        self.target
    }

    pub fn tick(&mut self) {
        self.flag_timeout -= 1;
    }

    pub fn needs_reposition(&self, walk_target_dist: f32) -> bool {
        walk_target_dist < FlagrunConfig::REACHED_DIST || self.flag_timeout <= 0
    }

    pub fn has_flag(&self) -> bool {
        self.flag.is_some()
    }
}

impl Default for GoalTracker {
    fn default() -> Self {
        Self::new()
    }
}
