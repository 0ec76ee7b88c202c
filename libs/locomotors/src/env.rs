//! Episode driver: applies actions, steps physics and scores each tick.

use crate::config::RewardConfig;
use crate::robot::Robot;
use crate::scene::{PhysicsStep, Scene};

/// Reward terms of one tick. Their sum is the reward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RewardBreakdown {
    pub alive: f32,
    pub progress: f32,
    pub electricity_cost: f32,
    pub joints_at_limit_cost: f32,
}

impl RewardBreakdown {
    pub fn total(&self) -> f32 {
        self.alive + self.progress + self.electricity_cost + self.joints_at_limit_cost
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    pub observation: Vec<f32>,
    pub reward: f32,
    pub done: bool,
    pub rewards: RewardBreakdown,
}

pub struct LocomotionEnv<S: Scene + PhysicsStep> {
    robot: Robot,
    scene: S,
    electricity_cost: f32,
    stall_torque_cost: f32,
}

impl<S: Scene + PhysicsStep> LocomotionEnv<S> {
    pub fn new(robot: Robot, scene: S) -> Self {
        let scale = robot.kind().electricity_scale();
        Self {
            robot,
            scene,
            electricity_cost: scale * RewardConfig::ELECTRICITY_COST,
            stall_torque_cost: scale * RewardConfig::STALL_TORQUE_COST,
        }
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn robot_mut(&mut self) -> &mut Robot {
        &mut self.robot
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn into_parts(self) -> (Robot, S) {
        (self.robot, self.scene)
    }

    /// Start a new episode and return the first observation.
    pub fn reset(&mut self) -> Vec<f32> {
        self.scene.restore_initial_state();
        self.robot.robot_specific_reset(&mut self.scene);
        self.robot.frame = 0;
        let state = self.robot.calc_state(&mut self.scene);
        self.robot.potential = self.robot.calc_potential(&self.scene);
        log::info!(
            "{} episode start, target at {:.1} m",
            self.robot.kind().name(),
            self.robot.base.walk_target_dist
        );
        state
    }

    /// Advance one tick.
    ///
    /// # Panics
    ///
    /// On a non-finite action or one of the wrong length.
    pub fn step(&mut self, action: &[f32]) -> StepResult {
        self.robot.apply_action(action);
        self.scene.global_step();
        self.robot.frame += 1;

        let state = self.robot.calc_state(&mut self.scene);
        // Height as observed, so it carries the observation clip
        let base = &self.robot.base;
        let z = state[0] + base.initial_z.unwrap_or(base.body_xyz.z);
        let pitch = base.body_rpy.y;
        let alive = self.robot.alive_bonus(z, pitch);

        let mut done = alive < 0.0;
        if !state.iter().all(|x| x.is_finite()) {
            log::warn!("non-finite observation at frame {}: {:?}", self.robot.frame, state);
            done = true;
        }

        let potential_old = self.robot.potential;
        self.robot.potential = self.robot.calc_potential(&self.scene);
        let progress = self.robot.potential - potential_old;

        let n = action.len() as f32;
        let power_used = action
            .iter()
            .zip(&self.robot.base.joint_speeds)
            .map(|(a, speed)| (a * speed).abs())
            .sum::<f32>()
            / n;
        let stall = action.iter().map(|a| a * a).sum::<f32>() / n;
        let electricity_cost = self.electricity_cost * power_used + self.stall_torque_cost * stall;
        let joints_at_limit_cost = RewardConfig::JOINTS_AT_LIMIT_COST * self.robot.base.joints_at_limit as f32;

        let rewards = RewardBreakdown {
            alive,
            progress,
            electricity_cost,
            joints_at_limit_cost,
        };
        if done {
            log::debug!(
                "{} episode over at frame {} (alive {:.2})",
                self.robot.kind().name(),
                self.robot.frame,
                alive
            );
        }

        StepResult {
            observation: state,
            reward: rewards.total(),
            done,
            rewards,
        }
    }
}
