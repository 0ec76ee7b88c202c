//! A robot: one morphology bound to a loaded body, plus its task state.

use nalgebra::{UnitQuaternion, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::attack::AttackScheduler;
use crate::config::{AtlasConfig, FlagrunConfig, RewardConfig, RobotConfig};
use crate::crawl::CrawlGuard;
use crate::error::RobotResult;
use crate::goal::GoalTracker;
use crate::model::{LoadedModel, ModelLoader, ModelRequest};
use crate::morphology::Morphology;
use crate::scene::Scene;
use crate::walker::WalkerBase;

/// Every robot the benchmark ships.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RobotKind {
    Hopper,
    Walker2D,
    HalfCheetah,
    Ant,
    Humanoid,
    HumanoidFlagrun,
    HumanoidFlagrunHarder,
    Atlas,
}

impl RobotKind {
    pub const ALL: [RobotKind; 8] = [
        RobotKind::Hopper,
        RobotKind::Walker2D,
        RobotKind::HalfCheetah,
        RobotKind::Ant,
        RobotKind::Humanoid,
        RobotKind::HumanoidFlagrun,
        RobotKind::HumanoidFlagrunHarder,
        RobotKind::Atlas,
    ];

    pub fn morphology(self) -> Morphology {
        match self {
            RobotKind::Hopper => Morphology::Hopper,
            RobotKind::Walker2D => Morphology::Walker2D,
            RobotKind::HalfCheetah => Morphology::HalfCheetah,
            RobotKind::Ant => Morphology::Ant,
            RobotKind::Humanoid | RobotKind::HumanoidFlagrun | RobotKind::HumanoidFlagrunHarder => {
                Morphology::Humanoid
            }
            RobotKind::Atlas => Morphology::Atlas,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RobotKind::Hopper => "hopper",
            RobotKind::Walker2D => "walker2d",
            RobotKind::HalfCheetah => "half_cheetah",
            RobotKind::Ant => "ant",
            RobotKind::Humanoid => "humanoid",
            RobotKind::HumanoidFlagrun => "humanoid_flagrun",
            RobotKind::HumanoidFlagrunHarder => "humanoid_flagrun_harder",
            RobotKind::Atlas => "atlas",
        }
    }

    /// Multiplier on the electricity and stall-torque costs.
    pub fn electricity_scale(self) -> f32 {
        match self {
            RobotKind::Humanoid | RobotKind::HumanoidFlagrun => RewardConfig::HUMANOID_ELECTRICITY_SCALE,
            // Standing up matters more than electricity here
            RobotKind::HumanoidFlagrunHarder => RewardConfig::HUMANOID_ELECTRICITY_SCALE / 4.0,
            _ => 1.0,
        }
    }

    fn variant(self) -> Variant {
        match self {
            RobotKind::HumanoidFlagrun => Variant::Flagrun(GoalTracker::new()),
            RobotKind::HumanoidFlagrunHarder => Variant::FlagrunHarder {
                goal: GoalTracker::new(),
                attack: AttackScheduler::new(),
                crawl: CrawlGuard::new(),
            },
            _ => Variant::Plain,
        }
    }
}

/// Task state layered on top of the body.
enum Variant {
    Plain,
    Flagrun(GoalTracker),
    FlagrunHarder {
        goal: GoalTracker,
        attack: AttackScheduler,
        crawl: CrawlGuard,
    },
}

impl Variant {
    fn goal(&self) -> Option<&GoalTracker> {
        match self {
            Variant::Flagrun(goal) | Variant::FlagrunHarder { goal, .. } => Some(goal),
            Variant::Plain => None,
        }
    }

    fn goal_mut(&mut self) -> Option<&mut GoalTracker> {
        match self {
            Variant::Flagrun(goal) | Variant::FlagrunHarder { goal, .. } => Some(goal),
            Variant::Plain => None,
        }
    }
}

pub struct Robot {
    kind: RobotKind,
    pub base: WalkerBase,
    variant: Variant,
    config: RobotConfig,
    rng: StdRng,
    /// Potential the driver diffs the next tick against
    pub potential: f32,
    /// Ticks since the episode started, advanced by the driver
    pub frame: u64,
}

impl Robot {
    pub fn new(kind: RobotKind, model: LoadedModel, config: RobotConfig) -> RobotResult<Self> {
        let base = WalkerBase::new(kind.morphology(), model, &config)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        log::info!(
            "{} bound: {} joints, obs_dim={}",
            kind.name(),
            base.joints().len(),
            kind.morphology().config().obs_dim
        );

        Ok(Self {
            kind,
            base,
            variant: kind.variant(),
            config,
            rng,
            potential: 0.0,
            frame: 0,
        })
    }

    /// Ask an external loader for the body this kind of robot needs.
    pub fn load(kind: RobotKind, loader: &mut dyn ModelLoader, config: RobotConfig) -> RobotResult<Self> {
        let morphology = kind.morphology().config();
        let model = loader.load(&ModelRequest {
            model_file: morphology.model_file,
            root_part: morphology.torso,
            self_collision: morphology.self_collision,
        })?;
        Self::new(kind, model, config)
    }

    pub fn kind(&self) -> RobotKind {
        self.kind
    }

    pub fn morphology(&self) -> Morphology {
        self.kind.morphology()
    }

    pub fn action_dim(&self) -> usize {
        self.morphology().config().action_dim
    }

    pub fn obs_dim(&self) -> usize {
        self.morphology().config().obs_dim
    }

    /// Reseed the random source, typically once per episode.
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn goal(&self) -> Option<&GoalTracker> {
        self.variant.goal()
    }

    pub fn attack(&self) -> Option<&AttackScheduler> {
        match &self.variant {
            Variant::FlagrunHarder { attack, .. } => Some(attack),
            _ => None,
        }
    }

    pub fn crawl(&self) -> Option<&CrawlGuard> {
        match &self.variant {
            Variant::FlagrunHarder { crawl, .. } => Some(crawl),
            _ => None,
        }
    }

    pub fn robot_specific_reset(&mut self, scene: &mut dyn Scene) {
        self.base
            .robot_specific_reset(scene, &mut self.rng, self.kind.name());

        let morphology = self.morphology();
        morphology.apply_joint_overrides(&mut self.base);
        match morphology {
            Morphology::Humanoid => self.base.initial_z = Some(FlagrunConfig::INITIAL_Z),
            Morphology::Atlas => {
                self.set_initial_orientation(AtlasConfig::YAW_CENTER, AtlasConfig::YAW_RANDOM_SPREAD)
            }
            _ => {}
        }

        self.flag_reposition(scene);
        if let Variant::FlagrunHarder { attack, crawl, .. } = &mut self.variant {
            attack.arm(scene);
            crawl.reset();
            self.base.initial_z = Some(FlagrunConfig::INITIAL_Z);
        }
        log::debug!("{} reset", self.kind.name());
    }

    /// Face `yaw_center`, or a random direction within the spread when the
    /// config asks for it, standing a meter above the start position.
    pub fn set_initial_orientation(&mut self, yaw_center: f32, yaw_random_spread: f32) {
        let yaw = if self.config.random_yaw {
            yaw_center + self.rng.random_range(-yaw_random_spread..=yaw_random_spread)
        } else {
            yaw_center
        };

        let position = self.base.start_pos + Vector3::new(0.0, 0.0, AtlasConfig::SPAWN_LIFT);
        // Face the chosen direction, otherwise stay straight
        let orientation = UnitQuaternion::from_euler_angles(0.0, 0.0, yaw);
        self.base.torso_mut().reset_pose(position, orientation);
        self.base.initial_z = Some(AtlasConfig::INITIAL_Z);
    }

    /// # Panics
    ///
    /// On a non-finite action or one of the wrong length.
    pub fn apply_action(&mut self, action: &[f32]) {
        let clamp = self.morphology().clamps_actions();
        self.base.apply_action(action, clamp);
    }

    pub fn calc_state(&mut self, scene: &mut dyn Scene) -> Vec<f32> {
        if let Some(goal) = self.variant.goal_mut() {
            goal.tick();
        }
        let state = self.base.calc_state();

        let reached = self
            .variant
            .goal()
            .is_some_and(|goal| goal.needs_reposition(self.base.walk_target_dist));
        if !reached {
            return state;
        }

        self.flag_reposition(scene);
        // Against the new flag, and without a reward jump at the switch
        let state = self.base.calc_state();
        self.potential = self.calc_potential(scene);
        state
    }

    pub fn flag_reposition(&mut self, scene: &mut dyn Scene) {
        if let Some(goal) = self.variant.goal_mut() {
            let target = goal.flag_reposition(scene, &mut self.rng);
            self.base.walk_target_x = target.x;
            self.base.walk_target_y = target.y;
        }
    }

    /// Per-tick liveness reward; negative ends the episode.
    pub fn alive_bonus(&mut self, z: f32, pitch: f32) -> f32 {
        match &mut self.variant {
            Variant::FlagrunHarder { attack, crawl, .. } => {
                if AttackScheduler::is_due(self.frame, crawl.on_ground_frame_counter) {
                    let speed = self.base.torso().speed();
                    let launch = AttackScheduler::plan(self.base.body_xyz, speed, &mut self.rng);
                    attack.launch(&launch);
                }
                crawl.update_ground_counter(z);
                crawl.alive_bonus(self.base.body_xyz.z)
            }
            _ => self.kind.morphology().alive_bonus(&self.base, z, pitch),
        }
    }

    pub fn calc_potential(&mut self, scene: &dyn Scene) -> f32 {
        let progress = self.base.calc_potential(scene.dt());
        match &mut self.variant {
            Variant::FlagrunHarder { crawl, .. } => crawl.calc_potential(progress, self.base.body_xyz.z),
            _ => progress,
        }
    }
}
