use serde::{Deserialize, Serialize};

use crate::error::RobotResult;

/// Static description of one robot body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MorphologyConfig {
    pub model_file: &'static str,
    /// Part whose pose stands for the whole robot.
    pub torso: &'static str,
    pub power: f32,
    pub action_dim: usize,
    pub obs_dim: usize,
    /// Parts whose ground contact is part of the observation.
    pub foot_list: &'static [&'static str],
    pub self_collision: bool,
}

pub const HOPPER: MorphologyConfig = MorphologyConfig {
    model_file: "hopper.xml",
    torso: "torso",
    power: 0.75,
    action_dim: 3,
    obs_dim: 15,
    foot_list: &["foot"],
    self_collision: false,
};

pub const WALKER2D: MorphologyConfig = MorphologyConfig {
    model_file: "walker2d.xml",
    torso: "torso",
    power: 0.40,
    action_dim: 6,
    obs_dim: 22,
    foot_list: &["foot", "foot_left"],
    self_collision: false,
};

pub const HALF_CHEETAH: MorphologyConfig = MorphologyConfig {
    model_file: "half_cheetah.xml",
    torso: "torso",
    power: 0.90,
    action_dim: 6,
    obs_dim: 26,
    // Thighs and shins are tracked too: touching the ground with them ends the episode
    foot_list: &["ffoot", "fshin", "fthigh", "bfoot", "bshin", "bthigh"],
    self_collision: false,
};

pub const ANT: MorphologyConfig = MorphologyConfig {
    model_file: "ant.xml",
    torso: "torso",
    power: 10.5,
    action_dim: 8,
    obs_dim: 28,
    foot_list: &[
        "front_left_foot",
        "front_right_foot",
        "left_back_foot",
        "right_back_foot",
    ],
    self_collision: false,
};

pub const HUMANOID: MorphologyConfig = MorphologyConfig {
    model_file: "humanoid_symmetric.xml",
    torso: "torso",
    power: 0.41,
    action_dim: 17,
    obs_dim: 44,
    foot_list: &["right_foot", "left_foot"],
    self_collision: true,
};

pub const ATLAS: MorphologyConfig = MorphologyConfig {
    model_file: "atlas/atlas_description/atlas_v4_with_multisense.urdf",
    torso: "pelvis",
    power: 2.9,
    action_dim: 30,
    obs_dim: 70,
    foot_list: &["r_foot", "l_foot"],
    self_collision: false,
};

/// Per-joint torque coefficients applied on every Walker2D reset.
pub const WALKER2D_POWER_COEFS: &[(&str, f32)] = &[("foot_joint", 30.0), ("foot_left_joint", 30.0)];

pub const HALF_CHEETAH_POWER_COEFS: &[(&str, f32)] = &[
    ("bthigh", 120.0),
    ("bshin", 90.0),
    ("bfoot", 60.0),
    ("fthigh", 140.0),
    ("fshin", 60.0),
    ("ffoot", 30.0),
];

/// Humanoid actuation order. Action index `i` drives motor `i` of this list.
/// Hips and knees carry the locomotion, the rest could as well be off.
pub const HUMANOID_MOTORS: &[(&str, f32)] = &[
    ("abdomen_z", 100.0),
    ("abdomen_y", 100.0),
    ("abdomen_x", 100.0),
    ("right_hip_x", 100.0),
    ("right_hip_z", 100.0),
    ("right_hip_y", 300.0),
    ("right_knee", 200.0),
    ("left_hip_x", 100.0),
    ("left_hip_z", 100.0),
    ("left_hip_y", 300.0),
    ("left_knee", 200.0),
    ("right_shoulder1", 75.0),
    ("right_shoulder2", 75.0),
    ("right_elbow", 75.0),
    ("left_shoulder1", 75.0),
    ("left_shoulder2", 75.0),
    ("left_elbow", 75.0),
];

pub const ATLAS_HEAD: &str = "head";
pub const ATLAS_KNEES: [&str; 2] = ["l_leg_kny", "r_leg_kny"];

pub struct WalkerConfig;

impl WalkerConfig {
    /// Coefficient the model loader gives every motorised joint
    pub const DEFAULT_POWER_COEF: f32 = 100.0;
    pub const JOINT_RESET_SPREAD: f32 = 0.1;
    pub const AT_LIMIT: f32 = 0.99;
    // Scales typical speed into -1..+1, no physical sense here
    pub const SPEED_SCALE: f32 = 0.3;
    pub const OBS_CLIP: f32 = 5.0;
    /// Default walk target: a kilometer ahead
    pub const WALK_TARGET: [f32; 2] = [1.0e3, 0.0];
}

pub struct FlagrunConfig;

impl FlagrunConfig {
    pub const FLAG_TIMEOUT: i32 = 200;
    /// Fraction of the stadium the flag may land in (1.0 = whole field)
    pub const MORE_COMPACT: f32 = 0.5;
    pub const REACHED_DIST: f32 = 1.0;
    /// Marker height above the ground
    pub const FLAG_HEIGHT: f32 = 0.2;
    pub const INITIAL_Z: f32 = 0.8;
}

pub struct HarderConfig;

impl HarderConfig {
    pub const CUBE_SPAWN: [f32; 3] = [-1.5, 0.0, 0.05];
    pub const ATTACK_PERIOD: u64 = 30;
    pub const ATTACK_AFTER: u64 = 100;
    pub const ATTACK_DISTANCE: f32 = 4.0;
    pub const ATTACK_LIFT: f32 = 1.0;
    pub const ATTACK_ANGLE: f32 = 3.14;
    // Speed times cube mass gives the impulse
    pub const ATTACK_SPEED_MIN: f32 = 20.0;
    pub const ATTACK_SPEED_MAX: f32 = 30.0;
    pub const ATTACK_NOISE: f32 = 1.0;
    pub const STANDING_Z: f32 = 0.8;
    pub const GIVE_UP_FRAMES: u32 = 170;
    /// Potential per unit of leak, gamma = 0.99 leaks 1% per tick
    pub const LEAK_POTENTIAL: f32 = 100.0;
}

pub struct AtlasConfig;

impl AtlasConfig {
    pub const STAND_HEIGHT: f32 = 1.3;
    pub const STAND_BONUS: f32 = 4.0;
    pub const SPAWN_LIFT: f32 = 1.0;
    pub const INITIAL_Z: f32 = 1.5;
    pub const YAW_CENTER: f32 = 0.0;
    pub const YAW_RANDOM_SPREAD: f32 = std::f32::consts::PI;
}

pub struct RewardConfig;

impl RewardConfig {
    pub const ELECTRICITY_COST: f32 = -2.0;
    pub const STALL_TORQUE_COST: f32 = -0.1;
    pub const JOINTS_AT_LIMIT_COST: f32 = -0.1;
    /// 17 joints produce a lot of electricity cost just from policy noise
    pub const HUMANOID_ELECTRICITY_SCALE: f32 = 4.25;
}

/// Per-robot knobs that may come from a config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Face a random direction on reset (Atlas).
    pub random_yaw: bool,
    pub start_pos: [f32; 3],
    pub walk_target: [f32; 2],
    /// Seed for the episode random source; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            random_yaw: false,
            start_pos: [0.0; 3],
            walk_target: WalkerConfig::WALK_TARGET,
            seed: None,
        }
    }
}

impl RobotConfig {
    pub fn from_json(json: &str) -> RobotResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Football-stadium scene dimensions and timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StadiumConfig {
    pub halflen: f32,
    pub halfwidth: f32,
    /// Physics timestep in seconds.
    pub timestep: f32,
    /// Physics steps per robot tick.
    pub frame_skip: u32,
}

impl Default for StadiumConfig {
    fn default() -> Self {
        Self {
            halflen: 105.0 * 0.25,
            halfwidth: 50.0 * 0.25,
            timestep: 0.0165 / 4.0,
            frame_skip: 4,
        }
    }
}

impl StadiumConfig {
    pub fn from_json(json: &str) -> RobotResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn dt(&self) -> f32 {
        self.timestep * self.frame_skip as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obs_dim_matches_layout() {
        for config in [HOPPER, WALKER2D, HALF_CHEETAH, ANT, HUMANOID, ATLAS] {
            assert_eq!(
                config.obs_dim,
                8 + 2 * config.action_dim + config.foot_list.len(),
                "{}",
                config.model_file
            );
        }
    }

    #[test]
    fn test_humanoid_motor_count() {
        assert_eq!(HUMANOID_MOTORS.len(), HUMANOID.action_dim);
    }

    #[test]
    fn test_robot_config_defaults_fill_missing_fields() {
        let config = RobotConfig::from_json(r#"{ "random_yaw": true, "seed": 7 }"#).unwrap();
        assert!(config.random_yaw);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.walk_target, WalkerConfig::WALK_TARGET);
    }

    #[test]
    fn test_robot_config_rejects_bad_json() {
        assert!(RobotConfig::from_json("{ random_yaw: ").is_err());
    }

    #[test]
    fn test_stadium_dt() {
        let stadium = StadiumConfig::from_json(r#"{ "timestep": 0.01, "frame_skip": 2 }"#).unwrap();
        assert!((stadium.dt() - 0.02).abs() < 1e-6);
        assert_eq!(stadium.halflen, 26.25);
    }
}
