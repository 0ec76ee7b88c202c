//! The closed set of robot bodies and their per-body rules.

use serde::{Deserialize, Serialize};

use crate::config::{
    self, AtlasConfig, MorphologyConfig, ATLAS_HEAD, ATLAS_KNEES, HALF_CHEETAH_POWER_COEFS,
    HUMANOID_MOTORS, WALKER2D_POWER_COEFS,
};
use crate::walker::WalkerBase;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Morphology {
    Hopper,
    Walker2D,
    HalfCheetah,
    Ant,
    Humanoid,
    Atlas,
}

impl Morphology {
    pub fn config(self) -> &'static MorphologyConfig {
        match self {
            Morphology::Hopper => &config::HOPPER,
            Morphology::Walker2D => &config::WALKER2D,
            Morphology::HalfCheetah => &config::HALF_CHEETAH,
            Morphology::Ant => &config::ANT,
            Morphology::Humanoid => &config::HUMANOID,
            Morphology::Atlas => &config::ATLAS,
        }
    }

    /// Whether actions are clipped to -1..+1 before scaling.
    ///
    /// The humanoid drives its motors with the raw policy output.
    pub fn clamps_actions(self) -> bool {
        !matches!(self, Morphology::Humanoid)
    }

    /// Joints this body addresses by name, beyond the ordered list.
    pub fn named_joints(self) -> Vec<&'static str> {
        match self {
            Morphology::Walker2D => WALKER2D_POWER_COEFS.iter().map(|(n, _)| *n).collect(),
            Morphology::HalfCheetah => HALF_CHEETAH_POWER_COEFS.iter().map(|(n, _)| *n).collect(),
            Morphology::Humanoid => HUMANOID_MOTORS.iter().map(|(n, _)| *n).collect(),
            Morphology::Atlas => ATLAS_KNEES.to_vec(),
            Morphology::Hopper | Morphology::Ant => Vec::new(),
        }
    }

    /// Parts this body addresses by name, beyond the torso and feet.
    pub fn named_parts(self) -> Vec<&'static str> {
        match self {
            Morphology::Atlas => vec![ATLAS_HEAD],
            _ => Vec::new(),
        }
    }

    /// Per-body torque coefficients and actuation order, applied on reset.
    pub(crate) fn apply_joint_overrides(self, base: &mut WalkerBase) {
        match self {
            Morphology::Walker2D => base.set_power_coefs(WALKER2D_POWER_COEFS),
            Morphology::HalfCheetah => base.set_power_coefs(HALF_CHEETAH_POWER_COEFS),
            Morphology::Humanoid => {
                base.set_power_coefs(HUMANOID_MOTORS);
                base.set_actuation_order(HUMANOID_MOTORS.iter().map(|(n, _)| *n));
            }
            Morphology::Hopper | Morphology::Ant | Morphology::Atlas => {}
        }
    }

    /// Per-tick liveness reward. Negative means the episode is over.
    pub fn alive_bonus(self, base: &WalkerBase, z: f32, pitch: f32) -> f32 {
        match self {
            Morphology::Hopper | Morphology::Walker2D => {
                if z > 0.8 && pitch.abs() < 1.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Morphology::HalfCheetah => {
                // Contacts other than the feet end the episode: too many strange walks on knees
                let contacts = base.feet_contact();
                let knees_down = [1, 2, 4, 5].iter().any(|&i| contacts[i] > 0.0);
                if pitch.abs() < 1.0 && !knees_down {
                    1.0
                } else {
                    -1.0
                }
            }
            // 0.25 is the central sphere radius, die if it scrapes the ground
            Morphology::Ant => {
                if z > 0.26 {
                    1.0
                } else {
                    -1.0
                }
            }
            // Living must beat dying even with the electricity cost of 17 noisy joints
            Morphology::Humanoid => {
                if z > 0.78 {
                    2.0
                } else {
                    -1.0
                }
            }
            Morphology::Atlas => atlas_alive_bonus(base),
        }
    }
}

/// Atlas is judged by its head height. Policies that lock the knees straight
/// and walk from the hips lose a point per pinned knee.
fn atlas_alive_bonus(base: &WalkerBase) -> f32 {
    let head_z = base
        .part(ATLAS_HEAD)
        .map(|head| head.pose().xyz().z)
        .unwrap_or(f32::NEG_INFINITY);
    if head_z <= AtlasConfig::STAND_HEIGHT {
        return -1.0;
    }

    let knees_at_limit = ATLAS_KNEES
        .iter()
        .filter_map(|name| base.joint(name))
        .filter(|slot| slot.joint.current_relative_position().0.abs() > config::WalkerConfig::AT_LIMIT)
        .count();
    AtlasConfig::STAND_BONUS - knees_at_limit as f32
}
