//! Observation builder and potential field shared by every legged robot.

use nalgebra::{Rotation3, Vector3};
use rand::rngs::StdRng;
use rand::Rng;

use crate::body::{BodyPart, Joint};
use crate::config::{RobotConfig, WalkerConfig};
use crate::error::{RobotError, RobotResult};
use crate::model::LoadedModel;
use crate::morphology::Morphology;
use crate::scene::Scene;

/// A motorised joint together with its torque coefficient.
pub struct JointSlot {
    pub name: String,
    pub joint: Box<dyn Joint>,
    pub power_coef: f32,
}

struct PartSlot {
    name: String,
    part: Box<dyn BodyPart>,
}

pub struct WalkerBase {
    pub power: f32,
    joints: Vec<JointSlot>,
    /// Joint index driven by each action component
    actuation: Vec<usize>,
    parts: Vec<PartSlot>,
    torso: usize,
    feet: Vec<usize>,
    feet_contact: Vec<f32>,

    /// Torso height at the start of the episode. Latched on the first
    /// `calc_state` unless a morphology pins it on reset.
    pub initial_z: Option<f32>,
    pub start_pos: Vector3<f32>,
    pub walk_target_x: f32,
    pub walk_target_y: f32,
    pub walk_target_dist: f32,
    pub walk_target_theta: f32,

    /// Mean x/y over all parts, torso z
    pub body_xyz: Vector3<f32>,
    pub body_rpy: Vector3<f32>,
    pub joint_speeds: Vec<f32>,
    /// Joints within 1% of a limit. Diagnostic, not observed.
    pub joints_at_limit: usize,
}

impl WalkerBase {
    /// Bind a loaded body to a morphology, checking every name it relies on.
    pub fn new(morphology: Morphology, model: LoadedModel, robot: &RobotConfig) -> RobotResult<Self> {
        let config = morphology.config();
        if model.joints.len() != config.action_dim {
            return Err(RobotError::JointCountMismatch {
                model: config.model_file,
                expected: config.action_dim,
                found: model.joints.len(),
            });
        }

        let joints: Vec<JointSlot> = model
            .joints
            .into_iter()
            .map(|(name, joint)| JointSlot {
                name,
                joint,
                power_coef: WalkerConfig::DEFAULT_POWER_COEF,
            })
            .collect();
        let parts: Vec<PartSlot> = model
            .parts
            .into_iter()
            .map(|(name, part)| PartSlot { name, part })
            .collect();

        let find_part = |name: &str| {
            parts
                .iter()
                .position(|slot| slot.name == name)
                .ok_or_else(|| RobotError::UnknownPart {
                    model: config.model_file,
                    name: name.to_string(),
                })
        };
        let torso = find_part(config.torso)?;
        let feet = config
            .foot_list
            .iter()
            .map(|name| find_part(name))
            .collect::<RobotResult<Vec<_>>>()?;
        for name in morphology.named_parts() {
            find_part(name)?;
        }
        for name in morphology.named_joints() {
            if !joints.iter().any(|slot| slot.name == name) {
                return Err(RobotError::UnknownJoint {
                    model: config.model_file,
                    name: name.to_string(),
                });
            }
        }

        let joint_count = joints.len();
        Ok(Self {
            power: config.power,
            joints,
            actuation: (0..joint_count).collect(),
            parts,
            torso,
            feet_contact: vec![0.0; feet.len()],
            feet,
            initial_z: None,
            start_pos: Vector3::from(robot.start_pos),
            walk_target_x: robot.walk_target[0],
            walk_target_y: robot.walk_target[1],
            walk_target_dist: 0.0,
            walk_target_theta: 0.0,
            body_xyz: Vector3::zeros(),
            body_rpy: Vector3::zeros(),
            joint_speeds: vec![0.0; joint_count],
            joints_at_limit: 0,
        })
    }

    pub fn joints(&self) -> &[JointSlot] {
        &self.joints
    }

    pub fn joint(&self, name: &str) -> Option<&JointSlot> {
        self.joints.iter().find(|slot| slot.name == name)
    }

    pub fn part(&self, name: &str) -> Option<&dyn BodyPart> {
        self.parts
            .iter()
            .find(|slot| slot.name == name)
            .map(|slot| slot.part.as_ref())
    }

    pub fn torso(&self) -> &dyn BodyPart {
        self.parts[self.torso].part.as_ref()
    }

    pub fn torso_mut(&mut self) -> &mut dyn BodyPart {
        self.parts[self.torso].part.as_mut()
    }

    /// Ground contact of each foot-list part, 1.0 or 0.0.
    pub fn feet_contact(&self) -> &[f32] {
        &self.feet_contact
    }

    pub(crate) fn set_power_coefs(&mut self, table: &[(&str, f32)]) {
        for (name, coef) in table {
            if let Some(slot) = self.joints.iter_mut().find(|slot| slot.name == *name) {
                slot.power_coef = *coef;
            }
        }
    }

    pub(crate) fn set_actuation_order<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        let order: Vec<usize> = names
            .into_iter()
            .filter_map(|name| self.joints.iter().position(|slot| slot.name == name))
            .collect();
        if order.len() == self.joints.len() {
            self.actuation = order;
        } else {
            log::warn!("actuation order names {} of {} joints, keeping load order", order.len(), self.joints.len());
        }
    }

    pub fn robot_specific_reset(&mut self, scene: &mut dyn Scene, rng: &mut StdRng, actor: &str) {
        let spread = WalkerConfig::JOINT_RESET_SPREAD;
        for slot in &mut self.joints {
            slot.joint
                .reset_current_position(rng.random_range(-spread..=spread), 0.0);
        }

        self.feet_contact.iter_mut().for_each(|c| *c = 0.0);
        scene.actor_introduce(actor);
        self.initial_z = None;
    }

    /// Convert a policy action into joint torques.
    ///
    /// # Panics
    ///
    /// If `action` has the wrong length or holds a non-finite value. Both
    /// mean the policy upstream is broken.
    pub fn apply_action(&mut self, action: &[f32], clamp: bool) {
        assert_eq!(action.len(), self.actuation.len(), "action dimension mismatch");
        assert!(action.iter().all(|a| a.is_finite()), "non-finite action: {:?}", action);

        for (&a, &n) in action.iter().zip(&self.actuation) {
            let a = if clamp { a.clamp(-1.0, 1.0) } else { a };
            let slot = &mut self.joints[n];
            slot.joint.set_motor_torque(self.power * slot.power_coef * a);
        }
    }

    /// Build the observation vector and refresh the target bookkeeping
    /// `calc_potential` reads.
    pub fn calc_state(&mut self) -> Vec<f32> {
        // Interleaved: even = position scaled to -1..+1 between limits, odd = speed
        let mut j = Vec::with_capacity(self.joints.len() * 2);
        for slot in &self.joints {
            let (position, velocity) = slot.joint.current_relative_position();
            j.push(position);
            j.push(velocity);
        }
        self.joint_speeds = j.iter().skip(1).step_by(2).copied().collect();
        self.joints_at_limit = j
            .iter()
            .step_by(2)
            .filter(|p| p.abs() > WalkerConfig::AT_LIMIT)
            .count();

        for (contact, &foot) in self.feet_contact.iter_mut().zip(&self.feet) {
            *contact = if self.parts[foot].part.in_ground_contact() { 1.0 } else { 0.0 };
        }

        let body_pose = self.torso().pose();
        let n = self.parts.len() as f32;
        let (sum_x, sum_y) = self.parts.iter().fold((0.0, 0.0), |(x, y), slot| {
            let xyz = slot.part.pose().xyz();
            (x + xyz.x, y + xyz.y)
        });
        // Torso z is more informative than mean z
        self.body_xyz = Vector3::new(sum_x / n, sum_y / n, body_pose.xyz().z);
        self.body_rpy = body_pose.rpy();

        let z = self.body_xyz.z;
        let initial_z = *self.initial_z.get_or_insert(z);
        let (roll, pitch, yaw) = (self.body_rpy.x, self.body_rpy.y, self.body_rpy.z);

        let dx = self.walk_target_x - self.body_xyz.x;
        let dy = self.walk_target_y - self.body_xyz.y;
        self.walk_target_theta = dy.atan2(dx);
        self.walk_target_dist = dx.hypot(dy);
        let angle_to_target = self.walk_target_theta - yaw;

        // Rotate speed back to the body point of view
        let to_body = Rotation3::from_axis_angle(&Vector3::z_axis(), -yaw);
        let v = to_body * self.torso().speed();

        let scale = WalkerConfig::SPEED_SCALE;
        let clip = WalkerConfig::OBS_CLIP;
        let more = [
            z - initial_z,
            angle_to_target.sin(),
            angle_to_target.cos(),
            scale * v.x,
            scale * v.y,
            scale * v.z,
            roll,
            pitch,
        ];
        more.iter()
            .chain(&j)
            .chain(&self.feet_contact)
            .map(|x| x.clamp(-clip, clip))
            .collect()
    }

    /// Progress is speed*dt, so the potential moves by roughly 1 per tick for
    /// any morphology at typical walking speed.
    pub fn calc_potential(&self, dt: f32) -> f32 {
        -self.walk_target_dist / dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeScene, Rig};
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn hopper() -> (Rig, WalkerBase) {
        let mut rig = Rig::new(Morphology::Hopper);
        let base = WalkerBase::new(Morphology::Hopper, rig.take_model(), &RobotConfig::default()).unwrap();
        (rig, base)
    }

    #[test]
    fn test_rejects_wrong_joint_count() {
        let mut rig = Rig::new(Morphology::Hopper);
        let mut model = rig.take_model();
        model.joints.pop();
        let err = WalkerBase::new(Morphology::Hopper, model, &RobotConfig::default()).err();
        assert!(matches!(err, Some(RobotError::JointCountMismatch { expected: 3, found: 2, .. })));
    }

    #[test]
    fn test_rejects_missing_foot() {
        let mut rig = Rig::new(Morphology::Walker2D);
        let mut model = rig.take_model();
        model.parts.retain(|(name, _)| name != "foot_left");
        let err = WalkerBase::new(Morphology::Walker2D, model, &RobotConfig::default()).err();
        match err {
            Some(RobotError::UnknownPart { name, .. }) => assert_eq!(name, "foot_left"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rejects_missing_named_joint() {
        let mut rig = Rig::new(Morphology::Atlas);
        let mut model = rig.take_model();
        model.joints[0].0 = "renamed".to_string();
        assert!(matches!(
            WalkerBase::new(Morphology::Atlas, model, &RobotConfig::default()),
            Err(RobotError::UnknownJoint { .. })
        ));
    }

    #[test]
    fn test_reset_randomises_joints_and_introduces_actor() {
        let (rig, mut base) = hopper();
        let mut scene = FakeScene::default();
        let mut rng = StdRng::seed_from_u64(3);
        base.initial_z = Some(4.0);

        base.robot_specific_reset(&mut scene, &mut rng, "hopper");

        assert_eq!(scene.introduced, vec!["hopper".to_string()]);
        assert!(base.initial_z.is_none());
        for name in rig.joint_names() {
            let joint = rig.joint(&name);
            let (position, velocity) = joint.borrow().reset.unwrap();
            assert!(position.abs() <= 0.1);
            assert_eq!(velocity, 0.0);
        }
    }

    #[test]
    fn test_apply_action_clamps() {
        let (rig, mut base) = hopper();
        base.apply_action(&[2.0, -0.5, -7.0], true);
        let torques: Vec<f32> = rig.joint_names().iter().map(|n| rig.joint(n).borrow().torque).collect();
        assert_relative_eq!(torques[0], 0.75 * 100.0);
        assert_relative_eq!(torques[1], 0.75 * 100.0 * -0.5);
        assert_relative_eq!(torques[2], -0.75 * 100.0);
    }

    #[test]
    fn test_apply_action_unclamped() {
        let (rig, mut base) = hopper();
        base.apply_action(&[2.0, 0.0, 0.0], false);
        let first = rig.joint_names()[0].clone();
        assert_relative_eq!(rig.joint(&first).borrow().torque, 0.75 * 100.0 * 2.0);
    }

    #[test]
    #[should_panic(expected = "non-finite action")]
    fn test_apply_action_rejects_nan() {
        let (_rig, mut base) = hopper();
        base.apply_action(&[0.0, f32::NAN, 0.0], true);
    }

    #[test]
    #[should_panic(expected = "action dimension mismatch")]
    fn test_apply_action_rejects_short_action() {
        let (_rig, mut base) = hopper();
        base.apply_action(&[0.0, 0.0], true);
    }

    #[test]
    fn test_first_state_latches_initial_z() {
        let (rig, mut base) = hopper();
        rig.part("torso").borrow_mut().pose.position.z = 1.25;
        let state = base.calc_state();
        assert_eq!(base.initial_z, Some(1.25));
        assert_eq!(state[0], 0.0);

        rig.part("torso").borrow_mut().pose.position.z = 1.0;
        let state = base.calc_state();
        assert_relative_eq!(state[0], -0.25);
    }

    #[test]
    fn test_state_layout() {
        let (rig, mut base) = hopper();
        {
            let mut torso = rig.part("torso").borrow_mut();
            torso.pose.position = Vector3::new(0.0, 0.0, 1.2);
            torso.pose.orientation = UnitQuaternion::from_euler_angles(0.1, -0.2, std::f32::consts::FRAC_PI_2);
            torso.speed = Vector3::new(0.0, 2.0, 0.5);
        }
        {
            let mut foot = rig.part("foot").borrow_mut();
            foot.pose.position = Vector3::new(0.0, 0.0, 0.1);
            foot.contact = true;
        }
        let names = rig.joint_names();
        rig.joint(&names[0]).borrow_mut().position = 0.995;
        rig.joint(&names[0]).borrow_mut().velocity = 0.3;
        rig.joint(&names[2]).borrow_mut().position = -40.0;

        let state = base.calc_state();
        assert_eq!(state.len(), 15);

        // Target straight ahead along +x, facing +y: target is 90 degrees to the right
        assert_relative_eq!(state[1], -1.0, epsilon = 1e-5);
        assert_relative_eq!(state[2], 0.0, epsilon = 1e-5);
        // World +y speed is body-forward speed
        assert_relative_eq!(state[3], 0.3 * 2.0, epsilon = 1e-5);
        assert_relative_eq!(state[4], 0.0, epsilon = 1e-5);
        assert_relative_eq!(state[5], 0.3 * 0.5, epsilon = 1e-5);
        assert_relative_eq!(state[6], 0.1, epsilon = 1e-5);
        assert_relative_eq!(state[7], -0.2, epsilon = 1e-5);
        assert_relative_eq!(state[8], 0.995);
        assert_relative_eq!(state[9], 0.3);
        assert_eq!(state[12], -5.0);
        assert_eq!(state[14], 1.0);

        assert_eq!(base.joints_at_limit, 2);
        assert_eq!(base.joint_speeds.len(), 3);
        assert_relative_eq!(base.walk_target_dist, 1000.0, epsilon = 1e-3);
    }

    #[test]
    fn test_body_xy_is_mean_of_parts() {
        let (rig, mut base) = hopper();
        rig.part("torso").borrow_mut().pose.position = Vector3::new(1.0, 2.0, 1.5);
        rig.part("foot").borrow_mut().pose.position = Vector3::new(3.0, 0.0, 0.1);
        base.calc_state();
        assert_relative_eq!(base.body_xyz.x, (1.0 + 3.0) / rig.part_count() as f32);
        assert_relative_eq!(base.body_xyz.z, 1.5);
    }

    #[test]
    fn test_potential_is_scaled_distance() {
        let (_rig, mut base) = hopper();
        base.walk_target_x = 3.0;
        base.walk_target_y = 4.0;
        base.calc_state();
        assert_relative_eq!(base.calc_potential(0.5), -10.0, epsilon = 1e-4);
    }

    proptest! {
        #[test]
        fn prop_torque_is_power_coef_clamped(a in prop::collection::vec(-1.0e6f32..1.0e6, 3)) {
            let (rig, mut base) = hopper();
            base.apply_action(&a, true);
            for (name, &x) in rig.joint_names().iter().zip(&a) {
                let expected = 0.75 * 100.0 * x.clamp(-1.0, 1.0);
                prop_assert!((rig.joint(name).borrow().torque - expected).abs() < 1e-3);
            }
        }

        #[test]
        fn prop_state_is_clipped(
            z in -50.0f32..50.0,
            v in prop::array::uniform3(-100.0f32..100.0),
            p in -3.0f32..3.0,
        ) {
            let (rig, mut base) = hopper();
            {
                let mut torso = rig.part("torso").borrow_mut();
                torso.pose.position.z = z;
                torso.speed = Vector3::from(v);
            }
            base.calc_state();
            rig.part("torso").borrow_mut().pose.position.z = -z;
            for name in rig.joint_names() {
                rig.joint(&name).borrow_mut().velocity = p * 10.0;
            }
            let state = base.calc_state();
            prop_assert_eq!(state.len(), 15);
            prop_assert!(state.iter().all(|x| (-5.0..=5.0).contains(x)));
        }
    }
}
