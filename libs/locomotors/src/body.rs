//! Contracts for the physics-side handles a robot reads and drives.
//!
//! The physics engine owns the actual joints and links. A robot only sees them
//! through these traits, one boxed handle per joint or part.

use nalgebra::{UnitQuaternion, Vector3};

/// World pose of a body part.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub orientation: UnitQuaternion<f32>,
}

impl Pose {
    pub fn new(position: Vector3<f32>, orientation: UnitQuaternion<f32>) -> Self {
        Self { position, orientation }
    }

    pub fn xyz(&self) -> Vector3<f32> {
        self.position
    }

    /// Roll, pitch, yaw
    pub fn rpy(&self) -> Vector3<f32> {
        let (roll, pitch, yaw) = self.orientation.euler_angles();
        Vector3::new(roll, pitch, yaw)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vector3::zeros(), UnitQuaternion::identity())
    }
}

/// A motorised joint.
pub trait Joint {
    /// Position scaled to -1..+1 between the joint limits, and angular speed
    /// scaled so typical values also land in -1..+1.
    fn current_relative_position(&self) -> (f32, f32);

    /// Teleport the joint to a raw position/velocity (episode reset only).
    fn reset_current_position(&mut self, position: f32, velocity: f32);

    fn set_motor_torque(&mut self, torque: f32);
}

/// A rigid link of the articulated body.
pub trait BodyPart {
    fn pose(&self) -> Pose;

    /// World-frame linear velocity.
    fn speed(&self) -> Vector3<f32>;

    /// Whether the part currently touches the ground.
    fn in_ground_contact(&self) -> bool;

    fn reset_pose(&mut self, position: Vector3<f32>, orientation: UnitQuaternion<f32>);
}
