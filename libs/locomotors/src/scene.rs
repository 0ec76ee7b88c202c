//! Scene-side collaborators: timing, stadium extents and props.

use nalgebra::Vector3;

/// A free rigid body placed in the scene (flag marker, thrown cube).
///
/// Dropping the handle removes the body from the scene.
pub trait Prop {
    fn reset_position(&mut self, position: Vector3<f32>);
    fn reset_velocity(&mut self, linear_velocity: Vector3<f32>);
}

/// Spawns props into the scene.
pub trait PropFactory {
    /// Visual marker sphere, no collision response.
    fn spawn_sphere(&mut self, position: Vector3<f32>) -> Box<dyn Prop>;

    /// Small dynamic cube.
    fn spawn_cube(&mut self, position: Vector3<f32>) -> Box<dyn Prop>;
}

/// The stadium a robot runs in.
pub trait Scene: PropFactory {
    /// Seconds of simulated time per robot tick.
    fn dt(&self) -> f32;

    fn stadium_halflen(&self) -> f32;

    fn stadium_halfwidth(&self) -> f32;

    /// Called once per episode reset by every robot placed in the scene.
    fn actor_introduce(&mut self, actor: &str);
}

/// Advances the physics by one robot tick.
pub trait PhysicsStep {
    fn global_step(&mut self);

    /// Put every body back where it was built, at rest. Runs at the start of
    /// each episode, before the robot resets its joints.
    fn restore_initial_state(&mut self) {}
}
