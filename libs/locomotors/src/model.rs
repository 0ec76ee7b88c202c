//! The model-loading seam: whatever parses MJCF/URDF hands back named handles.

use crate::body::{BodyPart, Joint};
use crate::error::RobotResult;

/// A body the physics engine has loaded.
pub struct LoadedModel {
    /// Motorised joints in actuation order.
    pub joints: Vec<(String, Box<dyn Joint>)>,
    /// Every link of the body, keyed by name.
    pub parts: Vec<(String, Box<dyn BodyPart>)>,
}

impl LoadedModel {
    pub fn new() -> Self {
        Self {
            joints: Vec::new(),
            parts: Vec::new(),
        }
    }

    pub fn with_joint(mut self, name: impl Into<String>, joint: Box<dyn Joint>) -> Self {
        self.joints.push((name.into(), joint));
        self
    }

    pub fn with_part(mut self, name: impl Into<String>, part: Box<dyn BodyPart>) -> Self {
        self.parts.push((name.into(), part));
        self
    }
}

impl Default for LoadedModel {
    fn default() -> Self {
        Self::new()
    }
}

/// What a morphology asks the loader for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelRequest<'a> {
    pub model_file: &'a str,
    pub root_part: &'a str,
    pub self_collision: bool,
}

/// External loader (MJCF / URDF). Not implemented in this workspace.
pub trait ModelLoader {
    fn load(&mut self, request: &ModelRequest<'_>) -> RobotResult<LoadedModel>;
}
