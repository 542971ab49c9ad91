use glam::{Quat, Vec3};

/// A named animation sequence. Baking samples it over normalized time `[0, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub name: String,
    /// Length in seconds.
    pub duration: f32,
}

impl Clip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// How values between two keyframes are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
}

/// Keyframed values of one node property.
#[derive(Debug, Clone)]
pub enum ChannelValues {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

/// One animated node property.
#[derive(Debug, Clone)]
pub struct ChannelData {
    pub node: usize,
    /// Keyframe times in seconds, ascending.
    pub times: Vec<f32>,
    pub interpolation: Interpolation,
    pub values: ChannelValues,
}

/// Keyframe data of one animation, as loaded from a glTF file.
#[derive(Debug, Clone)]
pub struct AnimationData {
    pub name: String,
    pub duration: f32,
    pub channels: Vec<ChannelData>,
}

impl AnimationData {
    pub fn clip(&self) -> Clip {
        Clip::new(self.name.clone(), self.duration)
    }
}
