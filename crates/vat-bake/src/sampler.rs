use glam::{Vec3, Vec4};
use tracing::trace;
use vat_assets::{Clip, MeshPart};

use crate::error::PlaybackError;

/// Deformed geometry of one mesh part at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeformedGeometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// `w` carries the bitangent sign.
    pub tangents: Vec<Vec4>,
}

impl DeformedGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// The animation playback service the baker drives.
///
/// Pose evaluation is stateful: a pose forced with `force_normalized_time` is
/// only guaranteed to be readable after the following `end_of_frame`.
pub trait AnimationPlayer {
    /// Start playing `clip` from its beginning.
    fn play_clip(&mut self, clip: &Clip) -> Result<(), PlaybackError>;

    /// Jump the playing clip to `time` in `[0, 1)`.
    fn force_normalized_time(&mut self, time: f32) -> Result<(), PlaybackError>;

    /// Synchronization point: returns once a frame boundary has elapsed and the
    /// last forced pose is current. May block.
    fn end_of_frame(&mut self) -> Result<(), PlaybackError>;

    /// Read back the current deformed geometry of part `index`.
    fn deformed_geometry(
        &mut self,
        index: usize,
        part: &MeshPart,
    ) -> Result<DeformedGeometry, PlaybackError>;
}

/// Samples the deformed geometry of a fixed set of parts, one frame at a time.
pub struct FrameSampler<'a, P: AnimationPlayer> {
    player: &'a mut P,
    parts: &'a [MeshPart],
}

impl<'a, P: AnimationPlayer> FrameSampler<'a, P> {
    pub fn new(player: &'a mut P, parts: &'a [MeshPart]) -> Self {
        Self { player, parts }
    }

    /// Start `clip` and wait for the first pose to settle.
    pub fn begin(&mut self, clip: &Clip) -> Result<(), PlaybackError> {
        self.player.play_clip(clip)?;
        self.player.end_of_frame()
    }

    /// Pose the clip at `time`, pass one sync point, and read every part in order.
    pub fn sample(&mut self, time: f32) -> Result<Vec<DeformedGeometry>, PlaybackError> {
        self.player.force_normalized_time(time)?;
        self.player.end_of_frame()?;
        let parts = self.parts;
        trace!("Sampling {} parts at t={:.4}", parts.len(), time);
        parts
            .iter()
            .enumerate()
            .map(|(index, part)| self.player.deformed_geometry(index, part))
            .collect()
    }
}
