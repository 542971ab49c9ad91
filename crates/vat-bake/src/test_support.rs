//! Scripted playback service for baker tests.

use glam::{Vec2, Vec3, Vec4};
use vat_assets::{Clip, MeshPart, SurfaceMaterial};

use crate::baker::CancelToken;
use crate::error::PlaybackError;
use crate::sampler::{AnimationPlayer, DeformedGeometry};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlayerCall {
    Play(String),
    Force(f32),
    EndOfFrame,
    Read(usize),
}

/// Bind-pose part with `vertices` vertices and a fan of triangles.
pub(crate) fn part(name: &str, vertices: usize) -> MeshPart {
    let triangles = (1..vertices.saturating_sub(1))
        .flat_map(|i| [0, i as u32, i as u32 + 1])
        .collect();
    MeshPart {
        name: name.into(),
        positions: (0..vertices).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect(),
        normals: vec![Vec3::Y; vertices],
        uvs: (0..vertices).map(|i| Vec2::new(i as f32, 1.0)).collect(),
        triangles,
        material: SurfaceMaterial::new(format!("{name}_mat")),
    }
}

/// Deterministic player: the geometry it reports is a pure function of the
/// clip ordinal, part, vertex and the pose time committed at the last sync point.
pub(crate) struct ScriptedPlayer {
    pub calls: Vec<PlayerCall>,
    clips_played: usize,
    playing: Option<String>,
    forced: f32,
    posed: f32,
    frames_in_clip: usize,
    failing_clips: Vec<String>,
    fail_mid_clip: Option<(String, usize)>,
    short_part: Option<usize>,
    cancel_after: Option<(CancelToken, usize)>,
    total_forces: usize,
}

impl ScriptedPlayer {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            clips_played: 0,
            playing: None,
            forced: 0.0,
            posed: 0.0,
            frames_in_clip: 0,
            failing_clips: Vec::new(),
            fail_mid_clip: None,
            short_part: None,
            cancel_after: None,
            total_forces: 0,
        }
    }

    /// `play_clip` rejects this clip.
    pub fn failing_clip(mut self, name: &str) -> Self {
        self.failing_clips.push(name.into());
        self
    }

    /// Geometry reads for `name` fail once `frames` frames have been forced.
    pub fn failing_mid_clip(mut self, name: &str, frames: usize) -> Self {
        self.fail_mid_clip = Some((name.into(), frames));
        self
    }

    /// Part `index` reports one vertex fewer than its bind pose.
    pub fn short_part(mut self, index: usize) -> Self {
        self.short_part = Some(index);
        self
    }

    /// Trip `token` once `forces` poses have been forced in total.
    pub fn cancel_after(mut self, token: CancelToken, forces: usize) -> Self {
        self.cancel_after = Some((token, forces));
        self
    }

    pub fn position(clip: usize, part: usize, vertex: usize, time: f32) -> Vec3 {
        Vec3::new(part as f32 * 100.0 + vertex as f32, time, clip as f32)
    }

    pub fn normal(time: f32) -> Vec3 {
        Vec3::new(0.0, 1.0, time)
    }

    pub fn tangent(vertex: usize) -> Vec4 {
        Vec4::new(1.0, 0.0, vertex as f32, -1.0)
    }

    pub fn forces(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PlayerCall::Force(_)))
            .count()
    }
}

impl AnimationPlayer for ScriptedPlayer {
    fn play_clip(&mut self, clip: &Clip) -> Result<(), PlaybackError> {
        self.calls.push(PlayerCall::Play(clip.name.clone()));
        if self.failing_clips.contains(&clip.name) {
            return Err(PlaybackError::ClipNotFound(clip.name.clone()));
        }
        self.clips_played += 1;
        self.playing = Some(clip.name.clone());
        self.forced = 0.0;
        self.frames_in_clip = 0;
        Ok(())
    }

    fn force_normalized_time(&mut self, time: f32) -> Result<(), PlaybackError> {
        self.calls.push(PlayerCall::Force(time));
        if self.playing.is_none() {
            return Err(PlaybackError::NoClipPlaying);
        }
        self.forced = time;
        self.frames_in_clip += 1;
        self.total_forces += 1;
        if let Some((token, forces)) = &self.cancel_after {
            if self.total_forces >= *forces {
                token.cancel();
            }
        }
        Ok(())
    }

    fn end_of_frame(&mut self) -> Result<(), PlaybackError> {
        self.calls.push(PlayerCall::EndOfFrame);
        self.posed = self.forced;
        Ok(())
    }

    fn deformed_geometry(
        &mut self,
        index: usize,
        part: &MeshPart,
    ) -> Result<DeformedGeometry, PlaybackError> {
        self.calls.push(PlayerCall::Read(index));
        if let (Some((clip, frames)), Some(playing)) = (&self.fail_mid_clip, &self.playing) {
            if clip == playing && self.frames_in_clip > *frames {
                return Err(PlaybackError::Failed("pose evaluation stalled".into()));
            }
        }
        let mut count = part.vertex_count();
        if self.short_part == Some(index) {
            count = count.saturating_sub(1);
        }
        let clip = self.clips_played.saturating_sub(1);
        Ok(DeformedGeometry {
            positions: (0..count)
                .map(|v| Self::position(clip, index, v, self.posed))
                .collect(),
            normals: vec![Self::normal(self.posed); count],
            tangents: (0..count).map(Self::tangent).collect(),
        })
    }
}
