use glam::Mat4;
use tracing::{debug, trace};
use vat_assets::{AnimationData, Clip, MeshPart, RigAsset};
use vat_bake::{AnimationPlayer, DeformedGeometry, PlaybackError};

use crate::keyframe::sample_pose;
use crate::skinning::{deform_part, joint_matrices};

/// Evaluated pose, ready for skinning.
struct PoseCache {
    globals: Vec<Mat4>,
    /// Per skin, index-aligned with `RigAsset::skins`.
    joints: Vec<Vec<Mat4>>,
}

/// Plays the animations of a loaded glTF rig on the CPU.
///
/// Forced times take effect at the next `end_of_frame`, matching an engine
/// that evaluates poses once per frame.
pub struct RigPlayer<'a> {
    rig: &'a RigAsset,
    playing: Option<&'a AnimationData>,
    forced: f32,
    pose: Option<PoseCache>,
}

impl<'a> RigPlayer<'a> {
    pub fn new(rig: &'a RigAsset) -> Self {
        Self {
            rig,
            playing: None,
            forced: 0.0,
            pose: None,
        }
    }

    pub fn playing(&self) -> Option<&str> {
        self.playing.map(|a| a.name.as_str())
    }

    /// Normalized time the next pose is evaluated at.
    pub fn normalized_time(&self) -> f32 {
        self.forced
    }

    fn evaluate(&mut self, animation: &AnimationData) {
        let time = self.forced * animation.duration;
        let globals = sample_pose(&self.rig.nodes, animation, time).global_matrices(&self.rig.nodes);
        let joints = self
            .rig
            .skins
            .iter()
            .map(|skin| joint_matrices(skin, &globals))
            .collect();
        trace!("Posed '{}' at {:.4}s", animation.name, time);
        self.pose = Some(PoseCache { globals, joints });
    }
}

impl AnimationPlayer for RigPlayer<'_> {
    fn play_clip(&mut self, clip: &Clip) -> Result<(), PlaybackError> {
        let animation = self
            .rig
            .animation(&clip.name)
            .ok_or_else(|| PlaybackError::ClipNotFound(clip.name.clone()))?;
        debug!(
            "Playing '{}' ({} channels, {:.2}s)",
            animation.name,
            animation.channels.len(),
            animation.duration
        );
        self.playing = Some(animation);
        self.forced = 0.0;
        self.pose = None;
        Ok(())
    }

    fn force_normalized_time(&mut self, time: f32) -> Result<(), PlaybackError> {
        if self.playing.is_none() {
            return Err(PlaybackError::NoClipPlaying);
        }
        self.forced = time;
        Ok(())
    }

    fn end_of_frame(&mut self) -> Result<(), PlaybackError> {
        let animation = self.playing.ok_or(PlaybackError::NoClipPlaying)?;
        self.evaluate(animation);
        Ok(())
    }

    fn deformed_geometry(
        &mut self,
        index: usize,
        part: &MeshPart,
    ) -> Result<DeformedGeometry, PlaybackError> {
        let source = self
            .rig
            .parts
            .get(index)
            .ok_or(PlaybackError::PartNotFound(index))?;
        let pose = self
            .pose
            .as_ref()
            .ok_or_else(|| PlaybackError::Failed("no pose evaluated since the clip started".into()))?;

        let joints = source
            .skin
            .and_then(|skin| pose.joints.get(skin))
            .map(Vec::as_slice);
        let node_matrix = pose.globals.get(source.node).copied().unwrap_or(Mat4::IDENTITY);
        Ok(deform_part(part, source, joints, node_matrix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec2, Vec3};
    use vat_assets::{
        ChannelData, ChannelValues, Interpolation, MemoryStore, RigNode, SkinData, SkinnedPart,
        SurfaceMaterial, VertexTexture,
    };
    use vat_bake::{bake_object, BakeConfig, CancelToken};

    /// Root joint at the origin, one child joint at y=1 that the "lift" clip
    /// raises to y=3 over one second. A single part is fully bound to the child.
    fn rig() -> RigAsset {
        let nodes = vec![
            RigNode {
                name: "root".into(),
                parent: None,
                translation: Vec3::ZERO,
                rotation: Quat::IDENTITY,
                scale: Vec3::ONE,
            },
            RigNode {
                name: "hand".into(),
                parent: Some(0),
                translation: Vec3::new(0.0, 1.0, 0.0),
                rotation: Quat::IDENTITY,
                scale: Vec3::ONE,
            },
            RigNode {
                name: "prop".into(),
                parent: None,
                translation: Vec3::new(5.0, 0.0, 0.0),
                rotation: Quat::IDENTITY,
                scale: Vec3::ONE,
            },
        ];
        let skins = vec![SkinData {
            joints: vec![0, 1],
            inverse_bind: vec![
                Mat4::IDENTITY,
                Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)),
            ],
        }];
        let part = |name: &str, node: usize, skin: Option<usize>| {
            let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Z];
            let skinned = skin.is_some();
            SkinnedPart {
                part: MeshPart {
                    name: name.into(),
                    positions,
                    normals: vec![Vec3::Y; 3],
                    uvs: vec![Vec2::ZERO; 3],
                    triangles: vec![0, 1, 2],
                    material: SurfaceMaterial::new(name),
                },
                node,
                skin,
                tangents: Vec::new(),
                joints: if skinned { vec![[1, 0, 0, 0]; 3] } else { Vec::new() },
                weights: if skinned {
                    vec![[1.0, 0.0, 0.0, 0.0]; 3]
                } else {
                    Vec::new()
                },
            }
        };
        let animations = vec![AnimationData {
            name: "lift".into(),
            duration: 1.0,
            channels: vec![ChannelData {
                node: 1,
                times: vec![0.0, 1.0],
                interpolation: Interpolation::Linear,
                values: ChannelValues::Translation(vec![
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::new(0.0, 3.0, 0.0),
                ]),
            }],
        }];
        RigAsset {
            name: "Crane".into(),
            nodes,
            skins,
            parts: vec![part("arm", 1, Some(0)), part("prop", 2, None)],
            animations,
        }
    }

    #[test]
    fn forced_time_applies_at_end_of_frame() {
        let rig = rig();
        let parts = rig.mesh_parts();
        let mut player = RigPlayer::new(&rig);
        player.play_clip(&Clip::new("lift", 1.0)).unwrap();
        player.end_of_frame().unwrap();
        let rest = player.deformed_geometry(0, &parts[0]).unwrap();
        assert_eq!(rest.positions, parts[0].positions);

        player.force_normalized_time(0.5).unwrap();
        let stale = player.deformed_geometry(0, &parts[0]).unwrap();
        assert_eq!(stale.positions, rest.positions);

        player.end_of_frame().unwrap();
        let lifted = player.deformed_geometry(0, &parts[0]).unwrap();
        assert_eq!(lifted.positions[1], Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn unskinned_part_uses_node_transform() {
        let rig = rig();
        let parts = rig.mesh_parts();
        let mut player = RigPlayer::new(&rig);
        player.play_clip(&Clip::new("lift", 1.0)).unwrap();
        player.end_of_frame().unwrap();
        let prop = player.deformed_geometry(1, &parts[1]).unwrap();
        assert_eq!(prop.positions[0], Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn playback_errors() {
        let rig = rig();
        let parts = rig.mesh_parts();
        let mut player = RigPlayer::new(&rig);

        assert!(matches!(
            player.force_normalized_time(0.1),
            Err(PlaybackError::NoClipPlaying)
        ));
        assert!(matches!(
            player.play_clip(&Clip::new("dance", 1.0)),
            Err(PlaybackError::ClipNotFound(name)) if name == "dance"
        ));

        player.play_clip(&Clip::new("lift", 1.0)).unwrap();
        assert!(matches!(
            player.deformed_geometry(0, &parts[0]),
            Err(PlaybackError::Failed(_))
        ));
        player.end_of_frame().unwrap();
        assert!(matches!(
            player.deformed_geometry(7, &parts[0]),
            Err(PlaybackError::PartNotFound(7))
        ));
        assert_eq!(player.playing(), Some("lift"));
    }

    #[test]
    fn bakes_a_rig_end_to_end() {
        let rig = rig();
        let parts = rig.mesh_parts();
        let mut clips = rig.clips();
        clips.push(Clip::new("missing", 1.0));
        let mut player = RigPlayer::new(&rig);
        let mut store = MemoryStore::new();

        let output = bake_object(
            &rig.name,
            &parts,
            &clips,
            &mut player,
            &mut store,
            &BakeConfig::default(),
            CancelToken::new(),
        )
        .unwrap();

        assert_eq!(output.report.dimension, Some(8));
        assert_eq!(output.report.skipped.len(), 1);
        assert_eq!(output.object.name, "Crane_VAT");

        let slots = &output.report.animations[0].material.textures;
        let position = store.get::<VertexTexture>(&slots.point_cache).unwrap();
        // Frame 4 samples t = 0.5: the hand joint has risen by one unit.
        assert_eq!(position.pixel(4, 1), Some([1.0, 1.0, 0.0, 1.0]));
        // The prop part starts at column 3 and never moves.
        assert_eq!(position.pixel(4, 3), Some([5.0, 0.0, 0.0, 1.0]));
        assert_eq!(position.pixel(4, 6), Some([0.0; 4]));
    }
}
