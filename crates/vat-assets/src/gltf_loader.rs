use std::path::Path;

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use gltf::animation::util::ReadOutputs;
use tracing::debug;

use crate::animation::{AnimationData, ChannelData, ChannelValues, Clip, Interpolation};
use crate::error::AssetError;
use crate::material::SurfaceMaterial;
use crate::mesh::MeshPart;

/// A node of the scene hierarchy with its rest transform.
#[derive(Debug, Clone)]
pub struct RigNode {
    pub name: String,
    pub parent: Option<usize>,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

/// Joints of one skin and their inverse bind matrices, index-aligned.
#[derive(Debug, Clone)]
pub struct SkinData {
    pub joints: Vec<usize>,
    pub inverse_bind: Vec<Mat4>,
}

/// A mesh part plus the data needed to deform it.
#[derive(Debug, Clone)]
pub struct SkinnedPart {
    pub part: MeshPart,
    /// Node the mesh is attached to.
    pub node: usize,
    pub skin: Option<usize>,
    /// Empty when the source has no tangents.
    pub tangents: Vec<Vec4>,
    /// Empty when the part is not skinned.
    pub joints: Vec<[u16; 4]>,
    pub weights: Vec<[f32; 4]>,
}

/// Everything needed to pose and deform a rigged model.
#[derive(Debug, Clone)]
pub struct RigAsset {
    pub name: String,
    pub nodes: Vec<RigNode>,
    pub skins: Vec<SkinData>,
    /// Parts in document node order, primitives in mesh order.
    pub parts: Vec<SkinnedPart>,
    pub animations: Vec<AnimationData>,
}

impl RigAsset {
    /// The bind-pose mesh parts, in baking order.
    pub fn mesh_parts(&self) -> Vec<MeshPart> {
        self.parts.iter().map(|p| p.part.clone()).collect()
    }

    pub fn clips(&self) -> Vec<Clip> {
        self.animations.iter().map(AnimationData::clip).collect()
    }

    pub fn animation(&self, name: &str) -> Option<&AnimationData> {
        self.animations.iter().find(|a| a.name == name)
    }
}

/// Load a skinned glTF 2.0 file (.gltf or .glb).
pub fn load_rig(path: &Path) -> Result<RigAsset, AssetError> {
    if !path.exists() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }

    let (document, buffers, _images) = gltf::import(path)
        .map_err(|e| AssetError::GltfLoadFailed(path.to_path_buf(), e.to_string()))?;

    let mut parents = vec![None; document.nodes().len()];
    for node in document.nodes() {
        for child in node.children() {
            parents[child.index()] = Some(node.index());
        }
    }

    let nodes = document
        .nodes()
        .map(|node| {
            let (translation, rotation, scale) = node.transform().decomposed();
            RigNode {
                name: node.name().unwrap_or("node").to_string(),
                parent: parents[node.index()],
                translation: Vec3::from(translation),
                rotation: Quat::from_array(rotation),
                scale: Vec3::from(scale),
            }
        })
        .collect();

    let skins = document
        .skins()
        .map(|skin| {
            let joints: Vec<usize> = skin.joints().map(|j| j.index()).collect();
            let reader = skin.reader(|buffer| Some(&buffers[buffer.index()]));
            let inverse_bind = reader
                .read_inverse_bind_matrices()
                .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect())
                .unwrap_or_else(|| vec![Mat4::IDENTITY; joints.len()]);
            SkinData {
                joints,
                inverse_bind,
            }
        })
        .collect();

    let mut parts = Vec::new();
    for node in document.nodes() {
        let Some(mesh) = node.mesh() else {
            continue;
        };
        let mesh_name = mesh.name().unwrap_or("mesh");

        for (index, primitive) in mesh.primitives().enumerate() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                debug!("Skipping non-triangle primitive {} of '{}'", index, mesh_name);
                continue;
            }
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<Vec3> = reader
                .read_positions()
                .map(|iter| iter.map(Vec3::from).collect())
                .unwrap_or_default();

            let normals: Vec<Vec3> = reader
                .read_normals()
                .map(|iter| iter.map(Vec3::from).collect())
                .unwrap_or_default();

            let uvs: Vec<Vec2> = reader
                .read_tex_coords(0)
                .map(|tc| tc.into_f32().map(Vec2::from).collect())
                .unwrap_or_default();

            let tangents: Vec<Vec4> = reader
                .read_tangents()
                .map(|iter| iter.map(Vec4::from).collect())
                .unwrap_or_default();

            let triangles: Vec<u32> = reader
                .read_indices()
                .map(|idx| idx.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());

            let joints: Vec<[u16; 4]> = reader
                .read_joints(0)
                .map(|j| j.into_u16().collect())
                .unwrap_or_default();

            let weights: Vec<[f32; 4]> = reader
                .read_weights(0)
                .map(|w| w.into_f32().collect())
                .unwrap_or_default();

            let material = SurfaceMaterial::new(
                primitive
                    .material()
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{mesh_name}_material_{index}")),
            );

            parts.push(SkinnedPart {
                part: MeshPart {
                    name: format!("{mesh_name}.{index}"),
                    positions,
                    normals,
                    uvs,
                    triangles,
                    material,
                },
                node: node.index(),
                skin: node.skin().map(|s| s.index()),
                tangents,
                joints,
                weights,
            });
        }
    }

    let animations = document
        .animations()
        .map(|animation| {
            let name = animation
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("clip_{}", animation.index()));
            let channels: Vec<ChannelData> = animation
                .channels()
                .filter_map(|channel| {
                    let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
                    let times: Vec<f32> = reader.read_inputs()?.collect();
                    let cubic = channel.sampler().interpolation()
                        == gltf::animation::Interpolation::CubicSpline;
                    let interpolation = match channel.sampler().interpolation() {
                        gltf::animation::Interpolation::Step => Interpolation::Step,
                        _ => Interpolation::Linear,
                    };
                    let values = match reader.read_outputs()? {
                        ReadOutputs::Translations(iter) => {
                            ChannelValues::Translation(keyframe_values(iter.map(Vec3::from), cubic))
                        }
                        ReadOutputs::Rotations(rotations) => ChannelValues::Rotation(
                            keyframe_values(rotations.into_f32().map(Quat::from_array), cubic),
                        ),
                        ReadOutputs::Scales(iter) => {
                            ChannelValues::Scale(keyframe_values(iter.map(Vec3::from), cubic))
                        }
                        ReadOutputs::MorphTargetWeights(_) => return None,
                    };
                    Some(ChannelData {
                        node: channel.target().node().index(),
                        times,
                        interpolation,
                        values,
                    })
                })
                .collect();
            let duration = channels
                .iter()
                .filter_map(|c| c.times.last().copied())
                .fold(0.0f32, f32::max);
            AnimationData {
                name,
                duration,
                channels,
            }
        })
        .collect::<Vec<_>>();

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("rig")
        .to_string();

    debug!(
        "Rig '{}': {} nodes, {} parts, {} animations",
        name,
        parents.len(),
        parts.len(),
        animations.len()
    );

    Ok(RigAsset {
        name,
        nodes,
        skins,
        parts,
        animations,
    })
}

/// Cubic-spline outputs store (in-tangent, value, out-tangent) per key; keep the values.
fn keyframe_values<T>(iter: impl Iterator<Item = T>, cubic: bool) -> Vec<T> {
    if cubic {
        iter.skip(1).step_by(3).collect()
    } else {
        iter.collect()
    }
}
