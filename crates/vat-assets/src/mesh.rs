use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::material::SurfaceMaterial;

/// One renderable sub-surface of a rigged object, in bind pose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshPart {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// UV channel 0. May be empty or shorter than `positions`.
    pub uvs: Vec<Vec2>,
    pub triangles: Vec<u32>,
    pub material: SurfaceMaterial,
}

impl MeshPart {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Triangles drawn with one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubMesh {
    pub triangles: Vec<u32>,
    /// The source part's material, rendered when no baked material is active.
    pub material: SurfaceMaterial,
}

/// A static mesh combining every part of a rig, ready for texture-driven playback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uv0: Vec<Vec2>,
    /// Secondary UV channel: `x` is the vertex's column in the animation textures.
    pub lookup_uv: Vec<Vec2>,
    /// One entry per source part, in part order.
    pub submeshes: Vec<SubMesh>,
}

impl MergedMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.triangles.len() / 3).sum()
    }

    /// Fallback materials, one per submesh.
    pub fn materials(&self) -> impl Iterator<Item = &SurfaceMaterial> {
        self.submeshes.iter().map(|s| &s.material)
    }
}
