use serde::{Deserialize, Serialize};

use crate::handle::AssetHandle;
use crate::texture::VertexTexture;

/// Identity of a source part's material.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceMaterial {
    pub name: String,
}

impl SurfaceMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The three textures a baked clip is sampled from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSlots {
    pub point_cache: AssetHandle<VertexTexture>,
    pub normal_cache: AssetHandle<VertexTexture>,
    pub tangent_cache: AssetHandle<VertexTexture>,
}

/// Material playing back one baked clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatMaterial {
    /// Named after the clip.
    pub name: String,
    pub shader: String,
    pub textures: TextureSlots,
}
