//! VAT Assets - Asset types and persistence for vertex animation baking
//!
//! Provides the renderer-agnostic mesh, texture and material types the baker
//! produces, the `AssetStore` abstraction used to persist them, and a glTF
//! loader for skinned rigs.

mod animation;
mod directory;
mod error;
mod gltf_loader;
mod handle;
mod material;
mod mesh;
mod store;
mod texture;

pub use animation::{AnimationData, ChannelData, ChannelValues, Clip, Interpolation};
pub use directory::DirectoryStore;
pub use error::AssetError;
pub use gltf_loader::{load_rig, RigAsset, RigNode, SkinData, SkinnedPart};
pub use handle::{AssetHandle, AssetId, FolderRef};
pub use material::{SurfaceMaterial, TextureSlots, VatMaterial};
pub use mesh::{MergedMesh, MeshPart, SubMesh};
pub use store::{Asset, AssetStore, MemoryStore};
pub use texture::{FilterMode, PixelBuffer, TextureFormat, VertexTexture, WrapMode, EMPTY_PIXEL};
