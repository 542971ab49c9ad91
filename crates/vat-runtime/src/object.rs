use serde::{Deserialize, Serialize};
use vat_assets::{Asset, AssetHandle, MergedMesh, SurfaceMaterial, VatMaterial};

use crate::error::SelectorError;
use crate::selector::{AnimationSelector, Selection};

/// What a [`VatObject`] is currently drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderMaterials<'a> {
    /// One baked clip material for the whole mesh.
    Baked(&'a VatMaterial),
    /// The source materials, one per submesh, without animation.
    Fallback(&'a [SurfaceMaterial]),
}

/// The renderable produced by a bake: merged mesh, fallback materials and
/// the selector over the baked clip materials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VatObject {
    pub name: String,
    pub mesh: AssetHandle<MergedMesh>,
    pub submesh_materials: Vec<SurfaceMaterial>,
    pub selector: AnimationSelector<VatMaterial>,
}

impl VatObject {
    /// Build the object and bind the baked materials to its selector.
    pub fn new(
        name: impl Into<String>,
        mesh: AssetHandle<MergedMesh>,
        merged: &MergedMesh,
        materials: Vec<VatMaterial>,
    ) -> Self {
        Self {
            name: name.into(),
            mesh,
            submesh_materials: merged.materials().cloned().collect(),
            selector: AnimationSelector::with_materials(materials),
        }
    }

    pub fn render_materials(&self) -> RenderMaterials<'_> {
        match self.selector.current() {
            Some(selection) => RenderMaterials::Baked(selection.material),
            None => RenderMaterials::Fallback(&self.submesh_materials),
        }
    }

    pub fn set_animation(&mut self, index: usize) -> Result<Selection<'_, VatMaterial>, SelectorError> {
        self.selector.set_active(index)
    }

    pub fn next_animation(&mut self) -> Result<Selection<'_, VatMaterial>, SelectorError> {
        self.selector.next()
    }
}

impl Asset for VatObject {}
