use tracing::{info, warn};
use vat_assets::{AssetHandle, AssetStore, Clip, MergedMesh, MeshPart};
use vat_runtime::VatObject;

use crate::baker::{AnimationBaker, BakeReport, CancelToken, ExportFolders};
use crate::config::BakeConfig;
use crate::error::BakeError;
use crate::layout::PartLayout;
use crate::merger::merge;
use crate::sampler::AnimationPlayer;
use crate::sizer::texture_size;

/// Everything produced by [`bake_object`].
#[derive(Debug)]
pub struct BakeOutput {
    pub object: VatObject,
    pub object_handle: AssetHandle<VatObject>,
    pub mesh: MergedMesh,
    pub mesh_handle: AssetHandle<MergedMesh>,
    pub report: BakeReport,
    pub folders: ExportFolders,
}

/// Bake every clip of the object `name`, merge its parts into one mesh and
/// persist the resulting [`VatObject`].
///
/// The parts are merged before any clip is played, so malformed geometry
/// aborts with nothing written to `store`. Fails with
/// [`BakeError::NothingBaked`] when no clip could be baked, in which case
/// nothing has been written either.
pub fn bake_object<P, S>(
    name: &str,
    parts: &[MeshPart],
    clips: &[Clip],
    player: &mut P,
    store: &mut S,
    config: &BakeConfig,
    cancel: CancelToken,
) -> Result<BakeOutput, BakeError>
where
    P: AnimationPlayer,
    S: AssetStore,
{
    let layout = PartLayout::from_parts(parts);
    let merged = if layout.is_empty() {
        None
    } else {
        Some(merge(parts, texture_size(layout.total_vertices()))?)
    };

    let mut baker = AnimationBaker::new(player, &mut *store, config, name).with_cancel(cancel);
    let report = baker.bake(parts, clips)?;
    let folders = baker.into_folders();

    let (folders, mut mesh, dimension) = match (folders, merged, report.dimension) {
        (Some(folders), Some(mesh), Some(dimension)) => (folders, mesh, dimension),
        _ => {
            warn!("No clip of '{}' could be baked", name);
            return Err(BakeError::NothingBaked);
        }
    };

    let object_name = config.object_name(name);
    mesh.name = object_name.clone();
    let mesh_handle = store.save(&mesh, &folders.mesh, &object_name)?;

    let object = VatObject::new(&object_name, mesh_handle.clone(), &mesh, report.materials());
    let object_handle = store.save(&object, &folders.bake, &object_name)?;

    info!(
        "Baked '{}': {} clips, {} skipped, {} vertices at dimension {}",
        object_name,
        report.animations.len(),
        report.skipped.len(),
        mesh.vertex_count(),
        dimension
    );
    Ok(BakeOutput {
        object,
        object_handle,
        mesh,
        mesh_handle,
        report,
        folders,
    })
}
