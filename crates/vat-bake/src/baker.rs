use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};
use vat_assets::{
    AssetError, AssetHandle, AssetStore, Clip, FolderRef, MeshPart, TextureSlots, VatMaterial,
};

use crate::config::BakeConfig;
use crate::encoder::{encode_frame, FinalizedChannels, VertexChannels};
use crate::error::BakeError;
use crate::layout::PartLayout;
use crate::sampler::{AnimationPlayer, FrameSampler};
use crate::sizer::{frame_times, texture_size};

/// Shared flag for aborting a bake between frames.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Folder hierarchy of one bake: `root/<object>/{Materials, Textures, Mesh}`.
#[derive(Debug, Clone)]
pub struct ExportFolders {
    pub root: FolderRef,
    pub bake: FolderRef,
    pub materials: FolderRef,
    pub textures: FolderRef,
    pub mesh: FolderRef,
}

impl ExportFolders {
    pub fn create<S: AssetStore>(
        store: &mut S,
        config: &BakeConfig,
        object_name: &str,
    ) -> Result<Self, AssetError> {
        let root = store.ensure_folder(None, &config.export_root)?;
        let bake = store.create_folder(Some(&root), object_name)?;
        let materials = store.create_folder(Some(&bake), &config.materials_folder)?;
        let textures = store.create_folder(Some(&bake), &config.textures_folder)?;
        let mesh = store.create_folder(Some(&bake), &config.mesh_folder)?;
        debug!("Export folders created under {}", bake.path().display());
        Ok(Self {
            root,
            bake,
            materials,
            textures,
            mesh,
        })
    }
}

/// One clip baked and persisted.
#[derive(Debug, Clone)]
pub struct BakedAnimation {
    pub clip: Clip,
    pub material: VatMaterial,
    pub material_handle: AssetHandle<VatMaterial>,
    /// Texture side length, also the number of sampled frames.
    pub dimension: usize,
}

/// A clip that was skipped.
#[derive(Debug)]
pub struct ClipFailure {
    pub clip: String,
    pub error: BakeError,
}

/// Outcome of [`AnimationBaker::bake`].
#[derive(Debug, Default)]
pub struct BakeReport {
    /// Shared texture dimension; `None` when there was no geometry.
    pub dimension: Option<usize>,
    /// Baked clips, in input order.
    pub animations: Vec<BakedAnimation>,
    pub skipped: Vec<ClipFailure>,
}

impl BakeReport {
    pub fn materials(&self) -> Vec<VatMaterial> {
        self.animations.iter().map(|a| a.material.clone()).collect()
    }
}

/// Bakes clips into textures and materials, persisting them through `S`.
pub struct AnimationBaker<'a, P: AnimationPlayer, S: AssetStore> {
    player: &'a mut P,
    store: &'a mut S,
    config: &'a BakeConfig,
    object_name: String,
    cancel: CancelToken,
    folders: Option<ExportFolders>,
}

impl<'a, P: AnimationPlayer, S: AssetStore> AnimationBaker<'a, P, S> {
    pub fn new(
        player: &'a mut P,
        store: &'a mut S,
        config: &'a BakeConfig,
        object_name: impl Into<String>,
    ) -> Self {
        Self {
            player,
            store,
            config,
            object_name: object_name.into(),
            cancel: CancelToken::new(),
            folders: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Folders created so far. They only exist once a clip has been persisted.
    pub fn folders(&self) -> Option<&ExportFolders> {
        self.folders.as_ref()
    }

    pub fn into_folders(self) -> Option<ExportFolders> {
        self.folders
    }

    /// Bake every clip in order.
    ///
    /// Clips without geometry or whose playback fails are skipped and listed in
    /// the report. Layout violations and cancellation abort the bake; clips
    /// persisted before that stay persisted.
    pub fn bake(&mut self, parts: &[MeshPart], clips: &[Clip]) -> Result<BakeReport, BakeError> {
        let layout = PartLayout::from_parts(parts);
        let dimension = (!layout.is_empty()).then(|| texture_size(layout.total_vertices()));
        info!(
            "Baking {} clips of '{}': {} parts, {} vertices, dimension {:?}",
            clips.len(),
            self.object_name,
            layout.part_count(),
            layout.total_vertices(),
            dimension
        );

        let mut report = BakeReport {
            dimension,
            ..Default::default()
        };
        for clip in clips {
            match self.bake_clip(clip, parts, &layout, dimension) {
                Ok(animation) => report.animations.push(animation),
                Err(error) if !error.is_fatal() => {
                    warn!("Skipping clip '{}': {}", clip.name, error);
                    report.skipped.push(ClipFailure {
                        clip: clip.name.clone(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        info!(
            "Baked {} of {} clips of '{}'",
            report.animations.len(),
            clips.len(),
            self.object_name
        );
        Ok(report)
    }

    fn bake_clip(
        &mut self,
        clip: &Clip,
        parts: &[MeshPart],
        layout: &PartLayout,
        dimension: Option<usize>,
    ) -> Result<BakedAnimation, BakeError> {
        let dimension = match dimension {
            Some(dimension) if layout.part_count() > 0 => dimension,
            _ => {
                return Err(BakeError::InvalidGeometry {
                    clip: clip.name.clone(),
                    parts: layout.part_count(),
                    vertices: layout.total_vertices(),
                })
            }
        };

        // Buffers are dropped unpersisted if sampling stops early.
        let channels = self.sample_clip(clip, parts, layout, dimension)?;
        let textures = channels.finalize(&clip.name)?;
        self.persist(clip, textures, dimension)
    }

    fn sample_clip(
        &mut self,
        clip: &Clip,
        parts: &[MeshPart],
        layout: &PartLayout,
        dimension: usize,
    ) -> Result<VertexChannels, BakeError> {
        let playback = |source| BakeError::Playback {
            clip: clip.name.clone(),
            source,
        };

        let mut channels = VertexChannels::new(dimension);
        let mut sampler = FrameSampler::new(&mut *self.player, parts);
        sampler.begin(clip).map_err(playback)?;

        for (frame, time) in frame_times(dimension) {
            if self.cancel.is_cancelled() {
                warn!("Bake cancelled at frame {} of clip '{}'", frame, clip.name);
                return Err(BakeError::Cancelled(clip.name.clone()));
            }
            let sampled = sampler.sample(time).map_err(playback)?;
            encode_frame(frame, &sampled, layout, &mut channels)?;
        }
        debug!("Sampled {} frames of '{}'", dimension, clip.name);
        Ok(channels)
    }

    fn persist(
        &mut self,
        clip: &Clip,
        textures: FinalizedChannels,
        dimension: usize,
    ) -> Result<BakedAnimation, BakeError> {
        let folders = match &self.folders {
            Some(folders) => folders.clone(),
            None => {
                let folders = ExportFolders::create(&mut *self.store, self.config, &self.object_name)?;
                self.folders = Some(folders.clone());
                folders
            }
        };

        let slots = TextureSlots {
            point_cache: self
                .store
                .save(&textures.position, &folders.textures, &textures.position.name)?,
            normal_cache: self
                .store
                .save(&textures.normal, &folders.textures, &textures.normal.name)?,
            tangent_cache: self
                .store
                .save(&textures.tangent, &folders.textures, &textures.tangent.name)?,
        };

        let material = VatMaterial {
            name: clip.name.clone(),
            shader: self.config.shader.clone(),
            textures: slots,
        };
        let material_handle = self
            .store
            .save(&material, &folders.materials, &material.name)?;

        info!(
            "Baked clip '{}' into {}x{} textures",
            clip.name, dimension, dimension
        );
        Ok(BakedAnimation {
            clip: clip.clone(),
            material,
            material_handle,
            dimension,
        })
    }
}
