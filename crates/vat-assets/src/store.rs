use std::any::Any;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::AssetError;
use crate::handle::{next_asset_id, AssetHandle, AssetId, FolderRef};
use crate::material::VatMaterial;
use crate::mesh::MergedMesh;

/// Anything an `AssetStore` can persist.
pub trait Asset: Any + Send + Sync + Clone + Serialize {
    /// File extension used when the asset is written to disk.
    fn extension() -> &'static str {
        "json"
    }

    /// Write the asset to `path`. Defaults to pretty-printed JSON.
    fn write_to(&self, path: &Path) -> Result<(), AssetError> {
        let file = File::create(path).map_err(|e| AssetError::Io(path.to_path_buf(), e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .map_err(|e| AssetError::Serialization(path.to_path_buf(), e.to_string()))
    }
}

impl Asset for VatMaterial {}
impl Asset for MergedMesh {}

/// Persistence backend for baked textures, materials and meshes.
///
/// Folder naming collisions are resolved by the store, never by callers.
pub trait AssetStore {
    /// Return the folder `name` under `parent` (the store root when `None`),
    /// creating it if it does not exist yet.
    fn ensure_folder(&mut self, parent: Option<&FolderRef>, name: &str)
        -> Result<FolderRef, AssetError>;

    /// Create a new folder under `parent`. If `name` is taken the store picks
    /// `"name 1"`, `"name 2"`, ...
    fn create_folder(&mut self, parent: Option<&FolderRef>, name: &str)
        -> Result<FolderRef, AssetError>;

    /// Persist `asset` as `name` inside `folder`.
    fn save<A: Asset>(
        &mut self,
        asset: &A,
        folder: &FolderRef,
        name: &str,
    ) -> Result<AssetHandle<A>, AssetError>;
}

/// Join a folder name onto an optional parent folder path.
pub(crate) fn child_path(parent: Option<&FolderRef>, name: &str) -> PathBuf {
    match parent {
        Some(folder) => folder.path().join(name),
        None => PathBuf::from(name),
    }
}

/// First of `name`, `name 1`, `name 2`, ... under `parent` for which `taken` is false.
pub(crate) fn unique_child_path(
    parent: Option<&FolderRef>,
    name: &str,
    taken: impl Fn(&Path) -> bool,
) -> PathBuf {
    let mut candidate = child_path(parent, name);
    let mut suffix = 1;
    while taken(&candidate) {
        candidate = child_path(parent, &format!("{name} {suffix}"));
        suffix += 1;
    }
    candidate
}

pub(crate) fn asset_file_name<A: Asset>(name: &str) -> String {
    format!("{name}.{}", A::extension())
}

struct StoredAsset {
    path: PathBuf,
    value: Box<dyn Any + Send + Sync>,
}

/// In-memory asset store. Keeps every saved asset so it can be inspected.
#[derive(Default)]
pub struct MemoryStore {
    folders: HashMap<PathBuf, FolderRef>,
    assets: HashMap<AssetId, StoredAsset>,
    path_to_asset: HashMap<PathBuf, AssetId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a saved asset by handle.
    pub fn get<A: Asset>(&self, handle: &AssetHandle<A>) -> Option<&A> {
        self.assets
            .get(&handle.id())
            .and_then(|stored| stored.value.downcast_ref::<A>())
    }

    /// Get a saved asset by its path relative to the store root, e.g.
    /// `VATExportData/Robot/Textures/walk_point.exr`.
    pub fn get_by_path<A: Asset>(&self, path: impl AsRef<Path>) -> Option<&A> {
        let id = self.path_to_asset.get(path.as_ref())?;
        self.assets.get(id)?.value.downcast_ref::<A>()
    }

    /// Path an asset was saved under.
    pub fn path_of<A>(&self, handle: &AssetHandle<A>) -> Option<&Path> {
        self.assets.get(&handle.id()).map(|s| s.path.as_path())
    }

    pub fn has_folder(&self, path: impl AsRef<Path>) -> bool {
        self.folders.contains_key(path.as_ref())
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Number of saved assets of type `A`.
    pub fn count_of<A: Asset>(&self) -> usize {
        self.assets.values().filter(|s| s.value.is::<A>()).count()
    }
}

impl AssetStore for MemoryStore {
    fn ensure_folder(
        &mut self,
        parent: Option<&FolderRef>,
        name: &str,
    ) -> Result<FolderRef, AssetError> {
        let path = child_path(parent, name);
        let folder = self
            .folders
            .entry(path.clone())
            .or_insert_with(|| FolderRef::new(path));
        Ok(folder.clone())
    }

    fn create_folder(
        &mut self,
        parent: Option<&FolderRef>,
        name: &str,
    ) -> Result<FolderRef, AssetError> {
        if let Some(parent) = parent {
            if !self.folders.contains_key(parent.path()) {
                return Err(AssetError::FolderNotFound(parent.path().to_path_buf()));
            }
        }
        let path = unique_child_path(parent, name, |p| self.folders.contains_key(p));
        let folder = FolderRef::new(path.clone());
        self.folders.insert(path, folder.clone());
        Ok(folder)
    }

    fn save<A: Asset>(
        &mut self,
        asset: &A,
        folder: &FolderRef,
        name: &str,
    ) -> Result<AssetHandle<A>, AssetError> {
        if !self.folders.contains_key(folder.path()) {
            return Err(AssetError::FolderNotFound(folder.path().to_path_buf()));
        }
        let path = folder.path().join(asset_file_name::<A>(name));

        // Saving over an existing path replaces the previous asset.
        if let Some(old) = self.path_to_asset.remove(&path) {
            self.assets.remove(&old);
        }

        let id = next_asset_id();
        debug!("Stored asset {} as {}", id, path.display());
        self.assets.insert(
            id,
            StoredAsset {
                path: path.clone(),
                value: Box::new(asset.clone()),
            },
        );
        self.path_to_asset.insert(path.clone(), id);
        Ok(AssetHandle::new(id, path))
    }
}
