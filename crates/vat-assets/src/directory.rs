use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::AssetError;
use crate::handle::{next_asset_id, AssetHandle, FolderRef};
use crate::store::{asset_file_name, child_path, unique_child_path, Asset, AssetStore};

/// Asset store writing into a directory tree on disk.
pub struct DirectoryStore {
    base_path: PathBuf,
}

impl DirectoryStore {
    /// Create a store rooted at the given base path. The directory is created lazily.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        info!("DirectoryStore rooted at {}", base_path.display());
        Self { base_path }
    }

    /// Resolve a store-relative path against the base path.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    fn check_parent(&self, parent: Option<&FolderRef>) -> Result<(), AssetError> {
        match parent {
            Some(folder) if !self.resolve(folder.path()).is_dir() => {
                Err(AssetError::FolderNotFound(folder.path().to_path_buf()))
            }
            _ => Ok(()),
        }
    }

    /// File on disk a handle saved by this store refers to.
    pub fn file_path<A>(&self, handle: &AssetHandle<A>) -> PathBuf {
        self.resolve(handle.path())
    }

    /// The base path this store resolves relative paths against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl AssetStore for DirectoryStore {
    fn ensure_folder(
        &mut self,
        parent: Option<&FolderRef>,
        name: &str,
    ) -> Result<FolderRef, AssetError> {
        self.check_parent(parent)?;
        let path = child_path(parent, name);
        let full_path = self.resolve(&path);
        fs::create_dir_all(&full_path).map_err(|e| AssetError::Io(full_path, e))?;
        Ok(FolderRef::new(path))
    }

    fn create_folder(
        &mut self,
        parent: Option<&FolderRef>,
        name: &str,
    ) -> Result<FolderRef, AssetError> {
        self.check_parent(parent)?;
        let path = unique_child_path(parent, name, |p| self.resolve(p).exists());
        let full_path = self.resolve(&path);
        fs::create_dir_all(&full_path).map_err(|e| AssetError::Io(full_path.clone(), e))?;
        debug!("Created folder {}", full_path.display());
        Ok(FolderRef::new(path))
    }

    fn save<A: Asset>(
        &mut self,
        asset: &A,
        folder: &FolderRef,
        name: &str,
    ) -> Result<AssetHandle<A>, AssetError> {
        let dir = self.resolve(folder.path());
        if !dir.is_dir() {
            return Err(AssetError::FolderNotFound(folder.path().to_path_buf()));
        }
        let path = folder.path().join(asset_file_name::<A>(name));
        let full_path = self.resolve(&path);
        asset.write_to(&full_path)?;
        debug!("Wrote {}", full_path.display());
        Ok(AssetHandle::new(next_asset_id(), path))
    }
}
