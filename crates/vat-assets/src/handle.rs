use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a persisted asset.
pub type AssetId = u64;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a new unique asset ID.
pub(crate) fn next_asset_id() -> AssetId {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A typed handle referencing an asset saved in an `AssetStore`.
///
/// The store-relative path is what gets persisted, so a saved material or
/// object still names the files it references. The id is only meaningful
/// within the process that saved the asset and is zero after deserialization.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct AssetHandle<T> {
    #[serde(skip)]
    id: AssetId,
    path: PathBuf,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T> AssetHandle<T> {
    pub(crate) fn new(id: AssetId, path: PathBuf) -> Self {
        Self {
            id,
            path,
            _marker: PhantomData,
        }
    }

    /// The unique ID of this asset.
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Path of the asset file relative to the store root.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        Self::new(self.id, self.path.clone())
    }
}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.path == other.path
    }
}

impl<T> Eq for AssetHandle<T> {}

impl<T> std::hash::Hash for AssetHandle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.path.hash(state);
    }
}

/// A folder created by an `AssetStore`. The path is relative to the store root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRef {
    id: Uuid,
    path: PathBuf,
}

impl FolderRef {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            path,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Path of this folder relative to the store root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, i.e. the name the store settled on.
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}
