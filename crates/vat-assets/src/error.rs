use std::path::PathBuf;

/// Errors that can occur while loading or persisting assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(PathBuf),

    #[error("folder not found: {0}")]
    FolderNotFound(PathBuf),

    #[error("failed to load glTF file '{0}': {1}")]
    GltfLoadFailed(PathBuf, String),

    #[error("failed to write image '{0}': {1}")]
    ImageWriteFailed(PathBuf, String),

    #[error("failed to serialize '{0}': {1}")]
    Serialization(PathBuf, String),

    #[error("I/O error at '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("texture '{name}' holds {actual} pixels, expected {expected}")]
    PixelCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}
