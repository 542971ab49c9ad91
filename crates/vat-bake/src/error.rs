use vat_assets::AssetError;

/// Errors raised by an animation playback service.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("clip '{0}' not found")]
    ClipNotFound(String),

    #[error("no clip is playing")]
    NoClipPlaying,

    #[error("mesh part {0} not found")]
    PartNotFound(usize),

    #[error("pose evaluation failed: {0}")]
    Failed(String),
}

/// Errors that can occur while baking.
#[derive(Debug, thiserror::Error)]
pub enum BakeError {
    #[error("clip '{clip}' has no geometry to bake ({parts} parts, {vertices} vertices)")]
    InvalidGeometry {
        clip: String,
        parts: usize,
        vertices: usize,
    },

    #[error("clip '{clip}': playback failed: {source}")]
    Playback {
        clip: String,
        #[source]
        source: PlaybackError,
    },

    #[error("frame {frame} diverges from the merge layout: {detail}")]
    SamplingDesync { frame: usize, detail: String },

    #[error("clip '{clip}': {channel} texture is {width}x{height}, expected {dimension}x{dimension}")]
    DimensionMismatch {
        clip: String,
        channel: &'static str,
        width: u32,
        height: u32,
        dimension: usize,
    },

    #[error("{vertices} vertices do not fit a texture dimension of {dimension}")]
    DimensionTooSmall { dimension: usize, vertices: usize },

    #[error("part '{part}' references vertex {index} but has {vertices} vertices")]
    TriangleOutOfRange {
        part: String,
        index: u32,
        vertices: usize,
    },

    #[error("bake cancelled during clip '{0}'")]
    Cancelled(String),

    #[error("no clip could be baked")]
    NothingBaked,

    #[error(transparent)]
    Asset(#[from] AssetError),
}

impl BakeError {
    /// Whether the error aborts the whole bake. Non-fatal errors only skip one clip.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            BakeError::InvalidGeometry { .. } | BakeError::Playback { .. }
        )
    }
}
