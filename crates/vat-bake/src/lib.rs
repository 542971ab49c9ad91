//! VAT Bake - Vertex animation texture baking
//!
//! Samples every clip of a rigged object once per texture row, packs the
//! deformed positions, normals and tangents into square float textures (one
//! column per vertex), and merges the object's parts into a single static mesh
//! whose secondary UV channel points each vertex at its texture column.
//!
//! The animation playback engine and the asset store are reached through the
//! [`AnimationPlayer`] and [`vat_assets::AssetStore`] traits.

mod baker;
mod config;
mod encoder;
mod error;
mod layout;
mod merger;
mod pipeline;
mod sampler;
mod sizer;

#[cfg(test)]
mod test_support;

pub use baker::{AnimationBaker, BakeReport, BakedAnimation, CancelToken, ClipFailure, ExportFolders};
pub use config::BakeConfig;
pub use encoder::{encode_frame, encode_part, Channel, FinalizedChannels, FrameCursor, VertexChannels};
pub use error::{BakeError, PlaybackError};
pub use layout::PartLayout;
pub use merger::merge;
pub use pipeline::{bake_object, BakeOutput};
pub use sampler::{AnimationPlayer, DeformedGeometry, FrameSampler};
pub use sizer::{frame_times, texture_size, MIN_DIMENSION};
