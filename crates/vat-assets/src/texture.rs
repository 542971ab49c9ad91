use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AssetError;
use crate::store::Asset;

/// Pixel format of a vertex texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureFormat {
    Rgba32Float,
}

/// Baked textures are always point sampled; frames must not bleed into each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapMode {
    Repeat,
}

/// Value of every pixel that has not been written yet.
pub const EMPTY_PIXEL: [f32; 4] = [0.0; 4];

/// A square, writable RGBA float buffer. Row `r`, column `c` lives at `r * dimension + c`.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    dimension: usize,
    pixels: Vec<[f32; 4]>,
}

impl PixelBuffer {
    /// Allocate a `dimension × dimension` buffer filled with `EMPTY_PIXEL`.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            pixels: vec![EMPTY_PIXEL; dimension * dimension],
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Write one pixel. Panics if `row` or `column` is outside the buffer.
    pub fn set(&mut self, row: usize, column: usize, pixel: [f32; 4]) {
        assert!(
            row < self.dimension && column < self.dimension,
            "pixel ({row}, {column}) outside {0}x{0} buffer",
            self.dimension
        );
        self.pixels[row * self.dimension + column] = pixel;
    }

    pub fn get(&self, row: usize, column: usize) -> Option<[f32; 4]> {
        if row >= self.dimension || column >= self.dimension {
            return None;
        }
        Some(self.pixels[row * self.dimension + column])
    }

    /// Commit the written pixels into an immutable, named texture.
    pub fn finalize(self, name: impl Into<String>) -> VertexTexture {
        let side = self.dimension as u32;
        VertexTexture {
            name: name.into(),
            width: side,
            height: side,
            format: TextureFormat::Rgba32Float,
            filter: FilterMode::Point,
            wrap: WrapMode::Repeat,
            pixels: self.pixels,
        }
    }
}

/// A finalized vertex animation texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexTexture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub filter: FilterMode,
    pub wrap: WrapMode,
    pub pixels: Vec<[f32; 4]>,
}

impl VertexTexture {
    /// Read the pixel for `vertex` at `frame`.
    pub fn pixel(&self, frame: usize, vertex: usize) -> Option<[f32; 4]> {
        let width = self.width as usize;
        if vertex >= width || frame >= self.height as usize {
            return None;
        }
        self.pixels.get(frame * width + vertex).copied()
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

impl Asset for VertexTexture {
    fn extension() -> &'static str {
        "exr"
    }

    /// Written as a 32-bit float RGBA OpenEXR image, frame 0 on the first row.
    fn write_to(&self, path: &Path) -> Result<(), AssetError> {
        let expected = self.width as usize * self.height as usize;
        if self.pixels.len() != expected {
            return Err(AssetError::PixelCountMismatch {
                name: self.name.clone(),
                expected,
                actual: self.pixels.len(),
            });
        }

        let raw: Vec<f32> = bytemuck::cast_slice(&self.pixels).to_vec();
        let image = image::Rgba32FImage::from_raw(self.width, self.height, raw).ok_or_else(|| {
            AssetError::ImageWriteFailed(path.to_path_buf(), "buffer too small".into())
        })?;
        image
            .save_with_format(path, image::ImageFormat::OpenExr)
            .map_err(|e| AssetError::ImageWriteFailed(path.to_path_buf(), e.to_string()))
    }
}
