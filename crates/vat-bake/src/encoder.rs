use glam::{Vec3, Vec4};
use vat_assets::{PixelBuffer, VertexTexture};

use crate::error::BakeError;
use crate::layout::PartLayout;
use crate::sampler::DeformedGeometry;

/// The vertex attribute stored in a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Position,
    Normal,
    Tangent,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Position, Channel::Normal, Channel::Tangent];

    /// Suffix of the texture name, as in `walk_point`.
    pub fn suffix(self) -> &'static str {
        match self {
            Channel::Position => "point",
            Channel::Normal => "normal",
            Channel::Tangent => "tangent",
        }
    }

    pub fn texture_name(self, clip: &str) -> String {
        format!("{clip}_{}", self.suffix())
    }
}

/// Write position for one frame. Created at column 0 for every frame and
/// advanced by each part encoded into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCursor {
    frame: usize,
    column: usize,
}

impl FrameCursor {
    pub fn new(frame: usize) -> Self {
        Self { frame, column: 0 }
    }

    /// Texture row being written.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Column (merged vertex id) of the next vertex.
    pub fn column(&self) -> usize {
        self.column
    }
}

/// The position, normal and tangent buffers of one clip.
#[derive(Debug, Clone)]
pub struct VertexChannels {
    position: PixelBuffer,
    normal: PixelBuffer,
    tangent: PixelBuffer,
}

impl VertexChannels {
    pub fn new(dimension: usize) -> Self {
        Self {
            position: PixelBuffer::new(dimension),
            normal: PixelBuffer::new(dimension),
            tangent: PixelBuffer::new(dimension),
        }
    }

    pub fn dimension(&self) -> usize {
        self.position.dimension()
    }

    pub fn buffer(&self, channel: Channel) -> &PixelBuffer {
        match channel {
            Channel::Position => &self.position,
            Channel::Normal => &self.normal,
            Channel::Tangent => &self.tangent,
        }
    }

    /// Commit all three buffers into textures named after `clip`.
    pub fn finalize(self, clip: &str) -> Result<FinalizedChannels, BakeError> {
        let dimension = self.dimension();
        let finalized = FinalizedChannels {
            position: self.position.finalize(Channel::Position.texture_name(clip)),
            normal: self.normal.finalize(Channel::Normal.texture_name(clip)),
            tangent: self.tangent.finalize(Channel::Tangent.texture_name(clip)),
        };
        finalized.check_dimension(clip, dimension)?;
        Ok(finalized)
    }
}

/// The textures of one baked clip.
#[derive(Debug, Clone)]
pub struct FinalizedChannels {
    pub position: VertexTexture,
    pub normal: VertexTexture,
    pub tangent: VertexTexture,
}

impl FinalizedChannels {
    pub fn get(&self, channel: Channel) -> &VertexTexture {
        match channel {
            Channel::Position => &self.position,
            Channel::Normal => &self.normal,
            Channel::Tangent => &self.tangent,
        }
    }

    /// Every channel must be `dimension × dimension`.
    pub fn check_dimension(&self, clip: &str, dimension: usize) -> Result<(), BakeError> {
        for channel in Channel::ALL {
            let texture = self.get(channel);
            if texture.width as usize != dimension || texture.height as usize != dimension {
                return Err(BakeError::DimensionMismatch {
                    clip: clip.to_string(),
                    channel: channel.suffix(),
                    width: texture.width,
                    height: texture.height,
                    dimension,
                });
            }
        }
        Ok(())
    }
}

/// Write one part's vertices at the cursor and advance it.
pub fn encode_part(
    cursor: &mut FrameCursor,
    geometry: &DeformedGeometry,
    channels: &mut VertexChannels,
) -> Result<(), BakeError> {
    let dimension = channels.dimension();
    let count = geometry.vertex_count();
    if cursor.frame >= dimension || cursor.column + count > dimension {
        return Err(BakeError::SamplingDesync {
            frame: cursor.frame,
            detail: format!(
                "columns {}..{} do not fit a {dimension}x{dimension} texture",
                cursor.column,
                cursor.column + count
            ),
        });
    }

    let row = cursor.frame;
    for vertex in 0..count {
        let p = geometry.positions[vertex];
        let n = geometry.normals.get(vertex).copied().unwrap_or(Vec3::ZERO);
        let t = geometry.tangents.get(vertex).copied().unwrap_or(Vec4::ZERO);
        let column = cursor.column + vertex;
        channels.position.set(row, column, [p.x, p.y, p.z, 1.0]);
        channels.normal.set(row, column, [n.x, n.y, n.z, 1.0]);
        channels.tangent.set(row, column, t.to_array());
    }
    cursor.column += count;
    Ok(())
}

/// Encode one sampled frame. `sampled` must hold one entry per part of
/// `layout`, in layout order, each with the part's vertex count.
pub fn encode_frame(
    frame: usize,
    sampled: &[DeformedGeometry],
    layout: &PartLayout,
    channels: &mut VertexChannels,
) -> Result<(), BakeError> {
    if sampled.len() != layout.part_count() {
        return Err(BakeError::SamplingDesync {
            frame,
            detail: format!(
                "sampled {} parts, layout has {}",
                sampled.len(),
                layout.part_count()
            ),
        });
    }

    let mut cursor = FrameCursor::new(frame);
    for (index, geometry) in sampled.iter().enumerate() {
        let expected = layout.count(index).unwrap_or_default();
        if geometry.vertex_count() != expected {
            return Err(BakeError::SamplingDesync {
                frame,
                detail: format!(
                    "part {index} sampled {} vertices, layout has {expected}",
                    geometry.vertex_count()
                ),
            });
        }
        debug_assert_eq!(Some(cursor.column()), layout.offset(index));
        encode_part(&mut cursor, geometry, channels)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vat_assets::EMPTY_PIXEL;

    fn geometry(count: usize, base: f32) -> DeformedGeometry {
        DeformedGeometry {
            positions: (0..count)
                .map(|i| Vec3::new(base + i as f32, 2.0, 3.0))
                .collect(),
            normals: vec![Vec3::Z; count],
            tangents: vec![Vec4::new(1.0, 0.0, 0.0, -1.0); count],
        }
    }

    #[test]
    fn texture_names() {
        assert_eq!(Channel::Position.texture_name("walk"), "walk_point");
        assert_eq!(Channel::Normal.texture_name("walk"), "walk_normal");
        assert_eq!(Channel::Tangent.texture_name("walk"), "walk_tangent");
    }

    #[test]
    fn parts_fill_consecutive_columns() {
        let layout = PartLayout::from_counts([3, 5]);
        let mut channels = VertexChannels::new(8);
        let sampled = [geometry(3, 0.0), geometry(5, 10.0)];
        encode_frame(1, &sampled, &layout, &mut channels).unwrap();

        let position = channels.buffer(Channel::Position);
        for column in 0..3 {
            assert_eq!(position.get(1, column), Some([column as f32, 2.0, 3.0, 1.0]));
        }
        for column in 3..8 {
            let x = 10.0 + (column - 3) as f32;
            assert_eq!(position.get(1, column), Some([x, 2.0, 3.0, 1.0]));
        }
        assert_eq!(position.get(0, 0), Some(EMPTY_PIXEL));
        assert_eq!(
            channels.buffer(Channel::Normal).get(1, 4),
            Some([0.0, 0.0, 1.0, 1.0])
        );
        assert_eq!(
            channels.buffer(Channel::Tangent).get(1, 7),
            Some([1.0, 0.0, 0.0, -1.0])
        );
    }

    #[test]
    fn cursor_restarts_every_frame() {
        let layout = PartLayout::from_counts([2]);
        let mut channels = VertexChannels::new(2);
        encode_frame(0, &[geometry(2, 0.0)], &layout, &mut channels).unwrap();
        encode_frame(1, &[geometry(2, 5.0)], &layout, &mut channels).unwrap();
        let position = channels.buffer(Channel::Position);
        assert_eq!(position.get(0, 0), Some([0.0, 2.0, 3.0, 1.0]));
        assert_eq!(position.get(1, 0), Some([5.0, 2.0, 3.0, 1.0]));
    }

    #[test]
    fn missing_normals_and_tangents_encode_as_zero() {
        let mut cursor = FrameCursor::new(0);
        let mut channels = VertexChannels::new(2);
        let geometry = DeformedGeometry {
            positions: vec![Vec3::ONE],
            ..Default::default()
        };
        encode_part(&mut cursor, &geometry, &mut channels).unwrap();
        assert_eq!(cursor.column(), 1);
        assert_eq!(
            channels.buffer(Channel::Normal).get(0, 0),
            Some([0.0, 0.0, 0.0, 1.0])
        );
        assert_eq!(channels.buffer(Channel::Tangent).get(0, 0), Some([0.0; 4]));
    }

    #[test]
    fn vertex_count_mismatch_is_desync() {
        let layout = PartLayout::from_counts([3, 5]);
        let mut channels = VertexChannels::new(8);
        let sampled = [geometry(3, 0.0), geometry(4, 0.0)];
        let err = encode_frame(0, &sampled, &layout, &mut channels).unwrap_err();
        assert!(matches!(err, BakeError::SamplingDesync { frame: 0, .. }));
    }

    #[test]
    fn part_count_mismatch_is_desync() {
        let layout = PartLayout::from_counts([3, 5]);
        let mut channels = VertexChannels::new(8);
        let err = encode_frame(0, &[geometry(3, 0.0)], &layout, &mut channels).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn overflowing_columns_are_rejected() {
        let mut cursor = FrameCursor::new(0);
        let mut channels = VertexChannels::new(2);
        let err = encode_part(&mut cursor, &geometry(3, 0.0), &mut channels).unwrap_err();
        assert!(matches!(err, BakeError::SamplingDesync { .. }));
    }

    #[test]
    fn finalize_names_and_sizes_textures() {
        let channels = VertexChannels::new(4);
        let textures = channels.finalize("run").unwrap();
        assert_eq!(textures.position.name, "run_point");
        assert_eq!(textures.normal.name, "run_normal");
        assert_eq!(textures.tangent.name, "run_tangent");
        for channel in Channel::ALL {
            assert_eq!(textures.get(channel).width, 4);
        }
    }

    #[test]
    fn dimension_check_reports_channel() {
        let mut textures = VertexChannels::new(4).finalize("run").unwrap();
        textures.normal = PixelBuffer::new(2).finalize("run_normal");
        let err = textures.check_dimension("run", 4).unwrap_err();
        assert!(matches!(
            err,
            BakeError::DimensionMismatch { channel: "normal", .. }
        ));
    }
}
