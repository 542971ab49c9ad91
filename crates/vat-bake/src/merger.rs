use glam::{Vec2, Vec3};
use tracing::debug;
use vat_assets::{MergedMesh, MeshPart, SubMesh};

use crate::error::BakeError;
use crate::layout::PartLayout;

/// Combine `parts` into one static mesh whose vertex ids match the texture
/// columns written for a bake of dimension `dimension`.
///
/// Per-part attributes whose length differs from the part's vertex count are
/// replaced by zeros for that part. Submeshes keep part order.
pub fn merge(parts: &[MeshPart], dimension: usize) -> Result<MergedMesh, BakeError> {
    let layout = PartLayout::from_parts(parts);
    let total = layout.total_vertices();
    if total > dimension {
        return Err(BakeError::DimensionTooSmall {
            dimension,
            vertices: total,
        });
    }

    let mut mesh = MergedMesh {
        positions: Vec::with_capacity(total),
        normals: Vec::with_capacity(total),
        uv0: Vec::with_capacity(total),
        lookup_uv: Vec::with_capacity(total),
        submeshes: Vec::with_capacity(parts.len()),
        ..Default::default()
    };

    for (index, part) in parts.iter().enumerate() {
        let count = part.vertex_count();
        let offset = layout.offset(index).unwrap_or(mesh.positions.len());
        debug_assert_eq!(offset, mesh.positions.len());

        if let Some(&bad) = part.triangles.iter().find(|&&i| i as usize >= count) {
            return Err(BakeError::TriangleOutOfRange {
                part: part.name.clone(),
                index: bad,
                vertices: count,
            });
        }

        mesh.positions.extend_from_slice(&part.positions);
        append_or_zero(&mut mesh.normals, &part.normals, count, Vec3::ZERO);
        append_or_zero(&mut mesh.uv0, &part.uvs, count, Vec2::ZERO);

        mesh.submeshes.push(SubMesh {
            triangles: part
                .triangles
                .iter()
                .map(|&i| i + offset as u32)
                .collect(),
            material: part.material.clone(),
        });
    }

    let step = 1.0 / dimension as f32;
    mesh.lookup_uv = (0..total).map(|i| Vec2::new(i as f32 * step, 0.0)).collect();

    debug!(
        "Merged {} parts into {} vertices, {} triangles",
        parts.len(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

fn append_or_zero<T: Copy>(dst: &mut Vec<T>, src: &[T], count: usize, zero: T) {
    if src.len() == count {
        dst.extend_from_slice(src);
    } else {
        dst.extend(std::iter::repeat(zero).take(count));
    }
}
