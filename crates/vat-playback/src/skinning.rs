//! Linear-blend skinning on the CPU.

use glam::{Mat3, Mat4, Vec3, Vec4};
use vat_assets::{MeshPart, SkinData, SkinnedPart};
use vat_bake::DeformedGeometry;

/// Used for parts whose source has no tangents.
const DEFAULT_TANGENT: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);

/// Skinning matrix of every joint of `skin`: joint global matrix times its inverse bind.
pub fn joint_matrices(skin: &SkinData, globals: &[Mat4]) -> Vec<Mat4> {
    skin.joints
        .iter()
        .enumerate()
        .map(|(i, &joint)| {
            let global = globals.get(joint).copied().unwrap_or(Mat4::IDENTITY);
            let inverse_bind = skin.inverse_bind.get(i).copied().unwrap_or(Mat4::IDENTITY);
            global * inverse_bind
        })
        .collect()
}

fn get_matrix(matrices: &[Mat4], index: u16) -> Mat4 {
    matrices.get(index as usize).copied().unwrap_or(Mat4::IDENTITY)
}

/// Inverse-transpose of the linear part of `m`, keeping normals perpendicular
/// to surfaces under non-uniform scale. Singular matrices use the linear part as is.
fn normal_matrix(m: Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(m);
    if linear.determinant().abs() > f32::EPSILON {
        linear.inverse().transpose()
    } else {
        linear
    }
}

/// Blend the joint matrices influencing one vertex. `None` when its weights are all zero.
fn blend(matrices: &[Mat4], joints: [u16; 4], weights: [f32; 4]) -> Option<Mat4> {
    let total: f32 = weights.iter().sum();
    if total <= f32::EPSILON {
        return None;
    }
    let mut blended = Mat4::ZERO;
    for (&joint, &weight) in joints.iter().zip(&weights) {
        if weight != 0.0 {
            blended += get_matrix(matrices, joint) * (weight / total);
        }
    }
    Some(blended)
}

/// Deform the bind-pose `part` with the skin data of `source`.
///
/// With `joints` the vertices are skinned; parts without per-vertex skin data,
/// and vertices without weights, follow `node_matrix` instead.
pub fn deform_part(
    part: &MeshPart,
    source: &SkinnedPart,
    joints: Option<&[Mat4]>,
    node_matrix: Mat4,
) -> DeformedGeometry {
    let count = part.vertex_count();
    let skinned = joints.filter(|_| source.joints.len() == count && source.weights.len() == count);
    let vertex_matrix = |v: usize| -> Mat4 {
        skinned
            .and_then(|matrices| blend(matrices, source.joints[v], source.weights[v]))
            .unwrap_or(node_matrix)
    };

    let mut positions = Vec::with_capacity(count);
    let mut normals = Vec::with_capacity(count);
    let mut tangents = Vec::with_capacity(count);
    let has_normals = part.normals.len() == count;
    let has_tangents = source.tangents.len() == count;

    for v in 0..count {
        let m = vertex_matrix(v);
        positions.push(m.transform_point3(part.positions[v]));
        if has_normals {
            normals.push((normal_matrix(m) * part.normals[v]).normalize_or_zero());
        }
        let tangent = if has_tangents {
            source.tangents[v]
        } else {
            DEFAULT_TANGENT
        };
        let direction = m.transform_vector3(tangent.truncate()).normalize_or_zero();
        tangents.push(direction.extend(tangent.w));
    }

    DeformedGeometry {
        positions,
        normals,
        tangents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec2};
    use vat_assets::SurfaceMaterial;

    fn source(joints: Vec<[u16; 4]>, weights: Vec<[f32; 4]>) -> SkinnedPart {
        let count = joints.len().max(2);
        SkinnedPart {
            part: MeshPart {
                name: "arm".into(),
                positions: (0..count).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect(),
                normals: vec![Vec3::Y; count],
                uvs: vec![Vec2::ZERO; count],
                triangles: Vec::new(),
                material: SurfaceMaterial::new("skin"),
            },
            node: 0,
            skin: Some(0),
            tangents: Vec::new(),
            joints,
            weights,
        }
    }

    #[test]
    fn joint_matrix_cancels_bind_pose() {
        let bind = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0));
        let skin = SkinData {
            joints: vec![1],
            inverse_bind: vec![bind.inverse()],
        };
        let globals = vec![Mat4::IDENTITY, bind];
        let matrices = joint_matrices(&skin, &globals);
        assert!(matrices[0].abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn weights_blend_joint_matrices() {
        let source = source(
            vec![[0, 1, 0, 0], [1, 0, 0, 0]],
            vec![[0.5, 0.5, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0]],
        );
        let matrices = [
            Mat4::IDENTITY,
            Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)),
        ];
        let deformed = deform_part(&source.part, &source, Some(&matrices), Mat4::IDENTITY);
        assert_eq!(deformed.positions[0], Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(deformed.positions[1], Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn rotation_turns_normals_and_tangents() {
        let source = source(vec![[0; 4]; 2], vec![[1.0, 0.0, 0.0, 0.0]; 2]);
        let matrices = [Mat4::from_quat(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2))];
        let deformed = deform_part(&source.part, &source, Some(&matrices), Mat4::IDENTITY);
        assert!((deformed.normals[0] - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
        // No source tangents: +X rotated onto +Y, handedness kept.
        assert!((deformed.tangents[0] - Vec4::new(0.0, 1.0, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn non_uniform_scale_keeps_normals_perpendicular() {
        let mut source = source(Vec::new(), Vec::new());
        source.part.normals = vec![Vec3::new(1.0, 1.0, 0.0).normalize(); 2];
        let node = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let deformed = deform_part(&source.part, &source, None, node);

        let expected = Vec3::new(0.5, 1.0, 0.0).normalize();
        assert!((deformed.normals[0] - expected).length() < 1e-5);
        // The stretched surface direction stays perpendicular to the normal.
        let surface = node.transform_vector3(Vec3::new(1.0, -1.0, 0.0));
        assert!(deformed.normals[0].dot(surface).abs() < 1e-5);
    }

    #[test]
    fn unskinned_parts_follow_their_node() {
        let source = source(Vec::new(), Vec::new());
        let node = Mat4::from_translation(Vec3::new(0.0, 0.0, 3.0));
        let deformed = deform_part(&source.part, &source, None, node);
        assert_eq!(deformed.positions, vec![Vec3::new(0.0, 0.0, 3.0), Vec3::new(1.0, 0.0, 3.0)]);
        assert_eq!(deformed.normals, vec![Vec3::Y; 2]);
    }

    #[test]
    fn zero_weights_fall_back_to_node() {
        let source = source(vec![[0; 4]; 2], vec![[0.0; 4]; 2]);
        let matrices = [Mat4::from_translation(Vec3::X)];
        let node = Mat4::from_translation(Vec3::Z);
        let deformed = deform_part(&source.part, &source, Some(&matrices), node);
        assert_eq!(deformed.positions[0], Vec3::Z);
    }

    #[test]
    fn missing_normals_stay_missing() {
        let mut source = source(Vec::new(), Vec::new());
        source.part.normals.clear();
        let deformed = deform_part(&source.part, &source, None, Mat4::IDENTITY);
        assert!(deformed.normals.is_empty());
        assert_eq!(deformed.tangents.len(), 2);
    }
}
