use glam::{Mat4, Quat, Vec3};
use vat_assets::RigNode;

/// Local transform of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Rest transform of `node`.
    pub fn from_node(node: &RigNode) -> Self {
        Self {
            translation: node.translation,
            rotation: node.rotation,
            scale: node.scale,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Local transforms of every node of a rig, index-aligned with its nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    locals: Vec<Transform>,
}

impl Pose {
    pub fn rest(nodes: &[RigNode]) -> Self {
        Self {
            locals: nodes.iter().map(Transform::from_node).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.locals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }

    pub fn local(&self, node: usize) -> Option<&Transform> {
        self.locals.get(node)
    }

    pub fn local_mut(&mut self, node: usize) -> Option<&mut Transform> {
        self.locals.get_mut(node)
    }

    /// Model-space matrix of every node.
    ///
    /// Nodes may appear before their parents. A parent index outside the rig
    /// is treated as no parent.
    pub fn global_matrices(&self, nodes: &[RigNode]) -> Vec<Mat4> {
        let count = self.locals.len();
        let mut globals: Vec<Option<Mat4>> = vec![None; count];
        let mut chain = Vec::new();

        for start in 0..count {
            // Walk up to the first resolved ancestor, then resolve back down.
            let mut current = Some(start);
            while let Some(node) = current {
                if globals[node].is_some() || chain.len() > count {
                    break;
                }
                chain.push(node);
                current = nodes
                    .get(node)
                    .and_then(|n| n.parent)
                    .filter(|&parent| parent < count);
            }
            let mut parent = current.and_then(|node| globals[node]);
            while let Some(node) = chain.pop() {
                let local = self.locals[node].matrix();
                let global = match parent {
                    Some(parent) => parent * local,
                    None => local,
                };
                globals[node] = Some(global);
                parent = Some(global);
            }
        }

        globals
            .into_iter()
            .map(|m| m.unwrap_or(Mat4::IDENTITY))
            .collect()
    }
}
