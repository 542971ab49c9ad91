use vat_assets::MeshPart;

/// Vertex counts and offsets of mesh parts in baking order.
///
/// Both the frame encoder and the mesh merger walk parts in this order, which
/// keeps texture columns and merged vertex ids identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartLayout {
    counts: Vec<usize>,
    offsets: Vec<usize>,
    total: usize,
}

impl PartLayout {
    pub fn from_parts(parts: &[MeshPart]) -> Self {
        Self::from_counts(parts.iter().map(MeshPart::vertex_count))
    }

    pub fn from_counts(counts: impl IntoIterator<Item = usize>) -> Self {
        let counts: Vec<usize> = counts.into_iter().collect();
        let mut offsets = Vec::with_capacity(counts.len());
        let mut total = 0;
        for count in &counts {
            offsets.push(total);
            total += count;
        }
        Self {
            counts,
            offsets,
            total,
        }
    }

    pub fn part_count(&self) -> usize {
        self.counts.len()
    }

    pub fn total_vertices(&self) -> usize {
        self.total
    }

    /// Vertex count of part `index`.
    pub fn count(&self, index: usize) -> Option<usize> {
        self.counts.get(index).copied()
    }

    /// Merged id of the first vertex of part `index`.
    pub fn offset(&self, index: usize) -> Option<usize> {
        self.offsets.get(index).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
