/// Geometry buffers and meshes
use nalgebra::{Point3, Vector2, Vector3};

use crate::sphere::BoundingSphere;

/// Per-vertex attributes stored as parallel arrays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexBuffer {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    /// Empty when the buffer has no texture coordinates. The v coordinate is
    /// already flipped (`1 - v`) relative to the model file.
    pub tex_coords: Vec<Vector2<f32>>,
}

impl VertexBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn has_tex_coords(&self) -> bool {
        !self.tex_coords.is_empty()
    }

    pub fn position(&self, index: usize) -> Option<Point3<f32>> {
        self.positions.get(index).copied()
    }

    /// Normal at `index`; a buffer without one yields the zero vector
    pub fn normal(&self, index: usize) -> Vector3<f32> {
        self.normals.get(index).copied().unwrap_or_else(Vector3::zeros)
    }

    pub fn tex_coord(&self, index: usize) -> Option<Vector2<f32>> {
        self.tex_coords.get(index).copied()
    }

    /// Positions of all three corners, or `None` if any is out of range
    pub fn triangle_positions(&self, corners: [usize; 3]) -> Option<[Point3<f32>; 3]> {
        let [a, b, c] = corners.map(|i| self.position(i));
        Some([a?, b?, c?])
    }
}

/// Triangle-list indices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexBuffer {
    pub indices: Vec<u32>,
}

/// A run of triangles sharing one effect, vertex buffer and index buffer.
/// Buffer and effect references are positions in the owning model's lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshPart {
    pub base_vertex: usize,
    pub num_vertices: usize,
    pub num_triangles: usize,
    pub start_index: usize,
    pub effect: usize,
    pub vertices: usize,
    pub indices: usize,
}

impl MeshPart {
    /// Vertex-buffer positions of each triangle's corners, in stored order
    /// and offset by the base vertex. Stops early if the index buffer is too
    /// short for `num_triangles`.
    pub fn triangles<'a>(&self, indices: &'a IndexBuffer) -> impl Iterator<Item = [usize; 3]> + 'a {
        let start = self.start_index;
        let base = self.base_vertex;
        (0..self.num_triangles).map_while(move |t| {
            let first = start.checked_add(t.checked_mul(3)?)?;
            let corners = indices.indices.get(first..first.checked_add(3)?)?;
            Some([
                base.checked_add(corners[0] as usize)?,
                base.checked_add(corners[1] as usize)?,
                base.checked_add(corners[2] as usize)?,
            ])
        })
    }

    /// True when every triangle the part declares is present in `indices`
    pub fn fits(&self, indices: &IndexBuffer) -> bool {
        self.num_triangles
            .checked_mul(3)
            .and_then(|count| self.start_index.checked_add(count))
            .is_some_and(|end| end <= indices.indices.len())
    }
}

/// A named piece of geometry attached to one bone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub bone: usize,
    /// In the bone's local space
    pub bounding_sphere: BoundingSphere,
    pub parts: Vec<MeshPart>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, bone: usize) -> Self {
        Self {
            name: name.into(),
            bone,
            ..Default::default()
        }
    }

    pub fn num_triangles(&self) -> usize {
        self.parts.iter().map(|p| p.num_triangles).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_triangles_offset_by_base_vertex() {
        let ib = IndexBuffer {
            indices: vec![9, 9, 9, 0, 1, 2, 2, 3, 0],
        };
        let part = MeshPart {
            base_vertex: 4,
            num_triangles: 2,
            start_index: 3,
            ..Default::default()
        };
        let tris: Vec<_> = part.triangles(&ib).collect();
        assert_eq!(tris, vec![[4, 5, 6], [6, 7, 4]]);
        assert!(part.fits(&ib));
    }

    #[test]
    fn test_short_index_buffer_truncates() {
        let ib = IndexBuffer {
            indices: vec![0, 1, 2, 3],
        };
        let part = MeshPart {
            num_triangles: 2,
            ..Default::default()
        };
        assert_eq!(part.triangles(&ib).count(), 1);
        assert!(!part.fits(&ib));
    }

    #[test]
    fn test_vertex_buffer_accessors() {
        let vb = VertexBuffer {
            positions: vec![Point3::new(1.0, 2.0, 3.0)],
            normals: vec![],
            tex_coords: vec![],
        };
        assert_eq!(vb.len(), 1);
        assert!(!vb.has_tex_coords());
        assert_eq!(vb.normal(0), Vector3::zeros());
        assert!(vb.position(1).is_none());
    }

    #[test]
    fn test_triangle_positions_need_every_corner() {
        let vb = VertexBuffer {
            positions: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            ..Default::default()
        };
        assert_eq!(
            vb.triangle_positions([2, 1, 0]),
            Some([vb.positions[2], vb.positions[1], vb.positions[0]])
        );
        assert!(vb.triangle_positions([0, 1, 3]).is_none());
    }
}
