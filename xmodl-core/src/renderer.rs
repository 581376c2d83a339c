/// Renderer back-end contract and the traversal that drives it
use nalgebra::{Point3, Vector2, Vector3};

use crate::effect::Effect;
use crate::geometry::{IndexBuffer, MeshPart, VertexBuffer};
use crate::model::SceneModel;
use crate::transform::Transform;

/// Which winding a back end should treat as front facing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    Clockwise,
    CounterClockwise,
}

/// Front-face state to apply while drawing a model, and to restore after.
///
/// Model files wind triangles one way; the traversal reverses each triangle
/// and the back end should cull with `during` set until the model is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindingOverride {
    pub during: FrontFace,
    pub restore: FrontFace,
}

impl Default for WindingOverride {
    fn default() -> Self {
        Self {
            during: FrontFace::Clockwise,
            restore: FrontFace::CounterClockwise,
        }
    }
}

/// Operations a drawing back end provides to [`SceneModel::draw`]
pub trait Renderer {
    fn push_transform(&mut self);
    fn pop_transform(&mut self);

    /// Compose `t` onto the top of the transform stack
    fn multiply_transform(&mut self, t: &Transform);

    /// Called once per mesh, after its bone transform is applied
    fn begin_mesh(&mut self, _name: &str) {}

    fn set_material(&mut self, effect: &Effect);
    fn end_material(&mut self, effect: &Effect);

    fn begin_triangle_batch(&mut self);
    fn end_triangle_batch(&mut self);

    fn emit_tex_coord(&mut self, uv: &Vector2<f32>);
    fn emit_normal(&mut self, n: &Vector3<f32>);
    fn emit_vertex(&mut self, v: &Point3<f32>);
}

impl SceneModel {
    /// Winding state a back end should use while drawing this model
    pub fn winding_override(&self) -> WindingOverride {
        WindingOverride::default()
    }

    /// Walk every mesh, part and triangle, emitting them through `renderer`.
    ///
    /// Each triangle's corners are emitted last to first. Parts whose
    /// effect or buffer handles are out of range are skipped, as are
    /// triangles with a corner past the end of the vertex buffer.
    pub fn draw<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> WindingOverride {
        self.compute_absolute_transforms();

        renderer.push_transform();
        for mesh in &self.meshes {
            renderer.push_transform();
            renderer.multiply_transform(&self.mesh_transform(mesh));
            renderer.begin_mesh(&mesh.name);

            for part in &mesh.parts {
                let Some((effect, vertices, indices)) = self.part_resources(part) else {
                    log::warn!(
                        "Mesh {}: part references effect {}, vertices {}, indices {} out of range",
                        mesh.name,
                        part.effect,
                        part.vertices,
                        part.indices
                    );
                    continue;
                };

                if !part.fits(indices) {
                    log::warn!(
                        "Mesh {}: index buffer {} holds fewer than {} triangles",
                        mesh.name,
                        part.indices,
                        part.num_triangles
                    );
                }

                renderer.set_material(effect);
                renderer.begin_triangle_batch();
                let mut skipped = 0;
                for [a, b, c] in part.triangles(indices) {
                    let corners = [c, b, a];
                    let Some(positions) = vertices.triangle_positions(corners) else {
                        skipped += 1;
                        continue;
                    };
                    for (index, position) in corners.into_iter().zip(positions) {
                        emit_corner(renderer, vertices, index, &position);
                    }
                }
                renderer.end_triangle_batch();
                renderer.end_material(effect);
                warn_skipped_triangles(&mesh.name, part, skipped);
            }

            renderer.pop_transform();
        }
        renderer.pop_transform();

        self.winding_override()
    }

    pub(crate) fn part_resources(
        &self,
        part: &MeshPart,
    ) -> Option<(&Effect, &VertexBuffer, &IndexBuffer)> {
        Some((
            self.effects.get(part.effect)?,
            self.vertex_buffers.get(part.vertices)?,
            self.index_buffers.get(part.indices)?,
        ))
    }
}

fn emit_corner<R: Renderer + ?Sized>(
    renderer: &mut R,
    vertices: &VertexBuffer,
    index: usize,
    position: &Point3<f32>,
) {
    if let Some(uv) = vertices.tex_coord(index) {
        renderer.emit_tex_coord(&uv);
    }
    renderer.emit_normal(&vertices.normal(index));
    renderer.emit_vertex(position);
}

/// One warning per part for triangles dropped over bad vertex indices
pub(crate) fn warn_skipped_triangles(mesh: &str, part: &MeshPart, skipped: usize) {
    if skipped > 0 {
        log::warn!(
            "Mesh {}: skipped {} triangles indexing past the end of vertex buffer {}",
            mesh,
            skipped,
            part.vertices
        );
    }
}
