/// Sphere against model intersection
use crate::model::SceneModel;
use crate::renderer::warn_skipped_triangles;
use crate::sphere::BoundingSphere;
use crate::vector::Vector;

impl SceneModel {
    /// True if any vertex referenced by the model's triangles lies strictly
    /// inside `sphere` (world space).
    ///
    /// Meshes whose bounding sphere misses `sphere` are rejected without
    /// looking at their vertices. Triangles with a corner past the end of
    /// the vertex buffer are skipped whole.
    pub fn intersects(&mut self, sphere: &BoundingSphere) -> bool {
        self.compute_absolute_transforms();

        for mesh in &self.meshes {
            let world = self.mesh_transform(mesh);
            if !mesh.bounding_sphere.transformed(&world).intersects_sphere(sphere) {
                continue;
            }

            for part in &mesh.parts {
                let Some((_, vertices, indices)) = self.part_resources(part) else {
                    log::warn!("Mesh {}: part skipped in intersection test", mesh.name);
                    continue;
                };

                let mut skipped = 0;
                let mut hit = false;
                for triangle in part.triangles(indices) {
                    let Some(corners) = vertices.triangle_positions(triangle) else {
                        skipped += 1;
                        continue;
                    };
                    if corners
                        .iter()
                        .any(|p| sphere.contains_point(&world.transform_point(&Vector::from(*p))))
                    {
                        hit = true;
                        break;
                    }
                }
                warn_skipped_triangles(&mesh.name, part, skipped);
                if hit {
                    return true;
                }
            }
        }
        false
    }
}
