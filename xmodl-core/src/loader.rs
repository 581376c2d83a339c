/// Builds a [`SceneModel`] from a parsed document tree
///
/// Malformed or missing attributes fall back to defaults; nothing here fails.
use nalgebra::{Point3, Vector2, Vector3};

use crate::bone::Bone;
use crate::document::DocumentNode;
use crate::effect::Effect;
use crate::geometry::{IndexBuffer, Mesh, MeshPart, VertexBuffer};
use crate::model::SceneModel;
use crate::sphere::BoundingSphere;
use crate::vector::Vector;

/// Load every recognised section under `root`, in document order
pub(crate) fn populate<D: DocumentNode>(model: &mut SceneModel, root: &D) {
    for section in root.children() {
        match section.tag() {
            "bones" => load_bones(model, section),
            "effects" => load_effects(model, section),
            "vertexbuffers" => load_vertex_buffers(model, section),
            "indexbuffers" => load_index_buffers(model, section),
            "meshes" => load_meshes(model, section),
            other => log::trace!("Skipping unknown section <{}>", other),
        }
    }
}

/// Negative or missing values become `None`
fn handle<D: DocumentNode>(node: &D, name: &str) -> Option<usize> {
    node.attr_int(name).and_then(|v| usize::try_from(v).ok())
}

fn count<D: DocumentNode>(node: &D, name: &str) -> usize {
    handle(node, name).unwrap_or(0)
}

fn load_bones<D: DocumentNode>(model: &mut SceneModel, section: &D) {
    model.root_bone = handle(section, "root-bone");

    for node in section.children_named("bone") {
        let index = count(node, "index");
        let name = node.attr_str("name").unwrap_or_default();
        let parent = handle(node, "parent");
        let transform = node.attr_transform("transform").unwrap_or_default();
        model.add_bone(Bone::new(index, name, parent, transform));
    }
}

/// RGB with alpha 1 when present, all zero when not
fn color<D: DocumentNode>(node: &D, name: &str) -> [f32; 4] {
    match node.attr_floats::<3>(name) {
        Some([r, g, b]) => [r as f32, g as f32, b as f32, 1.0],
        None => [0.0; 4],
    }
}

fn load_effects<D: DocumentNode>(model: &mut SceneModel, section: &D) {
    for node in section.children_named("effect") {
        let defaults = Effect::default();
        model.add_effect(Effect {
            name: node.attr_str("name").unwrap_or_default(),
            alpha: node.attr_float("alpha").map_or(defaults.alpha, |a| a as f32),
            diffuse: color(node, "diffuse"),
            emissive: color(node, "emissive"),
            specular: color(node, "specular"),
            specular_other: color(node, "specularOther"),
            transmission: color(node, "transmission"),
            shininess: node
                .attr_float("shininess")
                .map_or(defaults.shininess, |s| s as f32),
            eta: node.attr_float("eta").map_or(defaults.eta, |e| e as f32),
            texture_file: node.attr_str("texture").unwrap_or_default(),
            texture: None,
        });
    }
}

fn load_vertex_buffers<D: DocumentNode>(model: &mut SceneModel, section: &D) {
    for vertices in section.children_named("vertices") {
        let mut buffer = VertexBuffer::new();
        for v in vertices.children_named("v") {
            let [x, y, z] = v.attr_floats::<3>("v").unwrap_or_default();
            buffer.positions.push(Point3::new(x as f32, y as f32, z as f32));

            let [x, y, z] = v.attr_floats::<3>("n").unwrap_or_default();
            buffer.normals.push(Vector3::new(x as f32, y as f32, z as f32));

            // Stored top-down in the file
            if let Some([s, t]) = v.attr_floats::<2>("t") {
                buffer.tex_coords.push(Vector2::new(s as f32, 1.0 - t as f32));
            }
        }
        model.add_vertex_buffer(buffer);
    }
}

fn load_index_buffers<D: DocumentNode>(model: &mut SceneModel, section: &D) {
    for node in section.children_named("indices") {
        let indices = node
            .attr_ints("i")
            .unwrap_or_default()
            .into_iter()
            .map_while(|i| u32::try_from(i).ok())
            .collect();
        model.add_index_buffer(IndexBuffer { indices });
    }
}

fn load_meshes<D: DocumentNode>(model: &mut SceneModel, section: &D) {
    for node in section.children_named("mesh") {
        let mut mesh = Mesh::new(node.attr_str("name").unwrap_or_default(), count(node, "bone"));

        if let Some([x, y, z, r]) = node.attr_floats::<4>("bounding-sphere") {
            mesh.bounding_sphere = BoundingSphere::new(Vector::point(x, y, z), r);
        }

        for parts in node.children_named("parts") {
            mesh.parts.extend(parts.children_named("part").map(load_part));
        }

        model.add_mesh(mesh);
    }
}

fn load_part<D: DocumentNode>(node: &D) -> MeshPart {
    MeshPart {
        base_vertex: count(node, "base-vertex"),
        num_vertices: count(node, "num-vertices"),
        num_triangles: count(node, "num-triangles"),
        start_index: count(node, "start-index"),
        effect: count(node, "effect"),
        vertices: count(node, "vertices"),
        indices: count(node, "indices"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;
    use crate::transform::Transform;

    fn load(root: &Element) -> SceneModel {
        let mut model = SceneModel::new();
        populate(&mut model, root);
        model
    }

    #[test]
    fn test_bones_default_parent_to_root() {
        let model = load(
            &Element::new("model").child(
                Element::new("bones")
                    .attr("root-bone", 0)
                    .child(Element::new("bone").attr("index", 0).attr("name", "hips"))
                    .child(
                        Element::new("bone")
                            .attr("index", 1)
                            .attr("name", "spine")
                            .attr("parent", 0)
                            .attr("transform", "1 0 0 0  0 1 0 3  0 0 1 0  0 0 0 1"),
                    )
                    .child(Element::new("bone").attr("name", "loose").attr("parent", -1)),
            ),
        );

        assert_eq!(model.root_bone(), Some(0));
        assert_eq!(model.bone("hips").unwrap().parent, None);
        assert_eq!(*model.bone("hips").unwrap().transform(), Transform::identity());
        assert_eq!(model.bone("spine").unwrap().parent, Some(0));
        assert_eq!(
            model.bone("spine").unwrap().transform().translation(),
            Vector::point(0.0, 3.0, 0.0)
        );
        assert_eq!(model.bone("loose").unwrap().parent, None);
    }

    #[test]
    fn test_root_bone_unknown_without_attribute() {
        let model = load(&Element::new("model").child(Element::new("bones")));
        assert_eq!(model.root_bone(), None);
    }

    #[test]
    fn test_effect_attributes_and_defaults() {
        let model = load(
            &Element::new("model").child(
                Element::new("effects")
                    .child(
                        Element::new("effect")
                            .attr("name", "glass")
                            .attr("alpha", 0.25)
                            .attr("diffuse", "0.1 0.2 0.3")
                            .attr("specularOther", "1 1 1")
                            .attr("shininess", 40)
                            .attr("eta", 1.5)
                            .attr("texture", "glass.bmp"),
                    )
                    .child(Element::new("effect")),
            ),
        );

        let glass = &model.effects()[0];
        assert_eq!(glass.name, "glass");
        assert_eq!(glass.alpha, 0.25);
        assert_eq!(glass.diffuse, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(glass.specular_other, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(glass.emissive, [0.0; 4]);
        assert_eq!(glass.shininess, 40.0);
        assert_eq!(glass.eta, 1.5);
        assert_eq!(glass.texture_file, "glass.bmp");

        let plain = &model.effects()[1];
        assert_eq!(plain.alpha, 1.0);
        assert_eq!(plain.eta, 1.0);
        assert_eq!(plain.diffuse, [0.0; 4]);
        assert!(plain.texture_file.is_empty());
    }

    #[test]
    fn test_vertices_flip_texture_v() {
        let model = load(
            &Element::new("model").child(
                Element::new("vertexbuffers").child(
                    Element::new("vertices")
                        .child(
                            Element::new("v")
                                .attr("v", "1 2 3")
                                .attr("n", "0 0 1")
                                .attr("t", "0.25 0.75"),
                        )
                        .child(Element::new("v").attr("v", "4 5 6").attr("n", "0 1 0").attr("t", "1 0")),
                ),
            ),
        );

        let vb = &model.vertex_buffers()[0];
        assert_eq!(vb.len(), 2);
        assert_eq!(vb.positions[0], Point3::new(1.0, 2.0, 3.0));
        assert_eq!(vb.normals[1], Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(vb.tex_coords, vec![Vector2::new(0.25, 0.25), Vector2::new(1.0, 1.0)]);
    }

    #[test]
    fn test_vertices_without_texture_coordinates() {
        let model = load(
            &Element::new("model").child(
                Element::new("vertexbuffers")
                    .child(Element::new("vertices").child(Element::new("v").attr("v", "1 1 1"))),
            ),
        );
        let vb = &model.vertex_buffers()[0];
        assert!(!vb.has_tex_coords());
        assert_eq!(vb.normal(0), Vector3::zeros());
    }

    #[test]
    fn test_index_list_stops_at_invalid_entry() {
        let model = load(
            &Element::new("model").child(
                Element::new("indexbuffers")
                    .child(Element::new("indices").attr("i", "0 1 2 2 3 0"))
                    .child(Element::new("indices").attr("i", "4 5 -1 6"))
                    .child(Element::new("indices").attr("i", "7 x 8")),
            ),
        );

        let lists: Vec<_> = model.index_buffers().iter().map(|b| b.indices.clone()).collect();
        assert_eq!(lists, vec![vec![0, 1, 2, 2, 3, 0], vec![4, 5], vec![7]]);
    }

    #[test]
    fn test_meshes_and_parts() {
        let model = load(
            &Element::new("model").child(
                Element::new("meshes").child(
                    Element::new("mesh")
                        .attr("name", "wheel")
                        .attr("bone", 2)
                        .attr("bounding-sphere", "0 1 0 2.5")
                        .child(
                            Element::new("parts")
                                .child(
                                    Element::new("part")
                                        .attr("base-vertex", 8)
                                        .attr("num-vertices", 4)
                                        .attr("num-triangles", 2)
                                        .attr("start-index", 6)
                                        .attr("effect", 1)
                                        .attr("vertices", 0)
                                        .attr("indices", 0),
                                )
                                .child(Element::new("part").attr("effect", -3)),
                        ),
                ),
            ),
        );

        let mesh = &model.meshes()[0];
        assert_eq!(mesh.name, "wheel");
        assert_eq!(mesh.bone, 2);
        assert_eq!(mesh.bounding_sphere, BoundingSphere::new(Vector::point(0.0, 1.0, 0.0), 2.5));
        assert_eq!(mesh.parts.len(), 2);
        assert_eq!(
            mesh.parts[0],
            MeshPart {
                base_vertex: 8,
                num_vertices: 4,
                num_triangles: 2,
                start_index: 6,
                effect: 1,
                vertices: 0,
                indices: 0,
            }
        );
        assert_eq!(mesh.parts[1], MeshPart::default());
        assert_eq!(mesh.num_triangles(), 2);
    }

    #[test]
    fn test_mesh_without_sphere_uses_unit_sphere() {
        let model = load(&Element::new("model").child(Element::new("meshes").child(Element::new("mesh"))));
        assert_eq!(model.meshes()[0].bounding_sphere, BoundingSphere::default());
    }
}
