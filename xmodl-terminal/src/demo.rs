/// Built-in demo model: a turntable with a spinning block on top
use xmodl_core::{Element, Transform};

/// Name of the bone the demo animates
pub const SPINNER_BONE: &str = "Spinner";

/// (normal, u, v) per cube face, with u x v = normal
const FACES: [([f64; 3], [f64; 3], [f64; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

fn triple(v: [f64; 3]) -> String {
    format!("{} {} {}", v[0], v[1], v[2])
}

/// Sixteen numbers, row-major
fn matrix(t: &Transform) -> String {
    let mut values = Vec::with_capacity(16);
    for row in 0..4 {
        for col in 0..4 {
            values.push(t.get(row, col).to_string());
        }
    }
    values.join(" ")
}

fn bone(index: usize, name: &str, parent: i64, transform: &Transform) -> Element {
    Element::new("bone")
        .attr("index", index)
        .attr("name", name)
        .attr("parent", parent)
        .attr("transform", matrix(transform))
}

/// Unit cube with per-face normals, counter-clockwise from outside
fn cube() -> (Element, Element) {
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
    let tex = ["0 1", "1 1", "1 0", "0 0"];

    let mut vertices = Element::new("vertices");
    let mut indices = Vec::with_capacity(36);
    for (face, (n, u, v)) in FACES.iter().enumerate() {
        for (corner, &(su, sv)) in corners.iter().enumerate() {
            let p = [0, 1, 2].map(|k| 0.5 * (n[k] + su * u[k] + sv * v[k]));
            vertices.push(
                Element::new("v")
                    .attr("v", triple(p))
                    .attr("n", triple(*n))
                    .attr("t", tex[corner]),
            );
        }
        let base = face * 4;
        indices.extend([base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    let indices = indices
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    (vertices, Element::new("indices").attr("i", indices))
}

fn effect(name: &str, diffuse: &str) -> Element {
    Element::new("effect")
        .attr("name", name)
        .attr("diffuse", diffuse)
        .attr("shininess", 20)
}

fn mesh(name: &str, bone: usize, effect: usize) -> Element {
    Element::new("mesh")
        .attr("name", name)
        .attr("bone", bone)
        .attr("bounding-sphere", "0 0 0 0.8660254")
        .child(
            Element::new("parts").child(
                Element::new("part")
                    .attr("base-vertex", 0)
                    .attr("num-vertices", 24)
                    .attr("num-triangles", 12)
                    .attr("start-index", 0)
                    .attr("effect", effect)
                    .attr("vertices", 0)
                    .attr("indices", 0),
            ),
        )
}

/// The demo model as a parsed document
pub fn scene() -> Element {
    let base = Transform::translate(0.0, -0.75, 0.0) * Transform::scale_xyz(2.0, 0.5, 2.0);
    // Relative to the unscaled base frame
    let spinner = Transform::scale_xyz(0.5, 2.0, 0.5) * Transform::translate(0.0, 0.75, 0.0);

    let (vertices, indices) = cube();

    Element::new("model")
        .attr("version", "2.0")
        .child(
            Element::new("bones")
                .attr("root-bone", 0)
                .child(bone(0, "Base", -1, &base))
                .child(bone(1, SPINNER_BONE, 0, &spinner))
                .child(bone(2, "Camera.Position", -1, &Transform::translate(0.0, 2.0, 6.0)))
                .child(bone(3, "Camera.Target", -1, &Transform::identity())),
        )
        .child(
            Element::new("effects")
                .child(effect("stone", "0.55 0.55 0.6"))
                .child(effect("brass", "0.95 0.8 0.35")),
        )
        .child(Element::new("vertexbuffers").child(vertices))
        .child(Element::new("indexbuffers").child(indices))
        .child(
            Element::new("meshes")
                .child(mesh("turntable", 0, 0))
                .child(mesh("block", 1, 1)),
        )
}
