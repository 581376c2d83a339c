/// XMODL Core Library - Transform algebra and skeletal scene models
///
/// This library provides the renderer-agnostic core: 4x4 transforms, bone
/// hierarchies, model loading from a parsed document tree, render traversal
/// through a pluggable back end, and sphere intersection queries.

pub mod attribute;
pub mod bone;
pub mod document;
pub mod effect;
pub mod error;
pub mod geometry;
pub mod intersection;
mod loader;
pub mod model;
pub mod renderer;
pub mod sphere;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use bone::Bone;
pub use document::{DocumentNode, Element};
pub use effect::{Effect, NoTextures, Texture, TextureLoader, TextureRegistry};
pub use error::LoadError;
pub use geometry::{IndexBuffer, Mesh, MeshPart, VertexBuffer};
pub use model::{ModelConfig, SceneModel};
pub use renderer::{FrontFace, Renderer, WindingOverride};
pub use sphere::BoundingSphere;
pub use transform::Transform;
pub use vector::Vector;
