/// The scene model: bones, materials, buffers and meshes of one loaded file
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::bone::{resolve_absolute_transforms, validate_bone_order, Bone};
use crate::document::DocumentNode;
use crate::effect::{Effect, TextureLoader, TextureRegistry};
use crate::error::LoadError;
use crate::geometry::{IndexBuffer, Mesh, VertexBuffer};
use crate::loader;
use crate::transform::Transform;
use crate::vector::Vector;

/// Bone whose world position, if present, is the suggested camera eye
pub const CAMERA_POSITION_BONE: &str = "Camera.Position";
/// Bone whose world position, if present, is the suggested camera target
pub const CAMERA_TARGET_BONE: &str = "Camera.Target";

/// Loader settings
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Tag the document root must carry
    pub root_tag: String,
    /// Value the root's `version` attribute must have
    pub required_version: String,
    /// Directory texture file names are resolved against
    pub asset_dir: PathBuf,
    /// Reject files whose bones are not in parent-first order
    pub strict_bone_order: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            root_tag: "model".to_owned(),
            required_version: "2.0".to_owned(),
            asset_dir: PathBuf::new(),
            strict_bone_order: false,
        }
    }
}

/// A loaded model. Owns every bone, effect, buffer, mesh and texture handle.
#[derive(Debug, Default)]
pub struct SceneModel {
    pub config: ModelConfig,
    pub(crate) placement: Transform,
    pub(crate) bones: Vec<Bone>,
    pub(crate) bones_by_name: HashMap<String, usize>,
    pub(crate) root_bone: Option<usize>,
    pub(crate) effects: Vec<Effect>,
    pub(crate) vertex_buffers: Vec<VertexBuffer>,
    pub(crate) index_buffers: Vec<IndexBuffer>,
    pub(crate) meshes: Vec<Mesh>,
    pub(crate) textures: TextureRegistry,
    error: Option<String>,
}

impl SceneModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Drop all content. The placement transform and configuration are kept.
    pub fn clear(&mut self) {
        self.root_bone = None;
        self.bones.clear();
        self.bones_by_name.clear();
        self.effects.clear();
        self.vertex_buffers.clear();
        self.index_buffers.clear();
        self.meshes.clear();
        self.textures.clear();
    }

    /// Populate the model from a parsed document.
    ///
    /// The root tag and version are checked before anything is cleared, so a
    /// rejected document leaves the previous content in place. On failure the
    /// message is also kept for [`SceneModel::error`].
    pub fn load_from<D: DocumentNode>(
        &mut self,
        root: &D,
        textures: &mut dyn TextureLoader,
    ) -> Result<(), LoadError> {
        if root.tag() != self.config.root_tag {
            return self.fail(LoadError::MissingRoot {
                expected: self.config.root_tag.clone(),
                found: root.tag().to_owned(),
            });
        }

        let version = root.attr_str("version");
        if version.as_deref() != Some(self.config.required_version.as_str()) {
            return self.fail(LoadError::Version {
                required: self.config.required_version.clone(),
                found: version.unwrap_or_else(|| "none".to_owned()),
            });
        }

        self.clear();
        loader::populate(self, root);

        if let Err((bone, parent)) = validate_bone_order(&self.bones) {
            if self.config.strict_bone_order {
                return self.fail(LoadError::BoneOrder { bone, parent });
            }
            log::warn!(
                "Bone {} references parent {}, which does not precede it",
                bone,
                parent
            );
        }

        self.resolve_textures(textures);

        log::debug!(
            "Loaded model: {} bones, {} effects, {} vertex buffers, {} index buffers, {} meshes, {} textures",
            self.bones.len(),
            self.effects.len(),
            self.vertex_buffers.len(),
            self.index_buffers.len(),
            self.meshes.len(),
            self.textures.len()
        );

        self.error = None;
        Ok(())
    }

    /// Parse `path` with the supplied document parser and load the result.
    /// Textures are then looked up next to the model file.
    pub fn load_file<D, P>(
        &mut self,
        path: impl AsRef<Path>,
        parse: P,
        textures: &mut dyn TextureLoader,
    ) -> Result<(), LoadError>
    where
        D: DocumentNode,
        P: FnOnce(&Path) -> anyhow::Result<D>,
    {
        let path = path.as_ref();
        let document = match parse(path) {
            Ok(document) => document,
            Err(err) => {
                return self.fail(LoadError::Open {
                    path: path.display().to_string(),
                    message: format!("{:#}", err),
                })
            }
        };

        self.config.asset_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        self.load_from(&document, textures)
    }

    fn resolve_textures(&mut self, loader: &mut dyn TextureLoader) {
        let dir = self.config.asset_dir.clone();
        for effect in &mut self.effects {
            if !effect.texture_file.is_empty() {
                effect.texture = self.textures.resolve(&effect.texture_file, &dir, loader);
            }
        }
    }

    fn fail(&mut self, err: LoadError) -> Result<(), LoadError> {
        log::warn!("{}", err);
        self.error = Some(err.to_string());
        Err(err)
    }

    /// Message from the last failed load, cleared by a successful one
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// World placement of the whole model
    pub fn set_placement(&mut self, t: Transform) {
        self.placement = t;
    }

    pub fn placement(&self) -> &Transform {
        &self.placement
    }

    /// Recompute every bone's absolute transform from the placement down
    pub fn compute_absolute_transforms(&mut self) {
        resolve_absolute_transforms(&mut self.bones, &self.placement);
    }

    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.bones_by_name.get(name).map(|&i| &self.bones[i])
    }

    /// Mutable bone access, for setting local (animation) transforms
    pub fn bone_mut(&mut self, name: &str) -> Option<&mut Bone> {
        self.bones_by_name.get(name).map(|&i| &mut self.bones[i])
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Root bone index declared by the file, `None` when unknown
    pub fn root_bone(&self) -> Option<usize> {
        self.root_bone
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn vertex_buffers(&self) -> &[VertexBuffer] {
        &self.vertex_buffers
    }

    pub fn index_buffers(&self) -> &[IndexBuffer] {
        &self.index_buffers
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    /// Append a bone, registering its name. Returns its position.
    pub fn add_bone(&mut self, bone: Bone) -> usize {
        let index = self.bones.len();
        self.bones_by_name.insert(bone.name.clone(), index);
        self.bones.push(bone);
        index
    }

    pub fn add_effect(&mut self, effect: Effect) -> usize {
        self.effects.push(effect);
        self.effects.len() - 1
    }

    pub fn add_vertex_buffer(&mut self, buffer: VertexBuffer) -> usize {
        self.vertex_buffers.push(buffer);
        self.vertex_buffers.len() - 1
    }

    pub fn add_index_buffer(&mut self, buffer: IndexBuffer) -> usize {
        self.index_buffers.push(buffer);
        self.index_buffers.len() - 1
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// Absolute transform of the bone a mesh hangs from. Meshes naming a
    /// bone that does not exist sit at the placement transform.
    pub(crate) fn mesh_transform(&self, mesh: &Mesh) -> Transform {
        self.bones
            .get(mesh.bone)
            .map(|bone| *bone.absolute_transform())
            .unwrap_or(self.placement)
    }

    /// Camera eye declared by the model (`w = 1`), or the zero vector
    pub fn camera_position(&mut self) -> Vector {
        self.named_point(CAMERA_POSITION_BONE)
    }

    /// Camera target declared by the model (`w = 1`), or the zero vector
    pub fn camera_target(&mut self) -> Vector {
        self.named_point(CAMERA_TARGET_BONE)
    }

    fn named_point(&mut self, name: &str) -> Vector {
        let Some(&index) = self.bones_by_name.get(name) else {
            return Vector::ZERO;
        };
        self.compute_absolute_transforms();
        self.bones[index].absolute_transform().translation()
    }
}
