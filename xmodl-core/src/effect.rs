/// Materials and the shared texture registry
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};

/// Decoded texture data. Opaque to this crate; only back ends look inside.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Box<[u8]>,
}

/// Turns a texture file path into texture data
pub trait TextureLoader {
    fn load_texture(&mut self, path: &Path) -> Result<Texture>;
}

impl<F> TextureLoader for F
where
    F: FnMut(&Path) -> Result<Texture>,
{
    fn load_texture(&mut self, path: &Path) -> Result<Texture> {
        self(path)
    }
}

/// Loader that never produces a texture; models render untextured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTextures;

impl TextureLoader for NoTextures {
    fn load_texture(&mut self, path: &Path) -> Result<Texture> {
        Err(anyhow!("texture loading disabled ({})", path.display()))
    }
}

/// A material
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub name: String,
    pub alpha: f32,
    pub diffuse: [f32; 4],
    pub emissive: [f32; 4],
    pub specular: [f32; 4],
    pub specular_other: [f32; 4],
    pub transmission: [f32; 4],
    pub shininess: f32,
    pub eta: f32,
    /// Texture file as written in the model, empty for none
    pub texture_file: String,
    pub texture: Option<Arc<Texture>>,
}

impl Default for Effect {
    fn default() -> Self {
        Self {
            name: String::new(),
            alpha: 1.0,
            diffuse: [0.0; 4],
            emissive: [0.0; 4],
            specular: [0.0; 4],
            specular_other: [0.0; 4],
            transmission: [0.0; 4],
            shininess: 0.0,
            eta: 1.0,
            texture_file: String::new(),
            texture: None,
        }
    }
}

impl Effect {
    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }
}

/// Textures keyed by the file name the model uses. Each distinct name is
/// loaded at most once; a failed load is remembered as absent.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    textures: HashMap<String, Option<Arc<Texture>>>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle for `file`, loading it from `dir` on first request
    pub fn resolve(
        &mut self,
        file: &str,
        dir: &Path,
        loader: &mut dyn TextureLoader,
    ) -> Option<Arc<Texture>> {
        if let Some(cached) = self.textures.get(file) {
            log::trace!("Texture cache hit: {}", file);
            return cached.clone();
        }

        let path = dir.join(file);
        let texture = match loader.load_texture(&path) {
            Ok(texture) => Some(Arc::new(texture)),
            Err(err) => {
                log::warn!("Failed to load texture {}: {}", path.display(), err);
                None
            }
        };

        self.textures.insert(file.to_owned(), texture.clone());
        texture
    }

    pub fn get(&self, file: &str) -> Option<Arc<Texture>> {
        self.textures.get(file).cloned().flatten()
    }

    /// Number of distinct texture files requested so far
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }
}
