use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Opaque handle to a texture owned by whoever implements [`TextureSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureRef(pub u32);

pub trait TextureSource {
    fn load(&mut self, path: &Path) -> TextureRef;
    fn missing(&self) -> TextureRef;
}

/// Interns texture paths into stable handles. Handle 0 is the missing texture.
///
/// Nothing is decoded here; a rendering backend maps handles back to files
/// through [`TextureRegistry::path_of`].
#[derive(Debug, Clone)]
pub struct TextureRegistry {
    paths: Vec<PathBuf>,
    by_path: HashMap<PathBuf, TextureRef>,
}

pub const MISSING_TEXTURE: TextureRef = TextureRef(0);

impl Default for TextureRegistry {
    fn default() -> Self {
        Self {
            paths: vec![PathBuf::new()],
            by_path: HashMap::new(),
        }
    }
}

impl TextureRegistry {
    pub fn path_of(&self, texture: TextureRef) -> Option<&Path> {
        if texture == MISSING_TEXTURE {
            return None;
        }
        self.paths.get(texture.0 as usize).map(PathBuf::as_path)
    }

    /// Number of distinct textures, the missing texture excluded.
    pub fn len(&self) -> usize {
        self.paths.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TextureSource for TextureRegistry {
    fn load(&mut self, path: &Path) -> TextureRef {
        if let Some(existing) = self.by_path.get(path) {
            return *existing;
        }
        let texture = TextureRef(self.paths.len() as u32);
        self.paths.push(path.to_path_buf());
        self.by_path.insert(path.to_path_buf(), texture);
        texture
    }

    fn missing(&self) -> TextureRef {
        MISSING_TEXTURE
    }
}
