//! Texture assets: content-addressed store, procedural sand, sprite sheets.
//!
//! Textures are identified by a hash of their pixels. The renderer uploads
//! and looks them up by [`TextureId`], never by file path.

mod sand;
mod sprite;

pub use sand::{SandParams, generate_sand};
pub use sprite::{load_or_placeholder, load_sprite_sheet, placeholder_sprite_sheet};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// Content-addressed texture ID computed from the texture data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u64);

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wrap {
    Clamp,
    Repeat,
}

/// Magnification/minification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    /// Pixel art stays crisp.
    Nearest,
    Linear,
}

/// CPU-side RGBA8 texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows, top row first.
    #[serde(skip)]
    pub rgba: Vec<u8>,
    pub wrap: Wrap,
    pub filter: Filter,
}

impl Texture {
    /// Texture filled with one colour.
    pub fn solid(name: impl Into<String>, width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        Self {
            name: name.into(),
            width,
            height,
            rgba: rgba.repeat(pixels),
            wrap: Wrap::Clamp,
            filter: Filter::Linear,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]])
    }

    /// Write the texture as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let image = image::RgbaImage::from_raw(self.width, self.height, self.rgba.clone())
            .ok_or_else(|| AssetError::BadDimensions {
                name: self.name.clone(),
                width: self.width,
                height: self.height,
                len: self.rgba.len(),
            })?;
        image.save(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), "texture written");
        Ok(())
    }

    fn content_hash(&self) -> TextureId {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(&self.rgba);
        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        TextureId(u64::from_le_bytes(bytes))
    }
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("texture {name} is {width}x{height} but holds {len} bytes")]
    BadDimensions {
        name: String,
        width: u32,
        height: u32,
        len: usize,
    },
    #[error("sprite sheet {width}x{height} does not divide into a {columns}x{rows} grid")]
    UnevenGrid {
        width: u32,
        height: u32,
        columns: u32,
        rows: u32,
    },
    #[error("texture not found: {0:?}")]
    NotFound(TextureId),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Content-addressed texture registry.
///
/// Registering identical pixel data twice yields the same ID and stores the
/// texture once.
#[derive(Debug, Clone, Default)]
pub struct TextureStore {
    textures: BTreeMap<TextureId, Texture>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture and return its ID.
    pub fn register(&mut self, texture: Texture) -> Result<TextureId, AssetError> {
        let expected = (texture.width as usize) * (texture.height as usize) * 4;
        if texture.width == 0 || texture.height == 0 || texture.rgba.len() != expected {
            return Err(AssetError::BadDimensions {
                name: texture.name,
                width: texture.width,
                height: texture.height,
                len: texture.rgba.len(),
            });
        }
        let id = texture.content_hash();
        tracing::debug!(name = %texture.name, ?id, "texture registered");
        self.textures.entry(id).or_insert(texture);
        Ok(id)
    }

    pub fn get(&self, id: TextureId) -> Result<&Texture, AssetError> {
        self.textures.get(&id).ok_or(AssetError::NotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &Texture)> {
        self.textures.iter().map(|(id, t)| (*id, t))
    }

    /// Number of registered textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Write texture metadata (names, sizes, sampling) as JSON for inspection.
    pub fn write_manifest(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let entries: BTreeMap<String, &Texture> = self
            .textures
            .iter()
            .map(|(id, t)| (format!("{:016x}", id.0), t))
            .collect();
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &entries)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_texture() {
        let mut store = TextureStore::new();
        let id = store.register(Texture::solid("red", 2, 2, [255, 0, 0, 255])).unwrap();
        assert_eq!(store.get(id).unwrap().name, "red");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn content_addressed_dedup() {
        let mut store = TextureStore::new();
        let a = store.register(Texture::solid("a", 4, 4, [1, 2, 3, 4])).unwrap();
        let b = store.register(Texture::solid("b", 4, 4, [1, 2, 3, 4])).unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rejects_mismatched_buffer() {
        let mut store = TextureStore::new();
        let mut t = Texture::solid("broken", 4, 4, [0; 4]);
        t.rgba.pop();
        assert!(matches!(store.register(t), Err(AssetError::BadDimensions { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn missing_texture_is_error() {
        let store = TextureStore::new();
        assert!(matches!(store.get(TextureId(7)), Err(AssetError::NotFound(_))));
    }

    #[test]
    fn pixel_lookup() {
        let t = Texture::solid("px", 3, 2, [9, 8, 7, 6]);
        assert_eq!(t.pixel(2, 1), Some([9, 8, 7, 6]));
        assert_eq!(t.pixel(3, 0), None);
    }

    #[test]
    fn png_round_trip_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solid.png");
        let t = Texture::solid("solid", 8, 4, [10, 20, 30, 255]);
        t.save_png(&path).unwrap();
        let loaded = load_sprite_sheet(&path, 1, 1).unwrap();
        assert_eq!((loaded.width, loaded.height), (8, 4));
        assert_eq!(loaded.pixel(0, 0), Some([10, 20, 30, 255]));

        let mut store = TextureStore::new();
        store.register(t).unwrap();
        let manifest = dir.path().join("textures.json");
        store.write_manifest(&manifest).unwrap();
        let text = std::fs::read_to_string(manifest).unwrap();
        assert!(text.contains("\"solid\""));
    }
}
