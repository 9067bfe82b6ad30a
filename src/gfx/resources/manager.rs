//! Named, reference-counted texture resources.
//!
//! Sources are registered by name and decoded on first load. Every load of a
//! name that is still alive returns the same decoded texture; the texture is
//! freed when its last [`TextureHandle`] is dropped.

use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::ResourceError;

use super::texture::{CubeTexture, Texture2D};

/// A decoded texture of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Texture {
    Flat(Texture2D),
    Cube(CubeTexture),
}

impl Texture {
    pub fn kind(&self) -> &'static str {
        match self {
            Texture::Flat(_) => "2D texture",
            Texture::Cube(_) => "cube texture",
        }
    }
}

/// Shared ownership of a loaded texture. Dropping the handle releases it.
#[derive(Clone)]
pub struct TextureHandle {
    name: Rc<str>,
    texture: Rc<Texture>,
}

impl TextureHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn as_cube(&self) -> Result<&CubeTexture, ResourceError> {
        match self.texture.as_ref() {
            Texture::Cube(cube) => Ok(cube),
            other => Err(self.wrong_type("cube texture", other)),
        }
    }

    pub fn as_flat(&self) -> Result<&Texture2D, ResourceError> {
        match self.texture.as_ref() {
            Texture::Flat(flat) => Ok(flat),
            other => Err(self.wrong_type("2D texture", other)),
        }
    }

    fn wrong_type(&self, expected: &'static str, found: &Texture) -> ResourceError {
        ResourceError::WrongType {
            name: self.name.to_string(),
            expected,
            found: found.kind(),
        }
    }
}

impl fmt::Debug for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureHandle")
            .field("name", &self.name)
            .field("kind", &self.texture.kind())
            .finish()
    }
}

type Decoder = Box<dyn Fn() -> Result<Texture, ResourceError>>;

/// Texture registry with load-on-demand and shared handles.
#[derive(Default)]
pub struct ResourceManager {
    sources: HashMap<String, Decoder>,
    loaded: HashMap<String, Weak<Texture>>,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a decoder for `name`, replacing any previous one.
    pub fn register(
        &mut self,
        name: &str,
        decoder: impl Fn() -> Result<Texture, ResourceError> + 'static,
    ) {
        self.sources.insert(name.to_string(), Box::new(decoder));
    }

    /// Registers an already decoded texture under `name`.
    pub fn insert(&mut self, name: &str, texture: Texture) {
        self.register(name, move || Ok(texture.clone()));
    }

    /// Loads `name`, reusing the live texture if one exists.
    pub fn load(&mut self, name: &str) -> Result<TextureHandle, ResourceError> {
        if let Some(texture) = self.loaded.get(name).and_then(Weak::upgrade) {
            return Ok(TextureHandle {
                name: Rc::from(name),
                texture,
            });
        }

        let decoder = self
            .sources
            .get(name)
            .ok_or_else(|| ResourceError::NotFound(name.to_string()))?;
        let texture = Rc::new(decoder()?);
        self.loaded.insert(name.to_string(), Rc::downgrade(&texture));
        log::debug!("Loaded {} `{}`", texture.kind(), name);

        Ok(TextureHandle {
            name: Rc::from(name),
            texture,
        })
    }

    /// Loads `name` and checks that it is a cube map.
    pub fn load_cube(&mut self, name: &str) -> Result<TextureHandle, ResourceError> {
        let handle = self.load(name)?;
        handle.as_cube()?;
        Ok(handle)
    }

    /// Loads `name` and checks that it is a 2D texture.
    pub fn load_flat(&mut self, name: &str) -> Result<TextureHandle, ResourceError> {
        let handle = self.load(name)?;
        handle.as_flat()?;
        Ok(handle)
    }

    /// Gives up one reference to a texture.
    pub fn release(&mut self, handle: TextureHandle) {
        let name = handle.name.to_string();
        drop(handle);
        if self.live_count(&name) == 0 {
            self.loaded.remove(&name);
            log::debug!("Released `{}`", name);
        }
    }

    /// Number of live handles sharing `name`.
    pub fn live_count(&self, name: &str) -> usize {
        self.loaded.get(name).map_or(0, Weak::strong_count)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ResourceManager {
        let mut resources = ResourceManager::new();
        resources.insert("sky", Texture::Cube(CubeTexture::solid([0.2, 0.4, 0.8, 1.0])));
        resources.insert("brick", Texture::Flat(Texture2D::solid([0.6, 0.3, 0.2, 1.0])));
        resources.register("broken", || {
            Err(ResourceError::Decode {
                name: "broken".into(),
                reason: "truncated data".into(),
            })
        });
        resources
    }

    #[test]
    fn test_load_shares_texture() {
        let mut resources = manager();
        let a = resources.load("sky").unwrap();
        let b = resources.load("sky").unwrap();
        assert!(Rc::ptr_eq(&a.texture, &b.texture));
        assert_eq!(resources.live_count("sky"), 2);

        resources.release(a);
        assert_eq!(resources.live_count("sky"), 1);
        resources.release(b);
        assert_eq!(resources.live_count("sky"), 0);
    }

    #[test]
    fn test_drop_releases_handle() {
        let mut resources = manager();
        {
            let _handle = resources.load("brick").unwrap();
            assert_eq!(resources.live_count("brick"), 1);
        }
        assert_eq!(resources.live_count("brick"), 0);
    }

    #[test]
    fn test_wrong_type_is_reported() {
        let mut resources = manager();
        let err = resources.load_cube("brick").unwrap_err();
        assert!(matches!(
            err,
            ResourceError::WrongType {
                expected: "cube texture",
                found: "2D texture",
                ..
            }
        ));
        assert_eq!(resources.live_count("brick"), 0);
    }

    #[test]
    fn test_missing_and_broken_sources() {
        let mut resources = manager();
        assert_eq!(
            resources.load("nope").unwrap_err(),
            ResourceError::NotFound("nope".into())
        );
        assert!(matches!(
            resources.load("broken"),
            Err(ResourceError::Decode { .. })
        ));
    }
}
