//! Texture resources and shader texture bindings.

pub mod manager;
pub mod texture;

pub use manager::{ResourceManager, Texture, TextureHandle};
pub use texture::{CubeFace, CubeTexture, Texture2D};

use cgmath::{Vector2, Vector3, Vector4};

use crate::gfx::device::SamplerState;

/// Number of texture slots a draw call can bind.
pub const MAX_TEXTURE_SLOTS: usize = 4;

/// Textures bound for one draw call, read-only for its duration.
///
/// The device stamps its current [`SamplerState`] onto the bindings before
/// running the pixel shader, so `sample_flat` and `sample_cube` follow it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureBindings<'a> {
    slots: [Option<&'a Texture>; MAX_TEXTURE_SLOTS],
    sampler: SamplerState,
}

impl<'a> TextureBindings<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, slot: usize, handle: &'a TextureHandle) {
        self.slots[slot] = Some(handle.texture());
    }

    pub fn get(&self, slot: usize) -> Option<&'a Texture> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn cube(&self, slot: usize) -> Option<&'a CubeTexture> {
        match self.get(slot) {
            Some(Texture::Cube(cube)) => Some(cube),
            _ => None,
        }
    }

    pub fn flat(&self, slot: usize) -> Option<&'a Texture2D> {
        match self.get(slot) {
            Some(Texture::Flat(flat)) => Some(flat),
            _ => None,
        }
    }

    pub fn bound_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn with_sampler(mut self, sampler: SamplerState) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn sampler(&self) -> SamplerState {
        self.sampler
    }

    /// Samples the 2D texture in `slot`, if one is bound there.
    pub fn sample_flat(&self, slot: usize, uv: Vector2<f32>) -> Option<Vector4<f32>> {
        self.flat(slot).map(|tex| tex.sample_with(uv, self.sampler))
    }

    /// Samples the cube map in `slot` along `dir`. Cube maps ignore the
    /// address mode.
    pub fn sample_cube(&self, slot: usize, dir: Vector3<f32>) -> Option<Vector4<f32>> {
        self.cube(slot).map(|cube| cube.sample_with(dir, self.sampler.filter))
    }
}
