//! # Rendering Device Contract
//!
//! The rasterizer itself lives outside this crate. Everything the engine needs
//! from it is expressed by the [`Device`] trait: vertex declarations, host
//! mapped vertex/index buffers, render state, an indexed draw call and
//! acquisition of the render target.
//!
//! [`headless::HeadlessDevice`] is a complete in-memory implementation used by
//! the demo binary and the test suite.

pub mod headless;

use cgmath::Vector4;

use crate::error::DeviceError;
use crate::gfx::resources::TextureBindings;
use crate::gfx::scene::vertex::VertexLayout;
use crate::gfx::shader::{ShaderConstants, ShaderPair, VertexInput};

/// Device-side description of a vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexDeclaration {
    layout: VertexLayout,
}

impl VertexDeclaration {
    pub fn new(layout: VertexLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    pub fn stride(&self) -> usize {
        self.layout.stride()
    }
}

/// Interleaved vertex storage.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBuffer {
    declaration: VertexDeclaration,
    data: Vec<f32>,
}

impl VertexBuffer {
    pub fn new(declaration: VertexDeclaration, vertex_count: usize) -> Self {
        Self {
            declaration,
            data: vec![0.0; vertex_count * declaration.stride()],
        }
    }

    /// Host-writable view of the whole buffer.
    pub fn map(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn layout(&self) -> VertexLayout {
        self.declaration.layout()
    }

    pub fn vertex_count(&self) -> usize {
        self.data.len() / self.declaration.stride()
    }

    pub fn vertex(&self, index: usize) -> VertexInput {
        let stride = self.declaration.stride();
        self.declaration
            .layout()
            .read(&self.data[index * stride..(index + 1) * stride])
    }
}

/// Triangle-list index storage.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexBuffer {
    data: Vec<u32>,
}

impl IndexBuffer {
    pub fn new(index_count: usize) -> Self {
        Self {
            data: vec![0; index_count],
        }
    }

    pub fn map(&mut self) -> &mut [u32] {
        &mut self.data
    }

    pub fn indices(&self) -> &[u32] {
        &self.data
    }

    pub fn index_count(&self) -> usize {
        self.data.len()
    }
}

/// Tessellation applied by the rasterizer before shading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubdivisionMode {
    #[default]
    None,
    /// Subdivide every triangle `level` times.
    Uniform,
    /// Subdivide by projected edge length, capped at `level`.
    Adaptive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureFilter {
    Nearest,
    #[default]
    Bilinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    #[default]
    Wrap,
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplerState {
    pub filter: TextureFilter,
    pub address: AddressMode,
}

/// Pixel rectangle outside of which nothing is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Fixed-function state applied to subsequent draw calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderState {
    pub subdivision: SubdivisionMode,
    pub subdivision_level: u8,
    pub scissor: Option<ScissorRect>,
    pub sampler: SamplerState,
}

/// Everything needed for one indexed draw.
pub struct DrawCall<'a> {
    pub vertices: &'a VertexBuffer,
    pub indices: &'a IndexBuffer,
    pub shaders: &'a ShaderPair,
    pub constants: &'a ShaderConstants,
    pub textures: TextureBindings<'a>,
}

/// Services the engine requires from a rasterizer.
pub trait Device {
    fn create_vertex_declaration(
        &mut self,
        layout: VertexLayout,
    ) -> Result<VertexDeclaration, DeviceError>;

    fn create_vertex_buffer(
        &mut self,
        declaration: &VertexDeclaration,
        vertex_count: usize,
    ) -> Result<VertexBuffer, DeviceError>;

    fn create_index_buffer(&mut self, index_count: usize) -> Result<IndexBuffer, DeviceError>;

    fn set_render_state(&mut self, state: RenderState);

    fn draw_indexed(&mut self, call: &DrawCall<'_>) -> Result<(), DeviceError>;

    /// Acquires the render target for a new frame.
    fn acquire_target(&mut self) -> Result<(), DeviceError>;

    fn clear(&mut self, color: Vector4<f32>, depth: f32) -> Result<(), DeviceError>;

    /// Releases the render target, flipping it to the visible surface when
    /// `present` is set.
    fn release_target(&mut self, present: bool) -> Result<(), DeviceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_buffer_sizes_from_layout() {
        let decl = VertexDeclaration::new(VertexLayout::POSITION_TEX);
        let mut buffer = VertexBuffer::new(decl, 4);
        assert_eq!(buffer.map().len(), 20);
        assert_eq!(buffer.vertex_count(), 4);
    }

    #[test]
    fn test_vertex_reads_mapped_data() {
        let decl = VertexDeclaration::new(VertexLayout::POSITION);
        let mut buffer = VertexBuffer::new(decl, 2);
        buffer.map().copy_from_slice(&[0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(buffer.vertex(1).position, cgmath::Vector3::new(1.0, 2.0, 3.0));
    }
}
