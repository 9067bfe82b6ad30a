//! # Vertex Data Structures
//!
//! Vertex formats used by the engine's meshes. Every format is a `#[repr(C)]`
//! plain-old-data struct made of `f32` fields, so a slice of vertices can be
//! copied into a mapped device buffer with [`bytemuck::cast_slice`].
//!
//! A vertex always carries a position; texture coordinates and normals are
//! optional and described by a [`VertexLayout`]. The layout is declared once
//! per entity and must match what its vertex shader consumes.

use cgmath::{Vector2, Vector3};

use crate::gfx::shader::VertexInput;

/// Which optional attributes follow the position in a vertex.
///
/// Attributes are interleaved in the order position, texture coordinate,
/// normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    pub tex_coord: bool,
    pub normal: bool,
}

impl VertexLayout {
    pub const POSITION: Self = Self {
        tex_coord: false,
        normal: false,
    };
    pub const POSITION_TEX: Self = Self {
        tex_coord: true,
        normal: false,
    };
    pub const POSITION_TEX_NORMAL: Self = Self {
        tex_coord: true,
        normal: true,
    };

    /// Number of floats per vertex.
    pub fn stride(&self) -> usize {
        3 + if self.tex_coord { 2 } else { 0 } + if self.normal { 3 } else { 0 }
    }

    /// Decodes one interleaved vertex. `data` must hold at least `stride()` floats.
    pub fn read(&self, data: &[f32]) -> VertexInput {
        let position = Vector3::new(data[0], data[1], data[2]);
        let mut offset = 3;

        let mut tex_coord = Vector2::new(0.0, 0.0);
        if self.tex_coord {
            tex_coord = Vector2::new(data[offset], data[offset + 1]);
            offset += 2;
        }

        let mut normal = Vector3::new(0.0, 0.0, 0.0);
        if self.normal {
            normal = Vector3::new(data[offset], data[offset + 1], data[offset + 2]);
        }

        VertexInput {
            position,
            tex_coord,
            normal,
        }
    }
}

/// A vertex type with a fixed, declared layout.
pub trait VertexFormat: bytemuck::Pod {
    const LAYOUT: VertexLayout;
}

/// Position-only vertex. Used by the environment-mapped sphere, whose normal
/// is reconstructed from the position.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PositionVertex {
    pub position: [f32; 3],
}

impl VertexFormat for PositionVertex {
    const LAYOUT: VertexLayout = VertexLayout::POSITION;
}

/// Position and texture coordinate.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl VertexFormat for TexturedVertex {
    const LAYOUT: VertexLayout = VertexLayout::POSITION_TEX;
}

/// Position, texture coordinate and normal, for lit textured surfaces.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
    pub normal: [f32; 3],
}

impl VertexFormat for SurfaceVertex {
    const LAYOUT: VertexLayout = VertexLayout::POSITION_TEX_NORMAL;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_matches_struct_size() {
        let float = std::mem::size_of::<f32>();
        assert_eq!(
            PositionVertex::LAYOUT.stride() * float,
            std::mem::size_of::<PositionVertex>()
        );
        assert_eq!(
            TexturedVertex::LAYOUT.stride() * float,
            std::mem::size_of::<TexturedVertex>()
        );
        assert_eq!(
            SurfaceVertex::LAYOUT.stride() * float,
            std::mem::size_of::<SurfaceVertex>()
        );
    }

    #[test]
    fn test_read_interleaved_surface_vertex() {
        let v = SurfaceVertex {
            position: [1.0, 2.0, 3.0],
            tex_coord: [0.25, 0.75],
            normal: [0.0, 0.0, -1.0],
        };
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&v));
        let input = SurfaceVertex::LAYOUT.read(floats);
        assert_eq!(input.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(input.tex_coord, Vector2::new(0.25, 0.75));
        assert_eq!(input.normal, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_missing_attributes_read_as_zero() {
        let input = VertexLayout::POSITION.read(&[4.0, 5.0, 6.0]);
        assert_eq!(input.tex_coord, Vector2::new(0.0, 0.0));
        assert_eq!(input.normal, Vector3::new(0.0, 0.0, 0.0));
    }
}
