//! # Procedural Geometry Generation
//!
//! Functions that build vertex and index data for parametric shapes, so the
//! demo scenes need no model files.
//!
//! ## Supported Primitives
//!
//! - **Sphere**: tessellated into `stacks x slices` quads with unshared corners
//! - **Triangle**: a single textured, lit triangle
//! - **Quad**: a textured rectangle
//!
//! ## Usage
//!
//! ```rust
//! use tessera::gfx::geometry::{generate_quad, generate_sphere};
//!
//! let sphere = generate_sphere(1.0, 16, 16).unwrap();
//! assert_eq!(sphere.vertex_count(), 16 * 16 * 4);
//!
//! let quad = generate_quad(2.0, 2.0);
//! assert_eq!(quad.triangle_count(), 2);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::VertexFormat;

/// Generated geometry ready for upload to a device.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData<V: VertexFormat> {
    pub vertices: Vec<V>,
    /// Triangle list, three indices per triangle, consistent winding.
    pub indices: Vec<u32>,
}

impl<V: VertexFormat> GeometryData<V> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaved float view of the vertices.
    pub fn vertex_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// True when the index list forms whole triangles that only reference
    /// existing vertices.
    pub fn is_valid(&self) -> bool {
        let count = self.vertices.len() as u64;
        self.indices.len() % 3 == 0 && self.indices.iter().all(|&i| (i as u64) < count)
    }
}

impl<V: VertexFormat> Default for GeometryData<V> {
    fn default() -> Self {
        Self::new()
    }
}
