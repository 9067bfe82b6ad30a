//! # Shader Pairs
//!
//! CPU-side shader programs executed by the rendering device. A vertex shader
//! runs once per vertex and produces a clip-space position plus a fixed set of
//! typed interpolants; a pixel shader runs once per covered pixel on the
//! interpolated values and writes a color.
//!
//! The interpolant types a vertex shader declares must match, slot for slot,
//! the types its pixel shader reads. [`ShaderPair::new`] enforces this once,
//! when the pair is bound to an entity, so a mismatched pair never reaches the
//! device.
//!
//! ## Provided programs
//!
//! - [`env_map`] - per-pixel Phong lighting blended with a cube-map reflection
//! - [`bump`] - tangent-space normal mapping and parallax mapping
//! - [`fractal`] - Mandelbrot escape-time coloring

pub mod bump;
pub mod env_map;
pub mod fractal;

use cgmath::{Matrix4, SquareMatrix, Vector2, Vector3, Vector4, Zero};

use crate::error::ShaderError;
use crate::gfx::resources::TextureBindings;
use crate::gfx::scene::vertex::VertexLayout;

/// Number of interpolant registers between the two stages.
pub const MAX_INTERPOLANTS: usize = 8;

/// Number of vector constant slots per stage.
pub const MAX_VECTOR_CONSTANTS: usize = 8;

/// Width of an interpolant register.
///
/// The rasterizer interpolates only the declared number of components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterType {
    Vec2,
    Vec3,
    Vec4,
}

impl RegisterType {
    pub fn components(self) -> usize {
        match self {
            RegisterType::Vec2 => 2,
            RegisterType::Vec3 => 3,
            RegisterType::Vec4 => 4,
        }
    }
}

/// Matrix constants shared by every vertex shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixConstants {
    pub world: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    /// `projection * view * world`, precomposed once per draw.
    pub world_view_projection: Matrix4<f32>,
}

impl Default for MatrixConstants {
    fn default() -> Self {
        Self {
            world: Matrix4::identity(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            world_view_projection: Matrix4::identity(),
        }
    }
}

/// Named constants pushed by an entity before its draw call.
///
/// Vector slots are per stage. By convention the vertex stage reads the camera
/// position from slot [`ShaderConstants::CAMERA_POSITION`] and the light
/// position from [`ShaderConstants::LIGHT_POSITION`]; the pixel stage reads
/// the base color from [`ShaderConstants::BASE_COLOR`] and the light color
/// from [`ShaderConstants::LIGHT_COLOR`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderConstants {
    pub matrices: MatrixConstants,
    vertex: [Vector4<f32>; MAX_VECTOR_CONSTANTS],
    pixel: [Vector4<f32>; MAX_VECTOR_CONSTANTS],
}

impl ShaderConstants {
    pub const CAMERA_POSITION: usize = 0;
    pub const LIGHT_POSITION: usize = 1;
    pub const BASE_COLOR: usize = 0;
    pub const LIGHT_COLOR: usize = 1;

    pub fn new() -> Self {
        Self {
            matrices: MatrixConstants::default(),
            vertex: [Vector4::zero(); MAX_VECTOR_CONSTANTS],
            pixel: [Vector4::zero(); MAX_VECTOR_CONSTANTS],
        }
    }

    /// Sets world, view and projection and precomposes their product.
    pub fn set_matrices(
        &mut self,
        world: Matrix4<f32>,
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
    ) {
        self.matrices = MatrixConstants {
            world,
            view,
            projection,
            world_view_projection: projection * view * world,
        };
    }

    pub fn set_vertex_vector(&mut self, slot: usize, value: Vector4<f32>) {
        self.vertex[slot] = value;
    }

    pub fn set_pixel_vector(&mut self, slot: usize, value: Vector4<f32>) {
        self.pixel[slot] = value;
    }

    pub fn vertex_vector(&self, slot: usize) -> Vector4<f32> {
        self.vertex[slot]
    }

    pub fn pixel_vector(&self, slot: usize) -> Vector4<f32> {
        self.pixel[slot]
    }
}

impl Default for ShaderConstants {
    fn default() -> Self {
        Self::new()
    }
}

/// One vertex as seen by a vertex shader.
///
/// Attributes absent from the mesh layout read as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexInput {
    pub position: Vector3<f32>,
    pub tex_coord: Vector2<f32>,
    pub normal: Vector3<f32>,
}

/// Interpolant register file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Registers([Vector4<f32>; MAX_INTERPOLANTS]);

impl Registers {
    pub fn new() -> Self {
        Self([Vector4::zero(); MAX_INTERPOLANTS])
    }

    pub fn set_vec2(&mut self, slot: usize, v: Vector2<f32>) {
        self.0[slot] = Vector4::new(v.x, v.y, 0.0, 0.0);
    }

    pub fn set_vec3(&mut self, slot: usize, v: Vector3<f32>) {
        self.0[slot] = v.extend(0.0);
    }

    pub fn set_vec4(&mut self, slot: usize, v: Vector4<f32>) {
        self.0[slot] = v;
    }

    pub fn vec2(&self, slot: usize) -> Vector2<f32> {
        let r = self.0[slot];
        Vector2::new(r.x, r.y)
    }

    pub fn vec3(&self, slot: usize) -> Vector3<f32> {
        self.0[slot].truncate()
    }

    pub fn vec4(&self, slot: usize) -> Vector4<f32> {
        self.0[slot]
    }

    pub fn raw(&self, slot: usize) -> Vector4<f32> {
        self.0[slot]
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one vertex shader invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOutput {
    /// Homogeneous clip-space position.
    pub position: Vector4<f32>,
    pub interpolants: Registers,
}

impl VertexOutput {
    pub fn new(position: Vector4<f32>) -> Self {
        Self {
            position,
            interpolants: Registers::new(),
        }
    }
}

/// Interpolated values delivered to a pixel shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelInput {
    pub interpolants: Registers,
    /// Interpolated depth (`z / w`).
    pub depth: f32,
}

/// Color accumulator and optional depth override written by a pixel shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelOutput {
    pub color: Vector4<f32>,
    pub depth: Option<f32>,
}

impl Default for PixelOutput {
    fn default() -> Self {
        Self {
            color: Vector4::zero(),
            depth: None,
        }
    }
}

/// Per-vertex program.
pub trait VertexShader {
    /// Vertex attributes this shader consumes.
    fn input_layout(&self) -> VertexLayout;

    /// Types of the interpolants this shader writes, by slot.
    fn outputs(&self) -> &[RegisterType];

    fn execute(&self, input: &VertexInput, constants: &ShaderConstants) -> VertexOutput;
}

/// Per-pixel program.
pub trait PixelShader {
    /// Types of the interpolants this shader reads, by slot.
    fn inputs(&self) -> &[RegisterType];

    /// Writes into `out` and returns `false` to discard the pixel.
    fn execute(
        &self,
        input: &PixelInput,
        constants: &ShaderConstants,
        textures: &TextureBindings<'_>,
        out: &mut PixelOutput,
    ) -> bool;
}

/// A vertex shader and pixel shader whose interpolants agree.
pub struct ShaderPair {
    vertex: Box<dyn VertexShader>,
    pixel: Box<dyn PixelShader>,
}

impl ShaderPair {
    /// Binds two shaders together, rejecting any interpolant type mismatch.
    pub fn new(
        vertex: Box<dyn VertexShader>,
        pixel: Box<dyn PixelShader>,
    ) -> Result<Self, ShaderError> {
        let produced = vertex.outputs();
        for (slot, &expected) in pixel.inputs().iter().enumerate() {
            let actual = produced.get(slot).copied();
            if actual != Some(expected) {
                return Err(ShaderError::InterpolantMismatch {
                    slot,
                    produced: actual,
                    expected,
                });
            }
        }

        Ok(Self { vertex, pixel })
    }

    pub fn vertex(&self) -> &dyn VertexShader {
        self.vertex.as_ref()
    }

    pub fn pixel(&self) -> &dyn PixelShader {
        self.pixel.as_ref()
    }

    pub fn input_layout(&self) -> VertexLayout {
        self.vertex.input_layout()
    }

    pub fn interpolants(&self) -> &[RegisterType] {
        self.vertex.outputs()
    }
}

/// Linearly blends three vertex outputs with barycentric `weights`.
///
/// Only the declared width of each register is interpolated; the remaining
/// components stay zero, as they would in the rasterizer.
pub fn interpolate(
    corners: [&VertexOutput; 3],
    types: &[RegisterType],
    weights: [f32; 3],
) -> PixelInput {
    let mut interpolants = Registers::new();
    for (slot, ty) in types.iter().enumerate() {
        let mut blended = Vector4::zero();
        for (corner, &w) in corners.iter().zip(weights.iter()) {
            blended += corner.interpolants.raw(slot) * w;
        }
        for component in ty.components()..4 {
            blended[component] = 0.0;
        }
        interpolants.set_vec4(slot, blended);
    }

    let depth = corners
        .iter()
        .zip(weights.iter())
        .map(|(c, &w)| {
            if c.position.w.abs() > f32::EPSILON {
                c.position.z / c.position.w * w
            } else {
                0.0
            }
        })
        .sum();

    PixelInput {
        interpolants,
        depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedVs(&'static [RegisterType]);

    impl VertexShader for FixedVs {
        fn input_layout(&self) -> VertexLayout {
            VertexLayout::POSITION
        }

        fn outputs(&self) -> &[RegisterType] {
            self.0
        }

        fn execute(&self, input: &VertexInput, _constants: &ShaderConstants) -> VertexOutput {
            VertexOutput::new(input.position.extend(1.0))
        }
    }

    struct FixedPs(&'static [RegisterType]);

    impl PixelShader for FixedPs {
        fn inputs(&self) -> &[RegisterType] {
            self.0
        }

        fn execute(
            &self,
            _input: &PixelInput,
            _constants: &ShaderConstants,
            _textures: &TextureBindings<'_>,
            _out: &mut PixelOutput,
        ) -> bool {
            true
        }
    }

    #[test]
    fn test_matching_pair_is_accepted() {
        let pair = ShaderPair::new(
            Box::new(FixedVs(&[RegisterType::Vec3, RegisterType::Vec4])),
            Box::new(FixedPs(&[RegisterType::Vec3])),
        );
        assert!(pair.is_ok());
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        let err = ShaderPair::new(
            Box::new(FixedVs(&[RegisterType::Vec3, RegisterType::Vec3])),
            Box::new(FixedPs(&[RegisterType::Vec3, RegisterType::Vec4])),
        )
        .err()
        .unwrap();
        assert_eq!(
            err,
            ShaderError::InterpolantMismatch {
                slot: 1,
                produced: Some(RegisterType::Vec3),
                expected: RegisterType::Vec4,
            }
        );
    }

    #[test]
    fn test_missing_output_is_rejected() {
        let result = ShaderPair::new(
            Box::new(FixedVs(&[RegisterType::Vec3])),
            Box::new(FixedPs(&[RegisterType::Vec3, RegisterType::Vec2])),
        );
        assert!(matches!(
            result,
            Err(ShaderError::InterpolantMismatch { slot: 1, produced: None, .. })
        ));
    }

    #[test]
    fn test_interpolate_respects_register_width() {
        let mut a = VertexOutput::new(Vector4::new(0.0, 0.0, 0.5, 1.0));
        let mut b = a;
        let mut c = a;
        a.interpolants.set_vec4(0, Vector4::new(3.0, 0.0, 0.0, 9.0));
        b.interpolants.set_vec4(0, Vector4::new(0.0, 3.0, 0.0, 9.0));
        c.interpolants.set_vec4(0, Vector4::new(0.0, 0.0, 3.0, 9.0));

        let third = 1.0 / 3.0;
        let pixel = interpolate([&a, &b, &c], &[RegisterType::Vec3], [third; 3]);
        let v = pixel.interpolants.raw(0);
        assert!((v.x - 1.0).abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
        assert!((v.z - 1.0).abs() < 1e-6);
        assert_eq!(v.w, 0.0);
        assert!((pixel.depth - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_set_matrices_precomposes_product() {
        let world = Matrix4::from_scale(2.0);
        let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -5.0));
        let proj = Matrix4::from_nonuniform_scale(1.0, 2.0, 1.0);
        let mut constants = ShaderConstants::new();
        constants.set_matrices(world, view, proj);
        assert_eq!(constants.matrices.world_view_projection, proj * view * world);
    }
}
