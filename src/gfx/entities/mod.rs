//! # Built-in Entities
//!
//! The three scene objects the demos are made of:
//!
//! - [`EnvSphere`] - tessellated sphere with cube-map reflections
//! - [`BumpTriangle`] - normal-mapped or parallax-mapped triangle
//! - [`FractalQuad`] - animated Mandelbrot quad
//!
//! [`register_builtin_types`] makes them available to [`Scene::create`] under
//! their type names with default parameters.

pub mod bump_triangle;
pub mod env_sphere;
pub mod fractal_quad;

pub use bump_triangle::{BumpTriangle, BumpTriangleParams};
pub use env_sphere::{EnvSphere, EnvSphereParams};
pub use fractal_quad::{FractalQuad, FractalQuadParams};

use cgmath::{Deg, Matrix4, Vector3, Vector4, Zero};

use crate::gfx::scene::{PassContext, Scene};
use crate::gfx::shader::ShaderConstants;

/// Translation, rotation about Y and uniform scale of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation_y: Deg<f32>,
    pub scale: f32,
}

impl Transform {
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.translation);
        let r = Matrix4::from_angle_y(self.rotation_y);
        let s = Matrix4::from_scale(self.scale);
        t * r * s // T * R * S
    }

    /// Adds `degrees` to the Y rotation, kept in `[0, 360)`.
    pub fn rotate_y(&mut self, degrees: f32) {
        self.rotation_y = Deg((self.rotation_y.0 + degrees).rem_euclid(360.0));
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vector3::zero(),
            rotation_y: Deg(0.0),
            scale: 1.0,
        }
    }
}

/// Constants every built-in entity pushes: matrices, camera and light
/// position for the vertex stage, base and light color for the pixel stage.
pub(crate) fn pass_constants(
    pass: &PassContext<'_>,
    world: Matrix4<f32>,
    base_color: Vector4<f32>,
) -> ShaderConstants {
    let view = pass.view();
    let light = pass.light();

    let mut constants = ShaderConstants::new();
    constants.set_matrices(world, view.view, view.projection);
    constants.set_vertex_vector(ShaderConstants::CAMERA_POSITION, view.position_constant());
    constants.set_vertex_vector(ShaderConstants::LIGHT_POSITION, light.position.extend(1.0));
    constants.set_pixel_vector(ShaderConstants::BASE_COLOR, base_color);
    constants.set_pixel_vector(ShaderConstants::LIGHT_COLOR, light.color);
    constants
}

/// Registers the built-in entity kinds with default parameters.
pub fn register_builtin_types(scene: &mut Scene) {
    scene.register_type(env_sphere::TYPE_NAME, || {
        Box::new(EnvSphere::new(EnvSphereParams::default()))
    });
    scene.register_type(bump_triangle::TYPE_NAME, || {
        Box::new(BumpTriangle::new(BumpTriangleParams::default()))
    });
    scene.register_type(fractal_quad::TYPE_NAME, || {
        Box::new(FractalQuad::new(FractalQuadParams::default()))
    });
}
