//! Mandelbrot escape-time coloring on a textured quad.

use cgmath::{Vector2, Vector4};

use crate::gfx::resources::TextureBindings;
use crate::gfx::scene::vertex::VertexLayout;

use super::{
    PixelInput, PixelOutput, PixelShader, RegisterType, ShaderConstants, VertexInput,
    VertexOutput, VertexShader,
};

/// Pixel vector slot holding `(center.x, center.y, zoom, max_iterations)`.
pub const VIEW_CONSTANTS: usize = 2;

const TEX_COORD: usize = 0;
const INTERPOLANTS: [RegisterType; 1] = [RegisterType::Vec2];

/// Half-extent of the complex plane shown at zoom 1.
const BASE_EXTENT: f32 = 2.0;
const ESCAPE_RADIUS2: f32 = 4.0;

/// Maps a quad uv onto the complex plane.
pub fn complex_at(uv: Vector2<f32>, center: Vector2<f32>, zoom: f32) -> Vector2<f32> {
    let extent = BASE_EXTENT / zoom.max(f32::EPSILON);
    center + (uv - Vector2::new(0.5, 0.5)) * 2.0 * extent
}

/// Iterations before `z^2 + c` escapes, or `None` if it stays bounded.
pub fn escape_time(c: Vector2<f32>, max_iterations: u32) -> Option<u32> {
    let mut z = Vector2::new(0.0f32, 0.0);
    for i in 0..max_iterations {
        if z.x * z.x + z.y * z.y > ESCAPE_RADIUS2 {
            return Some(i);
        }
        z = Vector2::new(z.x * z.x - z.y * z.y + c.x, 2.0 * z.x * z.y + c.y);
    }
    None
}

/// Palette color for an escape at `t` in `[0, 1]`.
fn palette(t: f32) -> Vector4<f32> {
    Vector4::new(
        9.0 * (1.0 - t) * t * t * t,
        15.0 * (1.0 - t) * (1.0 - t) * t * t,
        8.5 * (1.0 - t) * (1.0 - t) * (1.0 - t) * t,
        1.0,
    )
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FractalVertexShader;

impl VertexShader for FractalVertexShader {
    fn input_layout(&self) -> VertexLayout {
        VertexLayout::POSITION_TEX
    }

    fn outputs(&self) -> &[RegisterType] {
        &INTERPOLANTS
    }

    fn execute(&self, input: &VertexInput, constants: &ShaderConstants) -> VertexOutput {
        let mut out = VertexOutput::new(constants.matrices.world_view_projection * input.position.extend(1.0));
        out.interpolants.set_vec2(TEX_COORD, input.tex_coord);
        out
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FractalPixelShader;

impl PixelShader for FractalPixelShader {
    fn inputs(&self) -> &[RegisterType] {
        &INTERPOLANTS
    }

    fn execute(
        &self,
        input: &PixelInput,
        constants: &ShaderConstants,
        _textures: &TextureBindings<'_>,
        out: &mut PixelOutput,
    ) -> bool {
        let view = constants.pixel_vector(VIEW_CONSTANTS);
        let max_iterations = view.w.max(1.0) as u32;
        let c = complex_at(
            input.interpolants.vec2(TEX_COORD),
            Vector2::new(view.x, view.y),
            view.z,
        );

        out.color = match escape_time(c, max_iterations) {
            Some(n) => palette(n as f32 / max_iterations as f32),
            None => Vector4::new(0.0, 0.0, 0.0, 1.0),
        };
        true
    }
}
