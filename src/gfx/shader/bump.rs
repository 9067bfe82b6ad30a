//! Tangent-space bump mapping for flat textured surfaces.
//!
//! The vertex stage moves light and view directions into the surface's
//! tangent frame; the pixel stage perturbs the normal with a normal map and,
//! in parallax mode, shifts the texture coordinate by the height stored in
//! the normal map's alpha channel.

use cgmath::{InnerSpace, Vector2, Vector3, Vector4};

use crate::gfx::resources::TextureBindings;
use crate::gfx::scene::vertex::VertexLayout;
use crate::math::{modulate, normalize_or_zero, rotation_part};

use super::{
    PixelInput, PixelOutput, PixelShader, RegisterType, ShaderConstants, VertexInput,
    VertexOutput, VertexShader,
};

/// Diffuse color texture slot.
pub const DIFFUSE_SLOT: usize = 0;
/// Normal map texture slot; alpha holds height.
pub const NORMAL_MAP_SLOT: usize = 1;

/// Pixel vector slot holding `(scale, bias, _, _)` for parallax offsets.
pub const PARALLAX_CONSTANTS: usize = 2;

pub const SPECULAR_POWER: i32 = 32;

const TEX_COORD: usize = 0;
const LIGHT_DIR: usize = 1;
const VIEW_DIR: usize = 2;

const INTERPOLANTS: [RegisterType; 3] = [RegisterType::Vec2, RegisterType::Vec3, RegisterType::Vec3];

/// How the pixel stage uses the normal map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BumpMode {
    #[default]
    Normal,
    Parallax,
}

/// Orthonormal tangent frame for a surface normal, with the tangent
/// following +X and the bitangent `normal x tangent`.
pub fn tangent_frame(normal: Vector3<f32>) -> (Vector3<f32>, Vector3<f32>, Vector3<f32>) {
    let n = normalize_or_zero(normal);
    let axis = if n.x.abs() > 0.99 {
        Vector3::unit_y()
    } else {
        Vector3::unit_x()
    };
    let t = normalize_or_zero(axis - n * n.dot(axis));
    let b = n.cross(t);
    (t, b, n)
}

/// Texture coordinate shifted along the tangent-space `view` direction.
pub fn parallax_offset(uv: Vector2<f32>, view: Vector3<f32>, height: f32, scale: f32, bias: f32) -> Vector2<f32> {
    if view.z.abs() <= f32::EPSILON {
        return uv;
    }
    uv + Vector2::new(view.x, view.y) / view.z * (height * scale + bias)
}

/// Decodes a normal map texel into a unit tangent-space normal.
pub fn decode_normal(texel: Vector4<f32>) -> Vector3<f32> {
    normalize_or_zero(texel.truncate() * 2.0 - Vector3::new(1.0, 1.0, 1.0))
}

/// Vertex stage: uv plus tangent-space light and view directions.
#[derive(Debug, Default, Clone, Copy)]
pub struct BumpVertexShader;

impl VertexShader for BumpVertexShader {
    fn input_layout(&self) -> VertexLayout {
        VertexLayout::POSITION_TEX_NORMAL
    }

    fn outputs(&self) -> &[RegisterType] {
        &INTERPOLANTS
    }

    fn execute(&self, input: &VertexInput, constants: &ShaderConstants) -> VertexOutput {
        let m = &constants.matrices;
        let local = input.position.extend(1.0);
        let world_pos = (m.world * local).truncate();
        let (t, b, n) = tangent_frame(rotation_part(&m.world) * input.normal);

        let camera = constants.vertex_vector(ShaderConstants::CAMERA_POSITION).truncate();
        let light = constants.vertex_vector(ShaderConstants::LIGHT_POSITION).truncate();
        let to_tangent = |v: Vector3<f32>| Vector3::new(v.dot(t), v.dot(b), v.dot(n));

        let mut out = VertexOutput::new(m.world_view_projection * local);
        out.interpolants.set_vec2(TEX_COORD, input.tex_coord);
        out.interpolants.set_vec3(LIGHT_DIR, to_tangent(light - world_pos));
        out.interpolants.set_vec3(VIEW_DIR, to_tangent(camera - world_pos));
        out
    }
}

/// Pixel stage: Lambert diffuse and Phong specular against the mapped normal.
#[derive(Debug, Default, Clone, Copy)]
pub struct BumpPixelShader {
    pub mode: BumpMode,
}

impl BumpPixelShader {
    pub fn new(mode: BumpMode) -> Self {
        Self { mode }
    }
}

impl PixelShader for BumpPixelShader {
    fn inputs(&self) -> &[RegisterType] {
        &INTERPOLANTS
    }

    fn execute(
        &self,
        input: &PixelInput,
        constants: &ShaderConstants,
        textures: &TextureBindings<'_>,
        out: &mut PixelOutput,
    ) -> bool {
        let light = normalize_or_zero(input.interpolants.vec3(LIGHT_DIR));
        let view = normalize_or_zero(input.interpolants.vec3(VIEW_DIR));
        let mut uv = input.interpolants.vec2(TEX_COORD);
        if self.mode == BumpMode::Parallax {
            if let Some(height) = textures.sample_flat(NORMAL_MAP_SLOT, uv) {
                let p = constants.pixel_vector(PARALLAX_CONSTANTS);
                uv = parallax_offset(uv, view, height.w, p.x, p.y);
            }
        }

        let normal = textures
            .sample_flat(NORMAL_MAP_SLOT, uv)
            .map(decode_normal)
            .unwrap_or(Vector3::unit_z());
        let albedo = textures
            .sample_flat(DIFFUSE_SLOT, uv)
            .unwrap_or(Vector4::new(1.0, 1.0, 1.0, 1.0));

        let base = modulate(constants.pixel_vector(ShaderConstants::BASE_COLOR), albedo);
        let light_color = constants.pixel_vector(ShaderConstants::LIGHT_COLOR);

        let n_dot_l = normal.dot(light);
        let diffuse = n_dot_l.max(0.0);
        let mut specular = 0.0;
        if diffuse > 0.0 {
            let reflected = normal * 2.0 * n_dot_l - light;
            let r_dot_v = reflected.dot(view);
            if r_dot_v > 0.0 {
                specular = r_dot_v.powi(SPECULAR_POWER);
            }
        }

        out.color += modulate(base, light_color) * diffuse + light_color * specular;
        out.color.w = base.w;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::{ResourceManager, Texture, Texture2D};
    use crate::gfx::shader::Registers;
    use cgmath::{Matrix4, SquareMatrix, Zero};

    fn pixel(uv: Vector2<f32>, light: Vector3<f32>, view: Vector3<f32>) -> PixelInput {
        let mut registers = Registers::new();
        registers.set_vec2(TEX_COORD, uv);
        registers.set_vec3(LIGHT_DIR, light);
        registers.set_vec3(VIEW_DIR, view);
        PixelInput {
            interpolants: registers,
            depth: 0.5,
        }
    }

    fn lit_constants() -> ShaderConstants {
        let mut c = ShaderConstants::new();
        c.set_pixel_vector(ShaderConstants::BASE_COLOR, Vector4::new(1.0, 1.0, 1.0, 1.0));
        c.set_pixel_vector(ShaderConstants::LIGHT_COLOR, Vector4::new(1.0, 1.0, 1.0, 1.0));
        c
    }

    #[test]
    fn test_tangent_frame_of_front_face() {
        let (t, b, n) = tangent_frame(Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(t, Vector3::unit_x());
        assert!((b - Vector3::new(0.0, -1.0, 0.0)).magnitude() < 1e-6);
        assert!((t.cross(b) - n).magnitude() < 1e-6);
    }

    #[test]
    fn test_flat_normal_map_decodes_to_surface_normal() {
        let n = decode_normal(Vector4::new(0.5, 0.5, 1.0, 1.0));
        assert!((n - Vector3::unit_z()).magnitude() < 1e-6);
    }

    #[test]
    fn test_parallax_offset_follows_view() {
        let uv = Vector2::new(0.5, 0.5);
        let head_on = parallax_offset(uv, Vector3::unit_z(), 1.0, 0.04, -0.02);
        assert_eq!(head_on, uv);

        let tilted = parallax_offset(uv, normalize_or_zero(Vector3::new(1.0, 0.0, 1.0)), 1.0, 0.04, -0.02);
        assert!((tilted.x - 0.52).abs() < 1e-6);
        assert_eq!(tilted.y, 0.5);
        assert_eq!(parallax_offset(uv, Vector3::unit_x(), 1.0, 0.04, 0.0), uv);
    }

    #[test]
    fn test_vertex_stage_uses_tangent_space() {
        let mut c = ShaderConstants::new();
        c.set_matrices(Matrix4::identity(), Matrix4::identity(), Matrix4::identity());
        c.set_vertex_vector(ShaderConstants::LIGHT_POSITION, Vector4::new(0.0, 0.0, -2.0, 1.0));
        c.set_vertex_vector(ShaderConstants::CAMERA_POSITION, Vector4::new(1.0, 0.0, -1.0, 1.0));
        let input = VertexInput {
            position: Vector3::zero(),
            tex_coord: Vector2::new(0.25, 0.75),
            normal: Vector3::new(0.0, 0.0, -1.0),
        };
        let out = BumpVertexShader.execute(&input, &c);
        assert_eq!(out.interpolants.vec2(TEX_COORD), Vector2::new(0.25, 0.75));
        assert!((out.interpolants.vec3(LIGHT_DIR) - Vector3::new(0.0, 0.0, 2.0)).magnitude() < 1e-6);
        assert!((out.interpolants.vec3(VIEW_DIR) - Vector3::new(1.0, 0.0, 1.0)).magnitude() < 1e-6);
    }

    #[test]
    fn test_light_behind_surface_is_dark() {
        let bindings = TextureBindings::new();
        let mut out = PixelOutput::default();
        let input = pixel(Vector2::zero(), Vector3::new(0.0, 0.0, -1.0), Vector3::unit_z());
        assert!(BumpPixelShader::new(BumpMode::Normal).execute(&input, &lit_constants(), &bindings, &mut out));
        assert_eq!(out.color.truncate(), Vector3::zero());
    }

    #[test]
    fn test_normal_map_tilts_lighting() {
        let mut resources = ResourceManager::new();
        resources.insert("flat", Texture::Flat(Texture2D::solid([0.5, 0.5, 1.0, 1.0])));
        let tilted = decode_normal(Vector4::new(1.0, 0.5, 0.5, 1.0));
        resources.insert("tilted", Texture::Flat(Texture2D::solid([1.0, 0.5, 0.5, 1.0])));
        let flat = resources.load("flat").unwrap();
        let tilt = resources.load("tilted").unwrap();

        let input = pixel(Vector2::new(0.5, 0.5), Vector3::unit_z(), Vector3::unit_z());
        let shader = BumpPixelShader::new(BumpMode::Normal);

        let mut bindings = TextureBindings::new();
        bindings.bind(NORMAL_MAP_SLOT, &flat);
        let mut lit = PixelOutput::default();
        shader.execute(&input, &lit_constants(), &bindings, &mut lit);

        let mut bindings = TextureBindings::new();
        bindings.bind(NORMAL_MAP_SLOT, &tilt);
        let mut grazing = PixelOutput::default();
        shader.execute(&input, &lit_constants(), &bindings, &mut grazing);

        assert_eq!(tilted, Vector3::unit_x());
        assert!((lit.color.x - 2.0).abs() < 1e-5);
        assert!(grazing.color.x < 1e-5);
    }
}
