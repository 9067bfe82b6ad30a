//! Environment-mapped Phong shading for position-only meshes centered at the
//! origin, such as the tessellated sphere.
//!
//! The vertex stage derives the surface normal from the local position and
//! hands unnormalized light and view directions to the pixel stage, which
//! renormalizes them after interpolation.

use cgmath::{InnerSpace, Vector3, Vector4};

use crate::gfx::resources::TextureBindings;
use crate::gfx::scene::vertex::VertexLayout;
use crate::math::{lerp, modulate, normalize_or_zero, reflect_about, rotation_part, saturate};

use super::{
    PixelInput, PixelOutput, PixelShader, RegisterType, ShaderConstants, VertexInput,
    VertexOutput, VertexShader,
};

/// Cube map texture slot.
pub const ENVIRONMENT_SLOT: usize = 0;

/// Phong exponent of the specular highlight.
pub const SPECULAR_POWER: i32 = 128;

const NORMAL: usize = 0;
const LIGHT_DIR: usize = 1;
const VIEW_DIR: usize = 2;

const INTERPOLANTS: [RegisterType; 3] = [RegisterType::Vec3, RegisterType::Vec3, RegisterType::Vec3];

/// Weight of the environment reflection for a clamped view cosine.
pub fn fresnel(cos_theta: f32) -> f32 {
    1.0 - saturate(cos_theta)
}

/// Lighting terms for one pixel, from unit vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shading {
    pub reflection: Vector3<f32>,
    pub fresnel: f32,
    pub diffuse: f32,
    pub specular: f32,
}

/// Evaluates the lighting model for unit `normal`, `light` and `view`.
pub fn shade(normal: Vector3<f32>, light: Vector3<f32>, view: Vector3<f32>) -> Shading {
    let cos_theta = saturate(normal.dot(view));
    let reflection = reflect_about(normal, view);

    let diffuse = normal.dot(light).max(0.0);
    let mut specular = 0.0;
    if diffuse > 0.0 {
        let spec_term = light.dot(reflection);
        if spec_term > 0.0 {
            specular = spec_term.powi(SPECULAR_POWER);
        }
    }

    Shading {
        reflection,
        fresnel: fresnel(cos_theta),
        diffuse,
        specular,
    }
}

/// Vertex stage: world normal, light direction and view direction.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvMapVertexShader;

impl VertexShader for EnvMapVertexShader {
    fn input_layout(&self) -> VertexLayout {
        VertexLayout::POSITION
    }

    fn outputs(&self) -> &[RegisterType] {
        &INTERPOLANTS
    }

    fn execute(&self, input: &VertexInput, constants: &ShaderConstants) -> VertexOutput {
        let m = &constants.matrices;
        let local = input.position.extend(1.0);
        let world_pos = (m.world * local).truncate();

        let normal = rotation_part(&m.world) * normalize_or_zero(input.position);
        let camera = constants.vertex_vector(ShaderConstants::CAMERA_POSITION).truncate();
        let light = constants.vertex_vector(ShaderConstants::LIGHT_POSITION).truncate();

        let mut out = VertexOutput::new(m.world_view_projection * local);
        out.interpolants.set_vec3(NORMAL, normal);
        out.interpolants.set_vec3(LIGHT_DIR, light - world_pos);
        out.interpolants.set_vec3(VIEW_DIR, camera - world_pos);
        out
    }
}

/// Pixel stage: Phong lighting blended with a cube-map reflection.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvMapPixelShader;

impl PixelShader for EnvMapPixelShader {
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
        let normal = normalize_or_zero(input.interpolants.vec3(NORMAL));
        let light = normalize_or_zero(input.interpolants.vec3(LIGHT_DIR));
        let view = normalize_or_zero(input.interpolants.vec3(VIEW_DIR));

        let shading = shade(normal, light, view);

        let env_color = textures
            .sample_cube(ENVIRONMENT_SLOT, shading.reflection)
            .unwrap_or(Vector4::new(0.0, 0.0, 0.0, 1.0));

        let base = constants.pixel_vector(ShaderConstants::BASE_COLOR);
        let light_color = constants.pixel_vector(ShaderConstants::LIGHT_COLOR);

        out.color = lerp(env_color, out.color, 1.0 - shading.fresnel);
        out.color += modulate(base, light_color) * shading.diffuse + light_color * shading.specular;
        true
    }
}
