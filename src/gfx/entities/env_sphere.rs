use cgmath::Vector4;

use crate::error::{InitError, RenderError};
use crate::gfx::device::{DrawCall, RenderState};
use crate::gfx::geometry::generate_sphere;
use crate::gfx::resources::{TextureBindings, TextureHandle};
use crate::gfx::scene::{
    Entity, FrameContext, InitContext, Mesh, PassContext, PositionVertex, VertexFormat,
};
use crate::gfx::shader::env_map::{EnvMapPixelShader, EnvMapVertexShader, ENVIRONMENT_SLOT};
use crate::gfx::shader::ShaderPair;

use super::{pass_constants, Transform};

pub const TYPE_NAME: &str = "env_sphere";

/// Cube map loaded when no other name is configured.
pub const DEFAULT_ENVIRONMENT: &str = "environment";

#[derive(Debug, Clone, PartialEq)]
pub struct EnvSphereParams {
    pub radius: f32,
    pub stacks: u32,
    pub slices: u32,
    /// Resource name of the cube map reflected by the surface.
    pub environment: String,
    pub base_color: Vector4<f32>,
    pub transform: Transform,
    /// Degrees per second about the Y axis.
    pub spin_speed: f32,
    pub render_state: RenderState,
}

impl Default for EnvSphereParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            stacks: 16,
            slices: 16,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            base_color: Vector4::new(0.6, 0.6, 0.65, 1.0),
            transform: Transform::default(),
            spin_speed: 0.0,
            render_state: RenderState::default(),
        }
    }
}

struct SphereResources {
    mesh: Mesh,
    shaders: ShaderPair,
    environment: TextureHandle,
}

/// Environment-mapped sphere.
pub struct EnvSphere {
    pub params: EnvSphereParams,
    resources: Option<SphereResources>,
}

impl EnvSphere {
    pub fn new(params: EnvSphereParams) -> Self {
        Self {
            params,
            resources: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.resources.is_some()
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.resources.as_ref().map(|r| &r.mesh)
    }
}

impl Entity for EnvSphere {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<(), InitError> {
        let environment = ctx.resources.load_cube(&self.params.environment)?;
        let shaders = ShaderPair::new(
            Box::new(EnvMapVertexShader),
            Box::new(EnvMapPixelShader),
        )?;
        let geometry = generate_sphere(self.params.radius, self.params.stacks, self.params.slices)?;
        if shaders.input_layout() != PositionVertex::LAYOUT {
            return Err(InitError::LayoutMismatch);
        }
        let mesh = Mesh::upload(ctx.device, &geometry)?;

        log::debug!(
            "EnvSphere ready: r={} {}x{} reflecting `{}`",
            self.params.radius,
            self.params.stacks,
            self.params.slices,
            environment.name()
        );
        self.resources = Some(SphereResources {
            mesh,
            shaders,
            environment,
        });
        Ok(())
    }

    fn update(&mut self, frame: &FrameContext) -> bool {
        if self.params.spin_speed == 0.0 {
            return false;
        }
        self.params
            .transform
            .rotate_y(self.params.spin_speed * frame.delta_time);
        true
    }

    fn render(&self, pass: &mut PassContext<'_>) -> Result<(), RenderError> {
        let Some(res) = &self.resources else {
            return Ok(());
        };

        let constants = pass_constants(pass, self.params.transform.matrix(), self.params.base_color);
        let mut textures = TextureBindings::new();
        textures.bind(ENVIRONMENT_SLOT, &res.environment);

        pass.set_render_state(self.params.render_state);
        pass.draw(&DrawCall {
            vertices: res.mesh.vertex_buffer(),
            indices: res.mesh.index_buffer(),
            shaders: &res.shaders,
            constants: &constants,
            textures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DeviceError, ResourceError};
    use crate::gfx::camera::Camera;
    use crate::gfx::device::headless::HeadlessDevice;
    use crate::gfx::resources::{CubeTexture, ResourceManager, Texture, Texture2D};
    use crate::gfx::scene::{Light, Pass, Scene};
    use crate::gfx::shader::{env_map, interpolate};
    use crate::math::normalize_or_zero;
    use cgmath::{InnerSpace, Vector3, Zero};

    fn sphere_params() -> EnvSphereParams {
        EnvSphereParams {
            radius: 1.0,
            stacks: 16,
            slices: 16,
            environment: "sky".into(),
            ..EnvSphereParams::default()
        }
    }

    #[test]
    fn test_initializes_against_cube_map() {
        let mut device = HeadlessDevice::new(64, 64);
        let mut resources = ResourceManager::new();
        resources.insert("sky", Texture::Cube(CubeTexture::solid([0.1, 0.2, 0.9, 1.0])));

        let mut sphere = EnvSphere::new(sphere_params());
        let mut ctx = InitContext::new(&mut device, &mut resources);
        sphere.initialize(&mut ctx).unwrap();
        assert_eq!(sphere.mesh().map(|m| m.vertex_count()), Some(16 * 16 * 4));
        assert_eq!(resources.live_count("sky"), 1);
    }

    #[test]
    fn test_flat_texture_is_rejected() {
        let mut device = HeadlessDevice::new(64, 64);
        let mut resources = ResourceManager::new();
        resources.insert("sky", Texture::Flat(Texture2D::solid([1.0, 1.0, 1.0, 1.0])));

        let mut scene = Scene::new();
        let mut ctx = InitContext::new(&mut device, &mut resources);
        let err = scene
            .insert(Box::new(EnvSphere::new(sphere_params())), &mut ctx)
            .unwrap_err();
        assert!(matches!(
            err,
            InitError::Resource(ResourceError::WrongType { .. })
        ));
        assert_eq!(scene.entity_count(), 0);
        assert_eq!(resources.live_count("sky"), 0);
    }

    #[test]
    fn test_device_failure_leaves_nothing_behind() {
        let mut device = HeadlessDevice::new(64, 64);
        device.fail_allocations_after(1);
        let mut resources = ResourceManager::new();
        resources.insert("sky", Texture::Cube(CubeTexture::solid([0.1, 0.2, 0.9, 1.0])));

        let mut sphere = EnvSphere::new(sphere_params());
        let mut ctx = InitContext::new(&mut device, &mut resources);
        let err = sphere.initialize(&mut ctx).unwrap_err();
        assert!(matches!(err, InitError::Device(DeviceError::BufferAllocation { .. })));
        assert!(!sphere.is_initialized());
        assert_eq!(resources.live_count("sky"), 0);
    }

    #[test]
    fn test_invalid_tessellation_is_rejected() {
        let mut device = HeadlessDevice::new(64, 64);
        let mut resources = ResourceManager::new();
        resources.insert("sky", Texture::Cube(CubeTexture::solid([0.0, 0.0, 0.0, 1.0])));
        let mut sphere = EnvSphere::new(EnvSphereParams {
            stacks: 0,
            ..sphere_params()
        });
        let mut ctx = InitContext::new(&mut device, &mut resources);
        assert!(matches!(
            sphere.initialize(&mut ctx),
            Err(InitError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_back_side_gets_no_specular() {
        let mut device = HeadlessDevice::new(64, 64);
        let mut resources = ResourceManager::new();
        resources.insert("sky", Texture::Cube(CubeTexture::solid([0.5, 0.5, 0.5, 1.0])));

        let mut scene = Scene::new();
        {
            let mut ctx = InitContext::new(&mut device, &mut resources);
            scene
                .insert(Box::new(EnvSphere::new(sphere_params())), &mut ctx)
                .unwrap();
        }
        scene.create_light(Light::new(
            Vector3::new(0.0, 0.0, -1.0),
            Vector4::new(1.0, 1.0, 1.0, 1.0),
        ));

        let mut camera = Camera::new(Vector3::new(0.0, 0.0, -3.0), Vector3::zero(), 1.0);
        camera.begin_render(&mut device).unwrap();
        camera.clear_to_scene_color(&mut device).unwrap();
        assert_eq!(camera.render_pass(&mut device, &scene, Pass::All), Ok(1));

        let record = &device.draws()[0];
        assert_eq!(record.textures_bound, 1);
        assert_eq!(record.centroid_colors.len(), 16 * 16 * 2);

        let types = [crate::gfx::shader::RegisterType::Vec3; 3];
        let third = 1.0 / 3.0;
        let mut back_facing = 0;
        for quad in record.vertex_outputs.chunks(4) {
            for tri in [[0, 1, 2], [1, 3, 2]] {
                let pixel = interpolate(
                    [&quad[tri[0]], &quad[tri[1]], &quad[tri[2]]],
                    &types,
                    [third; 3],
                );
                let n = normalize_or_zero(pixel.interpolants.vec3(0));
                let l = normalize_or_zero(pixel.interpolants.vec3(1));
                let v = normalize_or_zero(pixel.interpolants.vec3(2));
                if n.dot(l) < 0.0 {
                    back_facing += 1;
                    assert_eq!(env_map::shade(n, l, v).specular, 0.0);
                }
            }
        }
        assert!(back_facing > 0);
        camera.end_render(&mut device, true).unwrap();
    }
}
