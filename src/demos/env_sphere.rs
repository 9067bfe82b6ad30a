use cgmath::{Vector3, Vector4};

use crate::config::DemoConfig;
use crate::error::InitError;
use crate::gfx::camera::OrbitController;
use crate::gfx::entities::{EnvSphere, EnvSphereParams};
use crate::gfx::resources::Texture;
use crate::gfx::scene::{InitContext, Light, Scene};

use super::{textures, DemoRig};

const SKY_SIZE: usize = 32;

/// Slowly spinning reflective sphere under a sky cube map.
pub(super) fn populate(
    config: &DemoConfig,
    scene: &mut Scene,
    ctx: &mut InitContext<'_>,
) -> Result<DemoRig, InitError> {
    if !ctx.resources.contains(&config.environment) {
        ctx.resources
            .insert(&config.environment, Texture::Cube(textures::sky_cube(SKY_SIZE)));
    }

    let params = EnvSphereParams {
        stacks: config.sphere_stacks,
        slices: config.sphere_slices,
        environment: config.environment.clone(),
        spin_speed: 20.0,
        ..EnvSphereParams::default()
    };
    scene.insert(Box::new(EnvSphere::new(params)), ctx)?;

    Ok(DemoRig {
        orbit: OrbitController::new(4.0).with_auto_rotate(0.2),
        light: Light::new(Vector3::new(2.0, 3.0, -4.0), Vector4::new(1.0, 0.95, 0.9, 1.0)),
        light_speed: 0.02,
    })
}
