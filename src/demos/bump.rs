use cgmath::Vector3;

use crate::error::InitError;
use crate::gfx::camera::OrbitController;
use crate::gfx::entities::bump_triangle::{DEFAULT_DIFFUSE, DEFAULT_NORMAL_MAP};
use crate::gfx::entities::{BumpTriangle, BumpTriangleParams};
use crate::gfx::resources::Texture;
use crate::gfx::scene::{InitContext, Light, Scene};
use crate::gfx::shader::bump::BumpMode;

use super::{textures, DemoRig};

const TEXTURE_SIZE: usize = 128;

/// Single bumpy triangle facing the camera, lit by a light the pointer moves.
pub(super) fn populate(
    mode: BumpMode,
    scene: &mut Scene,
    ctx: &mut InitContext<'_>,
) -> Result<DemoRig, InitError> {
    if !ctx.resources.contains(DEFAULT_DIFFUSE) {
        ctx.resources
            .insert(DEFAULT_DIFFUSE, Texture::Flat(textures::bump_diffuse(TEXTURE_SIZE)));
    }
    if !ctx.resources.contains(DEFAULT_NORMAL_MAP) {
        ctx.resources.insert(
            DEFAULT_NORMAL_MAP,
            Texture::Flat(textures::bump_normal_map(TEXTURE_SIZE)),
        );
    }

    let params = BumpTriangleParams {
        mode,
        ..BumpTriangleParams::default()
    };
    scene.insert(Box::new(BumpTriangle::new(params)), ctx)?;

    Ok(DemoRig {
        orbit: OrbitController::new(3.0),
        light: Light::white(Vector3::new(0.5, 0.5, -2.0)),
        light_speed: 0.01,
    })
}
