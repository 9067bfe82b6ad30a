use cgmath::Vector3;

use crate::error::InitError;
use crate::gfx::camera::OrbitController;
use crate::gfx::entities::{FractalQuad, FractalQuadParams};
use crate::gfx::scene::{InitContext, Light, Scene};

use super::DemoRig;

/// Zooming Mandelbrot quad. The light only exists so the camera renders.
pub(super) fn populate(scene: &mut Scene, ctx: &mut InitContext<'_>) -> Result<DemoRig, InitError> {
    scene.insert(Box::new(FractalQuad::new(FractalQuadParams::default())), ctx)?;

    Ok(DemoRig {
        orbit: OrbitController::new(2.5),
        light: Light::white(Vector3::new(0.0, 0.0, -2.0)),
        light_speed: 0.0,
    })
}
