use cgmath::{Vector2, Vector4};

use crate::error::{InitError, RenderError};
use crate::gfx::device::{DrawCall, RenderState};
use crate::gfx::geometry::generate_quad;
use crate::gfx::resources::TextureBindings;
use crate::gfx::scene::{
    Entity, FrameContext, InitContext, Mesh, PassContext, PassKind, TexturedVertex, VertexFormat,
};
use crate::gfx::shader::fractal::{FractalPixelShader, FractalVertexShader, VIEW_CONSTANTS};
use crate::gfx::shader::ShaderPair;

use super::{pass_constants, Transform};

pub const TYPE_NAME: &str = "fractal_quad";

#[derive(Debug, Clone, PartialEq)]
pub struct FractalQuadParams {
    pub width: f32,
    pub height: f32,
    /// Point of the complex plane at the quad center.
    pub center: Vector2<f32>,
    pub zoom: f32,
    /// Exponential zoom rate per second; zero freezes the view.
    pub zoom_rate: f32,
    /// Zoom at which the animation starts over from 1.
    pub max_zoom: f32,
    pub max_iterations: u32,
    pub transform: Transform,
    pub render_state: RenderState,
}

impl Default for FractalQuadParams {
    fn default() -> Self {
        Self {
            width: 2.0,
            height: 2.0,
            center: Vector2::new(-0.743_643, 0.131_825),
            zoom: 1.0,
            zoom_rate: 0.5,
            max_zoom: 5000.0,
            max_iterations: 128,
            transform: Transform::default(),
            render_state: RenderState::default(),
        }
    }
}

struct QuadResources {
    mesh: Mesh,
    shaders: ShaderPair,
}

/// Quad showing an animated zoom into the Mandelbrot set. Ignores lighting.
pub struct FractalQuad {
    pub params: FractalQuadParams,
    resources: Option<QuadResources>,
}

impl FractalQuad {
    pub fn new(params: FractalQuadParams) -> Self {
        Self {
            params,
            resources: None,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.params.zoom
    }
}

impl Entity for FractalQuad {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<(), InitError> {
        if self.params.width <= 0.0 || self.params.height <= 0.0 {
            return Err(InitError::InvalidParameter {
                name: "size",
                reason: format!("{}x{} is empty", self.params.width, self.params.height),
            });
        }
        if self.params.max_iterations == 0 {
            return Err(InitError::InvalidParameter {
                name: "max_iterations",
                reason: "must be at least 1".into(),
            });
        }

        let shaders = ShaderPair::new(Box::new(FractalVertexShader), Box::new(FractalPixelShader))?;
        if shaders.input_layout() != TexturedVertex::LAYOUT {
            return Err(InitError::LayoutMismatch);
        }
        let mesh = Mesh::upload(
            ctx.device,
            &generate_quad(self.params.width, self.params.height),
        )?;

        self.resources = Some(QuadResources { mesh, shaders });
        Ok(())
    }

    fn update(&mut self, frame: &FrameContext) -> bool {
        if self.params.zoom_rate == 0.0 {
            return false;
        }
        self.params.zoom *= (self.params.zoom_rate * frame.delta_time).exp();
        if self.params.zoom > self.params.max_zoom {
            self.params.zoom = 1.0;
        }
        true
    }

    fn render(&self, pass: &mut PassContext<'_>) -> Result<(), RenderError> {
        let Some(res) = &self.resources else {
            return Ok(());
        };

        let mut constants = pass_constants(
            pass,
            self.params.transform.matrix(),
            Vector4::new(1.0, 1.0, 1.0, 1.0),
        );
        constants.set_pixel_vector(
            VIEW_CONSTANTS,
            Vector4::new(
                self.params.center.x,
                self.params.center.y,
                self.params.zoom,
                self.params.max_iterations as f32,
            ),
        );

        pass.set_render_state(self.params.render_state);
        pass.draw(&DrawCall {
            vertices: res.mesh.vertex_buffer(),
            indices: res.mesh.index_buffer(),
            shaders: &res.shaders,
            constants: &constants,
            textures: TextureBindings::new(),
        })
    }

    fn passes(&self) -> &[PassKind] {
        &[PassKind::Emissive]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::Camera;
    use crate::gfx::device::headless::HeadlessDevice;
    use crate::gfx::resources::ResourceManager;
    use crate::gfx::scene::{Light, Pass, Scene};
    use cgmath::{Vector3, Zero};

    #[test]
    fn test_zoom_animates_and_wraps() {
        let mut quad = FractalQuad::new(FractalQuadParams {
            zoom_rate: 1.0,
            max_zoom: 2.0,
            ..FractalQuadParams::default()
        });
        let frame = FrameContext {
            delta_time: 0.5,
            elapsed: 0.5,
        };
        assert!(quad.update(&frame));
        assert!((quad.zoom() - 0.5f32.exp()).abs() < 1e-5);
        assert!(quad.update(&frame));
        assert_eq!(quad.zoom(), 1.0);
    }

    #[test]
    fn test_frozen_zoom_reports_no_change() {
        let mut quad = FractalQuad::new(FractalQuadParams {
            zoom_rate: 0.0,
            ..FractalQuadParams::default()
        });
        assert!(!quad.update(&FrameContext::default()));
    }

    #[test]
    fn test_renders_only_in_emissive_pass() {
        let mut device = HeadlessDevice::new(32, 32);
        let mut resources = ResourceManager::new();
        let mut scene = Scene::new();
        {
            let mut ctx = InitContext::new(&mut device, &mut resources);
            scene
                .insert(Box::new(FractalQuad::new(FractalQuadParams::default())), &mut ctx)
                .unwrap();
        }
        scene.create_light(Light::white(Vector3::new(0.0, 0.0, -2.0)));

        let mut camera = Camera::new(Vector3::new(0.0, 0.0, -3.0), Vector3::zero(), 1.0);
        camera.begin_render(&mut device).unwrap();
        assert_eq!(
            camera.render_pass(&mut device, &scene, Pass::Only(PassKind::Lighting)),
            Ok(0)
        );
        assert_eq!(
            camera.render_pass(&mut device, &scene, Pass::Only(PassKind::Emissive)),
            Ok(1)
        );
        camera.end_render(&mut device, true).unwrap();
        assert_eq!(device.draws()[0].centroid_colors.len(), 2);
        assert_eq!(device.draws()[0].textures_bound, 0);
    }
}
