use cgmath::Vector4;

use crate::error::{InitError, RenderError};
use crate::gfx::device::{DrawCall, RenderState};
use crate::gfx::geometry::generate_triangle;
use crate::gfx::resources::{TextureBindings, TextureHandle};
use crate::gfx::scene::{
    Entity, FrameContext, InitContext, Mesh, PassContext, SurfaceVertex, VertexFormat,
};
use crate::gfx::shader::bump::{
    BumpMode, BumpPixelShader, BumpVertexShader, DIFFUSE_SLOT, NORMAL_MAP_SLOT,
    PARALLAX_CONSTANTS,
};
use crate::gfx::shader::ShaderPair;

use super::{pass_constants, Transform};

pub const TYPE_NAME: &str = "bump_triangle";

pub const DEFAULT_DIFFUSE: &str = "bump_diffuse";
pub const DEFAULT_NORMAL_MAP: &str = "bump_normal";

#[derive(Debug, Clone, PartialEq)]
pub struct BumpTriangleParams {
    /// Half-width of the triangle.
    pub size: f32,
    pub mode: BumpMode,
    pub diffuse: String,
    /// Normal map with height in alpha.
    pub normal_map: String,
    pub parallax_scale: f32,
    pub parallax_bias: f32,
    pub base_color: Vector4<f32>,
    pub transform: Transform,
    /// Degrees per second about the Y axis.
    pub spin_speed: f32,
    pub render_state: RenderState,
}

impl Default for BumpTriangleParams {
    fn default() -> Self {
        Self {
            size: 1.0,
            mode: BumpMode::Normal,
            diffuse: DEFAULT_DIFFUSE.to_string(),
            normal_map: DEFAULT_NORMAL_MAP.to_string(),
            parallax_scale: 0.04,
            parallax_bias: -0.02,
            base_color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            transform: Transform::default(),
            spin_speed: 0.0,
            render_state: RenderState::default(),
        }
    }
}

struct TriangleResources {
    mesh: Mesh,
    shaders: ShaderPair,
    diffuse: TextureHandle,
    normal_map: TextureHandle,
}

/// Single triangle lit through a normal map, optionally parallax mapped.
pub struct BumpTriangle {
    pub params: BumpTriangleParams,
    resources: Option<TriangleResources>,
}

impl BumpTriangle {
    pub fn new(params: BumpTriangleParams) -> Self {
        Self {
            params,
            resources: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.resources.is_some()
    }
}

impl Entity for BumpTriangle {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<(), InitError> {
        if self.params.size <= 0.0 {
            return Err(InitError::InvalidParameter {
                name: "size",
                reason: format!("must be positive, got {}", self.params.size),
            });
        }

        let diffuse = ctx.resources.load_flat(&self.params.diffuse)?;
        let normal_map = ctx.resources.load_flat(&self.params.normal_map)?;
        let shaders = ShaderPair::new(
            Box::new(BumpVertexShader),
            Box::new(BumpPixelShader::new(self.params.mode)),
        )?;
        if shaders.input_layout() != SurfaceVertex::LAYOUT {
            return Err(InitError::LayoutMismatch);
        }
        let mesh = Mesh::upload(ctx.device, &generate_triangle(self.params.size))?;

        log::debug!("BumpTriangle ready: {:?} mapping", self.params.mode);
        self.resources = Some(TriangleResources {
            mesh,
            shaders,
            diffuse,
            normal_map,
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

        let mut constants =
            pass_constants(pass, self.params.transform.matrix(), self.params.base_color);
        constants.set_pixel_vector(
            PARALLAX_CONSTANTS,
            Vector4::new(self.params.parallax_scale, self.params.parallax_bias, 0.0, 0.0),
        );

        let mut textures = TextureBindings::new();
        textures.bind(DIFFUSE_SLOT, &res.diffuse);
        textures.bind(NORMAL_MAP_SLOT, &res.normal_map);

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
