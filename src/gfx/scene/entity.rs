//! Entity capability set and the contexts passed to each capability.

use crate::error::{InitError, RenderError};
use crate::gfx::camera::CameraView;
use crate::gfx::device::{Device, DrawCall, RenderState};
use crate::gfx::resources::ResourceManager;

use super::light::Light;

/// Named render pass. Multi-pass materials render only in the passes they
/// list; [`Pass::All`] renders every entity regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Lit shading against the current light.
    Lighting,
    /// Self-illuminated output that ignores the light.
    Emissive,
}

/// Which passes a camera render call covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    All,
    Only(PassKind),
}

impl Pass {
    /// Maps the legacy numeric pass id: `-1` is every pass.
    pub fn from_id(id: i32) -> Option<Pass> {
        match id {
            -1 => Some(Pass::All),
            0 => Some(Pass::Only(PassKind::Lighting)),
            1 => Some(Pass::Only(PassKind::Emissive)),
            _ => None,
        }
    }

    pub fn includes(&self, entity_passes: &[PassKind]) -> bool {
        match self {
            Pass::All => true,
            Pass::Only(kind) => entity_passes.contains(kind),
        }
    }
}

/// Services available while an entity initializes.
pub struct InitContext<'a> {
    pub device: &'a mut dyn Device,
    pub resources: &'a mut ResourceManager,
}

impl<'a> InitContext<'a> {
    pub fn new(device: &'a mut dyn Device, resources: &'a mut ResourceManager) -> Self {
        Self { device, resources }
    }
}

/// Timing for one frame update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameContext {
    /// Seconds since the previous frame.
    pub delta_time: f32,
    /// Seconds since the first frame.
    pub elapsed: f32,
}

/// Render-time state handed to an entity by the camera.
///
/// Only the camera can build one, and only while it is recording, so an
/// entity cannot draw outside a BeginRender/EndRender window.
pub struct PassContext<'a> {
    device: &'a mut dyn Device,
    view: &'a CameraView,
    light: &'a Light,
    pass: PassKind,
}

impl<'a> PassContext<'a> {
    pub(crate) fn new(
        device: &'a mut dyn Device,
        view: &'a CameraView,
        light: &'a Light,
        pass: PassKind,
    ) -> Self {
        Self {
            device,
            view,
            light,
            pass,
        }
    }

    pub fn view(&self) -> &CameraView {
        self.view
    }

    /// The light bound as current for this pass.
    pub fn light(&self) -> &Light {
        self.light
    }

    pub fn pass(&self) -> PassKind {
        self.pass
    }

    pub fn set_render_state(&mut self, state: RenderState) {
        self.device.set_render_state(state);
    }

    pub fn draw(&mut self, call: &DrawCall<'_>) -> Result<(), RenderError> {
        self.device.draw_indexed(call)?;
        Ok(())
    }
}

/// A renderable scene object: one mesh, one shader pair, some textures.
pub trait Entity {
    /// Registry name of this entity kind.
    fn type_name(&self) -> &'static str;

    /// Creates the mesh, shader pair and texture bindings.
    ///
    /// On error nothing created here may remain reachable.
    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<(), InitError>;

    /// Advances per-frame state. Returns whether anything changed.
    fn update(&mut self, frame: &FrameContext) -> bool;

    /// Pushes constants and issues the draw call for the current pass.
    fn render(&self, pass: &mut PassContext<'_>) -> Result<(), RenderError>;

    /// Passes this entity takes part in.
    fn passes(&self) -> &[PassKind] {
        &[PassKind::Lighting]
    }
}
