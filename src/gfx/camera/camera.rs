use cgmath::{perspective, Matrix4, Point3, Rad, Vector3, Vector4};

use crate::error::RenderError;
use crate::gfx::device::Device;
use crate::gfx::scene::{Pass, PassContext, PassKind, Scene};

use super::camera_utils::CameraView;

/// Where the camera is in its render sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Idle,
    Recording,
}

/// Perspective camera that drives the per-frame render sequence.
///
/// Changing `position`, `target`, `up` or the projection parameters has no
/// effect until [`Camera::update_matrices`] is called.
///
/// A frame is rendered as
/// `begin_render -> clear_to_scene_color -> render_pass(..) -> end_render`.
/// Calls out of that order are rejected with a [`RenderError`].
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub fovy: Rad<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Color the target is cleared to.
    pub background: Vector4<f32>,
    view: CameraView,
    phase: RenderPhase,
}

impl Camera {
    pub fn new(position: Vector3<f32>, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            target,
            up: Vector3::unit_y(),
            fovy: Rad(std::f32::consts::PI / 4.0),
            aspect,
            znear: 0.1,
            zfar: 100.0,
            background: Vector4::new(0.0, 0.0, 0.0, 1.0),
            view: CameraView::default(),
            phase: RenderPhase::Idle,
        };
        camera.update_matrices();
        camera
    }

    pub fn set_perspective(&mut self, fovy: Rad<f32>, znear: f32, zfar: f32) {
        self.fovy = fovy;
        self.znear = znear;
        self.zfar = zfar;
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Recomputes view and projection from the current parameters.
    pub fn update_matrices(&mut self) {
        let eye = Point3::new(self.position.x, self.position.y, self.position.z);
        let target = Point3::new(self.target.x, self.target.y, self.target.z);
        self.view = CameraView {
            position: self.position,
            view: Matrix4::look_at_rh(eye, target, self.up),
            projection: perspective(self.fovy, self.aspect, self.znear, self.zfar),
        };
    }

    /// Matrices as of the last [`Camera::update_matrices`].
    pub fn view(&self) -> &CameraView {
        &self.view
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    pub fn is_recording(&self) -> bool {
        self.phase == RenderPhase::Recording
    }

    /// Acquires the render target and starts recording.
    pub fn begin_render(&mut self, device: &mut dyn Device) -> Result<(), RenderError> {
        if self.phase == RenderPhase::Recording {
            return Err(RenderError::AlreadyRecording);
        }
        device.acquire_target()?;
        self.phase = RenderPhase::Recording;
        Ok(())
    }

    /// Clears color and depth to the scene background.
    pub fn clear_to_scene_color(&mut self, device: &mut dyn Device) -> Result<(), RenderError> {
        self.ensure_recording()?;
        device.clear(self.background, 1.0)?;
        Ok(())
    }

    /// Renders the scene once per active light.
    ///
    /// With [`Pass::All`] every entity is rendered; with [`Pass::Only`] only
    /// entities taking part in that pass are. Returns the number of entity
    /// render calls made.
    pub fn render_pass(
        &mut self,
        device: &mut dyn Device,
        scene: &Scene,
        pass: Pass,
    ) -> Result<usize, RenderError> {
        self.ensure_recording()?;

        let mut rendered = 0;
        for light in scene.lights() {
            for entity in scene.entities() {
                let passes = entity.passes();
                if !pass.includes(passes) {
                    continue;
                }
                let kind = match pass {
                    Pass::Only(kind) => kind,
                    Pass::All => passes.first().copied().unwrap_or(PassKind::Lighting),
                };

                let mut ctx = PassContext::new(device, &self.view, light, kind);
                entity.render(&mut ctx)?;
                rendered += 1;
            }
        }
        Ok(rendered)
    }

    /// Stops recording and releases the target, presenting it if asked.
    pub fn end_render(&mut self, device: &mut dyn Device, present: bool) -> Result<(), RenderError> {
        self.ensure_recording()?;
        self.phase = RenderPhase::Idle;
        device.release_target(present)?;
        Ok(())
    }

    fn ensure_recording(&self) -> Result<(), RenderError> {
        if self.phase != RenderPhase::Recording {
            return Err(RenderError::NotRecording);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DeviceError, InitError};
    use crate::gfx::device::headless::HeadlessDevice;
    use crate::gfx::scene::{Entity, FrameContext, InitContext, Light};
    use cgmath::{InnerSpace, Transform, Zero};
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingEntity {
        calls: Rc<Cell<u32>>,
        passes: &'static [PassKind],
    }

    impl Entity for CountingEntity {
        fn type_name(&self) -> &'static str {
            "counting"
        }

        fn initialize(&mut self, _ctx: &mut InitContext<'_>) -> Result<(), InitError> {
            Ok(())
        }

        fn update(&mut self, _frame: &FrameContext) -> bool {
            false
        }

        fn render(&self, _pass: &mut PassContext<'_>) -> Result<(), RenderError> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }

        fn passes(&self) -> &[PassKind] {
            self.passes
        }
    }

    fn camera() -> Camera {
        Camera::new(Vector3::new(0.0, 0.0, -3.0), Vector3::zero(), 1.0)
    }

    #[test]
    fn test_render_pass_before_begin_is_rejected() {
        let mut device = HeadlessDevice::new(16, 16);
        let scene = Scene::new();
        let mut camera = camera();
        assert_eq!(
            camera.render_pass(&mut device, &scene, Pass::All),
            Err(RenderError::NotRecording)
        );
        assert_eq!(
            camera.clear_to_scene_color(&mut device),
            Err(RenderError::NotRecording)
        );
        assert_eq!(
            camera.end_render(&mut device, true),
            Err(RenderError::NotRecording)
        );
    }

    #[test]
    fn test_double_begin_is_rejected() {
        let mut device = HeadlessDevice::new(16, 16);
        let mut camera = camera();
        camera.begin_render(&mut device).unwrap();
        assert_eq!(
            camera.begin_render(&mut device),
            Err(RenderError::AlreadyRecording)
        );
        camera.end_render(&mut device, true).unwrap();
        assert_eq!(device.frames_presented(), 1);
        camera.begin_render(&mut device).unwrap();
        assert!(camera.is_recording());
    }

    #[test]
    fn test_failed_acquire_stays_idle() {
        let mut device = HeadlessDevice::new(16, 16);
        device.acquire_target().unwrap();
        let mut camera = camera();
        assert_eq!(
            camera.begin_render(&mut device),
            Err(RenderError::Device(DeviceError::TargetBusy))
        );
        assert_eq!(camera.phase(), RenderPhase::Idle);
    }

    #[test]
    fn test_render_pass_runs_once_per_light() {
        let mut device = HeadlessDevice::new(16, 16);
        let mut resources = crate::gfx::resources::ResourceManager::new();
        let calls = Rc::new(Cell::new(0));
        let mut scene = Scene::new();
        {
            let mut ctx = InitContext::new(&mut device, &mut resources);
            let kinds: [&'static [PassKind]; 2] = [&[PassKind::Lighting], &[PassKind::Emissive]];
            for passes in kinds {
                let entity = CountingEntity {
                    calls: calls.clone(),
                    passes,
                };
                scene.insert(Box::new(entity), &mut ctx).unwrap();
            }
        }
        scene.create_light(Light::white(Vector3::new(0.0, 0.0, -1.0)));
        scene.create_light(Light::white(Vector3::new(1.0, 0.0, -1.0)));

        let mut camera = camera();
        camera.begin_render(&mut device).unwrap();
        camera.clear_to_scene_color(&mut device).unwrap();
        assert_eq!(camera.render_pass(&mut device, &scene, Pass::All), Ok(4));
        assert_eq!(
            camera.render_pass(&mut device, &scene, Pass::Only(PassKind::Emissive)),
            Ok(2)
        );
        camera.end_render(&mut device, false).unwrap();
        assert_eq!(calls.get(), 6);
        assert_eq!(device.frames_presented(), 0);
    }

    #[test]
    fn test_update_matrices_is_explicit() {
        let mut camera = camera();
        let before = *camera.view();
        camera.position = Vector3::new(0.0, 5.0, -5.0);
        assert_eq!(*camera.view(), before);
        camera.update_matrices();
        assert_ne!(*camera.view(), before);

        let target_in_view = camera
            .view()
            .view
            .transform_point(Point3::new(0.0, 0.0, 0.0));
        assert!(target_in_view.z < 0.0);
        assert!(Vector3::new(target_in_view.x, target_in_view.y, 0.0).magnitude() < 1e-5);
    }
}
