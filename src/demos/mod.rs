//! # Demo Scenes
//!
//! Each demo builds a [`Scene`] with one built-in entity, a light and an
//! orbiting camera. [`DemoScene::frame`] runs one full frame: input, camera,
//! entity updates and the BeginRender/RenderPass/EndRender sequence.
//!
//! Controls: drag with the left button to orbit, scroll to zoom, move the
//! pointer without a button held to move the light.

mod bump;
mod env_sphere;
mod fractal;
mod textures;

use std::time::Duration;

use cgmath::Vector3;

use crate::config::{DemoConfig, DemoKind};
use crate::error::{InitError, RenderError};
use crate::gfx::camera::{Camera, OrbitController};
use crate::gfx::device::Device;
use crate::gfx::entities::register_builtin_types;
use crate::gfx::resources::ResourceManager;
use crate::gfx::scene::{FrameContext, InitContext, Light, LightHandle, Pass, Scene};
use crate::gfx::shader::bump::BumpMode;
use crate::input::Input;
use crate::performance::{PerformanceMetrics, PerformanceMonitor};

pub use textures::{bump_diffuse, bump_normal_map, sky_cube};

/// Camera rig and light placement chosen by a demo.
pub(crate) struct DemoRig {
    pub orbit: OrbitController,
    pub light: Light,
    /// World units per pointer unit when moving the light.
    pub light_speed: f32,
}

/// A populated scene plus everything needed to render it frame by frame.
pub struct DemoScene {
    kind: DemoKind,
    scene: Scene,
    // Entity texture handles point into this registry.
    resources: ResourceManager,
    camera: Camera,
    orbit: OrbitController,
    light: LightHandle,
    light_speed: f32,
    monitor: PerformanceMonitor,
}

impl DemoScene {
    /// Builds the demo selected by `config`.
    pub fn build(config: &DemoConfig, device: &mut dyn Device) -> Result<Self, InitError> {
        let mut resources = ResourceManager::new();
        let mut scene = Scene::new();
        register_builtin_types(&mut scene);

        let rig = {
            let mut ctx = InitContext::new(device, &mut resources);
            match config.demo {
                DemoKind::EnvSphere => env_sphere::populate(config, &mut scene, &mut ctx)?,
                DemoKind::NormalMap => bump::populate(BumpMode::Normal, &mut scene, &mut ctx)?,
                DemoKind::Parallax => bump::populate(BumpMode::Parallax, &mut scene, &mut ctx)?,
                DemoKind::Fractal => fractal::populate(&mut scene, &mut ctx)?,
            }
        };
        let light = scene.create_light(rig.light);

        let mut camera = Camera::new(rig.orbit.eye(), rig.orbit.target, config.aspect());
        camera.background = config.background;
        rig.orbit.apply(&mut camera);

        log::info!(
            "Demo `{}` ready: {} entities, {} lights",
            config.demo,
            scene.entity_count(),
            scene.light_count()
        );

        Ok(Self {
            kind: config.demo,
            scene,
            resources,
            camera,
            orbit: rig.orbit,
            light,
            light_speed: rig.light_speed,
            monitor: PerformanceMonitor::new(),
        })
    }

    /// Runs one frame and returns the number of entity render calls.
    ///
    /// `input` must already have been updated for this frame. If anything
    /// fails after the target was acquired, the frame is ended without
    /// presenting before the error is returned.
    pub fn frame(
        &mut self,
        device: &mut dyn Device,
        input: &mut dyn Input,
        frame: &FrameContext,
    ) -> Result<usize, RenderError> {
        let pointer = input.pointer_frame();
        self.orbit.update(frame.delta_time, &pointer);
        self.orbit.apply(&mut self.camera);

        if !pointer.primary_down && (pointer.dx != 0.0 || pointer.dy != 0.0) {
            self.move_light(pointer.dx, pointer.dy);
        }

        self.scene.update(frame);

        self.camera.begin_render(device)?;
        match self.record(device) {
            Ok(count) => {
                self.camera.end_render(device, true)?;
                let frame_time = Duration::try_from_secs_f32(frame.delta_time).unwrap_or_default();
                self.monitor.record_frame(frame_time, count);
                Ok(count)
            }
            Err(err) => {
                if let Err(end_err) = self.camera.end_render(device, false) {
                    log::warn!("Failed to end aborted frame: {}", end_err);
                }
                Err(err)
            }
        }
    }

    fn record(&mut self, device: &mut dyn Device) -> Result<usize, RenderError> {
        self.camera.clear_to_scene_color(device)?;
        self.camera.render_pass(device, &self.scene, Pass::All)
    }

    fn move_light(&mut self, dx: f32, dy: f32) {
        if let Some(light) = self.scene.get_light_mut(self.light) {
            light.position += Vector3::new(dx, -dy, 0.0) * self.light_speed;
        }
    }

    /// Window caption: demo name and frame rate.
    pub fn caption(&self) -> String {
        format!("tessera: {} ({:.1} fps)", self.kind, self.monitor.metrics().fps)
    }

    pub fn kind(&self) -> DemoKind {
        self.kind
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        self.monitor.metrics()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    pub fn light(&self) -> Option<&Light> {
        self.scene.get_light(self.light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeviceError;
    use crate::gfx::device::headless::HeadlessDevice;
    use crate::gfx::scene::{Entity, PassContext};
    use crate::input::{ConsoleInput, MouseButton, PointerSource, PolledInput, RawEvent};

    /// Entity whose draw always fails.
    struct BrokenEntity;

    impl Entity for BrokenEntity {
        fn type_name(&self) -> &'static str {
            "broken"
        }

        fn initialize(&mut self, _ctx: &mut InitContext<'_>) -> Result<(), InitError> {
            Ok(())
        }

        fn update(&mut self, _frame: &FrameContext) -> bool {
            false
        }

        fn render(&self, _pass: &mut PassContext<'_>) -> Result<(), RenderError> {
            Err(RenderError::Device(DeviceError::LayoutMismatch))
        }
    }

    fn frame_context() -> FrameContext {
        FrameContext {
            delta_time: 1.0 / 60.0,
            elapsed: 1.0 / 60.0,
        }
    }

    #[test]
    fn test_every_demo_builds_and_presents() {
        for kind in DemoKind::ALL {
            let config = DemoConfig {
                demo: kind,
                sphere_stacks: 6,
                sphere_slices: 6,
                ..DemoConfig::default()
            };
            let mut device = HeadlessDevice::new(64, 48);
            let mut demo = DemoScene::build(&config, &mut device).unwrap();
            let mut input = ConsoleInput;

            assert_eq!(demo.frame(&mut device, &mut input, &frame_context()), Ok(1));
            assert_eq!(device.frames_presented(), 1, "{} did not present", kind);
            assert_eq!(device.clear_color(), config.background);
            assert!(!demo.camera().is_recording());
        }
    }

    #[test]
    fn test_pointer_moves_light_unless_dragging() {
        let config = DemoConfig {
            demo: DemoKind::NormalMap,
            ..DemoConfig::default()
        };
        let mut device = HeadlessDevice::new(64, 48);
        let mut demo = DemoScene::build(&config, &mut device).unwrap();
        let start = demo.light().unwrap().position;

        let mut input = PolledInput::new("pointer", PointerSource::new());
        input.initialize().unwrap();
        input.feed(RawEvent::Motion { dx: 10.0, dy: 0.0 });
        input.update();
        demo.frame(&mut device, &mut input, &frame_context()).unwrap();
        let moved = demo.light().unwrap().position;
        assert!(moved.x > start.x);

        let eye_before = demo.camera().position;
        input.feed(RawEvent::Button {
            button: MouseButton::LEFT,
            pressed: true,
        });
        input.feed(RawEvent::Motion { dx: 10.0, dy: 0.0 });
        input.update();
        demo.frame(&mut device, &mut input, &frame_context()).unwrap();
        assert_eq!(demo.light().unwrap().position, moved);
        assert_ne!(demo.camera().position, eye_before);
    }

    #[test]
    fn test_failed_frame_is_not_presented() {
        let config = DemoConfig {
            demo: DemoKind::Fractal,
            ..DemoConfig::default()
        };
        let mut device = HeadlessDevice::new(64, 48);
        let mut demo = DemoScene::build(&config, &mut device).unwrap();
        let mut input = ConsoleInput;

        // Leaving the camera recording makes the next begin fail.
        demo.camera_mut().begin_render(&mut device).unwrap();
        assert_eq!(
            demo.frame(&mut device, &mut input, &frame_context()),
            Err(RenderError::AlreadyRecording)
        );
        assert_eq!(device.frames_presented(), 0);
    }

    #[test]
    fn test_render_failure_ends_frame_without_presenting() {
        let config = DemoConfig {
            demo: DemoKind::Fractal,
            ..DemoConfig::default()
        };
        let mut device = HeadlessDevice::new(64, 48);
        let mut demo = DemoScene::build(&config, &mut device).unwrap();
        {
            let mut ctx = InitContext::new(&mut device, &mut demo.resources);
            demo.scene.insert(Box::new(BrokenEntity), &mut ctx).unwrap();
        }
        let mut input = ConsoleInput;

        assert_eq!(
            demo.frame(&mut device, &mut input, &frame_context()),
            Err(RenderError::Device(DeviceError::LayoutMismatch))
        );
        assert_eq!(device.frames_presented(), 0);
        assert!(!demo.camera().is_recording());
        assert!(!device.is_target_acquired());

        // The next frame can begin again.
        assert!(demo.camera_mut().begin_render(&mut device).is_ok());
    }

    #[test]
    fn test_non_finite_delta_does_not_panic() {
        let mut device = HeadlessDevice::new(64, 48);
        let config = DemoConfig {
            demo: DemoKind::Fractal,
            ..DemoConfig::default()
        };
        let mut demo = DemoScene::build(&config, &mut device).unwrap();
        let mut input = ConsoleInput;
        for delta_time in [f32::INFINITY, -1.0] {
            let frame = FrameContext {
                delta_time,
                elapsed: 1.0,
            };
            assert!(demo.frame(&mut device, &mut input, &frame).is_ok());
        }
        assert_eq!(demo.metrics().total_frames, 2);
    }

    #[test]
    fn test_caption_names_demo() {
        let mut device = HeadlessDevice::new(64, 48);
        let demo = DemoScene::build(&DemoConfig::default(), &mut device).unwrap();
        assert!(demo.caption().starts_with("tessera: env-sphere"));
    }
}
