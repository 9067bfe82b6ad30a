//! Demo application: owns the device, the input backend and the running demo.
//!
//! Runs headless for a fixed number of frames, or inside a winit window that
//! supplies input events and shows the frame rate in its title.

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::DemoConfig;
use crate::demos::DemoScene;
use crate::error::{AppError, RenderError};
use crate::gfx::device::headless::HeadlessDevice;
use crate::gfx::scene::FrameContext;
use crate::input::platform::winit::{translate_device_event, translate_window_event};
use crate::input::{create_input, ConsoleInput, Input, Key, RawEvent};

/// Timestep used when running without a window.
const HEADLESS_DELTA: f32 = 1.0 / 60.0;

/// Frames between caption log lines.
const LOG_INTERVAL: u64 = 60;

pub struct DemoApp {
    config: DemoConfig,
    device: HeadlessDevice,
    input: Box<dyn Input>,
    demo: DemoScene,
    elapsed: f32,
    frames: u64,
    quit: bool,
}

impl DemoApp {
    /// Builds the configured demo and initializes its input backend.
    ///
    /// An input backend that fails to initialize is replaced by the console
    /// backend so the demo still runs.
    pub fn new(config: DemoConfig) -> Result<Self, AppError> {
        let mut device = HeadlessDevice::new(config.width, config.height);
        let demo = DemoScene::build(&config, &mut device)?;

        let mut input = create_input(config.input);
        if let Err(err) = input.initialize() {
            log::warn!(
                "Input backend `{}` unavailable ({}), running without input",
                input.name(),
                err
            );
            input = Box::new(ConsoleInput);
        }

        log::info!(
            "Running `{}` at {}x{} with `{}` input",
            config.demo,
            config.width,
            config.height,
            input.name()
        );

        Ok(Self {
            config,
            device,
            input,
            demo,
            elapsed: 0.0,
            frames: 0,
            quit: false,
        })
    }

    /// Polls input and renders one frame.
    pub fn step(&mut self, delta_time: f32) -> Result<usize, RenderError> {
        self.input.update();
        if self.input.key_down(Key::Escape) {
            self.quit = true;
        }

        self.elapsed += delta_time;
        let frame = FrameContext {
            delta_time,
            elapsed: self.elapsed,
        };
        let rendered = self.demo.frame(&mut self.device, self.input.as_mut(), &frame)?;

        self.frames += 1;
        if self.frames % LOG_INTERVAL == 0 {
            log::info!("{}", self.demo.caption());
        }
        Ok(rendered)
    }

    /// Renders `config.frames` frames at a fixed timestep.
    pub fn run_headless(&mut self) -> Result<(), AppError> {
        for _ in 0..self.config.frames {
            self.step(HEADLESS_DELTA)?;
            if self.quit {
                break;
            }
        }

        let metrics = self.demo.metrics();
        log::info!(
            "Finished after {} frames ({} presented, {} draws last frame)",
            self.frames,
            self.device.frames_presented(),
            metrics.draw_calls
        );
        Ok(())
    }

    /// Opens a window and renders until it is closed or Escape is pressed.
    pub fn run_windowed(self) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut handler = WindowedApp {
            app: self,
            window: None,
            last_frame: Instant::now(),
            error: None,
        };
        event_loop.run_app(&mut handler)?;

        match handler.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Runs headless or windowed as configured.
    pub fn run(mut self) -> Result<(), AppError> {
        if self.config.windowed {
            self.run_windowed()
        } else {
            self.run_headless()
        }
    }

    pub fn feed(&mut self, event: RawEvent) {
        self.input.feed(event);
    }

    pub fn demo(&self) -> &DemoScene {
        &self.demo
    }

    pub fn device(&self) -> &HeadlessDevice {
        &self.device
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}

struct WindowedApp {
    app: DemoApp,
    window: Option<Arc<Window>>,
    last_frame: Instant,
    error: Option<AppError>,
}

impl WindowedApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        log::error!("{}", err);
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for WindowedApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.app.demo.caption())
            .with_inner_size(LogicalSize::new(self.app.config.width, self.app.config.height));
        match event_loop.create_window(attributes) {
            Ok(window) => {
                self.window = Some(Arc::new(window));
                self.last_frame = Instant::now();
            }
            Err(err) => self.fail(event_loop, err.into()),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let Some(raw) = translate_window_event(&event) {
            self.app.feed(raw);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.app.demo.camera_mut().resize_projection(width, height);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = now.duration_since(self.last_frame).as_secs_f32();
                self.last_frame = now;

                if let Err(err) = self.app.step(delta_time) {
                    self.fail(event_loop, err.into());
                    return;
                }
                if let Some(window) = &self.window {
                    window.set_title(&self.app.demo.caption());
                }
                if self.app.quit {
                    event_loop.exit();
                }
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        // Window events already carry keys, buttons and the wheel.
        if let Some(motion @ RawEvent::Motion { .. }) = translate_device_event(&event) {
            self.app.feed(motion);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
