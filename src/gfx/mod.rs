//! # Graphics Module
//!
//! Software shading pipeline: scene objects, the camera that renders them and
//! the device contract the rasterizer implements.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - perspective camera driving the
//!   BeginRender/RenderPass/EndRender sequence, plus an orbit controller
//! - **Device** ([`device`]) - buffer creation, render state and indexed
//!   draws; [`device::headless::HeadlessDevice`] runs it in memory
//! - **Scene Management** ([`scene`]) - entity registry, lights and meshes
//! - **Shaders** ([`shader`]) - vertex/pixel shader pairs with typed
//!   interpolants
//! - **Resources** ([`resources`]) - reference-counted 2D and cube textures
//! - **Geometry** ([`geometry`]) - procedural sphere, triangle and quad
//! - **Entities** ([`entities`]) - the built-in scene objects
//!
//! ## Usage
//!
//! ```no_run
//! use cgmath::{Vector3, Zero};
//! use tessera::gfx::camera::Camera;
//! use tessera::gfx::device::headless::HeadlessDevice;
//! use tessera::gfx::scene::{Pass, Scene};
//!
//! let mut device = HeadlessDevice::new(640, 480);
//! let scene = Scene::new();
//! let mut camera = Camera::new(Vector3::new(0.0, 0.0, -3.0), Vector3::zero(), device.aspect());
//!
//! camera.begin_render(&mut device).unwrap();
//! camera.clear_to_scene_color(&mut device).unwrap();
//! camera.render_pass(&mut device, &scene, Pass::All).unwrap();
//! camera.end_render(&mut device, true).unwrap();
//! ```

pub mod camera;
pub mod device;
pub mod entities;
pub mod geometry;
pub mod resources;
pub mod scene;
pub mod shader;
