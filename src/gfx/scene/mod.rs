//! # Scene Management Module
//!
//! Entities, lights and the registry that owns them.
//!
//! ## Key Components
//!
//! - [`Scene`] - registry of entity factories, live entities and lights
//! - [`Entity`] - capability set {initialize, update, render} of a scene object
//! - [`Mesh`] - uploaded vertex and index buffers
//! - [`Light`] - position and color of a point light
//! - [`vertex`] - vertex formats and layouts
//!
//! ## Usage
//!
//! ```no_run
//! use tessera::gfx::device::headless::HeadlessDevice;
//! use tessera::gfx::entities::register_builtin_types;
//! use tessera::gfx::resources::ResourceManager;
//! use tessera::gfx::scene::{InitContext, Scene};
//!
//! let mut device = HeadlessDevice::new(640, 480);
//! let mut resources = ResourceManager::new();
//! let mut scene = Scene::new();
//! register_builtin_types(&mut scene);
//!
//! let mut ctx = InitContext::new(&mut device, &mut resources);
//! let quad = scene.create("fractal_quad", &mut ctx).unwrap();
//! ```

pub mod entity;
pub mod light;
pub mod mesh;
pub mod scene;
pub mod vertex;

pub use entity::{Entity, FrameContext, InitContext, Pass, PassContext, PassKind};
pub use light::Light;
pub use mesh::Mesh;
pub use scene::{EntityHandle, LightHandle, Scene, SceneStatistics};
pub use vertex::{PositionVertex, SurfaceVertex, TexturedVertex, VertexFormat, VertexLayout};
