//! # Tessera Prelude
//!
//! Commonly used types for building scenes and driving frames.
//!
//! ```no_run
//! use tessera::prelude::*;
//!
//! let mut device = HeadlessDevice::new(640, 480);
//! let demo = DemoScene::build(&DemoConfig::default(), &mut device).unwrap();
//! println!("{}", demo.caption());
//! ```

pub use crate::app::DemoApp;
pub use crate::config::{DemoConfig, DemoKind};
pub use crate::demos::DemoScene;
pub use crate::error::{AppError, ConfigError, DeviceError, InitError, InputError, RenderError, ResourceError};

pub use crate::gfx::camera::{Camera, OrbitController};
pub use crate::gfx::device::headless::HeadlessDevice;
pub use crate::gfx::device::{Device, RenderState};
pub use crate::gfx::entities::{
    register_builtin_types, BumpTriangle, BumpTriangleParams, EnvSphere, EnvSphereParams,
    FractalQuad, FractalQuadParams, Transform,
};
pub use crate::gfx::resources::{CubeTexture, ResourceManager, Texture, Texture2D};
pub use crate::gfx::scene::{Entity, FrameContext, InitContext, Light, Pass, PassKind, Scene};
pub use crate::gfx::shader::bump::BumpMode;

pub use crate::input::{create_input, Input, InputBackendKind, Key, MouseButton};

// Re-export math types
pub use cgmath::{Vector2, Vector3, Vector4};
