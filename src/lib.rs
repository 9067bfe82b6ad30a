//! Tessera
//!
//! Demo scenes for a small software renderer: procedurally tessellated
//! meshes, CPU vertex and pixel shaders, a camera driving multi-pass
//! rendering over a device contract, and a polled input layer fed by winit.

pub mod app;
pub mod config;
pub mod demos;
pub mod error;
pub mod gfx;
pub mod input;
pub mod logging;
pub mod math;
pub mod performance;
pub mod prelude;

pub use app::DemoApp;
