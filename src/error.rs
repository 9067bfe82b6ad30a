//! # Error Types
//!
//! Every fallible operation in the engine reports one of the enums below.
//! Initialization failures abort entity creation, render errors flag misuse
//! of the camera's recording window, and input errors stay inside the input
//! backends where they are recovered or degraded.

use thiserror::Error;

use crate::gfx::shader::RegisterType;

/// Failure reported by the rendering device.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Failed to create vertex format with stride {stride}")]
    VertexFormatCreation { stride: usize },
    #[error("Failed to allocate {kind} buffer of {len} elements")]
    BufferAllocation { kind: &'static str, len: usize },
    #[error("Vertex buffer layout does not match the bound vertex shader input")]
    LayoutMismatch,
    #[error("Index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("Render target is already acquired")]
    TargetBusy,
    #[error("Render target was not acquired")]
    TargetNotAcquired,
}

/// Failure reported by the resource manager.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Resource `{0}` not found")]
    NotFound(String),
    #[error("Resource `{name}` is a {found}, expected a {expected}")]
    WrongType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Resource `{name}` could not be decoded: {reason}")]
    Decode { name: String, reason: String },
}

/// Output/input register disagreement between a vertex and pixel shader.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShaderError {
    #[error("Interpolant {slot}: vertex shader produces {produced:?}, pixel shader expects {expected:?}")]
    InterpolantMismatch {
        slot: usize,
        produced: Option<RegisterType>,
        expected: RegisterType,
    },
}

/// Reason an entity failed to initialize.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Mesh layout does not match the layout consumed by the vertex shader")]
    LayoutMismatch,
    #[error("No entity type registered under `{0}`")]
    UnknownEntityType(String),
    #[error("Device failure during initialization")]
    Device(#[from] DeviceError),
    #[error("Resource failure during initialization")]
    Resource(#[from] ResourceError),
    #[error("Shader pair is inconsistent")]
    Shader(#[from] ShaderError),
}

/// Misuse of the camera's render sequence, or a device failure inside it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("BeginRender called while a render is already in progress")]
    AlreadyRecording,
    #[error("Render call issued outside a BeginRender/EndRender window")]
    NotRecording,
    #[error("Device failure during rendering")]
    Device(#[from] DeviceError),
}

/// Input device state reported by a backend source.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    #[error("Input device is not acquired")]
    NotAcquired,
    #[error("Input device is unavailable")]
    Unavailable,
}

/// Invalid configuration value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown input backend `{0}` (expected pointer, x11 or console)")]
    UnknownInputBackend(String),
    #[error("Unknown demo `{0}` (expected env-sphere, normal-map, parallax or fractal)")]
    UnknownDemo(String),
    #[error("Invalid value `{value}` for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Failure that stops the demo application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Demo scene failed to initialize")]
    Init(#[from] InitError),
    #[error("Frame failed")]
    Render(#[from] RenderError),
    #[error("Window could not be created")]
    Window(#[from] winit::error::OsError),
    #[error("Event loop failed")]
    EventLoop(#[from] winit::error::EventLoopError),
}
