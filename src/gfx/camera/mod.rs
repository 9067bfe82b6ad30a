pub mod camera;
pub mod camera_controller;
pub mod camera_utils;

// Re-export main types
pub use camera::{Camera, RenderPhase};
pub use camera_controller::{OrbitBounds, OrbitController};
pub use camera_utils::{orbit_eye_position, CameraView};
