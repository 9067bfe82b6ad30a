use cgmath::{Vector3, Vector4, Zero};

/// Point light. Entities read the light bound for the current pass and never
/// own it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vector3<f32>,
    /// RGBA color.
    pub color: Vector4<f32>,
}

impl Light {
    pub fn new(position: Vector3<f32>, color: Vector4<f32>) -> Self {
        Self { position, color }
    }

    pub fn white(position: Vector3<f32>) -> Self {
        Self::new(position, Vector4::new(1.0, 1.0, 1.0, 1.0))
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::white(Vector3::zero())
    }
}
