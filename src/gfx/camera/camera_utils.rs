use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero};

/// Matrices and eye position captured for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub position: Vector3<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
}

impl CameraView {
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view
    }

    /// Camera position as a shader vector constant (`w = 1`).
    pub fn position_constant(&self) -> Vector4<f32> {
        self.position.extend(1.0)
    }

    /// Unit direction from `point` toward the eye.
    pub fn direction_to_eye(&self, point: Vector3<f32>) -> Vector3<f32> {
        let d = self.position - point;
        if d.magnitude2() > 0.0 {
            d.normalize()
        } else {
            Vector3::zero()
        }
    }
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
        }
    }
}

/// Eye position on a sphere of `distance` around `target` (Y up).
pub fn orbit_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        -distance * yaw.cos() * pitch.cos(),
    ) + target
}
