use cgmath::{Vector3, Zero};

use crate::input::PointerFrame;

use super::camera::Camera;
use super::camera_utils::orbit_eye_position;

/// Limits applied to an [`OrbitController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitBounds {
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitBounds {
    fn default() -> Self {
        Self {
            min_pitch: -std::f32::consts::FRAC_PI_2 + 0.1,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.1,
            min_distance: 1.5,
            max_distance: 20.0,
        }
    }
}

/// Orbits a camera around a target point.
///
/// Dragging with the primary button rotates, the wheel zooms, and an
/// optional auto-rotation spins the camera around the Y axis every frame.
#[derive(Debug, Clone)]
pub struct OrbitController {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub target: Vector3<f32>,
    /// Radians per second added to `yaw`.
    pub auto_rotate_speed: f32,
    /// Radians per pointer unit while dragging.
    pub rotate_speed: f32,
    /// Distance per wheel line.
    pub zoom_speed: f32,
    pub bounds: OrbitBounds,
}

impl OrbitController {
    pub fn new(distance: f32) -> Self {
        let bounds = OrbitBounds::default();
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: distance.clamp(bounds.min_distance, bounds.max_distance),
            target: Vector3::zero(),
            auto_rotate_speed: 0.0,
            rotate_speed: 0.01,
            zoom_speed: 0.5,
            bounds,
        }
    }

    pub fn with_auto_rotate(mut self, radians_per_second: f32) -> Self {
        self.auto_rotate_speed = radians_per_second;
        self
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.yaw = (self.yaw + delta).rem_euclid(std::f32::consts::TAU);
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(self.bounds.min_pitch, self.bounds.max_pitch);
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(self.bounds.min_distance, self.bounds.max_distance);
    }

    pub fn add_distance(&mut self, delta: f32) {
        self.set_distance(self.distance + delta);
    }

    /// Advances the orbit by one frame. Returns true if the eye moved.
    pub fn update(&mut self, delta_time: f32, pointer: &PointerFrame) -> bool {
        let before = (self.yaw, self.pitch, self.distance);

        if self.auto_rotate_speed != 0.0 {
            self.add_yaw(self.auto_rotate_speed * delta_time);
        }
        if pointer.primary_down {
            self.add_yaw(-pointer.dx * self.rotate_speed);
            self.add_pitch(pointer.dy * self.rotate_speed);
        }
        if pointer.wheel != 0.0 {
            self.add_distance(-pointer.wheel * self.zoom_speed);
        }

        before != (self.yaw, self.pitch, self.distance)
    }

    pub fn eye(&self) -> Vector3<f32> {
        orbit_eye_position(self.pitch, self.yaw, self.distance, self.target)
    }

    /// Moves `camera` to the orbit eye and recomputes its matrices.
    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.eye();
        camera.target = self.target;
        camera.update_matrices();
    }
}
