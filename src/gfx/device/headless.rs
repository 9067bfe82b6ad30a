//! In-memory device.
//!
//! Runs the full shader contract without producing an image: every draw
//! executes the vertex shader for each referenced vertex and the pixel shader
//! once at the centroid of each triangle. The results are kept per frame so
//! callers can inspect what a real rasterizer would have been fed.

use cgmath::{Vector4, Zero};

use crate::error::DeviceError;
use crate::gfx::scene::vertex::VertexLayout;
use crate::gfx::shader::{interpolate, PixelOutput, VertexOutput};

use super::{DrawCall, Device, IndexBuffer, RenderState, VertexBuffer, VertexDeclaration};

/// What one draw call produced.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub textures_bound: usize,
    pub render_state: RenderState,
    /// Vertex shader output per vertex of the bound buffer.
    pub vertex_outputs: Vec<VertexOutput>,
    /// Pixel shader color at each triangle centroid; `None` when discarded.
    pub centroid_colors: Vec<Option<Vector4<f32>>>,
}

/// Device that shades triangle centroids instead of rasterizing.
#[derive(Debug)]
pub struct HeadlessDevice {
    width: u32,
    height: u32,
    target_acquired: bool,
    render_state: RenderState,
    clear_color: Vector4<f32>,
    draws: Vec<DrawRecord>,
    frames_presented: u64,
    allocations: usize,
    fail_after: Option<usize>,
}

impl HeadlessDevice {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            target_acquired: false,
            render_state: RenderState::default(),
            clear_color: Vector4::zero(),
            draws: Vec::new(),
            frames_presented: 0,
            allocations: 0,
            fail_after: None,
        }
    }

    /// Makes every allocation after the first `count` fail.
    pub fn fail_allocations_after(&mut self, count: usize) {
        self.fail_after = Some(self.allocations + count);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn is_target_acquired(&self) -> bool {
        self.target_acquired
    }

    /// Draws issued since the target was last acquired.
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn clear_color(&self) -> Vector4<f32> {
        self.clear_color
    }

    pub fn render_state(&self) -> RenderState {
        self.render_state
    }

    fn allocate(&mut self) -> bool {
        if let Some(limit) = self.fail_after {
            if self.allocations >= limit {
                return false;
            }
        }
        self.allocations += 1;
        true
    }
}

impl Device for HeadlessDevice {
    fn create_vertex_declaration(
        &mut self,
        layout: VertexLayout,
    ) -> Result<VertexDeclaration, DeviceError> {
        if !self.allocate() {
            return Err(DeviceError::VertexFormatCreation {
                stride: layout.stride(),
            });
        }
        Ok(VertexDeclaration::new(layout))
    }

    fn create_vertex_buffer(
        &mut self,
        declaration: &VertexDeclaration,
        vertex_count: usize,
    ) -> Result<VertexBuffer, DeviceError> {
        if !self.allocate() {
            return Err(DeviceError::BufferAllocation {
                kind: "vertex",
                len: vertex_count,
            });
        }
        Ok(VertexBuffer::new(*declaration, vertex_count))
    }

    fn create_index_buffer(&mut self, index_count: usize) -> Result<IndexBuffer, DeviceError> {
        if !self.allocate() {
            return Err(DeviceError::BufferAllocation {
                kind: "index",
                len: index_count,
            });
        }
        Ok(IndexBuffer::new(index_count))
    }

    fn set_render_state(&mut self, state: RenderState) {
        self.render_state = state;
    }

    fn draw_indexed(&mut self, call: &DrawCall<'_>) -> Result<(), DeviceError> {
        if !self.target_acquired {
            return Err(DeviceError::TargetNotAcquired);
        }
        if call.vertices.layout() != call.shaders.input_layout() {
            return Err(DeviceError::LayoutMismatch);
        }

        let vertex_count = call.vertices.vertex_count();
        let vertex_shader = call.shaders.vertex();
        let vertex_outputs: Vec<VertexOutput> = (0..vertex_count)
            .map(|i| vertex_shader.execute(&call.vertices.vertex(i), call.constants))
            .collect();

        let types = call.shaders.interpolants();
        let pixel_shader = call.shaders.pixel();
        let third = 1.0 / 3.0;
        let mut centroid_colors = Vec::with_capacity(call.indices.index_count() / 3);

        let fetch = |index: u32| {
            vertex_outputs
                .get(index as usize)
                .ok_or(DeviceError::IndexOutOfRange {
                    index,
                    vertex_count,
                })
        };

        let textures = call.textures.with_sampler(self.render_state.sampler);
        for triangle in call.indices.indices().chunks_exact(3) {
            let corners = [fetch(triangle[0])?, fetch(triangle[1])?, fetch(triangle[2])?];
            let input = interpolate(corners, types, [third; 3]);
            let mut out = PixelOutput::default();
            let kept = pixel_shader.execute(&input, call.constants, &textures, &mut out);
            centroid_colors.push(kept.then_some(out.color));
        }

        self.draws.push(DrawRecord {
            vertex_count,
            triangle_count: centroid_colors.len(),
            textures_bound: call.textures.bound_count(),
            render_state: self.render_state,
            vertex_outputs,
            centroid_colors,
        });
        Ok(())
    }

    fn acquire_target(&mut self) -> Result<(), DeviceError> {
        if self.target_acquired {
            return Err(DeviceError::TargetBusy);
        }
        self.target_acquired = true;
        self.draws.clear();
        Ok(())
    }

    fn clear(&mut self, color: Vector4<f32>, _depth: f32) -> Result<(), DeviceError> {
        if !self.target_acquired {
            return Err(DeviceError::TargetNotAcquired);
        }
        self.clear_color = color;
        Ok(())
    }

    fn release_target(&mut self, present: bool) -> Result<(), DeviceError> {
        if !self.target_acquired {
            return Err(DeviceError::TargetNotAcquired);
        }
        self.target_acquired = false;
        if present {
            self.frames_presented += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_failure_injection() {
        let mut device = HeadlessDevice::new(64, 64);
        device.fail_allocations_after(1);
        let decl = device
            .create_vertex_declaration(VertexLayout::POSITION)
            .unwrap();
        assert!(matches!(
            device.create_vertex_buffer(&decl, 3),
            Err(DeviceError::BufferAllocation { kind: "vertex", .. })
        ));
    }

    #[test]
    fn test_target_acquire_release_cycle() {
        let mut device = HeadlessDevice::new(64, 64);
        assert_eq!(device.clear(Vector4::zero(), 1.0), Err(DeviceError::TargetNotAcquired));
        device.acquire_target().unwrap();
        assert_eq!(device.acquire_target(), Err(DeviceError::TargetBusy));
        device.release_target(true).unwrap();
        device.acquire_target().unwrap();
        device.release_target(false).unwrap();
        assert_eq!(device.frames_presented(), 1);
    }
}
