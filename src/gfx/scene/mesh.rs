use crate::error::{DeviceError, InitError};
use crate::gfx::device::{Device, IndexBuffer, VertexBuffer};
use crate::gfx::geometry::GeometryData;
use crate::gfx::scene::vertex::{VertexFormat, VertexLayout};

/// Vertex and index buffers of one entity. Immutable once uploaded.
#[derive(Debug)]
pub struct Mesh {
    vertices: VertexBuffer,
    indices: IndexBuffer,
}

impl Mesh {
    /// Creates device buffers for `data` and fills them.
    ///
    /// Any device failure is returned as is; buffers created before the
    /// failure are dropped with the partial mesh.
    pub fn upload<V: VertexFormat>(
        device: &mut dyn Device,
        data: &GeometryData<V>,
    ) -> Result<Self, InitError> {
        if !data.is_valid() {
            return Err(InitError::InvalidParameter {
                name: "indices",
                reason: "index list does not form triangles over the vertices".into(),
            });
        }

        let declaration = device.create_vertex_declaration(V::LAYOUT)?;
        let mut vertices = device.create_vertex_buffer(&declaration, data.vertex_count())?;
        let floats = data.vertex_floats();
        let mapped = vertices.map();
        if mapped.len() != floats.len() {
            return Err(DeviceError::BufferAllocation {
                kind: "vertex",
                len: data.vertex_count(),
            }
            .into());
        }
        mapped.copy_from_slice(floats);

        let mut indices = device.create_index_buffer(data.indices.len())?;
        let mapped = indices.map();
        if mapped.len() != data.indices.len() {
            return Err(DeviceError::BufferAllocation {
                kind: "index",
                len: data.indices.len(),
            }
            .into());
        }
        mapped.copy_from_slice(&data.indices);

        log::debug!(
            "Uploaded mesh: {} vertices, {} triangles",
            data.vertex_count(),
            data.triangle_count()
        );

        Ok(Self { vertices, indices })
    }

    pub fn layout(&self) -> VertexLayout {
        self.vertices.layout()
    }

    pub fn vertex_buffer(&self) -> &VertexBuffer {
        &self.vertices
    }

    pub fn index_buffer(&self) -> &IndexBuffer {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.index_count() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::device::headless::HeadlessDevice;
    use crate::gfx::geometry::{generate_quad, generate_sphere};

    #[test]
    fn test_upload_copies_geometry() {
        let mut device = HeadlessDevice::new(32, 32);
        let quad = generate_quad(2.0, 2.0);
        let mesh = Mesh::upload(&mut device, &quad).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.index_buffer().indices(), &quad.indices[..]);
        assert_eq!(mesh.vertex_buffer().data(), quad.vertex_floats());
    }

    #[test]
    fn test_upload_failure_propagates() {
        let mut device = HeadlessDevice::new(32, 32);
        device.fail_allocations_after(2);
        let sphere = generate_sphere(1.0, 4, 4).unwrap();
        let err = Mesh::upload(&mut device, &sphere).unwrap_err();
        assert!(matches!(
            err,
            InitError::Device(DeviceError::BufferAllocation { kind: "index", .. })
        ));
    }

    #[test]
    fn test_upload_rejects_bad_indices() {
        let mut device = HeadlessDevice::new(32, 32);
        let mut quad = generate_quad(1.0, 1.0);
        quad.indices.push(7);
        assert!(matches!(
            Mesh::upload(&mut device, &quad),
            Err(InitError::InvalidParameter { .. })
        ));
    }
}
