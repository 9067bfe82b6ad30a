//! # Primitive Shape Generation
//!
//! All shapes are centered at the origin.

use std::f32::consts::PI;

use super::GeometryData;
use crate::error::InitError;
use crate::gfx::scene::vertex::{PositionVertex, SurfaceVertex, TexturedVertex};

/// Index pattern of one quad: corners 0 top-left, 1 top-right, 2 bottom-left,
/// 3 bottom-right.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 1, 3, 2];

fn sphere_point(radius: f32, u: f32, v: f32) -> [f32; 3] {
    let (sin_v, cos_v) = (v * PI).sin_cos();
    let (sin_u, cos_u) = (u * 2.0 * PI).sin_cos();
    [radius * sin_v * cos_u, radius * cos_v, radius * sin_v * sin_u]
}

/// Generate a sphere of `radius` split into `stacks x slices` quads.
///
/// `u` runs around the sphere (longitude `2πu`) across slices and `v` runs
/// from the north pole (colatitude `πv`) across stacks. Each quad gets its
/// own four vertices, so nothing is shared across quad boundaries; the
/// result has `stacks * slices * 4` vertices and `stacks * slices * 6`
/// indices. No texture coordinates or normals are stored: the surface normal
/// of an origin-centered sphere is its normalized position.
pub fn generate_sphere(
    radius: f32,
    stacks: u32,
    slices: u32,
) -> Result<GeometryData<PositionVertex>, InitError> {
    if stacks == 0 || slices == 0 {
        return Err(InitError::InvalidParameter {
            name: "stacks/slices",
            reason: format!("need at least one of each, got {stacks}x{slices}"),
        });
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(InitError::InvalidParameter {
            name: "radius",
            reason: format!("must be positive, got {radius}"),
        });
    }

    let quads = (stacks as usize)
        .checked_mul(slices as usize)
        .filter(|&q| q.checked_mul(4).is_some_and(|v| u32::try_from(v).is_ok()))
        .ok_or_else(|| InitError::InvalidParameter {
            name: "stacks/slices",
            reason: format!("{stacks}x{slices} quads exceed 32-bit vertex indices"),
        })?;
    let mut data = GeometryData::new();
    data.vertices.reserve(quads * 4);
    data.indices.reserve(quads * 6);

    let du = 1.0 / slices as f32;
    let dv = 1.0 / stacks as f32;

    for stack in 0..stacks {
        let v0 = stack as f32 * dv;
        let v1 = v0 + dv;
        for slice in 0..slices {
            let u0 = slice as f32 * du;
            let u1 = u0 + du;

            let base = data.vertices.len() as u32;
            for (u, v) in [(u0, v0), (u1, v0), (u0, v1), (u1, v1)] {
                data.vertices.push(PositionVertex {
                    position: sphere_point(radius, u, v),
                });
            }
            data.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        }
    }

    Ok(data)
}

/// Generate a single triangle in the XY plane facing -Z.
///
/// The triangle spans `[-size, size]` on both axes; texture coordinates cover
/// the unit square with `v` pointing down.
pub fn generate_triangle(size: f32) -> GeometryData<SurfaceVertex> {
    let normal = [0.0, 0.0, -1.0];
    let mut data = GeometryData::new();
    data.vertices = vec![
        SurfaceVertex {
            position: [-size, -size, 0.0],
            tex_coord: [0.0, 1.0],
            normal,
        },
        SurfaceVertex {
            position: [0.0, size, 0.0],
            tex_coord: [0.5, 0.0],
            normal,
        },
        SurfaceVertex {
            position: [size, -size, 0.0],
            tex_coord: [1.0, 1.0],
            normal,
        },
    ];
    data.indices = vec![0, 1, 2];
    data
}

/// Generate a `width x height` rectangle in the XY plane.
pub fn generate_quad(width: f32, height: f32) -> GeometryData<TexturedVertex> {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let mut data = GeometryData::new();
    data.vertices = vec![
        TexturedVertex {
            position: [-hw, hh, 0.0],
            tex_coord: [0.0, 0.0],
        },
        TexturedVertex {
            position: [hw, hh, 0.0],
            tex_coord: [1.0, 0.0],
        },
        TexturedVertex {
            position: [-hw, -hh, 0.0],
            tex_coord: [0.0, 1.0],
        },
        TexturedVertex {
            position: [hw, -hh, 0.0],
            tex_coord: [1.0, 1.0],
        },
    ];
    data.indices = QUAD_INDICES.to_vec();
    data
}
