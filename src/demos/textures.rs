//! Procedural textures registered by the demos.

use cgmath::{InnerSpace, Vector3};

use crate::gfx::resources::{CubeTexture, Texture2D};

/// Blue sky over a brown ground.
pub fn sky_cube(size: usize) -> CubeTexture {
    CubeTexture::sky_gradient(
        size,
        [0.25, 0.2, 0.15, 1.0],
        [0.85, 0.85, 0.9, 1.0],
        [0.2, 0.4, 0.85, 1.0],
    )
}

/// Warm checkerboard used as the bump demo's albedo.
pub fn bump_diffuse(size: usize) -> Texture2D {
    Texture2D::checker(size, 8, [0.9, 0.7, 0.4, 1.0], [0.5, 0.3, 0.2, 1.0])
}

/// Normal map of a grid of round bumps, height in alpha.
pub fn bump_normal_map(size: usize) -> Texture2D {
    let size = size.max(2);
    let cells = 4.0;
    let height = |x: f32, y: f32| -> f32 {
        let u = (x / size as f32 * cells).fract() - 0.5;
        let v = (y / size as f32 * cells).fract() - 0.5;
        (1.0 - (u * u + v * v) * 4.0).max(0.0)
    };

    Texture2D::from_fn(size, size, |x, y| {
        let (fx, fy) = (x as f32, y as f32);
        let h = height(fx, fy);
        let dx = height(fx + 1.0, fy) - height(fx - 1.0, fy);
        let dy = height(fx, fy + 1.0) - height(fx, fy - 1.0);
        let n = Vector3::new(-dx * 2.0, -dy * 2.0, 1.0).normalize();
        [n.x * 0.5 + 0.5, n.y * 0.5 + 0.5, n.z * 0.5 + 0.5, h]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::shader::bump::decode_normal;

    #[test]
    fn test_normal_map_flat_between_bumps() {
        let map = bump_normal_map(64);
        // Cell corners sit outside every bump.
        let texel = map.texel(0, 0);
        assert_eq!(texel.w, 0.0);
        let n = decode_normal(texel);
        assert!((n - Vector3::unit_z()).magnitude() < 1e-5);
    }

    #[test]
    fn test_normal_map_peaks_at_cell_center() {
        let map = bump_normal_map(64);
        assert!(map.texel(8, 8).w > 0.99);
    }

    #[test]
    fn test_sky_is_brighter_up_than_down() {
        let sky = sky_cube(8);
        let up = sky.sample(Vector3::unit_y());
        let down = sky.sample(-Vector3::unit_y());
        assert!(up.z > down.z);
    }
}
