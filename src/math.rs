//! Small shading helpers on top of cgmath.

use cgmath::{InnerSpace, Matrix3, Matrix4, Vector3, Vector4, Zero};

/// Clamps `x` to `[0, 1]`.
pub fn saturate(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Linear interpolation from `a` to `b` by `t`.
pub fn lerp(a: Vector4<f32>, b: Vector4<f32>, t: f32) -> Vector4<f32> {
    a + (b - a) * t
}

/// Normalizes `v`, returning zero for vectors too short to normalize.
pub fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    let len2 = v.magnitude2();
    if len2 > f32::EPSILON * f32::EPSILON {
        v / len2.sqrt()
    } else {
        Vector3::zero()
    }
}

/// Mirrors `v` about `n` using the clamped cosine between them.
///
/// Both vectors are expected to be unit length. The result is normalized.
pub fn reflect_about(n: Vector3<f32>, v: Vector3<f32>) -> Vector3<f32> {
    let cos_theta = saturate(n.dot(v));
    normalize_or_zero(n * 2.0 * cos_theta - v)
}

/// Upper-left 3x3 of `m`, the transform applied to directions.
pub fn rotation_part(m: &Matrix4<f32>) -> Matrix3<f32> {
    Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate())
}

/// Component-wise product of two colors.
pub fn modulate(a: Vector4<f32>, b: Vector4<f32>) -> Vector4<f32> {
    Vector4::new(a.x * b.x, a.y * b.y, a.z * b.z, a.w * b.w)
}
