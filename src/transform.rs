//! # Homogeneous Transform Helpers
//!
//! Thin constructors over `glam`'s double-precision types. Every matrix the model
//! builds is a rotation composed with a translation, stored column-major as
//! `DMat4`. Points are `DVec4` with `w = 1`.
//!
//! Rotation conventions follow the usual right-handed definitions
//! (<https://en.wikipedia.org/wiki/Rotation_matrix>):
//! - `rotation_z(a)` has first row `[cos a, -sin a, 0]`
//! - `rotation_xyz((x, y, z))` is `Rz(z) · Ry(y) · Rx(x)`

use crate::error::OrbitError;
use glam::{DMat3, DMat4, DVec3, DVec4};

/// Homogeneous origin, the position of a body in its own orbit frame.
pub const ORIGIN: DVec4 = DVec4::new(0.0, 0.0, 0.0, 1.0);

/// Determinant magnitude below which a matrix is treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

pub fn identity() -> DMat4 {
    DMat4::IDENTITY
}

/// Matrix product `a · b` (apply `b` first, then `a`).
pub fn multiply(a: &DMat4, b: &DMat4) -> DMat4 {
    *a * *b
}

pub fn multiply_vec(a: &DMat4, v: DVec4) -> DVec4 {
    *a * v
}

/// Inverse of `a`, or [`OrbitError::SingularMatrix`] when none exists.
pub fn invert(a: &DMat4) -> Result<DMat4, OrbitError> {
    let det = a.determinant();
    if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
        return Err(OrbitError::SingularMatrix);
    }
    Ok(a.inverse())
}

/// Tilt rotation `Rz(z) · Ry(y) · Rx(x)` embedded in a 4x4 identity.
pub fn rotation_xyz(tilt: DVec3) -> DMat4 {
    DMat4::from_mat3(rotation_xyz3(tilt))
}

/// Rotation about the local z axis embedded in a 4x4 identity.
pub fn rotation_z(angle: f64) -> DMat4 {
    DMat4::from_mat3(DMat3::from_rotation_z(angle))
}

/// Tilt rotation in the upper 3x3 block and `offset` in the translation column.
pub fn tilt_and_offset(offset: DVec3, tilt: DVec3) -> DMat4 {
    let mut mx = DMat4::from_mat3(rotation_xyz3(tilt));
    mx.w_axis = offset.extend(1.0);
    mx
}

/// Translation by `radius` along the local x axis.
pub fn radius_translation(radius: f64) -> DMat4 {
    DMat4::from_translation(DVec3::new(radius, 0.0, 0.0))
}

fn rotation_xyz3(tilt: DVec3) -> DMat3 {
    DMat3::from_rotation_z(tilt.z) * DMat3::from_rotation_y(tilt.y) * DMat3::from_rotation_x(tilt.x)
}
