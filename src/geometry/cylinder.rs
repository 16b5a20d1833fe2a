//! Finite-cylinder membership tests.
//!
//! A tube is modelled as a finite cylinder with flat ends: a point belongs to
//! it when its projection onto the axis lies within the segment and its
//! perpendicular distance stays within the radius. No mesh is involved; the
//! test is plain vector algebra over `f64` coordinates.

use nalgebra::{Point3, Vector3};

/// Axis lengths below this are treated as "no tube".
pub const DEGENERATE_AXIS_EPS: f64 = 1e-6;

/// Finite cylinder around the segment `p1 -> p2`.
#[derive(Clone, Debug)]
pub struct Cylinder {
    p1: Point3<f64>,
    axis: Vector3<f64>,
    length: f64,
    radius_sq: f64,
}

impl Cylinder {
    /// Returns `None` when the axis is degenerate (`|p2 - p1| < 1e-6`).
    pub fn new(p1: Point3<f64>, p2: Point3<f64>, radius: f64) -> Option<Self> {
        let v = p2 - p1;
        let length = v.norm();
        if length < DEGENERATE_AXIS_EPS {
            return None;
        }
        Some(Self {
            p1,
            axis: v / length,
            length,
            radius_sq: radius * radius,
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Unit direction of the axis `p1 -> p2`.
    pub fn axis(&self) -> Vector3<f64> {
        self.axis
    }

    /// Membership test with inclusive bounds: axial projection in `[0, L]`
    /// and perpendicular distance `<= radius`.
    #[inline]
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        let rel = p - self.p1;
        let t = rel.dot(&self.axis);
        if t < 0.0 || t > self.length {
            return false;
        }
        let perp = rel - self.axis * t;
        perp.norm_squared() <= self.radius_sq
    }
}

/// Indices of `points` contained in the finite cylinder `p1 -> p2` with
/// `radius`. A degenerate axis yields an empty result, not an error.
pub fn contained_indices(
    points: &[Point3<f64>],
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    radius: f64,
) -> Vec<usize> {
    let Some(cylinder) = Cylinder::new(*p1, *p2, radius) else {
        return Vec::new();
    };
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| cylinder.contains(p))
        .map(|(i, _)| i)
        .collect()
}
