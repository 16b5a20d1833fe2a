//! Synthetic corridor fixtures shared by the integration tests.

use clearance_detector::cloud::ScenePoint;
use clearance_detector::fusion::FusionEdge;
use clearance_detector::poles::attachments::attachment_z;
use clearance_detector::poles::{Pole, PoleKind, PoleTable};
use clearance_detector::types::PoleId;
use nalgebra::Point3;

pub fn pole(id: i64, x: f64, y: f64, base_z: f64, height: Option<f64>) -> Pole {
    Pole {
        id: PoleId(id),
        center_x: x,
        center_y: y,
        base_z,
        height_m: height,
        kind: PoleKind::Monoposte,
    }
}

pub fn edge(from: i64, to: i64) -> FusionEdge {
    FusionEdge::new(PoleId(from), PoleId(to))
}

/// Two monoposte poles 10 m apart on the X axis, both 5 m tall.
pub struct TwoPoleCorridor {
    pub poles: PoleTable,
    pub edges: Vec<FusionEdge>,
    pub uniform_height: f64,
}

pub fn two_pole_corridor() -> TwoPoleCorridor {
    TwoPoleCorridor {
        poles: PoleTable::new(vec![
            pole(1, 0.0, 0.0, 0.0, Some(5.0)),
            pole(2, 10.0, 0.0, 0.0, Some(5.0)),
        ]),
        edges: vec![edge(1, 2)],
        uniform_height: 5.0,
    }
}

/// `count` tightly packed points of `class` around `(x, y)` at the
/// attachment elevation of `level`. The jitter stays within 0.1 m, so the
/// cluster fits well inside a 1 m tube.
pub fn cluster_at_level(
    count: usize,
    class: i32,
    x: f64,
    y: f64,
    base_z: f64,
    uniform_height: f64,
    level: usize,
) -> Vec<ScenePoint> {
    let z = attachment_z(base_z, uniform_height, level);
    (0..count)
        .map(|k| ScenePoint {
            position: Point3::new(x + (k % 5) as f64 * 0.02, y, z + (k / 5) as f64 * 0.02),
            color: [0.5; 3],
            class,
        })
        .collect()
}

/// Same cluster repeated at every crossarm level.
pub fn cluster_at_all_levels(
    count: usize,
    class: i32,
    x: f64,
    y: f64,
    base_z: f64,
    uniform_height: f64,
) -> Vec<ScenePoint> {
    let mut points = Vec::new();
    for level in 0..3 {
        points.extend(cluster_at_level(
            count,
            class,
            x,
            y,
            base_z,
            uniform_height,
            level,
        ));
    }
    points
}
