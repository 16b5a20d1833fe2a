//! Labeled scene cloud: point model, semantic class names, class filtering.

pub mod io;

use nalgebra::Point3;

/// Color applied to points that carry no RGB data.
pub const DEFAULT_GRAY: [f32; 3] = [0.6, 0.6, 0.6];

/// One labeled scene point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePoint {
    pub position: Point3<f64>,
    /// RGB normalized to [0, 1].
    pub color: [f32; 3],
    pub class: i32,
}

/// Labeled point cloud held in memory for the duration of a run.
#[derive(Clone, Debug, Default)]
pub struct SceneCloud {
    pub points: Vec<ScenePoint>,
}

impl SceneCloud {
    pub fn new(points: Vec<ScenePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Copies out the bare positions, for kernels that work on coordinates
    /// alone.
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// New cloud without the points whose class appears in `excluded`.
    /// Point order is preserved.
    pub fn without_classes(&self, excluded: &[i32]) -> SceneCloud {
        let points = self
            .points
            .iter()
            .filter(|p| !excluded.contains(&p.class))
            .copied()
            .collect();
        SceneCloud::new(points)
    }
}

/// Display name of a semantic class for report output. Ids missing from the
/// table render as `Unknown_<id>`.
pub fn class_name(class_id: i32) -> String {
    let name = match class_id {
        1 => "Ground",
        2 => "Sidewalk",
        3 => "Road",
        4 => "Building",
        5 => "Vegetation",
        8 => "LV Wires",
        10 => "Car",
        11 => "Sign",
        12 => "Monument",
        13 => "Traffic sign",
        other => return format!("Unknown_{other}"),
    };
    name.to_string()
}
