//! Point-in-tube scan with tube-level and per-class thresholds.

use super::tubes::Tube;
use crate::cloud::SceneCloud;
use nalgebra::Point3;
use rayon::prelude::*;
use std::collections::HashMap;

/// Runtime knobs for the collision scan.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Run-wide tube radius in metres.
    pub tube_radius: f64,
    /// Minimum contained points for a tube as a whole, and independently
    /// for each class within it, to count as significant.
    pub min_points_collision: usize,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            tube_radius: 4.0,
            min_points_collision: 20,
        }
    }
}

/// Hits of one class inside one tube, already past the per-class threshold.
#[derive(Clone, Debug)]
pub struct ClassHits {
    pub class_id: i32,
    pub count: usize,
    /// First contained point of this class in cloud order.
    pub sample: Point3<f64>,
}

/// Outcome of scanning a single tube.
#[derive(Clone, Debug)]
pub struct TubeScan {
    pub crossarm_index: usize,
    /// Contained points before any thresholding.
    pub total_hits: usize,
    /// Classes that met the threshold, in order of first appearance among
    /// the hits. Empty when the tube-level check failed or every class
    /// stayed below the threshold.
    pub classes: Vec<ClassHits>,
}

impl TubeScan {
    pub fn is_significant(&self) -> bool {
        !self.classes.is_empty()
    }
}

/// Scans one tube against the class-filtered environment cloud.
///
/// The containment test runs in parallel but hit indices keep cloud order,
/// so class ordering and sample points are reproducible.
pub fn scan_tube(tube: &Tube, cloud: &SceneCloud, min_points_collision: usize) -> TubeScan {
    let mut scan = TubeScan {
        crossarm_index: tube.crossarm_index,
        total_hits: 0,
        classes: Vec::new(),
    };
    let Some(cylinder) = tube.cylinder() else {
        return scan;
    };

    let hits: Vec<usize> = cloud
        .points
        .par_iter()
        .enumerate()
        .filter(|(_, point)| cylinder.contains(&point.position))
        .map(|(i, _)| i)
        .collect();
    scan.total_hits = hits.len();
    if scan.total_hits < min_points_collision {
        return scan;
    }

    // bucket by class, remembering first-appearance order and first hit
    let mut order: Vec<i32> = Vec::new();
    let mut buckets: HashMap<i32, ClassHits> = HashMap::new();
    for &i in &hits {
        let point = &cloud.points[i];
        match buckets.get_mut(&point.class) {
            Some(entry) => entry.count += 1,
            None => {
                order.push(point.class);
                buckets.insert(
                    point.class,
                    ClassHits {
                        class_id: point.class,
                        count: 1,
                        sample: point.position,
                    },
                );
            }
        }
    }
    scan.classes = order
        .into_iter()
        .filter_map(|class| buckets.remove(&class))
        .filter(|entry| entry.count >= min_points_collision)
        .collect();
    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::ScenePoint;
    use crate::types::PoleId;

    fn tube() -> Tube {
        Tube {
            from_id: PoleId(1),
            to_id: PoleId(2),
            crossarm_index: 0,
            p1: Point3::new(0.0, 0.0, 10.0),
            p2: Point3::new(20.0, 0.0, 10.0),
            radius: 1.0,
        }
    }

    fn points_of_class(class: i32, count: usize, x0: f64) -> Vec<ScenePoint> {
        (0..count)
            .map(|k| ScenePoint {
                position: Point3::new(x0 + k as f64 * 0.01, 0.0, 10.0),
                color: [0.5; 3],
                class,
            })
            .collect()
    }

    #[test]
    fn counts_every_contained_point() {
        let mut pts = points_of_class(4, 30, 5.0);
        pts.extend(points_of_class(5, 10, 8.0));
        // outside the radius
        pts.push(ScenePoint {
            position: Point3::new(10.0, 3.0, 10.0),
            color: [0.5; 3],
            class: 4,
        });
        let scan = scan_tube(&tube(), &SceneCloud::new(pts), 20);
        assert_eq!(scan.total_hits, 40);
        // class 5 stays below the per-class threshold
        assert_eq!(scan.classes.len(), 1);
        assert_eq!(scan.classes[0].class_id, 4);
        assert_eq!(scan.classes[0].count, 30);
    }

    #[test]
    fn tube_threshold_gates_everything() {
        let pts = points_of_class(4, 19, 5.0);
        let scan = scan_tube(&tube(), &SceneCloud::new(pts), 20);
        assert_eq!(scan.total_hits, 19);
        assert!(!scan.is_significant());
    }

    #[test]
    fn mixed_small_classes_pass_the_tube_gate_but_not_their_own() {
        // 12 + 12 contained points clear the tube threshold of 20,
        // yet neither class does on its own
        let mut pts = points_of_class(3, 12, 5.0);
        pts.extend(points_of_class(5, 12, 8.0));
        let scan = scan_tube(&tube(), &SceneCloud::new(pts), 20);
        assert_eq!(scan.total_hits, 24);
        assert!(scan.classes.is_empty());
    }

    #[test]
    fn sample_is_the_first_hit_of_the_class() {
        let mut pts = points_of_class(5, 3, 2.0);
        pts.extend(points_of_class(4, 25, 6.0));
        let scan = scan_tube(&tube(), &SceneCloud::new(pts), 20);
        assert_eq!(scan.classes.len(), 1);
        let hit = &scan.classes[0];
        assert_eq!(hit.class_id, 4);
        assert_eq!(hit.sample, Point3::new(6.0, 0.0, 10.0));
    }

    #[test]
    fn class_order_follows_first_appearance() {
        let mut pts = points_of_class(5, 25, 2.0);
        pts.extend(points_of_class(4, 25, 6.0));
        pts.extend(points_of_class(5, 5, 12.0));
        let scan = scan_tube(&tube(), &SceneCloud::new(pts), 20);
        let ids: Vec<i32> = scan.classes.iter().map(|c| c.class_id).collect();
        assert_eq!(ids, vec![5, 4]);
        assert_eq!(scan.classes[0].count, 30);
    }

    #[test]
    fn endpoint_points_are_inside() {
        let mut pts = vec![
            ScenePoint {
                position: Point3::new(0.0, 0.0, 10.0),
                color: [0.5; 3],
                class: 4,
            },
            ScenePoint {
                position: Point3::new(20.0, 1.0, 10.0),
                color: [0.5; 3],
                class: 4,
            },
        ];
        pts.extend(points_of_class(4, 18, 5.0));
        let scan = scan_tube(&tube(), &SceneCloud::new(pts), 20);
        assert_eq!(scan.total_hits, 20, "both boundary points must count");
        assert!(scan.is_significant());
    }
}
