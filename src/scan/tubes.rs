//! Candidate tube synthesis between matching crossarm levels.

use crate::geometry::Cylinder;
use crate::poles::attachments::{attachment_points, CROSSARM_COUNT};
use crate::poles::Pole;
use crate::types::PoleId;
use log::warn;
use nalgebra::Point3;

/// Finite-cylinder conductor candidate between the same crossarm level of
/// two poles.
#[derive(Clone, Debug)]
pub struct Tube {
    pub from_id: PoleId,
    pub to_id: PoleId,
    pub crossarm_index: usize,
    pub p1: Point3<f64>,
    pub p2: Point3<f64>,
    pub radius: f64,
}

impl Tube {
    /// Containment volume of this tube; `None` when the endpoints coincide.
    pub fn cylinder(&self) -> Option<Cylinder> {
        Cylinder::new(self.p1, self.p2, self.radius)
    }

    pub fn length(&self) -> f64 {
        (self.p2 - self.p1).norm()
    }
}

/// One tube per crossarm level for the given span, all sharing the run-wide
/// radius. Degenerate axes (coincident pole centers) are dropped with a
/// warning instead of aborting the scan.
pub fn synthesize_tubes(from: &Pole, to: &Pole, uniform_height: f64, radius: f64) -> Vec<Tube> {
    let a = attachment_points(from, uniform_height);
    let b = attachment_points(to, uniform_height);
    let mut tubes = Vec::with_capacity(CROSSARM_COUNT);
    for i in 0..CROSSARM_COUNT {
        let tube = Tube {
            from_id: from.id,
            to_id: to.id,
            crossarm_index: i,
            p1: a[i].position,
            p2: b[i].position,
            radius,
        };
        if tube.cylinder().is_none() {
            warn!(
                "degenerate span {} -> {} at crossarm {}, skipping tube",
                from.id, to.id, i
            );
            continue;
        }
        tubes.push(tube);
    }
    tubes
}
