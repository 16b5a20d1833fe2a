//! Per-pair aggregation of tube scans into the persisted report.

use super::scanner::TubeScan;
use crate::cloud::class_name;
use crate::types::{ClassCollision, CollisionRecord, CollisionReport, PoleId};
use std::collections::HashMap;

/// Accumulates tube scans per ordered pole pair and assembles the report.
///
/// Pairs keep the first-occurrence order of [`begin_pair`] calls, which the
/// scanner issues in fusion-edge input order; `collision_id` numbering runs
/// over the pairs that end up colliding, in that same order. Per-tube class
/// counts arrive already thresholded and are summed across tubes, so a
/// class fragmented below the threshold in every single tube never enters a
/// record, whatever its total.
///
/// [`begin_pair`]: ReportBuilder::begin_pair
#[derive(Debug)]
pub struct ReportBuilder {
    tube_radius: f64,
    pair_order: Vec<(PoleId, PoleId)>,
    pairs: HashMap<(PoleId, PoleId), PairEntry>,
}

#[derive(Debug, Default)]
struct PairEntry {
    class_order: Vec<i32>,
    classes: HashMap<i32, ClassAccum>,
}

#[derive(Debug)]
struct ClassAccum {
    count: usize,
    sample: [f64; 3],
}

impl ReportBuilder {
    pub fn new(tube_radius: f64) -> Self {
        Self {
            tube_radius,
            pair_order: Vec::new(),
            pairs: HashMap::new(),
        }
    }

    /// Registers a pair in edge order. Repeated pairs keep their first slot,
    /// so duplicate edges merge into one record.
    pub fn begin_pair(&mut self, from: PoleId, to: PoleId) {
        let key = (from, to);
        if !self.pairs.contains_key(&key) {
            self.pair_order.push(key);
            self.pairs.insert(key, PairEntry::default());
        }
    }

    /// Merges one tube's significant classes into its pair entry. The first
    /// tube to qualify a class provides its sample point.
    pub fn add_tube_scan(&mut self, from: PoleId, to: PoleId, scan: &TubeScan) {
        self.begin_pair(from, to);
        let Some(entry) = self.pairs.get_mut(&(from, to)) else {
            return;
        };
        for hit in &scan.classes {
            match entry.classes.get_mut(&hit.class_id) {
                Some(accum) => accum.count += hit.count,
                None => {
                    entry.class_order.push(hit.class_id);
                    entry.classes.insert(
                        hit.class_id,
                        ClassAccum {
                            count: hit.count,
                            sample: [hit.sample.x, hit.sample.y, hit.sample.z],
                        },
                    );
                }
            }
        }
    }

    /// Final report: 1-based collision ids over the pairs with at least one
    /// qualified class, in pair registration order.
    pub fn finish(self) -> CollisionReport {
        let mut pairs = self.pairs;
        let mut collisions = Vec::new();
        for key in self.pair_order {
            let Some(entry) = pairs.remove(&key) else {
                continue;
            };
            if entry.class_order.is_empty() {
                continue;
            }
            let mut per_class = Vec::with_capacity(entry.class_order.len());
            for class_id in &entry.class_order {
                if let Some(accum) = entry.classes.get(class_id) {
                    per_class.push(ClassCollision {
                        class_id: *class_id,
                        class_name: class_name(*class_id),
                        point_count: accum.count,
                        sample_point: accum.sample,
                    });
                }
            }
            collisions.push(CollisionRecord {
                collision_id: collisions.len() as u32 + 1,
                from_pole: key.0,
                to_pole: key.1,
                per_class,
            });
        }
        CollisionReport {
            tube_radius: self.tube_radius,
            collisions,
        }
    }
}
