//! Shared identifier and report types produced by the scanning pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an MT pole as assigned by the detection/classification
/// stages and referenced by fusion edges and collision records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoleId(pub i64);

impl fmt::Display for PoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Aggregated hits of one semantic class inside the tubes of a pole pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassCollision {
    pub class_id: i32,
    pub class_name: String,
    /// Sum of the per-tube counts that individually met the significance
    /// threshold. Sub-threshold tube counts never contribute.
    pub point_count: usize,
    /// Representative hit: the first point of this class's hit list in the
    /// first tube where the class qualified.
    pub sample_point: [f64; 3],
}

/// One colliding pole pair with its significant classes.
///
/// A record exists only when at least one tube of the pair produced a
/// significant class; `per_class` is therefore never empty.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollisionRecord {
    /// 1-based sequential id over colliding pairs, assigned in
    /// first-occurrence order of the `(from, to)` pair within the fusion
    /// edge input. This ordering is part of the output contract.
    pub collision_id: u32,
    pub from_pole: PoleId,
    pub to_pole: PoleId,
    pub per_class: Vec<ClassCollision>,
}

/// Persisted output of a scan pass, overwritten on every run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollisionReport {
    pub tube_radius: f64,
    pub collisions: Vec<CollisionRecord>,
}

impl CollisionReport {
    pub fn is_empty(&self) -> bool {
        self.collisions.is_empty()
    }
}
