//! Conductor-clearance scanning across fused pole spans.
//!
//! Overview
//! - Derives per-pole attachment points under the uniform corridor height.
//! - Synthesizes three candidate tubes per fusion edge, one per crossarm
//!   level, all with the run-wide radius.
//! - Scans each tube against the class-filtered cloud; the tube as a whole
//!   and each class within it must independently reach
//!   `min_points_collision`.
//! - Aggregates per-pair results in fusion-edge order and assigns 1-based
//!   collision ids over the colliding pairs.
//!
//! Modules
//! - [`tubes`]: candidate tube synthesis.
//! - [`scanner`]: containment scan and thresholding for a single tube.
//! - [`report`]: per-pair aggregation and report assembly.
//!
//! Key ideas
//! - Edges are processed strictly in input order and only the per-point
//!   containment test is parallel, so a given input always produces the
//!   same report.
//! - Duplicate edges merge into a single record keyed by the ordered pair.

pub mod report;
pub mod scanner;
pub mod tubes;

pub use report::ReportBuilder;
pub use scanner::{scan_tube, ClassHits, ScanParams, TubeScan};
pub use tubes::{synthesize_tubes, Tube};

use crate::cloud::SceneCloud;
use crate::error::Result;
use crate::fusion::FusionEdge;
use crate::poles::PoleTable;
use crate::types::{CollisionReport, PoleId};
use log::{debug, warn};
use std::collections::HashSet;
use std::time::Instant;

/// Tubes of one scanned span plus its collision flag, for viewers and the
/// extract stage.
#[derive(Clone, Debug)]
pub struct SpanScan {
    pub from_id: PoleId,
    pub to_id: PoleId,
    pub tubes: Vec<Tube>,
    /// True when the span's pair produced a report record.
    pub colliding: bool,
}

/// Scan output: the persisted report plus per-span tube geometry.
#[derive(Clone, Debug)]
pub struct ScanOutcome {
    pub report: CollisionReport,
    pub spans: Vec<SpanScan>,
}

/// Collision scanner over fused spans.
#[derive(Clone, Copy, Debug)]
pub struct CollisionScanner {
    params: ScanParams,
}

impl CollisionScanner {
    pub fn new(params: ScanParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> ScanParams {
        self.params
    }

    /// Runs the scan over every fusion edge. `cloud` must already be
    /// filtered down to the environment classes.
    pub fn scan(
        &self,
        poles: &PoleTable,
        edges: &[FusionEdge],
        cloud: &SceneCloud,
    ) -> Result<ScanOutcome> {
        let t0 = Instant::now();
        if cloud.is_empty() {
            warn!("environment cloud is empty after class filtering");
        }
        let uniform_height = poles.uniform_height()?;

        let mut builder = ReportBuilder::new(self.params.tube_radius);
        let mut spans = Vec::with_capacity(edges.len());
        for edge in edges {
            let from = poles.require(edge.from_id)?;
            let to = poles.require(edge.to_id)?;
            builder.begin_pair(from.id, to.id);

            let tubes = synthesize_tubes(from, to, uniform_height, self.params.tube_radius);
            for tube in &tubes {
                let scan = scan_tube(tube, cloud, self.params.min_points_collision);
                debug!(
                    "span {} -> {} crossarm {}: hits={} significant_classes={}",
                    from.id,
                    to.id,
                    tube.crossarm_index,
                    scan.total_hits,
                    scan.classes.len()
                );
                builder.add_tube_scan(from.id, to.id, &scan);
            }
            spans.push(SpanScan {
                from_id: from.id,
                to_id: to.id,
                tubes,
                colliding: false,
            });
        }

        let report = builder.finish();
        // flag every span of a colliding pair, duplicates included
        let colliding: HashSet<(PoleId, PoleId)> = report
            .collisions
            .iter()
            .map(|r| (r.from_pole, r.to_pole))
            .collect();
        for span in &mut spans {
            span.colliding = colliding.contains(&(span.from_id, span.to_id));
        }

        debug!(
            "scan finished: edges={} collisions={} elapsed_ms={:.1}",
            edges.len(),
            report.collisions.len(),
            t0.elapsed().as_secs_f64() * 1e3
        );
        Ok(ScanOutcome { report, spans })
    }
}
