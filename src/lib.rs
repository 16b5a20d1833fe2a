#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod cloud;
pub mod config;
pub mod error;
pub mod fusion;
pub mod poles;
pub mod scan;
pub mod types;

// “Expert” modules – still public, but considered unstable internals.
// (You can tighten or feature-gate these later.)
pub mod cluster;
pub mod extract;
pub mod geometry;

// --- High-level re-exports -------------------------------------------------

// Main entry points: scanner + results.
pub use crate::error::{Error, Result};
pub use crate::scan::{CollisionScanner, ScanOutcome, ScanParams, SpanScan};
pub use crate::types::{ClassCollision, CollisionRecord, CollisionReport, PoleId};

// Configuration shared by the pipeline tools.
pub use crate::config::{load_config, RuntimeConfig};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use clearance_detector::prelude::*;
/// use std::path::Path;
///
/// # fn main() -> clearance_detector::Result<()> {
/// let poles = PoleTable::from_csv(Path::new("output/poles_mt_classified.csv"))?;
/// let edges = clearance_detector::fusion::load_connections(
///     Path::new("output/connections.json"),
///     &poles,
/// )?;
/// let cloud = clearance_detector::cloud::io::load_cloud(Path::new("data/corridor.las"))?;
///
/// let scanner = CollisionScanner::new(ScanParams::default());
/// let outcome = scanner.scan(&poles, &edges, &cloud)?;
/// println!("collisions={}", outcome.report.collisions.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::cloud::SceneCloud;
    pub use crate::poles::PoleTable;
    pub use crate::{CollisionReport, CollisionScanner, PoleId, ScanOutcome, ScanParams};
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    // Stage runners.
    pub use crate::cluster::{cluster_features, detect_pole_clusters, write_features_csv};
    pub use crate::extract::export_collision_extracts;
    pub use crate::fusion::mst::fuse_corridor;
    pub use crate::scan::{scan_tube, synthesize_tubes};

    // Structured stage types.
    pub use crate::cluster::{ClusterFeatures, ClusterParams, PoleCluster};
    pub use crate::extract::ExtractParams;
    pub use crate::fusion::FusionEdge;
    pub use crate::scan::{ClassHits, ReportBuilder, Tube, TubeScan};
}
