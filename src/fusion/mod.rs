//! Fusion edges connecting neighbouring poles into conductor spans.
//!
//! Edges come either from the automatic MST fusion ([`mst::fuse_corridor`])
//! or from a hand-maintained JSON file; both persist through the same
//! format. Downstream stages consume edges strictly in file order.

pub mod mst;

use crate::cloud::io::{read_json_file, write_json_file};
use crate::error::Result;
use crate::poles::PoleTable;
use crate::types::PoleId;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One conductor span between two poles. Edges are directional as stored;
/// duplicates are kept as given and keyed downstream by the ordered pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FusionEdge {
    pub from_id: PoleId,
    pub to_id: PoleId,
    /// Planar pole distance filled in by automatic fusion. Informational
    /// only; never read back into geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl FusionEdge {
    pub fn new(from_id: PoleId, to_id: PoleId) -> Self {
        Self {
            from_id,
            to_id,
            distance: None,
        }
    }
}

/// Load connection edges and validate every referenced pole id against the
/// table. An unknown id is a hard error, not a skipped edge.
pub fn load_connections(path: &Path, poles: &PoleTable) -> Result<Vec<FusionEdge>> {
    let edges: Vec<FusionEdge> = read_json_file(path)?;
    for edge in &edges {
        poles.require(edge.from_id)?;
        poles.require(edge.to_id)?;
    }
    debug!("loaded connections {}: edges={}", path.display(), edges.len());
    Ok(edges)
}

pub fn save_connections(path: &Path, edges: &[FusionEdge]) -> Result<()> {
    write_json_file(path, &edges)
}
