//! Automatic corridor fusion.
//!
//! Candidate edges link every pole to its nearest planar neighbours, then a
//! minimum spanning tree over planar distances keeps the corridor backbone.
//! Line corridors come out as the pole-to-pole chain; branch points keep
//! exactly one edge per branch.

use super::FusionEdge;
use crate::poles::{Pole, PoleTable};
use log::{debug, warn};
use petgraph::algo::min_spanning_tree;
use petgraph::data::Element;
use petgraph::graph::UnGraph;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Neighbour count used to seed candidate edges. Two is enough to chain a
/// corridor and still offer the MST an alternative at branch points.
const K_NEIGHBORS: usize = 2;

/// Derive the corridor connectivity from pole positions alone.
///
/// `from_id` is always the endpoint appearing earlier in the table; the
/// result is sorted by `(from_id, to_id)` so repeated runs emit identical
/// files. Fewer than two poles yield no edges.
pub fn fuse_corridor(poles: &PoleTable) -> Vec<FusionEdge> {
    let list: Vec<&Pole> = poles.iter().collect();
    if list.len() < 2 {
        warn!("corridor fusion needs at least 2 poles, got {}", list.len());
        return Vec::new();
    }

    // 1) candidate set: each pole to its K nearest planar neighbours
    let mut candidates: BTreeSet<(usize, usize)> = BTreeSet::new();
    for i in 0..list.len() {
        let mut by_distance: Vec<(f64, usize)> = (0..list.len())
            .filter(|&j| j != i)
            .map(|j| (planar_distance(list[i], list[j]), j))
            .collect();
        by_distance.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        for &(_, j) in by_distance.iter().take(K_NEIGHBORS) {
            candidates.insert((i.min(j), i.max(j)));
        }
    }

    // 2) minimum spanning tree over the candidate graph
    let mut graph = UnGraph::<usize, f64>::new_undirected();
    let nodes: Vec<_> = (0..list.len()).map(|i| graph.add_node(i)).collect();
    for &(i, j) in &candidates {
        graph.add_edge(nodes[i], nodes[j], planar_distance(list[i], list[j]));
    }

    let mut edges: Vec<FusionEdge> = min_spanning_tree(&graph)
        .filter_map(|element| match element {
            Element::Edge {
                source,
                target,
                weight,
            } => {
                let (i, j) = (source.min(target), source.max(target));
                Some(FusionEdge {
                    from_id: list[i].id,
                    to_id: list[j].id,
                    distance: Some(weight),
                })
            }
            Element::Node { .. } => None,
        })
        .collect();
    edges.sort_by_key(|e| (e.from_id, e.to_id));

    debug!(
        "MST fusion: poles={} candidates={} edges={}",
        list.len(),
        candidates.len(),
        edges.len()
    );
    edges
}

fn planar_distance(a: &Pole, b: &Pole) -> f64 {
    let dx = a.center_x - b.center_x;
    let dy = a.center_y - b.center_y;
    (dx * dx + dy * dy).sqrt()
}
