//! DBSCAN detection of MT pole clusters with geometric features.
//!
//! Selects the points carrying the MT class label, clusters them over 3D
//! Euclidean neighbourhoods, discards noise, and derives the per-cluster
//! quantities the classification and fusion stages consume.

use crate::cloud::SceneCloud;
use crate::error::{Error, Result};
use crate::types::PoleId;
use kdtree::distance::squared_euclidean;
use kdtree::KdTree;
use log::{debug, warn};
use nalgebra::Point3;
use std::collections::VecDeque;
use std::path::Path;
use std::time::Instant;

/// DBSCAN parameters tuned for pole-scale clusters.
#[derive(Clone, Copy, Debug)]
pub struct ClusterParams {
    /// Neighbourhood radius in metres.
    pub eps: f64,
    /// Minimum neighbourhood size, query point included, for a core point.
    pub min_points: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            eps: 2.0,
            min_points: 20,
        }
    }
}

/// One detected pole candidate.
#[derive(Clone, Debug)]
pub struct PoleCluster {
    pub points: Vec<Point3<f64>>,
}

/// Geometric features of one detected cluster, one CSV row each.
#[derive(Clone, Debug)]
pub struct ClusterFeatures {
    pub pole_id: PoleId,
    pub center_x: f64,
    pub center_y: f64,
    pub base_z: f64,
    pub height_m: f64,
    pub point_count: usize,
}

/// Runs DBSCAN over the points labeled `label_mt`. Clusters come back in
/// discovery order; noise points are dropped. Non-finite coordinates are
/// excluded before indexing.
pub fn detect_pole_clusters(
    cloud: &SceneCloud,
    label_mt: i32,
    params: &ClusterParams,
) -> Vec<PoleCluster> {
    let t0 = Instant::now();
    let selection: Vec<Point3<f64>> = cloud
        .points
        .iter()
        .filter(|p| p.class == label_mt && p.position.coords.iter().all(|c| c.is_finite()))
        .map(|p| p.position)
        .collect();
    if selection.is_empty() {
        warn!("no points labeled {label_mt} to cluster");
        return Vec::new();
    }

    let clusters = dbscan(&selection, params);
    debug!(
        "pole detection: selected={} clusters={} elapsed_ms={:.1}",
        selection.len(),
        clusters.len(),
        t0.elapsed().as_secs_f64() * 1e3
    );
    clusters
        .into_iter()
        .map(|indices| PoleCluster {
            points: indices.into_iter().map(|i| selection[i]).collect(),
        })
        .collect()
}

fn dbscan(points: &[Point3<f64>], params: &ClusterParams) -> Vec<Vec<usize>> {
    let eps_sq = params.eps * params.eps;
    let mut tree: KdTree<f64, usize, [f64; 3]> = KdTree::with_capacity(3, 64);
    for (i, p) in points.iter().enumerate() {
        // coordinates are pre-filtered finite, so insertion cannot fail
        let _ = tree.add([p.x, p.y, p.z], i);
    }

    let mut cluster_of: Vec<Option<usize>> = vec![None; points.len()];
    let mut visited = vec![false; points.len()];
    let mut clusters: Vec<Vec<usize>> = Vec::new();

    for i in 0..points.len() {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        let neighbours = region(&tree, &points[i], eps_sq);
        if neighbours.len() < params.min_points {
            // noise unless later reached from a core point
            continue;
        }

        let cluster_id = clusters.len();
        clusters.push(Vec::new());
        cluster_of[i] = Some(cluster_id);
        clusters[cluster_id].push(i);

        let mut frontier: VecDeque<usize> = neighbours.into();
        while let Some(j) = frontier.pop_front() {
            if cluster_of[j].is_none() {
                cluster_of[j] = Some(cluster_id);
                clusters[cluster_id].push(j);
            }
            if !visited[j] {
                visited[j] = true;
                let expansion = region(&tree, &points[j], eps_sq);
                if expansion.len() >= params.min_points {
                    frontier.extend(expansion);
                }
            }
        }
    }
    clusters
}

fn region(tree: &KdTree<f64, usize, [f64; 3]>, p: &Point3<f64>, eps_sq: f64) -> Vec<usize> {
    tree.within(&[p.x, p.y, p.z], eps_sq, &squared_euclidean)
        .map(|hits| hits.into_iter().map(|(_, &i)| i).collect())
        .unwrap_or_default()
}

/// Mean-XY position, minimum elevation and vertical extent per cluster.
/// Ids are 1-based in discovery order.
pub fn cluster_features(clusters: &[PoleCluster]) -> Vec<ClusterFeatures> {
    clusters
        .iter()
        .enumerate()
        .map(|(i, cluster)| {
            let n = cluster.points.len().max(1) as f64;
            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            let mut min_z = f64::INFINITY;
            let mut max_z = f64::NEG_INFINITY;
            for p in &cluster.points {
                sum_x += p.x;
                sum_y += p.y;
                min_z = min_z.min(p.z);
                max_z = max_z.max(p.z);
            }
            ClusterFeatures {
                pole_id: PoleId(i as i64 + 1),
                center_x: sum_x / n,
                center_y: sum_y / n,
                base_z: min_z,
                height_m: max_z - min_z,
                point_count: cluster.points.len(),
            }
        })
        .collect()
}

/// Writes the features table handed to the downstream pole classifier.
pub fn write_features_csv(path: &Path, features: &[ClusterFeatures]) -> Result<()> {
    crate::cloud::io::ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path).map_err(|e| Error::csv(path, e))?;
    writer
        .write_record(["Pole_ID", "Center_X", "Center_Y", "Base_Z", "Height_m", "Points"])
        .map_err(|e| Error::csv(path, e))?;
    for f in features {
        writer
            .write_record(&[
                f.pole_id.to_string(),
                format!("{:.3}", f.center_x),
                format!("{:.3}", f.center_y),
                format!("{:.3}", f.base_z),
                format!("{:.3}", f.height_m),
                f.point_count.to_string(),
            ])
            .map_err(|e| Error::csv(path, e))?;
    }
    writer.flush().map_err(|e| Error::write(path, e))?;
    debug!("wrote features {}: rows={}", path.display(), features.len());
    Ok(())
}
