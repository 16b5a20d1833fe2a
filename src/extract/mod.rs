//! Per-collision inspection extracts.
//!
//! For every reported collision this stage carves a generous envelope of
//! raw corridor points around the span's tubes and overlays sampled pole
//! reconstructions and tube surfaces, writing one labeled cloud per record
//! for offline inspection.

use crate::cloud::io::{ensure_parent_dir, save_cloud};
use crate::cloud::{SceneCloud, ScenePoint};
use crate::error::{Error, Result};
use crate::geometry::{Cylinder, FacetedCylinder, SurfacePrimitive, SurfaceSampler};
use crate::poles::structure::pole_primitives;
use crate::poles::PoleTable;
use crate::scan::synthesize_tubes;
use crate::types::{CollisionRecord, CollisionReport};
use log::{debug, warn};
use nalgebra::Point3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Class label applied to tube surface samples in extracts.
pub const TUBE_CLASS: i32 = 14;

const POLE_COLOR: [f32; 3] = [1.0, 0.0, 1.0]; // magenta
const TUBE_COLOR: [f32; 3] = [1.0, 0.0, 0.0]; // red

/// Knobs for extract generation.
#[derive(Clone, Copy, Debug)]
pub struct ExtractParams {
    /// Tube radius the report was produced with.
    pub tube_radius: f64,
    /// Facet count for sampled cylinders.
    pub resolution: usize,
    /// Class label stamped on pole surface samples.
    pub label_mt: i32,
    /// Envelope radius around each tube axis, metres.
    pub envelope_radius: f64,
    /// Axial extension beyond each tube endpoint, metres.
    pub envelope_extension: f64,
    /// Surface samples per endpoint pole.
    pub pole_surface_samples: usize,
    /// Surface samples per tube.
    pub tube_surface_samples: usize,
}

impl Default for ExtractParams {
    fn default() -> Self {
        Self {
            tube_radius: 4.0,
            resolution: 18,
            label_mt: 7,
            envelope_radius: 60.0,
            envelope_extension: 5.0,
            pole_surface_samples: 8000,
            tube_surface_samples: 6000,
        }
    }
}

/// Writes one `collision_extract_<id>.las` per collision record into
/// `out_dir`. `cloud` is the raw corridor cloud, unfiltered, so extracts
/// keep ground and context around the conflict. Records whose envelopes
/// catch no points are skipped with a warning. Returns the written paths.
pub fn export_collision_extracts(
    report: &CollisionReport,
    poles: &PoleTable,
    cloud: &SceneCloud,
    params: &ExtractParams,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir).map_err(|e| Error::write(out_dir, e))?;
    let uniform_height = poles.uniform_height()?;

    let mut written = Vec::with_capacity(report.collisions.len());
    for record in &report.collisions {
        if let Some(path) = export_record(record, poles, cloud, uniform_height, params, out_dir)? {
            written.push(path);
        }
    }
    Ok(written)
}

fn export_record(
    record: &CollisionRecord,
    poles: &PoleTable,
    cloud: &SceneCloud,
    uniform_height: f64,
    params: &ExtractParams,
    out_dir: &Path,
) -> Result<Option<PathBuf>> {
    let t0 = Instant::now();
    let from = poles.require(record.from_pole)?;
    let to = poles.require(record.to_pole)?;
    let tubes = synthesize_tubes(from, to, uniform_height, params.tube_radius);

    // 1) union of the per-tube envelope hits over the raw cloud
    let mut env_indices: BTreeSet<usize> = BTreeSet::new();
    for tube in &tubes {
        let Some(cylinder) = tube.cylinder() else {
            continue;
        };
        let axis = cylinder.axis();
        let p1 = tube.p1 - axis * params.envelope_extension;
        let p2 = tube.p2 + axis * params.envelope_extension;
        let Some(envelope) = Cylinder::new(p1, p2, params.envelope_radius) else {
            continue;
        };
        env_indices.extend(
            cloud
                .points
                .par_iter()
                .enumerate()
                .filter(|(_, point)| envelope.contains(&point.position))
                .map(|(i, _)| i)
                .collect::<Vec<usize>>(),
        );
    }
    if env_indices.is_empty() {
        warn!(
            "collision {}: no corridor points in the envelope, skipping extract",
            record.collision_id
        );
        return Ok(None);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(record.collision_id));

    // 2) columnar assembly: environment, endpoint poles, tube surfaces
    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut colors: Vec<[f32; 3]> = Vec::new();
    let mut classes: Vec<i32> = Vec::new();

    for &i in &env_indices {
        let point = &cloud.points[i];
        positions.push(point.position);
        colors.push(point.color);
        classes.push(point.class);
    }
    let env_count = positions.len();

    for pole in [from, to] {
        let primitives = pole_primitives(pole, uniform_height, params.resolution);
        push_surface(
            &primitives,
            params.pole_surface_samples,
            params.label_mt,
            POLE_COLOR,
            &mut rng,
            &mut positions,
            &mut colors,
            &mut classes,
        );
    }

    for tube in &tubes {
        let primitive = SurfacePrimitive::Cylinder(FacetedCylinder {
            p1: tube.p1,
            p2: tube.p2,
            radius: tube.radius,
            sides: params.resolution,
        });
        push_surface(
            std::slice::from_ref(&primitive),
            params.tube_surface_samples,
            TUBE_CLASS,
            TUBE_COLOR,
            &mut rng,
            &mut positions,
            &mut colors,
            &mut classes,
        );
    }

    // channel lengths only drift when a sampler under-delivers; clamp to
    // the shortest before zipping
    let n = positions.len().min(colors.len()).min(classes.len());
    positions.truncate(n);
    colors.truncate(n);
    classes.truncate(n);

    let points: Vec<ScenePoint> = positions
        .into_iter()
        .zip(colors)
        .zip(classes)
        .map(|((position, color), class)| ScenePoint {
            position,
            color,
            class,
        })
        .collect();

    let path = out_dir.join(format!("collision_extract_{}.las", record.collision_id));
    ensure_parent_dir(&path)?;
    save_cloud(&path, &SceneCloud::new(points))?;
    debug!(
        "collision {}: extract {} env={} total={} elapsed_ms={:.1}",
        record.collision_id,
        path.display(),
        env_count,
        n,
        t0.elapsed().as_secs_f64() * 1e3
    );
    Ok(Some(path))
}

#[allow(clippy::too_many_arguments)]
fn push_surface(
    primitives: &[SurfacePrimitive],
    count: usize,
    class: i32,
    color: [f32; 3],
    rng: &mut ChaCha8Rng,
    positions: &mut Vec<Point3<f64>>,
    colors: &mut Vec<[f32; 3]>,
    classes: &mut Vec<i32>,
) {
    let Some(sampler) = SurfaceSampler::from_primitives(primitives) else {
        return;
    };
    for position in sampler.sample(count, rng) {
        positions.push(position);
        colors.push(color);
        classes.push(class);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poles::{Pole, PoleKind};
    use crate::types::{ClassCollision, PoleId};
    use std::fs;

    fn corridor() -> PoleTable {
        let pole = |id, x| Pole {
            id: PoleId(id),
            center_x: x,
            center_y: 0.0,
            base_z: 0.0,
            height_m: Some(5.0),
            kind: PoleKind::Monoposte,
        };
        PoleTable::new(vec![pole(1, 0.0), pole(2, 10.0)])
    }

    fn record() -> CollisionRecord {
        CollisionRecord {
            collision_id: 1,
            from_pole: PoleId(1),
            to_pole: PoleId(2),
            per_class: vec![ClassCollision {
                class_id: 4,
                class_name: "Building".to_string(),
                point_count: 25,
                sample_point: [5.0, 0.0, 4.9],
            }],
        }
    }

    fn report() -> CollisionReport {
        CollisionReport {
            tube_radius: 1.0,
            collisions: vec![record()],
        }
    }

    fn params() -> ExtractParams {
        ExtractParams {
            tube_radius: 1.0,
            pole_surface_samples: 200,
            tube_surface_samples: 100,
            ..ExtractParams::default()
        }
    }

    #[test]
    fn empty_envelope_skips_the_record() {
        let out_dir = std::env::temp_dir().join(format!(
            "clearance_detector_extract_skip_{}",
            std::process::id()
        ));
        // the only corridor point sits far outside the 60 m envelope
        let cloud = SceneCloud::new(vec![ScenePoint {
            position: Point3::new(5.0, 500.0, 0.0),
            color: [0.5; 3],
            class: 1,
        }]);
        let written =
            export_collision_extracts(&report(), &corridor(), &cloud, &params(), &out_dir).unwrap();
        let _ = fs::remove_dir_all(&out_dir);
        assert!(written.is_empty());
    }

    #[test]
    fn extract_contains_environment_and_overlays() {
        let out_dir = std::env::temp_dir().join(format!(
            "clearance_detector_extract_write_{}",
            std::process::id()
        ));
        let cloud = SceneCloud::new(vec![
            ScenePoint {
                position: Point3::new(5.0, 0.0, 4.9),
                color: [0.2, 0.4, 0.6],
                class: 4,
            },
            ScenePoint {
                position: Point3::new(6.0, 1.0, 2.0),
                color: [0.2, 0.4, 0.6],
                class: 1,
            },
        ]);
        let written =
            export_collision_extracts(&report(), &corridor(), &cloud, &params(), &out_dir).unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0]
            .file_name()
            .is_some_and(|n| n == "collision_extract_1.las"));

        let extract = crate::cloud::io::load_cloud(&written[0]).unwrap();
        let _ = fs::remove_dir_all(&out_dir);

        let count_of = |class: i32| extract.points.iter().filter(|p| p.class == class).count();
        // 2 env points, 200 samples per pole, 100 per tube level
        assert_eq!(count_of(4), 1);
        assert_eq!(count_of(1), 1);
        assert_eq!(count_of(7), 400);
        assert_eq!(count_of(TUBE_CLASS), 300);
        assert_eq!(extract.len(), 702);
    }

    #[test]
    fn reruns_are_deterministic() {
        let out_dir = std::env::temp_dir().join(format!(
            "clearance_detector_extract_det_{}",
            std::process::id()
        ));
        let cloud = SceneCloud::new(vec![ScenePoint {
            position: Point3::new(5.0, 0.0, 4.9),
            color: [0.2, 0.4, 0.6],
            class: 4,
        }]);
        let first =
            export_collision_extracts(&report(), &corridor(), &cloud, &params(), &out_dir).unwrap();
        let a = crate::cloud::io::load_cloud(&first[0]).unwrap();
        let second =
            export_collision_extracts(&report(), &corridor(), &cloud, &params(), &out_dir).unwrap();
        let b = crate::cloud::io::load_cloud(&second[0]).unwrap();
        let _ = fs::remove_dir_all(&out_dir);

        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.points.iter().zip(b.points.iter()) {
            assert_eq!(pa.position, pb.position);
            assert_eq!(pa.class, pb.class);
        }
    }
}
