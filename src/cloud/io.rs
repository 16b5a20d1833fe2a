//! Point-cloud and JSON I/O adapters.
//!
//! LAS is the interchange format for labeled clouds. Reads normalize to the
//! in-memory [`ScenePoint`] model: colors are scaled into [0, 1] (files with
//! 8-bit RGB are detected and rescaled accordingly), missing color defaults
//! to neutral gray, and the classification byte becomes the class label. The
//! LAS overlap flag stands in for raw class 12 in both directions so
//! round-trips keep the id.

use crate::cloud::{SceneCloud, ScenePoint, DEFAULT_GRAY};
use crate::error::{Error, Result};
use las::point::{Classification, Format};
use las::{Builder, Color, Read as _, Reader, Transform, Vector, Write as _, Writer};
use log::debug;
use nalgebra::Point3;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Raw class carried through the LAS overlap flag rather than the
/// classification byte.
const OVERLAP_CLASS: i32 = 12;

fn las_err(path: &Path, source: las::Error) -> Error {
    Error::PointCloud {
        path: path.to_path_buf(),
        source,
    }
}

/// Read a labeled cloud from a LAS file.
pub fn load_cloud(path: &Path) -> Result<SceneCloud> {
    let t0 = Instant::now();
    let mut reader = Reader::from_path(path).map_err(|e| las_err(path, e))?;

    let mut raw = Vec::new();
    let mut max_component = 0u16;
    for point in reader.points() {
        let point = point.map_err(|e| las_err(path, e))?;
        if let Some(color) = point.color {
            max_component = max_component
                .max(color.red)
                .max(color.green)
                .max(color.blue);
        }
        raw.push(point);
    }
    // Files storing 8-bit RGB in the 16-bit channels are common in the wild.
    let color_scale = if max_component > 255 { 65535.0 } else { 255.0 };

    let points = raw
        .into_iter()
        .map(|p| {
            let class = if p.is_overlap {
                OVERLAP_CLASS
            } else {
                i32::from(u8::from(p.classification))
            };
            let color = match p.color {
                Some(c) => [
                    f32::from(c.red) / color_scale,
                    f32::from(c.green) / color_scale,
                    f32::from(c.blue) / color_scale,
                ],
                None => DEFAULT_GRAY,
            };
            ScenePoint {
                position: Point3::new(p.x, p.y, p.z),
                color,
                class,
            }
        })
        .collect::<Vec<_>>();

    debug!(
        "loaded cloud {}: points={} color_scale={} elapsed_ms={:.1}",
        path.display(),
        points.len(),
        color_scale,
        t0.elapsed().as_secs_f64() * 1000.0
    );
    Ok(SceneCloud::new(points))
}

/// Write a labeled cloud as LAS 1.2, point format 2 (XYZ + RGB).
pub fn save_cloud(path: &Path, cloud: &SceneCloud) -> Result<()> {
    ensure_parent_dir(path)?;

    let mut builder = Builder::from((1, 2));
    builder.point_format = Format::new(2).map_err(|e| las_err(path, e))?;
    // Anchor offsets at the cloud minimum so large projected coordinates
    // survive the raw i32 encoding at millimetre scale.
    let offset = cloud
        .points
        .iter()
        .fold(Point3::new(f64::MAX, f64::MAX, f64::MAX), |acc, p| {
            Point3::new(
                acc.x.min(p.position.x),
                acc.y.min(p.position.y),
                acc.z.min(p.position.z),
            )
        });
    let offset = if cloud.is_empty() {
        Point3::origin()
    } else {
        Point3::new(offset.x.floor(), offset.y.floor(), offset.z.floor())
    };
    let axis = |offset: f64| Transform {
        scale: 0.001,
        offset,
    };
    builder.transforms = Vector {
        x: axis(offset.x),
        y: axis(offset.y),
        z: axis(offset.z),
    };
    let header = builder.into_header().map_err(|e| las_err(path, e))?;

    let mut writer = Writer::from_path(path, header).map_err(|e| las_err(path, e))?;
    for p in &cloud.points {
        let mut point = las::Point {
            x: p.position.x,
            y: p.position.y,
            z: p.position.z,
            color: Some(Color::new(
                color_channel(p.color[0]),
                color_channel(p.color[1]),
                color_channel(p.color[2]),
            )),
            ..Default::default()
        };
        if p.class == OVERLAP_CLASS {
            point.is_overlap = true;
        } else {
            let raw = p.class.clamp(0, 255) as u8;
            point.classification = Classification::new(raw).map_err(|e| las_err(path, e))?;
        }
        writer.write(point).map_err(|e| las_err(path, e))?;
    }
    writer.close().map_err(|e| las_err(path, e))?;

    debug!("wrote cloud {}: points={}", path.display(), cloud.len());
    Ok(())
}

fn color_channel(value: f32) -> u16 {
    (value.clamp(0.0, 1.0) * 65535.0).round() as u16
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| Error::json(path, e))?;
    fs::write(path, json).map_err(|e| Error::write(path, e))
}

/// Read and deserialize a JSON file.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    serde_json::from_str(&contents).map_err(|e| Error::json(path, e))
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
        }
    }
    Ok(())
}
