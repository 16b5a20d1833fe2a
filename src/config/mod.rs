//! Runtime configuration shared by the pipeline tools.
//!
//! A single immutable JSON document configures every stage; stage entry
//! points receive plain parameter structs resolved from it, never ambient
//! state. Unknown keys are ignored so one file can also feed external
//! tooling.

use crate::error::{Error, Result};
use crate::extract::ExtractParams;
use crate::scan::ScanParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Tube-related knobs.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct TubeConfig {
    /// Run-wide tube radius in metres.
    pub default_radius: f64,
    /// Facet count for sampled cylinders in extracts; containment never
    /// depends on it.
    pub resolution: usize,
    /// Significance threshold for tubes and classes alike.
    pub min_points_collision: usize,
}

impl Default for TubeConfig {
    fn default() -> Self {
        Self {
            default_radius: 4.0,
            resolution: 18,
            min_points_collision: 20,
        }
    }
}

/// Root configuration document.
#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    /// Labeled corridor cloud (LAS).
    pub input_cloud: PathBuf,
    /// Classified pole table (CSV).
    pub poles_csv: PathBuf,
    /// Fusion edges (JSON); written by `corridor_fuse`, read by the scanner.
    #[serde(default = "default_connections")]
    pub connections: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Destination of the report and the per-collision extracts.
    #[serde(default = "default_collisions_dir")]
    pub collisions_dir: PathBuf,
    /// Destination of per-cluster pole clouds from detection.
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,
    /// Class label of MT poles; always excluded from scanning.
    #[serde(default = "default_label_mt")]
    pub label_mt: i32,
    /// Classes removed before scanning, in addition to `label_mt`.
    #[serde(default = "default_excluded_classes")]
    pub excluded_classes: Vec<i32>,
    #[serde(default)]
    pub tube: TubeConfig,
}

fn default_connections() -> PathBuf {
    PathBuf::from("output/connections.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_collisions_dir() -> PathBuf {
    PathBuf::from("output/collisions")
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("output/poles_mt")
}

fn default_label_mt() -> i32 {
    7
}

fn default_excluded_classes() -> Vec<i32> {
    vec![0, 6, 9]
}

impl RuntimeConfig {
    /// All classes removed before scanning, `label_mt` included exactly
    /// once.
    pub fn scan_exclusions(&self) -> Vec<i32> {
        let mut excluded = self.excluded_classes.clone();
        if !excluded.contains(&self.label_mt) {
            excluded.push(self.label_mt);
        }
        excluded
    }

    pub fn scan_params(&self) -> ScanParams {
        ScanParams {
            tube_radius: self.tube.default_radius,
            min_points_collision: self.tube.min_points_collision,
        }
    }

    pub fn extract_params(&self) -> ExtractParams {
        ExtractParams {
            tube_radius: self.tube.default_radius,
            resolution: self.tube.resolution,
            label_mt: self.label_mt,
            ..ExtractParams::default()
        }
    }

    pub fn report_path(&self) -> PathBuf {
        self.collisions_dir.join("collision_report.json")
    }

    /// Features table written by pole detection.
    pub fn detected_poles_path(&self) -> PathBuf {
        self.output_dir.join("poles_mt_detected.csv")
    }
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig> {
    let contents = fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    serde_json::from_str(&contents).map_err(|e| Error::json(path, e))
}
