//! Classified MT pole table and derived corridor quantities.

pub mod attachments;
pub mod structure;

use crate::error::{Error, Result};
use crate::types::PoleId;
use log::debug;
use nalgebra::Point3;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Pole configuration assigned by the upstream classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoleKind {
    Monoposte,
    Biposte,
}

impl PoleKind {
    /// Case-insensitive parse of the table's `Type` column. Unknown values
    /// are a hard error, not a fallback.
    pub fn parse(value: &str, id: PoleId) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("monoposte") {
            Ok(PoleKind::Monoposte)
        } else if trimmed.eq_ignore_ascii_case("biposte") {
            Ok(PoleKind::Biposte)
        } else {
            Err(Error::UnknownPoleKind {
                id,
                value: value.to_string(),
            })
        }
    }
}

/// One classified pole as read from the table.
#[derive(Clone, Debug)]
pub struct Pole {
    pub id: PoleId,
    pub center_x: f64,
    pub center_y: f64,
    pub base_z: f64,
    /// Individually measured height; may be absent or non-finite. Corridor
    /// geometry uses the uniform height instead.
    pub height_m: Option<f64>,
    pub kind: PoleKind,
}

impl Pole {
    /// Ground-level center of the pole.
    pub fn base(&self) -> Point3<f64> {
        Point3::new(self.center_x, self.center_y, self.base_z)
    }
}

#[derive(Debug, Deserialize)]
struct PoleRow {
    #[serde(rename = "Pole_ID")]
    pole_id: i64,
    #[serde(rename = "Center_X")]
    center_x: f64,
    #[serde(rename = "Center_Y")]
    center_y: f64,
    #[serde(rename = "Base_Z")]
    base_z: f64,
    #[serde(rename = "Height_m")]
    height_m: Option<f64>,
    #[serde(rename = "Type")]
    kind: String,
}

/// Immutable pole table with id lookups.
#[derive(Clone, Debug, Default)]
pub struct PoleTable {
    poles: Vec<Pole>,
    by_id: HashMap<PoleId, usize>,
}

impl PoleTable {
    /// On duplicate ids the first row wins, matching lookup-by-first-match
    /// in the upstream tooling.
    pub fn new(poles: Vec<Pole>) -> Self {
        let mut by_id = HashMap::with_capacity(poles.len());
        for (i, pole) in poles.iter().enumerate() {
            by_id.entry(pole.id).or_insert(i);
        }
        Self { poles, by_id }
    }

    /// Load the classified pole table from CSV
    /// (`Pole_ID,Center_X,Center_Y,Base_Z,Height_m,Type`).
    pub fn from_csv(path: &Path) -> Result<Self> {
        let file = fs::File::open(path).map_err(|e| Error::read(path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut poles = Vec::new();
        for row in reader.deserialize::<PoleRow>() {
            let row = row.map_err(|e| Error::PoleTable {
                path: path.to_path_buf(),
                source: e,
            })?;
            let id = PoleId(row.pole_id);
            poles.push(Pole {
                id,
                center_x: row.center_x,
                center_y: row.center_y,
                base_z: row.base_z,
                height_m: row.height_m,
                kind: PoleKind::parse(&row.kind, id)?,
            });
        }
        debug!("loaded pole table {}: poles={}", path.display(), poles.len());
        Ok(Self::new(poles))
    }

    pub fn len(&self) -> usize {
        self.poles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pole> {
        self.poles.iter()
    }

    pub fn get(&self, id: PoleId) -> Option<&Pole> {
        self.by_id.get(&id).map(|&i| &self.poles[i])
    }

    /// Lookup that treats a missing id as a hard error, for edge validation.
    pub fn require(&self, id: PoleId) -> Result<&Pole> {
        self.get(id).ok_or(Error::UnknownPole(id))
    }

    /// Uniform corridor height: mean of the finite per-pole heights. A
    /// table without any finite height is an error; defaulting to zero
    /// would silently flatten every derived geometry.
    pub fn uniform_height(&self) -> Result<f64> {
        let mut sum = 0.0;
        let mut n = 0usize;
        for pole in &self.poles {
            if let Some(h) = pole.height_m {
                if h.is_finite() {
                    sum += h;
                    n += 1;
                }
            }
        }
        if n == 0 {
            return Err(Error::MissingHeights);
        }
        let height = sum / n as f64;
        debug!("uniform corridor height {height:.2} m from {n} poles");
        Ok(height)
    }
}
