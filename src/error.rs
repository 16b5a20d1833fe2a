//! Error type shared by every pipeline stage.
//!
//! Only unrecoverable conditions surface as [`Error`]: unreadable inputs,
//! malformed tables, fusion edges naming unknown poles, a pole table with no
//! usable heights, and write failures. Locally recoverable situations
//! (degenerate tube axes, clouds left empty by class filtering, extracts with
//! no environment points) are logged at `warn` level and yield empty results
//! instead.

use crate::types::PoleId;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("pole table {path}: {source}")]
    PoleTable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("point cloud {path}: {source}")]
    PointCloud {
        path: PathBuf,
        #[source]
        source: las::Error,
    },

    #[error("unknown pole type {value:?} for pole {id}")]
    UnknownPoleKind { id: PoleId, value: String },

    #[error("edge references pole {0}, absent from the pole table")]
    UnknownPole(PoleId),

    #[error("pole table has no finite Height_m values; cannot derive the uniform corridor height")]
    MissingHeights,

    #[error("{0}")]
    InvalidArguments(String),
}

impl Error {
    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        Error::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write(path: &Path, source: std::io::Error) -> Self {
        Error::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        Error::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        Error::PoleTable {
            path: path.to_path_buf(),
            source,
        }
    }
}
