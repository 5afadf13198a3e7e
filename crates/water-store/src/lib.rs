//! Water Store
//!
//! Append-only CSV persistence for household water usage and pH readings.
//! Each record kind lives in its own flat file with a header row.

mod query;
mod record;
mod store;

pub use query::{households, most_recent, usage_trend, TrendPoint};
pub use record::{ParseWarning, QualityRecord, Record, UsageRecord, DATE_FORMAT};
pub use store::{Loaded, StoreConfig, TableStore, WaterStore, QUALITY_FILE, USAGE_FILE};

use std::path::PathBuf;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Data file could not be created at startup
    #[error("Cannot initialize {path}: {source}")]
    Initialization {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Data file could not be read
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Data file could not be rewritten
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid CSV
    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Header row lacks a required column
    #[error("{path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },
}
