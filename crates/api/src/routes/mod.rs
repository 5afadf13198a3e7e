//! Route handlers

pub mod quality;
pub mod sources;
pub mod usage;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;
use water_store::{Loaded, Record, TableStore};

/// Upper bound on requested table sizes
pub const MAX_LIMIT: usize = 500;

/// Query parameters for the recent-entries tables
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    /// Maximum number of rows
    pub limit: Option<usize>,
}

impl RecentQuery {
    pub fn limit_or(&self, default: usize) -> usize {
        self.limit.unwrap_or(default).min(MAX_LIMIT)
    }
}

/// A table plus anything that went wrong while reading it
#[derive(Debug, Serialize)]
pub struct TableResponse<T> {
    pub data: Vec<T>,
    pub count: usize,
    pub warnings: Vec<String>,
}

impl<T> TableResponse<T> {
    pub fn new(data: Vec<T>, warnings: Vec<String>) -> Self {
        Self {
            count: data.len(),
            data,
            warnings,
        }
    }
}

/// Load a table, falling back to an empty one when the file cannot be read.
///
/// Read failures and per-field parse problems come back as display messages.
pub(crate) fn load_or_empty<R: Record>(
    table: &TableStore<R>,
    label: &str,
) -> (Vec<R>, Vec<String>) {
    match table.load_all() {
        Ok(Loaded { records, warnings }) => {
            let messages = warnings
                .iter()
                .map(|w| format!("{label} data {w}"))
                .collect();
            (records, messages)
        }
        Err(e) => {
            warn!("Falling back to empty {} table: {}", label, e);
            metrics::counter!("water_store_read_failures_total", "table" => label.to_string())
                .increment(1);
            (Vec::new(), vec![format!("Could not read {label} data: {e}")])
        }
    }
}

/// Submission date when the client leaves it out
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
