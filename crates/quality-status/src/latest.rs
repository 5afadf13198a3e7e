//! Latest Reading Resolution

use crate::status::{classify, PhStatus};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;
use water_store::QualityRecord;

/// One line of the status table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusRow {
    pub household: String,
    pub date: NaiveDate,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub status: PhStatus,
}

/// Latest dated reading for every household, in order of first appearance.
///
/// A reading replaces the current best when its date is later, or equal and
/// it was appended later. Readings without a date or a pH value cannot take
/// part; a household with only such readings is left out.
pub fn latest_per_household(records: &[QualityRecord]) -> Vec<&QualityRecord> {
    let mut order: Vec<&str> = Vec::new();
    let mut best: HashMap<&str, (NaiveDate, &QualityRecord)> = HashMap::new();

    for record in records {
        let Some(date) = record.date else {
            continue;
        };
        if record.ph.is_none() {
            continue;
        }

        match best.get_mut(record.household.as_str()) {
            Some(current) if date >= current.0 => *current = (date, record),
            Some(_) => {}
            None => {
                order.push(&record.household);
                best.insert(&record.household, (date, record));
            }
        }
    }

    order
        .into_iter()
        .filter_map(|household| best.get(household).map(|(_, record)| *record))
        .collect()
}

/// Classify the latest reading of each household
pub fn status_table(records: &[QualityRecord]) -> Vec<StatusRow> {
    let rows: Vec<StatusRow> = latest_per_household(records)
        .into_iter()
        .filter_map(|record| {
            let date = record.date?;
            let ph = record.ph?;
            Some(StatusRow {
                household: record.household.clone(),
                date,
                ph,
                status: classify(ph),
            })
        })
        .collect();

    debug!(
        "Resolved {} household status(es) from {} reading(s)",
        rows.len(),
        records.len()
    );
    rows
}
