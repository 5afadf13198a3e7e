//! Table Queries

use crate::record::{Record, UsageRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

/// One point of a household's usage series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub liters: f64,
}

/// Newest `limit` rows, latest date first.
///
/// Rows sharing a date are listed most recently appended first; rows with
/// no parseable date sort last.
pub fn most_recent<R: Record>(records: &[R], limit: usize) -> Vec<R> {
    let mut sorted: Vec<&R> = records.iter().rev().collect();
    sorted.sort_by(|a, b| match (a.date(), b.date()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted.into_iter().take(limit).cloned().collect()
}

/// Distinct household names in order of first appearance
pub fn households<R: Record>(records: &[R]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(R::household)
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// A household's usage over time, oldest first.
///
/// Rows missing a date or a volume cannot be plotted and are left out.
pub fn usage_trend(records: &[UsageRecord], household: &str) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = records
        .iter()
        .filter(|r| r.household == household)
        .filter_map(|r| {
            Some(TrendPoint {
                date: r.date?,
                liters: r.liters?,
            })
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}
