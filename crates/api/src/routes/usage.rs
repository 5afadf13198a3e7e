//! Usage Routes

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use water_store::{households, most_recent, usage_trend, TrendPoint, UsageRecord};

use super::{load_or_empty, today, RecentQuery, TableResponse};
use crate::{ApiError, SharedState};

/// "Save usage" form payload
#[derive(Debug, Deserialize)]
pub struct UsageSubmission {
    pub household: String,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub liters: f64,
}

/// Query parameters for the trend endpoint
#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    /// Household to plot; the first known household when absent
    pub household: Option<String>,
}

/// Series behind the usage line chart
#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub household: Option<String>,
    pub points: Vec<TrendPoint>,
    pub warnings: Vec<String>,
}

/// Save a usage entry
pub async fn save_usage(
    State(state): State<SharedState>,
    Json(body): Json<UsageSubmission>,
) -> Result<(StatusCode, Json<UsageRecord>), ApiError> {
    let state = state.write().await;
    state.validator.validate_household(&body.household)?;
    state.validator.validate_liters(body.liters)?;

    let record = UsageRecord::new(body.date.unwrap_or_else(today), body.household, body.liters);
    state.store.usage().append(&record)?;

    metrics::counter!("water_usage_saved_total").increment(1);
    info!("Usage saved for '{}'", record.household);
    Ok((StatusCode::CREATED, Json(record)))
}

/// Most recent usage entries
pub async fn get_usage(
    State(state): State<SharedState>,
    Query(params): Query<RecentQuery>,
) -> Json<TableResponse<UsageRecord>> {
    let state = state.read().await;
    let limit = params.limit_or(state.recent_limit);

    let (records, warnings) = load_or_empty(state.store.usage(), "usage");
    Json(TableResponse::new(most_recent(&records, limit), warnings))
}

/// Household selector options
pub async fn get_households(State(state): State<SharedState>) -> Json<TableResponse<String>> {
    let state = state.read().await;
    let (records, warnings) = load_or_empty(state.store.usage(), "usage");
    Json(TableResponse::new(households(&records), warnings))
}

/// Usage over time for one household
pub async fn get_trend(
    State(state): State<SharedState>,
    Query(params): Query<TrendQuery>,
) -> Json<TrendResponse> {
    let state = state.read().await;
    let (records, warnings) = load_or_empty(state.store.usage(), "usage");

    let household = params
        .household
        .or_else(|| households(&records).into_iter().next());
    let points = household
        .as_deref()
        .map(|name| usage_trend(&records, name))
        .unwrap_or_default();

    Json(TrendResponse {
        household,
        points,
        warnings,
    })
}
