//! Quality Routes

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use quality_status::{status_table, StatusRow, STATUS_GUIDE};
use serde::{Deserialize, Serialize};
use tracing::info;
use water_store::{most_recent, QualityRecord};

use super::{load_or_empty, today, RecentQuery, TableResponse};
use crate::{ApiError, SharedState};

/// "Save quality" form payload
#[derive(Debug, Deserialize)]
pub struct QualitySubmission {
    pub household: String,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    #[serde(rename = "pH", alias = "ph")]
    pub ph: f64,
}

/// Latest-reading status table
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub data: Vec<StatusRow>,
    pub count: usize,
    pub guide: &'static str,
    pub warnings: Vec<String>,
}

/// Save a pH reading
pub async fn save_quality(
    State(state): State<SharedState>,
    Json(body): Json<QualitySubmission>,
) -> Result<(StatusCode, Json<QualityRecord>), ApiError> {
    let state = state.write().await;
    state.validator.validate_household(&body.household)?;
    state.validator.validate_ph(body.ph)?;

    let record = QualityRecord::new(body.date.unwrap_or_else(today), body.household, body.ph);
    state.store.quality().append(&record)?;

    metrics::counter!("water_quality_saved_total").increment(1);
    info!("Water quality saved for '{}'", record.household);
    Ok((StatusCode::CREATED, Json(record)))
}

/// Most recent pH readings
pub async fn get_quality(
    State(state): State<SharedState>,
    Query(params): Query<RecentQuery>,
) -> Json<TableResponse<QualityRecord>> {
    let state = state.read().await;
    let limit = params.limit_or(state.recent_limit);

    let (records, warnings) = load_or_empty(state.store.quality(), "quality");
    Json(TableResponse::new(most_recent(&records, limit), warnings))
}

/// Status of each household's latest reading
pub async fn get_status(State(state): State<SharedState>) -> Json<StatusResponse> {
    let state = state.read().await;
    let (records, warnings) = load_or_empty(state.store.quality(), "quality");
    let data = status_table(&records);

    Json(StatusResponse {
        count: data.len(),
        data,
        guide: STATUS_GUIDE,
        warnings,
    })
}
