//! Sample Water Source Routes

use axum::Json;
use serde::Serialize;

/// A named point on the sources map
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaterSource {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

/// Fixed sample sources; there is no geocoding behind these
pub const SAMPLE_SOURCES: [WaterSource; 3] = [
    WaterSource {
        name: "Community Well - East",
        lat: 1.2833,
        lon: 36.8167,
    },
    WaterSource {
        name: "Public Tap - Central",
        lat: 1.2921,
        lon: 36.8219,
    },
    WaterSource {
        name: "Borehole - West",
        lat: 1.2700,
        lon: 36.8000,
    },
];

#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub data: Vec<WaterSource>,
    pub count: usize,
}

/// List the sample clean water sources
pub async fn get_sources() -> Json<SourcesResponse> {
    Json(SourcesResponse {
        data: SAMPLE_SOURCES.to_vec(),
        count: SAMPLE_SOURCES.len(),
    })
}
