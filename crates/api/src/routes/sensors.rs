//! Sensor Routes

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use request_validator::{sensor_from_req, sensor_query_from_req, FlatReq};
use sensor_model::Sensor;

use crate::error::ApiError;
use crate::routes::FindResponse;
use crate::AppState;

/// Add a sensor from a flat request body.
pub async fn add(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FlatReq>,
) -> Result<(StatusCode, Json<Sensor>), ApiError> {
    let sensor = sensor_from_req(&req)?;
    let stored = state.store.add_sensor(sensor).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Find sensors matching the query-string filters.
pub async fn find(
    State(state): State<Arc<AppState>>,
    Query(req): Query<FlatReq>,
) -> Result<Json<FindResponse<Sensor>>, ApiError> {
    let query = sensor_query_from_req(&req)?;
    let data = state.store.find_sensors(&query).await?;
    Ok(Json(FindResponse::new(data)))
}
