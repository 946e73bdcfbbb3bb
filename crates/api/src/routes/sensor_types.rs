//! Sensor-Type Routes

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use request_validator::{sensor_type_from_req, sensor_type_query_from_req, FlatReq};
use sensor_model::SensorType;

use crate::error::ApiError;
use crate::routes::FindResponse;
use crate::AppState;

/// Add a sensor type from a flat request body.
pub async fn add(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FlatReq>,
) -> Result<(StatusCode, Json<SensorType>), ApiError> {
    let sensor_type = sensor_type_from_req(&req)?;
    let stored = state.store.add_sensor_type(sensor_type).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Find sensor types matching the query-string filters.
pub async fn find(
    State(state): State<Arc<AppState>>,
    Query(req): Query<FlatReq>,
) -> Result<Json<FindResponse<SensorType>>, ApiError> {
    let query = sensor_type_query_from_req(&req)?;
    let data = state.store.find_sensor_types(&query).await?;
    Ok(Json(FindResponse::new(data)))
}
