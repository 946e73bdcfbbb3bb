//! Sensor-Reading Routes

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use request_validator::{reading_from_req, reading_query_from_req, FlatReq};
use sensor_model::SensorReading;

use crate::error::ApiError;
use crate::routes::FindResponse;
use crate::AppState;

/// Add a reading from a flat request body.
pub async fn add(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FlatReq>,
) -> Result<(StatusCode, Json<SensorReading>), ApiError> {
    let reading = reading_from_req(&req)?;
    let stored = state.store.add_reading(reading).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Find readings for one sensor within the query-string bounds.
pub async fn find(
    State(state): State<Arc<AppState>>,
    Query(req): Query<FlatReq>,
) -> Result<Json<FindResponse<SensorReading>>, ApiError> {
    let query = reading_query_from_req(&req)?;
    let data = state.store.find_readings(&query).await?;
    Ok(Json(FindResponse::new(data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::sensor_types;
    use crate::routes::sensors;
    use axum::response::IntoResponse;
    use sensor_store::MemoryStore;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(Arc::new(MemoryStore::new())))
    }

    fn req(pairs: &[(&str, &str)]) -> FlatReq {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    async fn seed_sensor(state: &Arc<AppState>) {
        sensor_types::add(
            State(state.clone()),
            Json(req(&[
                ("id", "t1"),
                ("manufacturer", "Acme"),
                ("modelNumber", "m-100"),
                ("quantity", "temperature"),
                ("unit", "C"),
                ("min", "-40"),
                ("max", "85"),
            ])),
        )
        .await
        .unwrap();
        sensors::add(
            State(state.clone()),
            Json(req(&[
                ("id", "s1"),
                ("sensorTypeId", "t1"),
                ("period", "30"),
                ("min", "0"),
                ("max", "50"),
            ])),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_add_and_find_roundtrip() {
        let state = state();
        seed_sensor(&state).await;

        let (status, Json(stored)) = add(
            State(state.clone()),
            Json(req(&[("sensorId", "s1"), ("timestamp", "100"), ("value", "21.5")])),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(stored.value, 21.5);

        let Json(found) =
            find(State(state), Query(req(&[("sensorId", "s1")]))).await.unwrap();
        assert_eq!(found.count, 1);
        assert_eq!(found.data[0].timestamp, 100);
    }

    #[tokio::test]
    async fn test_find_respects_bounds() {
        let state = state();
        seed_sensor(&state).await;
        for (timestamp, value) in [("100", "1.0"), ("150", "2.0"), ("250", "3.0")] {
            add(
                State(state.clone()),
                Json(req(&[("sensorId", "s1"), ("timestamp", timestamp), ("value", value)])),
            )
            .await
            .unwrap();
        }

        let Json(found) = find(
            State(state),
            Query(req(&[
                ("sensorId", "s1"),
                ("minTimestamp", "100"),
                ("maxTimestamp", "200"),
            ])),
        )
        .await
        .unwrap();
        assert_eq!(found.data.iter().map(|r| r.timestamp).collect::<Vec<_>>(), vec![100, 150]);
    }

    #[tokio::test]
    async fn test_unknown_sensor_maps_to_not_found() {
        let state = state();
        let err = add(
            State(state),
            Json(req(&[("sensorId", "ghost"), ("timestamp", "100"), ("value", "1")])),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_sensor_id_maps_to_bad_request() {
        let state = state();
        let err = find(State(state), Query(req(&[("minTimestamp", "100")]))).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
