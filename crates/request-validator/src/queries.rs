//! Find-Request Validation

use crate::fields::{check_fields, optional, parse_f64, parse_i64, require};
use crate::FlatReq;
use sensor_model::{ReadingQuery, Result, SensorQuery, SensorTypeQuery};

const SENSOR_TYPE_QUERY_FIELDS: &[&str] =
    &["id", "manufacturer", "modelNumber", "quantity", "unit"];
const SENSOR_QUERY_FIELDS: &[&str] = &["id", "sensorTypeId"];
const READING_QUERY_FIELDS: &[&str] =
    &["sensorId", "minTimestamp", "maxTimestamp", "minValue", "maxValue", "value"];

/// Validate a find-sensor-types request. Absent fields impose no constraint.
pub fn sensor_type_query_from_req(req: &FlatReq) -> Result<SensorTypeQuery> {
    check_fields(req, SENSOR_TYPE_QUERY_FIELDS)?;
    Ok(SensorTypeQuery {
        id: optional(req, "id").map(str::to_string),
        manufacturer: optional(req, "manufacturer").map(str::to_string),
        model_number: optional(req, "modelNumber").map(str::to_string),
        quantity: optional(req, "quantity").map(str::to_string),
        unit: optional(req, "unit").map(str::to_string),
    })
}

/// Validate a find-sensors request.
pub fn sensor_query_from_req(req: &FlatReq) -> Result<SensorQuery> {
    check_fields(req, SENSOR_QUERY_FIELDS)?;
    Ok(SensorQuery {
        id: optional(req, "id").map(str::to_string),
        sensor_type_id: optional(req, "sensorTypeId").map(str::to_string),
    })
}

/// Validate a find-sensor-readings request. `sensorId` is required; the
/// bounds are optional and inclusive.
pub fn reading_query_from_req(req: &FlatReq) -> Result<ReadingQuery> {
    check_fields(req, READING_QUERY_FIELDS)?;
    let sensor_id = require(req, "sensorId")?.to_string();
    let min_timestamp = match optional(req, "minTimestamp") {
        Some(raw) => Some(parse_i64("minTimestamp", raw)?),
        None => None,
    };
    let max_timestamp = match optional(req, "maxTimestamp") {
        Some(raw) => Some(parse_i64("maxTimestamp", raw)?),
        None => None,
    };
    let min_value = match optional(req, "minValue") {
        Some(raw) => Some(parse_f64("minValue", raw)?),
        None => None,
    };
    let max_value = match optional(req, "maxValue") {
        Some(raw) => Some(parse_f64("maxValue", raw)?),
        None => None,
    };
    let value = match optional(req, "value") {
        Some(raw) => Some(parse_f64("value", raw)?),
        None => None,
    };
    Ok(ReadingQuery { sensor_id, min_timestamp, max_timestamp, min_value, max_value, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn req(pairs: &[(&str, &str)]) -> FlatReq {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_empty_request_imposes_no_constraint() {
        let query = sensor_type_query_from_req(&FlatReq::new()).unwrap();
        assert_eq!(query, SensorTypeQuery::default());
    }

    #[test]
    fn test_empty_values_are_treated_as_absent() {
        let query = sensor_query_from_req(&req(&[("id", ""), ("sensorTypeId", "t1")])).unwrap();
        assert_eq!(query.id, None);
        assert_eq!(query.sensor_type_id.as_deref(), Some("t1"));
    }

    #[test]
    fn test_reading_query_requires_sensor_id() {
        let err = reading_query_from_req(&req(&[("minTimestamp", "100")])).unwrap_err();
        assert_eq!(err.code(), "REQUIRED");
        assert!(err.to_string().contains("sensorId"));
    }

    #[test]
    fn test_malformed_bound_is_bad_val() {
        let err = reading_query_from_req(&req(&[
            ("sensorId", "s1"),
            ("maxTimestamp", "later"),
        ]))
        .unwrap_err();
        assert_eq!(err.code(), "BAD_VAL");
        assert!(err.to_string().contains("maxTimestamp"));
    }

    #[test]
    fn test_unknown_filter_field_is_bad_val() {
        let err = sensor_type_query_from_req(&req(&[("manufactrer", "Acme")])).unwrap_err();
        assert_eq!(err.code(), "BAD_VAL");
    }

    proptest! {
        #[test]
        fn prop_integer_bounds_round_trip(min in i64::MIN..i64::MAX, sensor in "[a-z][a-z0-9]{0,8}") {
            let query = reading_query_from_req(&req(&[
                ("sensorId", &sensor),
                ("minTimestamp", &min.to_string()),
            ])).unwrap();
            prop_assert_eq!(query.min_timestamp, Some(min));
            prop_assert_eq!(query.sensor_id, sensor);
        }
    }
}
