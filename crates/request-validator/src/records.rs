//! Add-Request Validation

use crate::fields::{check_fields, interval, parse_f64, parse_i64, require};
use crate::FlatReq;
use sensor_model::{Result, Sensor, SensorReading, SensorType, SensorsError};

const SENSOR_TYPE_FIELDS: &[&str] =
    &["id", "manufacturer", "modelNumber", "quantity", "unit", "min", "max"];
const SENSOR_FIELDS: &[&str] = &["id", "sensorTypeId", "period", "min", "max"];
const READING_FIELDS: &[&str] = &["sensorId", "timestamp", "value"];

/// Validate an add-sensor-type request.
pub fn sensor_type_from_req(req: &FlatReq) -> Result<SensorType> {
    check_fields(req, SENSOR_TYPE_FIELDS)?;
    let id = require(req, "id")?.to_string();
    let manufacturer = require(req, "manufacturer")?.to_string();
    let model_number = require(req, "modelNumber")?.to_string();
    let quantity = require(req, "quantity")?.to_string();
    let unit = require(req, "unit")?.to_string();
    let min = parse_f64("min", require(req, "min")?)?;
    let max = parse_f64("max", require(req, "max")?)?;
    Ok(SensorType {
        id,
        manufacturer,
        model_number,
        quantity,
        unit,
        limits: interval("limits", min, max)?,
    })
}

/// Validate an add-sensor request.
pub fn sensor_from_req(req: &FlatReq) -> Result<Sensor> {
    check_fields(req, SENSOR_FIELDS)?;
    let id = require(req, "id")?.to_string();
    let sensor_type_id = require(req, "sensorTypeId")?.to_string();
    let period = parse_i64("period", require(req, "period")?)?;
    if period <= 0 {
        return Err(SensorsError::bad_value("period", "must be a positive integer"));
    }
    let min = parse_f64("min", require(req, "min")?)?;
    let max = parse_f64("max", require(req, "max")?)?;
    Ok(Sensor { id, sensor_type_id, period, expected: interval("expected", min, max)? })
}

/// Validate an add-sensor-reading request.
pub fn reading_from_req(req: &FlatReq) -> Result<SensorReading> {
    check_fields(req, READING_FIELDS)?;
    Ok(SensorReading {
        sensor_id: require(req, "sensorId")?.to_string(),
        timestamp: parse_i64("timestamp", require(req, "timestamp")?)?,
        value: parse_f64("value", require(req, "value")?)?,
    })
}
