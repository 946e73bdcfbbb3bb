//! Record Types

use serde::{Deserialize, Serialize};

/// Inclusive numeric range with `min < max`.
///
/// The `min < max` rule is enforced at request-validation time, not here;
/// a constructed `Interval` is assumed valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Whether `value` lies within the inclusive bounds.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// A class of sensor sharing manufacturer, model, quantity kind, unit,
/// and a valid operating range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorType {
    /// Externally supplied unique key.
    pub id: String,
    pub manufacturer: String,
    pub model_number: String,
    /// Quantity kind measured, e.g. "temperature".
    pub quantity: String,
    pub unit: String,
    /// Valid operating range for readings of this type.
    pub limits: Interval,
}

/// A deployed instance of a sensor type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    /// Externally supplied unique key.
    pub id: String,
    /// Must reference an existing `SensorType` at add time.
    pub sensor_type_id: String,
    /// Sampling period in seconds, positive.
    pub period: i64,
    /// Expected-value range for this deployment.
    pub expected: Interval,
}

/// One timestamped measurement from a sensor.
///
/// Keyed by the composite `(sensor_id, timestamp)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    /// Must reference an existing `Sensor`.
    pub sensor_id: String,
    pub timestamp: i64,
    pub value: f64,
}

/// The three record kinds held by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    SensorType,
    Sensor,
    SensorReading,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RecordKind::SensorType => "sensor type",
            RecordKind::Sensor => "sensor",
            RecordKind::SensorReading => "sensor reading",
        };
        f.write_str(name)
    }
}
