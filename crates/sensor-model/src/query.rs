//! Find Queries
//!
//! A query carries the filters a find operation may apply. Absent fields
//! impose no constraint.

/// Exact-match filters over sensor types. All primitive fields can filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorTypeQuery {
    pub id: Option<String>,
    pub manufacturer: Option<String>,
    pub model_number: Option<String>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

/// Exact-match filters over sensors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorQuery {
    pub id: Option<String>,
    pub sensor_type_id: Option<String>,
}

/// Filters over sensor readings.
///
/// `sensor_id` is required and matched exactly; the bounds are inclusive and
/// default to unbounded when absent. An exact `value`, if supplied, is
/// applied alongside the bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingQuery {
    pub sensor_id: String,
    pub min_timestamp: Option<i64>,
    pub max_timestamp: Option<i64>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub value: Option<f64>,
}

impl ReadingQuery {
    /// Query returning every reading for one sensor.
    pub fn all_for(sensor_id: &str) -> Self {
        Self {
            sensor_id: sensor_id.to_string(),
            min_timestamp: None,
            max_timestamp: None,
            min_value: None,
            max_value: None,
            value: None,
        }
    }
}
