//! Query-Filter Predicates
//!
//! Pure predicates deciding whether one record satisfies a query. Every
//! supplied field must match; absent fields impose no constraint.

use sensor_model::{ReadingQuery, Sensor, SensorQuery, SensorReading, SensorType, SensorTypeQuery};

fn field_matches(filter: Option<&str>, value: &str) -> bool {
    filter.map_or(true, |wanted| wanted == value)
}

/// Exact match on every supplied sensor-type field.
pub fn sensor_type_matches(sensor_type: &SensorType, query: &SensorTypeQuery) -> bool {
    field_matches(query.id.as_deref(), &sensor_type.id)
        && field_matches(query.manufacturer.as_deref(), &sensor_type.manufacturer)
        && field_matches(query.model_number.as_deref(), &sensor_type.model_number)
        && field_matches(query.quantity.as_deref(), &sensor_type.quantity)
        && field_matches(query.unit.as_deref(), &sensor_type.unit)
}

/// Exact match on every supplied sensor field.
pub fn sensor_matches(sensor: &Sensor, query: &SensorQuery) -> bool {
    field_matches(query.id.as_deref(), &sensor.id)
        && field_matches(query.sensor_type_id.as_deref(), &sensor.sensor_type_id)
}

/// Exact match on `sensor_id`, inclusive bounds on timestamp and value,
/// exact `value` applied alongside the bounds when supplied.
pub fn reading_matches(reading: &SensorReading, query: &ReadingQuery) -> bool {
    reading.sensor_id == query.sensor_id
        && query.min_timestamp.map_or(true, |min| reading.timestamp >= min)
        && query.max_timestamp.map_or(true, |max| reading.timestamp <= max)
        && query.min_value.map_or(true, |min| reading.value >= min)
        && query.max_value.map_or(true, |max| reading.value <= max)
        && query.value.map_or(true, |exact| reading.value == exact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensor_model::Interval;

    fn sensor_type() -> SensorType {
        SensorType {
            id: "t1".to_string(),
            manufacturer: "Acme".to_string(),
            model_number: "m-100".to_string(),
            quantity: "temperature".to_string(),
            unit: "C".to_string(),
            limits: Interval { min: -40.0, max: 85.0 },
        }
    }

    fn reading(timestamp: i64, value: f64) -> SensorReading {
        SensorReading { sensor_id: "s1".to_string(), timestamp, value }
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(sensor_type_matches(&sensor_type(), &SensorTypeQuery::default()));
    }

    #[test]
    fn test_every_supplied_field_must_match() {
        // manufacturer matches but unit does not; the record must be rejected
        let query = SensorTypeQuery {
            manufacturer: Some("Acme".to_string()),
            unit: Some("F".to_string()),
            ..Default::default()
        };
        assert!(!sensor_type_matches(&sensor_type(), &query));
    }

    #[test]
    fn test_reading_bounds_are_inclusive() {
        let mut query = ReadingQuery::all_for("s1");
        query.min_timestamp = Some(100);
        query.max_timestamp = Some(200);
        assert!(reading_matches(&reading(100, 1.0), &query));
        assert!(reading_matches(&reading(200, 1.0), &query));
        assert!(!reading_matches(&reading(99, 1.0), &query));
        assert!(!reading_matches(&reading(201, 1.0), &query));
    }

    #[test]
    fn test_reading_requires_sensor_id_match() {
        let query = ReadingQuery::all_for("other");
        assert!(!reading_matches(&reading(100, 1.0), &query));
    }

    #[test]
    fn test_exact_value_applies_alongside_bounds() {
        let mut query = ReadingQuery::all_for("s1");
        query.min_value = Some(0.0);
        query.max_value = Some(10.0);
        query.value = Some(5.0);
        assert!(reading_matches(&reading(1, 5.0), &query));
        // in bounds but not the exact value
        assert!(!reading_matches(&reading(1, 6.0), &query));
    }
}
