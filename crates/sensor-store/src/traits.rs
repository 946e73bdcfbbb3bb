//! SensorStore trait definition.

use async_trait::async_trait;

use sensor_model::{
    ReadingQuery, Result, Sensor, SensorQuery, SensorReading, SensorType, SensorTypeQuery,
};

/// Trait for sensor storage backends.
///
/// This trait abstracts the storage layer over the generic persistence
/// capability — keyed insert, find-by-query, delete-all — so the web
/// service works with different backends (memory, SQLite) without change.
///
/// Duplicate-key policy is per-backend and documented on each
/// implementation: the in-memory store replaces, the persistent store
/// rejects with `EXISTS`. Everything else behaves identically.
#[async_trait]
pub trait SensorStore: Send + Sync {
    /// Add a sensor type under its id.
    async fn add_sensor_type(&self, sensor_type: SensorType) -> Result<SensorType>;

    /// Add a sensor under its id.
    ///
    /// Fails with `BAD_ID` when `sensor_type_id` references no existing
    /// sensor type.
    async fn add_sensor(&self, sensor: Sensor) -> Result<Sensor>;

    /// Add a reading under its composite `(sensor_id, timestamp)` key.
    ///
    /// Fails with `BAD_ID` when `sensor_id` references no existing sensor.
    async fn add_reading(&self, reading: SensorReading) -> Result<SensorReading>;

    /// Find sensor types matching every supplied query field, sorted
    /// ascending by id. Returns `[]` when none match, never an error.
    async fn find_sensor_types(&self, query: &SensorTypeQuery) -> Result<Vec<SensorType>>;

    /// Find sensors matching every supplied query field, sorted ascending
    /// by id.
    async fn find_sensors(&self, query: &SensorQuery) -> Result<Vec<Sensor>>;

    /// Find readings for the queried sensor within the inclusive bounds,
    /// sorted ascending by timestamp (numeric).
    async fn find_readings(&self, query: &ReadingQuery) -> Result<Vec<SensorReading>>;

    /// Empty all three collections. Idempotent.
    async fn clear(&self) -> Result<()>;
}
