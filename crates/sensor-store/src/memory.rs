//! In-memory sensor store.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, info};

use request_validator::{reading_from_req, sensor_from_req, sensor_type_from_req, FlatReq};
use sensor_model::{
    ReadingQuery, Result, Sensor, SensorQuery, SensorReading, SensorType, SensorTypeQuery,
    SensorsError,
};

use crate::filter;
use crate::traits::SensorStore;

/// The three keyed collections. `BTreeMap` keeps each collection in key
/// order, which is exactly the required result order: ids ascending
/// lexicographically, readings ascending by `(sensor_id, timestamp)`.
#[derive(Debug, Default)]
struct Collections {
    sensor_types: BTreeMap<String, SensorType>,
    sensors: BTreeMap<String, Sensor>,
    readings: BTreeMap<(String, i64), SensorReading>,
}

/// In-memory store.
///
/// Duplicate-key policy: insert with an existing key replaces the prior
/// record and returns the stored record; there is no duplicate error.
///
/// The store owns its collections exclusively; one instance is constructed
/// and injected wherever it is needed. Each operation runs to completion
/// under the lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        info!("creating in-memory sensor store");
        Self { inner: Mutex::new(Collections::default()) }
    }

    /// Create a store preloaded from flat requests, added in dependency
    /// order: sensor types, then sensors, then readings. The first failing
    /// request aborts the load.
    pub fn with_data(
        sensor_types: &[FlatReq],
        sensors: &[FlatReq],
        readings: &[FlatReq],
    ) -> Result<Self> {
        let store = Self::new();
        store.load(sensor_types, sensors, readings)?;
        Ok(store)
    }

    /// Replay flat requests into this store; see [`MemoryStore::with_data`].
    pub fn load(
        &self,
        sensor_types: &[FlatReq],
        sensors: &[FlatReq],
        readings: &[FlatReq],
    ) -> Result<()> {
        for req in sensor_types {
            self.put_sensor_type(sensor_type_from_req(req)?)?;
        }
        for req in sensors {
            self.put_sensor(sensor_from_req(req)?)?;
        }
        for req in readings {
            self.put_reading(reading_from_req(req)?)?;
        }
        debug!(
            sensor_types = sensor_types.len(),
            sensors = sensors.len(),
            readings = readings.len(),
            "preloaded in-memory store"
        );
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>> {
        self.inner.lock().map_err(|e| SensorsError::Db(format!("lock poisoned: {e}")))
    }

    /// Insert or replace a sensor type.
    pub fn put_sensor_type(&self, sensor_type: SensorType) -> Result<SensorType> {
        let mut inner = self.lock()?;
        inner.sensor_types.insert(sensor_type.id.clone(), sensor_type.clone());
        Ok(sensor_type)
    }

    /// Insert or replace a sensor; its sensor type must already exist.
    pub fn put_sensor(&self, sensor: Sensor) -> Result<Sensor> {
        let mut inner = self.lock()?;
        if !inner.sensor_types.contains_key(&sensor.sensor_type_id) {
            return Err(SensorsError::unknown_id("sensorTypeId", &sensor.sensor_type_id));
        }
        inner.sensors.insert(sensor.id.clone(), sensor.clone());
        Ok(sensor)
    }

    /// Insert or replace a reading under `(sensor_id, timestamp)`; its
    /// sensor must already exist.
    pub fn put_reading(&self, reading: SensorReading) -> Result<SensorReading> {
        let mut inner = self.lock()?;
        if !inner.sensors.contains_key(&reading.sensor_id) {
            return Err(SensorsError::unknown_id("sensorId", &reading.sensor_id));
        }
        inner
            .readings
            .insert((reading.sensor_id.clone(), reading.timestamp), reading.clone());
        Ok(reading)
    }

    /// Scan sensor types; result is id-ascending by construction.
    pub fn query_sensor_types(&self, query: &SensorTypeQuery) -> Result<Vec<SensorType>> {
        let inner = self.lock()?;
        Ok(inner
            .sensor_types
            .values()
            .filter(|sensor_type| filter::sensor_type_matches(sensor_type, query))
            .cloned()
            .collect())
    }

    /// Scan sensors; result is id-ascending by construction.
    pub fn query_sensors(&self, query: &SensorQuery) -> Result<Vec<Sensor>> {
        let inner = self.lock()?;
        Ok(inner
            .sensors
            .values()
            .filter(|sensor| filter::sensor_matches(sensor, query))
            .cloned()
            .collect())
    }

    /// Range-scan readings for one sensor; result is timestamp-ascending by
    /// construction.
    pub fn query_readings(&self, query: &ReadingQuery) -> Result<Vec<SensorReading>> {
        let inner = self.lock()?;
        let low = query.min_timestamp.unwrap_or(i64::MIN);
        let high = query.max_timestamp.unwrap_or(i64::MAX);
        if low > high {
            return Ok(Vec::new());
        }
        let range = (query.sensor_id.clone(), low)..=(query.sensor_id.clone(), high);
        Ok(inner
            .readings
            .range(range)
            .map(|(_, reading)| reading)
            .filter(|reading| filter::reading_matches(reading, query))
            .cloned()
            .collect())
    }

    /// Empty all three collections.
    pub fn clear_all(&self) -> Result<()> {
        let mut inner = self.lock()?;
        inner.sensor_types.clear();
        inner.sensors.clear();
        inner.readings.clear();
        debug!("cleared in-memory store");
        Ok(())
    }
}

#[async_trait]
impl SensorStore for MemoryStore {
    async fn add_sensor_type(&self, sensor_type: SensorType) -> Result<SensorType> {
        self.put_sensor_type(sensor_type)
    }

    async fn add_sensor(&self, sensor: Sensor) -> Result<Sensor> {
        self.put_sensor(sensor)
    }

    async fn add_reading(&self, reading: SensorReading) -> Result<SensorReading> {
        self.put_reading(reading)
    }

    async fn find_sensor_types(&self, query: &SensorTypeQuery) -> Result<Vec<SensorType>> {
        self.query_sensor_types(query)
    }

    async fn find_sensors(&self, query: &SensorQuery) -> Result<Vec<Sensor>> {
        self.query_sensors(query)
    }

    async fn find_readings(&self, query: &ReadingQuery) -> Result<Vec<SensorReading>> {
        self.query_readings(query)
    }

    async fn clear(&self) -> Result<()> {
        self.clear_all()
    }
}
