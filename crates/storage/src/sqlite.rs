//! SQLite-backed sensor store.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use sensor_model::{
    Interval, ReadingQuery, RecordKind, Result, Sensor, SensorQuery, SensorReading, SensorType,
    SensorTypeQuery, SensorsError,
};
use sensor_store::SensorStore;

const CREATE_SENSOR_TYPES: &str = "
CREATE TABLE IF NOT EXISTS sensor_types (
    id           TEXT PRIMARY KEY,
    manufacturer TEXT NOT NULL,
    model_number TEXT NOT NULL,
    quantity     TEXT NOT NULL,
    unit         TEXT NOT NULL,
    limits_min   REAL NOT NULL,
    limits_max   REAL NOT NULL
)";

const CREATE_SENSORS: &str = "
CREATE TABLE IF NOT EXISTS sensors (
    id             TEXT PRIMARY KEY,
    sensor_type_id TEXT NOT NULL REFERENCES sensor_types(id),
    period         INTEGER NOT NULL,
    expected_min   REAL NOT NULL,
    expected_max   REAL NOT NULL
)";

const CREATE_READINGS: &str = "
CREATE TABLE IF NOT EXISTS sensor_readings (
    sensor_id TEXT NOT NULL REFERENCES sensors(id),
    timestamp INTEGER NOT NULL,
    value     REAL NOT NULL,
    PRIMARY KEY (sensor_id, timestamp)
)";

/// Persistent store over SQLite.
///
/// Duplicate-key policy: adds use plain `INSERT` and reject an existing key
/// with `EXISTS`. Referential checks ride on the foreign-key constraints
/// and surface as `BAD_ID`. Every operation is one round trip; cancellation
/// and timeouts are the driver's.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `url` (`sqlite://path` or `sqlite::memory:`), creating
    /// the file and the schema as needed.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| SensorsError::Db(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        // a :memory: database exists per connection; keep exactly one
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| SensorsError::Db(e.to_string()))?;

        let store = Self { pool };
        store.create_schema().await?;
        info!(url, "sqlite sensor store connected");
        Ok(store)
    }

    /// Wrap an existing pool. The schema is assumed present; call
    /// [`SqliteStore::connect`] to create it.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Close the underlying pool. Further operations fail with `DB`.
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("sqlite sensor store closed");
    }

    async fn create_schema(&self) -> Result<()> {
        for statement in [CREATE_SENSOR_TYPES, CREATE_SENSORS, CREATE_READINGS] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| SensorsError::Db(e.to_string()))?;
        }
        Ok(())
    }
}

/// Map an insert failure: unique-constraint violation means the key exists,
/// foreign-key violation means the referenced record does not.
fn insert_error(
    err: sqlx::Error,
    kind: RecordKind,
    key: &str,
    reference: Option<(&str, &str)>,
) -> SensorsError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.kind() {
            ErrorKind::UniqueViolation => {
                return SensorsError::Exists { kind, key: key.to_string() };
            }
            ErrorKind::ForeignKeyViolation => {
                if let Some((field, id)) = reference {
                    return SensorsError::unknown_id(field, id);
                }
            }
            _ => {}
        }
    }
    SensorsError::Db(err.to_string())
}

fn find_error(err: sqlx::Error) -> SensorsError {
    SensorsError::Db(err.to_string())
}

#[derive(sqlx::FromRow)]
struct SensorTypeRow {
    id: String,
    manufacturer: String,
    model_number: String,
    quantity: String,
    unit: String,
    limits_min: f64,
    limits_max: f64,
}

impl From<SensorTypeRow> for SensorType {
    fn from(row: SensorTypeRow) -> Self {
        SensorType {
            id: row.id,
            manufacturer: row.manufacturer,
            model_number: row.model_number,
            quantity: row.quantity,
            unit: row.unit,
            limits: Interval { min: row.limits_min, max: row.limits_max },
        }
    }
}

#[derive(sqlx::FromRow)]
struct SensorRow {
    id: String,
    sensor_type_id: String,
    period: i64,
    expected_min: f64,
    expected_max: f64,
}

impl From<SensorRow> for Sensor {
    fn from(row: SensorRow) -> Self {
        Sensor {
            id: row.id,
            sensor_type_id: row.sensor_type_id,
            period: row.period,
            expected: Interval { min: row.expected_min, max: row.expected_max },
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReadingRow {
    sensor_id: String,
    timestamp: i64,
    value: f64,
}

impl From<ReadingRow> for SensorReading {
    fn from(row: ReadingRow) -> Self {
        SensorReading { sensor_id: row.sensor_id, timestamp: row.timestamp, value: row.value }
    }
}

#[async_trait]
impl SensorStore for SqliteStore {
    async fn add_sensor_type(&self, sensor_type: SensorType) -> Result<SensorType> {
        sqlx::query(
            "INSERT INTO sensor_types \
             (id, manufacturer, model_number, quantity, unit, limits_min, limits_max) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&sensor_type.id)
        .bind(&sensor_type.manufacturer)
        .bind(&sensor_type.model_number)
        .bind(&sensor_type.quantity)
        .bind(&sensor_type.unit)
        .bind(sensor_type.limits.min)
        .bind(sensor_type.limits.max)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, RecordKind::SensorType, &sensor_type.id, None))?;
        Ok(sensor_type)
    }

    async fn add_sensor(&self, sensor: Sensor) -> Result<Sensor> {
        sqlx::query(
            "INSERT INTO sensors (id, sensor_type_id, period, expected_min, expected_max) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&sensor.id)
        .bind(&sensor.sensor_type_id)
        .bind(sensor.period)
        .bind(sensor.expected.min)
        .bind(sensor.expected.max)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            insert_error(
                e,
                RecordKind::Sensor,
                &sensor.id,
                Some(("sensorTypeId", &sensor.sensor_type_id)),
            )
        })?;
        Ok(sensor)
    }

    async fn add_reading(&self, reading: SensorReading) -> Result<SensorReading> {
        sqlx::query("INSERT INTO sensor_readings (sensor_id, timestamp, value) VALUES (?, ?, ?)")
            .bind(&reading.sensor_id)
            .bind(reading.timestamp)
            .bind(reading.value)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                let key = format!("{}@{}", reading.sensor_id, reading.timestamp);
                insert_error(
                    e,
                    RecordKind::SensorReading,
                    &key,
                    Some(("sensorId", &reading.sensor_id)),
                )
            })?;
        Ok(reading)
    }

    async fn find_sensor_types(&self, query: &SensorTypeQuery) -> Result<Vec<SensorType>> {
        let mut sql = QueryBuilder::<Sqlite>::new(
            "SELECT id, manufacturer, model_number, quantity, unit, limits_min, limits_max \
             FROM sensor_types WHERE 1=1",
        );
        if let Some(id) = &query.id {
            sql.push(" AND id = ").push_bind(id);
        }
        if let Some(manufacturer) = &query.manufacturer {
            sql.push(" AND manufacturer = ").push_bind(manufacturer);
        }
        if let Some(model_number) = &query.model_number {
            sql.push(" AND model_number = ").push_bind(model_number);
        }
        if let Some(quantity) = &query.quantity {
            sql.push(" AND quantity = ").push_bind(quantity);
        }
        if let Some(unit) = &query.unit {
            sql.push(" AND unit = ").push_bind(unit);
        }
        sql.push(" ORDER BY id ASC");

        let rows: Vec<SensorTypeRow> =
            sql.build_query_as().fetch_all(&self.pool).await.map_err(find_error)?;
        Ok(rows.into_iter().map(SensorType::from).collect())
    }

    async fn find_sensors(&self, query: &SensorQuery) -> Result<Vec<Sensor>> {
        let mut sql = QueryBuilder::<Sqlite>::new(
            "SELECT id, sensor_type_id, period, expected_min, expected_max \
             FROM sensors WHERE 1=1",
        );
        if let Some(id) = &query.id {
            sql.push(" AND id = ").push_bind(id);
        }
        if let Some(sensor_type_id) = &query.sensor_type_id {
            sql.push(" AND sensor_type_id = ").push_bind(sensor_type_id);
        }
        sql.push(" ORDER BY id ASC");

        let rows: Vec<SensorRow> =
            sql.build_query_as().fetch_all(&self.pool).await.map_err(find_error)?;
        Ok(rows.into_iter().map(Sensor::from).collect())
    }

    async fn find_readings(&self, query: &ReadingQuery) -> Result<Vec<SensorReading>> {
        let mut sql = QueryBuilder::<Sqlite>::new(
            "SELECT sensor_id, timestamp, value FROM sensor_readings WHERE sensor_id = ",
        );
        sql.push_bind(&query.sensor_id);
        if let Some(min) = query.min_timestamp {
            sql.push(" AND timestamp >= ").push_bind(min);
        }
        if let Some(max) = query.max_timestamp {
            sql.push(" AND timestamp <= ").push_bind(max);
        }
        if let Some(min) = query.min_value {
            sql.push(" AND value >= ").push_bind(min);
        }
        if let Some(max) = query.max_value {
            sql.push(" AND value <= ").push_bind(max);
        }
        if let Some(exact) = query.value {
            sql.push(" AND value = ").push_bind(exact);
        }
        sql.push(" ORDER BY timestamp ASC");

        let rows: Vec<ReadingRow> =
            sql.build_query_as().fetch_all(&self.pool).await.map_err(find_error)?;
        Ok(rows.into_iter().map(SensorReading::from).collect())
    }

    async fn clear(&self) -> Result<()> {
        // child tables first so foreign keys never block the delete
        for statement in
            ["DELETE FROM sensor_readings", "DELETE FROM sensors", "DELETE FROM sensor_types"]
        {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| SensorsError::Db(e.to_string()))?;
        }
        debug!("cleared sqlite sensor store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor_type(id: &str, manufacturer: &str) -> SensorType {
        SensorType {
            id: id.to_string(),
            manufacturer: manufacturer.to_string(),
            model_number: "m-100".to_string(),
            quantity: "temperature".to_string(),
            unit: "C".to_string(),
            limits: Interval { min: -40.0, max: 85.0 },
        }
    }

    fn sensor(id: &str, sensor_type_id: &str) -> Sensor {
        Sensor {
            id: id.to_string(),
            sensor_type_id: sensor_type_id.to_string(),
            period: 30,
            expected: Interval { min: 0.0, max: 50.0 },
        }
    }

    fn reading(sensor_id: &str, timestamp: i64, value: f64) -> SensorReading {
        SensorReading { sensor_id: sensor_id.to_string(), timestamp, value }
    }

    async fn memory_store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:").await.unwrap()
    }

    async fn store_with_sensor() -> SqliteStore {
        let store = memory_store().await;
        store.add_sensor_type(sensor_type("t1", "Acme")).await.unwrap();
        store.add_sensor(sensor("s1", "t1")).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_add_then_find_by_id() {
        let store = memory_store().await;
        let added = store.add_sensor_type(sensor_type("t1", "Acme")).await.unwrap();
        let query = SensorTypeQuery { id: Some("t1".to_string()), ..Default::default() };
        assert_eq!(store.find_sensor_types(&query).await.unwrap(), vec![added]);
    }

    #[tokio::test]
    async fn test_duplicate_sensor_type_is_exists() {
        let store = memory_store().await;
        store.add_sensor_type(sensor_type("t1", "Acme")).await.unwrap();
        let err = store.add_sensor_type(sensor_type("t1", "Globex")).await.unwrap_err();
        assert_eq!(err.code(), "EXISTS");
    }

    #[tokio::test]
    async fn test_unknown_sensor_type_id_is_bad_id() {
        let store = memory_store().await;
        let err = store.add_sensor(sensor("s1", "nope")).await.unwrap_err();
        assert_eq!(err.code(), "BAD_ID");
        assert!(err.to_string().contains("nope"));
    }

    #[tokio::test]
    async fn test_duplicate_reading_key_is_exists() {
        let store = store_with_sensor().await;
        store.add_reading(reading("s1", 100, 1.0)).await.unwrap();
        let err = store.add_reading(reading("s1", 100, 2.0)).await.unwrap_err();
        assert_eq!(err.code(), "EXISTS");
        // same sensor, different timestamp is a fresh key
        store.add_reading(reading("s1", 101, 2.0)).await.unwrap();
    }

    #[tokio::test]
    async fn test_reading_for_unknown_sensor_is_bad_id() {
        let store = memory_store().await;
        let err = store.add_reading(reading("ghost", 100, 1.0)).await.unwrap_err();
        assert_eq!(err.code(), "BAD_ID");
    }

    #[tokio::test]
    async fn test_find_sensor_types_filters_and_sorts() {
        let store = memory_store().await;
        store.add_sensor_type(sensor_type("t3", "Acme")).await.unwrap();
        store.add_sensor_type(sensor_type("t1", "Acme")).await.unwrap();
        store.add_sensor_type(sensor_type("t2", "Globex")).await.unwrap();

        let query =
            SensorTypeQuery { manufacturer: Some("Acme".to_string()), ..Default::default() };
        let found = store.find_sensor_types(&query).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t3"]);

        let none =
            SensorTypeQuery { manufacturer: Some("Initech".to_string()), ..Default::default() };
        assert!(store.find_sensor_types(&none).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_multi_field_query_requires_all_matches() {
        let store = memory_store().await;
        store.add_sensor_type(sensor_type("t1", "Acme")).await.unwrap();
        let query = SensorTypeQuery {
            manufacturer: Some("Acme".to_string()),
            unit: Some("F".to_string()),
            ..Default::default()
        };
        assert!(store.find_sensor_types(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reading_range_query_is_inclusive_and_sorted() {
        let store = store_with_sensor().await;
        store.add_sensor(sensor("s2", "t1")).await.unwrap();
        for (timestamp, value) in [(250, 5.0), (100, 1.0), (200, 4.0), (99, 0.5), (150, 2.0)] {
            store.add_reading(reading("s1", timestamp, value)).await.unwrap();
        }
        store.add_reading(reading("s2", 150, 9.0)).await.unwrap();

        let mut query = ReadingQuery::all_for("s1");
        query.min_timestamp = Some(100);
        query.max_timestamp = Some(200);
        let found = store.find_readings(&query).await.unwrap();
        let timestamps: Vec<i64> = found.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![100, 150, 200]);
    }

    #[tokio::test]
    async fn test_value_bounds_and_exact_value() {
        let store = store_with_sensor().await;
        for (timestamp, value) in [(1, 10.0), (2, 20.0), (3, 30.0)] {
            store.add_reading(reading("s1", timestamp, value)).await.unwrap();
        }
        let mut bounds = ReadingQuery::all_for("s1");
        bounds.min_value = Some(15.0);
        bounds.max_value = Some(30.0);
        let found = store.find_readings(&bounds).await.unwrap();
        assert_eq!(found.iter().map(|r| r.value).collect::<Vec<_>>(), vec![20.0, 30.0]);

        let mut exact = ReadingQuery::all_for("s1");
        exact.value = Some(20.0);
        let found = store.find_readings(&exact).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].timestamp, 2);
    }

    #[tokio::test]
    async fn test_clear_empties_and_allows_re_add() {
        let store = store_with_sensor().await;
        store.add_reading(reading("s1", 100, 1.0)).await.unwrap();
        store.clear().await.unwrap();

        assert!(store
            .find_sensor_types(&SensorTypeQuery::default())
            .await
            .unwrap()
            .is_empty());
        assert!(store.find_sensors(&SensorQuery::default()).await.unwrap().is_empty());
        assert!(store.find_readings(&ReadingQuery::all_for("s1")).await.unwrap().is_empty());

        // schema survives the clear; the same keys can be added again
        store.add_sensor_type(sensor_type("t1", "Acme")).await.unwrap();
        store.clear().await.unwrap();
    }
}
