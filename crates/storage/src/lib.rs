//! Storage Layer
//!
//! SQLite persistence for the sensor store, behind the same `SensorStore`
//! trait as the in-memory variant so the engine stays swappable.

mod sqlite;

pub use sqlite::SqliteStore;
