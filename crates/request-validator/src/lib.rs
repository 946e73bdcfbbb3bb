//! Request Validation
//!
//! Turns the flat string-keyed requests produced by form submission or
//! query-string parsing into typed records and find queries. All failures
//! are reported through the shared error taxonomy: `REQUIRED` for missing
//! fields, `BAD_VAL` for malformed values or unknown field names,
//! `BAD_RANGE` for ranges with min >= max.
//!
//! Referential checks (`BAD_ID`) are not performed here; they belong to the
//! stores, which own the collections.

mod fields;
mod queries;
mod records;

use std::collections::HashMap;

/// A flat request: field name to raw string value.
pub type FlatReq = HashMap<String, String>;

pub use queries::{reading_query_from_req, sensor_query_from_req, sensor_type_query_from_req};
pub use records::{reading_from_req, sensor_from_req, sensor_type_from_req};
