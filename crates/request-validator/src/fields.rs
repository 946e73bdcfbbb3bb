//! Field Extraction Helpers

use crate::FlatReq;
use sensor_model::{Interval, Result, SensorsError};

/// Get a required field. Empty or whitespace-only values count as missing,
/// since HTML forms submit untouched inputs as empty strings.
pub(crate) fn require<'a>(req: &'a FlatReq, field: &str) -> Result<&'a str> {
    match req.get(field).map(|v| v.trim()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SensorsError::required(field)),
    }
}

/// Get an optional field, treating empty values as absent.
pub(crate) fn optional<'a>(req: &'a FlatReq, field: &str) -> Option<&'a str> {
    req.get(field).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Reject field names outside `allowed`, so a misspelled filter fails
/// loudly instead of matching nothing or everything.
pub(crate) fn check_fields(req: &FlatReq, allowed: &[&str]) -> Result<()> {
    for name in req.keys() {
        if !allowed.contains(&name.as_str()) {
            return Err(SensorsError::bad_value(name, "unknown field"));
        }
    }
    Ok(())
}

pub(crate) fn parse_i64(field: &str, raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| SensorsError::bad_value(field, format!("expected an integer, got {raw:?}")))
}

pub(crate) fn parse_f64(field: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .parse()
        .map_err(|_| SensorsError::bad_value(field, format!("expected a number, got {raw:?}")))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SensorsError::bad_value(field, "expected a finite number"))
    }
}

/// Build an interval, enforcing min < max.
pub(crate) fn interval(field: &str, min: f64, max: f64) -> Result<Interval> {
    if min < max {
        Ok(Interval { min, max })
    } else {
        Err(SensorsError::BadRange { field: field.to_string(), min, max })
    }
}
