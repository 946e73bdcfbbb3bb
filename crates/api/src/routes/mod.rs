//! Route Handlers

use serde::Serialize;

pub mod readings;
pub mod sensor_types;
pub mod sensors;

/// Envelope for find results.
#[derive(Debug, Serialize)]
pub struct FindResponse<T> {
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> FindResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { count: data.len(), data }
    }
}
