//! API Error Mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use sensor_model::SensorsError;

/// Wrapper turning a [`SensorsError`] into an HTTP response.
///
/// Validation failures map to 400, unknown references to 404, duplicate
/// keys to 409, and infrastructure failures to 500. The body keeps the
/// structured code/message pair the rest of the system uses.
#[derive(Debug)]
pub struct ApiError(pub SensorsError);

impl From<SensorsError> for ApiError {
    fn from(err: SensorsError) -> Self {
        ApiError(err)
    }
}

#[derive(Debug, Serialize)]
struct ErrorItem {
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    errors: Vec<ErrorItem>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SensorsError::Required { .. }
            | SensorsError::BadValue { .. }
            | SensorsError::BadRange { .. } => StatusCode::BAD_REQUEST,
            SensorsError::UnknownId { .. } => StatusCode::NOT_FOUND,
            SensorsError::Exists { .. } => StatusCode::CONFLICT,
            SensorsError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            errors: vec![ErrorItem { code: self.0.code(), message: self.0.to_string() }],
        };
        (status, Json(body)).into_response()
    }
}
