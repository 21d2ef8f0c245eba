use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::de::DeserializeOwned;
use serde_json::json;

use lostfound_core::DomainError;
use lostfound_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    let status = match &err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
        ServiceError::AlreadyExists(_) => StatusCode::CONFLICT,
        ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ServiceError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "request failed on infrastructure");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    json_error(status, err.code(), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a path identifier, answering 400 on malformed input.
pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: std::str::FromStr<Err = DomainError>,
{
    raw.parse::<T>()
        .map_err(|e| service_error_to_response(ServiceError::from(e)))
}

/// Unwrap a required JSON body, answering 400 when it is missing or malformed.
pub fn json_body<T>(payload: Result<axum::Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    payload
        .map(|axum::Json(body)| body)
        .map_err(|rejection| {
            json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
        })
}

/// Parse an optional JSON body: an empty body means `T::default()`.
pub fn optional_json_body<T>(body: &Bytes) -> Result<T, axum::response::Response>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        json_error(StatusCode::BAD_REQUEST, "validation_error", format!("invalid JSON body: {e}"))
    })
}
