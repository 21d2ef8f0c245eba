//! Admin provisioning and session routes.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::app::{dto, errors, services::AppServices};
use crate::context::AdminContext;

pub async fn admin_exists(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.admin.admin_exists().await {
        Ok(exists) => Json(dto::AdminExistsResponse { exists }).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::AdminCredentialsRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match errors::json_body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services.admin.register(body.into()).await {
        Ok(identity) => (StatusCode::CREATED, Json(dto::AdminResponse::from(identity))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::AdminCredentialsRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match errors::json_body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services.admin.login(body.into()).await {
        Ok(session) => Json(dto::AdminSessionResponse::from(session)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn whoami(Extension(admin): Extension<AdminContext>) -> axum::response::Response {
    Json(dto::AdminResponse::from(admin.identity().clone())).into_response()
}
