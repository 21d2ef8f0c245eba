//! Item and claim routes.
//!
//! Public: report, browse, claim, mark found.
//! Admin (behind the auth middleware): approve, reject, override, claim listing.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Extension, Path, Query, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use lostfound_core::{ClaimId, ItemId};
use lostfound_infra::ServiceError;
use lostfound_items::ItemStatus;

use crate::app::{dto, errors, services::AppServices};
use crate::context::AdminContext;

// ───────────────────────────────────────────────────────────────────────────
// Public
// ───────────────────────────────────────────────────────────────────────────

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListItemsQuery>,
) -> axum::response::Response {
    let filter = match query.into_filter() {
        Ok(f) => f,
        Err(e) => return errors::service_error_to_response(e.into()),
    };

    match services.lifecycle.list_items(&filter).await {
        Ok(items) => {
            let body: Vec<dto::ItemResponse> = items.into_iter().map(Into::into).collect();
            Json(body).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn report_item(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::ReportItemRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match errors::json_body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let cmd = match body.into_command() {
        Ok(c) => c,
        Err(e) => return errors::service_error_to_response(e.into()),
    };

    match services.lifecycle.report_item(cmd).await {
        Ok(item) => (StatusCode::CREATED, Json(dto::ItemResponse::from(item))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id = match errors::parse_id::<ItemId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.lifecycle.get_item(item_id).await {
        Ok(item) => Json(dto::ItemResponse::from(item)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn submit_claim(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<dto::SubmitClaimRequest>, JsonRejection>,
) -> axum::response::Response {
    let item_id = match errors::parse_id::<ItemId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let body = match errors::json_body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services.lifecycle.submit_claim(item_id, body.into()).await {
        Ok(submission) => (
            StatusCode::CREATED,
            Json(dto::ItemWithClaimResponse::from(submission)),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn mark_found(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id = match errors::parse_id::<ItemId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.lifecycle.mark_found(item_id).await {
        Ok(item) => Json(dto::ItemResponse::from(item)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

// ───────────────────────────────────────────────────────────────────────────
// Admin
// ───────────────────────────────────────────────────────────────────────────

pub async fn approve_claim(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path(id): Path<String>,
    body: Bytes,
) -> axum::response::Response {
    let (item_id, selection) = match item_and_selection(&id, &body) {
        Ok(parsed) => parsed,
        Err(resp) => return resp,
    };

    match services
        .lifecycle
        .approve_claim(admin.identity(), item_id, selection)
        .await
    {
        Ok(approval) => Json(dto::ItemWithClaimResponse::from(approval)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn reject_claim(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path(id): Path<String>,
    body: Bytes,
) -> axum::response::Response {
    let (item_id, selection) = match item_and_selection(&id, &body) {
        Ok(parsed) => parsed,
        Err(resp) => return resp,
    };

    match services
        .lifecycle
        .reject_claim(admin.identity(), item_id, selection)
        .await
    {
        Ok(rejection) => Json(dto::ItemWithClaimResponse::from(rejection)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn override_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path(id): Path<String>,
    payload: Result<Json<dto::StatusOverrideRequest>, JsonRejection>,
) -> axum::response::Response {
    let item_id = match errors::parse_id::<ItemId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let body = match errors::json_body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let status = match ItemStatus::parse(&body.status) {
        Ok(s) => s,
        Err(e) => return errors::service_error_to_response(e.into()),
    };

    match services
        .lifecycle
        .override_status(admin.identity(), item_id, status)
        .await
    {
        Ok(item) => Json(dto::ItemResponse::from(item)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_claims(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id = match errors::parse_id::<ItemId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.lifecycle.list_claims(admin.identity(), item_id).await {
        Ok(claims) => {
            let body: Vec<dto::ClaimResponse> = claims.into_iter().map(Into::into).collect();
            Json(body).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

fn item_and_selection(
    id: &str,
    body: &Bytes,
) -> Result<(ItemId, Option<ClaimId>), axum::response::Response> {
    let item_id = errors::parse_id::<ItemId>(id)?;
    let selection: dto::ClaimSelectionRequest = errors::optional_json_body(body)?;
    let claim_id = selection
        .claim_id()
        .map_err(|e| errors::service_error_to_response(ServiceError::from(e)))?;
    Ok((item_id, claim_id))
}
