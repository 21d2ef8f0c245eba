use axum::{
    Router,
    routing::{get, post, put},
};

pub mod admin;
pub mod items;
pub mod system;

/// Endpoints anyone may call (reporting, claiming, browsing, admin bootstrap/login).
pub fn public_router() -> Router {
    Router::new()
        .route("/items", get(items::list_items).post(items::report_item))
        .route("/items/:id", get(items::get_item))
        .route("/items/:id/claim", post(items::submit_claim))
        .route("/items/:id/found", put(items::mark_found))
        .route("/admin/exists", get(admin::admin_exists))
        .route("/admin/register", post(admin::register))
        .route("/admin/login", post(admin::login))
}

/// Endpoints that require an authenticated admin (see `middleware::auth_middleware`).
pub fn admin_router() -> Router {
    Router::new()
        .route("/items/:id/approve", put(items::approve_claim))
        .route("/items/:id/reject", put(items::reject_claim))
        .route("/items/:id/status", put(items::override_status))
        .route("/items/:id/claims", get(items::list_claims))
        .route("/admin/whoami", get(admin::whoami))
}
