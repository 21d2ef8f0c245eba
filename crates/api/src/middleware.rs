use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use lostfound_infra::AccessGate;

use crate::app::errors;
use crate::context::AdminContext;

#[derive(Clone)]
pub struct AuthState {
    pub gate: AccessGate,
}

/// Admin-only routes: resolve the bearer token through the access gate.
///
/// On failure the handler never runs.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let identity = match state.gate.authenticate(extract_bearer(req.headers())).await {
        Ok(identity) => identity,
        Err(e) => return errors::service_error_to_response(e),
    };

    req.extensions_mut().insert(AdminContext::new(identity));
    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer(&headers), Some("abc.def"));
    }
}
