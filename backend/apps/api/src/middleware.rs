//! Router Middleware
//!
//! Method override for HTML forms: browsers only submit GET and POST,
//! so a form that wants DELETE posts with `?_method=DELETE` and this
//! middleware rewrites the method before routing.

use axum::body::Body;
use axum::http::{Method, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Rewrite `POST ...?_method=X` into method X before routing
pub async fn method_override(mut req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::POST {
        if let Some(target) = req.uri().query().and_then(override_target) {
            tracing::debug!(from = %req.method(), to = %target, "Method override");
            *req.method_mut() = target;
        }
    }

    next.run(req).await
}

fn override_target(query: &str) -> Option<Method> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key != "_method" {
            return None;
        }
        match value.to_ascii_uppercase().as_str() {
            "DELETE" => Some(Method::DELETE),
            "PUT" => Some(Method::PUT),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    })
}
