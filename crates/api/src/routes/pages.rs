//! Static site pages and the not-found fallback.

use std::path::Path;

use axum::Router;
use axum::handler::HandlerWithoutStateExt;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tower_http::services::{ServeDir, ServeFile};

/// Routes for the site pages under `static_dir`.
///
/// `/cart`, `/category` and `/page-5` map to their `.html` files; every
/// other path is looked up as a file, with `/` serving `index.html`.
pub fn router(static_dir: &Path) -> Router {
    let files = ServeDir::new(static_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(not_found.into_service());

    Router::new()
        .route_service("/cart", ServeFile::new(static_dir.join("cart.html")))
        .route_service("/category", ServeFile::new(static_dir.join("category.html")))
        .route_service("/page-5", ServeFile::new(static_dir.join("page-5.html")))
        .fallback_service(files)
}

/// 404 as JSON for API clients, as plain text for browsers.
pub async fn not_found(headers: HeaderMap) -> Response {
    let wants_json = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"));

    if wants_json {
        let body = serde_json::json!({ "error": "Not found" });
        (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
    } else {
        (StatusCode::NOT_FOUND, "Page not found").into_response()
    }
}
