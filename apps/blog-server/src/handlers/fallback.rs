//! Requests that match no resource.

use actix_web::{HttpRequest, HttpResponse, http::Method, http::header};

use crate::middleware::error::{AppError, AppResult};
use crate::router;

/// 404 for unknown paths, except a GET that only lacks its trailing slash,
/// which is sent on to the slashed path.
pub async fn not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    let path = req.path();

    if req.method() == Method::GET && !path.ends_with('/') {
        let slashed = format!("{path}/");
        if let Some(route) = router::resolve(&slashed) {
            let location = match req.query_string() {
                "" => slashed,
                query => format!("{slashed}?{query}"),
            };
            tracing::debug!(route = %route.name, %location, "Appending slash");
            return Ok(HttpResponse::MovedPermanently()
                .insert_header((header::LOCATION, location))
                .finish());
        }
    }

    Err(AppError::NotFound(format!("No page at {path}")))
}
