//! Security headers middleware.

use axum::{
    body::Body,
    http::{header::HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Security headers middleware.
///
/// Adds the following headers to all responses:
/// - X-Frame-Options: SAMEORIGIN (only the board itself may frame it)
/// - X-DNS-Prefetch-Control: off
/// - Referrer-Policy: same-origin
/// - X-Content-Type-Options: nosniff
/// - Cache-Control: no-store (unless the handler set one)
pub async fn security_headers(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert("X-Frame-Options", HeaderValue::from_static("SAMEORIGIN"));

    headers.insert("X-DNS-Prefetch-Control", HeaderValue::from_static("off"));

    // Referrer only sent to own pages
    headers.insert("Referrer-Policy", HeaderValue::from_static("same-origin"));

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );

    if !headers.contains_key("Cache-Control") {
        headers.insert(
            "Cache-Control",
            HeaderValue::from_static("no-store, max-age=0"),
        );
    }

    response
}
