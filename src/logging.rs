//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a request or response body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Some(body_bytes) = read_body(body, "request").await else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let body_text = String::from_utf8_lossy(&body_bytes);
    log_body(
        &format!("Received request: {} {}", parts.method, parts.uri),
        &body_text,
    );

    let request = Request::from_parts(parts, Body::from(body_bytes.clone()));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = read_body(body, "response").await.unwrap_or_default();
    log_body(
        &format!("Sending response: {}", parts.status),
        &String::from_utf8_lossy(&body_bytes),
    );

    Response::from_parts(parts, Body::from(body_bytes))
}

async fn read_body(body: Body, kind: &str) -> Option<Bytes> {
    to_bytes(body, usize::MAX)
        .await
        .inspect_err(|error| tracing::error!("could not read {kind} body: {error}"))
        .ok()
}

fn log_body(summary: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("{summary}\nbody: {}...", truncate(body, LOG_BODY_LENGTH_LIMIT));
        tracing::debug!("{summary}\nfull body: {body:?}");
    } else {
        tracing::info!("{summary}\nbody: {body:?}");
    }
}

/// The longest prefix of `text` that is at most `max_bytes` long and ends on
/// a character boundary.
fn truncate(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }

    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}
