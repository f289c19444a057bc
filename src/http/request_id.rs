//! Per-request identifiers.
//!
//! Every response carries an `x-request-id` header; JSON error bodies are
//! additionally annotated with a `requestId` field so clients can correlate
//! failures with server logs.

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header::CONTENT_LENGTH, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

// Error bodies are small; anything larger passes through unannotated.
const MAX_ANNOTATED_BODY_BYTES: usize = 64 * 1024;

pub async fn attach_request_id(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    if response.status().is_client_error() || response.status().is_server_error() {
        response = annotate_error_body(response, &request_id).await;
    }
    response
}

/// Buffer a JSON error body and add the `requestId` field. Non-JSON bodies
/// pass through untouched.
async fn annotate_error_body(response: Response, request_id: &str) -> Response {
    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_ANNOTATED_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return Response::from_parts(parts, Body::empty()),
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(mut map)) => {
            map.insert(
                "requestId".to_string(),
                Value::String(request_id.to_string()),
            );
            match serde_json::to_vec(&Value::Object(map)) {
                Ok(encoded) => {
                    parts.headers.insert(CONTENT_LENGTH, HeaderValue::from(encoded.len()));
                    Response::from_parts(parts, Body::from(encoded))
                }
                Err(_) => Response::from_parts(parts, Body::from(bytes)),
            }
        }
        _ => Response::from_parts(parts, Body::from(bytes)),
    }
}
