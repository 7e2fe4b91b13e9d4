use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::ErrorResponse;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Middleware to generate and attach request ID to each request
///
/// JSON error bodies produced by `AppError` are re-rendered with the id so
/// clients can quote it.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;

    if let Some(mut error) = response.extensions_mut().remove::<ErrorResponse>() {
        if response.status().is_server_error() {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = response.status().as_u16(),
                error = %error.error,
                "Request failed"
            );
        }

        error.request_id = Some(request_id.clone());
        match serde_json::to_vec(&error) {
            Ok(body) => {
                response.headers_mut().remove(header::CONTENT_LENGTH);
                *response.body_mut() = Body::from(body);
            }
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Failed to stamp request id on error body");
            }
        }
    }

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, header_value);
    }

    response
}

/// Request ID wrapper type for extension
#[derive(Debug, Clone)]
pub struct RequestId(pub String);
