use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::Response,
};
use std::collections::HashSet;
use std::sync::Arc;

use crate::{domain::shared::tier::ApiTier, error::AppError};

pub const X_API_KEY: &str = "x-api-key";
const API_KEY_PARAM: &str = "api_key";

/// Largest JSON or form body searched for a key; bigger bodies are rejected
pub const MAX_KEY_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Configured API keys. An empty set lets every request through.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyGate {
    keys: HashSet<String>,
}

impl ApiKeyGate {
    pub fn new<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            keys: keys
                .into_iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn allows(&self, key: Option<&str>) -> bool {
        self.is_open() || key.is_some_and(|k| self.keys.contains(k))
    }
}

/// Caller context injected into request extensions after the key check
#[derive(Debug, Clone)]
pub struct ApiCaller {
    pub api_key: Option<String>,
}

impl ApiCaller {
    pub fn tier(&self) -> ApiTier {
        ApiTier::from_key(self.api_key.as_deref())
    }
}

/// API key middleware
///
/// Looks for the key in the `x-api-key` header, then the `api_key` query
/// parameter, then an `api_key` field in a JSON or form body.
///
/// A header value that is not valid text counts as no key. A JSON or form
/// body over `MAX_KEY_BODY_BYTES` is rejected with 413, since it cannot be
/// searched and forwarded intact.
pub async fn api_key_middleware(
    State(gate): State<Arc<ApiKeyGate>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut request, api_key) = extract_api_key(request).await?;

    if !gate.allows(api_key.as_deref()) {
        return Err(AppError::Unauthorized(
            "Invalid or missing API key".to_string(),
        ));
    }

    request.extensions_mut().insert(ApiCaller { api_key });
    Ok(next.run(request).await)
}

type Extracted = (Request, Option<String>);

async fn extract_api_key(request: Request) -> Result<Extracted, AppError> {
    if let Some(value) = request.headers().get(X_API_KEY) {
        let key = match value.to_str() {
            Ok(key) => Some(key.trim().to_string()).filter(|k| !k.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable {} header, treating as no key", X_API_KEY);
                None
            }
        };
        return Ok((request, key));
    }

    if let Some(key) = request.uri().query().and_then(key_from_form) {
        return Ok((request, Some(key)));
    }

    if request.method() != Method::POST {
        return Ok((request, None));
    }

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let is_json = content_type.starts_with("application/json");
    let is_form = content_type.starts_with("application/x-www-form-urlencoded");
    if !is_json && !is_form {
        return Ok((request, None));
    }

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_KEY_BODY_BYTES)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Failed to buffer request body for API key lookup");
            AppError::PayloadTooLarge(format!(
                "Request body must be {} bytes or less",
                MAX_KEY_BODY_BYTES
            ))
        })?;

    let key = if is_json {
        serde_json::from_slice::<serde_json::Value>(&bytes)
            .ok()
            .and_then(|v| v.get(API_KEY_PARAM)?.as_str().map(str::to_string))
            .filter(|k| !k.trim().is_empty())
    } else {
        std::str::from_utf8(&bytes).ok().and_then(key_from_form)
    };

    Ok((Request::from_parts(parts, Body::from(bytes)), key))
}

fn key_from_form(raw: &str) -> Option<String> {
    url::form_urlencoded::parse(raw.as_bytes())
        .find(|(name, value)| name == API_KEY_PARAM && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_string())
}
