use axum::{
    async_trait,
    extract::{FromRequest, Query, Request},
    http::{header, Method},
    Form, Json,
};
use serde::Deserialize;

use crate::{
    domain::tts::{OutputFormat, SynthesisRequest},
    error::AppError,
};

/// Boolean parameter that arrives either as JSON `true` or as text ("false", "0", ...)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    pub fn is_set(&self) -> bool {
        match self {
            Flag::Bool(value) => *value,
            Flag::Text(raw) => !matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "false" | "0" | "no" | "off"
            ),
        }
    }
}

/// Raw /speak parameters gathered from the query string and the body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeakParams {
    pub text: Option<String>,
    #[serde(alias = "voice_id")]
    pub voice: Option<String>,
    #[serde(alias = "lang")]
    pub language: Option<String>,
    pub format: Option<String>,
    pub cache: Option<Flag>,
}

impl SpeakParams {
    /// Fill gaps in `self` with values from `other`
    fn or(self, other: SpeakParams) -> Self {
        Self {
            text: self.text.or(other.text),
            voice: self.voice.or(other.voice),
            language: self.language.or(other.language),
            format: self.format.or(other.format),
            cache: self.cache.or(other.cache),
        }
    }

    /// Validate and normalize into a synthesis request.
    ///
    /// Missing text and oversized text are rejected with different errors.
    pub fn into_request(
        self,
        default_voice: &str,
        max_text_length: usize,
    ) -> Result<SynthesisRequest, AppError> {
        let output_format = match self.format.as_deref().map(str::trim) {
            None | Some("") => OutputFormat::default(),
            Some(raw) => OutputFormat::parse(raw).ok_or_else(|| {
                AppError::BadRequest(format!("Unsupported format '{}', use wav or mp3", raw))
            })?,
        };

        let voice_id = self
            .voice
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default_voice.to_string());

        let request = SynthesisRequest::new(
            self.text.unwrap_or_default(),
            voice_id,
            self.language.map(|l| l.trim().to_string()),
            output_format,
            self.cache.map_or(true, |flag| flag.is_set()),
            max_text_length,
        )?;

        Ok(request)
    }
}

/// Query parameters win over body fields; the body may be JSON or a form
#[async_trait]
impl<S> FromRequest<S> for SpeakParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<SpeakParams>::try_from_uri(request.uri())
            .map_err(|e| AppError::BadRequest(format!("Invalid query parameters: {}", e)))?;

        if request.method() != Method::POST {
            return Ok(query);
        }

        let content_type = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let body = if content_type.starts_with("application/json") {
            let Json(body) = Json::<SpeakParams>::from_request(request, state)
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e.body_text())))?;
            body
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(body) = Form::<SpeakParams>::from_request(request, state)
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid form body: {}", e.body_text())))?;
            body
        } else {
            SpeakParams::default()
        };

        Ok(query.or(body))
    }
}
