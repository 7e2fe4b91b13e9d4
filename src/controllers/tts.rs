use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Extension, Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    controllers::extract::SpeakParams,
    domain::{
        shared::{
            tier::{ApiTier, TextLimits, TierLimits},
            usage_dto::StatsResponse,
        },
        tts::{OutputFormat, SynthesisRequest, TtsService, TtsServiceApi, TtsSynthesisResult},
    },
    error::{AppError, AppResult},
    infrastructure::auth::ApiCaller,
};

const TEST_SENTENCE: &str =
    "Hello! Welcome to the Nigerian text to speech service. How you dey today?";

pub struct TtsController {
    tts_service: Arc<TtsService>,
    default_voice: String,
    text_limits: TextLimits,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>, default_voice: String, text_limits: TextLimits) -> Self {
        Self {
            tts_service,
            default_voice,
            text_limits,
        }
    }

    /// GET|POST /speak - Convert text to speech
    ///
    /// The text limit depends on the caller's tier. The cache is keyed by
    /// text, voice and language only, so a cached result may come back in a
    /// different format than requested; `X-Format-Requested` and
    /// `Content-Type` tell the two apart.
    pub async fn speak(
        State(controller): State<Arc<TtsController>>,
        Extension(caller): Extension<ApiCaller>,
        params: SpeakParams,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let tier = caller.tier();
        let request = params
            .into_request(&controller.default_voice, controller.text_limits.for_tier(tier))
            .map_err(|e| e.with_tier(tier))?;
        let requested_format = request.output_format;

        let result = controller.tts_service.synthesize(request).await?;
        audio_response(result, requested_format, tier)
    }

    /// GET /test - Synthesize a fixed sentence with the default voice, bypassing the cache
    pub async fn test(
        State(controller): State<Arc<TtsController>>,
        Extension(caller): Extension<ApiCaller>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let request = SynthesisRequest::new(
            TEST_SENTENCE.to_string(),
            controller.default_voice.clone(),
            None,
            OutputFormat::default(),
            false,
            TEST_SENTENCE.len(),
        )?;
        let result = controller.tts_service.synthesize(request).await?;
        audio_response(result, OutputFormat::default(), caller.tier())
    }

    /// GET /stats - Usage statistics
    pub async fn stats(
        State(controller): State<Arc<TtsController>>,
        Extension(caller): Extension<ApiCaller>,
    ) -> AppResult<Json<StatsResponse>> {
        let tier = caller.tier();

        Ok(Json(StatsResponse {
            usage: controller.tts_service.usage(),
            cache: controller.tts_service.cache_stats().await,
            tier,
            limits: TierLimits {
                characters_per_request: controller.text_limits.for_tier(tier),
            },
            engines: controller.tts_service.engine_names(),
            timestamp: Utc::now().to_rfc3339(),
        }))
    }
}

fn header_value(value: impl AsRef<str>) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value.as_ref())
        .map_err(|e| AppError::Internal(format!("invalid header value: {}", e)))
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "True"
    } else {
        "False"
    }
}

/// Build the audio response with its descriptive headers.
/// Content-Type follows the format actually produced, not the one requested.
fn audio_response(
    result: TtsSynthesisResult,
    requested_format: OutputFormat,
    tier: ApiTier,
) -> AppResult<(StatusCode, HeaderMap, Body)> {
    let audio_size = result.audio_data.len();

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(result.format.mime_type()),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        header_value(format!(
            "inline; filename=\"tts_{}.{}\"",
            result.voice_used,
            result.format.extension()
        ))?,
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(audio_size));
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(if result.cached {
            "public, max-age=3600"
        } else {
            "no-cache"
        }),
    );
    headers.insert("X-Voice-Used", header_value(&result.voice_used)?);
    headers.insert("X-Engine-Used", header_value(&result.engine_used)?);
    headers.insert("X-Cached", HeaderValue::from_static(yes_no(result.cached)));
    headers.insert(
        "X-Characters-Processed",
        HeaderValue::from(result.char_count),
    );
    headers.insert("X-Audio-Size", HeaderValue::from(audio_size));
    headers.insert("X-Generated-At", header_value(Utc::now().to_rfc3339())?);
    headers.insert(
        "X-Fallback",
        HeaderValue::from_static(yes_no(result.placeholder)),
    );
    headers.insert(
        "X-Format-Requested",
        HeaderValue::from_static(requested_format.extension()),
    );
    headers.insert("X-API-Tier", HeaderValue::from_static(tier.as_str()));

    tracing::info!(
        voice = %result.voice_used,
        engine = %result.engine_used,
        cached = result.cached,
        placeholder = result.placeholder,
        audio_size = audio_size,
        "TTS response ready"
    );

    Ok((StatusCode::OK, headers, Body::from(result.audio_data)))
}
