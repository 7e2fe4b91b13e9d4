use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::{domain::voice::VoiceRegistry, infrastructure::repositories::UsageRepository};

const SERVICE_NAME: &str = "naija-tts-backend";

pub struct HealthController {
    voices: Arc<VoiceRegistry>,
    usage_repo: Arc<UsageRepository>,
    engines: Vec<String>,
    cache_enabled: bool,
    auth_required: bool,
}

impl HealthController {
    pub fn new(
        voices: Arc<VoiceRegistry>,
        usage_repo: Arc<UsageRepository>,
        engines: Vec<String>,
        cache_enabled: bool,
        auth_required: bool,
    ) -> Self {
        Self {
            voices,
            usage_repo,
            engines,
            cache_enabled,
            auth_required,
        }
    }

    /// GET /health
    pub async fn health(State(controller): State<Arc<HealthController>>) -> impl IntoResponse {
        (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "service": SERVICE_NAME,
                "version": env!("CARGO_PKG_VERSION"),
                "voices": controller.voices.len(),
                "engines": controller.engines,
                "usage": controller.usage_repo.snapshot(),
                "timestamp": Utc::now().to_rfc3339(),
            })),
        )
    }

    /// GET / - Service information
    pub async fn index(State(controller): State<Arc<HealthController>>) -> impl IntoResponse {
        let has = |name: &str| controller.engines.iter().any(|e| e == name);

        Json(json!({
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Text-to-speech API with Nigerian voices",
            "voices": controller.voices.ids(),
            "default_voice": controller.voices.default_voice_id(),
            "engines": controller.engines,
            "features": {
                "voice_cloning": has("xtts"),
                "offline_fallback": has("espeak"),
                "placeholder_audio": has("placeholder"),
                "caching": controller.cache_enabled,
                "api_key_required": controller.auth_required,
            },
            "endpoints": {
                "health": "GET /health",
                "voices": "GET /voices",
                "speak": "GET|POST /speak?text=...&voice=...&language=...&format=mp3|wav",
                "clone_voice": "POST /clone-voice (multipart: audio, voice_id)",
                "stats": "GET /stats",
                "test": "GET /test",
            },
        }))
    }
}
