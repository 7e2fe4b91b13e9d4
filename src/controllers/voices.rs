use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::voice::{VoiceProfile, VoiceService, VoiceServiceApi},
    error::{AppError, AppResult},
};

/// Largest accepted reference recording
pub const MAX_SAMPLE_BYTES: usize = 10 * 1024 * 1024;

const DEFAULT_CLONE_VOICE: &str = "nigerian-female";

#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub language: String,
    pub sample_text: String,
    pub cloned: bool,
}

impl From<VoiceProfile> for VoiceSummary {
    fn from(voice: VoiceProfile) -> Self {
        Self {
            cloned: voice.is_cloned(),
            id: voice.id,
            name: voice.name,
            description: voice.description,
            language: voice.language,
            sample_text: voice.sample_text,
        }
    }
}

/// Response for GET /voices
#[derive(Debug, Serialize, Deserialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceSummary>,
    pub count: usize,
    pub default_voice: String,
}

/// Response for POST /clone-voice
#[derive(Debug, Serialize, Deserialize)]
pub struct CloneVoiceResponse {
    pub success: bool,
    pub message: String,
    pub voice_id: String,
    pub sample_path: String,
}

pub struct VoiceController {
    voice_service: Arc<VoiceService>,
}

impl VoiceController {
    pub fn new(voice_service: Arc<VoiceService>) -> Self {
        Self { voice_service }
    }

    /// GET /voices - List available voices
    pub async fn list_voices(
        State(controller): State<Arc<VoiceController>>,
    ) -> AppResult<Json<VoicesResponse>> {
        let voices: Vec<VoiceSummary> = controller
            .voice_service
            .list_voices()
            .into_iter()
            .map(VoiceSummary::from)
            .collect();

        Ok(Json(VoicesResponse {
            count: voices.len(),
            voices,
            default_voice: controller.voice_service.registry().default_voice_id().to_string(),
        }))
    }

    /// POST /clone-voice - Register a reference recording for a voice
    pub async fn clone_voice(
        State(controller): State<Arc<VoiceController>>,
        mut multipart: Multipart,
    ) -> AppResult<Json<CloneVoiceResponse>> {
        let mut audio: Option<Vec<u8>> = None;
        let mut voice_id: Option<String> = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            match field.name() {
                Some("audio") => {
                    let has_filename = field.file_name().is_some_and(|f| !f.trim().is_empty());
                    if !has_filename {
                        return Err(AppError::BadRequest("No file selected".to_string()));
                    }

                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    if bytes.len() > MAX_SAMPLE_BYTES {
                        return Err(AppError::PayloadTooLarge(
                            "Audio sample must be 10 MiB or less".to_string(),
                        ));
                    }
                    audio = Some(bytes.to_vec());
                }
                Some("voice_id") => {
                    let value = field.text().await.map_err(multipart_error)?;
                    let value = value.trim();
                    if !value.is_empty() {
                        voice_id = Some(value.to_string());
                    }
                }
                _ => {}
            }
        }

        let audio = audio.ok_or_else(|| AppError::BadRequest("No audio file provided".to_string()))?;
        let voice_id = voice_id.unwrap_or_else(|| DEFAULT_CLONE_VOICE.to_string());

        let outcome = controller
            .voice_service
            .register_sample(&voice_id, audio)
            .await?;

        Ok(Json(CloneVoiceResponse {
            success: true,
            message: format!("Voice sample registered for {}", outcome.voice_id),
            voice_id: outcome.voice_id,
            sample_path: outcome.sample_path.display().to_string(),
        }))
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Audio sample must be 10 MiB or less".to_string())
    } else {
        AppError::BadRequest(format!("Invalid multipart upload: {}", err.body_text()))
    }
}
