use super::text_batches::preview;
use super::tts_repository::{EngineCapabilities, TtsRepository};
use crate::domain::tts::{EngineAudio, EngineRequest, OutputFormat};
use crate::infrastructure::audio::validate_wav;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

/// Voice-cloning engine backed by an XTTS-compatible HTTP server.
///
/// The server receives the text plus the voice's reference recording and
/// answers with WAV audio spoken in that voice.
pub struct CloningTtsRepository {
    http: reqwest::Client,
    server_url: String,
}

impl CloningTtsRepository {
    pub fn new(server_url: String, timeout: Duration) -> Result<Self, String> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("failed to build HTTP client: {}", e))?;

        Ok(Self { http, server_url })
    }

    fn endpoint(&self) -> String {
        format!("{}/tts", self.server_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TtsRepository for CloningTtsRepository {
    fn name(&self) -> &'static str {
        "xtts"
    }

    fn capabilities(&self) -> EngineCapabilities {
        EngineCapabilities {
            voice_cloning: true,
            ..EngineCapabilities::default()
        }
    }

    async fn synthesize(&self, request: &EngineRequest) -> Result<EngineAudio, String> {
        let sample_path = request
            .voice
            .cloned_sample
            .as_ref()
            .ok_or_else(|| format!("voice {} has no cloned sample", request.voice.id))?;

        let sample = tokio::fs::read(sample_path)
            .await
            .map_err(|e| format!("failed to read sample {}: {}", sample_path.display(), e))?;

        let speaker = Part::bytes(sample)
            .file_name("speaker.wav")
            .mime_str("audio/wav")
            .map_err(|e| format!("invalid sample part: {}", e))?;

        let form = Form::new()
            .text("text", request.text.clone())
            .text("language", request.language.clone())
            .part("speaker_wav", speaker);

        let endpoint = self.endpoint();
        tracing::info!(
            endpoint = %endpoint,
            voice = %request.voice.id,
            text_preview = %preview(&request.text),
            "Calling voice cloning server"
        );

        let response = self
            .http
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("voice cloning request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("voice cloning server returned HTTP {}", status));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("voice cloning body read failed: {}", e))?
            .to_vec();

        validate_wav(&bytes)
            .map_err(|e| format!("voice cloning server returned unusable audio: {}", e))?;

        Ok(EngineAudio {
            bytes,
            format: OutputFormat::Wav,
        })
    }
}
