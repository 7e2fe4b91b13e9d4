use super::text_batches::{preview, split_into_batches};
use super::tts_repository::TtsRepository;
use crate::domain::tts::{EngineAudio, EngineRequest, OutputFormat};
use crate::infrastructure::audio::pcm16_to_wav;
use async_openai::{
    config::OpenAIConfig,
    types::{CreateSpeechRequest, SpeechModel, SpeechResponseFormat, Voice},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// OpenAI has a limit of 4096 characters per request
const MAX_BATCH_SIZE: usize = 4096;

/// OpenAI PCM output is 16-bit signed mono at 24kHz
const PCM_SAMPLE_RATE: u32 = 24000;

/// OpenAI TTS implementation of TTS repository
pub struct OpenAiTtsRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    timeout: Duration,
}

impl OpenAiTtsRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String, timeout: Duration) -> Self {
        Self {
            client,
            model,
            timeout,
        }
    }

    fn speech_model(&self) -> SpeechModel {
        match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }

    fn voice(name: &str) -> Voice {
        match name.to_lowercase().as_str() {
            "alloy" => Voice::Alloy,
            "echo" => Voice::Echo,
            "fable" => Voice::Fable,
            "onyx" => Voice::Onyx,
            "nova" => Voice::Nova,
            "shimmer" => Voice::Shimmer,
            _ => Voice::Alloy,
        }
    }

    /// Call OpenAI TTS API to synthesize a single text batch
    async fn call_openai(
        &self,
        text: &str,
        voice: &str,
        format: OutputFormat,
    ) -> Result<Vec<u8>, String> {
        tracing::info!(
            model = %self.model,
            voice = voice,
            text_length = text.len(),
            text_preview = %preview(text),
            "Calling OpenAI TTS API"
        );

        let response_format = match format {
            OutputFormat::Mp3 => SpeechResponseFormat::Mp3,
            OutputFormat::Wav => SpeechResponseFormat::Pcm,
        };

        let request = CreateSpeechRequest {
            model: self.speech_model(),
            input: text.to_string(),
            voice: Self::voice(voice),
            response_format: Some(response_format),
            speed: None,
        };

        let response = tokio::time::timeout(self.timeout, self.client.audio().speech(request))
            .await
            .map_err(|_| {
                tracing::error!(
                    model = %self.model,
                    timeout_secs = self.timeout.as_secs(),
                    "OpenAI TTS API call timed out"
                );
                format!("OpenAI TTS timed out after {}s", self.timeout.as_secs())
            })?
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    model = %self.model,
                    voice = voice,
                    text_length = text.len(),
                    "OpenAI TTS API call failed"
                );
                format!("OpenAI TTS error: {}", e)
            })?;

        Ok(response.bytes.to_vec())
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn synthesize(&self, request: &EngineRequest) -> Result<EngineAudio, String> {
        let start_time = std::time::Instant::now();
        let voice = request.voice.engine_voices.openai.as_str();

        let batches = split_into_batches(&request.text, MAX_BATCH_SIZE);
        let mut merged = Vec::new();
        for batch in &batches {
            merged.extend(self.call_openai(batch, voice, request.format).await?);
        }

        if merged.is_empty() {
            return Err("OpenAI TTS returned no audio".to_string());
        }

        let bytes = match request.format {
            OutputFormat::Mp3 => merged,
            OutputFormat::Wav => pcm16_to_wav(&merged, PCM_SAMPLE_RATE)?,
        };

        tracing::info!(
            provider = "openai",
            model = %self.model,
            voice = voice,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = request.text.len(),
            batch_count = batches.len(),
            audio_size_bytes = bytes.len(),
            "TTS synthesis completed"
        );

        Ok(EngineAudio {
            bytes,
            format: request.format,
        })
    }
}
