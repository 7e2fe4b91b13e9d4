use super::text_batches::{preview, split_into_batches};
use super::tts_repository::TtsRepository;
use crate::domain::tts::{EngineAudio, EngineRequest, OutputFormat};
use crate::infrastructure::audio::pcm16_to_wav;
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat as PollyOutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

/// Polly PCM output is 16-bit signed mono at this rate
const PCM_SAMPLE_RATE: u32 = 16000;

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Neural engine where the voice supports it, standard otherwise
    fn engine_for_voice(voice: &str) -> Engine {
        if is_voice_neural_compatible(voice) {
            Engine::Neural
        } else {
            Engine::Standard
        }
    }

    /// Call AWS Polly to synthesize a single text batch
    async fn call_polly(
        &self,
        text: &str,
        voice_name: &str,
        format: OutputFormat,
    ) -> Result<Vec<u8>, String> {
        let voice_id = VoiceId::from(voice_name);
        let engine = Self::engine_for_voice(voice_name);

        tracing::info!(
            voice = voice_name,
            engine = ?engine,
            output_format = %format,
            text_length = text.len(),
            text_preview = %preview(text),
            "Calling AWS Polly synthesize_speech"
        );

        let mut call = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .engine(engine.clone());

        call = match format {
            OutputFormat::Mp3 => call.output_format(PollyOutputFormat::Mp3),
            OutputFormat::Wav => call
                .output_format(PollyOutputFormat::Pcm)
                .sample_rate(PCM_SAMPLE_RATE.to_string()),
        };

        let result = call.send().await.map_err(|e| {
            tracing::error!(
                error = ?e,
                error_display = %e,
                voice = voice_name,
                engine = ?engine,
                text_length = text.len(),
                "AWS Polly synthesize_speech failed"
            );
            format!("AWS Polly error: {}", e)
        })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            format!("Failed to read audio stream: {}", e)
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        tracing::debug!(
            audio_size = audio_bytes.len(),
            "Audio stream collected successfully"
        );

        Ok(audio_bytes)
    }

    /// Synthesize multiple text batches and merge the audio results in order.
    /// MP3 frames and raw PCM both concatenate cleanly.
    async fn synthesize_batches(
        &self,
        batches: &[String],
        voice_name: &str,
        format: OutputFormat,
    ) -> Result<Vec<u8>, String> {
        let mut merged_audio = Vec::new();

        for (index, batch) in batches.iter().enumerate() {
            let audio_data = self.call_polly(batch, voice_name, format).await?;
            merged_audio.extend(audio_data);

            tracing::debug!(
                batch_index = index,
                total_audio_size = merged_audio.len(),
                "Batch synthesized and merged"
            );
        }

        Ok(merged_audio)
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    fn name(&self) -> &'static str {
        "polly"
    }

    async fn synthesize(&self, request: &EngineRequest) -> Result<EngineAudio, String> {
        let start_time = std::time::Instant::now();
        let voice_name = request.voice.engine_voices.polly.as_str();

        let batches = split_into_batches(&request.text, MAX_BATCH_SIZE);
        let merged = self
            .synthesize_batches(&batches, voice_name, request.format)
            .await?;

        if merged.is_empty() {
            return Err("AWS Polly returned no audio".to_string());
        }

        let bytes = match request.format {
            OutputFormat::Mp3 => merged,
            OutputFormat::Wav => pcm16_to_wav(&merged, PCM_SAMPLE_RATE)?,
        };

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "polly",
            voice = voice_name,
            latency_ms = duration.as_millis(),
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

/// Check if a voice supports neural engine
pub fn is_voice_neural_compatible(voice: &str) -> bool {
    // Based on AWS Polly documentation
    const NEURAL_VOICES: &[&str] = &[
        // English (US)
        "Joanna", "Matthew", "Ivy", "Kendra", "Kimberly", "Salli", "Joey", "Justin", "Kevin",
        // English (GB)
        "Amy", "Emma", "Brian", "Arthur",
        // English (ZA)
        "Ayanda",
        // English (IN)
        "Kajal",
    ];

    NEURAL_VOICES.contains(&voice)
}
