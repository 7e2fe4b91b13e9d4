use super::tts_repository::{EngineCapabilities, TtsRepository};
use crate::domain::tts::{EngineAudio, EngineRequest, OutputFormat};
use crate::infrastructure::audio::placeholder_wav;
use async_trait::async_trait;

/// Last stop of the cascade: a generated tone sized to the text length
pub struct PlaceholderTtsRepository;

#[async_trait]
impl TtsRepository for PlaceholderTtsRepository {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn capabilities(&self) -> EngineCapabilities {
        EngineCapabilities {
            offline: true,
            placeholder: true,
            ..EngineCapabilities::default()
        }
    }

    async fn synthesize(&self, request: &EngineRequest) -> Result<EngineAudio, String> {
        let char_count = request.text.chars().count();
        tracing::warn!(
            voice = %request.voice.id,
            char_count = char_count,
            "Serving placeholder tone instead of speech"
        );

        Ok(EngineAudio {
            bytes: placeholder_wav(char_count, request.voice.pitch_factor),
            format: OutputFormat::Wav,
        })
    }
}
