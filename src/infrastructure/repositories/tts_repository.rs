use crate::domain::tts::{EngineAudio, EngineRequest};
use async_trait::async_trait;
use serde::Serialize;

/// What an engine can do, declared at registration instead of probed at call time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineCapabilities {
    /// Uses the voice's cloned reference sample; skipped for voices without one
    pub voice_cloning: bool,
    /// Runs without network access
    pub offline: bool,
    /// Produces stand-in audio rather than speech; only tried after every real engine
    pub placeholder: bool,
}

/// Repository for TTS synthesis operations.
/// Abstracts one underlying TTS provider (AWS Polly, OpenAI, web service, espeak, ...)
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into batches if needed
/// - Merging audio chunks into a single audio stream
/// - Provider-specific voice selection
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Stable engine name used in logs, headers, and usage statistics
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> EngineCapabilities {
        EngineCapabilities::default()
    }

    /// How many times the cascade may call this engine for one request.
    /// Engines with alternate endpoints use `EngineRequest::attempt` to pick one.
    fn max_attempts(&self) -> u32 {
        1
    }

    /// Synthesize text to speech with the requested voice.
    ///
    /// The returned format may differ from `request.format` when the provider
    /// only supports one container.
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(&self, request: &EngineRequest) -> Result<EngineAudio, String>;
}
