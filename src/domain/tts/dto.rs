use serde::{Deserialize, Serialize};

use super::error::TtsServiceError;
use crate::domain::voice::VoiceProfile;

/// Audio container produced by an engine or requested by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Mp3,
    Wav,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "mp3" | "mpeg" => Some(OutputFormat::Mp3),
            "wav" | "wave" => Some(OutputFormat::Wav),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "audio/mpeg",
            OutputFormat::Wav => "audio/wav",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Wav => "wav",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// A normalized /speak request
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: String,
    pub language: Option<String>,
    pub output_format: OutputFormat,
    pub use_cache: bool,
}

impl SynthesisRequest {
    /// Build a request, rejecting blank or oversized text.
    ///
    /// Length is measured in characters, not bytes.
    pub fn new(
        text: String,
        voice_id: String,
        language: Option<String>,
        output_format: OutputFormat,
        use_cache: bool,
        max_text_length: usize,
    ) -> Result<Self, TtsServiceError> {
        if text.trim().is_empty() {
            return Err(TtsServiceError::MissingText);
        }

        let char_count = text.chars().count();
        if char_count > max_text_length {
            return Err(TtsServiceError::TextTooLong {
                length: char_count,
                max: max_text_length,
            });
        }

        Ok(Self {
            text,
            voice_id,
            language: language.filter(|l| !l.trim().is_empty()),
            output_format,
            use_cache,
        })
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// What a single engine is asked to synthesize
#[derive(Debug, Clone)]
pub struct EngineRequest {
    pub text: String,
    pub voice: VoiceProfile,
    pub language: String,
    pub format: OutputFormat,
    /// Zero-based attempt index within the retry wrapper
    pub attempt: u32,
}

/// Raw audio returned by an engine
#[derive(Debug, Clone)]
pub struct EngineAudio {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
}

/// One engine that was tried and gave up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineFailure {
    pub engine: String,
    pub attempts: u32,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct TtsSynthesisResult {
    pub audio_data: Vec<u8>,
    pub format: OutputFormat,
    pub engine_used: String,
    pub voice_used: String,
    pub char_count: usize,
    pub cached: bool,
    pub placeholder: bool,
}
