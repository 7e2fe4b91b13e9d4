use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::dto::{EngineAudio, EngineFailure, EngineRequest, OutputFormat};
use crate::domain::voice::VoiceProfile;
use crate::infrastructure::repositories::{EngineCapabilities, TtsRepository, UsageRepository};

/// Where a request currently is in the speech pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStage {
    Cache,
    Primary,
    Secondary,
    Placeholder,
    Done,
    Failed,
}

impl fmt::Display for CascadeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CascadeStage::Cache => "cache",
            CascadeStage::Primary => "primary",
            CascadeStage::Secondary => "secondary",
            CascadeStage::Placeholder => "placeholder",
            CascadeStage::Done => "done",
            CascadeStage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// An engine plus the flags and retry policy it was registered with
#[derive(Clone)]
pub struct EngineRegistration {
    pub engine: Arc<dyn TtsRepository>,
    pub capabilities: EngineCapabilities,
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl EngineRegistration {
    /// Attempts are the engine's own limit capped by `max_retries`, never below one
    pub fn new(engine: Arc<dyn TtsRepository>, max_retries: u32, backoff: Duration) -> Self {
        let max_attempts = engine.max_attempts().min(max_retries).max(1);
        Self {
            capabilities: engine.capabilities(),
            engine,
            max_attempts,
            backoff,
        }
    }

    pub fn name(&self) -> &'static str {
        self.engine.name()
    }
}

/// Audio produced by the cascade and who produced it
#[derive(Debug, Clone)]
pub struct CascadeOutcome {
    pub audio: EngineAudio,
    pub engine: String,
    pub placeholder: bool,
}

/// Ordered list of engines tried until one returns audio
pub struct EngineCascade {
    engines: Vec<EngineRegistration>,
    usage_repo: Arc<UsageRepository>,
}

impl EngineCascade {
    pub fn new(engines: Vec<EngineRegistration>, usage_repo: Arc<UsageRepository>) -> Self {
        Self {
            engines,
            usage_repo,
        }
    }

    pub fn engine_names(&self) -> Vec<String> {
        self.engines.iter().map(|e| e.name().to_string()).collect()
    }

    pub fn has_placeholder(&self) -> bool {
        self.engines.iter().any(|e| e.capabilities.placeholder)
    }

    /// Try each engine in order and return the first audio produced.
    ///
    /// Voice-cloning engines are skipped for voices without a sample. When
    /// every engine fails the error lists each one with its last failure.
    pub async fn run(
        &self,
        text: &str,
        voice: &VoiceProfile,
        language: &str,
        format: OutputFormat,
    ) -> Result<CascadeOutcome, Vec<EngineFailure>> {
        let mut failures = Vec::new();
        let mut real_engines_tried = 0usize;

        for registration in &self.engines {
            if registration.capabilities.voice_cloning && !voice.is_cloned() {
                tracing::debug!(
                    engine = registration.name(),
                    voice = %voice.id,
                    "Skipping voice cloning engine, voice has no sample"
                );
                continue;
            }

            let stage = if registration.capabilities.placeholder {
                CascadeStage::Placeholder
            } else if real_engines_tried == 0 {
                CascadeStage::Primary
            } else {
                CascadeStage::Secondary
            };
            if !registration.capabilities.placeholder {
                real_engines_tried += 1;
            }

            tracing::info!(
                stage = %stage,
                engine = registration.name(),
                voice = %voice.id,
                max_attempts = registration.max_attempts,
                "Trying synthesis engine"
            );

            let mut request = EngineRequest {
                text: text.to_string(),
                voice: voice.clone(),
                language: language.to_string(),
                format,
                attempt: 0,
            };

            match self.attempt_with_retries(registration, &mut request).await {
                Ok(audio) => {
                    tracing::info!(
                        stage = %CascadeStage::Done,
                        engine = registration.name(),
                        audio_size = audio.bytes.len(),
                        format = %audio.format,
                        "Synthesis engine succeeded"
                    );
                    return Ok(CascadeOutcome {
                        audio,
                        engine: registration.name().to_string(),
                        placeholder: registration.capabilities.placeholder,
                    });
                }
                Err(failure) => {
                    tracing::warn!(
                        stage = %stage,
                        engine = %failure.engine,
                        attempts = failure.attempts,
                        reason = %failure.reason,
                        "Synthesis engine failed, advancing"
                    );
                    failures.push(failure);
                }
            }
        }

        tracing::error!(
            stage = %CascadeStage::Failed,
            attempted = failures.len(),
            "Every synthesis engine failed"
        );
        Err(failures)
    }

    async fn attempt_with_retries(
        &self,
        registration: &EngineRegistration,
        request: &mut EngineRequest,
    ) -> Result<EngineAudio, EngineFailure> {
        let mut last_error = String::new();

        for attempt in 0..registration.max_attempts {
            request.attempt = attempt;

            let result = match registration.engine.synthesize(request).await {
                Ok(audio) if audio.bytes.is_empty() => Err("engine returned empty audio".to_string()),
                other => other,
            };

            match result {
                Ok(audio) => {
                    self.usage_repo
                        .record_engine_attempt(registration.name(), true);
                    return Ok(audio);
                }
                Err(e) => {
                    self.usage_repo
                        .record_engine_attempt(registration.name(), false);
                    tracing::debug!(
                        engine = registration.name(),
                        attempt = attempt + 1,
                        max_attempts = registration.max_attempts,
                        error = %e,
                        "Engine attempt failed"
                    );
                    last_error = e;
                }
            }

            if attempt + 1 < registration.max_attempts && !registration.backoff.is_zero() {
                tokio::time::sleep(registration.backoff).await;
            }
        }

        Err(EngineFailure {
            engine: registration.name().to_string(),
            attempts: registration.max_attempts,
            reason: last_error,
        })
    }
}
