use super::text_batches::preview;
use super::tts_repository::{EngineCapabilities, TtsRepository};
use crate::domain::tts::{EngineAudio, EngineRequest, OutputFormat};
use crate::infrastructure::audio::validate_wav;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// espeak-ng default pitch on its 0-99 scale
const BASE_PITCH: f32 = 50.0;

/// Local espeak-ng synthesizer, used as the offline fallback.
/// Always produces WAV.
pub struct EspeakTtsRepository {
    binary: String,
    timeout: Duration,
}

impl EspeakTtsRepository {
    pub fn new(binary: String, timeout: Duration) -> Self {
        Self { binary, timeout }
    }

    fn pitch(pitch_factor: f32) -> u32 {
        let factor = if pitch_factor.is_finite() && pitch_factor > 0.0 {
            pitch_factor
        } else {
            1.0
        };
        (BASE_PITCH * factor).round().clamp(0.0, 99.0) as u32
    }

    /// Text is piped over stdin so it never reaches the argument list
    fn args(request: &EngineRequest) -> Vec<String> {
        vec![
            "--stdout".to_string(),
            "-v".to_string(),
            request.voice.engine_voices.espeak.clone(),
            "-s".to_string(),
            request.voice.speech_rate.to_string(),
            "-p".to_string(),
            Self::pitch(request.voice.pitch_factor).to_string(),
        ]
    }

    async fn run(&self, request: &EngineRequest) -> Result<Vec<u8>, String> {
        let mut child = Command::new(&self.binary)
            .args(Self::args(request))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("failed to start {}: {}", self.binary, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(request.text.as_bytes())
                .await
                .map_err(|e| format!("failed to write text to {}: {}", self.binary, e))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| format!("{} did not finish: {}", self.binary, e))?;

        if !output.status.success() {
            return Err(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl TtsRepository for EspeakTtsRepository {
    fn name(&self) -> &'static str {
        "espeak"
    }

    fn capabilities(&self) -> EngineCapabilities {
        EngineCapabilities {
            offline: true,
            ..EngineCapabilities::default()
        }
    }

    async fn synthesize(&self, request: &EngineRequest) -> Result<EngineAudio, String> {
        tracing::info!(
            binary = %self.binary,
            voice = %request.voice.engine_voices.espeak,
            text_preview = %preview(&request.text),
            "Running offline espeak synthesis"
        );

        let bytes = tokio::time::timeout(self.timeout, self.run(request))
            .await
            .map_err(|_| format!("espeak timed out after {}s", self.timeout.as_secs()))??;

        validate_wav(&bytes).map_err(|e| format!("espeak produced unusable audio: {}", e))?;

        Ok(EngineAudio {
            bytes,
            format: OutputFormat::Wav,
        })
    }
}
