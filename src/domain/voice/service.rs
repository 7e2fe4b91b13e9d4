use super::error::VoiceError;
use super::model::VoiceProfile;
use super::registry::VoiceRegistry;
use crate::infrastructure::audio;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CloneSampleOutcome {
    pub voice_id: String,
    pub sample_path: PathBuf,
}

pub struct VoiceService {
    registry: Arc<VoiceRegistry>,
    samples_dir: PathBuf,
}

impl VoiceService {
    pub fn new(registry: Arc<VoiceRegistry>, samples_dir: PathBuf) -> Self {
        Self {
            registry,
            samples_dir,
        }
    }

    pub fn registry(&self) -> &Arc<VoiceRegistry> {
        &self.registry
    }
}

#[async_trait]
pub trait VoiceServiceApi: Send + Sync {
    fn list_voices(&self) -> Vec<VoiceProfile>;

    /// Store a reference recording and bind it to a voice.
    ///
    /// Rejects unknown voices, voices that already have a sample, and
    /// uploads that are not WAV audio. The file is only written once all
    /// checks pass.
    async fn register_sample(
        &self,
        voice_id: &str,
        audio_data: Vec<u8>,
    ) -> Result<CloneSampleOutcome, VoiceError>;
}

#[async_trait]
impl VoiceServiceApi for VoiceService {
    fn list_voices(&self) -> Vec<VoiceProfile> {
        self.registry.list()
    }

    async fn register_sample(
        &self,
        voice_id: &str,
        audio_data: Vec<u8>,
    ) -> Result<CloneSampleOutcome, VoiceError> {
        validate_voice_id(voice_id)?;

        let voice = self
            .registry
            .get(voice_id)
            .ok_or_else(|| VoiceError::NotFound(voice_id.to_string()))?;
        if voice.is_cloned() {
            return Err(VoiceError::AlreadyCloned(voice_id.to_string()));
        }

        if audio_data.is_empty() {
            return Err(VoiceError::InvalidSample("empty file".to_string()));
        }
        audio::validate_wav(&audio_data).map_err(VoiceError::InvalidSample)?;

        tokio::fs::create_dir_all(&self.samples_dir)
            .await
            .map_err(|e| VoiceError::Storage(format!("create samples dir: {}", e)))?;

        let sample_path = self.samples_dir.join(format!("{}_sample.wav", voice_id));
        tokio::fs::write(&sample_path, &audio_data)
            .await
            .map_err(|e| VoiceError::Storage(format!("write sample: {}", e)))?;

        tracing::info!(
            voice_id = voice_id,
            sample_path = %sample_path.display(),
            sample_bytes = audio_data.len(),
            "Voice sample stored"
        );

        self.registry
            .register_clone_sample(voice_id, sample_path.clone())?;

        Ok(CloneSampleOutcome {
            voice_id: voice_id.to_string(),
            sample_path,
        })
    }
}

/// Voice ids end up in file names
fn validate_voice_id(voice_id: &str) -> Result<(), VoiceError> {
    let valid = !voice_id.is_empty()
        && voice_id.len() <= 64
        && voice_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(VoiceError::InvalidId(voice_id.to_string()))
    }
}
