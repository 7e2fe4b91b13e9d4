use parking_lot::RwLock;
use std::path::PathBuf;

use super::error::VoiceError;
use super::model::{builtin_voices, VoiceProfile};

/// Process-wide voice catalogue.
///
/// Profiles are immutable after construction except `cloned_sample`, which
/// can be set once per voice.
pub struct VoiceRegistry {
    voices: RwLock<Vec<VoiceProfile>>,
    default_voice_id: String,
}

impl VoiceRegistry {
    pub fn with_builtin_voices(default_voice_id: &str) -> Self {
        Self::from_profiles(builtin_voices(), default_voice_id)
    }

    /// An empty profile list falls back to the built-in voices
    pub fn from_profiles(profiles: Vec<VoiceProfile>, default_voice_id: &str) -> Self {
        let voices = if profiles.is_empty() {
            builtin_voices()
        } else {
            profiles
        };

        let default_voice_id = if voices.iter().any(|v| v.id == default_voice_id) {
            default_voice_id.to_string()
        } else {
            let fallback = voices[0].id.clone();
            tracing::warn!(
                requested = default_voice_id,
                fallback = %fallback,
                "Configured default voice is unknown, using first registered voice"
            );
            fallback
        };

        Self {
            voices: RwLock::new(voices),
            default_voice_id,
        }
    }

    pub fn default_voice_id(&self) -> &str {
        &self.default_voice_id
    }

    pub fn len(&self) -> usize {
        self.voices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.read().is_empty()
    }

    pub fn list(&self) -> Vec<VoiceProfile> {
        self.voices.read().clone()
    }

    pub fn ids(&self) -> Vec<String> {
        self.voices.read().iter().map(|v| v.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<VoiceProfile> {
        self.voices.read().iter().find(|v| v.id == id).cloned()
    }

    /// Look up a voice, falling back to the default for unknown ids
    pub fn resolve(&self, id: &str) -> VoiceProfile {
        let voices = self.voices.read();
        if let Some(voice) = voices.iter().find(|v| v.id == id) {
            return voice.clone();
        }

        tracing::info!(
            requested = id,
            fallback = %self.default_voice_id,
            "Unknown voice requested, using default voice"
        );

        voices
            .iter()
            .find(|v| v.id == self.default_voice_id)
            .unwrap_or(&voices[0])
            .clone()
    }

    /// Attach a reference recording to a voice. Only the first registration wins.
    pub fn register_clone_sample(
        &self,
        id: &str,
        sample: PathBuf,
    ) -> Result<VoiceProfile, VoiceError> {
        let mut voices = self.voices.write();
        let voice = voices
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| VoiceError::NotFound(id.to_string()))?;

        if voice.cloned_sample.is_some() {
            return Err(VoiceError::AlreadyCloned(id.to_string()));
        }

        voice.cloned_sample = Some(sample);
        tracing::info!(voice_id = id, "Voice sample registered");
        Ok(voice.clone())
    }
}
