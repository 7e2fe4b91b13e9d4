use serde::Serialize;
use std::path::PathBuf;

/// Voice names used by each backend for one logical voice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineVoices {
    pub polly: String,
    pub openai: String,
    pub espeak: String,
}

/// A logical voice exposed by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceProfile {
    pub id: String,
    pub name: String,
    pub language: String,
    pub description: String,
    pub sample_text: String,
    /// Relative pitch, 1.0 = engine default
    pub pitch_factor: f32,
    /// Words per minute for engines that take a rate
    pub speech_rate: u32,
    pub engine_voices: EngineVoices,
    /// Reference recording for voice-cloning engines, set at most once
    pub cloned_sample: Option<PathBuf>,
}

impl VoiceProfile {
    #[allow(clippy::too_many_arguments)]
    fn builtin(
        id: &str,
        name: &str,
        description: &str,
        sample_text: &str,
        pitch_factor: f32,
        speech_rate: u32,
        polly: &str,
        openai: &str,
        espeak: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            language: "en".to_string(),
            description: description.to_string(),
            sample_text: sample_text.to_string(),
            pitch_factor,
            speech_rate,
            engine_voices: EngineVoices {
                polly: polly.to_string(),
                openai: openai.to_string(),
                espeak: espeak.to_string(),
            },
            cloned_sample: None,
        }
    }

    pub fn is_cloned(&self) -> bool {
        self.cloned_sample.is_some()
    }
}

/// The voices shipped with the service; the first entry is the fallback default
pub fn builtin_voices() -> Vec<VoiceProfile> {
    vec![
        VoiceProfile::builtin(
            "nigerian-female",
            "Nigerian Female",
            "Nigerian English Female Voice",
            "Hello! Welcome to Nigeria. How are you doing today?",
            1.1,
            160,
            "Ayanda",
            "nova",
            "en+f3",
        ),
        VoiceProfile::builtin(
            "nigerian-male",
            "Nigerian Male",
            "Nigerian English Male Voice",
            "Good day! This is the Nigerian male voice speaking.",
            0.85,
            140,
            "Brian",
            "onyx",
            "en+m3",
        ),
        VoiceProfile::builtin(
            "yoruba-accent",
            "Yoruba-accented English",
            "English with Yoruba accent influence",
            "Bawo ni? How are you? Welcome to Lagos!",
            0.95,
            150,
            "Amy",
            "shimmer",
            "en+f2",
        ),
        VoiceProfile::builtin(
            "igbo-accent",
            "Igbo-accented English",
            "English with Igbo accent influence",
            "Kedu? How are you? Ndewo from Enugu!",
            1.0,
            155,
            "Arthur",
            "echo",
            "en+m1",
        ),
        VoiceProfile::builtin(
            "hausa-accent",
            "Hausa-accented English",
            "English with Hausa accent influence",
            "Sannu! How can we help you today?",
            0.9,
            145,
            "Emma",
            "fable",
            "en+f4",
        ),
        VoiceProfile::builtin(
            "pidgin-female",
            "Nigerian Pidgin Female",
            "Nigerian Pidgin Female Voice",
            "How far? I dey fine o! Welcome make you enjoy!",
            1.05,
            150,
            "Ayanda",
            "alloy",
            "en+f1",
        ),
    ]
}
