pub mod error;
pub mod model;
pub mod registry;
pub mod service;

pub use error::VoiceError;
pub use model::{builtin_voices, EngineVoices, VoiceProfile};
pub use registry::VoiceRegistry;
pub use service::{CloneSampleOutcome, VoiceService, VoiceServiceApi};
