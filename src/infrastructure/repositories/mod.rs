pub mod cloning_tts_repository;
pub mod espeak_tts_repository;
pub mod openai_tts_repository;
pub mod placeholder_tts_repository;
pub mod polly_tts_repository;
pub mod text_batches;
pub mod tts_repository;
pub mod usage_repository;
pub mod web_tts_repository;

pub use cloning_tts_repository::CloningTtsRepository;
pub use espeak_tts_repository::EspeakTtsRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use placeholder_tts_repository::PlaceholderTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use tts_repository::{EngineCapabilities, TtsRepository};
pub use usage_repository::UsageRepository;
pub use web_tts_repository::WebTtsRepository;
