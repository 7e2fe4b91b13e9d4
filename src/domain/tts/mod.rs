pub mod cascade;
pub mod dto;
pub mod error;
pub mod service;

pub use cascade::{CascadeOutcome, CascadeStage, EngineCascade, EngineRegistration};
pub use dto::{
    EngineAudio, EngineFailure, EngineRequest, OutputFormat, SynthesisRequest, TtsSynthesisResult,
};
pub use error::TtsServiceError;
pub use service::{TtsService, TtsServiceApi};
