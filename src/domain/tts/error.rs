use super::dto::EngineFailure;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("Text parameter is required")]
    MissingText,
    #[error("Text too long ({length} characters, max {max} characters)")]
    TextTooLong { length: usize, max: usize },
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("all engines failed")]
    EnginesExhausted(Vec<EngineFailure>),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::MissingText => AppError::BadRequest(err.to_string()),
            TtsServiceError::TextTooLong { length, max } => AppError::TextTooLong {
                length,
                max,
                tier: None,
            },
            TtsServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TtsServiceError::EnginesExhausted(failures) => AppError::EnginesExhausted(failures),
            TtsServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
