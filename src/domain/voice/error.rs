use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("Voice not found: {0}")]
    NotFound(String),
    #[error("Voice sample already registered for {0}")]
    AlreadyCloned(String),
    #[error("Invalid voice id: {0}")]
    InvalidId(String),
    #[error("Invalid audio sample: {0}")]
    InvalidSample(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<VoiceError> for AppError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::NotFound(_) => AppError::NotFound(err.to_string()),
            VoiceError::AlreadyCloned(_) => AppError::Conflict(err.to_string()),
            VoiceError::InvalidId(_) | VoiceError::InvalidSample(_) => {
                AppError::BadRequest(err.to_string())
            }
            VoiceError::Storage(msg) => AppError::Internal(msg),
        }
    }
}
