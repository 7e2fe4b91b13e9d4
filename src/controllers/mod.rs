pub mod extract;
pub mod health;
pub mod tts;
pub mod voices;
