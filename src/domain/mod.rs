pub mod shared;
pub mod tts;
pub mod voice;
