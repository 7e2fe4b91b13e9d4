pub mod tone;
pub mod wav;

pub use tone::placeholder_wav;
pub use wav::{pcm16_to_wav, silent_wav, validate_wav, write_wav};
