use super::wav::{silent_wav, write_wav};
use std::f32::consts::PI;

pub const PLACEHOLDER_SAMPLE_RATE: u32 = 22050;

const BASE_FREQUENCY_HZ: f32 = 440.0;
const SECONDS_PER_CHARACTER: f32 = 0.05;
const MIN_DURATION_SECS: f32 = 0.5;
const MAX_DURATION_SECS: f32 = 10.0;
const AMPLITUDE: f32 = 0.3;
const DECAY_RATE: f32 = 2.0;
const MODULATION_HZ: f32 = 6.0;
const MODULATION_DEPTH: f32 = 0.1;

/// Placeholder tone length for a given amount of text
pub fn placeholder_duration_secs(char_count: usize) -> f32 {
    (char_count as f32 * SECONDS_PER_CHARACTER).clamp(MIN_DURATION_SECS, MAX_DURATION_SECS)
}

/// Decaying, lightly modulated sine tone standing in for speech.
///
/// Deterministic for a given input, and always a valid WAV file.
pub fn placeholder_wav(char_count: usize, pitch_factor: f32) -> Vec<u8> {
    let duration = placeholder_duration_secs(char_count);
    let pitch = if pitch_factor.is_finite() && pitch_factor > 0.0 {
        pitch_factor
    } else {
        1.0
    };
    let frequency = BASE_FREQUENCY_HZ * pitch;
    let num_samples = (PLACEHOLDER_SAMPLE_RATE as f32 * duration) as usize;

    let samples: Vec<i16> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / PLACEHOLDER_SAMPLE_RATE as f32;
            let envelope = (-t * DECAY_RATE).exp();
            let modulation = 1.0 + (2.0 * PI * MODULATION_HZ * t).sin() * MODULATION_DEPTH;
            let value = (2.0 * PI * frequency * t).sin() * envelope * AMPLITUDE * modulation;
            (value.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
        })
        .collect();

    match write_wav(&samples, PLACEHOLDER_SAMPLE_RATE) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Placeholder tone encoding failed, returning silence");
            silent_wav()
        }
    }
}
