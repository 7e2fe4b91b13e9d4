use std::io::Cursor;

/// Encode 16-bit mono samples as a WAV file
pub fn write_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, String> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    // 44 byte header + 2 bytes per sample
    let mut cursor = Cursor::new(Vec::<u8>::with_capacity(44 + samples.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| format!("wav write error: {}", e))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| format!("wav sample error: {}", e))?;
        }
        writer
            .finalize()
            .map_err(|e| format!("wav finalize error: {}", e))?;
    }

    Ok(cursor.into_inner())
}

/// Wrap raw signed 16-bit little-endian mono PCM in a WAV container
pub fn pcm16_to_wav(pcm: &[u8], sample_rate: u32) -> Result<Vec<u8>, String> {
    let samples: Vec<i16> = pcm
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    write_wav(&samples, sample_rate)
}

/// Check that bytes parse as a WAV file with at least one sample
pub fn validate_wav(bytes: &[u8]) -> Result<(), String> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| format!("not a WAV file: {}", e))?;
    if reader.duration() == 0 {
        return Err("WAV file contains no audio".to_string());
    }
    Ok(())
}

/// A 44-byte header followed by 1000 silent samples at 22050 Hz.
///
/// Built by hand so it cannot fail.
pub fn silent_wav() -> Vec<u8> {
    const SAMPLE_RATE: u32 = 22050;
    const DATA_LEN: u32 = 2000;

    let mut out = Vec::with_capacity(44 + DATA_LEN as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + DATA_LEN).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&DATA_LEN.to_le_bytes());
    out.resize(44 + DATA_LEN as usize, 0);
    out
}
