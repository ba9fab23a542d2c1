use std::io::Cursor;

use hound::{SampleFormat, WavReader};
use tracing::debug;

use crate::domain::audio::{downmix, resample};
use crate::domain::{AudioBuffer, DomainError};

fn audio_error(e: hound::Error) -> DomainError {
    DomainError::Audio(format!("Invalid WAV data: {}", e))
}

/// Decode an uploaded WAV file into 16-bit mono at `target_rate`.
pub fn decode_wav(bytes: &[u8], target_rate: u32) -> Result<AudioBuffer, DomainError> {
    let mut reader = WavReader::new(Cursor::new(bytes)).map_err(audio_error)?;
    let spec = reader.spec();
    if spec.sample_rate == 0 || spec.channels == 0 {
        return Err(DomainError::Audio(format!(
            "Invalid WAV data: {} channels at {} Hz",
            spec.channels, spec.sample_rate
        )));
    }

    let interleaved: Vec<i16> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * 32767.0) as i16))
            .collect::<Result<_, _>>()
            .map_err(audio_error)?,
        SampleFormat::Int if spec.bits_per_sample == 16 => reader
            .samples::<i16>()
            .collect::<Result<_, _>>()
            .map_err(audio_error)?,
        SampleFormat::Int => {
            let shift = spec.bits_per_sample as i32 - 16;
            reader
                .samples::<i32>()
                .map(|s| {
                    s.map(|v| {
                        if shift >= 0 {
                            (v >> shift) as i16
                        } else {
                            (v << -shift) as i16
                        }
                    })
                })
                .collect::<Result<_, _>>()
                .map_err(audio_error)?
        }
    };

    let mono = downmix(&interleaved, spec.channels as usize);
    let samples = resample(&mono, spec.sample_rate, target_rate);

    debug!(
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        samples = samples.len(),
        "WAV decoded"
    );

    let mut buffer = AudioBuffer::with_capacity(target_rate, samples.len());
    buffer.push_samples(&samples);
    Ok(buffer)
}
