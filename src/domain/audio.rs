use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Recognition session state machine.
///
/// State transitions:
/// - Idle -> Recording (start_stream)
/// - Recording -> Stopping (stop_stream, select_language, or a new start_stream)
/// - Stopping -> Idle (worker released the capture device)
/// - Recording -> Idle (worker ended on its own: client gone, device error)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum AudioState {
    /// No capture stream open.
    Idle = 0,
    /// A worker owns the capture device and feeds the recognizer.
    Recording = 1,
    /// Stop requested, waiting for the worker to release the device.
    Stopping = 2,
}

impl AudioState {
    /// Check if a stream can be started from this state.
    #[must_use]
    pub fn can_start_recording(&self) -> bool {
        matches!(self, AudioState::Idle)
    }

    /// Check if a stop request is meaningful in this state.
    #[must_use]
    pub fn can_stop_recording(&self) -> bool {
        matches!(self, AudioState::Recording)
    }
}

impl From<u8> for AudioState {
    fn from(value: u8) -> Self {
        match value {
            0 => AudioState::Idle,
            1 => AudioState::Recording,
            _ => AudioState::Stopping,
        }
    }
}

impl From<AudioState> for u8 {
    fn from(state: AudioState) -> Self {
        state as u8
    }
}

/// Atomic wrapper for AudioState for lock-free reads.
#[derive(Debug)]
pub struct AtomicAudioState(AtomicU8);

impl AtomicAudioState {
    pub fn new(state: AudioState) -> Self {
        Self(AtomicU8::new(state.into()))
    }

    pub fn load(&self) -> AudioState {
        self.0.load(Ordering::Acquire).into()
    }

    pub fn store(&self, state: AudioState) {
        self.0.store(state.into(), Ordering::Release);
    }

    /// Compare and swap, returns true if successful.
    pub fn compare_exchange(&self, current: AudioState, new: AudioState) -> bool {
        self.0
            .compare_exchange(current.into(), new.into(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for AtomicAudioState {
    fn default() -> Self {
        Self::new(AudioState::Idle)
    }
}

/// Audio capture configuration for the streaming path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Target sample rate in Hz.
    pub sample_rate: u32,
    /// Samples per frame handed to the recognizer.
    pub frame_size: usize,
    /// Seconds of audio the capture ring buffer can hold.
    pub buffer_duration_secs: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            frame_size: 1024,
            buffer_duration_secs: 10,
        }
    }
}

impl AudioConfig {
    /// Calculate the ring buffer capacity in samples.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_duration_secs as usize * self.sample_rate as usize
    }

    /// Wall-clock length of one frame (1024 samples @ 16kHz = 64ms).
    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(self.frame_size as u64 * 1_000_000 / self.sample_rate.max(1) as u64)
    }
}

/// RMS level of a block of samples, normalized to 0.0 - 1.0.
pub fn calculate_rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64).powi(2)).sum();
    let rms = (sum_squares / samples.len() as f64).sqrt();
    (rms / 32767.0).min(1.0) as f32
}

/// Average interleaved channels into a single mono channel.
pub fn downmix(data: &[i16], channels: usize) -> Vec<i16> {
    if channels <= 1 {
        return data.to_vec();
    }
    data.chunks(channels)
        .map(|chunk| {
            let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
            (sum / chunk.len() as i32) as i16
        })
        .collect()
}

/// Linear-interpolation resampler. A zero rate yields no samples.
pub fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == 0 || to_rate == 0 {
        return Vec::new();
    }
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = src_pos.fract();

        let sample = if src_idx + 1 < samples.len() {
            let s0 = samples[src_idx] as f64;
            let s1 = samples[src_idx + 1] as f64;
            (s0 + (s1 - s0) * frac) as i16
        } else if src_idx < samples.len() {
            samples[src_idx]
        } else {
            0
        };
        output.push(sample);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_state_transitions() {
        assert!(AudioState::Idle.can_start_recording());
        assert!(!AudioState::Recording.can_start_recording());
        assert!(!AudioState::Stopping.can_start_recording());

        assert!(AudioState::Recording.can_stop_recording());
        assert!(!AudioState::Idle.can_stop_recording());
        assert!(!AudioState::Stopping.can_stop_recording());
    }

    #[test]
    fn test_atomic_audio_state() {
        let atomic = AtomicAudioState::default();
        assert_eq!(atomic.load(), AudioState::Idle);

        assert!(atomic.compare_exchange(AudioState::Idle, AudioState::Recording));
        assert_eq!(atomic.load(), AudioState::Recording);

        // Wrong current value leaves the state untouched
        assert!(!atomic.compare_exchange(AudioState::Idle, AudioState::Stopping));
        assert_eq!(atomic.load(), AudioState::Recording);
    }

    #[test]
    fn test_frame_duration() {
        let config = AudioConfig::default();
        assert_eq!(config.frame_duration(), Duration::from_millis(64));
        assert_eq!(config.buffer_capacity(), 160_000);
    }

    #[test]
    fn test_calculate_rms() {
        assert_eq!(calculate_rms(&[]), 0.0);
        assert_eq!(calculate_rms(&[0, 0, 0]), 0.0);

        let max_rms = calculate_rms(&[32767, 32767, 32767]);
        assert!((max_rms - 1.0).abs() < 0.001);

        let half_rms = calculate_rms(&[16384, -16384, 16384, -16384]);
        assert!(half_rms > 0.4 && half_rms < 0.6);
    }

    #[test]
    fn test_downmix_stereo() {
        assert_eq!(downmix(&[100, 300, -200, 200], 2), vec![200, 0]);
        assert_eq!(downmix(&[1, 2, 3], 1), vec![1, 2, 3]);
    }

    #[test]
    fn test_resample() {
        let samples = vec![100, 200, 300, 400];
        assert_eq!(resample(&samples, 48000, 48000), samples);

        let samples: Vec<i16> = (0..48).map(|i| i * 100).collect();
        let result = resample(&samples, 48000, 16000);
        assert!(result.len() >= 15 && result.len() <= 17);
    }

    #[test]
    fn test_resample_zero_rate_is_empty() {
        let samples = vec![1i16; 64];
        assert!(resample(&samples, 0, 16_000).is_empty());
        assert!(resample(&samples, 16_000, 0).is_empty());
    }
}
