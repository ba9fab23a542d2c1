use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::HeapRb;
use tracing::{debug, error, info, warn};

use crate::domain::audio::{downmix, resample};
use crate::domain::{AudioConfig, DomainError};
use crate::ports::{AudioSource, AudioStream};

/// Lock-free ring buffer between the device callback and the reader.
type RingProducer = ringbuf::HeapProd<i16>;
type RingConsumer = ringbuf::HeapCons<i16>;

/// How often a blocked reader checks the ring buffer.
const POLL_INTERVAL: Duration = Duration::from_millis(4);

mod capture {
    use super::*;

    pub fn default_device() -> Result<Device, DomainError> {
        cpal::default_host()
            .default_input_device()
            .ok_or_else(|| DomainError::AudioDevice {
                message: "No default input device available".to_string(),
            })
    }

    pub fn build_stream_config(device: &Device) -> Result<(StreamConfig, SampleFormat), DomainError> {
        let supported = device.default_input_config().map_err(|e| DomainError::AudioDevice {
            message: format!("Failed to get default config: {}", e),
        })?;

        debug!(
            sample_rate = ?supported.sample_rate(),
            channels = supported.channels(),
            format = ?supported.sample_format(),
            "Device default config"
        );

        let config = StreamConfig {
            channels: supported.channels(),
            sample_rate: supported.sample_rate(),
            buffer_size: cpal::BufferSize::Default,
        };
        Ok((config, supported.sample_format()))
    }

    pub fn build_stream(
        device: &Device,
        config: &StreamConfig,
        sample_format: SampleFormat,
        target_sample_rate: u32,
        mut producer: RingProducer,
        failed: Arc<AtomicBool>,
    ) -> Result<Stream, DomainError> {
        let channels = config.channels as usize;
        let device_sample_rate = config.sample_rate.0;

        let on_error = move |err: cpal::StreamError| {
            error!(?err, "Audio stream error");
            failed.store(true, Ordering::Release);
        };

        let stream = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    push_mono(data, channels, device_sample_rate, target_sample_rate, &mut producer);
                },
                on_error,
                None,
            ),
            SampleFormat::F32 => device.build_input_stream(
                config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let pcm: Vec<i16> = data
                        .iter()
                        .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
                        .collect();
                    push_mono(&pcm, channels, device_sample_rate, target_sample_rate, &mut producer);
                },
                on_error,
                None,
            ),
            _ => {
                return Err(DomainError::AudioDevice {
                    message: format!("Unsupported sample format: {:?}", sample_format),
                });
            }
        }
        .map_err(|e| DomainError::AudioDevice {
            message: format!("Failed to build stream: {}", e),
        })?;

        Ok(stream)
    }

    fn push_mono(
        data: &[i16],
        channels: usize,
        device_sample_rate: u32,
        target_sample_rate: u32,
        producer: &mut RingProducer,
    ) {
        let mono = downmix(data, channels);
        let resampled = resample(&mono, device_sample_rate, target_sample_rate);
        let written = producer.push_slice(&resampled);
        if written < resampled.len() {
            warn!(dropped = resampled.len() - written, "Capture buffer full, dropping samples");
        }
    }
}

/// Microphone capture through cpal's default host.
pub struct CpalAudioSource;

impl CpalAudioSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CpalAudioSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSource for CpalAudioSource {
    fn open(&self, config: &AudioConfig) -> Result<Box<dyn AudioStream>, DomainError> {
        let device = capture::default_device()?;
        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        let (stream_config, sample_format) = capture::build_stream_config(&device)?;

        let ring = HeapRb::<i16>::new(config.buffer_capacity());
        let (producer, consumer) = ring.split();
        let failed = Arc::new(AtomicBool::new(false));

        let stream = capture::build_stream(
            &device,
            &stream_config,
            sample_format,
            config.sample_rate,
            producer,
            Arc::clone(&failed),
        )?;

        stream.play().map_err(|e| DomainError::AudioDevice {
            message: format!("Failed to start stream: {}", e),
        })?;

        info!(device = %device_name, sample_rate = config.sample_rate, "Audio capture opened");

        Ok(Box::new(CpalAudioStream {
            _stream: stream,
            consumer,
            failed,
            frame_timeout: config.frame_duration() * 2,
        }))
    }
}

/// An open cpal input stream. The device is released when this is dropped.
struct CpalAudioStream {
    _stream: Stream,
    consumer: RingConsumer,
    failed: Arc<AtomicBool>,
    frame_timeout: Duration,
}

impl AudioStream for CpalAudioStream {
    fn read_frame(&mut self, frame: &mut [i16]) -> Result<usize, DomainError> {
        let deadline = Instant::now() + self.frame_timeout;

        while self.consumer.occupied_len() < frame.len() {
            if self.failed.load(Ordering::Acquire) {
                return Err(DomainError::AudioDevice {
                    message: "Input device stopped delivering audio".to_string(),
                });
            }
            if Instant::now() >= deadline {
                break;
            }
            thread::sleep(POLL_INTERVAL);
        }

        Ok(self.consumer.pop_slice(frame))
    }
}

impl Drop for CpalAudioStream {
    fn drop(&mut self) {
        debug!("Audio capture closed");
    }
}
