use crate::domain::{AudioConfig, DomainError};

/// An open capture stream.
///
/// Streams are opened and read on the thread that owns them; dropping the
/// stream releases the input device.
pub trait AudioStream {
    /// Fill `frame` with the next mono samples at the configured rate.
    ///
    /// Blocks for at most about one frame duration. Returns the number of
    /// samples written, which is less than `frame.len()` when the device
    /// delivered less audio in that time.
    fn read_frame(&mut self, frame: &mut [i16]) -> Result<usize, DomainError>;
}

/// Port for opening microphone capture streams.
pub trait AudioSource: Send + Sync {
    /// Open the default input device, converted to `config.sample_rate` mono.
    ///
    /// Fails with `AudioDevice` when the device is missing or busy.
    fn open(&self, config: &AudioConfig) -> Result<Box<dyn AudioStream>, DomainError>;
}
