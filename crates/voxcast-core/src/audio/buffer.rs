use crate::error::{Error, Result};

/// Decoded PCM audio: interleaved `f32` samples in `[-1, 1]`.
///
/// A buffer is exclusively owned by whichever stage currently holds it;
/// transformations consume one buffer and produce a new one. An empty buffer
/// is valid and passes through every transformation unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Interleaved sample data, `frames * channels` values.
    pub samples: Vec<f32>,
    /// Sample rate in Hz, always positive.
    pub sample_rate: u32,
    /// Channel count, always positive, typically 1 or 2.
    pub channels: u16,
}

impl AudioBuffer {
    /// Build a buffer, validating that the declared geometry matches the
    /// sample data.
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidInput("sample rate must be positive".to_string()));
        }
        if channels == 0 {
            return Err(Error::InvalidInput("channel count must be positive".to_string()));
        }
        if samples.len() % channels as usize != 0 {
            return Err(Error::InvalidInput(format!(
                "sample count {} is not a multiple of {} channels",
                samples.len(),
                channels
            )));
        }
        Ok(Self {
            samples,
            sample_rate,
            channels,
        })
    }

    /// An empty buffer with the given geometry.
    pub fn empty(sample_rate: u32, channels: u16) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
            channels,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of sample frames (one frame spans all channels).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    /// Playback duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / self.sample_rate.max(1) as f64
    }

    /// Collapse to a single channel by averaging each frame.
    pub fn into_mono(self) -> Self {
        if self.channels <= 1 {
            return self;
        }
        let channels = self.channels as usize;
        let mut mono = Vec::with_capacity(self.samples.len() / channels);
        for frame in self.samples.chunks(channels) {
            let sum: f32 = frame.iter().copied().sum();
            mono.push(sum / frame.len() as f32);
        }
        Self {
            samples: mono,
            sample_rate: self.sample_rate,
            channels: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_mismatched_geometry() {
        assert!(AudioBuffer::new(vec![0.0; 3], 44_100, 2).is_err());
        assert!(AudioBuffer::new(vec![0.0; 4], 0, 2).is_err());
        assert!(AudioBuffer::new(vec![0.0; 4], 44_100, 0).is_err());
        assert!(AudioBuffer::new(vec![0.0; 4], 44_100, 2).is_ok());
    }

    #[test]
    fn empty_buffer_is_valid() {
        let buffer = AudioBuffer::new(Vec::new(), 24_000, 1).expect("empty buffer");
        assert!(buffer.is_empty());
        assert_eq!(buffer.frames(), 0);
        assert_eq!(buffer.duration_seconds(), 0.0);
    }

    #[test]
    fn into_mono_averages_frames() {
        let buffer = AudioBuffer::new(vec![0.2, 0.4, -0.6, 0.6], 44_100, 2).expect("buffer");
        let mono = buffer.into_mono();
        assert_eq!(mono.channels, 1);
        assert_eq!(mono.samples.len(), 2);
        assert!((mono.samples[0] - 0.3).abs() < 1e-6);
        assert!(mono.samples[1].abs() < 1e-6);
    }

    #[test]
    fn into_mono_keeps_mono_untouched() {
        let buffer = AudioBuffer::new(vec![0.1, 0.2], 44_100, 1).expect("buffer");
        let mono = buffer.clone().into_mono();
        assert_eq!(mono, buffer);
    }
}
