//! Decoded PCM buffers, codec boundary and resampling.

mod buffer;
pub mod codec;
mod resample;

pub use buffer::AudioBuffer;
pub use resample::Resampler;

/// Fixed sample rate of all audio leaving the service, in Hz.
///
/// The pitch shifter resamples to this rate after reinterpreting the input,
/// and the service normalizes every other path to it before encoding so that
/// outputs share a common rate regardless of preset.
pub const OUTPUT_SAMPLE_RATE: u32 = 44_100;
