//! The robotic timbre filter.

use crate::audio::AudioBuffer;

/// Fixed low-pass cutoff frequency in Hz.
const LOW_PASS_CUTOFF_HZ: f64 = 3000.0;

/// Flatten a buffer into the synthetic "robotic" timbre.
///
/// A single-pole RC low-pass at [`LOW_PASS_CUTOFF_HZ`] strips the
/// high-frequency content per channel, then the channels collapse to mono.
/// Deterministic, no parameters, no error conditions.
pub fn apply_robotic(buffer: AudioBuffer) -> AudioBuffer {
    low_pass(buffer, LOW_PASS_CUTOFF_HZ).into_mono()
}

/// Single-pole low-pass, equivalent to an analog RC filter at `cutoff` Hz.
fn low_pass(mut buffer: AudioBuffer, cutoff: f64) -> AudioBuffer {
    if buffer.is_empty() {
        return buffer;
    }

    let rc = 1.0 / (2.0 * std::f64::consts::PI * cutoff);
    let dt = 1.0 / buffer.sample_rate as f64;
    let alpha = (dt / (rc + dt)) as f32;

    let channels = buffer.channels as usize;
    // Seed each channel with its first sample so the filter starts settled.
    let mut state: Vec<f32> = buffer.samples[..channels].to_vec();
    for frame in buffer.samples.chunks_mut(channels) {
        for (sample, last) in frame.iter_mut().zip(state.iter_mut()) {
            *last += alpha * (*sample - *last);
            *sample = *last;
        }
    }
    buffer
}
