//! Resample-based pitch shifting.

use crate::audio::{AudioBuffer, Resampler, OUTPUT_SAMPLE_RATE};
use crate::transform::PITCH_EPSILON;

/// Shift pitch by `octaves` (negative lowers, positive raises).
///
/// The sample data is reinterpreted at `rate * 2^octaves` Hz, which moves
/// pitch and duration together, then resampled back to the fixed
/// [`OUTPUT_SAMPLE_RATE`]. This is a plain rate-reinterpretation shift, not
/// a duration-preserving vocoder: shifting up by an octave halves playback
/// time. Shifts within [`PITCH_EPSILON`] of zero and
/// non-finite values return the input unchanged.
pub fn shift(buffer: AudioBuffer, octaves: f32) -> AudioBuffer {
    if !octaves.is_finite() || octaves.abs() <= PITCH_EPSILON || buffer.is_empty() {
        return buffer;
    }

    // Clamp to 1 Hz so extreme downward shifts cannot produce a zero rate.
    let shifted_rate = ((buffer.sample_rate as f64) * 2f64.powf(octaves as f64))
        .round()
        .max(1.0) as u32;

    let resampler = Resampler::new(shifted_rate, OUTPUT_SAMPLE_RATE);
    let samples = resampler.resample(&buffer.samples, buffer.channels as usize);
    AudioBuffer {
        samples,
        sample_rate: OUTPUT_SAMPLE_RATE,
        channels: buffer.channels,
    }
}
