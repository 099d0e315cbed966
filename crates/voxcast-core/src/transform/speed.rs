//! Time-domain tempo change.

use crate::audio::AudioBuffer;
use crate::error::{Error, Result};
use crate::transform::SPEED_EPSILON;

/// Overlap-add window length in seconds.
const WINDOW_SECS: f64 = 0.030;

/// Change playback speed by `factor` (>1 faster, <1 slower) without
/// touching the sample rate.
///
/// Overlap-add splicing: Hann windows of [`WINDOW_SECS`] are read from the
/// input at a hop scaled by `factor` and written at a 50% overlap, so the
/// output lasts roughly `duration / factor`. No independent pitch
/// correction is attempted. Factors within [`SPEED_EPSILON`] of 1.0 return
/// the input unchanged; non-positive or non-finite factors are rejected.
pub fn change_speed(buffer: AudioBuffer, factor: f32) -> Result<AudioBuffer> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "speed factor must be a positive number, got {factor}"
        )));
    }
    if (factor - 1.0).abs() <= SPEED_EPSILON || buffer.is_empty() {
        return Ok(buffer);
    }

    let window = window_frames(buffer.sample_rate);
    if buffer.frames() < window * 2 {
        return Ok(select_frames(buffer, factor));
    }
    Ok(overlap_add(buffer, factor, window))
}

/// Window length in frames, always even and at least 4.
fn window_frames(sample_rate: u32) -> usize {
    let frames = (sample_rate as f64 * WINDOW_SECS) as usize;
    (frames.max(4)) & !1
}

fn overlap_add(buffer: AudioBuffer, factor: f32, window: usize) -> AudioBuffer {
    let channels = buffer.channels as usize;
    let frames = buffer.frames();
    let syn_hop = window / 2;
    let ana_hop = ((syn_hop as f64) * factor as f64).round().max(1.0) as usize;

    let window_count = (frames - window) / ana_hop + 1;
    let out_frames = (window_count - 1) * syn_hop + window;

    let mut out = vec![0.0f32; out_frames * channels];
    let mut weight = vec![0.0f32; out_frames];

    for k in 0..window_count {
        let in_start = k * ana_hop;
        let out_start = k * syn_hop;
        for i in 0..window {
            let w = hann(i, window);
            let out_frame = out_start + i;
            weight[out_frame] += w;
            for c in 0..channels {
                out[out_frame * channels + c] +=
                    buffer.samples[(in_start + i) * channels + c] * w;
            }
        }
    }

    // The 50% Hann overlap sums to ~1 everywhere except the tapered edges;
    // dividing by the accumulated weight flattens both.
    for (frame, &w) in weight.iter().enumerate() {
        if w > 1e-6 {
            for c in 0..channels {
                out[frame * channels + c] /= w;
            }
        }
    }

    AudioBuffer {
        samples: out,
        sample_rate: buffer.sample_rate,
        channels: buffer.channels,
    }
}

/// Fallback for buffers too short to window: pick source frames by index.
fn select_frames(buffer: AudioBuffer, factor: f32) -> AudioBuffer {
    let channels = buffer.channels as usize;
    let frames = buffer.frames();
    let out_frames = ((frames as f64) / factor as f64).round().max(1.0) as usize;

    let mut out = Vec::with_capacity(out_frames * channels);
    for i in 0..out_frames {
        let src = (((i as f64) * factor as f64).floor() as usize).min(frames - 1);
        out.extend_from_slice(&buffer.samples[src * channels..(src + 1) * channels]);
    }

    AudioBuffer {
        samples: out,
        sample_rate: buffer.sample_rate,
        channels: buffer.channels,
    }
}

fn hann(i: usize, window: usize) -> f32 {
    let phase = i as f32 / (window - 1) as f32;
    0.5 * (1.0 - (2.0 * std::f32::consts::PI * phase).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_buffer(rate: u32, channels: u16, seconds: f32) -> AudioBuffer {
        let frames = (rate as f32 * seconds) as usize;
        let mut samples = Vec::with_capacity(frames * channels as usize);
        for i in 0..frames {
            let s = (2.0 * std::f32::consts::PI * 220.0 * i as f32 / rate as f32).sin() * 0.5;
            for _ in 0..channels {
                samples.push(s);
            }
        }
        AudioBuffer::new(samples, rate, channels).expect("buffer")
    }

    #[test]
    fn near_unity_factor_is_identity() {
        let buffer = sine_buffer(24_000, 1, 0.5);
        assert_eq!(change_speed(buffer.clone(), 1.0).expect("speed"), buffer);
        assert_eq!(change_speed(buffer.clone(), 1.01).expect("speed"), buffer);
        assert_eq!(change_speed(buffer.clone(), 0.995).expect("speed"), buffer);
    }

    #[test]
    fn non_positive_factor_is_rejected() {
        let buffer = sine_buffer(24_000, 1, 0.1);
        assert!(matches!(
            change_speed(buffer.clone(), 0.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            change_speed(buffer.clone(), -1.2),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            change_speed(buffer, f32::NAN),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_buffer_is_unchanged() {
        let empty = AudioBuffer::empty(24_000, 2);
        assert_eq!(change_speed(empty.clone(), 1.35).expect("speed"), empty);
    }

    #[test]
    fn speedup_shortens_duration_proportionally() {
        let buffer = sine_buffer(24_000, 1, 1.0);
        let output = change_speed(buffer.clone(), 1.35).expect("speed");
        assert_eq!(output.sample_rate, 24_000);
        let ratio = output.duration_seconds() / buffer.duration_seconds();
        assert!((ratio - 1.0 / 1.35).abs() < 0.05, "duration ratio {ratio}");
    }

    #[test]
    fn slowdown_lengthens_duration_proportionally() {
        let buffer = sine_buffer(24_000, 1, 1.0);
        let output = change_speed(buffer.clone(), 0.7).expect("speed");
        let ratio = output.duration_seconds() / buffer.duration_seconds();
        assert!((ratio - 1.0 / 0.7).abs() < 0.05, "duration ratio {ratio}");
    }

    #[test]
    fn stereo_splice_keeps_channels_aligned() {
        let buffer = sine_buffer(24_000, 2, 0.5);
        let output = change_speed(buffer, 1.2).expect("speed");
        assert_eq!(output.channels, 2);
        assert_eq!(output.samples.len() % 2, 0);
    }

    #[test]
    fn output_stays_in_range() {
        let buffer = sine_buffer(24_000, 1, 0.5);
        let output = change_speed(buffer, 1.35).expect("speed");
        assert!(output.samples.iter().all(|s| s.abs() <= 1.0 + 1e-4));
    }

    #[test]
    fn tiny_buffer_uses_frame_selection() {
        let buffer = sine_buffer(24_000, 1, 0.01); // 240 frames, below one window pair
        let output = change_speed(buffer.clone(), 2.0).expect("speed");
        let expected = (buffer.frames() as f64 / 2.0).round() as usize;
        assert_eq!(output.frames(), expected);
    }
}
