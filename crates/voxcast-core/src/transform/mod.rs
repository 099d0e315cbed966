//! The voice transformation pipeline.
//!
//! A pure, synchronous, single-pass function over an exclusively owned
//! buffer: robotic presets short-circuit into the timbre filter, everything
//! else runs pitch then speed. The ordering is a design commitment, the
//! pitch step's resample ratios are computed from the source's original
//! rate, so speed must not run first.

pub mod pitch;
pub mod robotic;
pub mod speed;

use crate::audio::AudioBuffer;
use crate::catalog::VoicePreset;
use crate::error::Result;

/// Pitch shifts at or below this magnitude (in octaves) are inaudible and
/// skipped to avoid needless resampling precision loss.
pub const PITCH_EPSILON: f32 = 0.001;

/// Speed factors within this distance of 1.0 are inaudible and skipped.
pub const SPEED_EPSILON: f32 = 0.01;

/// Apply a preset's transformations to a decoded buffer.
pub fn apply(buffer: AudioBuffer, preset: &VoicePreset) -> Result<AudioBuffer> {
    if preset.robotic {
        return Ok(robotic::apply_robotic(buffer));
    }

    let mut buffer = buffer;
    if preset.pitch_octaves.abs() > PITCH_EPSILON {
        buffer = pitch::shift(buffer, preset.pitch_octaves);
    }
    if (preset.speed_factor - 1.0).abs() > SPEED_EPSILON {
        buffer = speed::change_speed(buffer, preset.speed_factor)?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::OUTPUT_SAMPLE_RATE;

    fn sine_buffer(rate: u32, channels: u16, seconds: f32) -> AudioBuffer {
        let frames = (rate as f32 * seconds) as usize;
        let mut samples = Vec::with_capacity(frames * channels as usize);
        for i in 0..frames {
            let s = (2.0 * std::f32::consts::PI * 330.0 * i as f32 / rate as f32).sin() * 0.5;
            for _ in 0..channels {
                samples.push(s);
            }
        }
        AudioBuffer::new(samples, rate, channels).expect("buffer")
    }

    #[test]
    fn neutral_preset_is_bit_identical() {
        let preset = VoicePreset::neutral("en", "co.uk");
        let buffer = sine_buffer(24_000, 2, 0.5);
        let output = apply(buffer.clone(), &preset).expect("apply");
        assert_eq!(output, buffer);
    }

    #[test]
    fn robotic_ignores_pitch_and_speed_fields() {
        let mut preset = VoicePreset::neutral("en", "com");
        preset.robotic = true;
        preset.pitch_octaves = 0.5;
        preset.speed_factor = 2.0;

        let buffer = sine_buffer(24_000, 2, 0.5);
        let frames = buffer.frames();
        let output = apply(buffer, &preset).expect("apply");

        assert_eq!(output.channels, 1);
        // Neither the pitch resample nor the speed splice ran.
        assert_eq!(output.sample_rate, 24_000);
        assert_eq!(output.frames(), frames);
    }

    #[test]
    fn pitch_runs_before_speed() {
        let mut preset = VoicePreset::neutral("en", "com");
        preset.pitch_octaves = 1.0;
        preset.speed_factor = 1.25;

        let buffer = sine_buffer(24_000, 1, 1.0);
        let input_duration = buffer.duration_seconds();
        let output = apply(buffer, &preset).expect("apply");

        // Pitch up one octave halves the duration, then speed 1.25 divides
        // it again; the speed step operates on the already-resampled buffer.
        assert_eq!(output.sample_rate, OUTPUT_SAMPLE_RATE);
        let expected = input_duration / 2.0 / 1.25;
        let actual = output.duration_seconds();
        assert!(
            (actual - expected).abs() / expected < 0.06,
            "expected ~{expected}s, got {actual}s"
        );
    }

    #[test]
    fn sub_epsilon_fields_do_nothing() {
        let mut preset = VoicePreset::neutral("en", "com");
        preset.pitch_octaves = 0.0005;
        preset.speed_factor = 1.009;

        let buffer = sine_buffer(24_000, 1, 0.25);
        let output = apply(buffer.clone(), &preset).expect("apply");
        assert_eq!(output, buffer);
    }

    #[test]
    fn empty_buffer_passes_through_every_path() {
        let empty = AudioBuffer::empty(24_000, 1);

        let mut pitched = VoicePreset::neutral("en", "com");
        pitched.pitch_octaves = -0.3;
        assert_eq!(apply(empty.clone(), &pitched).expect("pitch"), empty);

        let mut sped = VoicePreset::neutral("en", "com");
        sped.speed_factor = 1.35;
        assert_eq!(apply(empty.clone(), &sped).expect("speed"), empty);

        let mut robotic = VoicePreset::neutral("en", "com");
        robotic.robotic = true;
        let output = apply(empty, &robotic).expect("robotic");
        assert!(output.is_empty());
        assert_eq!(output.channels, 1);
    }
}
