//! Sample rate conversion for decoded buffers.

use rubato::{FftFixedIn, Resampler as RubatoResampler};
use tracing::warn;

/// Inputs shorter than this are not worth an FFT pass.
const MIN_FFT_FRAMES: usize = 64;

/// Maximum frames fed to the FFT resampler per chunk.
const FFT_CHUNK_FRAMES: usize = 1024;

/// Converts interleaved PCM between two sample rates.
///
/// Uses rubato's FFT resampler for quality and falls back to linear
/// interpolation for very short inputs or when the FFT path fails. The
/// conversion preserves channel count and playback duration.
pub struct Resampler {
    from_rate: u32,
    to_rate: u32,
}

impl Resampler {
    pub fn new(from_rate: u32, to_rate: u32) -> Self {
        Self { from_rate, to_rate }
    }

    /// Resample an interleaved buffer, returning interleaved output.
    pub fn resample(&self, samples: &[f32], channels: usize) -> Vec<f32> {
        if self.from_rate == self.to_rate || samples.is_empty() || channels == 0 {
            return samples.to_vec();
        }

        let frames = samples.len() / channels;
        let planes = deinterleave(samples, channels);

        let out_planes = if frames < MIN_FFT_FRAMES {
            planes.iter().map(|p| self.resample_linear(p)).collect()
        } else {
            match self.resample_fft(&planes, frames) {
                Ok(planes) => planes,
                Err(err) => {
                    warn!("FFT resampling failed ({err}), falling back to linear interpolation");
                    planes.iter().map(|p| self.resample_linear(p)).collect()
                }
            }
        };

        interleave(&out_planes)
    }

    fn resample_fft(&self, planes: &[Vec<f64>], frames: usize) -> Result<Vec<Vec<f64>>, String> {
        let channels = planes.len();
        let chunk_size = frames.min(FFT_CHUNK_FRAMES);
        let mut resampler = FftFixedIn::<f64>::new(
            self.from_rate as usize,
            self.to_rate as usize,
            chunk_size,
            2,
            channels,
        )
        .map_err(|e| e.to_string())?;

        let delay = resampler.output_delay();
        let mut out: Vec<Vec<f64>> = vec![Vec::new(); channels];
        let mut pos = 0usize;

        while frames - pos >= resampler.input_frames_next() {
            let take = resampler.input_frames_next();
            let chunk: Vec<&[f64]> = planes.iter().map(|p| &p[pos..pos + take]).collect();
            let produced = resampler.process(&chunk, None).map_err(|e| e.to_string())?;
            append_planes(&mut out, produced);
            pos += take;
        }

        if pos < frames {
            let tail: Vec<&[f64]> = planes.iter().map(|p| &p[pos..]).collect();
            let produced = resampler
                .process_partial(Some(&tail), None)
                .map_err(|e| e.to_string())?;
            append_planes(&mut out, produced);
        }

        // Drain whatever is still buffered inside the resampler.
        let produced = resampler
            .process_partial::<&[f64]>(None, None)
            .map_err(|e| e.to_string())?;
        append_planes(&mut out, produced);

        let expected =
            ((frames as f64) * self.to_rate as f64 / self.from_rate as f64).round() as usize;
        for plane in &mut out {
            let start = delay.min(plane.len());
            let end = (delay + expected).min(plane.len());
            *plane = plane[start..end].to_vec();
            plane.resize(expected, 0.0);
        }
        Ok(out)
    }

    fn resample_linear(&self, input: &[f64]) -> Vec<f64> {
        if input.is_empty() {
            return Vec::new();
        }
        let ratio = self.to_rate as f64 / self.from_rate as f64;
        let output_len = ((input.len() as f64) * ratio).round().max(1.0) as usize;
        let mut output = Vec::with_capacity(output_len);
        for i in 0..output_len {
            let src = i as f64 / ratio;
            let lo = (src.floor() as usize).min(input.len() - 1);
            let hi = (lo + 1).min(input.len() - 1);
            let frac = src - src.floor();
            output.push(input[lo] * (1.0 - frac) + input[hi] * frac);
        }
        output
    }
}

fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f64>> {
    let frames = samples.len() / channels;
    let mut planes = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (plane, &sample) in planes.iter_mut().zip(frame) {
            plane.push(sample as f64);
        }
    }
    planes
}

fn interleave(planes: &[Vec<f64>]) -> Vec<f32> {
    let frames = planes.iter().map(|p| p.len()).min().unwrap_or(0);
    let mut samples = Vec::with_capacity(frames * planes.len());
    for i in 0..frames {
        for plane in planes {
            samples.push(plane[i] as f32);
        }
    }
    samples
}

fn append_planes(out: &mut [Vec<f64>], produced: Vec<Vec<f64>>) {
    for (plane, mut chunk) in out.iter_mut().zip(produced) {
        plane.append(&mut chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(rate: u32, freq: f32, seconds: f32) -> Vec<f32> {
        let frames = (rate as f32 * seconds) as usize;
        (0..frames)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / rate as f32).sin() * 0.5)
            .collect()
    }

    #[test]
    fn identity_when_rates_match() {
        let input = sine(24_000, 440.0, 0.1);
        let resampler = Resampler::new(24_000, 24_000);
        assert_eq!(resampler.resample(&input, 1), input);
    }

    #[test]
    fn upsampling_scales_frame_count() {
        let input = sine(22_050, 440.0, 0.5);
        let resampler = Resampler::new(22_050, 44_100);
        let output = resampler.resample(&input, 1);
        assert_eq!(output.len(), input.len() * 2);
    }

    #[test]
    fn downsampling_scales_frame_count() {
        let input = sine(44_100, 440.0, 0.5);
        let resampler = Resampler::new(44_100, 22_050);
        let output = resampler.resample(&input, 1);
        let expected = (input.len() as f64 / 2.0).round() as usize;
        assert_eq!(output.len(), expected);
    }

    #[test]
    fn stereo_output_stays_interleaved() {
        let frames = 4_800;
        let mut input = Vec::with_capacity(frames * 2);
        for i in 0..frames {
            let s = (2.0 * std::f32::consts::PI * 220.0 * i as f32 / 24_000.0).sin() * 0.4;
            input.push(s);
            input.push(-s);
        }
        let resampler = Resampler::new(24_000, 48_000);
        let output = resampler.resample(&input, 2);
        assert_eq!(output.len(), input.len() * 2);
        assert_eq!(output.len() % 2, 0);
    }

    #[test]
    fn short_input_uses_linear_path() {
        let input = vec![0.0, 0.5, 1.0, 0.5];
        let resampler = Resampler::new(8_000, 16_000);
        let output = resampler.resample(&input, 1);
        assert_eq!(output.len(), 8);
        // Linear interpolation passes the original points through.
        assert!((output[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_input_stays_empty() {
        let resampler = Resampler::new(24_000, 44_100);
        assert!(resampler.resample(&[], 1).is_empty());
    }
}
