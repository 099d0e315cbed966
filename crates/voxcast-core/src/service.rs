//! Request orchestration: synthesize, decode, transform, encode.

use tracing::{debug, info};

use crate::audio::{codec, AudioBuffer, Resampler, OUTPUT_SAMPLE_RATE};
use crate::catalog::PresetCatalog;
use crate::error::{Error, Result};
use crate::synthesis::SpeechSynthesizer;
use crate::transform;
use crate::types::{SpeechOutput, SpeechRequest};

/// Drives one request through the full pipeline.
///
/// The service holds no per-request state: the catalog is read-only and the
/// synthesizer is shared, so a single instance may serve any number of
/// concurrent `speak` calls.
pub struct SpeechService {
    synthesizer: Box<dyn SpeechSynthesizer>,
    catalog: PresetCatalog,
}

impl SpeechService {
    /// Service with the built-in preset catalog.
    pub fn new(synthesizer: Box<dyn SpeechSynthesizer>) -> Self {
        Self::with_catalog(synthesizer, PresetCatalog::builtin())
    }

    pub fn with_catalog(synthesizer: Box<dyn SpeechSynthesizer>, catalog: PresetCatalog) -> Self {
        Self {
            synthesizer,
            catalog,
        }
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    /// Produce transformed, encoded speech for one request.
    ///
    /// Either the whole chain succeeds and a fully encoded buffer comes
    /// back, or the first failing stage aborts the request; partial output
    /// is never returned.
    pub async fn speak(&self, request: SpeechRequest) -> Result<SpeechOutput> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(Error::EmptyInput);
        }

        let preset = self.catalog.resolve(&request.preset);
        debug!(
            "speaking {} char(s) with preset '{}' as {}",
            text.chars().count(),
            request.preset,
            request.format
        );

        let encoded = self.synthesizer.synthesize(text, preset).await?;
        let buffer = codec::decode(&encoded)?;
        let buffer = transform::apply(buffer, preset)?;
        let buffer = normalize_rate(buffer);
        let bytes = codec::encode(&buffer, request.format)?;

        info!(
            "produced {} bytes of {} audio ({:.2}s at {} Hz)",
            bytes.len(),
            request.format,
            buffer.duration_seconds(),
            buffer.sample_rate
        );

        Ok(SpeechOutput {
            bytes,
            mime: request.format.mime_type(),
            filename: format!("tts.{}", request.format.extension()),
        })
    }
}

/// Bring a transformed buffer to the common output rate before encoding.
///
/// The transformation pipeline itself leaves sample rates untouched unless
/// the pitch shifter ran; this final hop makes every response uniform at
/// [`OUTPUT_SAMPLE_RATE`] without affecting playback duration.
fn normalize_rate(buffer: AudioBuffer) -> AudioBuffer {
    if buffer.sample_rate == OUTPUT_SAMPLE_RATE || buffer.is_empty() {
        return buffer;
    }
    let resampler = Resampler::new(buffer.sample_rate, OUTPUT_SAMPLE_RATE);
    let samples = resampler.resample(&buffer.samples, buffer.channels as usize);
    AudioBuffer {
        samples,
        sample_rate: OUTPUT_SAMPLE_RATE,
        channels: buffer.channels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_rate_is_identity_at_output_rate() {
        let buffer = AudioBuffer::new(vec![0.1; 441], OUTPUT_SAMPLE_RATE, 1).expect("buffer");
        assert_eq!(normalize_rate(buffer.clone()), buffer);
    }

    #[test]
    fn normalize_rate_preserves_duration() {
        let frames = 24_000;
        let samples = (0..frames)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 24_000.0).sin() * 0.5)
            .collect();
        let buffer = AudioBuffer::new(samples, 24_000, 1).expect("buffer");
        let duration = buffer.duration_seconds();
        let normalized = normalize_rate(buffer);
        assert_eq!(normalized.sample_rate, OUTPUT_SAMPLE_RATE);
        assert!((normalized.duration_seconds() - duration).abs() < 0.01);
    }
}
