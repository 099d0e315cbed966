//! The external speech-synthesis collaborator.
//!
//! Synthesis itself is opaque to the pipeline: a synthesizer takes text plus
//! the voice fields of a preset and returns an MP3-framed byte stream. The
//! production implementation talks to the Google Translate TTS endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::catalog::VoicePreset;
use crate::error::{Error, Result};

/// Upper bound for a single synthesis round trip.
const SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(30);

/// The endpoint rejects long queries; text is split at whitespace into
/// pieces of at most this many characters.
const MAX_CHUNK_CHARS: usize = 200;

/// Turns text into an encoded (MP3-framed) speech byte stream.
///
/// Failures are fatal for the request that triggered them; no retry policy
/// lives at this layer.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, preset: &VoicePreset) -> Result<Vec<u8>>;
}

/// Synthesizer backed by the unofficial Google Translate TTS endpoint.
///
/// The preset's `region_variant` selects the accent host
/// (`translate.google.<variant>`) and `language` the `tl` parameter. Text
/// longer than the endpoint accepts is split into whitespace-aligned chunks
/// whose MP3 responses are concatenated; MP3 frame streams concatenate
/// cleanly and the decoder consumes the joined stream as one track.
pub struct GoogleTranslateSynthesizer {
    client: reqwest::Client,
}

impl GoogleTranslateSynthesizer {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("voxcast/{}", env!("CARGO_PKG_VERSION")))
            .timeout(SYNTHESIS_TIMEOUT)
            .build()
            .map_err(|e| Error::Synthesis(format!("failed to initialize HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn endpoint(&self, preset: &VoicePreset) -> String {
        format!("https://translate.google.{}/translate_tts", preset.region_variant)
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateSynthesizer {
    async fn synthesize(&self, text: &str, preset: &VoicePreset) -> Result<Vec<u8>> {
        let url = self.endpoint(preset);
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        debug!("synthesizing {} chunk(s) via {url}", chunks.len());

        let mut audio = Vec::new();
        for chunk in &chunks {
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", preset.language.as_str()),
                    ("q", chunk.as_str()),
                ])
                .send()
                .await
                .map_err(|e| Error::Synthesis(format!("request failed: {e}")))?;

            if !response.status().is_success() {
                return Err(Error::Synthesis(format!(
                    "endpoint returned HTTP {}",
                    response.status()
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| Error::Synthesis(format!("failed reading response body: {e}")))?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(Error::Synthesis("endpoint returned no audio".to_string()));
        }
        Ok(audio)
    }
}

/// Split `text` into pieces of at most `max_chars` characters, preferring
/// whitespace boundaries. Words longer than `max_chars` are split mid-word.
fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();

        if word_chars > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            let mut piece = String::new();
            for (i, ch) in word.chars().enumerate() {
                if i > 0 && i % max_chars == 0 {
                    chunks.push(std::mem::take(&mut piece));
                }
                piece.push(ch);
            }
            if !piece.is_empty() {
                chunks.push(piece);
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_chars
        } else {
            word_chars + 1
        };
        if current_chars + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_stays_one_chunk() {
        assert_eq!(split_text("hello world", 200), vec!["hello world"]);
    }

    #[test]
    fn chunks_respect_the_character_limit() {
        let text = "alpha beta gamma delta epsilon";
        let chunks = split_text(text, 12);
        assert!(chunks.iter().all(|c| c.chars().count() <= 12));
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn oversized_word_is_split_mid_word() {
        let word = "x".repeat(25);
        let chunks = split_text(&word, 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.concat(), word);
    }

    #[test]
    fn whitespace_only_text_yields_no_chunks() {
        assert!(split_text("   \n\t ", 200).is_empty());
    }

    #[test]
    fn endpoint_uses_the_region_variant_host() {
        let synthesizer = GoogleTranslateSynthesizer::new().expect("client");
        let preset = VoicePreset::neutral("hi", "co.in");
        assert_eq!(
            synthesizer.endpoint(&preset),
            "https://translate.google.co.in/translate_tts"
        );
    }
}
