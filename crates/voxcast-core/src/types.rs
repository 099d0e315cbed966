//! Request and response types crossing the service boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_PRESET;

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Mp3,
    Wav,
}

impl OutputFormat {
    /// Parse a format name leniently: anything that is not `wav` is MP3.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "wav" => Self::Wav,
            _ => Self::Mp3,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Mp3
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One synthesis request: raw text, a preset name and an output format.
///
/// Created per call and discarded once the response is produced; nothing is
/// retained across requests. Unknown preset names are resolved to the
/// default preset by the catalog, never rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    #[serde(default = "default_preset_name")]
    pub preset: String,
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_preset_name() -> String {
    DEFAULT_PRESET.to_string()
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, preset: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            text: text.into(),
            preset: preset.into(),
            format,
        }
    }
}

/// Encoded audio ready to hand back to the caller.
#[derive(Debug, Clone)]
pub struct SpeechOutput {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    /// Suggested download filename with an extension matching the format.
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults_to_mp3() {
        assert_eq!(OutputFormat::parse("wav"), OutputFormat::Wav);
        assert_eq!(OutputFormat::parse("WAV"), OutputFormat::Wav);
        assert_eq!(OutputFormat::parse("mp3"), OutputFormat::Mp3);
        assert_eq!(OutputFormat::parse("ogg"), OutputFormat::Mp3);
        assert_eq!(OutputFormat::parse(""), OutputFormat::Mp3);
    }

    #[test]
    fn mime_and_extension_stay_paired() {
        assert_eq!(OutputFormat::Mp3.mime_type(), "audio/mpeg");
        assert_eq!(OutputFormat::Mp3.extension(), "mp3");
        assert_eq!(OutputFormat::Wav.mime_type(), "audio/wav");
        assert_eq!(OutputFormat::Wav.extension(), "wav");
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let request: SpeechRequest = serde_json::from_str(r#"{"text":"hello"}"#).expect("request");
        assert_eq!(request.preset, DEFAULT_PRESET);
        assert_eq!(request.format, OutputFormat::Mp3);
    }
}
