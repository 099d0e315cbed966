//! Voxcast core: text-to-speech synthesis with voice-character post-processing.
//!
//! The crate turns raw text into encoded speech audio in four stages:
//! an external synthesis collaborator produces an MP3-framed byte stream,
//! the codec decodes it into an [`AudioBuffer`], the transformation pipeline
//! applies the pitch/speed/robotic settings of the resolved [`VoicePreset`],
//! and the codec encodes the result into the requested container format.
//!
//! [`SpeechService`] wires the stages together; everything below it is a
//! pure, synchronous transformation over exclusively owned buffers.

pub mod audio;
pub mod catalog;
pub mod error;
pub mod service;
pub mod synthesis;
pub mod transform;
pub mod types;

pub use audio::{AudioBuffer, OUTPUT_SAMPLE_RATE};
pub use catalog::{PresetCatalog, VoicePreset, DEFAULT_PRESET};
pub use error::{Error, Result};
pub use service::SpeechService;
pub use synthesis::{GoogleTranslateSynthesizer, SpeechSynthesizer};
pub use types::{OutputFormat, SpeechOutput, SpeechRequest};
