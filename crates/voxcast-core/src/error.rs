//! Error types shared across the crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the synthesis and transformation pipeline.
///
/// Every variant is fatal for the request that raised it: the service never
/// returns partial audio. Unknown preset names are deliberately absent here,
/// they fall back to the default preset instead of failing.
#[derive(Debug, Error)]
pub enum Error {
    /// Input text was empty or whitespace-only.
    #[error("No text provided")]
    EmptyInput,

    /// A parameter or buffer violated its documented range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The external synthesis collaborator failed.
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    /// The audio byte stream could not be decoded.
    #[error("Audio decode failed: {0}")]
    Decode(String),

    /// The transformed buffer could not be encoded.
    #[error("Audio encode failed: {0}")]
    Encode(String),
}
