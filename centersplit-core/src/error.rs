use std::fmt;

/// Top-level error type for the centersplit-core public API.
#[derive(Debug)]
pub enum SeparationError {
    /// Malformed sample buffer or configuration.
    InvalidInput(String),
    /// The host decoder could not produce samples.
    Decode(String),
    /// FFT / STFT failure.
    Dsp(String),
    /// WAV container could not be produced.
    Encode(String),
    /// The operation was cancelled by the caller.
    Cancelled,
}

impl fmt::Display for SeparationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeparationError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            SeparationError::Decode(msg) => write!(f, "decode error: {}", msg),
            SeparationError::Dsp(msg) => write!(f, "DSP error: {}", msg),
            SeparationError::Encode(msg) => write!(f, "encode error: {}", msg),
            SeparationError::Cancelled => write!(f, "operation cancelled"),
        }
    }
}

impl std::error::Error for SeparationError {}

/// Convenience alias so callers can write `Result<T>` instead of `Result<T, SeparationError>`.
pub type Result<T> = std::result::Result<T, SeparationError>;
