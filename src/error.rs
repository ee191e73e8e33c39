/// Crate-level error type for the sawtooth pitch tracker.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid parameter value.
    #[error("invalid parameter `{name}`: got {value}, {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    /// Audio data is empty when a non-empty signal was required.
    #[error("audio data is empty")]
    EmptyAudio,

    /// Pitch search range is invalid.
    #[error("invalid pitch range: pmin={pmin}, pmax={pmax} ({reason})")]
    InvalidPitchRange {
        pmin: f64,
        pmax: f64,
        reason: &'static str,
    },

    /// Audio I/O errors.
    #[error(transparent)]
    Audio(#[from] crate::io::AudioError),

    /// File I/O errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for sawtooth operations.
pub type Result<T> = std::result::Result<T, Error>;
