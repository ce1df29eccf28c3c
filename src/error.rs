//! Error types.
//!
//! Degenerate rates (zero, or small enough to truncate to zero) are not
//! errors; they freeze the clock. Only malformed animation data and config
//! I/O surface here.

use thiserror::Error;

/// Errors raised by the animation layer.
#[derive(Debug, Error)]
pub enum AnimationError {
    /// A sequence name that is not present in the clock's table.
    #[error("unknown animation sequence `{0}`")]
    UnknownSequence(String),
    /// A frame action registered at an index past the end of its sequence.
    #[error("frame index {frame} is out of range for a sequence of {frame_count} frames")]
    InvalidFrameIndex { frame: usize, frame_count: usize },
    /// Sequence parameters that cannot be played back.
    #[error("invalid sequence: {0}")]
    InvalidSequence(String),
    /// A sequence definition document that failed to parse.
    #[error("failed to parse sequence definitions: {0}")]
    Definition(#[from] serde_json::Error),
}

/// Errors raised while reading or writing the INI configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config file: {0}")]
    Load(String),
    #[error("failed to save config file: {0}")]
    Save(String),
}
