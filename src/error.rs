//! Error handling for bidirectional analysis

use crate::types::Level;

/// Comprehensive error handling for bidirectional analysis
#[derive(Debug, thiserror::Error)]
pub enum BidiError {
    #[error("Invalid text input: {0}")]
    InvalidInput(String),

    #[error("Invalid range: start {start}, end {end}, length {length}")]
    InvalidRange {
        start: usize,
        end: usize,
        length: usize,
    },

    #[error("Embedding level {0} exceeds the maximum explicit depth of {max}", max = Level::MAX_EXPLICIT)]
    InvalidLevel(u8),

    #[error("Explicit embedding stack overflow")]
    StackOverflow,

    #[error("Explicit embedding stack underflow")]
    StackUnderflow,

    #[error("Invalid continuation state: {0}")]
    InvalidContinuationState(String),
}
