//! Analysis driver and continuation support
//!
//! This module provides the top-level entry point orchestrating the
//! resolution phases, plus the state object threaded across buffer
//! boundaries for incremental analysis.

pub mod continuation;
pub mod driver;
pub mod fast_path;

// Re-export main types for convenient access
pub use continuation::ContinuationState;
pub use driver::BidiAnalyzer;

use crate::classify::Utf16Buffer;
use crate::error::BidiError;
use crate::types::{AnalysisFlags, AnalysisResult};

/// Global analyzer instance for convenience (default configuration)
static GLOBAL_ANALYZER: once_cell::sync::Lazy<BidiAnalyzer> =
    once_cell::sync::Lazy::new(BidiAnalyzer::new);

/// Convenience entry point resolving string text through the global
/// analyzer
pub fn analyze_text(text: &str, flags: AnalysisFlags) -> Result<AnalysisResult, BidiError> {
    let buffer = Utf16Buffer::new(text);
    let length = buffer.units().len();
    GLOBAL_ANALYZER.analyze(buffer.units(), length, flags, None)
}
