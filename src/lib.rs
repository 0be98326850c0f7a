//! Bidirectional text analysis engine
//!
//! This crate computes an embedding level for every character of mixed
//! left-to-right/right-to-left text, so that layout code can reorder runs
//! for rendering. It provides:
//! - Explicit embedding/override resolution over a fixed-capacity level stack
//! - Table-driven weak-type resolution for numbers, separators and marks
//! - Neutral-run closure and implicit level assignment
//! - Incremental analysis with continuation state across buffer boundaries

pub mod analysis;
pub mod classify;
pub mod error;
pub mod explicit;
pub mod implicit;
pub mod neutral;
pub mod types;
pub mod weak;

pub use analysis::{analyze_text, BidiAnalyzer, ContinuationState};
pub use classify::{CharClassifier, TextSource, UnicodeClassifier, Utf16Buffer};
pub use error::BidiError;
pub use explicit::{ExplicitResolver, LevelStack};
pub use types::{
    AnalysisFlags, AnalysisResult, AnalyzerConfig, Direction, DirectionClass, Level, OverrideClass,
};

/// Check if text contains material requiring right-to-left handling
///
/// Scans only the first 200 characters; right-to-left content past that
/// point is found by the full analysis anyway.
pub fn has_rtl_content(text: &str) -> bool {
    let classifier = UnicodeClassifier;
    text.chars().take(200).any(|ch| {
        matches!(
            classifier.class_of(ch),
            DirectionClass::StrongRight
                | DirectionClass::ArabicLetter
                | DirectionClass::RightToLeftEmbedding
                | DirectionClass::RightToLeftOverride
        )
    })
}

/// Base direction from the first strong character, defaulting left-to-right
pub fn base_direction_of(text: &str) -> Direction {
    let classifier = UnicodeClassifier;
    for ch in text.chars().take(100) {
        match classifier.class_of(ch) {
            DirectionClass::StrongLeft => return Direction::LeftToRight,
            DirectionClass::StrongRight | DirectionClass::ArabicLetter => {
                return Direction::RightToLeft
            }
            _ => {}
        }
    }
    Direction::LeftToRight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_rtl_content() {
        assert!(!has_rtl_content("plain ascii text"));
        assert!(has_rtl_content("שלום"));
        assert!(has_rtl_content("embedded \u{202B}x\u{202C}"));
    }

    #[test]
    fn test_base_direction_of() {
        assert_eq!(base_direction_of("hello"), Direction::LeftToRight);
        assert_eq!(base_direction_of("مرحبا"), Direction::RightToLeft);
        assert_eq!(base_direction_of("123 مرحبا"), Direction::RightToLeft);
        assert_eq!(base_direction_of(""), Direction::LeftToRight);
    }
}
