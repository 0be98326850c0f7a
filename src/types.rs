//! Core types for bidirectional analysis
//!
//! This module contains the character classes, embedding levels, caller
//! flags and configuration shared by every resolution phase.

use serde::{Deserialize, Serialize};

/// Bidirectional character class as consumed by the resolver
///
/// Every input character maps to exactly one class via a [`CharClassifier`].
/// Only the classes that participate in level resolution are represented;
/// isolate controls are classified as [`DirectionClass::OtherNeutral`].
///
/// [`CharClassifier`]: crate::classify::CharClassifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionClass {
    /// Strong left-to-right (L)
    StrongLeft,
    /// Strong right-to-left (R)
    StrongRight,
    /// Arabic letter (AL)
    ArabicLetter,
    /// European number (EN)
    EuropeanNumber,
    /// Arabic number (AN)
    ArabicNumber,
    /// European number separator (ES)
    EuropeanSeparator,
    /// European number terminator (ET)
    EuropeanTerminator,
    /// Common number separator (CS)
    CommonSeparator,
    /// Non-spacing mark (NSM)
    NonSpacingMark,
    /// Boundary neutral (BN); explicit controls are re-typed to this once
    /// consumed
    BoundaryNeutral,
    /// Paragraph separator (B)
    ParagraphSeparator,
    /// Segment separator (S)
    SegmentSeparator,
    /// Whitespace (WS)
    WhiteSpace,
    /// Other neutral (ON)
    OtherNeutral,
    /// Left-to-right embedding (LRE)
    LeftToRightEmbedding,
    /// Right-to-left embedding (RLE)
    RightToLeftEmbedding,
    /// Left-to-right override (LRO)
    LeftToRightOverride,
    /// Right-to-left override (RLO)
    RightToLeftOverride,
    /// Pop directional format (PDF)
    PopDirectionalFormat,
}

impl DirectionClass {
    /// Check if this is a strong class
    #[inline]
    pub fn is_strong(self) -> bool {
        matches!(
            self,
            DirectionClass::StrongLeft | DirectionClass::StrongRight | DirectionClass::ArabicLetter
        )
    }

    /// Check if this is a number class
    #[inline]
    pub fn is_number(self) -> bool {
        matches!(
            self,
            DirectionClass::EuropeanNumber | DirectionClass::ArabicNumber
        )
    }

    /// Check if this is an explicit formatting control
    #[inline]
    pub fn is_explicit_control(self) -> bool {
        matches!(
            self,
            DirectionClass::LeftToRightEmbedding
                | DirectionClass::RightToLeftEmbedding
                | DirectionClass::LeftToRightOverride
                | DirectionClass::RightToLeftOverride
                | DirectionClass::PopDirectionalFormat
        )
    }

    /// Check if this class carries no directional weight of its own
    #[inline]
    pub fn is_neutral(self) -> bool {
        matches!(
            self,
            DirectionClass::BoundaryNeutral
                | DirectionClass::ParagraphSeparator
                | DirectionClass::SegmentSeparator
                | DirectionClass::WhiteSpace
                | DirectionClass::OtherNeutral
        )
    }
}

/// Embedding level whose parity encodes direction (even = LTR, odd = RTL)
///
/// Explicit nesting is bounded by [`Level::MAX_EXPLICIT`]; resolved levels
/// may exceed it by at most the implicit increment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Level(u8);

impl Level {
    /// Hard maximum explicit nesting depth
    pub const MAX_EXPLICIT: u8 = 61;

    /// Base LTR level
    pub const LTR: Level = Level(0);

    /// Base RTL level
    pub const RTL: Level = Level(1);

    /// Create a level, rejecting values at or beyond the explicit maximum
    #[inline]
    pub fn new(value: u8) -> Option<Self> {
        if value < Self::MAX_EXPLICIT {
            Some(Level(value))
        } else {
            None
        }
    }

    /// Raw level value
    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Check if this level renders left-to-right
    #[inline]
    pub fn is_ltr(self) -> bool {
        self.0 % 2 == 0
    }

    /// Check if this level renders right-to-left
    #[inline]
    pub fn is_rtl(self) -> bool {
        self.0 % 2 == 1
    }

    /// Direction encoded by this level's parity
    #[inline]
    pub fn direction(self) -> Direction {
        if self.is_rtl() {
            Direction::RightToLeft
        } else {
            Direction::LeftToRight
        }
    }

    /// Next even level strictly greater than this one
    ///
    /// `None` when the computed level would reach the explicit maximum.
    #[inline]
    pub fn next_greater_even(self) -> Option<Self> {
        Self::new((self.0 + 2) & !1)
    }

    /// Next odd level strictly greater than this one
    #[inline]
    pub fn next_greater_odd(self) -> Option<Self> {
        Self::new((self.0 + 1) | 1)
    }

    /// Level raised by the given implicit increment
    #[inline]
    pub(crate) fn raised(self, by: u8) -> Self {
        Level(self.0 + by)
    }
}

/// Text direction for bidirectional processing
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl Direction {
    /// Strong class bounding a run in this direction
    #[inline]
    pub(crate) fn strong_class(self) -> DirectionClass {
        match self {
            Direction::LeftToRight => DirectionClass::StrongLeft,
            Direction::RightToLeft => DirectionClass::StrongRight,
        }
    }
}

/// Directional override attached to an explicit embedding level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverrideClass {
    /// No override active
    #[default]
    None,
    /// Characters are forced to strong left (LRO)
    ForceLeft,
    /// Characters are forced to strong right (RLO)
    ForceRight,
}

impl OverrideClass {
    /// Class forced onto characters under this override, if any
    #[inline]
    pub fn forced_class(self) -> Option<DirectionClass> {
        match self {
            OverrideClass::None => None,
            OverrideClass::ForceLeft => Some(DirectionClass::StrongLeft),
            OverrideClass::ForceRight => Some(DirectionClass::StrongRight),
        }
    }
}

bitflags::bitflags! {
    /// Caller flags controlling a single analysis call
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AnalysisFlags: u16 {
        /// Base paragraph direction is right-to-left
        const BASE_DIRECTION_RTL = 1 << 0;
        /// Scan for the first strong character to pick the base direction
        const FIRST_STRONG_DETERMINES_BASE = 1 << 1;
        /// Continuation hint: the strong context preceding this buffer is
        /// an Arabic letter
        const PREVIOUS_STRONG_IS_ARABIC = 1 << 2;
        /// Seed resolution from the supplied continuation state
        const CONTINUE_FROM_STATE = 1 << 3;
        /// More fragments of the current paragraph follow this buffer
        const INCOMPLETE_TEXT = 1 << 4;
        /// Bound the analysis length for worst-case latency
        const APPLY_LENGTH_HINT = 1 << 5;
        /// Treat explicit formatting controls as boundary neutrals
        const IGNORE_EXPLICIT_CONTROLS = 1 << 6;
        /// Disable the contextual re-typing of European numbers after
        /// Arabic letters
        const OVERRIDE_EUROPEAN_NUMBER_RESOLUTION = 1 << 7;
    }
}

/// Tuned analysis constants
///
/// These are implementation policy rather than algorithmic necessity and are
/// therefore exposed as configuration.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Soft bound on characters resolved per call when
    /// [`AnalysisFlags::APPLY_LENGTH_HINT`] is set
    pub max_analysis_length: usize,
    /// Forward window scanned for the first strong character
    pub first_strong_scan_limit: usize,
    /// Look-ahead window used when picking a forced break point
    pub break_scan_window: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_analysis_length: 9600,
            first_strong_scan_limit: 100,
            break_scan_window: 20,
        }
    }
}

/// Result of one analysis call
///
/// `levels` and `resolved_classes` are parallel arrays over the input code
/// units; both halves of a surrogate pair share one entry each.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    /// Final embedding level per code unit
    pub levels: Vec<Level>,
    /// Resolved direction class per code unit
    pub resolved_classes: Vec<DirectionClass>,
    /// Count of code units whose levels are final; the remainder must be
    /// resubmitted with the continuation state threaded through
    pub resolved_count: usize,
    /// Base level of the first paragraph analyzed
    pub base_level: Level,
}
