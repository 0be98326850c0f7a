//! Constant transition tables for the weak-type state machine
//!
//! The machine is keyed by nine states and eleven input columns. Each
//! `(state, input)` pair yields an action plus a nominal next state; a
//! European number that re-types to an Arabic number advances to the
//! Arabic-number state instead of the nominal one.

use crate::types::DirectionClass;

/// Weak resolution states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeakState {
    /// Last decisive class was strong left
    AfterLeft,
    /// Last decisive class was strong right
    AfterRight,
    /// Last decisive class was an Arabic letter
    AfterArabic,
    /// Last decisive class was a European number
    AfterEuropeanNumber,
    /// Last decisive class was an Arabic number
    AfterArabicNumber,
    /// A run of European terminators is pending
    AfterTerminator,
    /// A European number followed by a single separator is pending
    AfterEuropeanSeparator,
    /// An Arabic number followed by a common separator is pending
    AfterArabicSeparator,
    /// Inside an unresolved neutral span
    Neutral,
}

/// Number of machine states
pub const STATE_COUNT: usize = 9;

/// Input columns driving the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeakInput {
    Left,
    Right,
    ArabicLetter,
    EuropeanNumber,
    EuropeanSeparator,
    Terminator,
    ArabicNumber,
    CommonSeparator,
    NonSpacingMark,
    BoundaryNeutral,
    Other,
}

/// Number of input columns
pub const INPUT_COUNT: usize = 11;

impl WeakInput {
    /// Column for a post-explicit direction class
    pub fn from_class(class: DirectionClass) -> Self {
        match class {
            DirectionClass::StrongLeft => WeakInput::Left,
            DirectionClass::StrongRight => WeakInput::Right,
            DirectionClass::ArabicLetter => WeakInput::ArabicLetter,
            DirectionClass::EuropeanNumber => WeakInput::EuropeanNumber,
            DirectionClass::EuropeanSeparator => WeakInput::EuropeanSeparator,
            DirectionClass::EuropeanTerminator => WeakInput::Terminator,
            DirectionClass::ArabicNumber => WeakInput::ArabicNumber,
            DirectionClass::CommonSeparator => WeakInput::CommonSeparator,
            DirectionClass::NonSpacingMark => WeakInput::NonSpacingMark,
            DirectionClass::BoundaryNeutral => WeakInput::BoundaryNeutral,
            _ => WeakInput::Other,
        }
    }

    #[inline]
    pub(crate) fn column(self) -> usize {
        self as usize
    }
}

/// Action taken for one `(state, input)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeakAction {
    /// Decisive strong left: flush any pending run, close the open span
    ResolveLeft,
    /// Decisive strong right (Arabic letters re-type to right here)
    ResolveRight,
    /// European number; final form depends on the strong context, and a
    /// pending terminator or separator run may re-type with it
    ResolveNumber,
    /// Arabic number; a pending common separator may re-type with it
    ResolveArabicNumber,
    /// Terminator directly after a European number takes the number's
    /// resolved class
    AttachTerminator,
    /// Begin or extend a pending terminator run
    PendTerminator,
    /// Demote the pending separator, then begin a terminator run
    DemoteThenPendTerminator,
    /// Begin a pending separator after a number
    PendSeparator,
    /// Give up on the pending run; it joins the open neutral span
    DemoteToNeutral,
    /// Transparent boundary neutral; rides along with whatever is open
    ExtendRun,
    /// Non-spacing mark: re-dispatch as the previous input column
    MimicPrevious,
}

use WeakAction::*;
use WeakState::*;

/// Next state per `(state, input)` pair
///
/// Columns: L, R, AL, EN, ES, ET, AN, CS, NSM, BN, Other.
pub const NEXT_STATE: [[WeakState; INPUT_COUNT]; STATE_COUNT] = [
    // AfterLeft
    [
        AfterLeft, AfterRight, AfterArabic, AfterEuropeanNumber, Neutral, AfterTerminator,
        AfterArabicNumber, Neutral, AfterLeft, AfterLeft, Neutral,
    ],
    // AfterRight
    [
        AfterLeft, AfterRight, AfterArabic, AfterEuropeanNumber, Neutral, AfterTerminator,
        AfterArabicNumber, Neutral, AfterRight, AfterRight, Neutral,
    ],
    // AfterArabic
    [
        AfterLeft, AfterRight, AfterArabic, AfterEuropeanNumber, Neutral, AfterTerminator,
        AfterArabicNumber, Neutral, AfterArabic, AfterArabic, Neutral,
    ],
    // AfterEuropeanNumber
    [
        AfterLeft, AfterRight, AfterArabic, AfterEuropeanNumber, AfterEuropeanSeparator,
        AfterEuropeanNumber, AfterArabicNumber, AfterEuropeanSeparator, AfterEuropeanNumber,
        AfterEuropeanNumber, Neutral,
    ],
    // AfterArabicNumber
    [
        AfterLeft, AfterRight, AfterArabic, AfterEuropeanNumber, Neutral, AfterTerminator,
        AfterArabicNumber, AfterArabicSeparator, AfterArabicNumber, AfterArabicNumber, Neutral,
    ],
    // AfterTerminator
    [
        AfterLeft, AfterRight, AfterArabic, AfterEuropeanNumber, Neutral, AfterTerminator,
        AfterArabicNumber, Neutral, AfterTerminator, AfterTerminator, Neutral,
    ],
    // AfterEuropeanSeparator
    [
        AfterLeft, AfterRight, AfterArabic, AfterEuropeanNumber, Neutral, AfterTerminator,
        AfterArabicNumber, Neutral, AfterEuropeanSeparator, AfterEuropeanSeparator, Neutral,
    ],
    // AfterArabicSeparator
    [
        AfterLeft, AfterRight, AfterArabic, AfterEuropeanNumber, Neutral, AfterTerminator,
        AfterArabicNumber, Neutral, AfterArabicSeparator, AfterArabicSeparator, Neutral,
    ],
    // Neutral
    [
        AfterLeft, AfterRight, AfterArabic, AfterEuropeanNumber, Neutral, AfterTerminator,
        AfterArabicNumber, Neutral, Neutral, Neutral, Neutral,
    ],
];

/// Action per `(state, input)` pair
///
/// Columns: L, R, AL, EN, ES, ET, AN, CS, NSM, BN, Other.
pub const ACTION: [[WeakAction; INPUT_COUNT]; STATE_COUNT] = [
    // AfterLeft
    [
        ResolveLeft, ResolveRight, ResolveRight, ResolveNumber, DemoteToNeutral, PendTerminator,
        ResolveArabicNumber, DemoteToNeutral, MimicPrevious, ExtendRun, DemoteToNeutral,
    ],
    // AfterRight
    [
        ResolveLeft, ResolveRight, ResolveRight, ResolveNumber, DemoteToNeutral, PendTerminator,
        ResolveArabicNumber, DemoteToNeutral, MimicPrevious, ExtendRun, DemoteToNeutral,
    ],
    // AfterArabic
    [
        ResolveLeft, ResolveRight, ResolveRight, ResolveNumber, DemoteToNeutral, PendTerminator,
        ResolveArabicNumber, DemoteToNeutral, MimicPrevious, ExtendRun, DemoteToNeutral,
    ],
    // AfterEuropeanNumber
    [
        ResolveLeft, ResolveRight, ResolveRight, ResolveNumber, PendSeparator, AttachTerminator,
        ResolveArabicNumber, PendSeparator, MimicPrevious, ExtendRun, DemoteToNeutral,
    ],
    // AfterArabicNumber
    [
        ResolveLeft, ResolveRight, ResolveRight, ResolveNumber, DemoteToNeutral, PendTerminator,
        ResolveArabicNumber, PendSeparator, MimicPrevious, ExtendRun, DemoteToNeutral,
    ],
    // AfterTerminator
    [
        ResolveLeft, ResolveRight, ResolveRight, ResolveNumber, DemoteToNeutral, PendTerminator,
        ResolveArabicNumber, DemoteToNeutral, MimicPrevious, ExtendRun, DemoteToNeutral,
    ],
    // AfterEuropeanSeparator
    [
        ResolveLeft, ResolveRight, ResolveRight, ResolveNumber, DemoteToNeutral,
        DemoteThenPendTerminator, ResolveArabicNumber, DemoteToNeutral, MimicPrevious, ExtendRun,
        DemoteToNeutral,
    ],
    // AfterArabicSeparator
    [
        ResolveLeft, ResolveRight, ResolveRight, ResolveNumber, DemoteToNeutral,
        DemoteThenPendTerminator, ResolveArabicNumber, DemoteToNeutral, MimicPrevious, ExtendRun,
        DemoteToNeutral,
    ],
    // Neutral
    [
        ResolveLeft, ResolveRight, ResolveRight, ResolveNumber, DemoteToNeutral, PendTerminator,
        ResolveArabicNumber, DemoteToNeutral, MimicPrevious, ExtendRun, DemoteToNeutral,
    ],
];

impl WeakState {
    #[inline]
    pub(crate) fn row(self) -> usize {
        self as usize
    }
}
