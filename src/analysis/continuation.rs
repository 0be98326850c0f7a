//! Continuation state across buffer boundaries
//!
//! A paragraph fetched in fragments threads a [`ContinuationState`] through
//! successive analysis calls. The state is created once per logical
//! paragraph, mutated by each call, and discarded at paragraph end; it
//! reflects processing exactly up to the resolved boundary, so the caller
//! resubmits text from there onward.

use serde::{Deserialize, Serialize};

use crate::error::BidiError;
use crate::explicit::{ExplicitResolver, LevelStack};
use crate::types::{DirectionClass, Level};
use crate::weak::WeakSeed;

/// Sequential accumulator carrying resolution context between calls
///
/// Must not be shared between concurrent callers; it is owned by whoever
/// owns the paragraph. The level stack serializes as a level bitmap plus an
/// override bitmap, both validated on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationState {
    last_strong: Option<DirectionClass>,
    last_number: Option<DirectionClass>,
    level_bitmap: u64,
    override_bitmap: u64,
    overflow_count: u32,
}

impl ContinuationState {
    /// Fresh state for a paragraph at the given base level
    pub fn new(base_level: Level) -> Self {
        Self {
            last_strong: None,
            last_number: None,
            level_bitmap: 1u64 << base_level.value(),
            override_bitmap: 0,
            overflow_count: 0,
        }
    }

    /// Last strong class carried across the boundary
    pub fn last_strong(&self) -> Option<DirectionClass> {
        self.last_strong
    }

    /// Resolved number class immediately preceding the boundary
    pub fn last_number(&self) -> Option<DirectionClass> {
        self.last_number
    }

    /// Rebuild resolver and weak seed, validating the serialized stack
    pub(crate) fn restore(&self) -> Result<(ExplicitResolver, WeakSeed), BidiError> {
        if let Some(class) = self.last_strong {
            if !class.is_strong() {
                return Err(BidiError::InvalidContinuationState(format!(
                    "{class:?} is not a strong class"
                )));
            }
        }
        if let Some(class) = self.last_number {
            if !class.is_number() {
                return Err(BidiError::InvalidContinuationState(format!(
                    "{class:?} is not a number class"
                )));
            }
        }
        let stack = LevelStack::from_bitmaps(self.level_bitmap, self.override_bitmap)?;
        let resolver = ExplicitResolver::from_parts(stack, self.overflow_count);
        let seed = WeakSeed {
            last_strong: self.last_strong,
            last_number: self.last_number,
        };
        Ok((resolver, seed))
    }

    /// Overwrite with the context in effect at a resolution boundary
    pub(crate) fn capture(
        &mut self,
        resolver: ExplicitResolver,
        last_strong: Option<DirectionClass>,
        last_number: Option<DirectionClass>,
    ) {
        let (stack, overflow_count) = resolver.into_parts();
        let (level_bitmap, override_bitmap) = stack.to_bitmaps();
        self.last_strong = last_strong;
        self.last_number = last_number;
        self.level_bitmap = level_bitmap;
        self.override_bitmap = override_bitmap;
        self.overflow_count = overflow_count;
    }
}

/// Scan the resolved classes preceding a boundary for carried context
///
/// Returns the last resolved strong direction (if any survives in the
/// prefix) and the resolved number class directly at the boundary. This is
/// an explicit operation invoked once by the driver when it captures state.
pub(crate) fn resolve_preceding_context(
    resolved: &[DirectionClass],
) -> (Option<DirectionClass>, Option<DirectionClass>) {
    let last_number = match resolved.last() {
        Some(&class) if class.is_number() => Some(class),
        _ => None,
    };
    let last_strong = resolved
        .iter()
        .rev()
        .find(|c| matches!(c, DirectionClass::StrongLeft | DirectionClass::StrongRight))
        .copied();
    (last_strong, last_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trips_through_serde() {
        let mut state = ContinuationState::new(Level::RTL);
        let resolver = ExplicitResolver::new(Level::RTL).expect("base 1");
        state.capture(
            resolver,
            Some(DirectionClass::ArabicLetter),
            Some(DirectionClass::ArabicNumber),
        );
        let json = serde_json::to_string(&state).expect("serialize");
        let back: ContinuationState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, state);
        assert!(back.restore().is_ok());
    }

    #[test]
    fn test_restore_rejects_malformed_stack() {
        let state = ContinuationState {
            last_strong: None,
            last_number: None,
            level_bitmap: 0,
            override_bitmap: 0,
            overflow_count: 0,
        };
        assert!(matches!(
            state.restore(),
            Err(BidiError::InvalidContinuationState(_))
        ));
    }

    #[test]
    fn test_restore_rejects_non_strong_context() {
        let state = ContinuationState {
            last_strong: Some(DirectionClass::WhiteSpace),
            last_number: None,
            level_bitmap: 1,
            override_bitmap: 0,
            overflow_count: 0,
        };
        assert!(state.restore().is_err());
    }

    #[test]
    fn test_preceding_context_scan() {
        use DirectionClass::*;
        assert_eq!(
            resolve_preceding_context(&[StrongLeft, WhiteSpace, EuropeanNumber]),
            (Some(StrongLeft), Some(EuropeanNumber))
        );
        assert_eq!(
            resolve_preceding_context(&[WhiteSpace]),
            (None, None)
        );
    }
}
