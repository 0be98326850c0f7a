//! Fixed-capacity stack of explicit embedding levels
//!
//! Levels on the stack are strictly increasing from bottom to top; a push
//! always produces the next greater level of the requested parity. Each
//! entry carries the directional override active at that level, consulted
//! when the stack is popped to restore the enclosing override.

use arrayvec::ArrayVec;

use crate::error::BidiError;
use crate::types::{Level, OverrideClass};

/// Maximum number of simultaneously active levels (floor included)
pub const STACK_CAPACITY: usize = 62;

#[derive(Debug, Clone, Copy)]
struct StackEntry {
    level: Level,
    override_class: OverrideClass,
}

/// Stack of active explicit embedding levels
#[derive(Debug, Clone)]
pub struct LevelStack {
    entries: ArrayVec<StackEntry, STACK_CAPACITY>,
}

impl LevelStack {
    /// Create a stack floored at the given paragraph level
    pub fn new(initial_level: u8) -> Result<Self, BidiError> {
        let level = Level::new(initial_level).ok_or(BidiError::InvalidLevel(initial_level))?;
        let mut entries = ArrayVec::new();
        entries.push(StackEntry {
            level,
            override_class: OverrideClass::None,
        });
        Ok(Self { entries })
    }

    /// Current level (top of stack)
    #[inline]
    pub fn current_level(&self) -> Level {
        self.entries[self.entries.len() - 1].level
    }

    /// Override active at the current level
    #[inline]
    pub fn current_override(&self) -> OverrideClass {
        self.entries[self.entries.len() - 1].override_class
    }

    /// Base paragraph level (bottom of stack)
    #[inline]
    pub fn floor_level(&self) -> Level {
        self.entries[0].level
    }

    /// Number of active levels including the floor
    #[inline]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Push the next greater level of the requested parity
    ///
    /// Fails with [`BidiError::StackOverflow`] when the computed level would
    /// reach the explicit maximum, leaving the stack untouched.
    pub fn push(
        &mut self,
        to_greater_even: bool,
        override_class: OverrideClass,
    ) -> Result<Level, BidiError> {
        let current = self.current_level();
        let next = if to_greater_even {
            current.next_greater_even()
        } else {
            current.next_greater_odd()
        };
        let level = next.ok_or(BidiError::StackOverflow)?;
        if self.entries.is_full() {
            return Err(BidiError::StackOverflow);
        }
        self.entries.push(StackEntry {
            level,
            override_class,
        });
        Ok(level)
    }

    /// Pop the top level and return the new top
    ///
    /// Fails with [`BidiError::StackUnderflow`] when only the floor remains.
    pub fn pop(&mut self) -> Result<Level, BidiError> {
        if self.entries.len() <= 1 {
            return Err(BidiError::StackUnderflow);
        }
        self.entries.pop();
        Ok(self.current_level())
    }

    /// Serialize to a level bitmap and an override bitmap
    ///
    /// Strictly increasing levels make the bitmap a lossless encoding: bit
    /// `n` set means level `n` is on the stack, and the matching override
    /// bit records whether that level carries a directional override. An
    /// override toward the left is distinguished by level parity (an
    /// override pushed by LRO always sits at an even level, RLO at an odd
    /// one).
    pub fn to_bitmaps(&self) -> (u64, u64) {
        let mut levels = 0u64;
        let mut overrides = 0u64;
        for entry in &self.entries {
            let bit = 1u64 << entry.level.value();
            levels |= bit;
            if entry.override_class != OverrideClass::None {
                overrides |= bit;
            }
        }
        (levels, overrides)
    }

    /// Rebuild a stack from its bitmap serialization
    pub fn from_bitmaps(levels: u64, overrides: u64) -> Result<Self, BidiError> {
        if levels == 0 {
            return Err(BidiError::InvalidContinuationState(
                "level bitmap is empty".into(),
            ));
        }
        if overrides & !levels != 0 {
            return Err(BidiError::InvalidContinuationState(
                "override bitmap marks levels not on the stack".into(),
            ));
        }
        if levels >> Level::MAX_EXPLICIT != 0 {
            return Err(BidiError::InvalidContinuationState(
                "level bitmap exceeds the maximum explicit depth".into(),
            ));
        }
        let mut entries = ArrayVec::new();
        for value in 0..Level::MAX_EXPLICIT {
            let bit = 1u64 << value;
            if levels & bit == 0 {
                continue;
            }
            let level = Level::new(value).ok_or(BidiError::InvalidLevel(value))?;
            let override_class = if overrides & bit != 0 {
                if level.is_rtl() {
                    OverrideClass::ForceRight
                } else {
                    OverrideClass::ForceLeft
                }
            } else {
                OverrideClass::None
            };
            entries.push(StackEntry {
                level,
                override_class,
            });
        }
        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_rejects_excessive_level() {
        assert!(LevelStack::new(Level::MAX_EXPLICIT).is_err());
        assert!(LevelStack::new(60).is_ok());
    }

    #[test]
    fn test_push_alternating_parity() {
        let mut stack = LevelStack::new(0).expect("floor 0");
        assert_eq!(stack.push(false, OverrideClass::None).expect("odd").value(), 1);
        assert_eq!(stack.push(true, OverrideClass::None).expect("even").value(), 2);
        assert_eq!(stack.push(false, OverrideClass::None).expect("odd").value(), 3);
        assert_eq!(stack.floor_level(), Level::LTR);
        assert_eq!(stack.depth(), 4);
    }

    #[test]
    fn test_push_overflow_leaves_stack_unchanged() {
        let mut stack = LevelStack::new(60).expect("floor 60");
        let before = stack.current_level();
        assert!(matches!(
            stack.push(false, OverrideClass::None),
            Err(BidiError::StackOverflow)
        ));
        assert_eq!(stack.current_level(), before);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_pop_never_drops_floor() {
        let mut stack = LevelStack::new(2).expect("floor 2");
        stack.push(false, OverrideClass::None).expect("push odd");
        assert_eq!(stack.pop().expect("pop to floor").value(), 2);
        assert!(matches!(stack.pop(), Err(BidiError::StackUnderflow)));
        assert_eq!(stack.current_level().value(), 2);
    }

    #[test]
    fn test_pop_restores_enclosing_override() {
        let mut stack = LevelStack::new(0).expect("floor 0");
        stack
            .push(false, OverrideClass::ForceRight)
            .expect("push RLO level");
        stack.push(true, OverrideClass::None).expect("push LRE level");
        assert_eq!(stack.current_override(), OverrideClass::None);
        stack.pop().expect("pop to RLO level");
        assert_eq!(stack.current_override(), OverrideClass::ForceRight);
    }

    #[test]
    fn test_bitmap_round_trip() {
        let mut stack = LevelStack::new(0).expect("floor 0");
        stack.push(false, OverrideClass::ForceRight).expect("push");
        stack.push(true, OverrideClass::None).expect("push");
        let (levels, overrides) = stack.to_bitmaps();
        let rebuilt = LevelStack::from_bitmaps(levels, overrides).expect("rebuild");
        assert_eq!(rebuilt.depth(), stack.depth());
        assert_eq!(rebuilt.current_level(), stack.current_level());
        assert_eq!(rebuilt.floor_level(), stack.floor_level());
        assert_eq!(rebuilt.to_bitmaps(), (levels, overrides));
    }

    #[test]
    fn test_bitmap_validation() {
        assert!(LevelStack::from_bitmaps(0, 0).is_err());
        assert!(LevelStack::from_bitmaps(0b0001, 0b0010).is_err());
        assert!(LevelStack::from_bitmaps(1u64 << 63, 0).is_err());
    }
}
