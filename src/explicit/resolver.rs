//! Explicit embedding and override resolution
//!
//! Applies the directional embedding/override controls against the level
//! stack, tracking the active override class and an overflow counter. An
//! overflowed push and its matching pop cancel without touching the real
//! stack, so overflow never corrupts valid nesting. Unmatched pops are
//! silent no-ops. Consumed controls are re-typed to boundary neutrals and
//! carry no directional weight afterwards.

use super::stack::LevelStack;
use crate::error::BidiError;
use crate::types::{DirectionClass, Level, OverrideClass};

/// Walks input classes and resolves explicit formatting controls
#[derive(Debug, Clone)]
pub struct ExplicitResolver {
    stack: LevelStack,
    overflow_count: u32,
}

impl ExplicitResolver {
    /// Create a resolver floored at the paragraph base level
    pub fn new(base_level: Level) -> Result<Self, BidiError> {
        Ok(Self {
            stack: LevelStack::new(base_level.value())?,
            overflow_count: 0,
        })
    }

    /// Restore a resolver from continuation parts
    pub fn from_parts(stack: LevelStack, overflow_count: u32) -> Self {
        Self {
            stack,
            overflow_count,
        }
    }

    /// Tear down into continuation parts
    pub fn into_parts(self) -> (LevelStack, u32) {
        (self.stack, self.overflow_count)
    }

    /// Level currently in effect
    #[inline]
    pub fn current_level(&self) -> Level {
        self.stack.current_level()
    }

    /// Paragraph base level
    #[inline]
    pub fn base_level(&self) -> Level {
        self.stack.floor_level()
    }

    /// Resolve one input class, returning its assigned level and class
    fn step(&mut self, class: DirectionClass, ignore_controls: bool) -> (Level, DirectionClass) {
        if ignore_controls && class.is_explicit_control() {
            return (self.stack.current_level(), DirectionClass::BoundaryNeutral);
        }
        match class {
            DirectionClass::LeftToRightEmbedding => {
                self.push(true, OverrideClass::None);
                (self.stack.current_level(), DirectionClass::BoundaryNeutral)
            }
            DirectionClass::RightToLeftEmbedding => {
                self.push(false, OverrideClass::None);
                (self.stack.current_level(), DirectionClass::BoundaryNeutral)
            }
            DirectionClass::LeftToRightOverride => {
                self.push(true, OverrideClass::ForceLeft);
                (self.stack.current_level(), DirectionClass::BoundaryNeutral)
            }
            DirectionClass::RightToLeftOverride => {
                self.push(false, OverrideClass::ForceRight);
                (self.stack.current_level(), DirectionClass::BoundaryNeutral)
            }
            DirectionClass::PopDirectionalFormat => {
                self.pop();
                (self.stack.current_level(), DirectionClass::BoundaryNeutral)
            }
            _ => {
                let resolved = self
                    .stack
                    .current_override()
                    .forced_class()
                    .unwrap_or(class);
                (self.stack.current_level(), resolved)
            }
        }
    }

    fn push(&mut self, to_greater_even: bool, override_class: OverrideClass) {
        match self.stack.push(to_greater_even, override_class) {
            Ok(_) => {}
            Err(BidiError::StackOverflow) => {
                self.overflow_count += 1;
                log::trace!(
                    "explicit nesting overflow, depth counter now {}",
                    self.overflow_count
                );
            }
            Err(_) => unreachable!("push only signals overflow"),
        }
    }

    fn pop(&mut self) {
        if self.overflow_count > 0 {
            // An overflowed push/pop pair cancels without touching the
            // real stack.
            self.overflow_count -= 1;
            return;
        }
        // Unmatched pops are tolerated per the algorithm's leniency toward
        // stray formatting characters.
        let _ = self.stack.pop();
    }

    /// Resolve explicit controls over a paragraph range
    ///
    /// Reads the original classes, writing the per-position level and the
    /// post-explicit class (overrides applied, controls re-typed BN) into
    /// the parallel output slices.
    pub fn resolve(
        &mut self,
        original: &[DirectionClass],
        resolved: &mut [DirectionClass],
        levels: &mut [Level],
        ignore_controls: bool,
    ) {
        debug_assert_eq!(original.len(), resolved.len());
        debug_assert_eq!(original.len(), levels.len());
        for (index, &class) in original.iter().enumerate() {
            let (level, out) = self.step(class, ignore_controls);
            levels[index] = level;
            resolved[index] = out;
        }
    }

    /// Advance stack state over a range without producing output
    ///
    /// Used to reconstruct the continuation snapshot at a resolution
    /// boundary: deterministic replay over the original classes yields the
    /// exact stack state in effect at that point.
    pub fn advance(&mut self, original: &[DirectionClass], ignore_controls: bool) {
        for &class in original {
            let _ = self.step(class, ignore_controls);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_classes(original: &[DirectionClass]) -> (Vec<DirectionClass>, Vec<Level>) {
        let mut resolver = ExplicitResolver::new(Level::LTR).expect("base 0");
        let mut resolved = vec![DirectionClass::OtherNeutral; original.len()];
        let mut levels = vec![Level::LTR; original.len()];
        resolver.resolve(original, &mut resolved, &mut levels, false);
        (resolved, levels)
    }

    #[test]
    fn test_embedding_raises_level() {
        use DirectionClass::*;
        let (resolved, levels) = resolve_classes(&[
            StrongLeft,
            RightToLeftEmbedding,
            StrongLeft,
            PopDirectionalFormat,
            StrongLeft,
        ]);
        let values: Vec<u8> = levels.iter().map(|l| l.value()).collect();
        assert_eq!(values, [0, 1, 1, 0, 0]);
        assert_eq!(resolved[1], BoundaryNeutral);
        assert_eq!(resolved[3], BoundaryNeutral);
        assert_eq!(resolved[2], StrongLeft);
    }

    #[test]
    fn test_override_forces_class() {
        use DirectionClass::*;
        let (resolved, levels) = resolve_classes(&[
            RightToLeftOverride,
            StrongLeft,
            EuropeanNumber,
            PopDirectionalFormat,
        ]);
        assert_eq!(resolved[1], StrongRight);
        assert_eq!(resolved[2], StrongRight);
        assert_eq!(levels[1].value(), 1);
    }

    #[test]
    fn test_unmatched_pop_is_noop() {
        use DirectionClass::*;
        let (_, levels) = resolve_classes(&[PopDirectionalFormat, StrongLeft]);
        assert_eq!(levels[0].value(), 0);
        assert_eq!(levels[1].value(), 0);
    }

    #[test]
    fn test_overflow_pairs_cancel() {
        use DirectionClass::*;

        // Deep alternating nesting until pushes overflow, then one more
        // embed/pop pair; the pair must cancel against the counter and the
        // level sequence must match a version without the overflowed pair.
        let mut nested: Vec<DirectionClass> = Vec::new();
        for i in 0..61 {
            nested.push(if i % 2 == 0 {
                RightToLeftEmbedding
            } else {
                LeftToRightEmbedding
            });
        }
        let mut with_overflow = nested.clone();
        with_overflow.extend([RightToLeftEmbedding, StrongLeft, PopDirectionalFormat, StrongLeft]);
        let mut without_overflow = nested.clone();
        without_overflow.extend([StrongLeft, StrongLeft]);

        let (_, levels_with) = resolve_classes(&with_overflow);
        let (_, levels_without) = resolve_classes(&without_overflow);

        let strong_with: Vec<u8> = levels_with[61..]
            .iter()
            .zip(&with_overflow[61..])
            .filter(|(_, c)| **c == StrongLeft)
            .map(|(l, _)| l.value())
            .collect();
        let strong_without: Vec<u8> = levels_without[61..]
            .iter()
            .zip(&without_overflow[61..])
            .filter(|(_, c)| **c == StrongLeft)
            .map(|(l, _)| l.value())
            .collect();
        assert_eq!(strong_with, strong_without);
    }
}
