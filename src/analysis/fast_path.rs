//! Fast path for trivially left-to-right segments
//!
//! A paragraph segment containing only plain left-to-right material — Latin
//! letters, digits, simple separators and whitespace — resolves to the
//! uniform base level without running the weak and neutral phases. The
//! outcome is functionally identical to the full pipeline: with a strong
//! left context on both sides, every such character closes to strong left
//! at the base level.

use crate::types::{DirectionClass, Level};
use crate::weak::WeakSeed;

/// Check if a class can never perturb a pure-LTR segment
#[inline]
pub(crate) fn is_trivial_class(class: DirectionClass) -> bool {
    matches!(
        class,
        DirectionClass::StrongLeft
            | DirectionClass::EuropeanNumber
            | DirectionClass::EuropeanSeparator
            | DirectionClass::EuropeanTerminator
            | DirectionClass::CommonSeparator
            | DirectionClass::WhiteSpace
            | DirectionClass::OtherNeutral
            | DirectionClass::NonSpacingMark
            | DirectionClass::SegmentSeparator
            | DirectionClass::BoundaryNeutral
    )
}

/// Check if the whole segment qualifies for the fast path
pub(crate) fn qualifies(base: Level, seed: &WeakSeed, classes: &[DirectionClass]) -> bool {
    if !base.is_ltr() {
        return false;
    }
    if !matches!(seed.last_strong, None | Some(DirectionClass::StrongLeft)) {
        return false;
    }
    if seed.last_number.is_some() {
        return false;
    }
    classes.iter().all(|&class| is_trivial_class(class))
}

/// Resolve a qualifying segment: everything closes to strong left
pub(crate) fn apply(resolved: &mut [DirectionClass]) {
    for slot in resolved {
        *slot = DirectionClass::StrongLeft;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DirectionClass::*;

    #[test]
    fn test_plain_ascii_qualifies() {
        let classes = [StrongLeft, WhiteSpace, EuropeanNumber, CommonSeparator];
        assert!(qualifies(Level::LTR, &WeakSeed::default(), &classes));
    }

    #[test]
    fn test_rtl_material_disqualifies() {
        assert!(!qualifies(
            Level::LTR,
            &WeakSeed::default(),
            &[StrongLeft, ArabicLetter]
        ));
        assert!(!qualifies(
            Level::LTR,
            &WeakSeed::default(),
            &[StrongLeft, RightToLeftEmbedding]
        ));
    }

    #[test]
    fn test_rtl_base_disqualifies() {
        assert!(!qualifies(Level::RTL, &WeakSeed::default(), &[StrongLeft]));
    }

    #[test]
    fn test_arabic_context_disqualifies() {
        let seed = WeakSeed {
            last_strong: Some(ArabicLetter),
            last_number: None,
        };
        assert!(!qualifies(Level::LTR, &seed, &[EuropeanNumber]));
    }
}
