//! Implicit level assignment
//!
//! Final per-character level increment from a constant parity-by-class
//! table. Paragraph and segment separators are handled by the driver,
//! which forces them to the paragraph base level.

use crate::types::{DirectionClass, Level};

/// Level increment per (level parity, class bucket)
///
/// Buckets: strong left, strong right, European number, Arabic number.
/// Row 0 applies at even levels, row 1 at odd levels.
const IMPLICIT_INCREMENT: [[u8; 4]; 2] = [
    [0, 1, 2, 2], // even
    [1, 0, 1, 2], // odd
];

#[inline]
fn bucket(class: DirectionClass) -> Option<usize> {
    match class {
        DirectionClass::StrongLeft => Some(0),
        DirectionClass::StrongRight => Some(1),
        DirectionClass::EuropeanNumber => Some(2),
        DirectionClass::ArabicNumber => Some(3),
        _ => None,
    }
}

/// Raise levels in place from the fully resolved classes
pub fn resolve_implicit(levels: &mut [Level], resolved: &[DirectionClass]) {
    debug_assert_eq!(levels.len(), resolved.len());
    for (level, &class) in levels.iter_mut().zip(resolved) {
        if let Some(bucket) = bucket(class) {
            let parity = if level.is_rtl() { 1 } else { 0 };
            *level = level.raised(IMPLICIT_INCREMENT[parity][bucket]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DirectionClass::*;

    #[test]
    fn test_even_level_increments() {
        let mut levels = [Level::LTR; 4];
        let resolved = [StrongLeft, StrongRight, EuropeanNumber, ArabicNumber];
        resolve_implicit(&mut levels, &resolved);
        let values: Vec<u8> = levels.iter().map(|l| l.value()).collect();
        assert_eq!(values, [0, 1, 2, 2]);
    }

    #[test]
    fn test_odd_level_increments() {
        let mut levels = [Level::RTL; 4];
        let resolved = [StrongLeft, StrongRight, EuropeanNumber, ArabicNumber];
        resolve_implicit(&mut levels, &resolved);
        let values: Vec<u8> = levels.iter().map(|l| l.value()).collect();
        assert_eq!(values, [2, 1, 2, 3]);
    }
}
