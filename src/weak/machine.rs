//! Table-driven weak-type resolution
//!
//! Processes one run of text sharing a single embedding level. Separators,
//! terminators and marks accumulate in a pending run until a resolving
//! character arrives, at which point the whole pending run re-types
//! atomically; characters that nothing can resolve join an open neutral
//! span. Interior spans are closed against their bounding classes as soon
//! as the right bound is known; a span still open at the end of the run is
//! reported back so the caller can close it against `eor` or defer it to a
//! continuation.

use super::tables::{WeakAction, WeakInput, WeakState, ACTION, NEXT_STATE};
use crate::neutral::resolve_neutrals;
use crate::types::{DirectionClass, Level};

/// Strong/number context seeding a run
///
/// Empty fields fall back to the run's start-of-run class. A seed carried
/// across a fragment boundary reproduces the context the run would have had
/// in a single-call analysis.
#[derive(Debug, Clone, Default)]
pub struct WeakSeed {
    /// Last strong class seen (left, right, or Arabic letter)
    pub last_strong: Option<DirectionClass>,
    /// Resolved number class immediately preceding the run, if any
    pub last_number: Option<DirectionClass>,
}

/// Outcome of one run
#[derive(Debug)]
pub struct RunOutcome {
    /// Start of a trailing span the machine could not resolve, relative to
    /// the run
    pub unresolved_from: Option<usize>,
    /// Left bounding class for closing that span
    pub closure_context: DirectionClass,
    /// Strong context in effect at the end of the run
    pub last_strong: DirectionClass,
}

/// Weak-type state machine over one same-level run
#[derive(Debug)]
pub struct WeakTypeStateMachine {
    state: WeakState,
    last_strong: DirectionClass,
    prev_input: WeakInput,
    closure_context: DirectionClass,
    pending_start: Option<usize>,
    neutral_start: Option<usize>,
    run_level: Level,
    override_european_number: bool,
}

impl WeakTypeStateMachine {
    /// Create a machine for a run bounded by `sor` on the left
    pub fn new(
        sor: DirectionClass,
        run_level: Level,
        seed: WeakSeed,
        override_european_number: bool,
    ) -> Self {
        let last_strong = seed.last_strong.unwrap_or(sor);
        let state = match seed.last_number {
            Some(DirectionClass::EuropeanNumber) => WeakState::AfterEuropeanNumber,
            Some(DirectionClass::ArabicNumber) => WeakState::AfterArabicNumber,
            _ => match last_strong {
                DirectionClass::StrongLeft => WeakState::AfterLeft,
                DirectionClass::ArabicLetter => WeakState::AfterArabic,
                _ => WeakState::AfterRight,
            },
        };
        let prev_input = match state {
            WeakState::AfterEuropeanNumber => WeakInput::EuropeanNumber,
            WeakState::AfterArabicNumber => WeakInput::ArabicNumber,
            WeakState::AfterLeft => WeakInput::Left,
            WeakState::AfterArabic => WeakInput::ArabicLetter,
            _ => WeakInput::Right,
        };
        let closure_context = seed.last_number.unwrap_or(match last_strong {
            DirectionClass::StrongLeft => DirectionClass::StrongLeft,
            _ => DirectionClass::StrongRight,
        });
        Self {
            state,
            last_strong,
            prev_input,
            closure_context,
            pending_start: None,
            neutral_start: None,
            run_level,
            override_european_number,
        }
    }

    /// Resolve the run's classes in place
    pub fn process(&mut self, resolved: &mut [DirectionClass]) {
        for index in 0..resolved.len() {
            let input = WeakInput::from_class(resolved[index]);
            self.step(index, input, resolved);
        }
    }

    /// Flush remaining bookkeeping and report the run outcome
    pub fn finish(mut self) -> RunOutcome {
        self.demote_pending();
        RunOutcome {
            unresolved_from: self.neutral_start,
            closure_context: self.closure_context,
            last_strong: self.last_strong,
        }
    }

    fn step(&mut self, index: usize, input: WeakInput, resolved: &mut [DirectionClass]) {
        let mut effective = input;
        let mut action = ACTION[self.state.row()][effective.column()];
        if action == WeakAction::MimicPrevious {
            // The mark inherits the class of what it modifies; re-dispatch
            // as the previous input column.
            effective = self.prev_input;
            action = ACTION[self.state.row()][effective.column()];
            debug_assert_ne!(action, WeakAction::MimicPrevious);
        }
        let next = NEXT_STATE[self.state.row()][effective.column()];

        match action {
            WeakAction::ResolveLeft => {
                self.resolve_decisive(index, DirectionClass::StrongLeft, false, resolved);
                self.last_strong = DirectionClass::StrongLeft;
                self.state = next;
            }
            WeakAction::ResolveRight => {
                self.resolve_decisive(index, DirectionClass::StrongRight, false, resolved);
                self.last_strong = if effective == WeakInput::ArabicLetter {
                    DirectionClass::ArabicLetter
                } else {
                    DirectionClass::StrongRight
                };
                self.state = next;
            }
            WeakAction::ResolveNumber => {
                let form = self.european_number_form();
                if form == DirectionClass::ArabicNumber {
                    let retype = self.arabic_pending_retypes();
                    self.resolve_decisive(index, form, retype, resolved);
                    self.state = WeakState::AfterArabicNumber;
                } else {
                    // Terminators, a single separator, or transparent
                    // boundary neutrals between European numbers take the
                    // number's class.
                    let retype = matches!(
                        self.state,
                        WeakState::AfterTerminator
                            | WeakState::AfterEuropeanSeparator
                            | WeakState::AfterEuropeanNumber
                    );
                    self.resolve_decisive(index, form, retype, resolved);
                    self.state = next;
                }
            }
            WeakAction::ResolveArabicNumber => {
                let retype = self.arabic_pending_retypes();
                self.resolve_decisive(index, DirectionClass::ArabicNumber, retype, resolved);
                self.state = next;
            }
            WeakAction::AttachTerminator => {
                let form = self.closure_context;
                if let Some(pending) = self.pending_start.take() {
                    for slot in &mut resolved[pending..index] {
                        *slot = form;
                    }
                }
                resolved[index] = form;
                self.state = next;
            }
            WeakAction::PendTerminator | WeakAction::PendSeparator => {
                self.pending_start.get_or_insert(index);
                self.state = next;
            }
            WeakAction::DemoteThenPendTerminator => {
                self.demote_pending();
                self.pending_start = Some(index);
                self.state = next;
            }
            WeakAction::DemoteToNeutral => {
                self.demote_pending();
                self.neutral_start.get_or_insert(index);
                self.state = next;
            }
            WeakAction::ExtendRun => {
                if self.pending_start.is_none() && self.neutral_start.is_none() {
                    self.pending_start = Some(index);
                }
                // state unchanged
            }
            WeakAction::MimicPrevious => unreachable!("mimic is resolved before dispatch"),
        }

        if input != WeakInput::NonSpacingMark && input != WeakInput::BoundaryNeutral {
            self.prev_input = input;
        }
    }

    /// Check whether a pending run may re-type with an Arabic number
    fn arabic_pending_retypes(&self) -> bool {
        matches!(
            self.state,
            WeakState::AfterArabicSeparator | WeakState::AfterArabicNumber
        )
    }

    /// Final class of an incoming European number under the current strong
    /// context
    fn european_number_form(&self) -> DirectionClass {
        if self.last_strong == DirectionClass::ArabicLetter && !self.override_european_number {
            DirectionClass::ArabicNumber
        } else if self.last_strong == DirectionClass::StrongLeft {
            DirectionClass::StrongLeft
        } else {
            DirectionClass::EuropeanNumber
        }
    }

    /// Commit a decisive class at `index`, re-typing or demoting the
    /// pending run and closing the open neutral span against it
    fn resolve_decisive(
        &mut self,
        index: usize,
        form: DirectionClass,
        retype_pending: bool,
        resolved: &mut [DirectionClass],
    ) {
        if retype_pending && self.pending_start.is_some() {
            let pending = self.pending_start.take().expect("pending checked above");
            self.close_span(pending, form, resolved);
            for slot in &mut resolved[pending..index] {
                *slot = form;
            }
        } else {
            self.demote_pending();
            self.close_span(index, form, resolved);
        }
        resolved[index] = form;
        self.closure_context = form;
    }

    /// Merge the pending run into the open neutral span
    fn demote_pending(&mut self) {
        if let Some(pending) = self.pending_start.take() {
            let start = self.neutral_start.map_or(pending, |n| n.min(pending));
            self.neutral_start = Some(start);
        }
    }

    /// Close the open span, if any, against a known right bound
    fn close_span(&mut self, end: usize, right: DirectionClass, resolved: &mut [DirectionClass]) {
        if let Some(start) = self.neutral_start.take() {
            if start < end {
                resolve_neutrals(
                    &mut resolved[start..end],
                    self.closure_context,
                    right,
                    self.run_level,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DirectionClass::*;

    fn run_machine(
        classes: &[DirectionClass],
        sor: DirectionClass,
        eor: DirectionClass,
        level: Level,
        seed: WeakSeed,
        override_en: bool,
    ) -> Vec<DirectionClass> {
        let mut resolved = classes.to_vec();
        let mut machine = WeakTypeStateMachine::new(sor, level, seed, override_en);
        machine.process(&mut resolved);
        let outcome = machine.finish();
        if let Some(start) = outcome.unresolved_from {
            resolve_neutrals(
                &mut resolved[start..],
                outcome.closure_context,
                eor,
                level,
            );
        }
        resolved
    }

    fn run_ltr(classes: &[DirectionClass]) -> Vec<DirectionClass> {
        run_machine(
            classes,
            StrongLeft,
            StrongLeft,
            Level::LTR,
            WeakSeed::default(),
            false,
        )
    }

    #[test]
    fn test_european_number_after_left_becomes_left() {
        assert_eq!(
            run_ltr(&[StrongLeft, WhiteSpace, EuropeanNumber]),
            [StrongLeft, StrongLeft, StrongLeft]
        );
    }

    #[test]
    fn test_european_number_after_arabic_becomes_arabic_number() {
        let resolved = run_machine(
            &[ArabicLetter, WhiteSpace, EuropeanNumber],
            StrongRight,
            StrongRight,
            Level::RTL,
            WeakSeed::default(),
            false,
        );
        assert_eq!(resolved, [StrongRight, StrongRight, ArabicNumber]);
    }

    #[test]
    fn test_override_flag_keeps_european_number() {
        let resolved = run_machine(
            &[ArabicLetter, WhiteSpace, EuropeanNumber],
            StrongRight,
            StrongRight,
            Level::RTL,
            WeakSeed::default(),
            true,
        );
        assert_eq!(resolved, [StrongRight, StrongRight, EuropeanNumber]);
    }

    #[test]
    fn test_separator_between_numbers_absorbs() {
        let resolved = run_machine(
            &[StrongRight, EuropeanNumber, CommonSeparator, EuropeanNumber],
            StrongRight,
            StrongRight,
            Level::RTL,
            WeakSeed::default(),
            false,
        );
        assert_eq!(
            resolved,
            [StrongRight, EuropeanNumber, EuropeanNumber, EuropeanNumber]
        );
    }

    #[test]
    fn test_double_separator_goes_neutral() {
        // Two separators cannot be absorbed; they close against the
        // surrounding context instead.
        let resolved = run_machine(
            &[
                StrongRight,
                EuropeanNumber,
                CommonSeparator,
                CommonSeparator,
                EuropeanNumber,
            ],
            StrongRight,
            StrongRight,
            Level::RTL,
            WeakSeed::default(),
            false,
        );
        // Both numbers and both bounds normalize right, so the separators
        // close right.
        assert_eq!(
            resolved,
            [
                StrongRight,
                EuropeanNumber,
                StrongRight,
                StrongRight,
                EuropeanNumber
            ]
        );
    }

    #[test]
    fn test_terminator_run_attaches_to_following_number() {
        let resolved = run_machine(
            &[
                StrongRight,
                WhiteSpace,
                EuropeanTerminator,
                EuropeanTerminator,
                EuropeanNumber,
            ],
            StrongRight,
            StrongRight,
            Level::RTL,
            WeakSeed::default(),
            false,
        );
        assert_eq!(
            resolved,
            [
                StrongRight,
                StrongRight,
                EuropeanNumber,
                EuropeanNumber,
                EuropeanNumber
            ]
        );
    }

    #[test]
    fn test_terminator_after_number_attaches() {
        let resolved = run_machine(
            &[StrongRight, EuropeanNumber, EuropeanTerminator],
            StrongRight,
            StrongRight,
            Level::RTL,
            WeakSeed::default(),
            false,
        );
        assert_eq!(resolved, [StrongRight, EuropeanNumber, EuropeanNumber]);
    }

    #[test]
    fn test_lonely_terminator_goes_neutral() {
        assert_eq!(
            run_ltr(&[StrongLeft, EuropeanTerminator, StrongLeft]),
            [StrongLeft, StrongLeft, StrongLeft]
        );
    }

    #[test]
    fn test_mark_inherits_preceding_class() {
        let resolved = run_machine(
            &[ArabicLetter, NonSpacingMark, NonSpacingMark],
            StrongRight,
            StrongRight,
            Level::RTL,
            WeakSeed::default(),
            false,
        );
        assert_eq!(resolved, [StrongRight, StrongRight, StrongRight]);
    }

    #[test]
    fn test_mark_at_run_start_takes_sor() {
        assert_eq!(run_ltr(&[NonSpacingMark, StrongLeft]), [StrongLeft, StrongLeft]);
    }

    #[test]
    fn test_boundary_neutral_rides_with_numbers() {
        let resolved = run_machine(
            &[StrongRight, EuropeanNumber, BoundaryNeutral, EuropeanNumber],
            StrongRight,
            StrongRight,
            Level::RTL,
            WeakSeed::default(),
            false,
        );
        assert_eq!(
            resolved,
            [StrongRight, EuropeanNumber, EuropeanNumber, EuropeanNumber]
        );
    }

    #[test]
    fn test_seeded_number_context_absorbs_separator() {
        // Fragment starting with a separator directly after a number in the
        // previous fragment.
        let resolved = run_machine(
            &[CommonSeparator, EuropeanNumber],
            StrongRight,
            StrongRight,
            Level::RTL,
            WeakSeed {
                last_strong: Some(StrongRight),
                last_number: Some(EuropeanNumber),
            },
            false,
        );
        assert_eq!(resolved, [EuropeanNumber, EuropeanNumber]);
    }

    #[test]
    fn test_trailing_span_reported_not_resolved() {
        let mut resolved = [StrongLeft, WhiteSpace, WhiteSpace];
        let mut machine =
            WeakTypeStateMachine::new(StrongLeft, Level::LTR, WeakSeed::default(), false);
        machine.process(&mut resolved);
        let outcome = machine.finish();
        assert_eq!(outcome.unresolved_from, Some(1));
        assert_eq!(outcome.closure_context, StrongLeft);
        assert_eq!(resolved[1], WhiteSpace);
    }
}
