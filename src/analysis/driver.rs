//! Top-level analysis driver
//!
//! Orchestrates the resolution phases per paragraph: classification,
//! explicit levels, weak-type resolution per same-level run, neutral
//! closure, and implicit level assignment, with continuation snapshot and
//! restore across buffer boundaries.

use super::continuation::{resolve_preceding_context, ContinuationState};
use super::fast_path;
use crate::classify::{CharClassifier, TextSource, UnicodeClassifier};
use crate::error::BidiError;
use crate::explicit::ExplicitResolver;
use crate::implicit::resolve_implicit;
use crate::neutral::resolve_neutrals;
use crate::types::{AnalysisFlags, AnalysisResult, AnalyzerConfig, DirectionClass, Level};
use crate::weak::{WeakSeed, WeakTypeStateMachine};

/// Bidirectional analyzer
///
/// Stateless apart from its configuration; all per-call state lives in the
/// caller-owned [`ContinuationState`].
#[derive(Debug, Clone, Default)]
pub struct BidiAnalyzer {
    config: AnalyzerConfig,
}

impl BidiAnalyzer {
    /// Create an analyzer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with explicit tuning constants
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze text with the default Unicode classifier
    pub fn analyze<S>(
        &self,
        source: &S,
        length: usize,
        flags: AnalysisFlags,
        state: Option<&mut ContinuationState>,
    ) -> Result<AnalysisResult, BidiError>
    where
        S: TextSource + ?Sized,
    {
        self.analyze_with_classifier(source, length, flags, state, &UnicodeClassifier)
    }

    /// Analyze text through a caller-supplied classifier
    pub fn analyze_with_classifier<S, C>(
        &self,
        source: &S,
        length: usize,
        flags: AnalysisFlags,
        mut state: Option<&mut ContinuationState>,
        classifier: &C,
    ) -> Result<AnalysisResult, BidiError>
    where
        S: TextSource + ?Sized,
        C: CharClassifier,
    {
        if source.is_empty() {
            return Err(BidiError::InvalidInput("empty text buffer".into()));
        }
        if length == 0 {
            return Err(BidiError::InvalidInput("zero-length analysis request".into()));
        }
        if length > source.len() {
            return Err(BidiError::InvalidRange {
                start: 0,
                end: length,
                length: source.len(),
            });
        }

        let hint_active = flags.contains(AnalysisFlags::APPLY_LENGTH_HINT)
            && length > self.config.max_analysis_length;
        let limit = if hint_active {
            self.config.max_analysis_length
        } else {
            length
        };

        let mut original = classify_units(source, limit, classifier);

        // Forced internal break point: prefer cutting after a separator
        // inside the look-ahead window over a hard cut at the cap.
        let truncated = hint_active;
        if truncated {
            let window_start = limit.saturating_sub(self.config.break_scan_window);
            if let Some(found) = original[window_start..].iter().rposition(|c| {
                matches!(
                    c,
                    DirectionClass::WhiteSpace
                        | DirectionClass::ParagraphSeparator
                        | DirectionClass::SegmentSeparator
                )
            }) {
                original.truncate(window_start + found + 1);
            }
            log::debug!(
                "length hint bounded analysis to {} of {} code units",
                original.len(),
                length
            );
        }
        let effective_len = original.len();

        let incomplete = flags.contains(AnalysisFlags::INCOMPLETE_TEXT) || truncated;
        let continuing = flags.contains(AnalysisFlags::CONTINUE_FROM_STATE) && state.is_some();

        let (entry_resolver, entry_seed) = if continuing {
            let restored = state.as_deref().expect("state presence checked").restore()?;
            let (resolver, mut seed) = restored;
            if seed.last_strong.is_none() {
                // No strong class has appeared in the paragraph yet;
                // European numbers resolve as Arabic until one does.
                seed.last_strong = Some(DirectionClass::ArabicLetter);
            }
            log::debug!(
                "continuing analysis at level {}",
                resolver.current_level().value()
            );
            (resolver, seed)
        } else {
            let base = self.determine_base_level(&original, flags);
            let mut seed = WeakSeed::default();
            if flags.contains(AnalysisFlags::PREVIOUS_STRONG_IS_ARABIC) {
                seed.last_strong = Some(DirectionClass::ArabicLetter);
            }
            (ExplicitResolver::new(base)?, seed)
        };
        let first_base = entry_resolver.base_level();
        let entry_snapshot = entry_resolver.clone();

        let mut resolved = original.clone();
        let mut levels = vec![first_base; effective_len];
        let mut unresolved_from = effective_len;
        let mut capture_strong = entry_seed.last_strong;

        let mut current_resolver = entry_resolver;
        let mut current_seed = entry_seed;
        let mut last_para_start = 0usize;
        let mut last_para_base = first_base;
        let mut para_start = 0usize;

        loop {
            let sep = original[para_start..]
                .iter()
                .position(|c| *c == DirectionClass::ParagraphSeparator)
                .map(|p| para_start + p);
            let para_end = sep.unwrap_or(effective_len);
            let base = current_resolver.base_level();
            last_para_start = para_start;
            last_para_base = base;

            let (unresolved_rel, strong_out) = self.process_paragraph(
                &mut current_resolver,
                &current_seed,
                &original[para_start..para_end],
                &mut resolved[para_start..para_end],
                &mut levels[para_start..para_end],
                flags,
                incomplete && sep.is_none(),
            );
            if let Some(strong) = strong_out {
                capture_strong = Some(strong);
            }
            if let Some(rel) = unresolved_rel {
                unresolved_from = para_start + rel;
            }

            resolve_implicit(
                &mut levels[para_start..para_end],
                &resolved[para_start..para_end],
            );
            for index in para_start..para_end {
                if original[index] == DirectionClass::SegmentSeparator {
                    levels[index] = base;
                }
            }

            let Some(sep_index) = sep else { break };
            // Paragraph separator: forced to base level, and the stack and
            // override state reset unconditionally.
            levels[sep_index] = base;
            let next_start = sep_index + 1;
            let next_base = self.determine_base_level(&original[next_start..], flags);
            current_resolver = ExplicitResolver::new(next_base)?;
            current_seed = WeakSeed::default();
            capture_strong = None;
            para_start = next_start;
        }

        if incomplete {
            if let Some(state) = state.as_deref_mut() {
                let boundary = unresolved_from;
                let mut snapshot = if last_para_start == 0 && continuing {
                    entry_snapshot
                } else {
                    ExplicitResolver::new(last_para_base)?
                };
                snapshot.advance(
                    &original[last_para_start..boundary],
                    flags.contains(AnalysisFlags::IGNORE_EXPLICIT_CONTROLS),
                );
                let (scanned_strong, scanned_number) =
                    resolve_preceding_context(&resolved[last_para_start..boundary]);
                let last_number = scanned_number.or_else(|| {
                    if boundary == last_para_start && continuing {
                        state.last_number()
                    } else {
                        None
                    }
                });
                state.capture(snapshot, capture_strong.or(scanned_strong), last_number);
                log::debug!("captured continuation state at code unit {boundary}");
            }
        }

        let resolved_count = if incomplete {
            unresolved_from
        } else {
            effective_len
        };

        Ok(AnalysisResult {
            levels,
            resolved_classes: resolved,
            resolved_count,
            base_level: first_base,
        })
    }

    /// Pick a base level from flags and, when requested, the first strong
    /// character within the scan window
    fn determine_base_level(&self, classes: &[DirectionClass], flags: AnalysisFlags) -> Level {
        if flags.contains(AnalysisFlags::FIRST_STRONG_DETERMINES_BASE) {
            for &class in classes.iter().take(self.config.first_strong_scan_limit) {
                match class {
                    DirectionClass::StrongLeft => {
                        log::trace!("first strong character is left-to-right");
                        return Level::LTR;
                    }
                    DirectionClass::StrongRight | DirectionClass::ArabicLetter => {
                        log::trace!("first strong character is right-to-left");
                        return Level::RTL;
                    }
                    DirectionClass::ParagraphSeparator => break,
                    _ => {}
                }
            }
        }
        if flags.contains(AnalysisFlags::BASE_DIRECTION_RTL) {
            Level::RTL
        } else {
            Level::LTR
        }
    }

    /// Run the resolution pipeline over one paragraph segment
    ///
    /// Returns the start of a trailing unresolved span (segment-relative)
    /// and the strong context at the end of the segment.
    #[allow(clippy::too_many_arguments)]
    fn process_paragraph(
        &self,
        resolver: &mut ExplicitResolver,
        seed: &WeakSeed,
        original: &[DirectionClass],
        resolved: &mut [DirectionClass],
        levels: &mut [Level],
        flags: AnalysisFlags,
        para_incomplete: bool,
    ) -> (Option<usize>, Option<DirectionClass>) {
        if original.is_empty() {
            return (None, None);
        }
        let base = resolver.base_level();
        let entry_level = resolver.current_level();

        if entry_level == base && fast_path::qualifies(base, seed, original) {
            log::trace!(
                "fast path: trivially left-to-right segment of {} code units",
                original.len()
            );
            fast_path::apply(resolved);
            return (None, Some(DirectionClass::StrongLeft));
        }

        let ignore_controls = flags.contains(AnalysisFlags::IGNORE_EXPLICIT_CONTROLS);
        let override_en = flags.contains(AnalysisFlags::OVERRIDE_EUROPEAN_NUMBER_RESOLUTION);
        resolver.resolve(original, resolved, levels, ignore_controls);

        let len = original.len();
        let mut unresolved_rel = None;
        let mut strong_out = None;
        let mut prev_level = entry_level;
        let mut run_start = 0usize;
        let mut first_run = true;
        while run_start < len {
            let run_level = levels[run_start];
            let mut run_end = run_start + 1;
            while run_end < len && levels[run_end] == run_level {
                run_end += 1;
            }

            let sor = boundary_class(prev_level, run_level);
            let run_seed = if first_run && run_level == entry_level {
                seed.clone()
            } else {
                WeakSeed::default()
            };

            let mut machine = WeakTypeStateMachine::new(sor, run_level, run_seed, override_en);
            machine.process(&mut resolved[run_start..run_end]);
            let outcome = machine.finish();
            strong_out = Some(outcome.last_strong);

            if let Some(rel) = outcome.unresolved_from {
                let span_start = run_start + rel;
                if run_end == len && para_incomplete {
                    unresolved_rel = Some(span_start);
                } else {
                    let after = if run_end < len { levels[run_end] } else { base };
                    let eor = boundary_class(run_level, after);
                    resolve_neutrals(
                        &mut resolved[span_start..run_end],
                        outcome.closure_context,
                        eor,
                        run_level,
                    );
                }
            }

            prev_level = run_level;
            run_start = run_end;
            first_run = false;
        }

        (unresolved_rel, strong_out)
    }
}

/// Effective strong class at a run boundary: direction of the higher of
/// the two adjoining levels
#[inline]
fn boundary_class(before: Level, after: Level) -> DirectionClass {
    before.max(after).direction().strong_class()
}

/// Classify up to `limit` code units, combining surrogate pairs
///
/// Both halves of a pair receive the scalar's class, keeping the output
/// parallel to the code units.
fn classify_units<S, C>(source: &S, limit: usize, classifier: &C) -> Vec<DirectionClass>
where
    S: TextSource + ?Sized,
    C: CharClassifier,
{
    let mut classes = Vec::with_capacity(limit);
    let mut index = 0;
    while index < limit {
        let (ch, width) = source.scalar_at(index);
        let class = classifier.class_of(ch);
        classes.push(class);
        if width == 2 {
            if index + 1 < limit {
                classes.push(class);
            }
            index += 2;
        } else {
            index += 1;
        }
    }
    classes
}
