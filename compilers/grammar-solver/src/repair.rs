//! Validate, apply one fix, repeat.

use thiserror::Error;
use tracing::{debug, warn};

use grammar_parser::{apply_pattern_fix, chain_for_clause, split_noncontiguous_v};
use grammar_protocol::{
    nearest_occurrence, ClauseElement, ClauseId, ClauseSet, InvariantId, RepairAction, RepairKind,
    RepairLog, Role, Span, ValidationReport, VChainResult, Violation,
};

use crate::invariants::{overlap_candidates, overlapping_predecessor, validate};

/// Hard upper bound on repair iterations.
pub const MAX_REPAIR_ITERATIONS: usize = 5;

/// Text of the placeholder subject inserted for INV_02.
pub const ELIDED_SUBJECT: &str = "(subject)";

/// Lower runs first. `None` means the repair loop never touches it.
pub fn priority(invariant: InvariantId) -> Option<u8> {
    match invariant {
        InvariantId::Inv03 => Some(1),
        InvariantId::Inv06 => Some(2),
        InvariantId::Inv02 => Some(3),
        InvariantId::Inv09 => Some(4),
        InvariantId::Inv04 => Some(5),
        InvariantId::Inv07 => Some(6),
        InvariantId::Inv08 => Some(7),
        InvariantId::Inv01 | InvariantId::Inv10 | InvariantId::Inv14 | InvariantId::Inv15 => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepairError {
    #[error("clause `{0}` does not exist")]
    UnknownClause(ClauseId),

    #[error("clause `{clause}` has no element {index}")]
    ElementOutOfRange { clause: ClauseId, index: usize },

    #[error("{invariant} violation carries no element index")]
    MissingElementIndex { invariant: InvariantId },

    #[error("no repair for {invariant}: {reason}")]
    NotApplicable { invariant: InvariantId, reason: String },
}

impl RepairError {
    fn not_applicable(invariant: InvariantId, reason: impl Into<String>) -> Self {
        Self::NotApplicable { invariant, reason: reason.into() }
    }
}

fn render_span(span: Option<Span>) -> String {
    match span {
        Some(s) => format!("[{},{})", s.start, s.end),
        None => "elided".to_string(),
    }
}

fn action(
    kind: RepairKind,
    v: &Violation,
    before: String,
    after: String,
    reason: String,
) -> RepairAction {
    RepairAction {
        kind,
        clause_id: v.clause_id.clone(),
        element_index: v.element_index,
        before,
        after,
        reason,
    }
}

/// Applies the structural fix for a single violation.
pub fn repair_one(
    v: &Violation,
    sentence: &str,
    clauses: &mut ClauseSet,
    vchains: &VChainResult,
) -> Result<RepairAction, RepairError> {
    let clause = clauses
        .get_mut(v.clause_id.as_str())
        .ok_or_else(|| RepairError::UnknownClause(v.clause_id.clone()))?;

    if v.invariant_id == InvariantId::Inv07 {
        let chain = chain_for_clause(clause, vchains);
        let before = clause.pattern.map_or("none".to_string(), |p| p.number().to_string());
        let pattern = apply_pattern_fix(clause, chain);
        return Ok(action(
            RepairKind::RecomputePattern,
            v,
            before,
            pattern.number().to_string(),
            format!("INV_07: Pattern recalculated for clause \"{}\"", v.clause_id),
        ));
    }

    if v.invariant_id == InvariantId::Inv02 {
        let at = clause.first_index_of(Role::V).unwrap_or(0);
        clause.insert_element(at, ClauseElement::elided(Role::S, ELIDED_SUBJECT));
        return Ok(RepairAction {
            element_index: Some(at),
            ..action(
                RepairKind::InsertElidedSubject,
                v,
                "no S".to_string(),
                format!("S {ELIDED_SUBJECT} at {at}"),
                "INV_02: Inserted elided subject before the verb".to_string(),
            )
        });
    }

    let index = v
        .element_index
        .ok_or(RepairError::MissingElementIndex { invariant: v.invariant_id })?;
    let out_of_range = || RepairError::ElementOutOfRange { clause: v.clause_id.clone(), index };
    let element = clause.elements.get(index).ok_or_else(out_of_range)?;

    match v.invariant_id {
        InvariantId::Inv03 => {
            let before = element.text.clone();
            let len = clause.elements.len();
            if !split_noncontiguous_v(sentence, clause, index) {
                return Err(RepairError::not_applicable(v.invariant_id, "V is contiguous or a single word"));
            }
            let added = clause.elements.len() + 1 - len;
            let words: Vec<&str> = clause.elements[index..index + added].iter().map(|e| e.text.as_str()).collect();
            let after = words.join(", ");
            Ok(action(
                RepairKind::SplitNoncontiguousV,
                v,
                before.clone(),
                format!("[{after}]"),
                format!("INV_03: Non-contiguous \"{before}\" split into [{after}]"),
            ))
        }

        InvariantId::Inv06 => {
            let before = element.role;
            let text = element.text.clone();
            clause.elements[index].role = Role::V;
            Ok(action(
                RepairKind::ReassignRole,
                v,
                before.to_string(),
                Role::V.to_string(),
                format!("INV_06: AUX \"{text}\" was role={before}"),
            ))
        }

        InvariantId::Inv09 => {
            let Some(span) = element.span else {
                return Err(RepairError::not_applicable(v.invariant_id, "element is elided"));
            };
            let at = nearest_occurrence(sentence, &element.text, span.start).ok_or_else(|| {
                RepairError::not_applicable(v.invariant_id, format!("\"{}\" does not occur", element.text))
            })?;
            let text = element.text.clone();
            let fixed = Span::at(at, &text);
            clause.elements[index].span = Some(fixed);
            Ok(action(
                RepairKind::FixCharspan,
                v,
                render_span(Some(span)),
                render_span(Some(fixed)),
                format!("INV_09: charSpan recalculated for \"{text}\""),
            ))
        }

        InvariantId::Inv04 => {
            let Some(span) = element.span else {
                return Err(RepairError::not_applicable(v.invariant_id, "element is elided"));
            };
            let Some(prev) = overlapping_predecessor(clause, index) else {
                return Err(RepairError::not_applicable(v.invariant_id, "no earlier overlapping element"));
            };
            let prev_text = clause.elements[prev].text.clone();

            // Walk the start past every span it lands in, skipping whitespace.
            let others: Vec<Span> = overlap_candidates(clause, index).map(|(_, s)| s).collect();
            let mut start = span.start;
            loop {
                let rest = sentence.get(start..span.end).unwrap_or("");
                start += rest.len() - rest.trim_start().len();
                match others.iter().filter(|s| s.start <= start && start < s.end).map(|s| s.end).max() {
                    Some(end) => start = end,
                    None => break,
                }
            }

            let text = sentence.get(start..span.end).map(str::trim_end).filter(|t| !t.is_empty());
            let Some(text) = text else {
                return Err(RepairError::not_applicable(
                    v.invariant_id,
                    format!("nothing left after \"{prev_text}\""),
                ));
            };
            let reason = format!("INV_04: Moved startIndex to avoid overlap with \"{prev_text}\"");
            let fixed = Span::at(start, text);
            let text = text.to_string();

            let element = &mut clause.elements[index];
            element.span = Some(fixed);
            element.text = text;
            Ok(action(RepairKind::MergeSpan, v, render_span(Some(span)), render_span(Some(fixed)), reason))
        }

        InvariantId::Inv08 => {
            let before = element.expands_to.as_ref().map(ClauseId::to_string).unwrap_or_default();
            clause.elements[index].expands_to = None;
            Ok(action(
                RepairKind::RelinkExpandsTo,
                v,
                before.clone(),
                "null".to_string(),
                format!("INV_08: Removed orphan expandsTo \"{before}\""),
            ))
        }

        other => Err(RepairError::not_applicable(other, "not auto-repaired")),
    }
}

/// The recoverable error to fix next.
fn next_target(report: &ValidationReport) -> Option<&Violation> {
    report
        .recoverable_errors()
        .filter_map(|v| priority(v.invariant_id).map(|p| (p, v)))
        .min_by_key(|(p, _)| *p)
        .map(|(_, v)| v)
}

/// Re-runs pattern determination over every clause.
pub fn normalize_patterns(clauses: &mut ClauseSet, vchains: &VChainResult) {
    for clause in clauses.iter_mut() {
        let chain = chain_for_clause(clause, vchains);
        apply_pattern_fix(clause, chain);
    }
}

/// Bounded repair loop.
///
/// Stops on success, on the first unrecoverable error, when no fix applies,
/// or after `max_iterations` (clamped to `1..=5`). Patterns are always
/// recomputed afterwards and the returned report is a fresh validation.
pub fn repair_loop(
    sentence: &str,
    clauses: &mut ClauseSet,
    vchains: &VChainResult,
    max_iterations: usize,
) -> (ValidationReport, RepairLog) {
    let mut log = RepairLog::default();
    let max_iterations = max_iterations.clamp(1, MAX_REPAIR_ITERATIONS);

    for iteration in 0..max_iterations {
        let report = validate(sentence, clauses);

        let unrecoverable: Vec<&str> = report.unrecoverable_errors().map(|v| v.message.as_str()).collect();
        if !unrecoverable.is_empty() {
            warn!(violations = ?unrecoverable, "unrecoverable violations, repair aborted");
            return (report, log);
        }
        if report.valid {
            break;
        }

        let Some(target) = next_target(&report) else { break };
        match repair_one(target, sentence, clauses, vchains) {
            Ok(action) => {
                debug!(iteration, kind = %action.kind, clause = %action.clause_id, reason = %action.reason, "repair applied");
                if iteration > 0 {
                    log.cascade_count += 1;
                }
                log.actions.push(action);
            }
            Err(e) => {
                debug!(error = %e, "no repair applicable");
                break;
            }
        }

        if iteration + 1 == max_iterations {
            warn!(max_iterations, "repair iteration bound reached");
        }
    }

    normalize_patterns(clauses, vchains);
    (validate(sentence, clauses), log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammar_protocol::{Clause, SentencePattern};

    fn el(sentence: &str, role: Role, text: &str) -> ClauseElement {
        let at = sentence.find(text).unwrap();
        ClauseElement::new(role, text, at, at + text.len())
    }

    #[test]
    fn priorities_are_ordered() {
        let order = [
            InvariantId::Inv03,
            InvariantId::Inv06,
            InvariantId::Inv02,
            InvariantId::Inv09,
            InvariantId::Inv04,
            InvariantId::Inv07,
            InvariantId::Inv08,
        ];
        for pair in order.windows(2) {
            assert!(priority(pair[0]) < priority(pair[1]));
        }
        assert_eq!(priority(InvariantId::Inv14), None);
    }

    #[test]
    fn aux_is_relabelled_and_logged() {
        let s = "Rarely did the committee acknowledge that";
        let mut clauses = ClauseSet::single(Clause::main(vec![
            el(s, Role::M, "Rarely").modifying(3),
            el(s, Role::M, "did"),
            el(s, Role::S, "the committee"),
            el(s, Role::V, "acknowledge"),
        ]));
        let (report, log) = repair_loop(s, &mut clauses, &VChainResult::default(), MAX_REPAIR_ITERATIONS);
        assert!(report.valid);
        assert_eq!(clauses.main().elements[1].role, Role::V);
        let reassign: Vec<_> = log.of_kind(RepairKind::ReassignRole).collect();
        assert_eq!(reassign.len(), 1);
        assert_eq!(reassign[0].before, "M");
        assert_eq!(reassign[0].after, "V");
    }

    #[test]
    fn split_then_cascade() {
        let s = "Never had he seen it";
        let mut clauses = ClauseSet::single(Clause::main(vec![
            el(s, Role::M, "Never").modifying(2),
            el(s, Role::S, "he"),
            ClauseElement::new(Role::V, "had seen", 6, 19),
            el(s, Role::Od, "it"),
        ]));
        let (report, log) = repair_loop(s, &mut clauses, &VChainResult::default(), MAX_REPAIR_ITERATIONS);
        assert!(report.valid, "{:?}", report.violations);
        assert_eq!(log.actions[0].kind, RepairKind::SplitNoncontiguousV);
        assert_eq!(log.actions[0].after, "[had, seen]");
        let verbs: Vec<&str> = clauses
            .main()
            .elements
            .iter()
            .filter(|e| e.role == Role::V)
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(verbs, vec!["had", "seen"]);
    }

    #[test]
    fn span_and_overlap_fixes_keep_text_in_sync() {
        let s = "The old man sat down";
        let mut clauses = ClauseSet::single(Clause::main(vec![
            ClauseElement::new(Role::S, "The old man", 0, 11),
            ClauseElement::new(Role::V, "sat", 14, 17),
            ClauseElement::new(Role::M, "man sat down", 8, 20).modifying(1),
        ]));
        let (_, log) = repair_loop(s, &mut clauses, &VChainResult::default(), MAX_REPAIR_ITERATIONS);
        assert_eq!(log.actions[0].kind, RepairKind::FixCharspan);
        assert_eq!(clauses.main().elements[1].span, Some(Span::new(12, 15)));
        for e in &clauses.main().elements {
            assert_eq!(e.span.and_then(|sp| sp.slice(s)), Some(e.text.as_str()));
        }
    }

    #[test]
    fn overlap_fix_moves_past_every_covering_span() {
        let s = "The old man sat down";
        let mut clauses = ClauseSet::single(Clause::main(vec![
            el(s, Role::S, "The old man"),
            el(s, Role::V, "sat"),
            el(s, Role::M, "man sat down").modifying(1),
        ]));
        let report = validate(s, &clauses);
        let target = report
            .violations
            .iter()
            .find(|v| v.invariant_id == InvariantId::Inv04 && v.element_index == Some(2))
            .unwrap();
        let action = repair_one(target, s, &mut clauses, &VChainResult::default()).unwrap();
        assert_eq!(action.reason, "INV_04: Moved startIndex to avoid overlap with \"The old man\"");
        let m = &clauses.main().elements[2];
        assert_eq!((m.text.as_str(), m.span), ("down", Some(Span::new(16, 20))));
        assert!(!validate(s, &clauses).has(InvariantId::Inv04));
    }

    #[test]
    fn overlap_inside_a_longer_span_is_left_alone() {
        let s = "The old man in the park ran";
        let mut clauses = ClauseSet::single(Clause::main(vec![
            el(s, Role::S, "The old man in the park"),
            el(s, Role::M, "park").modifying(0),
            el(s, Role::V, "ran"),
        ]));
        let report = validate(s, &clauses);
        let target = report.violations.iter().find(|v| v.invariant_id == InvariantId::Inv04).unwrap();
        let err = repair_one(target, s, &mut clauses, &VChainResult::default()).unwrap_err();
        assert!(matches!(err, RepairError::NotApplicable { invariant: InvariantId::Inv04, .. }));
        assert_eq!(clauses.main().elements[1].text, "park");
    }

    #[test]
    fn missing_subject_gets_elided_placeholder() {
        let s = "Quickly ran home";
        let mut clauses = ClauseSet::single(Clause::main(vec![
            el(s, Role::M, "Quickly").modifying(1),
            el(s, Role::V, "ran"),
        ]));
        let (report, log) = repair_loop(s, &mut clauses, &VChainResult::default(), MAX_REPAIR_ITERATIONS);
        assert!(report.valid);
        assert_eq!(log.actions[0].kind, RepairKind::InsertElidedSubject);
        let main = clauses.main();
        assert_eq!(main.elements[1].role, Role::S);
        assert!(main.elements[1].is_elided());
        // the modifier still points at the verb
        assert_eq!(main.elements[0].modifies_index, Some(2));
    }

    #[test]
    fn orphan_link_and_pattern_are_fixed() {
        let s = "I know it";
        let mut main = Clause::main(vec![
            el(s, Role::S, "I"),
            el(s, Role::V, "know"),
            el(s, Role::Od, "it").expanding("sub-3"),
        ]);
        main.set_pattern(SentencePattern::Svoo, SentencePattern::Svoo.label());
        let mut clauses = ClauseSet::single(main);
        let (report, log) = repair_loop(s, &mut clauses, &VChainResult::default(), MAX_REPAIR_ITERATIONS);
        assert!(report.valid);
        let kinds: Vec<RepairKind> = log.actions.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![RepairKind::RecomputePattern, RepairKind::RelinkExpandsTo]);
        assert_eq!(log.cascade_count, 1);
        assert_eq!(clauses.main().pattern, Some(SentencePattern::Svo));
    }

    #[test]
    fn unrecoverable_aborts_without_repair() {
        let s = "the big dog";
        let mut clauses = ClauseSet::single(Clause::main(vec![ClauseElement::new(Role::S, "the big dog", 1, 12)]));
        let (report, log) = repair_loop(s, &mut clauses, &VChainResult::default(), MAX_REPAIR_ITERATIONS);
        assert!(!report.valid);
        assert!(report.has(InvariantId::Inv01));
        assert!(log.actions.is_empty());
    }

    #[test]
    fn iteration_bound_is_clamped() {
        let s = "a b c d e f g";
        let mut clauses = ClauseSet::single(Clause::main(vec![
            el(s, Role::S, "a"),
            el(s, Role::V, "b"),
            ClauseElement::new(Role::Od, "c", 0, 1),
            ClauseElement::new(Role::Oi, "d", 0, 1),
            ClauseElement::new(Role::C, "e", 0, 1),
        ]));
        let (_, log) = repair_loop(s, &mut clauses, &VChainResult::default(), 0);
        assert_eq!(log.actions.len(), 1);
    }
}
