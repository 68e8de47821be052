//! Structural invariants over a clause set. Validation never mutates.

use grammar_lexicon::{is_aux, matches_verb_set, VerbClass};
use grammar_parser::pattern_mismatch;
use grammar_protocol::{Clause, ClauseElement, ClauseSet, InvariantId, Role, Span, ValidationReport, Violation};

use crate::graph::ClauseGraph;

const VERBAL_CONTINUATIONS: &[&str] = &[
    "been", "being", "come", "go", "get", "got", "make", "made", "take", "taken", "have", "had",
    "do", "done",
];

const FINITE_MARKERS: &[&str] = &[
    "is", "are", "was", "were", "has", "have", "had", "do", "does", "did", "can", "could", "will",
    "would", "shall", "should", "may", "might", "must",
];

/// Auxiliary followed by something that reads as the rest of a verb group.
fn is_aux_led_verb_group(words: &[&str]) -> bool {
    let [first, second, ..] = words else { return false };
    if !is_aux(first) {
        return false;
    }
    let w = second.to_lowercase();
    w.ends_with("ed") || w.ends_with("en") || w.ends_with("ing") || VERBAL_CONTINUATIONS.contains(&w.as_str())
}

/// Whether an element should have been labelled V because it holds an auxiliary.
pub fn misplaced_auxiliary(element: &ClauseElement) -> bool {
    if element.role == Role::V {
        return false;
    }
    let words: Vec<&str> = element.text.split_whitespace().collect();
    match words.as_slice() {
        [single] => is_aux(single),
        _ => is_aux_led_verb_group(&words),
    }
}

fn looks_finite(word: &str, markers: &[&str]) -> bool {
    let w = word.to_lowercase();
    w.ends_with("ed") || w.ends_with("ing") || markers.contains(&w.as_str())
}

/// INV_15: a that-object of a that-complement verb with no verb of its own,
/// while the next element does have one.
fn truncated_that_clause(elements: &[ClauseElement], i: usize, main_verb: &str) -> bool {
    let element = &elements[i];
    if element.role != Role::Od || element.is_elided() {
        return false;
    }
    let text = element.text.to_lowercase();
    let after_compz = i > 0 && {
        let prev = &elements[i - 1];
        prev.role == Role::Compz
            && matches!(prev.text.trim().to_lowercase().as_str(), "that" | "whether" | "if")
    };
    let Some(body) = text.strip_prefix("that ").or(after_compz.then_some(text.as_str())) else {
        return false;
    };
    if !matches_verb_set(main_verb, VerbClass::THAT_COMPLEMENT) {
        return false;
    }
    if body.split_whitespace().any(|w| looks_finite(w, FINITE_MARKERS)) {
        return false;
    }
    elements.get(i + 1).is_some_and(|next| {
        next.is_real() && next.words().any(|w| looks_finite(w, &FINITE_MARKERS[..10]))
    })
}

/// Surface spans element `index` may not overlap. An element that expands
/// into a subordinate clause may overlap anything, and so may its partner.
pub fn overlap_candidates(clause: &Clause, index: usize) -> impl Iterator<Item = (usize, Span)> + '_ {
    let linked = clause.elements.get(index).is_some_and(|e| e.expands_to.is_some());
    clause
        .real_elements()
        .filter(move |&(i, e)| !linked && i != index && e.expands_to.is_none())
        .filter_map(|(i, e)| e.span.map(|s| (i, s)))
}

/// An element ordered before `index` (by start, then position) whose span
/// covers the start of element `index`.
pub fn overlapping_predecessor(clause: &Clause, index: usize) -> Option<usize> {
    let span = clause.elements.get(index)?.span?;
    overlap_candidates(clause, index)
        .filter(|&(i, s)| (s.start, i) < (span.start, index) && span.start < s.end)
        .min_by_key(|&(i, s)| (s.start, i))
        .map(|(i, _)| i)
}

/// Checks one clause in isolation.
pub fn validate_clause(sentence: &str, clause: &Clause) -> Vec<Violation> {
    let id = &clause.id;
    let elements = &clause.elements;
    let mut out = Vec::new();

    for (i, e) in elements.iter().enumerate() {
        if misplaced_auxiliary(e) {
            out.push(Violation::error(
                InvariantId::Inv06,
                true,
                id,
                Some(i),
                if e.word_count() > 1 {
                    format!("\"{}\" starts with AUX in role={}, expected V", e.text, e.role)
                } else {
                    format!("AUX \"{}\" has role={}, expected V", e.text, e.role)
                },
            ));
        }
    }

    let has_v = clause.has_role(Role::V);
    if !has_v && elements.iter().any(ClauseElement::is_real) {
        out.push(Violation::error(InvariantId::Inv01, false, id, None, "No finite V found in clause"));
    }

    if clause.is_main() && has_v && !clause.has_role(Role::S) {
        let imperative = elements.iter().find(|e| e.is_real()).is_some_and(|e| e.role == Role::V);
        if !imperative {
            out.push(Violation::error(InvariantId::Inv02, true, id, None, "No subject found in finite clause"));
        }
    }

    for (i, e) in clause.real_elements() {
        if !e.span_matches(sentence) {
            let slice = e.span.and_then(|s| s.slice(sentence)).unwrap_or("");
            out.push(Violation::error(
                InvariantId::Inv09,
                true,
                id,
                Some(i),
                format!("charSpan mismatch: text=\"{}\", slice=\"{slice}\"", e.text),
            ));
        }
    }

    let mut surface: Vec<(usize, &ClauseElement)> = clause.real_elements().collect();
    surface.sort_by_key(|(i, e)| (e.start(), *i));
    for (i, e) in surface {
        let Some(j) = overlapping_predecessor(clause, i) else { continue };
        let prev = &clause.elements[j];
        let (Some(a), Some(b)) = (prev.span, e.span) else { continue };
        out.push(Violation::error(
            InvariantId::Inv04,
            true,
            id,
            Some(i),
            format!(
                "Span overlap: \"{}\" [{},{}) and \"{}\" [{},{})",
                prev.text, a.start, a.end, e.text, b.start, b.end
            ),
        ));
    }

    for (i, e) in clause.real_elements() {
        if e.role == Role::V && e.word_count() > 1 && !sentence.contains(e.text.as_str()) {
            out.push(Violation::error(
                InvariantId::Inv03,
                true,
                id,
                Some(i),
                format!("Non-contiguous V text \"{}\" not found in sentence", e.text),
            ));
        }
    }

    for (i, e) in clause.real_elements() {
        if e.role == Role::M && e.modifies_index.is_none() {
            out.push(Violation::warning(
                InvariantId::Inv14,
                id,
                Some(i),
                format!("M element \"{}\" has no modifiesIndex", e.text),
            ));
        }
    }

    let main_verb = clause.main_verb_word().unwrap_or_default();
    for i in 0..elements.len() {
        if truncated_that_clause(elements, i, &main_verb) {
            out.push(Violation::error(
                InvariantId::Inv15,
                false,
                id,
                Some(i),
                format!(
                    "Od \"{}\" starts with \"that\" but has no verb, likely a truncated that-clause",
                    elements[i].text
                ),
            ));
        }
    }

    out
}

fn validate_expands_to(clauses: &ClauseSet) -> Vec<Violation> {
    clauses
        .iter()
        .flat_map(|clause| {
            clause.elements.iter().enumerate().filter_map(move |(i, e)| {
                let target = e.expands_to.as_ref()?;
                (!clauses.is_sub_clause(target.as_str())).then(|| {
                    Violation::error(
                        InvariantId::Inv08,
                        true,
                        &clause.id,
                        Some(i),
                        format!("expandsTo \"{target}\" not found in subClauses"),
                    )
                })
            })
        })
        .collect()
}

fn validate_patterns(clauses: &ClauseSet) -> Vec<Violation> {
    clauses
        .iter()
        .filter_map(|clause| {
            pattern_mismatch(clause)
                .map(|msg| Violation::error(InvariantId::Inv07, true, &clause.id, None, msg))
        })
        .collect()
}

fn validate_tree(clauses: &ClauseSet) -> Vec<Violation> {
    ClauseGraph::build(clauses)
        .cycles()
        .into_iter()
        .filter_map(|cycle| {
            let first = cycle.first()?.clone();
            let members: Vec<&str> = cycle.iter().map(|id| id.as_str()).collect();
            Some(Violation::error(
                InvariantId::Inv10,
                false,
                &first,
                None,
                format!("expandsTo cycle through [{}]", members.join(", ")),
            ))
        })
        .collect()
}

/// Validates every clause, then the cross-clause invariants.
pub fn validate(sentence: &str, clauses: &ClauseSet) -> ValidationReport {
    let mut all: Vec<Violation> = clauses
        .iter()
        .flat_map(|clause| validate_clause(sentence, clause))
        .collect();
    all.extend(validate_expands_to(clauses));
    all.extend(validate_patterns(clauses));
    all.extend(validate_tree(clauses));
    ValidationReport::from_violations(all)
}
