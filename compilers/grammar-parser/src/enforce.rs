//! Pre-validation normalisation of a draft clause against the sentence and its V-chains.

use tracing::debug;

use grammar_protocol::{
    nearest_occurrence, ArrowType, Clause, ClauseElement, Role, Span, VChainResult,
};

/// Re-anchors every surface element whose span does not slice to its text
/// at the occurrence nearest the declared start. Elements whose text never
/// occurs are left as they are.
pub fn fix_element_indices(sentence: &str, clause: &mut Clause) -> usize {
    let mut order: Vec<usize> = clause.real_elements().map(|(i, _)| i).collect();
    order.sort_by_key(|&i| clause.elements[i].start());

    let mut fixed = 0;
    for i in order {
        let element = &mut clause.elements[i];
        let Some(span) = element.span else { continue };
        if element.text.is_empty() || element.span_matches(sentence) {
            continue;
        }
        if let Some(at) = nearest_occurrence(sentence, &element.text, span.start) {
            debug!(text = %element.text, from = span.start, to = at, "re-anchored element");
            element.span = Some(Span::at(at, &element.text));
            fixed += 1;
        }
    }
    fixed
}

/// Splits a V whose text is not contiguous in the sentence into one V per word.
///
/// Each word lands at its occurrence nearest the original start; words that
/// already exist as surface V elements are not duplicated. Returns whether a
/// split happened.
pub fn split_noncontiguous_v(sentence: &str, clause: &mut Clause, index: usize) -> bool {
    let Some(element) = clause.elements.get(index) else { return false };
    let Some(span) = element.span else { return false };
    if element.role != Role::V || sentence.contains(element.text.as_str()) {
        return false;
    }
    let words: Vec<String> = element.words().map(str::to_string).collect();
    if words.len() <= 1 {
        return false;
    }

    clause.remove_element(index);
    let mut insert_at = index;
    for word in words {
        let lower = word.to_lowercase();
        let exists = clause
            .elements
            .iter()
            .any(|e| e.role == Role::V && e.is_real() && e.text.to_lowercase() == lower);
        if exists {
            continue;
        }
        let Some(at) = nearest_occurrence(sentence, &word, span.start) else { continue };
        clause.insert_element(insert_at, ClauseElement::new(Role::V, word.as_str(), at, at + word.len()));
        insert_at += 1;
    }
    true
}

fn split_all_noncontiguous(sentence: &str, clause: &mut Clause) -> usize {
    let mut fixed = 0;
    for i in (0..clause.elements.len()).rev() {
        if split_noncontiguous_v(sentence, clause, i) {
            fixed += 1;
        }
    }
    fixed
}

/// Index of the element to drop when `a` and `b` duplicate each other, if any.
fn redundant_between(sentence: &str, clause: &Clause, i: usize, j: usize) -> Option<usize> {
    let a = &clause.elements[i];
    let b = &clause.elements[j];
    let (sa, sb) = (a.span?, b.span?);

    if a.text == b.text && sa.start == sb.start && a.role == b.role {
        return Some(i);
    }
    if a.role == Role::V && b.role == Role::V {
        let a_contains_b = sa.contains(&sb) && a.text.contains(b.text.as_str()) && a.text != b.text;
        let b_contains_a = sb.contains(&sa) && b.text.contains(a.text.as_str()) && b.text != a.text;
        let larger = if a_contains_b {
            Some(i)
        } else if b_contains_a {
            Some(j)
        } else {
            None
        }?;
        if !sentence.contains(clause.elements[larger].text.as_str()) {
            return Some(larger);
        }
    }
    None
}

fn deduplicate(sentence: &str, clause: &mut Clause) -> usize {
    let mut fixed = 0;
    let mut i = clause.elements.len();
    while i > 1 {
        i -= 1;
        if i >= clause.elements.len() {
            continue;
        }
        for j in 0..i {
            if let Some(drop) = redundant_between(sentence, clause, i, j) {
                clause.remove_element(drop);
                fixed += 1;
                if drop < i {
                    i -= 1;
                }
                break;
            }
        }
    }
    fixed
}

fn enforce_chain_roles(clause: &mut Clause, vchains: &VChainResult) -> usize {
    let mut fixed = 0;
    for chain in &vchains.chains {
        for word in &chain.words {
            let lower = word.to_lowercase();
            for element in &mut clause.elements {
                let Some(span) = element.span else { continue };
                if element.role == Role::V
                    || element.text.trim().to_lowercase() != lower
                    || !chain.span.contains(&span)
                {
                    continue;
                }
                debug!(text = %element.text, from = %element.role, "chain word relabelled V");
                element.role = Role::V;
                fixed += 1;
            }
        }
    }
    fixed
}

/// Splits non-contiguous V elements, removes duplicates and relabels chain words as V.
pub fn enforce_vchains(sentence: &str, clause: &mut Clause, vchains: &VChainResult) -> usize {
    split_all_noncontiguous(sentence, clause)
        + deduplicate(sentence, clause)
        + enforce_chain_roles(clause, vchains)
}

fn gap(from: usize, to: usize) -> Option<usize> {
    to.checked_sub(from)
}

/// Marks the halves of discontinuous chains and the material between them.
///
/// The first V of a parenthetically split chain gets an insertion arrow to
/// the second; modifiers between them become `Insert`. Independently, any
/// modifier wedged between two V elements (at most two characters either
/// side) becomes `Insert`.
pub fn mark_parenthetical_insertions(clause: &mut Clause, vchains: &VChainResult) -> usize {
    let mut marked = 0;

    for chain in vchains.chains.iter().filter(|c| c.is_discontinuous() && c.words.len() >= 2) {
        let (Some(first), Some(last)) = (chain.first_word(), chain.last_word()) else { continue };
        let (first, last) = (first.to_lowercase(), last.to_lowercase());

        let mut v1: Option<usize> = None;
        let mut v2: Option<usize> = None;
        for (i, e) in clause.elements.iter().enumerate() {
            if e.role != Role::V || e.is_elided() {
                continue;
            }
            let text = e.text.to_lowercase();
            if v1.is_none() && text == first {
                v1 = Some(i);
            }
            if v2.is_none() && text == last && v1.is_some_and(|v1| i > v1) {
                v2 = Some(i);
            }
        }

        if let (Some(v1), Some(v2)) = (v1, v2) {
            clause.elements[v1].arrow_type = Some(ArrowType::Insertion);
            clause.elements[v1].modifies_index = Some(v2);
            for e in &mut clause.elements[v1 + 1..v2] {
                if e.role == Role::M {
                    e.role = Role::Insert;
                }
            }
            marked += 1;
        }
    }

    let v_spans: Vec<Span> = clause
        .elements
        .iter()
        .filter(|e| e.role == Role::V)
        .filter_map(|e| e.span)
        .collect();
    for e in &mut clause.elements {
        if e.role != Role::M {
            continue;
        }
        let Some(m) = e.span else { continue };
        let v_before = v_spans.iter().any(|v| gap(v.end, m.start).is_some_and(|d| d <= 2));
        let v_after = v_spans.iter().any(|v| gap(m.end, v.start).is_some_and(|d| d <= 2));
        if v_before && v_after {
            e.role = Role::Insert;
            marked += 1;
        }
    }

    marked
}

/// Stamps chain ids on the V elements of each chain, plus a `Comp` directly after the last one.
pub fn stamp_vchain_ids(clause: &mut Clause, vchains: &VChainResult) -> usize {
    let mut stamped = 0;

    for chain in &vchains.chains {
        let mut last_v: Option<usize> = None;
        for word in &chain.words {
            let lower = word.to_lowercase();
            for (i, e) in clause.elements.iter_mut().enumerate() {
                let Some(span) = e.span else { continue };
                if e.role != Role::V || e.text.trim().to_lowercase() != lower || !chain.span.contains(&span) {
                    continue;
                }
                e.v_chain_id = Some(chain.id);
                last_v = last_v.max(Some(i));
                stamped += 1;
            }
        }

        if let Some(next) = last_v.and_then(|i| clause.elements.get_mut(i + 1)) {
            if next.role == Role::Comp {
                next.v_chain_id = Some(chain.id);
                stamped += 1;
            }
        }
    }

    stamped
}
