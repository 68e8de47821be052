//! Gap detection and clause-type cross-checks for sub-clauses.
//!
//! Relative clauses are missing one role (the one the antecedent fills);
//! noun clauses are complete. The detector below only looks at which roles
//! are present and whether they are elided.

use tracing::debug;

use grammar_lexicon::{is_bridge_verb, is_linking, matches_verb_set, VerbClass};
use grammar_protocol::{Clause, ClauseElement, ClauseSet, ClauseType, GapInfo, GapRole, Role};

/// Confidence when the clause has no V at all, or the main verb is not a bridge verb.
pub const CONFIDENCE_NO_VERB: f64 = 0.3;
/// Bridge verb whose complement clause cannot be found.
pub const CONFIDENCE_UNLINKED_BRIDGE: f64 = 0.4;
/// S present with neither Od nor C: the verb may simply be intransitive.
pub const CONFIDENCE_WEAK_OBJECT_GAP: f64 = 0.5;
/// Threshold above which a gap verdict contradicts an asserted clause type.
pub const CONFIDENCE_DECISIVE: f64 = 0.7;
pub const CONFIDENCE_ABSENT_SUBJECT: f64 = 0.8;
pub const CONFIDENCE_COMPLETE: f64 = 0.8;
pub const CONFIDENCE_ELIDED: f64 = 0.9;
/// Cap applied to a gap found through a bridge verb.
pub const CONFIDENCE_LONG_DISTANCE_CAP: f64 = 0.85;

/// Finds the role a clause is missing, if any.
///
/// Elided elements count as present-but-empty, which is the strongest
/// signal; a role that is absent altogether is weaker.
pub fn detect_gap(elements: &[ClauseElement]) -> GapInfo {
    let has = |role: Role| elements.iter().any(|e| e.role == role);
    let has_real = |role: Role| elements.iter().any(|e| e.role == role && e.is_real());

    if !has(Role::V) {
        return GapInfo::none(CONFIDENCE_NO_VERB);
    }
    if has(Role::S) && !has_real(Role::S) {
        return GapInfo::local(GapRole::S, CONFIDENCE_ELIDED);
    }
    if !has(Role::S) {
        return GapInfo::local(GapRole::S, CONFIDENCE_ABSENT_SUBJECT);
    }
    if has(Role::Od) && !has_real(Role::Od) {
        return GapInfo::local(GapRole::Od, CONFIDENCE_ELIDED);
    }
    if !has(Role::Od) && !has(Role::C) {
        return GapInfo::local(GapRole::Od, CONFIDENCE_WEAK_OBJECT_GAP);
    }
    GapInfo::none(CONFIDENCE_COMPLETE)
}

/// Outcome of cross-checking an asserted clause type against its gap.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseTypeCheck {
    pub valid: bool,
    pub suggested: Option<ClauseType>,
    pub reason: Option<String>,
}

impl ClauseTypeCheck {
    fn ok() -> Self {
        Self { valid: true, suggested: None, reason: None }
    }

    fn suggest(suggested: ClauseType, reason: String) -> Self {
        Self { valid: false, suggested: Some(suggested), reason: Some(reason) }
    }
}

/// A relative clause must have a gap and a noun clause must not.
///
/// Never changes the type; it only reports a suggestion.
pub fn validate_clause_type(
    clause_type: ClauseType,
    elements: &[ClauseElement],
    parent_verb: Option<&str>,
) -> ClauseTypeCheck {
    let gap = detect_gap(elements);

    match clause_type {
        ClauseType::Relative if !gap.has_gap && gap.confidence >= CONFIDENCE_DECISIVE => {
            let reason = match parent_verb {
                Some(verb) if matches_verb_set(verb, VerbClass::THAT_COMPLEMENT) => format!(
                    "Relative clause has no gap but parent verb \"{verb}\" takes that-complement"
                ),
                _ => "Relative clause has no gap, likely a noun clause".to_string(),
            };
            ClauseTypeCheck::suggest(ClauseType::Noun, reason)
        }
        ClauseType::Noun if gap.has_gap && gap.confidence >= CONFIDENCE_DECISIVE => {
            let role = gap.gap_role.map(GapRole::as_str).unwrap_or("?");
            ClauseTypeCheck::suggest(
                ClauseType::Relative,
                format!("Noun clause has gap at {role}, likely a relative clause"),
            )
        }
        _ => ClauseTypeCheck::ok(),
    }
}

/// Role played by "what"/"whatever" inside its own clause.
pub fn infer_what_role(elements: &[ClauseElement]) -> Option<GapRole> {
    let what = elements.iter().position(|e| {
        let lower = e.text.to_lowercase();
        lower == "what" || lower == "whatever"
    })?;
    let after = &elements[what + 1..];

    let Some(first) = after.first() else {
        return Some(GapRole::S);
    };
    match first.role {
        Role::V => Some(GapRole::S),
        Role::S => {
            let linking = after
                .iter()
                .find(|e| e.role == Role::V)
                .and_then(ClauseElement::last_word_lower)
                .is_some_and(|w| is_linking(&w));
            Some(if linking { GapRole::C } else { GapRole::Od })
        }
        _ => Some(GapRole::Od),
    }
}

/// Looks for a gap inside the complement clause of a bridge verb.
///
/// `the criteria [it had claimed [__ were designed ...]]`: the relative
/// clause is complete, the gap is the subject of the embedded clause.
pub fn detect_long_distance_extraction(relative: &Clause, clauses: &ClauseSet) -> GapInfo {
    let Some(main_verb) = relative.main_verb_word() else {
        return GapInfo::none(CONFIDENCE_NO_VERB);
    };
    if !is_bridge_verb(&main_verb) {
        return GapInfo::none(CONFIDENCE_NO_VERB);
    }

    let complement = relative
        .elements
        .iter()
        .find_map(|e| e.expands_to.as_ref())
        .and_then(|id| clauses.subs().iter().find(|c| c.id == *id));
    let Some(complement) = complement else {
        return GapInfo::none(CONFIDENCE_UNLINKED_BRIDGE);
    };

    let inner = detect_gap(&complement.elements);
    if !inner.has_gap {
        return GapInfo::none(CONFIDENCE_WEAK_OBJECT_GAP);
    }
    GapInfo {
        has_gap: true,
        gap_role: inner.gap_role,
        confidence: inner.confidence.min(CONFIDENCE_LONG_DISTANCE_CAP),
        is_long_distance: true,
        bridge_verb: Some(main_verb),
        gap_clause_id: Some(complement.id.clone()),
    }
}

fn role_label(role: GapRole) -> &'static str {
    match role {
        GapRole::S => "主語",
        GapRole::Od => "目的語",
        GapRole::C => "補語",
    }
}

/// Rewrites the type label of every relative clause whose gap sits behind a bridge verb.
pub fn fix_long_distance_labels(clauses: &mut ClauseSet) -> usize {
    let labels: Vec<(usize, String)> = clauses
        .iter()
        .enumerate()
        .filter(|(_, c)| c.clause_type == Some(ClauseType::Relative))
        .filter_map(|(i, c)| {
            let gap = detect_long_distance_extraction(c, clauses);
            let role = gap.gap_role.filter(|_| gap.is_long_distance)?;
            let bridge = gap.bridge_verb?;
            Some((
                i,
                format!(
                    "関係詞節（補文内{}の取り出し：long-distance extraction via \"{bridge}\")",
                    role_label(role)
                ),
            ))
        })
        .collect();

    let fixed = labels.len();
    for (i, label) in labels {
        if let Some(clause) = clauses.iter_mut().nth(i) {
            debug!(clause = %clause.id, label = %label, "long-distance extraction");
            clause.type_label = Some(label);
        }
    }
    fixed
}
