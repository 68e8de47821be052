//! Sentence-pattern determination (SV .. SVOC) and the role fixes that precede it.

use tracing::debug;

use grammar_lexicon::{is_be_form, is_copular_adjective, is_linking, lemma, matches_verb_set, VerbClass};
use grammar_protocol::{
    ArrowType, Clause, ClauseElement, Role, SentencePattern, VChain, VChainResult, Voice,
};

/// Pattern chosen for a clause, plus the object to relabel as complement, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternDecision {
    pub pattern: SentencePattern,
    pub od_to_c: Option<usize>,
}

impl PatternDecision {
    fn plain(pattern: SentencePattern) -> Self {
        Self { pattern, od_to_c: None }
    }
}

/// Main verb of a clause as seen by the pattern rules.
struct Predicate {
    word: String,
    lemma: String,
    passive: bool,
}

impl Predicate {
    fn of<'a>(elements: impl Iterator<Item = &'a ClauseElement>, chain: Option<&VChain>) -> Self {
        let words: Vec<String> = elements
            .filter(|e| e.role == Role::V)
            .flat_map(|e| e.words())
            .map(str::to_lowercase)
            .collect();
        let word = words.last().cloned().unwrap_or_default();
        let lemma = chain.map_or_else(|| lemma(&word), |c| c.main_verb_lemma.clone());
        let passive = match chain {
            Some(chain) => chain.voice == Voice::Passive,
            None => words.len() >= 2 && words.iter().any(|w| is_be_form(w)),
        };
        Self { word, lemma, passive }
    }

    fn is(&self, class: VerbClass) -> bool {
        matches_verb_set(&self.word, class) || matches_verb_set(&self.lemma, class)
    }
}

fn to_infinitive_with(elements: &[ClauseElement], roles: &[Role]) -> Option<usize> {
    elements
        .iter()
        .position(|e| roles.contains(&e.role) && e.is_to_infinitive())
}

/// Passive purpose-taking verb ("were built to last"): the to-infinitive C
/// is a purpose modifier. Only verbs on the allowlist qualify.
pub fn fix_passive_purpose(elements: &mut [ClauseElement], chain: Option<&VChain>) -> bool {
    let verb = Predicate::of(elements.iter(), chain);
    if !verb.passive || is_linking(&verb.word) || !matches_verb_set(&verb.word, VerbClass::PASSIVE_PURPOSE) {
        return false;
    }
    let Some(idx) = to_infinitive_with(elements, &[Role::C]) else {
        return false;
    };
    let element = &mut elements[idx];
    element.role = Role::M;
    if element.arrow_type == Some(ArrowType::Complement) {
        element.arrow_type = Some(ArrowType::Modifies);
    }
    debug!(text = %element.text, "passive purpose: C -> M");
    true
}

/// Aspectual verbs are intransitive; their to-infinitive is a verbal complement.
pub fn fix_aspectual_comp(elements: &mut [ClauseElement], chain: Option<&VChain>) -> bool {
    let verb = Predicate::of(elements.iter(), chain);
    if !verb.is(VerbClass::ASPECTUAL) {
        return false;
    }
    let Some(idx) = to_infinitive_with(elements, &[Role::C, Role::Od]) else {
        return false;
    };
    elements[idx].role = Role::Comp;
    debug!(text = %elements[idx].text, "aspectual: -> Comp");
    true
}

/// Raising verbs, and causative or copular-adjective passives, take a to-infinitive `Comp`.
pub fn fix_raising_comp(elements: &mut [ClauseElement], chain: Option<&VChain>) -> bool {
    let verb = Predicate::of(elements.iter(), chain);
    let Some(idx) = to_infinitive_with(elements, &[Role::C]) else {
        return false;
    };
    let applies = verb.is(VerbClass::RAISING)
        || (verb.passive
            && (matches_verb_set(&verb.word, VerbClass::CAUSATIVE_PASSIVE)
                || matches_verb_set(&verb.word, VerbClass::COPULAR_PASSIVE_ADJ)));
    if applies {
        elements[idx].role = Role::Comp;
        debug!(text = %elements[idx].text, verb = %verb.word, "raising/passive: C -> Comp");
    }
    applies
}

/// Picks a pattern from the surface roles. Elided elements take no part.
pub fn determine_pattern(elements: &[ClauseElement], chain: Option<&VChain>) -> PatternDecision {
    let surface = || elements.iter().filter(|e| e.is_real());
    let has = |role: Role| surface().any(|e| e.role == role);
    let (has_od, has_oi, has_c, has_comp) = (has(Role::Od), has(Role::Oi), has(Role::C), has(Role::Comp));

    let verb = Predicate::of(surface(), chain);
    let aspectual = verb.is(VerbClass::ASPECTUAL);
    let effective_c = has_c || (has_comp && !aspectual);
    let to_inf_arg = surface().any(|e| matches!(e.role, Role::C | Role::Od | Role::Comp) && e.is_to_infinitive());
    let linking = is_linking(&verb.word) && !(aspectual && to_inf_arg);

    if linking && !has_c && has_od {
        let copular = elements.iter().position(|e| e.role == Role::Od && e.is_real()).filter(|&i| {
            elements[i]
                .first_word_lower()
                .is_some_and(|w| is_copular_adjective(&w))
        });
        if let Some(idx) = copular {
            return PatternDecision { pattern: SentencePattern::Svc, od_to_c: Some(idx) };
        }
    }

    use SentencePattern::*;
    let pattern = if linking && effective_c {
        Svc
    } else if linking && !has_od {
        Sv
    } else if verb.is(VerbClass::DITRANSITIVE) && has_oi && has_od {
        Svoo
    } else if verb.is(VerbClass::COMPLEX_TRANSITIVE) && has_od && effective_c {
        Svoc
    } else if has_oi && has_od {
        Svoo
    } else if has_od && effective_c {
        Svoc
    } else if has_od {
        Svo
    } else if effective_c {
        Svc
    } else {
        Sv
    };
    PatternDecision::plain(pattern)
}

/// The chain a clause's predicate belongs to: by stamped id, else by position.
pub fn chain_for_clause<'v>(clause: &Clause, vchains: &'v VChainResult) -> Option<&'v VChain> {
    let verbs = || clause.elements.iter().filter(|e| e.role == Role::V);
    verbs()
        .find_map(|e| e.v_chain_id.and_then(|id| vchains.chain(id)))
        .or_else(|| verbs().find_map(|e| e.start().and_then(|at| vchains.chain_at(at))))
}

/// Runs the three role fixes, decides the pattern and writes pattern and label onto the clause.
pub fn apply_pattern_fix(clause: &mut Clause, chain: Option<&VChain>) -> SentencePattern {
    fix_passive_purpose(&mut clause.elements, chain);
    fix_aspectual_comp(&mut clause.elements, chain);
    fix_raising_comp(&mut clause.elements, chain);

    let decision = determine_pattern(&clause.elements, chain);
    if let Some(idx) = decision.od_to_c {
        let element = &mut clause.elements[idx];
        element.role = Role::C;
        element.arrow_type = Some(ArrowType::Complement);
    }

    let comp_only = clause.has_role(Role::Comp) && !clause.has_role(Role::C);
    let label = decision
        .pattern
        .comp_label()
        .filter(|_| comp_only)
        .unwrap_or(decision.pattern.label());
    clause.set_pattern(decision.pattern, label);
    decision.pattern
}

/// Describes how a declared pattern contradicts the roles present, if it does.
/// `Comp` counts as `C`.
pub fn pattern_mismatch(clause: &Clause) -> Option<&'static str> {
    let pattern = clause.pattern?;
    let c_or_comp = clause.has_role(Role::C) || clause.has_role(Role::Comp);
    match pattern {
        SentencePattern::Svc if !c_or_comp && clause.has_role(Role::V) => {
            Some("Pattern 2 (SVC) but no C or Comp found")
        }
        SentencePattern::Svoo if !clause.has_role(Role::Oi) || !clause.has_role(Role::Od) => {
            Some("Pattern 4 (SVOO) but missing Oi or Od")
        }
        SentencePattern::Svoc if !clause.has_role(Role::Od) || !c_or_comp => {
            Some("Pattern 5 (SVOC) but missing Od or C/Comp")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(role: Role, text: &str, start: usize) -> ClauseElement {
        ClauseElement::new(role, text, start, start + text.len())
    }

    #[test]
    fn designed_to_is_sv_comp() {
        let mut clause = Clause::main(vec![
            el(Role::S, "criteria", 0),
            el(Role::V, "were designed", 9),
            el(Role::C, "to protect dissent", 23),
        ]);
        assert_eq!(apply_pattern_fix(&mut clause, None), SentencePattern::Svc);
        assert_eq!(clause.elements[2].role, Role::Comp);
        assert_eq!(clause.pattern_label.as_deref(), Some("第2文型 (SV+Comp)"));
    }

    #[test]
    fn passive_purpose_allowlist() {
        let mut clause = Clause::main(vec![
            el(Role::S, "walls", 0),
            el(Role::V, "were built", 6),
            el(Role::C, "to last", 17),
        ]);
        clause.elements[2].arrow_type = Some(ArrowType::Complement);
        assert_eq!(apply_pattern_fix(&mut clause, None), SentencePattern::Sv);
        assert_eq!(clause.elements[2].role, Role::M);
        assert_eq!(clause.elements[2].arrow_type, Some(ArrowType::Modifies));

        // causative passive keeps a verbal complement
        let mut clause = Clause::main(vec![
            el(Role::S, "he", 0),
            el(Role::V, "was forced", 3),
            el(Role::C, "to leave", 14),
        ]);
        apply_pattern_fix(&mut clause, None);
        assert_eq!(clause.elements[2].role, Role::Comp);
    }

    #[test]
    fn aspectual_is_never_linking() {
        let mut clause = Clause::main(vec![
            el(Role::S, "it", 0),
            el(Role::V, "had come", 3),
            el(Role::Od, "to exclude voices", 12),
        ]);
        assert_eq!(apply_pattern_fix(&mut clause, None), SentencePattern::Sv);
        assert_eq!(clause.elements[2].role, Role::Comp);
        assert_eq!(clause.pattern_label.as_deref(), Some("第1文型 (SV)"));
    }

    #[test]
    fn copular_object_becomes_complement() {
        let mut clause = Clause::main(vec![
            el(Role::S, "he", 0),
            el(Role::V, "is", 3),
            el(Role::Od, "likely to win", 6),
        ]);
        assert_eq!(apply_pattern_fix(&mut clause, None), SentencePattern::Svc);
        assert_eq!(clause.elements[2].role, Role::C);
        assert_eq!(clause.elements[2].arrow_type, Some(ArrowType::Complement));
        assert_eq!(clause.pattern_label.as_deref(), Some("第2文型 (SVC)"));
    }

    #[test]
    fn structural_fallbacks() {
        let decide = |elements: Vec<ClauseElement>| determine_pattern(&elements, None).pattern;
        assert_eq!(
            decide(vec![el(Role::S, "she", 0), el(Role::V, "gave", 4), el(Role::Oi, "him", 9), el(Role::Od, "a book", 13)]),
            SentencePattern::Svoo
        );
        assert_eq!(
            decide(vec![el(Role::S, "they", 0), el(Role::V, "painted", 5), el(Role::Od, "it", 13), el(Role::C, "red", 16)]),
            SentencePattern::Svoc
        );
        assert_eq!(
            decide(vec![el(Role::S, "she", 0), el(Role::V, "bought", 4), el(Role::Od, "bread", 11)]),
            SentencePattern::Svo
        );
        assert_eq!(decide(vec![el(Role::S, "she", 0), el(Role::V, "left", 4)]), SentencePattern::Sv);
    }

    #[test]
    fn elided_object_does_not_count() {
        let elements = vec![
            ClauseElement::elided(Role::Od, "(that)"),
            el(Role::S, "she", 10),
            el(Role::V, "bought", 14),
        ];
        assert_eq!(determine_pattern(&elements, None).pattern, SentencePattern::Sv);
    }

    #[test]
    fn mismatch_messages() {
        let mut clause = Clause::main(vec![el(Role::S, "she", 0), el(Role::V, "left", 4)]);
        assert_eq!(pattern_mismatch(&clause), None);
        clause.set_pattern(SentencePattern::Svoo, SentencePattern::Svoo.label());
        assert_eq!(pattern_mismatch(&clause), Some("Pattern 4 (SVOO) but missing Oi or Od"));
        clause.elements.push(el(Role::Comp, "to go", 9));
        clause.set_pattern(SentencePattern::Svc, SentencePattern::Svc.label());
        assert_eq!(pattern_mismatch(&clause), None);
    }
}
