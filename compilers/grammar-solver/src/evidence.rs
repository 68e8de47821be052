//! Syntax-test evidence: the validator's and classifiers' findings as named pass/fail/warn records.

use grammar_lexicon::is_aux;
use grammar_parser::{classify_to_infinitive, detect_gap, pattern_mismatch, validate_clause_type};
use grammar_protocol::{
    Clause, ClauseId, ClauseSet, ClauseType, PosToken, Role, SyntaxTestEvidence, TestName,
    TestStatus,
};

use crate::graph::ClauseGraph;

pub const RULE_AUX_IN_V: &str = "INV_06_AUX_IN_V";
pub const RULE_FINITE_V: &str = "INV_01_FINITE_V";
pub const RULE_SPAN_MATCH: &str = "INV_09_SPAN_MATCH";
pub const RULE_M_TARGET: &str = "INV_14_M_TARGET";
pub const RULE_EXPANDS_TO: &str = "INV_08_EXPANDS_TO";
pub const RULE_PATTERN: &str = "INV_07_PATTERN";
pub const RULE_REL_GAP: &str = "INV_11_REL_GAP";
pub const RULE_NOUN_COMPLETE: &str = "INV_12_NOUN_COMPLETE";
pub const RULE_TO_INF: &str = "TO_INF_FUNC";

const CONFIDENCE_STRUCTURAL: f64 = 1.0;
const CONFIDENCE_UNLINKED_M: f64 = 0.7;
const CONFIDENCE_PATTERN_FAIL: f64 = 0.9;
const CONFIDENCE_TO_INF: f64 = 0.8;

struct Evidence {
    test: TestName,
    rule: &'static str,
}

impl Evidence {
    fn record(
        &self,
        status: TestStatus,
        clause_id: &ClauseId,
        element_index: Option<usize>,
        message: String,
        evidence_text: Option<String>,
        confidence: f64,
    ) -> SyntaxTestEvidence {
        SyntaxTestEvidence {
            test_name: self.test,
            status,
            clause_id: clause_id.clone(),
            element_index,
            message,
            evidence_text,
            rule_id: self.rule.to_string(),
            confidence,
        }
    }

    fn pass(&self, clause_id: &ClauseId, message: impl Into<String>) -> SyntaxTestEvidence {
        self.record(TestStatus::Pass, clause_id, None, message.into(), None, CONFIDENCE_STRUCTURAL)
    }
}

const AUX_IN_V: Evidence = Evidence { test: TestName::AuxInVChain, rule: RULE_AUX_IN_V };
const FINITE_V: Evidence = Evidence { test: TestName::FiniteVerbExists, rule: RULE_FINITE_V };
const SPAN_MATCH: Evidence = Evidence { test: TestName::SpanExactMatch, rule: RULE_SPAN_MATCH };
const M_TARGET: Evidence = Evidence { test: TestName::MHasTarget, rule: RULE_M_TARGET };
const EXPANDS_TO: Evidence = Evidence { test: TestName::ExpandsToIntegrity, rule: RULE_EXPANDS_TO };
const PATTERN: Evidence = Evidence { test: TestName::PatternConsistency, rule: RULE_PATTERN };
const REL_GAP: Evidence = Evidence { test: TestName::RelativeGap, rule: RULE_REL_GAP };
const NOUN_COMPLETE: Evidence = Evidence { test: TestName::NounClauseCompleteness, rule: RULE_NOUN_COMPLETE };
const TO_INF: Evidence = Evidence { test: TestName::ToInfFunction, rule: RULE_TO_INF };

fn aux_in_v_chain(clause: &Clause) -> Vec<SyntaxTestEvidence> {
    let fails: Vec<_> = clause
        .elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.role != Role::V)
        .filter(|(_, e)| {
            let mut words = e.words();
            matches!((words.next(), words.next()), (Some(w), None) if is_aux(w))
        })
        .map(|(i, e)| {
            AUX_IN_V.record(
                TestStatus::Fail,
                &clause.id,
                Some(i),
                format!("AUX \"{}\" is not in V role (found: {})", e.text, e.role),
                Some(e.text.clone()),
                CONFIDENCE_STRUCTURAL,
            )
        })
        .collect();
    if fails.is_empty() {
        vec![AUX_IN_V.pass(&clause.id, "All auxiliary verbs are correctly in V elements")]
    } else {
        fails
    }
}

fn finite_verb_exists(clause: &Clause) -> SyntaxTestEvidence {
    if !clause.has_role(Role::V) && clause.real_elements().next().is_some() {
        FINITE_V.record(
            TestStatus::Fail,
            &clause.id,
            None,
            "No finite verb found in clause".to_string(),
            None,
            CONFIDENCE_STRUCTURAL,
        )
    } else {
        FINITE_V.pass(&clause.id, "Finite verb present")
    }
}

fn span_exact_match(sentence: &str, clause: &Clause) -> Vec<SyntaxTestEvidence> {
    let fails: Vec<_> = clause
        .real_elements()
        .filter(|(_, e)| !e.span_matches(sentence))
        .filter_map(|(i, e)| {
            let span = e.span?;
            let slice = span.slice(sentence).unwrap_or("");
            Some(SPAN_MATCH.record(
                TestStatus::Fail,
                &clause.id,
                Some(i),
                format!("Span mismatch: expected \"{}\", got \"{slice}\"", e.text),
                Some(format!("[{},{}) = \"{slice}\"", span.start, span.end)),
                CONFIDENCE_STRUCTURAL,
            ))
        })
        .collect();
    if fails.is_empty() {
        vec![SPAN_MATCH.pass(&clause.id, "All spans match text")]
    } else {
        fails
    }
}

fn m_has_target(clause: &Clause) -> Vec<SyntaxTestEvidence> {
    let warns: Vec<_> = clause
        .real_elements()
        .filter(|(_, e)| e.role == Role::M && e.modifies_index.is_none())
        .map(|(i, e)| {
            M_TARGET.record(
                TestStatus::Warn,
                &clause.id,
                Some(i),
                format!("M element \"{}\" has no modifiesIndex", e.text),
                Some(e.text.clone()),
                CONFIDENCE_UNLINKED_M,
            )
        })
        .collect();
    if warns.is_empty() {
        vec![M_TARGET.pass(&clause.id, "All M elements have targets")]
    } else {
        warns
    }
}

fn expands_to_integrity(clauses: &ClauseSet) -> Vec<SyntaxTestEvidence> {
    let mut fails = Vec::new();
    for clause in clauses.iter() {
        for (i, e) in clause.elements.iter().enumerate() {
            let Some(target) = e.expands_to.as_ref() else { continue };
            if clauses.is_sub_clause(target.as_str()) {
                continue;
            }
            fails.push(EXPANDS_TO.record(
                TestStatus::Fail,
                &clause.id,
                Some(i),
                format!("expandsTo \"{target}\" not found in subClauses"),
                Some(format!("{} → {target}", e.text)),
                CONFIDENCE_STRUCTURAL,
            ));
        }
    }
    if fails.is_empty() {
        vec![EXPANDS_TO.pass(&ClauseId::main(), "All expandsTo references are valid")]
    } else {
        fails
    }
}

fn pattern_consistency(clause: &Clause) -> Option<SyntaxTestEvidence> {
    let pattern = clause.pattern?;
    Some(match pattern_mismatch(clause) {
        None => PATTERN.pass(&clause.id, format!("Pattern {} is consistent with roles", pattern.number())),
        Some(msg) => PATTERN.record(TestStatus::Fail, &clause.id, None, msg.to_string(), None, CONFIDENCE_PATTERN_FAIL),
    })
}

fn relative_gap(clause: &Clause) -> SyntaxTestEvidence {
    let gap = detect_gap(&clause.elements);
    match gap.gap_role.filter(|_| gap.has_gap) {
        Some(role) => REL_GAP.record(
            TestStatus::Pass,
            &clause.id,
            None,
            format!("Relative clause has gap at {role}"),
            Some(format!("gap: {role}")),
            gap.confidence,
        ),
        None => REL_GAP.record(
            TestStatus::Warn,
            &clause.id,
            None,
            "Relative clause has no identifiable gap, may be a noun clause".to_string(),
            None,
            gap.confidence,
        ),
    }
}

fn noun_clause_completeness(clause: &Clause, parent_verb: Option<&str>) -> SyntaxTestEvidence {
    let gap = detect_gap(&clause.elements);
    match gap.gap_role.filter(|_| gap.has_gap) {
        None => NOUN_COMPLETE.record(
            TestStatus::Pass,
            &clause.id,
            None,
            "Noun clause is complete (no gap)".to_string(),
            None,
            gap.confidence,
        ),
        Some(role) => {
            let check = validate_clause_type(ClauseType::Noun, &clause.elements, parent_verb);
            let reason = check.reason.unwrap_or_else(|| "may be a relative clause".to_string());
            NOUN_COMPLETE.record(
                TestStatus::Warn,
                &clause.id,
                None,
                format!("Noun clause has gap at {role}: {reason}"),
                Some(format!("gap: {role}")),
                gap.confidence,
            )
        }
    }
}

fn to_inf_function(clause: &Clause, tokens: &[PosToken]) -> Vec<SyntaxTestEvidence> {
    clause
        .elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_to_infinitive())
        .map(|(i, e)| {
            let function = classify_to_infinitive(i, &clause.elements, tokens);
            TO_INF.record(
                TestStatus::Pass,
                &clause.id,
                Some(i),
                format!("to-infinitive \"{}\" classified as {function}", e.text),
                Some(format!("{} → {function}", e.text)),
                CONFIDENCE_TO_INF,
            )
        })
        .collect()
}

/// Runs every syntax test over the clause set. Read-only.
pub fn run_syntax_tests(sentence: &str, clauses: &ClauseSet, tokens: &[PosToken]) -> Vec<SyntaxTestEvidence> {
    let mut out = Vec::new();

    for clause in clauses.iter() {
        out.extend(aux_in_v_chain(clause));
        out.push(finite_verb_exists(clause));
        out.extend(span_exact_match(sentence, clause));
        out.extend(m_has_target(clause));
    }

    out.extend(expands_to_integrity(clauses));
    out.extend(clauses.iter().filter_map(pattern_consistency));

    let graph = ClauseGraph::build(clauses);
    for clause in clauses.subs() {
        match clause.clause_type {
            Some(ClauseType::Relative) => out.push(relative_gap(clause)),
            Some(ClauseType::Noun) => {
                let parent_verb = graph
                    .parent_of(&clause.id)
                    .and_then(|(parent, _)| clauses.get(parent.as_str()))
                    .and_then(Clause::main_verb_word);
                out.push(noun_clause_completeness(clause, parent_verb.as_deref()));
            }
            _ => {}
        }
    }

    for clause in clauses.iter() {
        out.extend(to_inf_function(clause, tokens));
    }

    out
}
