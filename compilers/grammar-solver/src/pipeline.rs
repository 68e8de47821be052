//! End-to-end certification of one annotated sentence.

use tracing::{debug, info, info_span};

use grammar_parser::{
    enforce_vchains, fix_element_indices, fix_long_distance_labels, mark_parenthetical_insertions,
    stamp_vchain_ids, ChainResolver, RuleTokenizer, Tokenize,
};
use grammar_protocol::{ClauseSet, PosToken, RepairLog, SyntaxTestEvidence, ValidationReport, VChainResult};

use crate::config::EngineConfig;
use crate::evidence::run_syntax_tests;
use crate::repair::repair_loop;

/// Everything produced for one sentence.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub clauses: ClauseSet,
    pub tokens: Vec<PosToken>,
    pub vchains: VChainResult,
    pub report: ValidationReport,
    pub log: RepairLog,
    pub evidence: Vec<SyntaxTestEvidence>,
}

impl Analysis {
    pub fn is_valid(&self) -> bool {
        self.report.valid
    }
}

/// Runs the deterministic stages over a draft annotation.
///
/// Tokens and chains are computed when not supplied. Enforcement runs per
/// clause before the repair loop; long-distance labels and syntax tests run
/// on the repaired set.
pub fn analyze(
    sentence: &str,
    mut clauses: ClauseSet,
    tokens: Option<Vec<PosToken>>,
    vchains: Option<VChainResult>,
    config: &EngineConfig,
) -> Analysis {
    let span = info_span!("analyze", clauses = clauses.len());
    let _enter = span.enter();

    let tokens = tokens.unwrap_or_else(|| RuleTokenizer::default().tokenize(sentence));
    let vchains = vchains.unwrap_or_else(|| {
        ChainResolver::new()
            .with_parenthetical_limit(config.max_parenthetical_tokens)
            .resolve(&tokens)
    });
    debug!(tokens = tokens.len(), chains = vchains.chains.len(), inversions = vchains.inversions.len(), "resolved");

    for clause in clauses.iter_mut() {
        let moved = fix_element_indices(sentence, clause);
        let enforced = enforce_vchains(sentence, clause, &vchains);
        let marked = mark_parenthetical_insertions(clause, &vchains);
        let stamped = stamp_vchain_ids(clause, &vchains);
        debug!(clause = %clause.id, moved, enforced, marked, stamped, "enforced");
    }

    let (report, log) = repair_loop(sentence, &mut clauses, &vchains, config.repair_iterations());

    if config.label_long_distance {
        let relabelled = fix_long_distance_labels(&mut clauses);
        if relabelled > 0 {
            debug!(relabelled, "long-distance labels");
        }
    }

    let evidence = if config.run_syntax_tests {
        run_syntax_tests(sentence, &clauses, &tokens)
    } else {
        Vec::new()
    };

    info!(
        valid = report.valid,
        violations = report.violations.len(),
        repairs = log.actions.len(),
        cascades = log.cascade_count,
        "analysis complete"
    );

    Analysis { clauses, tokens, vchains, report, log, evidence }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammar_protocol::{Clause, ClauseElement, RepairKind, Role, SentencePattern};

    #[test]
    fn test_clean_sentence_needs_no_repair() {
        let sentence = "She reads books";
        let main = Clause::main(vec![
            ClauseElement::new(Role::S, "She", 0, 3),
            ClauseElement::new(Role::V, "reads", 4, 9),
            ClauseElement::new(Role::Od, "books", 10, 15),
        ]);
        let analysis = analyze(sentence, ClauseSet::single(main), None, None, &EngineConfig::default());

        assert!(analysis.is_valid());
        assert!(analysis.log.actions.is_empty());
        assert_eq!(analysis.clauses.main().pattern, Some(SentencePattern::Svo));
        assert!(!analysis.evidence.is_empty());
        assert!(analysis.tokens.iter().any(|t| t.text == "reads"));
    }

    #[test]
    fn test_syntax_tests_can_be_disabled() {
        let sentence = "She reads books";
        let main = Clause::main(vec![
            ClauseElement::new(Role::S, "She", 0, 3),
            ClauseElement::new(Role::V, "reads", 4, 9),
            ClauseElement::new(Role::Od, "books", 10, 15),
        ]);
        let config = EngineConfig { run_syntax_tests: false, ..EngineConfig::default() };
        let analysis = analyze(sentence, ClauseSet::single(main), None, None, &config);
        assert!(analysis.evidence.is_empty());
    }

    #[test]
    fn test_wrong_offsets_are_fixed_before_validation() {
        let sentence = "He left";
        let main = Clause::main(vec![
            ClauseElement::new(Role::S, "He", 3, 5),
            ClauseElement::new(Role::V, "left", 0, 4),
        ]);
        let analysis = analyze(sentence, ClauseSet::single(main), None, None, &EngineConfig::default());

        assert!(analysis.is_valid());
        assert!(analysis.log.of_kind(RepairKind::FixCharspan).next().is_none());
        assert!(analysis.clauses.main().elements.iter().all(|e| e.span_matches(sentence)));
    }
}
