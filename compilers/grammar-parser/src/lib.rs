pub mod enforce;
pub mod gap;
pub mod infinitive;
pub mod pattern;
pub mod scanner;
pub mod tagger;
pub mod token;
pub mod tokenizer;
pub mod vchain;

pub use enforce::{
    enforce_vchains, fix_element_indices, mark_parenthetical_insertions, split_noncontiguous_v,
    stamp_vchain_ids,
};
pub use gap::{
    detect_gap, detect_long_distance_extraction, fix_long_distance_labels, infer_what_role,
    validate_clause_type, ClauseTypeCheck,
};
pub use infinitive::classify_to_infinitive;
pub use pattern::{apply_pattern_fix, chain_for_clause, determine_pattern, pattern_mismatch, PatternDecision};
pub use tagger::{LexicalTagger, Tagger};
pub use tokenizer::{PosTokenizer, RuleTokenizer, Tokenize};
pub use vchain::{resolve_vchains, ChainResolver};

#[cfg(test)]
mod tests {
    use super::*;
    use grammar_protocol::{Clause, ClauseElement, Role, SentencePattern};

    #[test]
    fn test_enrichment_pipeline() {
        let sentence = "She had, once codified into procedure, come to dominate";
        let tokens = RuleTokenizer::default().tokenize(sentence);
        let vchains = resolve_vchains(&tokens);
        assert_eq!(vchains.chains.len(), 1);

        let mut clause = Clause::main(vec![
            ClauseElement::new(Role::S, "She", 0, 3),
            ClauseElement::new(Role::V, "had come", 4, 43),
            ClauseElement::new(Role::M, "once codified into procedure", 9, 37),
            ClauseElement::new(Role::Od, "to dominate", 44, 55),
        ]);
        fix_element_indices(sentence, &mut clause);
        enforce_vchains(sentence, &mut clause, &vchains);
        mark_parenthetical_insertions(&mut clause, &vchains);
        stamp_vchain_ids(&mut clause, &vchains);

        let roles: Vec<Role> = clause.elements.iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![Role::S, Role::V, Role::V, Role::Insert, Role::Od]);
        assert!(clause.elements.iter().filter(|e| e.role == Role::V).all(|e| e.v_chain_id.is_some()));

        let chain = chain_for_clause(&clause, &vchains);
        assert_eq!(apply_pattern_fix(&mut clause, chain), SentencePattern::Sv);
        assert_eq!(clause.elements[4].role, Role::Comp);
    }
}
