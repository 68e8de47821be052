//! Static English verb lexicon.
//!
//! Read-only after first use; every analysis shares the same tables.

pub mod inflection;
pub mod sets;

pub use inflection::{
    candidate_bases, is_be_form, is_bridge_verb, is_linking, is_past_participle,
    is_present_participle, lemma, looks_verbal, matches_verb_set,
};
pub use sets::{
    classes_of, has_class, is_abstract_noun, is_aux, is_copular_adjective, is_modal, VerbClass,
    ABSTRACT_NOUNS, AUXILIARIES, COPULAR_ADJECTIVES, EXPERIENTIAL_VERBS, MODALS, RESULT_TRIGGERS,
};
