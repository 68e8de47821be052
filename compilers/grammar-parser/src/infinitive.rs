use grammar_lexicon::{
    is_abstract_noun, lemma, matches_verb_set, VerbClass, EXPERIENTIAL_VERBS, RESULT_TRIGGERS,
};
use grammar_protocol::{ClauseElement, InfFunction, PartOfSpeech, PosToken, Role};

fn main_verb_word(elements: &[ClauseElement]) -> Option<String> {
    elements
        .iter()
        .filter(|e| e.role == Role::V)
        .flat_map(|e| e.words())
        .last()
        .map(str::to_lowercase)
}

/// Last token that ends at or before `offset`.
fn token_before(tokens: &[PosToken], offset: usize) -> Option<&PosToken> {
    tokens.iter().filter(|t| t.end() <= offset).last()
}

/// Classifies the to-infinitive at `index` within `elements`.
///
/// Checks run in a fixed order and the first hit wins; anything left over is
/// a purpose infinitive. An aspectual governor ("come", "get", ...) only gives
/// `Complement` when the infinitive head is "be" or an experiential verb, so
/// "came to see him" stays `Purpose`.
pub fn classify_to_infinitive(
    index: usize,
    elements: &[ClauseElement],
    tokens: &[PosToken],
) -> InfFunction {
    let Some(element) = elements.get(index) else {
        return InfFunction::Purpose;
    };

    if element.role == Role::S || (index == 0 && element.is_to_infinitive()) {
        return InfFunction::Subject;
    }

    let verb = main_verb_word(elements).unwrap_or_default();
    let after_verb = elements
        .iter()
        .position(|e| e.role == Role::V)
        .is_some_and(|v| index > v);

    if after_verb && matches_verb_set(&verb, VerbClass::TO_INF_OBJECT) {
        return InfFunction::Object;
    }
    if after_verb && matches_verb_set(&verb, VerbClass::RAISING) {
        return InfFunction::Complement;
    }

    if matches_verb_set(&verb, VerbClass::ASPECTUAL) {
        let head = element
            .words()
            .skip_while(|w| w.eq_ignore_ascii_case("to"))
            .next()
            .map(str::to_lowercase)
            .unwrap_or_default();
        if head == "be" || head == "being" {
            return InfFunction::Complement;
        }
        let head_lemma = lemma(&head);
        if EXPERIENTIAL_VERBS.contains(&head.as_str()) || EXPERIENTIAL_VERBS.contains(&head_lemma.as_str()) {
            return InfFunction::Complement;
        }
    }

    let previous = element.start().and_then(|start| token_before(tokens, start));
    if let Some(prev) = previous {
        if prev.pos == PartOfSpeech::Noun && is_abstract_noun(&prev.lemma) {
            return InfFunction::NounModifier;
        }
        if RESULT_TRIGGERS.contains(&prev.lowercase.as_str()) {
            return InfFunction::Result;
        }
    }
    if matches_verb_set(&verb, VerbClass::RESULT) {
        return InfFunction::Result;
    }

    InfFunction::Purpose
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{RuleTokenizer, Tokenize};

    /// Builds elements from `(role, text)` pairs anchored at their first occurrence.
    fn clause(sentence: &str, parts: &[(Role, &str)]) -> Vec<ClauseElement> {
        parts
            .iter()
            .map(|(role, text)| {
                let at = sentence.find(text).unwrap();
                ClauseElement::new(*role, *text, at, at + text.len())
            })
            .collect()
    }

    fn classify(sentence: &str, parts: &[(Role, &str)], index: usize) -> InfFunction {
        let tokens = RuleTokenizer::default().tokenize(sentence);
        classify_to_infinitive(index, &clause(sentence, parts), &tokens)
    }

    #[test]
    fn came_to_see_is_purpose() {
        let f = classify(
            "he came to see him",
            &[(Role::S, "he"), (Role::V, "came"), (Role::M, "to see him")],
            2,
        );
        assert_eq!(f, InfFunction::Purpose);
    }

    #[test]
    fn aspectual_with_experiential_head() {
        let sentence = "she came to know him";
        let parts = [(Role::S, "she"), (Role::V, "came"), (Role::Comp, "to know him")];
        assert_eq!(classify(sentence, &parts, 2), InfFunction::Complement);

        let sentence = "it had come to be used";
        let parts = [(Role::S, "it"), (Role::V, "had come"), (Role::Comp, "to be used")];
        assert_eq!(classify(sentence, &parts, 2), InfFunction::Complement);
    }

    #[test]
    fn subject_object_and_raising() {
        let sentence = "To err is human";
        assert_eq!(
            classify(sentence, &[(Role::C, "To err"), (Role::V, "is"), (Role::C, "human")], 0),
            InfFunction::Subject
        );

        let sentence = "they wanted to leave";
        assert_eq!(
            classify(sentence, &[(Role::S, "they"), (Role::V, "wanted"), (Role::Od, "to leave")], 2),
            InfFunction::Object
        );

        let sentence = "he seems to know";
        assert_eq!(
            classify(sentence, &[(Role::S, "he"), (Role::V, "seems"), (Role::C, "to know")], 2),
            InfFunction::Complement
        );
    }

    #[test]
    fn abstract_noun_head() {
        let sentence = "she made the decision to resign";
        let parts = [(Role::S, "she"), (Role::V, "made"), (Role::Od, "the decision"), (Role::M, "to resign")];
        assert_eq!(classify(sentence, &parts, 3), InfFunction::NounModifier);

        // ordinary nouns fall through
        let sentence = "she bought the car to impress";
        let parts = [(Role::S, "she"), (Role::V, "bought"), (Role::Od, "the car"), (Role::M, "to impress")];
        assert_eq!(classify(sentence, &parts, 3), InfFunction::Purpose);
    }

    #[test]
    fn result_readings() {
        let sentence = "he hurried home only to find it empty";
        let parts = [(Role::S, "he"), (Role::V, "hurried"), (Role::M, "home"), (Role::M, "to find it empty")];
        assert_eq!(classify(sentence, &parts, 3), InfFunction::Result);

        let sentence = "she lived to see it";
        let parts = [(Role::S, "she"), (Role::V, "lived"), (Role::M, "to see it")];
        assert_eq!(classify(sentence, &parts, 2), InfFunction::Result);
    }

    #[test]
    fn out_of_range_is_purpose() {
        assert_eq!(classify_to_infinitive(4, &[], &[]), InfFunction::Purpose);
    }
}
