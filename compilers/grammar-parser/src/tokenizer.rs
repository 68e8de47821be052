use tracing::trace;

use grammar_lexicon as lexicon;
use grammar_protocol::{PartOfSpeech, PosToken, Span};

use crate::tagger::{LexicalTagger, Tagger};
use crate::token::{Tags, TaggedTerm};

/// Capability every downstream stage depends on: sentence in, tagged tokens out.
pub trait Tokenize {
    fn tokenize(&self, sentence: &str) -> Vec<PosToken>;
}

/// Structural punctuation that must always appear as tokens.
const STRUCTURAL_PUNCT: &[char] = &[',', ';', '.', '!', '?'];

const PARTICLES: &[&str] = &["to", "not", "n't", "'t"];

const SUBORDINATORS: &[&str] = &[
    "if", "because", "although", "though", "unless", "while", "when", "since", "before",
    "after", "until", "once", "whereas", "whenever", "wherever", "provided", "supposing",
];

const COORDINATORS: &[&str] = &["and", "but", "or", "nor", "yet", "so", "for"];

fn is_punct_text(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(c), None) if crate::scanner::PUNCTUATION.contains(c)
    )
}

/// Collapses a term's candidate tags into one part of speech.
///
/// The auxiliary dictionary wins over whatever the tagger said, pronouns win
/// over nouns, and words a tagger lumps in with prepositions are split into
/// particles, subordinators and coordinators by word list.
pub fn classify(term: &TaggedTerm<'_>) -> PartOfSpeech {
    let lower = term.text.to_lowercase();
    let w = lower.as_str();
    let tags = term.tags;

    if is_punct_text(term.text) {
        return PartOfSpeech::Punct;
    }
    if lexicon::is_aux(w) || tags.contains(Tags::AUXILIARY) {
        return PartOfSpeech::Aux;
    }
    if tags.contains(Tags::PRONOUN) {
        return PartOfSpeech::Pron;
    }
    if tags.intersects(Tags::ANY_VERB) {
        return PartOfSpeech::Verb;
    }
    if tags.intersects(Tags::ADJECTIVE | Tags::COMPARABLE) {
        return PartOfSpeech::Adj;
    }
    if tags.contains(Tags::ADVERB) {
        return PartOfSpeech::Adv;
    }
    if tags.intersects(Tags::ANY_NUMBER) {
        return PartOfSpeech::Num;
    }
    if tags.contains(Tags::DETERMINER) {
        return PartOfSpeech::Det;
    }
    if tags.intersects(Tags::CONJUNCTION | Tags::PREPOSITION) {
        if PARTICLES.contains(&w) {
            return PartOfSpeech::Part;
        }
        if SUBORDINATORS.contains(&w) {
            return PartOfSpeech::Sconj;
        }
        if COORDINATORS.contains(&w) {
            return PartOfSpeech::Cconj;
        }
        if tags.contains(Tags::PREPOSITION) {
            return PartOfSpeech::Adp;
        }
        return PartOfSpeech::Sconj;
    }
    if tags.intersects(Tags::ANY_NOUN) {
        return PartOfSpeech::Noun;
    }
    if tags.intersects(Tags::DATE | Tags::TIME) {
        return PartOfSpeech::Adv;
    }
    PartOfSpeech::Other
}

/// Tokenizer over any [`Tagger`]. Swap the tagger to change tagging quality
/// without touching chain resolution or pattern logic.
#[derive(Debug, Clone, Default)]
pub struct PosTokenizer<T> {
    tagger: T,
}

/// The tokenizer used when the caller does not supply tokens.
pub type RuleTokenizer = PosTokenizer<LexicalTagger>;

impl<T: Tagger> PosTokenizer<T> {
    pub fn new(tagger: T) -> Self {
        Self { tagger }
    }

    pub fn tagger(&self) -> &T {
        &self.tagger
    }
}

impl<T: Tagger> Tokenize for PosTokenizer<T> {
    fn tokenize(&self, sentence: &str) -> Vec<PosToken> {
        let mut tokens: Vec<PosToken> = self
            .tagger
            .tag(sentence)
            .iter()
            .filter(|term| term.span.slice(sentence) == Some(term.text))
            .map(|term| {
                let pos = classify(term);
                let lemma = if pos.is_verbal() {
                    lexicon::lemma(term.text)
                } else {
                    term.text.to_lowercase()
                };
                trace!(term = term.text, tags = ?term.tags, pos = %pos, "tagged");
                PosToken::new(term.text, pos, lemma, term.span.start)
            })
            .collect();

        inject_punctuation(sentence, &mut tokens);
        tokens
    }
}

/// Adds a PUNCT token for every structural punctuation mark no token covers.
fn inject_punctuation(sentence: &str, tokens: &mut Vec<PosToken>) {
    let covered = |at: usize, tokens: &[PosToken]| {
        tokens.iter().any(|t| t.span.start <= at && at < t.span.end)
    };
    let missing: Vec<(usize, char)> = sentence
        .char_indices()
        .filter(|(_, c)| STRUCTURAL_PUNCT.contains(c))
        .filter(|(at, _)| !covered(*at, tokens))
        .collect();

    if missing.is_empty() {
        return;
    }
    for (at, c) in missing {
        let text = c.to_string();
        trace!(at, punct = %c, "injected punctuation");
        tokens.push(PosToken {
            lowercase: text.clone(),
            lemma: text.clone(),
            span: Span::new(at, at + c.len_utf8()),
            text,
            pos: PartOfSpeech::Punct,
        });
    }
    tokens.sort_by_key(|t| t.span.start);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pos_of(tokens: &[PosToken], text: &str) -> PartOfSpeech {
        tokens
            .iter()
            .find(|t| t.text == text)
            .map(|t| t.pos)
            .unwrap_or_else(|| panic!("no token {text}"))
    }

    #[test]
    fn auxiliary_dictionary_wins() {
        let tokens = RuleTokenizer::default().tokenize("She had been seen. Did she go?");
        assert_eq!(pos_of(&tokens, "She"), PartOfSpeech::Pron);
        assert_eq!(pos_of(&tokens, "had"), PartOfSpeech::Aux);
        assert_eq!(pos_of(&tokens, "been"), PartOfSpeech::Aux);
        assert_eq!(pos_of(&tokens, "Did"), PartOfSpeech::Aux);
        assert_eq!(pos_of(&tokens, "."), PartOfSpeech::Punct);
    }

    #[test]
    fn spans_and_lemmas() {
        let tokens = RuleTokenizer::default().tokenize("The cat was happy and ran carefully");
        let cat = tokens.iter().find(|t| t.text == "cat").unwrap();
        assert_eq!((cat.start(), cat.end()), (4, 7));
        assert_eq!(pos_of(&tokens, "The"), PartOfSpeech::Det);
        assert_eq!(pos_of(&tokens, "happy"), PartOfSpeech::Adj);
        assert_eq!(pos_of(&tokens, "carefully"), PartOfSpeech::Adv);
        assert_eq!(pos_of(&tokens, "and"), PartOfSpeech::Cconj);

        let was = tokens.iter().find(|t| t.text == "was").unwrap();
        assert_eq!(was.lemma, "be");
        assert_eq!(cat.lemma, "cat");
    }

    #[test]
    fn particle_and_subordinator_split() {
        let tokens = RuleTokenizer::default().tokenize("He came to see us because we called");
        assert_eq!(pos_of(&tokens, "to"), PartOfSpeech::Part);
        assert_eq!(pos_of(&tokens, "because"), PartOfSpeech::Sconj);
        assert_eq!(pos_of(&tokens, "us"), PartOfSpeech::Pron);
    }

    #[test]
    fn symbols_are_other() {
        let tokens = RuleTokenizer::default().tokenize("Pay $5 @ noon & 10% off");
        assert_eq!(pos_of(&tokens, "$"), PartOfSpeech::Other);
        assert_eq!(pos_of(&tokens, "@"), PartOfSpeech::Other);
        assert_eq!(pos_of(&tokens, "&"), PartOfSpeech::Other);
        assert_eq!(pos_of(&tokens, "%"), PartOfSpeech::Other);
        assert_eq!(pos_of(&tokens, "10"), PartOfSpeech::Num);
    }

    #[test]
    fn perfect_participle_is_verbal() {
        let tokens = RuleTokenizer::default().tokenize("I had forgotten her name");
        assert_eq!(pos_of(&tokens, "forgotten"), PartOfSpeech::Verb);
    }

    struct WordsOnly;

    impl Tagger for WordsOnly {
        fn tag<'a>(&self, sentence: &'a str) -> Vec<TaggedTerm<'a>> {
            LexicalTagger::new()
                .tag(sentence)
                .into_iter()
                .filter(|t| !t.has(Tags::PUNCTUATION))
                .collect()
        }
    }

    #[test]
    fn missing_punctuation_is_injected_in_order() {
        let tokens = PosTokenizer::new(WordsOnly).tokenize("Yes, she left.");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Yes", ",", "she", "left", "."]);
        assert_eq!(tokens[1].pos, PartOfSpeech::Punct);
    }

    proptest! {
        #[test]
        fn every_token_slices_to_its_text(sentence in "[A-Za-z0-9 ,.;!?'$@&%#=+/*-]{0,60}") {
            let tokens = RuleTokenizer::default().tokenize(&sentence);
            for t in &tokens {
                prop_assert_eq!(t.span.slice(&sentence), Some(t.text.as_str()));
            }
            for pair in tokens.windows(2) {
                prop_assert!(pair[0].start() <= pair[1].start());
            }
            for (at, c) in sentence.char_indices().filter(|(_, c)| !c.is_whitespace()) {
                prop_assert!(
                    tokens.iter().any(|t| t.span.start <= at && at < t.span.end),
                    "{:?} at {} not covered", c, at
                );
            }
        }
    }
}
