use std::collections::HashSet;

use once_cell::sync::Lazy;

use grammar_lexicon as lexicon;

use crate::scanner::{scan, RawToken};
use crate::token::{Tags, TaggedTerm};

/// Produces candidate tags for every term of a sentence.
///
/// Implementations must return terms in sentence order with spans that
/// slice back to their text. Punctuation may be omitted; the tokenizer
/// injects whatever structural punctuation is left uncovered.
pub trait Tagger {
    fn tag<'a>(&self, sentence: &'a str) -> Vec<TaggedTerm<'a>>;
}

fn word_set(words: &'static [&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

static PRONOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    word_set(&[
        "i", "me", "my", "mine", "myself", "you", "your", "yours", "yourself", "yourselves",
        "he", "him", "his", "himself", "she", "her", "hers", "herself", "it", "its", "itself",
        "we", "us", "our", "ours", "ourselves", "they", "them", "their", "theirs", "themselves",
        "who", "whom", "whose", "which", "what", "whoever", "whatever", "someone", "somebody",
        "something", "anyone", "anybody", "anything", "everyone", "everybody", "everything",
        "nobody", "nothing", "none",
    ])
});

static POSSESSIVES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| word_set(&["my", "your", "his", "her", "its", "our", "their", "whose"]));

static DETERMINERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    word_set(&[
        "the", "a", "an", "this", "these", "those", "every", "each", "some", "any", "no", "all",
        "both", "either", "neither", "another", "such", "many", "much", "few", "several",
    ])
});

static PREPOSITIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    word_set(&[
        "in", "on", "at", "by", "for", "with", "about", "against", "between", "into", "through",
        "during", "before", "after", "above", "below", "to", "from", "up", "down", "of", "off",
        "over", "under", "than", "within", "without", "across", "along", "among", "around",
        "behind", "beyond", "near", "since", "toward", "towards", "upon", "via", "despite",
        "per", "until", "like",
    ])
});

static CONJUNCTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    word_set(&[
        "and", "but", "or", "nor", "yet", "so", "because", "although", "though", "unless",
        "while", "when", "whereas", "whenever", "wherever", "if", "since", "until", "once",
        "provided", "supposing", "that", "whether", "before", "after",
    ])
});

static ADVERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    word_set(&[
        "not", "n't", "never", "always", "often", "sometimes", "usually", "seldom", "rarely",
        "hardly", "scarcely", "also", "just", "still", "already", "even", "only", "merely",
        "very", "quite", "rather", "too", "soon", "now", "then", "here", "there", "however",
        "therefore", "thus", "indeed", "perhaps", "maybe", "almost", "ever", "again", "once",
        "well", "far", "away", "back", "instead", "together",
    ])
});

static ADJECTIVES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    word_set(&[
        "happy", "sad", "good", "bad", "big", "small", "large", "little", "new", "old", "young",
        "great", "high", "low", "long", "short", "early", "late", "right", "wrong", "true",
        "false", "free", "full", "empty", "red", "blue", "green", "black", "white", "tired",
        "angry", "quiet", "clear", "strong", "weak", "rich", "poor", "real", "whole", "main",
        "open", "close", "fine", "best", "better", "worse", "worst", "own", "other", "same",
        "different", "available", "cold", "hot", "warm", "dark", "bright",
    ])
});

static CARDINALS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    word_set(&[
        "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
        "twelve", "twenty", "thirty", "hundred", "thousand", "million", "billion",
    ])
});

static ORDINALS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    word_set(&[
        "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
        "tenth", "last",
    ])
});

static DATES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    word_set(&["today", "yesterday", "tomorrow", "tonight", "ago"])
});

static CALENDAR: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    word_set(&[
        "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "january",
        "february", "march", "april", "june", "july", "august", "september", "october",
        "november", "december",
    ])
});

/// Common verbs outside the grammatical classes of the lexicon.
static COMMON_VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    word_set(&[
        "see", "take", "eat", "walk", "sleep", "work", "play", "live", "love", "like", "hate",
        "dominate", "protect", "exclude", "include", "follow", "open", "close", "begin",
        "start", "stop", "try", "ask", "answer", "move", "change", "study", "watch", "meet",
        "speak", "talk", "sit", "stand", "win", "lose", "leave", "sing", "swim", "dance",
        "carry", "catch", "break", "drink", "fly", "forgive", "hide", "hold", "wake", "wear",
        "bear", "steal", "beat", "shake", "tear", "draw", "ring", "accept", "trust", "respect",
        "appreciate", "happen", "help", "lead", "compel", "allege", "design", "treat", "codify",
        "deliver", "visit", "travel", "arrive", "die", "cry", "laugh", "smile", "expand",
        // simple past forms the inflection stage cannot reach
        "saw", "met", "ate", "took", "gave", "knew", "wrote", "spoke", "began", "sang", "drove",
        "chose", "broke", "rose", "won", "lost", "sat", "stood", "woke", "wore", "stole", "flew",
    ])
});

/// -ing words that are nouns or prepositions, not participles.
static ING_NOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    word_set(&[
        "thing", "nothing", "something", "anything", "everything", "king", "ring", "spring",
        "morning", "evening", "string", "wing", "ceiling", "during", "building", "meeting",
        "feeling", "painting", "wedding",
    ])
});

/// -en words that are nouns even after "have" or "be" ("has children").
static EN_NOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    word_set(&[
        "children", "men", "women", "kitchen", "garden", "chicken", "citizen", "oxygen",
        "token", "kitten", "heaven", "dozen", "linen", "screen", "queen", "teen",
    ])
});

const HAVE_FORMS: &[&str] = &["have", "has", "had", "having"];

const ADJECTIVE_SUFFIXES: &[&str] = &["ful", "ous", "ive", "able", "ible", "al", "ic", "less", "ish"];

fn is_known_verb(lower: &str) -> bool {
    lexicon::candidate_bases(lower)
        .iter()
        .any(|base| !lexicon::classes_of(base).is_empty() || COMMON_VERBS.contains(base.as_str()))
}

/// Dictionary + suffix tagger. Assigns the closed-class tags from word lists,
/// verbs from the lexicon, and falls back to noun for unknown words.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalTagger;

impl LexicalTagger {
    pub fn new() -> Self {
        Self
    }

    fn tag_word(&self, word: &str, sentence_initial: bool) -> Tags {
        let lower = word.to_lowercase();
        let w = lower.as_str();

        if w.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.') {
            return Tags::NUMERIC | Tags::CARDINAL;
        }
        if CARDINALS.contains(w) {
            return Tags::CARDINAL;
        }
        if ORDINALS.contains(w) {
            return Tags::ORDINAL | Tags::ADJECTIVE;
        }
        if lexicon::is_aux(w) {
            let mut tags = Tags::AUXILIARY | Tags::VERB;
            if lexicon::is_be_form(w) {
                tags |= Tags::COPULA;
            }
            return tags;
        }
        if PRONOUNS.contains(w) {
            return Tags::PRONOUN;
        }
        if DETERMINERS.contains(w) {
            return Tags::DETERMINER;
        }

        let mut closed = Tags::empty();
        if PREPOSITIONS.contains(w) {
            closed |= Tags::PREPOSITION;
        }
        if CONJUNCTIONS.contains(w) {
            closed |= Tags::CONJUNCTION;
        }
        if ADVERBS.contains(w) && closed.is_empty() {
            return Tags::ADVERB;
        }
        if !closed.is_empty() {
            return closed;
        }

        if DATES.contains(w) {
            return Tags::DATE;
        }
        if CALENDAR.contains(w) {
            return Tags::DATE | Tags::PROPER_NOUN;
        }
        if lexicon::is_copular_adjective(w) || ADJECTIVES.contains(w) {
            return Tags::ADJECTIVE;
        }
        if lexicon::is_abstract_noun(w) && !lexicon::has_class(w, lexicon::VerbClass::all()) {
            return Tags::NOUN | Tags::SINGULAR;
        }
        if is_known_verb(w) && !ING_NOUNS.contains(w) {
            return Tags::VERB;
        }
        if w.len() > 3 && w.ends_with("ed") {
            return Tags::VERB;
        }
        if lexicon::is_present_participle(w) && !ING_NOUNS.contains(w) {
            return Tags::VERB;
        }
        if w.len() > 4 && w.ends_with("ly") {
            return Tags::ADVERB;
        }
        if w.len() > 4 && w.ends_with("er") && ADJECTIVES.contains(&w[..w.len() - 2]) {
            return Tags::ADJECTIVE | Tags::COMPARABLE;
        }
        if w.len() > 4 && ADJECTIVE_SUFFIXES.iter().any(|s| w.ends_with(s)) {
            return Tags::ADJECTIVE;
        }
        if !sentence_initial && word.chars().next().is_some_and(char::is_uppercase) {
            return Tags::NOUN | Tags::PROPER_NOUN;
        }
        if w.len() > 3 && w.ends_with('s') && !w.ends_with("ss") {
            return Tags::NOUN | Tags::PLURAL;
        }
        if w.chars().any(char::is_alphabetic) {
            return Tags::NOUN | Tags::SINGULAR;
        }
        Tags::empty()
    }

    /// Context fixes that need neighbours.
    fn retag(&self, terms: &mut [TaggedTerm<'_>]) {
        for i in 0..terms.len() {
            let lower = terms[i].text.to_lowercase();

            // "that" + noun phrase is a determiner, otherwise a complementizer.
            if lower == "that" {
                let next_nominal = terms
                    .get(i + 1)
                    .is_some_and(|t| t.has(Tags::ANY_NOUN | Tags::ADJECTIVE) && !t.has(Tags::VERB));
                if next_nominal {
                    terms[i].tags = Tags::DETERMINER;
                }
                continue;
            }

            // A nominal -en participle after a perfect or passive auxiliary ("had forgotten").
            if i > 0 && terms[i].has(Tags::ANY_NOUN) && !terms[i].has(Tags::PROPER_NOUN) {
                let prev = terms[i - 1].text.to_lowercase();
                let perfect_or_passive = HAVE_FORMS.contains(&prev.as_str()) || lexicon::is_be_form(&prev);
                if perfect_or_passive
                    && lower.ends_with("en")
                    && lexicon::is_past_participle(&lower)
                    && !EN_NOUNS.contains(lower.as_str())
                {
                    terms[i].tags = Tags::VERB;
                    continue;
                }
            }

            // A bare verb right after a determiner or possessive is a noun ("the plan").
            if i > 0 && terms[i].tags == Tags::VERB && !terms[i].text.ends_with("ed") {
                let prev = &terms[i - 1];
                let prev_lower = prev.text.to_lowercase();
                if prev.has(Tags::DETERMINER) || POSSESSIVES.contains(prev_lower.as_str()) {
                    terms[i].tags = Tags::NOUN | Tags::SINGULAR;
                }
            }
        }
    }
}

impl Tagger for LexicalTagger {
    fn tag<'a>(&self, sentence: &'a str) -> Vec<TaggedTerm<'a>> {
        let mut terms = Vec::new();
        let mut sentence_initial = true;

        for (span, raw) in scan(sentence) {
            let text = &sentence[span.start..span.end];
            match raw {
                RawToken::Punct(c) => {
                    terms.push(TaggedTerm::new(span, text, Tags::PUNCTUATION));
                    if matches!(c, '.' | '!' | '?') {
                        sentence_initial = true;
                    }
                }
                RawToken::Symbol(_) => terms.push(TaggedTerm::new(span, text, Tags::empty())),
                RawToken::Word(w) => {
                    let tags = self.tag_word(w, sentence_initial);
                    terms.push(TaggedTerm::new(span, text, tags));
                    sentence_initial = false;
                }
            }
        }

        self.retag(&mut terms);
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags_of(sentence: &str) -> Vec<(&str, Tags)> {
        LexicalTagger::new()
            .tag(sentence)
            .into_iter()
            .map(|t| (t.text, t.tags))
            .collect()
    }

    #[test]
    fn closed_classes() {
        let tags = tags_of("She saw the cat");
        assert_eq!(tags[0].1, Tags::PRONOUN);
        assert!(tags[1].1.contains(Tags::VERB));
        assert_eq!(tags[2].1, Tags::DETERMINER);
        assert!(tags[3].1.intersects(Tags::ANY_NOUN));
    }

    #[test]
    fn verb_after_determiner_becomes_noun() {
        let tags = tags_of("their plan to expand");
        assert!(tags[1].1.contains(Tags::NOUN));
        assert!(tags[3].1.contains(Tags::VERB));
    }

    #[test]
    fn that_disambiguation() {
        let tags = tags_of("He said that book was good");
        assert_eq!(tags[2].1, Tags::DETERMINER);
        let tags = tags_of("They acknowledge that");
        assert!(tags[2].1.contains(Tags::CONJUNCTION));
    }

    #[test]
    fn unknown_words_fall_back_to_noun() {
        let tags = tags_of("The committee met");
        assert!(tags[1].1.contains(Tags::NOUN));
    }

    #[test]
    fn irregular_participle_after_have_is_verbal() {
        let tags = tags_of("I had forgotten her name");
        assert_eq!(tags[2], ("forgotten", Tags::VERB));
        let tags = tags_of("The lake was frozen");
        assert_eq!(tags[3].1, Tags::VERB);
        let tags = tags_of("They have children");
        assert!(tags[2].1.contains(Tags::NOUN));
    }

    #[test]
    fn symbols_are_kept_untagged() {
        let tags = tags_of("Pay $5");
        assert_eq!(tags[1], ("$", Tags::empty()));
        assert!(tags[2].1.contains(Tags::NUMERIC));
    }

    #[test]
    fn suffix_rules() {
        let tags = tags_of("carefully dangerous walked running");
        assert_eq!(tags[0].1, Tags::ADVERB);
        assert_eq!(tags[1].1, Tags::ADJECTIVE);
        assert_eq!(tags[2].1, Tags::VERB);
        assert_eq!(tags[3].1, Tags::VERB);
    }
}
