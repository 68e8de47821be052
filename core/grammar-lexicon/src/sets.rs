use std::collections::{HashMap, HashSet};

use bitflags::bitflags;
use once_cell::sync::Lazy;

bitflags! {
    /// Lexical classes a verb lemma can belong to. A lemma may carry several.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VerbClass: u16 {
        const LINKING             = 1 << 0;
        const DITRANSITIVE        = 1 << 1;
        const COMPLEX_TRANSITIVE  = 1 << 2;
        const THAT_COMPLEMENT     = 1 << 3;
        const TO_INF_OBJECT       = 1 << 4;
        const RAISING             = 1 << 5;
        const CAUSATIVE           = 1 << 6;
        const BRIDGE              = 1 << 7;
        const PASSIVE_PURPOSE     = 1 << 8;
        const ASPECTUAL           = 1 << 9;
        const CAUSATIVE_PASSIVE   = 1 << 10;
        const COPULAR_PASSIVE_ADJ = 1 << 11;
        /// Verbs whose to-infinitive reads as a result ("lived to see").
        const RESULT              = 1 << 12;
    }
}

pub const AUXILIARIES: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "do", "does", "did",
    "can", "could", "will", "would", "shall", "should", "may", "might", "must",
];

pub const MODALS: &[&str] = &[
    "can", "could", "will", "would", "shall", "should", "may", "might", "must",
];

const LINKING: &[&str] = &[
    "be", "become", "remain", "seem", "appear", "look", "feel", "sound", "taste", "smell",
    "stay", "prove", "turn", "grow", "get", "keep", "go", "come", "run", "fall",
];

const DITRANSITIVE: &[&str] = &[
    "give", "send", "show", "tell", "buy", "offer", "teach", "bring", "lend", "pay",
    "write", "read", "pass", "hand", "throw", "award", "grant", "promise", "wish", "owe",
];

const COMPLEX_TRANSITIVE: &[&str] = &[
    "make", "find", "consider", "call", "keep", "leave", "think", "believe", "declare", "prove",
    "elect", "name", "appoint", "render", "drive", "paint", "dye", "turn", "get", "want",
];

const THAT_COMPLEMENT: &[&str] = &[
    "think", "believe", "know", "say", "tell", "hope", "wish", "assume", "suppose", "claim",
    "suggest", "insist", "demand", "recommend", "feel", "realize", "understand", "notice",
    "expect", "fear", "doubt", "imagine", "acknowledge", "admit", "agree", "announce", "argue",
    "complain", "confirm", "decide", "deny", "discover", "explain", "forget", "guess", "hear",
    "imply", "indicate", "learn", "mean", "mention", "predict", "promise", "prove", "recall",
    "recognize", "remember", "report", "reveal", "show", "state", "suspect", "warn", "find",
];

const TO_INF_OBJECT: &[&str] = &[
    "want", "need", "hope", "wish", "expect", "plan", "decide", "choose", "agree", "refuse",
    "offer", "promise", "threaten", "attempt", "fail", "manage", "learn", "afford", "tend",
    "pretend", "claim", "demand", "desire", "intend", "prepare", "strive", "swear", "volunteer",
    "vow", "arrange", "endeavor",
];

const RAISING: &[&str] = &["seem", "appear", "happen", "prove", "tend", "chance"];

const CAUSATIVE: &[&str] = &[
    "make", "let", "have", "get", "force", "cause", "allow", "permit", "enable",
];

const BRIDGE: &[&str] = &[
    "claim", "think", "say", "believe", "report", "argue", "assume", "feel", "suggest", "know",
    "suppose", "hope", "imagine", "expect", "fear", "declare", "assert", "maintain", "state",
    "predict", "acknowledge", "admit", "announce", "confirm", "deny", "discover", "explain",
    "find", "hear", "learn", "mean", "mention", "notice", "realize", "remember", "reveal",
    "show", "suspect", "understand", "warn", "wish",
];

const PASSIVE_PURPOSE: &[&str] = &[
    "build", "create", "develop", "construct", "establish", "organize", "plan", "arrange",
    "use", "employ", "utilize", "deploy", "introduce", "implement", "install", "prepare",
    "configure", "train", "equip", "adapt", "modify", "program", "engineer", "craft", "tailor",
    "optimize",
];

const ASPECTUAL: &[&str] = &["come", "get", "grow", "live"];

const CAUSATIVE_PASSIVE: &[&str] = &[
    "make", "force", "cause", "allow", "compel", "enable", "permit", "lead", "drive", "get",
    "let", "help",
];

const COPULAR_PASSIVE_ADJ: &[&str] = &[
    "mean", "suppose", "say", "report", "think", "believe", "consider", "know", "find",
    "expect", "allege", "design",
];

const RESULT: &[&str] = &["live", "wake", "awake"];

/// Predicate adjectives that make a linking verb's "object" a complement ("is likely").
pub const COPULAR_ADJECTIVES: &[&str] = &[
    "bound", "likely", "unlikely", "ready", "able", "unable", "supposed", "willing", "apt",
    "certain", "sure", "afraid", "capable", "inclined", "prone", "destined", "meant", "set",
    "about", "due", "important", "necessary", "possible", "impossible", "difficult", "easy",
    "hard",
];

/// Nouns that take a to-infinitive modifier ("the decision to leave").
pub const ABSTRACT_NOUNS: &[&str] = &[
    "ability", "attempt", "chance", "choice", "decision", "desire", "effort", "failure",
    "intention", "need", "obligation", "opportunity", "order", "permission", "plan", "power",
    "promise", "proposal", "reason", "refusal", "request", "right", "tendency", "time", "way",
    "wish", "capacity", "freedom", "urge", "willingness",
];

/// Infinitive heads that keep an aspectual verb aspectual ("came to know").
pub const EXPERIENTIAL_VERBS: &[&str] = &[
    "know", "understand", "realize", "appreciate", "like", "love", "believe", "accept", "fear",
    "hate", "respect", "trust", "want", "need",
];

/// Words that force a result reading on a following infinitive ("only to find").
pub const RESULT_TRIGGERS: &[&str] = &["only", "never", "merely"];

const CLASS_SOURCES: &[(VerbClass, &[&str])] = &[
    (VerbClass::LINKING, LINKING),
    (VerbClass::DITRANSITIVE, DITRANSITIVE),
    (VerbClass::COMPLEX_TRANSITIVE, COMPLEX_TRANSITIVE),
    (VerbClass::THAT_COMPLEMENT, THAT_COMPLEMENT),
    (VerbClass::TO_INF_OBJECT, TO_INF_OBJECT),
    (VerbClass::RAISING, RAISING),
    (VerbClass::CAUSATIVE, CAUSATIVE),
    (VerbClass::BRIDGE, BRIDGE),
    (VerbClass::PASSIVE_PURPOSE, PASSIVE_PURPOSE),
    (VerbClass::ASPECTUAL, ASPECTUAL),
    (VerbClass::CAUSATIVE_PASSIVE, CAUSATIVE_PASSIVE),
    (VerbClass::COPULAR_PASSIVE_ADJ, COPULAR_PASSIVE_ADJ),
    (VerbClass::RESULT, RESULT),
];

static CLASS_TABLE: Lazy<HashMap<&'static str, VerbClass>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, VerbClass> = HashMap::new();
    for (class, words) in CLASS_SOURCES {
        for word in *words {
            *table.entry(*word).or_insert_with(VerbClass::empty) |= *class;
        }
    }
    table
});

static AUX_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| AUXILIARIES.iter().copied().collect());

/// Classes of an exact (already lowercased) base form.
pub fn classes_of(lemma: &str) -> VerbClass {
    CLASS_TABLE.get(lemma).copied().unwrap_or(VerbClass::empty())
}

pub fn has_class(lemma: &str, class: VerbClass) -> bool {
    classes_of(lemma).intersects(class)
}

/// Every base form the lexicon knows about, across all classes.
pub fn known_verbs() -> impl Iterator<Item = &'static str> {
    CLASS_TABLE.keys().copied()
}

pub fn is_aux(word: &str) -> bool {
    AUX_SET.contains(word.to_lowercase().as_str())
}

pub fn is_modal(word: &str) -> bool {
    let w = word.to_lowercase();
    MODALS.contains(&w.as_str())
}

pub fn is_copular_adjective(word: &str) -> bool {
    let w = word.to_lowercase();
    COPULAR_ADJECTIVES.contains(&w.as_str())
}

pub fn is_abstract_noun(lemma: &str) -> bool {
    ABSTRACT_NOUNS.contains(&lemma)
}
