//! Inflection stage: maps a surface verb form to the base forms it could stand for.
//!
//! Lexicon membership checks go through [`candidate_bases`] so the
//! -ed / doubled-consonant / base-e / irregular cascade lives in one place.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::sets::{classes_of, VerbClass};

const LINKING_INFLECTIONS: &[(&str, &str)] = &[
    ("am", "be"), ("is", "be"), ("are", "be"), ("was", "be"), ("were", "be"),
    ("been", "be"), ("being", "be"),
    ("becomes", "become"), ("became", "become"),
    ("remains", "remain"), ("remained", "remain"),
    ("seems", "seem"), ("seemed", "seem"),
    ("appears", "appear"), ("appeared", "appear"),
    ("looks", "look"), ("looked", "look"),
    ("feels", "feel"), ("felt", "feel"),
    ("sounds", "sound"), ("sounded", "sound"),
    ("tastes", "taste"), ("tasted", "taste"),
    ("smells", "smell"), ("smelled", "smell"),
    ("stays", "stay"), ("stayed", "stay"),
    ("proves", "prove"), ("proved", "prove"), ("proven", "prove"),
    ("turns", "turn"), ("turned", "turn"),
    ("grows", "grow"), ("grew", "grow"), ("grown", "grow"),
    ("gets", "get"), ("got", "get"), ("gotten", "get"),
    ("keeps", "keep"), ("kept", "keep"),
    ("goes", "go"), ("went", "go"), ("gone", "go"),
    ("comes", "come"), ("came", "come"),
    ("runs", "run"), ("ran", "run"),
    ("falls", "fall"), ("fell", "fall"), ("fallen", "fall"),
];

const IRREGULAR_PARTICIPLE_BASES: &[(&str, &str)] = &[
    ("made", "make"), ("driven", "drive"), ("led", "lead"), ("meant", "mean"),
    ("thought", "think"), ("known", "know"), ("found", "find"), ("said", "say"),
    ("told", "tell"), ("shown", "show"), ("sent", "send"), ("built", "build"),
    ("left", "leave"), ("held", "hold"), ("brought", "bring"), ("caught", "catch"),
    ("taught", "teach"), ("bought", "buy"), ("lent", "lend"), ("paid", "pay"),
    ("thrown", "throw"), ("chosen", "choose"), ("written", "write"), ("given", "give"),
    ("taken", "take"), ("spoken", "speak"), ("hidden", "hide"), ("beaten", "beat"),
    ("broken", "break"), ("sworn", "swear"), ("forgiven", "forgive"), ("forbidden", "forbid"),
    ("stolen", "steal"), ("shaken", "shake"), ("woken", "wake"), ("worn", "wear"),
    ("torn", "tear"), ("born", "bear"), ("borne", "bear"), ("drawn", "draw"),
    ("begun", "begin"), ("sung", "sing"), ("rung", "ring"), ("swum", "swim"),
];

/// Surface forms recognised as past participles without a regular ending.
const IRREGULAR_PARTICIPLES: &[&str] = &[
    "been", "done", "gone", "seen", "taken", "given", "known", "shown", "grown", "drawn",
    "thrown", "blown", "born", "borne", "broken", "chosen", "driven", "eaten", "fallen", "flown",
    "forgotten", "frozen", "gotten", "hidden", "ridden", "risen", "spoken", "stolen", "sworn",
    "torn", "worn", "written", "begun", "drunk", "rung", "sung", "sunk", "swum", "brought",
    "bought", "built", "caught", "fed", "felt", "found", "had", "heard", "held", "kept", "left",
    "lent", "lost", "made", "meant", "met", "paid", "said", "sent", "set", "shot", "shut",
    "slept", "sold", "sought", "spent", "stood", "struck", "taught", "thought", "told",
    "understood", "won", "wound", "bound", "cut", "hit", "hurt", "let", "put", "quit", "read",
    "rid", "split", "spread", "come", "become", "overcome", "run", "treated", "designed",
    "acknowledged", "delivered", "watched", "codified", "considered", "called", "named",
];

static INFLECTIONS: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| LINKING_INFLECTIONS.iter().copied().collect());

static PARTICIPLE_BASES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| IRREGULAR_PARTICIPLE_BASES.iter().copied().collect());

static PARTICIPLES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| IRREGULAR_PARTICIPLES.iter().copied().collect());

/// Best-effort base form. Only strips third-person endings beyond the known table,
/// so past forms like "claimed" come back unchanged.
pub fn lemma(word: &str) -> String {
    let w = word.to_lowercase();
    if let Some(base) = INFLECTIONS.get(w.as_str()) {
        return (*base).to_string();
    }
    let len = w.len();
    if len > 4 && w.ends_with("ies") {
        return format!("{}y", &w[..len - 3]);
    }
    if len > 4 && ["shes", "ches", "sses", "xes", "zes"].iter().any(|s| w.ends_with(s)) {
        return w[..len - 2].to_string();
    }
    if len > 3 && w.ends_with('s') && !["ss", "us", "is"].iter().any(|s| w.ends_with(s)) {
        return w[..len - 1].to_string();
    }
    w
}

/// Every base form `word` might inflect from, most specific first.
pub fn candidate_bases(word: &str) -> Vec<String> {
    let w = word.to_lowercase();
    let mut out = vec![w.clone()];
    let mut push = |candidate: String| {
        if !out.contains(&candidate) {
            out.push(candidate);
        }
    };

    push(lemma(&w));
    if let Some(base) = PARTICIPLE_BASES.get(w.as_str()) {
        push((*base).to_string());
    }
    if w.len() > 3 && w.ends_with("ed") {
        let stripped = &w[..w.len() - 2];
        push(stripped.to_string());
        // admitted -> admitt -> admit
        let mut tail = stripped.chars().rev();
        if let (Some(a), Some(b)) = (tail.next(), tail.next()) {
            if a == b {
                push(stripped[..stripped.len() - a.len_utf8()].to_string());
            }
        }
        // acknowledged -> acknowledge
        push(w[..w.len() - 1].to_string());
    }
    out
}

/// Whether any base form of `word` belongs to `class`.
pub fn matches_verb_set(word: &str, class: VerbClass) -> bool {
    candidate_bases(word)
        .iter()
        .any(|base| classes_of(base).intersects(class))
}

/// Linking check on the word or its tabled inflection only, without the -ed cascade.
pub fn is_linking(word: &str) -> bool {
    let w = word.to_lowercase();
    if classes_of(&w).contains(VerbClass::LINKING) {
        return true;
    }
    INFLECTIONS
        .get(w.as_str())
        .is_some_and(|base| classes_of(base).contains(VerbClass::LINKING))
}

pub fn is_bridge_verb(word: &str) -> bool {
    matches_verb_set(word, VerbClass::BRIDGE)
}

pub fn is_be_form(word: &str) -> bool {
    matches!(
        word.to_lowercase().as_str(),
        "be" | "am" | "is" | "are" | "was" | "were" | "been" | "being"
    )
}

pub fn is_past_participle(word: &str) -> bool {
    let w = word.to_lowercase();
    PARTICIPLES.contains(w.as_str()) || w.ends_with("ed") || (w.ends_with("en") && w.len() > 3)
}

pub fn is_present_participle(word: &str) -> bool {
    let w = word.to_lowercase();
    w.ends_with("ing") && w.len() > 4
}

/// Heuristic "looks like a finite or participial verb" used by the that-clause check.
pub fn looks_verbal(word: &str) -> bool {
    let w = word.to_lowercase();
    w.ends_with("ed") || w.ends_with("ing") || crate::sets::is_aux(&w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lemma_cascade() {
        assert_eq!(lemma("was"), "be");
        assert_eq!(lemma("carries"), "carry");
        assert_eq!(lemma("watches"), "watch");
        assert_eq!(lemma("passes"), "pass");
        assert_eq!(lemma("claims"), "claim");
        assert_eq!(lemma("glass"), "glass");
        assert_eq!(lemma("bus"), "bus");
        assert_eq!(lemma("claimed"), "claimed");
    }

    #[test]
    fn verb_set_matching_covers_regular_past() {
        assert!(matches_verb_set("claimed", VerbClass::BRIDGE));
        assert!(matches_verb_set("admitted", VerbClass::BRIDGE));
        assert!(matches_verb_set("acknowledged", VerbClass::BRIDGE));
        assert!(matches_verb_set("Said", VerbClass::BRIDGE));
        assert!(matches_verb_set("designed", VerbClass::COPULAR_PASSIVE_ADJ));
        assert!(matches_verb_set("made", VerbClass::CAUSATIVE_PASSIVE));
        assert!(!matches_verb_set("walked", VerbClass::BRIDGE));
    }

    #[test]
    fn linking_ignores_regular_past_cascade() {
        assert!(is_linking("seemed"));
        assert!(is_linking("is"));
        assert!(is_linking("became"));
        assert!(!is_linking("designed"));
    }

    #[test]
    fn participles() {
        assert!(is_past_participle("treated"));
        assert!(is_past_participle("come"));
        assert!(is_past_participle("taken"));
        assert!(!is_past_participle("ten"));
        assert!(is_present_participle("running"));
        assert!(!is_present_participle("king"));
    }

    proptest! {
        #[test]
        fn first_candidate_is_the_word_itself(word in "[a-zA-Z]{1,12}") {
            let bases = candidate_bases(&word);
            prop_assert_eq!(&bases[0], &word.to_lowercase());
        }

        #[test]
        fn lemma_never_grows_regular_words(word in "[a-z]{1,12}") {
            let base = lemma(&word);
            // Only the tabled irregulars and -ies -> -y may change the shape.
            prop_assert!(base.len() <= word.len() || INFLECTIONS.contains_key(word.as_str()));
        }

        #[test]
        fn lemma_is_stable_for_known_bases(idx in 0usize..20) {
            let bases: Vec<&str> = crate::sets::known_verbs().collect();
            let base = bases[idx % bases.len()];
            let once = lemma(base);
            prop_assert_eq!(lemma(&once), once.clone());
        }
    }
}
