//! Verb-chain resolution over a tagged token stream.

use std::collections::HashSet;
use std::fmt::Write as _;

use tracing::debug;

use grammar_lexicon::{is_aux, is_be_form, is_modal, is_past_participle, is_present_participle, lemma};
use grammar_protocol::{
    ChainId, Inversion, Parenthetical, PosToken, Span, Tense, VChain, VChainResult, Voice,
};

/// Longest run of tokens a parenthetical insertion may span.
pub const MAX_PARENTHETICAL_TOKENS: usize = 15;

fn is_clause_break(token: &PosToken) -> bool {
    matches!(token.text.as_str(), ";" | "." | "!" | "?")
}

fn is_structural_punct(token: &PosToken) -> bool {
    matches!(token.text.as_str(), "," | ";" | "." | "!" | "?")
}

fn is_participle(token: &PosToken) -> bool {
    is_past_participle(&token.lowercase) || is_present_participle(&token.lowercase)
}

fn is_negation(token: &PosToken) -> bool {
    matches!(token.lowercase.as_str(), "not" | "n't")
}

fn is_do_form(token: &PosToken) -> bool {
    matches!(token.lowercase.as_str(), "do" | "does" | "did")
}

struct ParentheticalSkip {
    verb_idx: usize,
    span: Span,
}

/// Scans tokens for auxiliary chains, inversions and parenthetical splits.
#[derive(Debug, Clone, Copy)]
pub struct ChainResolver {
    max_parenthetical_tokens: usize,
}

impl Default for ChainResolver {
    fn default() -> Self {
        Self { max_parenthetical_tokens: MAX_PARENTHETICAL_TOKENS }
    }
}

impl ChainResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parenthetical_limit(mut self, limit: usize) -> Self {
        self.max_parenthetical_tokens = limit;
        self
    }

    /// Auxiliary followed by a nominal run and then something verb-like:
    /// the subject sits between the auxiliary and its verb.
    fn has_inversion_gap(&self, tokens: &[PosToken], aux_idx: usize) -> bool {
        let mut j = aux_idx + 1;
        if !tokens.get(j).is_some_and(|t| t.pos.is_nominal()) {
            return false;
        }
        while tokens.get(j).is_some_and(|t| t.pos.is_nominal()) {
            j += 1;
        }
        match tokens.get(j) {
            Some(next) => {
                is_participle(next) || (!is_aux(&next.lowercase) && !is_structural_punct(next))
            }
            None => false,
        }
    }

    /// From the comma at `comma_idx`, look for a closing comma followed by a verbal token.
    fn try_skip_parenthetical(&self, tokens: &[PosToken], comma_idx: usize) -> Option<ParentheticalSkip> {
        let limit = (comma_idx + self.max_parenthetical_tokens).min(tokens.len());
        for k in comma_idx + 1..limit {
            let token = &tokens[k];
            if matches!(token.text.as_str(), "." | ";" | "!" | "?") {
                return None;
            }
            if token.text == "," {
                let next = tokens.get(k + 1)?;
                if is_participle(next) || is_aux(&next.lowercase) {
                    return Some(ParentheticalSkip {
                        verb_idx: k + 1,
                        span: Span::new(tokens[comma_idx].start(), token.end()),
                    });
                }
                return None;
            }
        }
        None
    }

    pub fn resolve(&self, tokens: &[PosToken]) -> VChainResult {
        let mut chains: Vec<VChain> = Vec::new();
        let mut inversions: Vec<Inversion> = Vec::new();
        let mut consumed: HashSet<usize> = HashSet::new();

        for (i, t) in tokens.iter().enumerate() {
            if consumed.contains(&i) || !(is_aux(&t.lowercase) || is_modal(&t.lowercase)) {
                continue;
            }

            if self.has_inversion_gap(tokens, i) {
                debug!(aux = %t.text, start = t.start(), "subject-auxiliary inversion");
                inversions.push(Inversion { aux: t.text.clone(), span: t.span });
                continue;
            }

            let mut members: Vec<usize> = vec![i];
            let mut parenthetical: Option<Parenthetical> = None;
            let mut found_main = false;
            let mut j = i + 1;

            while j < tokens.len() {
                let next = &tokens[j];

                if is_clause_break(next) {
                    break;
                }

                if next.text == "," {
                    if !found_main {
                        if let Some(skip) = self.try_skip_parenthetical(tokens, j) {
                            let verb = &tokens[skip.verb_idx];
                            let text = tokens[j..skip.verb_idx]
                                .iter()
                                .map(|pt| pt.text.as_str())
                                .collect::<Vec<_>>()
                                .join(" ");
                            members.push(skip.verb_idx);
                            parenthetical = Some(Parenthetical { span: skip.span, text });
                            if is_participle(verb) {
                                found_main = true;
                                break;
                            }
                            // auxiliary after the insertion keeps the chain open
                            j = skip.verb_idx + 1;
                            continue;
                        }
                    }
                    break;
                }

                if is_aux(&next.lowercase) {
                    members.push(j);
                    j += 1;
                    continue;
                }

                if is_participle(next) {
                    members.push(j);
                    found_main = true;
                    break;
                }

                // Interrupting adverb or negation: skip when a verbal token follows.
                if let Some(after) = tokens.get(j + 1) {
                    if is_aux(&after.lowercase) || is_participle(after) {
                        j += 1;
                        continue;
                    }
                }
                if is_negation(next) {
                    j += 1;
                    continue;
                }

                break;
            }

            // Bare auxiliary: do-support or modal + base form.
            if !found_main && members.len() == 1 {
                let mut next_idx = i + 1;
                while tokens.get(next_idx).is_some_and(is_negation) {
                    next_idx += 1;
                }
                if let Some(next) = tokens.get(next_idx) {
                    let verbal_next = !is_aux(&next.lowercase) && !is_structural_punct(next);
                    if is_do_form(t) && verbal_next && !is_past_participle(&next.lowercase) {
                        members.push(next_idx);
                    } else if is_modal(&t.lowercase) && verbal_next {
                        members.push(next_idx);
                    }
                }
            }

            if members.len() < 2 {
                continue;
            }
            consumed.extend(members.iter().copied());

            let chain = build_chain(ChainId::new(chains.len() as u32), tokens, &members, parenthetical);
            debug!(
                chain = %chain.text,
                voice = chain.voice.as_str(),
                tense = chain.tense.as_str(),
                discontinuous = chain.is_discontinuous(),
                "v-chain"
            );
            chains.push(chain);
        }

        let summary = render_summary(&chains, &inversions);
        VChainResult { chains, inversions, summary }
    }
}

fn build_chain(
    id: ChainId,
    tokens: &[PosToken],
    members: &[usize],
    parenthetical: Option<Parenthetical>,
) -> VChain {
    let words: Vec<String> = members.iter().map(|&m| tokens[m].text.clone()).collect();
    let lowers: Vec<&str> = members.iter().map(|&m| tokens[m].lowercase.as_str()).collect();
    let first = &tokens[members[0]];
    let last = &tokens[members[members.len() - 1]];

    let voice = if is_past_participle(&last.lowercase) && lowers.iter().any(|w| is_be_form(w)) {
        Voice::Passive
    } else {
        Voice::Active
    };

    VChain {
        id,
        text: words.join(" "),
        span: Span::new(first.start(), last.end()),
        voice,
        tense: infer_tense(&lowers),
        is_finite: true,
        main_verb_lemma: lemma(&last.lowercase),
        words,
        parenthetical,
    }
}

/// Tense from the auxiliaries present, first match wins.
pub fn infer_tense(words: &[&str]) -> Tense {
    let any = |set: &[&str]| words.iter().any(|w| set.contains(w));
    let has_be = words.iter().any(|w| is_be_form(w));
    let has_had = any(&["had"]);

    if words.iter().any(|w| is_modal(w)) {
        Tense::Modal
    } else if has_had && !has_be {
        Tense::PastPerfect
    } else if any(&["have", "has"]) && !has_be && !has_had {
        Tense::PresentPerfect
    } else if any(&["was", "were"]) {
        Tense::Past
    } else if any(&["am", "is", "are"]) {
        Tense::Present
    } else if any(&["did"]) {
        Tense::PastEmphatic
    } else {
        Tense::Simple
    }
}

fn render_summary(chains: &[VChain], inversions: &[Inversion]) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !chains.is_empty() {
        let mut section = String::from("Contiguous V-chains (each = one V element):");
        for (i, c) in chains.iter().enumerate() {
            let _ = write!(
                section,
                "\n  V-chain {}: \"{}\" [{},{}) → single V element ({}, {})",
                i + 1,
                c.text,
                c.span.start,
                c.span.end,
                c.voice.as_str(),
                c.tense.as_str()
            );
            if let (Some(p), Some(first), Some(last)) = (&c.parenthetical, c.first_word(), c.last_word()) {
                let _ = write!(
                    section,
                    "\n    ⚠ DISCONTINUOUS: parenthetical insertion separates the V-chain. \
                     Create THREE elements: V:\"{first}\", M:\"{}\", V:\"{last}\". \
                     Do NOT combine into one V element.",
                    p.text
                );
            }
        }
        parts.push(section);
    }

    if !inversions.is_empty() {
        let mut section =
            String::from("Subject-auxiliary inversions (MUST be separate V elements, NEVER combine):");
        for inv in inversions {
            let _ = write!(
                section,
                "\n  INVERSION: \"{}\" at [{},{}) is SEPARATED from its main verb by the subject. \
                 Create SEPARATE V elements (V1:\"{}\", V2:main verb).",
                inv.aux, inv.span.start, inv.span.end, inv.aux
            );
        }
        parts.push(section);
    }

    parts.join("\n\n")
}

/// Resolves chains with the default parenthetical limit.
pub fn resolve_vchains(tokens: &[PosToken]) -> VChainResult {
    ChainResolver::default().resolve(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{RuleTokenizer, Tokenize};

    fn resolve(sentence: &str) -> VChainResult {
        resolve_vchains(&RuleTokenizer::default().tokenize(sentence))
    }

    #[test]
    fn contiguous_passive_chain() {
        let result = resolve("The patient had been treated carefully.");
        assert_eq!(result.chains.len(), 1);
        let chain = &result.chains[0];
        assert_eq!(chain.words, vec!["had", "been", "treated"]);
        assert_eq!(chain.voice, Voice::Passive);
        assert_eq!(chain.tense, Tense::Simple);
        assert_eq!(chain.main_verb_lemma, "treated");
        assert_eq!(chain.id, ChainId::new(0));
        assert!(result.summary.starts_with("Contiguous V-chains"));
    }

    #[test]
    fn inversion_is_not_a_chain() {
        let result = resolve("Rarely did the committee acknowledge that");
        assert!(result.chains.is_empty());
        assert_eq!(result.inversions.len(), 1);
        assert_eq!(result.inversions[0].aux, "did");
        assert_eq!(result.inversions[0].span, Span::new(7, 10));
        assert!(result.summary.contains("INVERSION: \"did\" at [7,10)"));
    }

    #[test]
    fn parenthetical_insertion_gives_discontinuous_chain() {
        let sentence = "She had, once codified into procedure, come to dominate";
        let result = resolve(sentence);
        assert_eq!(result.chains.len(), 1);
        let chain = &result.chains[0];
        assert_eq!(chain.words, vec!["had", "come"]);
        let paren = chain.parenthetical.as_ref().unwrap();
        assert_eq!(paren.span.slice(sentence), Some(", once codified into procedure,"));
        assert_eq!(paren.text, ", once codified into procedure ,");
        assert!(result.summary.contains("DISCONTINUOUS"));
    }

    #[test]
    fn modal_and_do_support() {
        let result = resolve("You must leave. He did not know.");
        let words: Vec<Vec<String>> = result.chains.iter().map(|c| c.words.clone()).collect();
        assert_eq!(words, vec![vec!["must".to_string(), "leave".to_string()], vec!["did".to_string(), "know".to_string()]]);
        assert_eq!(result.chains[0].tense, Tense::Modal);
        assert_eq!(result.chains[1].tense, Tense::PastEmphatic);
    }

    #[test]
    fn adverb_inside_chain_is_skipped() {
        let result = resolve("It has already been done");
        assert_eq!(result.chains[0].words, vec!["has", "been", "done"]);
        assert_eq!(result.chains[0].tense, Tense::Simple);
    }

    #[test]
    fn lone_auxiliary_yields_nothing() {
        let result = resolve("It is.");
        assert!(result.is_empty());
        assert_eq!(result.summary, "");
    }

    #[test]
    fn auxiliary_is_never_in_both_a_chain_and_an_inversion() {
        let result = resolve("Had the men been warned, they would have left.");
        let inverted: HashSet<usize> = result.inversions.iter().map(|i| i.span.start).collect();
        for chain in &result.chains {
            assert!(!inverted.contains(&chain.span.start));
        }
    }

    #[test]
    fn tense_precedence() {
        assert_eq!(infer_tense(&["will", "have", "been"]), Tense::Modal);
        assert_eq!(infer_tense(&["had", "gone"]), Tense::PastPerfect);
        assert_eq!(infer_tense(&["has", "gone"]), Tense::PresentPerfect);
        assert_eq!(infer_tense(&["was", "taken"]), Tense::Past);
        assert_eq!(infer_tense(&["is", "taken"]), Tense::Present);
        assert_eq!(infer_tense(&["did", "go"]), Tense::PastEmphatic);
    }
}
