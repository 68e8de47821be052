use crate::grammar::{Tense, Voice};
use crate::ids::ChainId;
use crate::pos::Span;

/// Material skipped between the auxiliary and the main verb of a discontinuous chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parenthetical {
    pub span: Span,
    pub text: String,
}

/// Auxiliary + main verb sequence acting as one predicate ("had been treated").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VChain {
    pub id: ChainId,
    pub text: String,
    pub words: Vec<String>,
    /// From the first word's start to the last word's end, parenthetical included.
    pub span: Span,
    pub voice: Voice,
    pub tense: Tense,
    pub is_finite: bool,
    pub main_verb_lemma: String,
    pub parenthetical: Option<Parenthetical>,
}

impl VChain {
    pub fn is_discontinuous(&self) -> bool {
        self.parenthetical.is_some()
    }

    pub fn first_word(&self) -> Option<&str> {
        self.words.first().map(String::as_str)
    }

    pub fn last_word(&self) -> Option<&str> {
        self.words.last().map(String::as_str)
    }
}

/// Auxiliary separated from its main verb by the subject ("did the committee acknowledge").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inversion {
    pub aux: String,
    pub span: Span,
}

/// Everything the resolver found in one sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VChainResult {
    pub chains: Vec<VChain>,
    pub inversions: Vec<Inversion>,
    /// Human-readable description handed back to the annotation step.
    pub summary: String,
}

impl VChainResult {
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty() && self.inversions.is_empty()
    }

    pub fn chain(&self, id: ChainId) -> Option<&VChain> {
        self.chains.iter().find(|c| c.id == id)
    }

    /// The chain whose span covers `offset`, if any.
    pub fn chain_at(&self, offset: usize) -> Option<&VChain> {
        self.chains
            .iter()
            .find(|c| c.span.start <= offset && offset < c.span.end)
    }
}
