use bitflags::bitflags;

use grammar_protocol::Span;

bitflags! {
    /// Candidate tags a tagger attaches to a term before the part-of-speech cascade picks one.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Tags: u32 {
        const AUXILIARY   = 1 << 0;
        const COPULA      = 1 << 1;
        const VERB        = 1 << 2;
        const PRONOUN     = 1 << 3;
        const NOUN        = 1 << 4;
        const SINGULAR    = 1 << 5;
        const PLURAL      = 1 << 6;
        const UNCOUNTABLE = 1 << 7;
        const PROPER_NOUN = 1 << 8;
        const ADJECTIVE   = 1 << 9;
        const COMPARABLE  = 1 << 10;
        const ADVERB      = 1 << 11;
        const CARDINAL    = 1 << 12;
        const ORDINAL     = 1 << 13;
        const NUMERIC     = 1 << 14;
        const DETERMINER  = 1 << 15;
        const PREPOSITION = 1 << 16;
        const CONJUNCTION = 1 << 17;
        const DATE        = 1 << 18;
        const TIME        = 1 << 19;
        const PUNCTUATION = 1 << 20;

        const ANY_VERB = Self::VERB.bits() | Self::COPULA.bits();
        const ANY_NOUN = Self::NOUN.bits() | Self::SINGULAR.bits() | Self::PLURAL.bits()
            | Self::UNCOUNTABLE.bits() | Self::PROPER_NOUN.bits();
        const ANY_NUMBER = Self::CARDINAL.bits() | Self::ORDINAL.bits() | Self::NUMERIC.bits();
    }
}

/// One term as a tagger sees it: surface text, byte span, candidate tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedTerm<'a> {
    pub span: Span,
    pub text: &'a str,
    pub tags: Tags,
}

impl<'a> TaggedTerm<'a> {
    pub fn new(span: Span, text: &'a str, tags: Tags) -> Self {
        Self { span, text, tags }
    }

    pub fn has(&self, tags: Tags) -> bool {
        self.tags.intersects(tags)
    }
}
