use crate::grammar::PartOfSpeech;

/// Half-open byte range `[start, end)` into the analysed sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    #[cfg_attr(feature = "serde", serde(rename = "startIndex"))]
    pub start: usize,
    #[cfg_attr(feature = "serde", serde(rename = "endIndex"))]
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn at(start: usize, text: &str) -> Self {
        Self { start, end: start + text.len() }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `None` when the range is out of bounds or splits a character.
    pub fn slice<'s>(&self, sentence: &'s str) -> Option<&'s str> {
        sentence.get(self.start..self.end)
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// One tagged surface token. Produced by a tokenizer, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosToken {
    pub text: String,
    pub lowercase: String,
    pub pos: PartOfSpeech,
    pub lemma: String,
    pub span: Span,
}

impl PosToken {
    pub fn new(text: impl Into<String>, pos: PartOfSpeech, lemma: impl Into<String>, start: usize) -> Self {
        let text = text.into();
        let span = Span::at(start, &text);
        Self {
            lowercase: text.to_lowercase(),
            lemma: lemma.into(),
            text,
            pos,
            span,
        }
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn is_punct(&self) -> bool {
        self.pos == PartOfSpeech::Punct
    }
}
