use core::fmt;
use core::str::FromStr;

use crate::error::ProtocolError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closed part-of-speech tag set shared by every tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PartOfSpeech {
    Aux = 0,
    Verb = 1,
    Noun = 2,
    Pron = 3,
    Adj = 4,
    Adv = 5,
    Adp = 6,
    Sconj = 7,
    Cconj = 8,
    Part = 9,
    Punct = 10,
    Det = 11,
    Num = 12,
    Other = 13,
}

impl PartOfSpeech {
    pub fn as_str(self) -> &'static str {
        match self {
            PartOfSpeech::Aux => "AUX",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::Pron => "PRON",
            PartOfSpeech::Adj => "ADJ",
            PartOfSpeech::Adv => "ADV",
            PartOfSpeech::Adp => "ADP",
            PartOfSpeech::Sconj => "SCONJ",
            PartOfSpeech::Cconj => "CCONJ",
            PartOfSpeech::Part => "PART",
            PartOfSpeech::Punct => "PUNCT",
            PartOfSpeech::Det => "DET",
            PartOfSpeech::Num => "NUM",
            PartOfSpeech::Other => "OTHER",
        }
    }

    /// Tags that can stand inside a noun phrase (used by inversion detection).
    pub fn is_nominal(self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::Pron | PartOfSpeech::Det)
    }

    /// Lemmas are only computed for these.
    pub fn is_verbal(self) -> bool {
        matches!(self, PartOfSpeech::Verb | PartOfSpeech::Aux)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartOfSpeech {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "AUX" => PartOfSpeech::Aux,
            "VERB" => PartOfSpeech::Verb,
            "NOUN" => PartOfSpeech::Noun,
            "PRON" => PartOfSpeech::Pron,
            "ADJ" => PartOfSpeech::Adj,
            "ADV" => PartOfSpeech::Adv,
            "ADP" => PartOfSpeech::Adp,
            "SCONJ" => PartOfSpeech::Sconj,
            "CCONJ" => PartOfSpeech::Cconj,
            "PART" => PartOfSpeech::Part,
            "PUNCT" => PartOfSpeech::Punct,
            "DET" => PartOfSpeech::Det,
            "NUM" => PartOfSpeech::Num,
            "OTHER" => PartOfSpeech::Other,
            other => return Err(ProtocolError::UnknownPartOfSpeech(other.to_string())),
        })
    }
}

/// Grammatical role of a clause element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Role {
    /// Subject
    S = 0,
    /// Verb (a single word or a whole V-chain)
    V = 1,
    /// Direct object
    Od = 2,
    /// Indirect object
    Oi = 3,
    /// Complement
    C = 4,
    /// Obligatory verbal complement ("came to dominate", "seems to be")
    Comp = 5,
    /// Modifier
    M = 6,
    /// Parenthetical insertion, exempt from modifier linking
    Insert = 7,
    /// Complementizer ("that", "whether", "if")
    Compz = 8,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::S => "S",
            Role::V => "V",
            Role::Od => "Od",
            Role::Oi => "Oi",
            Role::C => "C",
            Role::Comp => "Comp",
            Role::M => "M",
            Role::Insert => "Insert",
            Role::Compz => "Compz",
        }
    }

    /// `Comp` satisfies a complement slot wherever `C` would.
    pub fn is_complement(self) -> bool {
        matches!(self, Role::C | Role::Comp)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the canonical abbreviations plus the long-hand variants that
/// draft annotations tend to produce (`O`, `Complement`, `Parenthetical`, ...).
impl FromStr for Role {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "S" => Role::S,
            "V" => Role::V,
            "Od" | "O" => Role::Od,
            "Oi" => Role::Oi,
            "C" => Role::C,
            "Comp" | "Complement" => Role::Comp,
            "M" => Role::M,
            "Insert" | "Insertion" | "Parenthetical" => Role::Insert,
            "Compz" | "Complementizer" => Role::Compz,
            other => return Err(ProtocolError::UnknownRole(other.to_string())),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Voice {
    Active = 0,
    Passive = 1,
}

impl Voice {
    pub fn as_str(self) -> &'static str {
        match self {
            Voice::Active => "active",
            Voice::Passive => "passive",
        }
    }
}

/// Tense reading of a V-chain, derived from which auxiliaries it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum Tense {
    Modal = 0,
    PastPerfect = 1,
    PresentPerfect = 2,
    Past = 3,
    Present = 4,
    PastEmphatic = 5,
    Simple = 6,
}

impl Tense {
    pub fn as_str(self) -> &'static str {
        match self {
            Tense::Modal => "modal",
            Tense::PastPerfect => "past_perfect",
            Tense::PresentPerfect => "present_perfect",
            Tense::Past => "past",
            Tense::Present => "present",
            Tense::PastEmphatic => "past_emphatic",
            Tense::Simple => "simple",
        }
    }
}

/// The five canonical English clause shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum SentencePattern {
    Sv = 1,
    Svc = 2,
    Svo = 3,
    Svoo = 4,
    Svoc = 5,
}

impl SentencePattern {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Result<Self, ProtocolError> {
        Ok(match n {
            1 => SentencePattern::Sv,
            2 => SentencePattern::Svc,
            3 => SentencePattern::Svo,
            4 => SentencePattern::Svoo,
            5 => SentencePattern::Svoc,
            other => return Err(ProtocolError::PatternOutOfRange(other)),
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            SentencePattern::Sv => "第1文型 (SV)",
            SentencePattern::Svc => "第2文型 (SVC)",
            SentencePattern::Svo => "第3文型 (SVO)",
            SentencePattern::Svoo => "第4文型 (SVOO)",
            SentencePattern::Svoc => "第5文型 (SVOC)",
        }
    }

    /// Label used when the complement slot is filled by `Comp` rather than `C`.
    pub fn comp_label(self) -> Option<&'static str> {
        match self {
            SentencePattern::Svc => Some("第2文型 (SV+Comp)"),
            SentencePattern::Svoc => Some("第5文型 (SVO+Comp)"),
            _ => None,
        }
    }
}

impl fmt::Display for SentencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Grammatical function of a to-infinitive phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum InfFunction {
    Purpose,
    Result,
    Complement,
    Object,
    Subject,
    NounModifier,
}

impl InfFunction {
    pub fn as_str(self) -> &'static str {
        match self {
            InfFunction::Purpose => "purpose",
            InfFunction::Result => "result",
            InfFunction::Complement => "complement",
            InfFunction::Object => "object",
            InfFunction::Subject => "subject",
            InfFunction::NounModifier => "noun_modifier",
        }
    }
}

impl fmt::Display for InfFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asserted kind of a sub-clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum ClauseType {
    Relative,
    Noun,
    Adverbial,
    Other,
}

impl ClauseType {
    pub fn as_str(self) -> &'static str {
        match self {
            ClauseType::Relative => "relative",
            ClauseType::Noun => "noun",
            ClauseType::Adverbial => "adverbial",
            ClauseType::Other => "other",
        }
    }
}

impl FromStr for ClauseType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "relative" => ClauseType::Relative,
            "noun" => ClauseType::Noun,
            "adverbial" => ClauseType::Adverbial,
            "other" => ClauseType::Other,
            other => return Err(ProtocolError::UnknownClauseType(other.to_string())),
        })
    }
}

/// Rendering hint for the arc drawn from an element to its target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrowType {
    Modifies,
    Complement,
    Insertion,
    Other(String),
}

impl ArrowType {
    pub fn as_str(&self) -> &str {
        match self {
            ArrowType::Modifies => "modifies",
            ArrowType::Complement => "complement",
            ArrowType::Insertion => "insertion",
            ArrowType::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "modifies" => ArrowType::Modifies,
            "complement" => ArrowType::Complement,
            "insertion" => ArrowType::Insertion,
            other => ArrowType::Other(other.to_string()),
        }
    }
}

/// The role a gap stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GapRole {
    S,
    Od,
    C,
}

impl GapRole {
    pub fn as_role(self) -> Role {
        match self {
            GapRole::S => Role::S,
            GapRole::Od => Role::Od,
            GapRole::C => Role::C,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.as_role().as_str()
    }
}

impl fmt::Display for GapRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
