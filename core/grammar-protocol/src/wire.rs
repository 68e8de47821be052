//! JSON shapes exchanged with the annotation layer.
//!
//! The draft format uses `startIndex = -1` for elided elements and free-form
//! strings for roles; conversion into the typed model happens here, once.

use serde::{Deserialize, Serialize};

use crate::chain::VChain;
use crate::error::ProtocolError;
use crate::grammar::{ArrowType, ClauseType, Role, SentencePattern};
use crate::ids::{ChainId, ClauseId};
use crate::model::{Clause, ClauseElement, ClauseSet};
use crate::pos::{PosToken, Span};

fn span_from_wire(start: i64, end: i64) -> Result<Option<Span>, ProtocolError> {
    if start < 0 {
        return Ok(None);
    }
    if end < start {
        return Err(ProtocolError::InvalidSpan { start, end });
    }
    Ok(Some(Span::new(start as usize, end as usize)))
}

fn span_to_wire(span: Option<Span>) -> (i64, i64) {
    match span {
        Some(s) => (s.start as i64, s.end as i64),
        None => (-1, -1),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireElement {
    pub role: String,
    pub text: String,
    pub start_index: i64,
    pub end_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expands_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifies_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_chain_id: Option<String>,
}

impl TryFrom<WireElement> for ClauseElement {
    type Error = ProtocolError;

    fn try_from(w: WireElement) -> Result<Self, Self::Error> {
        let role: Role = w.role.parse()?;
        let v_chain_id = match w.v_chain_id {
            Some(id) => Some(ChainId::parse(&id).ok_or(ProtocolError::MalformedChainId(id))?),
            None => None,
        };
        Ok(ClauseElement {
            role,
            span: span_from_wire(w.start_index, w.end_index)?,
            text: w.text,
            expands_to: w.expands_to.filter(|id| !id.is_empty()).map(ClauseId::from),
            modifies_index: w.modifies_index.and_then(|i| usize::try_from(i).ok()),
            arrow_type: w.arrow_type.as_deref().map(ArrowType::parse),
            v_chain_id,
        })
    }
}

impl From<&ClauseElement> for WireElement {
    fn from(e: &ClauseElement) -> Self {
        let (start_index, end_index) = span_to_wire(e.span);
        Self {
            role: e.role.as_str().to_string(),
            text: e.text.clone(),
            start_index,
            end_index,
            expands_to: e.expands_to.as_ref().map(ToString::to_string),
            modifies_index: e.modifies_index.map(|i| i as i64),
            arrow_type: e.arrow_type.as_ref().map(|a| a.as_str().to_string()),
            v_chain_id: e.v_chain_id.map(|id| id.to_string()),
        }
    }
}

fn main_clause_id() -> String {
    ClauseId::MAIN.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireClause {
    #[serde(default = "main_clause_id")]
    pub clause_id: String,
    pub elements: Vec<WireElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_pattern: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_pattern_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_label: Option<String>,
}

impl TryFrom<WireClause> for Clause {
    type Error = ProtocolError;

    fn try_from(w: WireClause) -> Result<Self, Self::Error> {
        let elements = w
            .elements
            .into_iter()
            .map(ClauseElement::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let mut clause = Clause::new(w.clause_id, elements);
        clause.pattern = w.sentence_pattern.map(SentencePattern::from_number).transpose()?;
        clause.pattern_label = w.sentence_pattern_label;
        clause.clause_type = w.clause_type.as_deref().map(str::parse::<ClauseType>).transpose()?;
        clause.type_label = w.type_label;
        Ok(clause)
    }
}

impl From<&Clause> for WireClause {
    fn from(c: &Clause) -> Self {
        Self {
            clause_id: c.id.to_string(),
            elements: c.elements.iter().map(WireElement::from).collect(),
            sentence_pattern: c.pattern.map(SentencePattern::number),
            sentence_pattern_label: c.pattern_label.clone(),
            clause_type: c.clause_type.map(|t| t.as_str().to_string()),
            type_label: c.type_label.clone(),
        }
    }
}

/// A sentence plus the draft produced by the annotation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftAnnotation {
    pub sentence: String,
    pub elements: Vec<WireElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_pattern: Option<u8>,
    #[serde(default)]
    pub sub_clauses: Vec<WireClause>,
}

impl DraftAnnotation {
    pub fn into_clause_set(self) -> Result<(String, ClauseSet), ProtocolError> {
        let main = Clause::try_from(WireClause {
            clause_id: main_clause_id(),
            elements: self.elements,
            sentence_pattern: self.sentence_pattern,
            sentence_pattern_label: None,
            clause_type: None,
            type_label: None,
        })?;
        let subs = self
            .sub_clauses
            .into_iter()
            .map(Clause::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((self.sentence, ClauseSet::new(main, subs)?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireToken {
    pub text: String,
    pub lower: String,
    pub pos: String,
    pub lemma: String,
    pub start_index: usize,
    pub end_index: usize,
}

impl From<&PosToken> for WireToken {
    fn from(t: &PosToken) -> Self {
        Self {
            text: t.text.clone(),
            lower: t.lowercase.clone(),
            pos: t.pos.as_str().to_string(),
            lemma: t.lemma.clone(),
            start_index: t.span.start,
            end_index: t.span.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireParenthetical {
    pub start_index: usize,
    pub end_index: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireChain {
    pub id: String,
    pub text: String,
    pub words: Vec<String>,
    pub start_index: usize,
    pub end_index: usize,
    pub voice: String,
    pub tense: String,
    pub is_finite: bool,
    pub main_verb_lemma: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parenthetical_span: Option<WireParenthetical>,
}

impl From<&VChain> for WireChain {
    fn from(c: &VChain) -> Self {
        Self {
            id: c.id.to_string(),
            text: c.text.clone(),
            words: c.words.clone(),
            start_index: c.span.start,
            end_index: c.span.end,
            voice: c.voice.as_str().to_string(),
            tense: c.tense.as_str().to_string(),
            is_finite: c.is_finite,
            main_verb_lemma: c.main_verb_lemma.clone(),
            parenthetical_span: c.parenthetical.as_ref().map(|p| WireParenthetical {
                start_index: p.span.start,
                end_index: p.span.end,
                text: p.text.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAFT: &str = r#"{
        "sentence": "the book that she bought",
        "elements": [
            {"role": "S", "text": "the book", "startIndex": 0, "endIndex": 8, "expandsTo": "sub-1"}
        ],
        "subClauses": [
            {
                "clauseId": "sub-1",
                "clauseType": "relative",
                "elements": [
                    {"role": "O", "text": "(that)", "startIndex": -1, "endIndex": -1},
                    {"role": "S", "text": "she", "startIndex": 14, "endIndex": 17},
                    {"role": "V", "text": "bought", "startIndex": 18, "endIndex": 24, "vChainId": "vc-0"}
                ]
            }
        ]
    }"#;

    #[test]
    fn draft_converts_elided_and_aliases() {
        let draft: DraftAnnotation = serde_json::from_str(DRAFT).unwrap();
        let (sentence, set) = draft.into_clause_set().unwrap();
        assert_eq!(sentence, "the book that she bought");

        let sub = set.get("sub-1").unwrap();
        assert_eq!(sub.clause_type, Some(ClauseType::Relative));
        assert_eq!(sub.elements[0].role, Role::Od);
        assert!(sub.elements[0].is_elided());
        assert_eq!(sub.elements[2].v_chain_id, Some(ChainId::new(0)));
        assert_eq!(set.main().elements[0].expands_to.as_ref().unwrap(), "sub-1");
    }

    #[test]
    fn elided_span_renders_as_minus_one() {
        let el = ClauseElement::elided(Role::S, "(who)");
        let wire = WireElement::from(&el);
        assert_eq!((wire.start_index, wire.end_index), (-1, -1));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let wire = WireElement {
            role: "Subject".into(),
            text: "x".into(),
            start_index: 0,
            end_index: 1,
            expands_to: None,
            modifies_index: None,
            arrow_type: None,
            v_chain_id: None,
        };
        assert_eq!(
            ClauseElement::try_from(wire),
            Err(ProtocolError::UnknownRole("Subject".into()))
        );
    }
}
