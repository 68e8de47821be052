use crate::error::ProtocolError;
use crate::grammar::{ArrowType, ClauseType, Role, SentencePattern};
use crate::ids::{ChainId, ClauseId};
use crate::pos::Span;

/// One role-tagged span of a clause.
///
/// `span == None` marks an elided element: it takes part in gap analysis
/// but has no surface realization and is skipped by every span check.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseElement {
    pub role: Role,
    pub text: String,
    pub span: Option<Span>,
    /// Sub-clause this element stands for.
    pub expands_to: Option<ClauseId>,
    /// Index of the element (same clause) this one modifies.
    pub modifies_index: Option<usize>,
    pub arrow_type: Option<ArrowType>,
    pub v_chain_id: Option<ChainId>,
}

impl ClauseElement {
    pub fn new(role: Role, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self::with_span(role, text, Some(Span::new(start, end)))
    }

    pub fn elided(role: Role, text: impl Into<String>) -> Self {
        Self::with_span(role, text, None)
    }

    pub fn with_span(role: Role, text: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            role,
            text: text.into(),
            span,
            expands_to: None,
            modifies_index: None,
            arrow_type: None,
            v_chain_id: None,
        }
    }

    pub fn expanding(mut self, clause: impl Into<ClauseId>) -> Self {
        self.expands_to = Some(clause.into());
        self
    }

    pub fn modifying(mut self, index: usize) -> Self {
        self.modifies_index = Some(index);
        self
    }

    pub fn is_elided(&self) -> bool {
        self.span.is_none()
    }

    pub fn is_real(&self) -> bool {
        self.span.is_some()
    }

    pub fn start(&self) -> Option<usize> {
        self.span.map(|s| s.start)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }

    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    pub fn first_word_lower(&self) -> Option<String> {
        self.words().next().map(str::to_lowercase)
    }

    pub fn last_word_lower(&self) -> Option<String> {
        self.words().last().map(str::to_lowercase)
    }

    /// True for `to <verb> ...` phrases.
    pub fn is_to_infinitive(&self) -> bool {
        self.text.trim_start().to_lowercase().starts_with("to ")
    }

    /// Whether the declared span slices to exactly `text`.
    pub fn span_matches(&self, sentence: &str) -> bool {
        match self.span {
            Some(span) => span.slice(sentence) == Some(self.text.as_str()),
            None => true,
        }
    }
}

/// Byte offset of the occurrence of `needle` closest to `hint`.
/// Ties go to the earlier occurrence.
pub fn nearest_occurrence(sentence: &str, needle: &str, hint: usize) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    sentence
        .char_indices()
        .map(|(at, _)| at)
        .filter(|&at| sentence[at..].starts_with(needle))
        .min_by_key(|&at| at.abs_diff(hint))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub id: ClauseId,
    pub elements: Vec<ClauseElement>,
    pub pattern: Option<SentencePattern>,
    pub pattern_label: Option<String>,
    pub clause_type: Option<ClauseType>,
    pub type_label: Option<String>,
}

impl Clause {
    pub fn new(id: impl Into<ClauseId>, elements: Vec<ClauseElement>) -> Self {
        Self {
            id: id.into(),
            elements,
            pattern: None,
            pattern_label: None,
            clause_type: None,
            type_label: None,
        }
    }

    pub fn main(elements: Vec<ClauseElement>) -> Self {
        Self::new(ClauseId::main(), elements)
    }

    pub fn typed(mut self, clause_type: ClauseType) -> Self {
        self.clause_type = Some(clause_type);
        self
    }

    pub fn is_main(&self) -> bool {
        self.id.is_main()
    }

    pub fn set_pattern(&mut self, pattern: SentencePattern, label: impl Into<String>) {
        self.pattern = Some(pattern);
        self.pattern_label = Some(label.into());
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.elements.iter().any(|e| e.role == role)
    }

    pub fn has_real_role(&self, role: Role) -> bool {
        self.elements.iter().any(|e| e.role == role && e.is_real())
    }

    pub fn first_index_of(&self, role: Role) -> Option<usize> {
        self.elements.iter().position(|e| e.role == role)
    }

    /// `(index, element)` pairs for non-elided elements.
    pub fn real_elements(&self) -> impl Iterator<Item = (usize, &ClauseElement)> {
        self.elements.iter().enumerate().filter(|(_, e)| e.is_real())
    }

    /// Lowercased last word over every surface V element, i.e. the head of the predicate.
    pub fn main_verb_word(&self) -> Option<String> {
        self.elements
            .iter()
            .filter(|e| e.role == Role::V && e.is_real())
            .flat_map(|e| e.words())
            .last()
            .map(str::to_lowercase)
    }

    /// Inserts at `index`, shifting every `modifies_index` that pointed at or past it.
    pub fn insert_element(&mut self, index: usize, element: ClauseElement) {
        let index = index.min(self.elements.len());
        for e in &mut self.elements {
            if let Some(target) = e.modifies_index.as_mut() {
                if *target >= index {
                    *target += 1;
                }
            }
        }
        self.elements.insert(index, element);
    }

    /// Removes the element at `index`. Links to it are dropped, links past it shift down.
    pub fn remove_element(&mut self, index: usize) -> Option<ClauseElement> {
        if index >= self.elements.len() {
            return None;
        }
        let removed = self.elements.remove(index);
        for e in &mut self.elements {
            match e.modifies_index {
                Some(target) if target == index => e.modifies_index = None,
                Some(target) if target > index => e.modifies_index = Some(target - 1),
                _ => {}
            }
        }
        Some(removed)
    }
}

/// Arena owning every clause of one sentence. The main clause always sits at index 0.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseSet {
    clauses: Vec<Clause>,
}

impl ClauseSet {
    pub fn new(main: Clause, subs: Vec<Clause>) -> Result<Self, ProtocolError> {
        let mut clauses = Vec::with_capacity(subs.len() + 1);
        clauses.push(main);
        clauses.extend(subs);
        Self::from_clauses(clauses)
    }

    pub fn single(main: Clause) -> Self {
        Self { clauses: vec![main] }
    }

    /// Accepts clauses in any order as long as exactly one is `main`.
    pub fn from_clauses(mut clauses: Vec<Clause>) -> Result<Self, ProtocolError> {
        let main_at = clauses
            .iter()
            .position(Clause::is_main)
            .ok_or(ProtocolError::MissingMainClause)?;
        let main = clauses.remove(main_at);
        clauses.insert(0, main);
        for (i, clause) in clauses.iter().enumerate() {
            if clauses[..i].iter().any(|c| c.id == clause.id) {
                return Err(ProtocolError::DuplicateClause(clause.id.to_string()));
            }
        }
        Ok(Self { clauses })
    }

    pub fn main(&self) -> &Clause {
        &self.clauses[0]
    }

    pub fn main_mut(&mut self) -> &mut Clause {
        &mut self.clauses[0]
    }

    pub fn subs(&self) -> &[Clause] {
        &self.clauses[1..]
    }

    pub fn get(&self, id: &str) -> Option<&Clause> {
        self.clauses.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Clause> {
        self.clauses.iter_mut().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_sub_clause(&self, id: &str) -> bool {
        self.subs().iter().any(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Clause> {
        self.clauses.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn into_vec(self) -> Vec<Clause> {
        self.clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_occurrence_prefers_closest() {
        let s = "the cat saw the dog";
        assert_eq!(nearest_occurrence(s, "the", 0), Some(0));
        assert_eq!(nearest_occurrence(s, "the", 13), Some(12));
        assert_eq!(nearest_occurrence(s, "bird", 0), None);
        assert_eq!(nearest_occurrence(s, "", 0), None);
    }

    #[test]
    fn insert_and_remove_keep_links() {
        let mut clause = Clause::main(vec![
            ClauseElement::new(Role::S, "cats", 0, 4),
            ClauseElement::new(Role::V, "sleep", 5, 10),
            ClauseElement::new(Role::M, "soundly", 11, 18).modifying(1),
        ]);
        clause.insert_element(0, ClauseElement::elided(Role::M, "x"));
        assert_eq!(clause.elements[3].modifies_index, Some(2));

        clause.remove_element(2);
        assert_eq!(clause.elements[2].modifies_index, None);
    }

    #[test]
    fn clause_set_moves_main_to_front() {
        let set = ClauseSet::from_clauses(vec![
            Clause::new("sub-1", vec![]),
            Clause::main(vec![]),
        ])
        .unwrap();
        assert!(set.main().is_main());
        assert!(set.is_sub_clause("sub-1"));
        assert!(!set.is_sub_clause("main"));
    }

    #[test]
    fn clause_set_rejects_missing_main_and_duplicates() {
        assert_eq!(
            ClauseSet::from_clauses(vec![Clause::new("sub-1", vec![])]),
            Err(ProtocolError::MissingMainClause)
        );
        let dup = ClauseSet::new(
            Clause::main(vec![]),
            vec![Clause::new("sub-1", vec![]), Clause::new("sub-1", vec![])],
        );
        assert_eq!(dup, Err(ProtocolError::DuplicateClause("sub-1".into())));
    }

    #[test]
    fn main_verb_word_is_last_v_word() {
        let clause = Clause::main(vec![
            ClauseElement::new(Role::S, "It", 0, 2),
            ClauseElement::new(Role::V, "had been Treated", 3, 19),
        ]);
        assert_eq!(clause.main_verb_word().as_deref(), Some("treated"));
    }
}
