use core::fmt;

use crate::grammar::GapRole;
use crate::ids::ClauseId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum Severity {
    Error,
    Warning,
}

/// Structural rules a certified parse must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InvariantId {
    /// A clause with content must contain a V.
    #[cfg_attr(feature = "serde", serde(rename = "INV_01"))]
    Inv01,
    /// A finite main clause needs a subject.
    #[cfg_attr(feature = "serde", serde(rename = "INV_02"))]
    Inv02,
    /// V text must be a contiguous substring of the sentence.
    #[cfg_attr(feature = "serde", serde(rename = "INV_03"))]
    Inv03,
    /// Surface spans must not overlap.
    #[cfg_attr(feature = "serde", serde(rename = "INV_04"))]
    Inv04,
    /// Auxiliaries belong to V.
    #[cfg_attr(feature = "serde", serde(rename = "INV_06"))]
    Inv06,
    /// Declared pattern must agree with the roles present.
    #[cfg_attr(feature = "serde", serde(rename = "INV_07"))]
    Inv07,
    /// `expandsTo` must resolve to a sub-clause.
    #[cfg_attr(feature = "serde", serde(rename = "INV_08"))]
    Inv08,
    /// A span must slice to its text.
    #[cfg_attr(feature = "serde", serde(rename = "INV_09"))]
    Inv09,
    /// The `expandsTo` graph must be acyclic.
    #[cfg_attr(feature = "serde", serde(rename = "INV_10"))]
    Inv10,
    /// A modifier should name its target.
    #[cfg_attr(feature = "serde", serde(rename = "INV_14"))]
    Inv14,
    /// A that-clause object must carry its own finite verb.
    #[cfg_attr(feature = "serde", serde(rename = "INV_15"))]
    Inv15,
}

impl InvariantId {
    pub fn as_str(self) -> &'static str {
        match self {
            InvariantId::Inv01 => "INV_01",
            InvariantId::Inv02 => "INV_02",
            InvariantId::Inv03 => "INV_03",
            InvariantId::Inv04 => "INV_04",
            InvariantId::Inv06 => "INV_06",
            InvariantId::Inv07 => "INV_07",
            InvariantId::Inv08 => "INV_08",
            InvariantId::Inv09 => "INV_09",
            InvariantId::Inv10 => "INV_10",
            InvariantId::Inv14 => "INV_14",
            InvariantId::Inv15 => "INV_15",
        }
    }
}

impl fmt::Display for InvariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct Violation {
    pub invariant_id: InvariantId,
    pub severity: Severity,
    pub recoverable: bool,
    pub message: String,
    pub clause_id: ClauseId,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub element_index: Option<usize>,
}

impl Violation {
    pub fn error(
        invariant_id: InvariantId,
        recoverable: bool,
        clause_id: &ClauseId,
        element_index: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            invariant_id,
            severity: Severity::Error,
            recoverable,
            message: message.into(),
            clause_id: clause_id.clone(),
            element_index,
        }
    }

    pub fn warning(
        invariant_id: InvariantId,
        clause_id: &ClauseId,
        element_index: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            invariant_id,
            severity: Severity::Warning,
            recoverable: false,
            message: message.into(),
            clause_id: clause_id.clone(),
            element_index,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Valid iff no violation has error severity.
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        let valid = !violations.iter().any(Violation::is_error);
        Self { valid, violations }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| !v.is_error())
    }

    pub fn unrecoverable_errors(&self) -> impl Iterator<Item = &Violation> {
        self.errors().filter(|v| !v.recoverable)
    }

    pub fn recoverable_errors(&self) -> impl Iterator<Item = &Violation> {
        self.errors().filter(|v| v.recoverable)
    }

    pub fn has(&self, invariant: InvariantId) -> bool {
        self.violations.iter().any(|v| v.invariant_id == invariant)
    }
}

/// Structural fix the repair loop can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RepairKind {
    #[cfg_attr(feature = "serde", serde(rename = "split_noncontiguous_v"))]
    SplitNoncontiguousV,
    #[cfg_attr(feature = "serde", serde(rename = "reassign_role"))]
    ReassignRole,
    #[cfg_attr(feature = "serde", serde(rename = "insert_elided_subject"))]
    InsertElidedSubject,
    #[cfg_attr(feature = "serde", serde(rename = "fix_charspan"))]
    FixCharspan,
    #[cfg_attr(feature = "serde", serde(rename = "merge_span"))]
    MergeSpan,
    #[cfg_attr(feature = "serde", serde(rename = "recompute_pattern"))]
    RecomputePattern,
    #[cfg_attr(feature = "serde", serde(rename = "relink_expandsTo"))]
    RelinkExpandsTo,
}

impl RepairKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RepairKind::SplitNoncontiguousV => "split_noncontiguous_v",
            RepairKind::ReassignRole => "reassign_role",
            RepairKind::InsertElidedSubject => "insert_elided_subject",
            RepairKind::FixCharspan => "fix_charspan",
            RepairKind::MergeSpan => "merge_span",
            RepairKind::RecomputePattern => "recompute_pattern",
            RepairKind::RelinkExpandsTo => "relink_expandsTo",
        }
    }
}

impl fmt::Display for RepairKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit record of one mutation. `before`/`after` are rendered snapshots of the touched fields.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct RepairAction {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: RepairKind,
    pub clause_id: ClauseId,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub element_index: Option<usize>,
    pub before: String,
    pub after: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct RepairLog {
    pub actions: Vec<RepairAction>,
    /// Fixes applied after the first iteration, i.e. enabled by an earlier fix.
    pub cascade_count: usize,
}

impl RepairLog {
    pub fn of_kind(&self, kind: RepairKind) -> impl Iterator<Item = &RepairAction> {
        self.actions.iter().filter(move |a| a.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct GapInfo {
    pub has_gap: bool,
    pub gap_role: Option<GapRole>,
    pub confidence: f64,
    pub is_long_distance: bool,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub bridge_verb: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub gap_clause_id: Option<ClauseId>,
}

impl GapInfo {
    pub fn none(confidence: f64) -> Self {
        Self {
            has_gap: false,
            gap_role: None,
            confidence,
            is_long_distance: false,
            bridge_verb: None,
            gap_clause_id: None,
        }
    }

    pub fn local(role: GapRole, confidence: f64) -> Self {
        Self {
            has_gap: true,
            gap_role: Some(role),
            ..Self::none(confidence)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum TestName {
    AuxInVChain,
    FiniteVerbExists,
    PatternConsistency,
    RelativeGap,
    NounClauseCompleteness,
    ToInfFunction,
    SpanExactMatch,
    #[cfg_attr(feature = "serde", serde(rename = "expandsTo_integrity"))]
    ExpandsToIntegrity,
    MHasTarget,
}

impl TestName {
    pub fn as_str(self) -> &'static str {
        match self {
            TestName::AuxInVChain => "aux_in_v_chain",
            TestName::FiniteVerbExists => "finite_verb_exists",
            TestName::PatternConsistency => "pattern_consistency",
            TestName::RelativeGap => "relative_gap",
            TestName::NounClauseCompleteness => "noun_clause_completeness",
            TestName::ToInfFunction => "to_inf_function",
            TestName::SpanExactMatch => "span_exact_match",
            TestName::ExpandsToIntegrity => "expandsTo_integrity",
            TestName::MHasTarget => "m_has_target",
        }
    }
}

impl fmt::Display for TestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum TestStatus {
    Pass,
    Fail,
    Warn,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct SyntaxTestEvidence {
    pub test_name: TestName,
    pub status: TestStatus,
    pub clause_id: ClauseId,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub element_index: Option<usize>,
    pub message: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub evidence_text: Option<String>,
    pub rule_id: String,
    pub confidence: f64,
}
