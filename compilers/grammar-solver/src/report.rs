//! JSON report of an [`Analysis`], in the draft annotation's wire shape.

use serde::Serialize;

use grammar_protocol::wire::{WireChain, WireClause, WireToken};
use grammar_protocol::{RepairLog, SyntaxTestEvidence, ValidationReport};

use crate::pipeline::Analysis;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InversionReport {
    pub aux: String,
    pub start_index: usize,
    pub end_index: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub sentence: String,
    pub valid: bool,
    pub clauses: Vec<WireClause>,
    pub tokens: Vec<WireToken>,
    pub v_chains: Vec<WireChain>,
    pub inversions: Vec<InversionReport>,
    pub prompt_summary: String,
    pub validation: ValidationReport,
    pub repair_log: RepairLog,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub syntax_tests: Vec<SyntaxTestEvidence>,
}

impl AnalysisReport {
    pub fn new(sentence: &str, analysis: &Analysis) -> Self {
        Self {
            sentence: sentence.to_string(),
            valid: analysis.report.valid,
            clauses: analysis.clauses.iter().map(WireClause::from).collect(),
            tokens: analysis.tokens.iter().map(WireToken::from).collect(),
            v_chains: analysis.vchains.chains.iter().map(WireChain::from).collect(),
            inversions: analysis
                .vchains
                .inversions
                .iter()
                .map(|inv| InversionReport {
                    aux: inv.aux.clone(),
                    start_index: inv.span.start,
                    end_index: inv.span.end,
                })
                .collect(),
            prompt_summary: analysis.vchains.summary.clone(),
            validation: analysis.report.clone(),
            repair_log: analysis.log.clone(),
            syntax_tests: analysis.evidence.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analyze, EngineConfig};
    use grammar_protocol::wire::DraftAnnotation;

    #[test]
    fn test_report_uses_wire_names() {
        let draft: DraftAnnotation = serde_json::from_str(
            r#"{
                "sentence": "Rarely did the committee acknowledge that",
                "elements": [
                    {"role": "M", "text": "Rarely", "startIndex": 0, "endIndex": 6},
                    {"role": "M", "text": "did", "startIndex": 7, "endIndex": 10},
                    {"role": "S", "text": "the committee", "startIndex": 11, "endIndex": 24},
                    {"role": "V", "text": "acknowledge", "startIndex": 25, "endIndex": 36},
                    {"role": "O", "text": "that", "startIndex": 37, "endIndex": 41}
                ]
            }"#,
        )
        .unwrap();
        let (sentence, clauses) = draft.into_clause_set().unwrap();
        let analysis = analyze(&sentence, clauses, None, None, &EngineConfig::default());
        let json = serde_json::to_value(AnalysisReport::new(&sentence, &analysis)).unwrap();

        assert_eq!(json["clauses"][0]["clauseId"], "main");
        assert_eq!(json["clauses"][0]["elements"][1]["role"], "V");
        assert_eq!(json["clauses"][0]["elements"][4]["role"], "Od");
        assert_eq!(json["repairLog"]["actions"][0]["type"], "reassign_role");
        assert_eq!(json["inversions"][0]["aux"], "did");
        assert!(json["syntaxTests"].as_array().is_some_and(|a| !a.is_empty()));
    }
}
