use grammar_protocol::wire::DraftAnnotation;
use grammar_solver::{analyze, AnalysisReport, EngineConfig};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Certification engine instance held by the browser.
#[wasm_bindgen]
pub struct GrammarEngine {
    config: EngineConfig,
}

impl GrammarEngine {
    fn run(&self, draft: DraftAnnotation) -> Result<AnalysisReport, String> {
        let (sentence, clauses) = draft.into_clause_set().map_err(|e| e.to_string())?;
        let analysis = analyze(&sentence, clauses, None, None, &self.config);
        Ok(AnalysisReport::new(&sentence, &analysis))
    }
}

#[wasm_bindgen]
impl GrammarEngine {
    /// `config` may be `undefined` or a partial `EngineConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<GrammarEngine, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(Self { config })
    }

    /// Draft annotation object in, analysis report object out.
    pub fn analyze(&self, draft: JsValue) -> Result<JsValue, JsValue> {
        let draft: DraftAnnotation = serde_wasm_bindgen::from_value(draft)?;
        let report = self.run(draft).map_err(|e| JsValue::from_str(&e))?;
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }

    /// Same as [`analyze`](Self::analyze) over a JSON string, for callers without structured cloning.
    #[wasm_bindgen(js_name = analyzeJson)]
    pub fn analyze_json(&self, draft: &str) -> Result<String, JsValue> {
        let draft: DraftAnnotation =
            serde_json::from_str(draft).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let report = self.run(draft).map_err(|e| JsValue::from_str(&e))?;
        serde_json::to_string(&report).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_repairs_parenthetical_draft() {
        let engine = GrammarEngine { config: EngineConfig::default() };
        let draft: DraftAnnotation = serde_json::from_str(
            r#"{
                "sentence": "She had, once codified into procedure, come to dominate",
                "elements": [
                    {"role": "S", "text": "She", "startIndex": 0, "endIndex": 3},
                    {"role": "V", "text": "had come", "startIndex": 4, "endIndex": 43},
                    {"role": "M", "text": "once codified into procedure", "startIndex": 9, "endIndex": 37},
                    {"role": "Od", "text": "to dominate", "startIndex": 44, "endIndex": 55}
                ]
            }"#,
        )
        .unwrap();
        let report = engine.run(draft).unwrap();

        assert_eq!(report.v_chains.len(), 1);
        let roles: Vec<&str> = report.clauses[0].elements.iter().map(|e| e.role.as_str()).collect();
        assert_eq!(roles, vec!["S", "V", "V", "Insert", "Comp"]);
        assert!(report.v_chains[0].parenthetical_span.is_some());
    }

    #[test]
    fn test_bad_role_is_reported() {
        let engine = GrammarEngine { config: EngineConfig::default() };
        let draft: DraftAnnotation = serde_json::from_str(
            r#"{"sentence": "Hi", "elements": [{"role": "Q", "text": "Hi", "startIndex": 0, "endIndex": 2}]}"#,
        )
        .unwrap();
        assert!(engine.run(draft).is_err());
    }
}
