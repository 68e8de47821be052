use grammar_parser::vchain::MAX_PARENTHETICAL_TOKENS;

use crate::repair::MAX_REPAIR_ITERATIONS;

/// Knobs for one [`analyze`](crate::analyze) call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct EngineConfig {
    /// Clamped to `1..=5` when used.
    pub max_repair_iterations: usize,
    pub max_parenthetical_tokens: usize,
    pub run_syntax_tests: bool,
    pub label_long_distance: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_repair_iterations: MAX_REPAIR_ITERATIONS,
            max_parenthetical_tokens: MAX_PARENTHETICAL_TOKENS,
            run_syntax_tests: true,
            label_long_distance: true,
        }
    }
}

impl EngineConfig {
    pub fn repair_iterations(&self) -> usize {
        self.max_repair_iterations.clamp(1, MAX_REPAIR_ITERATIONS)
    }
}
