pub mod config;
pub mod evidence;
pub mod graph;
pub mod invariants;
pub mod pipeline;
pub mod repair;

#[cfg(feature = "serde")]
pub mod report;

pub use config::EngineConfig;
pub use evidence::run_syntax_tests;
pub use graph::ClauseGraph;
pub use invariants::{misplaced_auxiliary, validate, validate_clause};
pub use pipeline::{analyze, Analysis};
pub use repair::{
    normalize_patterns, priority, repair_loop, repair_one, RepairError, ELIDED_SUBJECT,
    MAX_REPAIR_ITERATIONS,
};

#[cfg(feature = "serde")]
pub use report::AnalysisReport;
