//! Audit settings. Precedence, lowest first: the embedded defaults,
//! `./grammar.toml`, the `--config` file, `GRAMMAR_*` variables, then flags.

use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, Map};
use grammar_solver::EngineConfig;
use serde::Deserialize;

const DEFAULT_TOML: &str = include_str!("../defaults/grammar.default.toml");

/// Picked up from the working directory when present.
pub const LOCAL_SETTINGS: &str = "grammar.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct AuditSettings {
    pub engine: EngineConfig,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub pretty: bool,
    /// Used when `RUST_LOG` is unset.
    pub log_filter: String,
}

/// Files and variables consulted before the command line.
#[derive(Debug, Clone, Default)]
pub struct SettingsSources<'a> {
    /// Optional. A missing file is skipped.
    pub local: Option<&'a Path>,
    /// Named with `--config`. A missing file is an error.
    pub explicit: Option<&'a Path>,
    /// Stands in for the process environment when set.
    pub env: Option<Map<String, String>>,
}

/// Values given as flags. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagOverrides {
    pub max_iterations: Option<u8>,
    pub syntax_tests: Option<bool>,
    pub pretty: Option<bool>,
}

/// `GRAMMAR_ENGINE__MAX_REPAIR_ITERATIONS=3` sets `engine.max_repair_iterations`.
fn env_layer(vars: Option<Map<String, String>>) -> Environment {
    Environment::with_prefix("GRAMMAR")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .source(vars)
}

impl FlagOverrides {
    fn apply(self, builder: ConfigBuilder<DefaultState>) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_override_option("engine.max_repair_iterations", self.max_iterations.map(i64::from))?
            .set_override_option("engine.run_syntax_tests", self.syntax_tests)?
            .set_override_option("output.pretty", self.pretty)
    }
}

impl AuditSettings {
    pub fn load(sources: SettingsSources<'_>, flags: FlagOverrides) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        if let Some(path) = sources.local {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        if let Some(path) = sources.explicit {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        builder = flags.apply(builder.add_source(env_layer(sources.env)))?;
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolated() -> SettingsSources<'static> {
        SettingsSources { env: Some(Map::new()), ..SettingsSources::default() }
    }

    #[test]
    fn defaults_match_engine_defaults() {
        let settings = AuditSettings::load(isolated(), FlagOverrides::default()).expect("defaults to deserialize");
        assert_eq!(settings.engine, EngineConfig::default());
        assert!(settings.output.pretty);
        assert_eq!(settings.output.log_filter, "warn");
    }

    #[test]
    fn flags_win_over_environment() {
        let mut vars = Map::new();
        vars.insert("GRAMMAR_ENGINE__MAX_REPAIR_ITERATIONS".to_string(), "3".to_string());
        vars.insert("GRAMMAR_OUTPUT__LOG_FILTER".to_string(), "debug".to_string());
        let sources = SettingsSources { env: Some(vars), ..SettingsSources::default() };

        let settings = AuditSettings::load(sources.clone(), FlagOverrides::default()).expect("env to apply");
        assert_eq!(settings.engine.max_repair_iterations, 3);
        assert_eq!(settings.output.log_filter, "debug");

        let flags = FlagOverrides { max_iterations: Some(2), syntax_tests: Some(false), pretty: None };
        let settings = AuditSettings::load(sources, flags).expect("flags to apply");
        assert_eq!(settings.engine.max_repair_iterations, 2);
        assert!(!settings.engine.run_syntax_tests);
        assert!(settings.engine.label_long_distance);
        assert!(settings.output.pretty);
    }

    #[test]
    fn only_the_explicit_file_is_required() {
        let missing = Path::new("does/not/exist.toml");
        let sources = SettingsSources { explicit: Some(missing), ..isolated() };
        assert!(AuditSettings::load(sources, FlagOverrides::default()).is_err());
        let sources = SettingsSources { local: Some(missing), ..isolated() };
        assert!(AuditSettings::load(sources, FlagOverrides::default()).is_ok());
    }
}
