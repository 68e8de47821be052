mod settings;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use grammar_protocol::wire::DraftAnnotation;
use grammar_solver::{analyze, AnalysisReport, EngineConfig};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use settings::{AuditSettings, FlagOverrides, SettingsSources, LOCAL_SETTINGS};

#[derive(Parser)]
#[command(author, version, about = "Validates and repairs draft clause annotations")]
struct Cli {
    /// Draft annotation JSON (one object or an array); `-` reads stdin
    #[arg(value_name = "FILE")]
    input: PathBuf,

    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Settings file layered over the defaults and `./grammar.toml`
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "N")]
    max_iterations: Option<u8>,

    #[arg(long)]
    no_syntax_tests: bool,

    #[arg(long)]
    compact: bool,

    /// Exit with an error when any sentence stays invalid after repair
    #[arg(long)]
    strict: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Input {
    Batch(Vec<DraftAnnotation>),
    Single(DraftAnnotation),
}

fn load_settings(cli: &Cli) -> anyhow::Result<AuditSettings> {
    let sources = SettingsSources {
        local: Some(Path::new(LOCAL_SETTINGS)),
        explicit: cli.config.as_deref(),
        env: None,
    };
    let flags = FlagOverrides {
        max_iterations: cli.max_iterations,
        syntax_tests: cli.no_syntax_tests.then_some(false),
        pretty: cli.compact.then_some(false),
    };
    AuditSettings::load(sources, flags).context("loading settings")
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn audit(draft: DraftAnnotation, config: &EngineConfig) -> anyhow::Result<AnalysisReport> {
    let (sentence, clauses) = draft.into_clause_set().context("invalid draft annotation")?;
    let analysis = analyze(&sentence, clauses, None, None, config);
    if !analysis.is_valid() {
        for v in analysis.report.errors() {
            warn!(invariant = %v.invariant_id, clause = %v.clause_id, "{}", v.message);
        }
    }
    Ok(AnalysisReport::new(&sentence, &analysis))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.output.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    info!(input = %cli.input.display(), "reading drafts");
    let drafts = match serde_json::from_str::<Input>(&read_input(&cli.input)?)
        .context("input is neither a draft annotation nor an array of them")?
    {
        Input::Batch(drafts) => drafts,
        Input::Single(draft) => vec![draft],
    };
    let batch = drafts.len() != 1;

    let reports = drafts
        .into_iter()
        .map(|draft| audit(draft, &settings.engine))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let invalid = reports.iter().filter(|r| !r.valid).count();
    info!(sentences = reports.len(), invalid, "audit complete");

    let json = match (batch, settings.output.pretty) {
        (true, true) => serde_json::to_string_pretty(&reports)?,
        (true, false) => serde_json::to_string(&reports)?,
        (false, true) => serde_json::to_string_pretty(&reports[0])?,
        (false, false) => serde_json::to_string(&reports[0])?,
    };
    match &cli.output {
        Some(path) => fs::write(path, json).with_context(|| format!("writing {}", path.display()))?,
        None => println!("{json}"),
    }

    if cli.strict && invalid > 0 {
        bail!("{invalid} of {} sentences failed validation", reports.len());
    }
    Ok(())
}
