mod input;
mod output;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use sir_core::{RuleSet, ScoreRecord, ScoringConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sir-cli")]
#[command(about = "Social influence rating from social-media metric tables")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score every entity and write the result and long metrics CSVs
    Score {
        #[command(flatten)]
        source: InputArgs,
        /// Result CSV path (default: `<input>__Resultado.csv` in the output dir)
        #[arg(long)]
        out_csv: Option<PathBuf>,
        /// Output directory (default: `data/processed` if present, else the input's dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Long metrics CSV path (default: `<input>__MetricsExport.csv` in the output dir)
        #[arg(long)]
        metrics_csv: Option<PathBuf>,
        /// Also write the result table as XLSX to this path
        #[arg(long)]
        out_xlsx: Option<PathBuf>,
        /// YAML scoring profile
        #[arg(long, env = "SIR_PROFILE_PATH")]
        profile: Option<PathBuf>,
        #[command(flatten)]
        overrides: ScoringOverrides,
        /// Result rows printed after the run
        #[arg(long, default_value_t = 5)]
        preview: usize,
    },
    /// Show how the input's columns are canonicalized, without scoring
    Columns {
        #[command(flatten)]
        source: InputArgs,
    },
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Metrics table (CSV, XLSX, XLSM, XLS or ODS)
    #[arg(long)]
    input: PathBuf,
    /// Sheet name or zero-based index (spreadsheets only)
    #[arg(long, default_value = "0")]
    sheet: String,
}

/// Command-line overrides; they win over the profile and `SIR_*` env vars.
#[derive(Debug, Default, Args)]
struct ScoringOverrides {
    #[arg(long)]
    w_presenca: Option<f64>,
    #[arg(long)]
    w_pop: Option<f64>,
    #[arg(long)]
    w_ativ: Option<f64>,
    #[arg(long)]
    w_eng: Option<f64>,
    #[arg(long)]
    w_dif: Option<f64>,
    /// Score of the smallest positive raw value
    #[arg(long, alias = "piso-positivo")]
    floor: Option<f64>,
    /// Ceiling when no entity dominates
    #[arg(long)]
    cap_min: Option<f64>,
    /// Top/runner-up ratio that unlocks a score of 100
    #[arg(long)]
    dominance_factor: Option<f64>,
}

impl ScoringOverrides {
    fn apply(&self, mut config: ScoringConfig) -> ScoringConfig {
        let w = &mut config.weights;
        w.presenca = self.w_presenca.unwrap_or(w.presenca);
        w.popularidade = self.w_pop.unwrap_or(w.popularidade);
        w.atividade = self.w_ativ.unwrap_or(w.atividade);
        w.engajamento = self.w_eng.unwrap_or(w.engajamento);
        w.difusao = self.w_dif.unwrap_or(w.difusao);

        let n = &mut config.normalization;
        n.floor = self.floor.unwrap_or(n.floor);
        n.cap_min = self.cap_min.unwrap_or(n.cap_min);
        n.dominance_factor = self.dominance_factor.unwrap_or(n.dominance_factor);

        config
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let log_level = std::env::var("SIR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Score {
            source,
            out_csv,
            out_dir,
            metrics_csv,
            out_xlsx,
            profile,
            overrides,
            preview,
        }) => {
            let config = sir_core::load_scoring_config(profile.as_deref())?;
            let config = overrides.apply(config);
            sir_core::validate_scoring_config(&config)?;

            let paths = output::derive_output_paths(
                &source.input,
                out_dir.as_deref(),
                Path::new(output::PROCESSED_DIR),
            );
            let paths = paths.with_overrides(out_csv, metrics_csv);
            run_score(&source, &config, &paths, out_xlsx.as_deref(), preview)?;
        }
        Some(Commands::Columns { source }) => run_columns(&source)?,
        None => println!("sir-cli: choose a command (score, columns); see --help"),
    }

    Ok(())
}

fn run_score(
    source: &InputArgs,
    config: &ScoringConfig,
    paths: &output::OutputPaths,
    out_xlsx: Option<&Path>,
    preview: usize,
) -> anyhow::Result<()> {
    let table = input::load_table(&source.input, &source.sheet)?;
    let result = sir_core::run_pipeline(table, &RuleSet::standard(), config)?;

    output::write_scores(&paths.scores, &result.scores)?;
    println!("scores written to {}", paths.scores.display());
    if let Some(xlsx) = out_xlsx {
        output::write_scores_xlsx(xlsx, &result.scores)?;
        println!("scores written to {}", xlsx.display());
    }
    output::write_metrics(&paths.metrics, &result.metrics)?;
    println!("metrics written to {}", paths.metrics.display());

    print_preview(&result.scores, preview);
    Ok(())
}

fn run_columns(source: &InputArgs) -> anyhow::Result<()> {
    let table = input::load_table(&source.input, &source.sheet)?;
    let canonical = sir_core::canonicalize_columns(table, &RuleSet::standard());
    let report = &canonical.report;

    if report.applied.is_empty() {
        println!("no columns renamed");
    } else {
        println!("renamed columns:");
        for rename in &report.applied {
            println!("  {} -> {}", rename.from, rename.to);
        }
    }
    for dropped in &report.dropped_duplicates {
        println!("dropped duplicate: {dropped}");
    }
    for group in &report.missing_groups {
        println!("missing group (scored as 0): {group}");
    }
    if report.synthesized_name {
        println!("no identifier column; names built from row order");
    }

    let names: Vec<&str> = canonical.table.column_names().collect();
    println!("canonical columns ({}): {}", names.len(), names.join(", "));
    Ok(())
}

fn print_preview(scores: &[ScoreRecord], rows: usize) {
    if rows == 0 || scores.is_empty() {
        return;
    }
    println!();
    println!("{}", sir_core::SCORE_COLUMNS.join("\t"));
    for record in scores.iter().take(rows) {
        let cells: Vec<String> = std::iter::once(record.name.clone())
            .chain(
                sir_core::Dimension::ALL
                    .iter()
                    .map(|d| record.dimension(*d))
                    .chain(std::iter::once(record.sir_final_0_100))
                    .map(output::format_one_decimal),
            )
            .collect();
        println!("{}", cells.join("\t"));
    }
}
