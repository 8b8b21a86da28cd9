use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

use optlog::config::{ViewerConfig, clamp_char_top_n, clamp_state_top_n};
use optlog::parser::{FsSource, parse_char_log_with, parse_numeric_table_with};
use optlog::ranking::detect_core_columns_with;
use optlog::view::{CharView, StateView};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Rank optimizer state/char logs and print the views as JSON",
    long_about = None
)]
struct Cli {
    /// State log (per-iteration trajectories)
    #[arg(long = "state", value_name = "STATE_LOG")]
    state: Option<Utf8PathBuf>,

    /// Char log (per-solution error components)
    #[arg(long = "char", value_name = "CHAR_LOG")]
    char_log: Option<Utf8PathBuf>,

    /// Number of variables to normalize and list (1..=200)
    #[arg(long)]
    top_n: Option<usize>,

    /// Number of error components to list (1..=9999)
    #[arg(long)]
    char_top_n: Option<usize>,

    /// Solution number to show (defaults to the highest)
    #[arg(long)]
    solution: Option<u32>,

    /// JSON settings file
    #[arg(long, value_name = "FILE")]
    config: Option<Utf8PathBuf>,
}

#[derive(Serialize)]
struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<StateView>,
    #[serde(rename = "char", skip_serializing_if = "Option::is_none")]
    char_view: Option<CharView>,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(env).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if cli.state.is_none() && cli.char_log.is_none() {
        anyhow::bail!("nothing to do: pass --state and/or --char");
    }

    let state = match &cli.state {
        Some(path) => {
            let table = parse_numeric_table_with(&mut FsSource, path, cfg.retry)
                .with_context(|| format!("Failed to load state log {}", path))?;
            let core = detect_core_columns_with(&table, &cfg.columns)?;
            let top_n = clamp_state_top_n(cli.top_n.unwrap_or(cfg.state_top_n));
            Some(StateView::compute_with(&table, &core, top_n, &cfg.columns.sentinel))
        }
        None => None,
    };

    let char_view = match &cli.char_log {
        Some(path) => {
            let log = parse_char_log_with(
                &mut FsSource,
                path,
                cfg.retry,
                cfg.dedup,
                &cfg.columns.sentinel,
            )
            .with_context(|| format!("Failed to load char log {}", path))?;
            let selection = match cli.solution {
                Some(n) => Some(
                    log.position_of(n)
                        .with_context(|| format!("solution {} not found in {}", n, path))?,
                ),
                None => None,
            };
            let top_n = clamp_char_top_n(cli.char_top_n.unwrap_or(cfg.char_top_n));
            Some(CharView::compute(&log, selection, top_n))
        }
        None => None,
    };

    let json = serde_json::to_string_pretty(&Output { state, char_view })?;
    println!("{}", json);
    Ok(())
}
