//! CLI binary for suburb-scout.
//!
//! Reports are written to stdout as JSON. All tracing output goes to
//! stderr so stdout can be piped straight into other tools.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use suburb_scout::{QueryPlanMode, ScoutConfig};
use tracing_subscriber::EnvFilter;

/// suburb-scout: schools, hospitals, infrastructure, crime and property
/// search results for a suburb.
#[derive(Parser)]
#[command(name = "suburb-scout", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured query plan mode.
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search every category for an area and print the report.
    Report {
        /// Suburb name or aliased postcode, e.g. "point cook" or 3030.
        #[arg(required = true)]
        area: Vec<String>,
    },

    /// Print the queries a report would issue, without searching.
    Plan {
        #[arg(required = true)]
        area: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Broad,
    Targeted,
}

impl From<ModeArg> for QueryPlanMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Broad => QueryPlanMode::Broad,
            ModeArg::Targeted => QueryPlanMode::Targeted,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => ScoutConfig::from_file(path)?,
        None => ScoutConfig::load_or_default(&ScoutConfig::default_config_path())?,
    };
    if let Some(mode) = cli.mode {
        config.search.query_plan_mode = mode.into();
    }

    // RUST_LOG wins over the configured filter.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    match cli.command {
        Command::Report { area } => {
            let area = area.join(" ");
            let report = suburb_scout::run_report(&area, &config).await.map_err(|e| {
                tracing::error!(error = %e, "lookup failed");
                anyhow::anyhow!("suburb-scout failed: {e}")
            })?;
            println!("{}", suburb_scout::render_json(&report, cli.pretty)?);
        }
        Command::Plan { area } => {
            let area = area.join(" ");
            let plan = suburb_scout::preview_plan(&area, &config);
            if plan.is_empty() {
                anyhow::bail!("area name must not be empty");
            }
            println!("{}", suburb_scout::render_json(&plan, cli.pretty)?);
        }
    }

    Ok(())
}
