use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use staff_scraper::fetch::HttpFetcher;
use staff_scraper::pipeline::{self, Extractors, Report, Summary};
use staff_scraper::present::{JsonPresenter, TextPresenter};
use staff_scraper::{Outcome, Settings, Target, TargetKind};

#[derive(Parser)]
#[command(name = "staff_scraper", about = "Extract staff lists and detail fields from HTML pages")]
struct Cli {
    /// Settings file (TOML). Defaults to ./staff_scraper.toml when present
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Print one JSON object per target
    #[arg(long, global = true)]
    json: bool,
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and extract every configured target
    Run,
    /// Extract entry names from the links of one page
    List { url: String },
    /// Extract the configured fields from one detail page
    Detail { url: String },
    /// Run a pipeline on a local HTML file
    Parse {
        path: PathBuf,
        #[arg(short, long, value_enum, default_value = "list")]
        kind: Kind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    List,
    Detail,
}

impl From<Kind> for TargetKind {
    fn from(k: Kind) -> Self {
        match k {
            Kind::List => TargetKind::List,
            Kind::Detail => TargetKind::Detail,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let t0 = Instant::now();
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let extractors = Extractors::from_settings(&settings)?;

    let targets = match cli.command {
        Commands::Run => settings.targets.clone(),
        Commands::List { url } => vec![Target {
            url,
            kind: TargetKind::List,
        }],
        Commands::Detail { url } => vec![Target {
            url,
            kind: TargetKind::Detail,
        }],
        Commands::Parse { path, kind } => {
            let doc = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let report = Report {
                target: Target {
                    url: path.display().to_string(),
                    kind: kind.into(),
                },
                outcome: extractors.run(kind.into(), &doc),
            };
            present(cli.json, &[report])?;
            return Ok(());
        }
    };

    if targets.is_empty() {
        println!("No targets configured. Add [[targets]] to staff_scraper.toml.");
        return Ok(());
    }

    info!("Fetching {} targets", targets.len());
    let fetcher = Arc::new(HttpFetcher::from_settings(&settings)?);
    let reports = pipeline::run_targets(fetcher, Arc::new(extractors), targets).await?;
    let summary = present(cli.json, &reports)?;

    info!("Done in {:.1}s", t0.elapsed().as_secs_f64());

    if summary.all_failed() {
        anyhow::bail!("all {} targets failed to fetch", summary.failed);
    }
    Ok(())
}

fn present(json: bool, reports: &[Report]) -> anyhow::Result<Summary> {
    let stdout = io::stdout().lock();
    if json {
        pipeline::present_all(&mut JsonPresenter::new(stdout), reports)
    } else {
        let summary = pipeline::present_all(&mut TextPresenter::new(stdout), reports)?;
        if reports.len() > 1 {
            println!(
                "\n{} targets: {} ok, {} empty, {} failed",
                summary.total(),
                summary.ok,
                summary.empty,
                summary.failed
            );
        } else if matches!(reports.first().map(|r| &r.outcome), Some(Outcome::NothingFound)) {
            info!("No entries matched; try --verbose or adjust nav_keywords");
        }
        Ok(summary)
    }
}
