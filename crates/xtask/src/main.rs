// xtask - Developer commands for the UI suite
//
//   cargo run -p xtask -- report --input results.json [--output report.md]
//   cargo run -p xtask -- prepare

use anyhow::Context;
use clap::{Parser, Subcommand};
use site_pages::SuiteConfig;
use site_pages::support::{TestResults, generate_test_report};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "xtask", about = "Developer commands for the site-pages UI suite")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a markdown report from a results JSON file
    Report {
        /// Results file ({"total", "passed", "failed", "skipped", "tests": [...]})
        #[arg(long)]
        input: PathBuf,

        /// Where to write the report (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Create the report directories and print the resolved configuration
    Prepare,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Report { input, output } => report(input, output).await,
        Command::Prepare => prepare(),
    }
}

async fn report(input: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("reading {}", input.display()))?;
    let results: TestResults = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", input.display()))?;
    let markdown = generate_test_report(&results);

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, markdown)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("Wrote report for {} tests to {}", results.total, path.display());
        }
        None => print!("{markdown}"),
    }
    Ok(())
}

fn prepare() -> anyhow::Result<()> {
    let config = SuiteConfig::from_env()?;
    config.prepare_directories()?;
    tracing::info!("Prepared {}", config.reports_dir.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
