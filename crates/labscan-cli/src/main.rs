use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use labscan::config::discover_config;
use labscan::logging::init_tracing;
use labscan::{ExtractionReport, Pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "labscan",
    version,
    about = "Extract lab values from a report and predict disease risk"
)]
struct Cli {
    /// Config file. Falls back to $LABSCAN_CONFIG, then the user config dir.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    /// Pretty-print the JSON reports.
    #[arg(long)]
    pretty: bool,

    /// Lab reports to process (PDF, DOCX or image).
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Load config and model artifacts once for the whole run.
fn startup(cli: &Cli) -> labscan::Result<Pipeline> {
    let mut config = discover_config(cli.config.as_deref())?;
    if cli.json_logs {
        config.logging.json = true;
    }
    init_tracing(&config.logging);

    Ok(Pipeline::from_config(&config)?)
}

async fn process(pipeline: Arc<Pipeline>, path: PathBuf) -> labscan::Result<ExtractionReport> {
    Ok(pipeline.run_path_blocking(path).await?)
}

/// Returns `Ok(false)` when at least one document was rejected.
async fn run(cli: Cli) -> Result<bool> {
    let pipeline = Arc::new(startup(&cli).context("starting labscan")?);

    let mut all_ok = true;
    for path in cli.files {
        match process(pipeline.clone(), path.clone()).await {
            Ok(report) => {
                let json = if cli.pretty {
                    serde_json::to_string_pretty(&report)?
                } else {
                    serde_json::to_string(&report)?
                };
                println!("{}", json);
            }
            Err(e) => {
                tracing::error!(
                    file = %path.display(),
                    decode_error = e.is_decode_error(),
                    error = %e,
                    "Document rejected"
                );
                eprintln!("{}: {}", path.display(), e);
                all_ok = false;
            }
        }
    }

    Ok(all_ok)
}
