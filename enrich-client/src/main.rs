//! Log Enrichment Client - Main Entry Point

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};

use log_enrich_client::api::commands;
use log_enrich_client::constants;
use log_enrich_client::logic::enrichment::{EnrichmentResult, LogSource};
use log_enrich_client::logic::store::SubmissionStore;
use log_enrich_client::logic::transport::{ClientConfig, EnrichClient};

/// Operator client for the security log enrichment pipeline.
#[derive(Parser)]
#[command(name = "enrich-client", version, about = "Security log enrichment client")]
struct Cli {
    /// Orchestrator base URL
    #[arg(long, global = true, env = "ENRICH_API_BASE")]
    api_base: Option<String>,

    /// Per-request timeout in seconds (0 = none)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit one raw log line
    Submit {
        /// Raw log text
        raw_log: String,
        /// Log source (windows_eventlog, sysmon, linux_auditd, generic_syslog)
        #[arg(long, short)]
        source: Option<LogSource>,
    },

    /// Submit every non-blank line of a file ("-" for stdin)
    Batch {
        file: PathBuf,
        #[arg(long, short)]
        source: Option<LogSource>,
    },

    /// Check orchestrator health
    Health,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ClientConfig::from_env();
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout_secs = Some(secs).filter(|s| *s > 0);
    }
    log::info!("Orchestrator: {}", config.api_base);

    let client = EnrichClient::new(config).context("Failed to build HTTP client")?;

    match cli.command {
        Commands::Health => {
            println!("{}", commands::check_health(&client).await?);
        }

        Commands::Submit { raw_log, source } => {
            let store = SubmissionStore::new(client);
            let text = commands::submit_log(&store, &raw_log, source).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&store.current().as_deref())?);
            } else {
                println!("{}", text);
            }
        }

        Commands::Batch { file, source } => {
            let input = read_input(&file)?;
            let store =
                SubmissionStore::new(client).with_history_limit(constants::get_history_limit());
            let summary = commands::run_batch(&store, input.lines(), source).await;
            if cli.json {
                let history = store.history();
                let results: Vec<&EnrichmentResult> = history.iter().map(|r| r.as_ref()).collect();
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                println!("{}", summary.rendered);
            }
            if summary.has_failures() {
                anyhow::bail!(
                    "{} of {} submissions failed",
                    summary.failed.len(),
                    summary.submitted
                );
            }
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
