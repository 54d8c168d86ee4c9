use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tvdb_rename::error::{ProcessError, PromptError};
use tvdb_rename::processing::process_files;
use tvdb_rename::rename_engine::{ConfigBuilder, ExecutionReport};
use tvdb_rename::tui::TerminalPrompt;
use tvdb_rename::tvdb::{self, TvdbClient};

#[derive(Parser, Debug)]
#[command(
    name = "tvdb-rename",
    version,
    about = "Rename episode files to their TheTVDB titles",
    override_usage = "tvdb-rename [OPTIONS] <SERIES> <FILES>..."
)]
struct Cli {
    /// TheTVDB series id, or a name to search for
    series: Option<String>,

    /// Files to rename
    files: Vec<PathBuf>,

    /// TheTVDB API key
    #[arg(long, env = "TVDB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// TheTVDB API base URL
    #[arg(long, env = "TVDB_BASE_URL")]
    base_url: Option<String>,

    /// Show the rename plan without asking to apply it
    #[arg(long)]
    dry_run: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) if is_cancelled(&e) => {
            println!("Cancelled, no files were renamed.");
            ExitCode::from(130)
        }
        Err(e) => {
            eprintln!("✗ Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn is_cancelled(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<PromptError>(), Some(PromptError::Cancelled))
        || err.downcast_ref::<ProcessError>().is_some_and(ProcessError::is_cancelled)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "tvdb_rename=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = ConfigBuilder::new()
        .series(cli.series.unwrap_or_default())
        .files(&cli.files)
        .api_key(cli.api_key)
        .base_url(cli.base_url)
        .dry_run(cli.dry_run)
        .build()?;

    println!("TheTVDB Rename Tool");
    println!("===================");

    let mut prompt = TerminalPrompt::new();
    let session = TvdbClient::new(&config.base_url).login(&config.api_key).await?;

    println!("Fetching episodes for '{}'...", config.series);
    let episodes = tvdb::fetch_episode_titles(&session, &config.series, &mut prompt).await?;
    if episodes.is_empty() {
        bail!("No named episodes found for '{}'", config.series);
    }
    println!("Found {} episodes, matching {} file(s).\n", episodes.len(), config.files.len());

    let report = process_files(&config.files, &episodes, &mut prompt, io::stdout(), config.dry_run)?;

    match report {
        ExecutionReport::Applied(results) if results.iter().any(|r| !r.is_success()) => {
            println!("⚠ Some files could not be renamed.");
            Ok(ExitCode::FAILURE)
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}
