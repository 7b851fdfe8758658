mod commands;
mod formatting;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use offline_translator_core::{Dispatcher, TranslatorConfig};
use offline_translator_store::FilesystemSdk;
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "offline-translator")]
#[command(about = "On-device translation with cached translators and model management")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding downloaded language models.
    #[arg(long, global = true)]
    models_dir: Option<PathBuf>,

    /// Directory model packages are downloaded from.
    #[arg(long, global = true, default_value = "./models-repository")]
    repository: PathBuf,

    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, global = true, action)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    Translate {
        text: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    Languages,
    Download {
        language: String,
    },
    Status {
        language: String,
    },
    Delete {
        language: String,
    },
    /// Sends a raw method call and prints the response as JSON.
    Call {
        method: String,
        #[arg(long)]
        args: Option<String>,
    },
    /// Runs a JSON array of method calls concurrently.
    Batch {
        file: PathBuf,
    },
}

fn default_models_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("offline-translator").join("models"))
        .context("Could not determine a data directory; pass --models-dir")
}

fn build_dispatcher(cli: &Cli) -> Result<Dispatcher> {
    let config = match &cli.config {
        Some(path) => TranslatorConfig::load(path)?,
        None => TranslatorConfig::default(),
    };
    config.validate()?;

    let models_dir = match &cli.models_dir {
        Some(dir) => dir.clone(),
        None => default_models_dir()?,
    };
    let sdk = FilesystemSdk::new(cli.repository.clone(), &models_dir)
        .with_context(|| format!("Failed to open models directory {}", models_dir.display()))?;
    debug!(
        models_dir = %sdk.store().root().display(),
        repository = %sdk.repository().display(),
        cache_capacity = config.cache_capacity,
        "Starting translator"
    );
    Ok(Dispatcher::new(Arc::new(sdk), &config))
}

async fn run(dispatcher: Arc<Dispatcher>, command: Commands) -> Result<bool> {
    match command {
        Commands::Translate { text, from, to } => {
            commands::cmd_translate(&dispatcher, text, from, to).await
        }
        Commands::Languages => commands::cmd_languages(&dispatcher).await,
        Commands::Download { language } => commands::cmd_download(&dispatcher, language).await,
        Commands::Status { language } => commands::cmd_status(&dispatcher, language).await,
        Commands::Delete { language } => commands::cmd_delete(&dispatcher, language).await,
        Commands::Call { method, args } => commands::cmd_call(&dispatcher, method, args).await,
        Commands::Batch { file } => commands::cmd_batch(dispatcher, file).await,
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let dispatcher = Arc::new(build_dispatcher(&cli)?);
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))?;

    let ok = rt.block_on(run(Arc::clone(&dispatcher), cli.command))?;

    let closed = dispatcher.shutdown();
    debug!(closed, "Released cached translators");

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
