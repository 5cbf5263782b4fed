//! papersearch: ranked, highlighted paper search (Rust)
//!
//! Two modes:
//! - Interactive (default): prompt with debounced suggestions, recent
//!   searches, voice dictation and paged results
//! - One-shot: `papersearch search -q <query>` prints a single page

mod cli;
mod config;
mod error;
mod http;
mod intake;
mod interactive;
mod oracle;
mod render;
mod search;
mod speech;

use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Commands};
use config::Settings;
use error::{validate_query, AppError};
use intake::{IntakeController, IntakeEvent, IntakeOptions, Submission};
use oracle::{HttpOracle, SearchOracle};
use speech::{CommandRecognizer, NoRecognizer, SpeechRecognizer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();

    match run(cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error [{}]: {}", e.error_code(), e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<String, AppError> {
    let settings = load_settings(&cli)?;
    let controller = build_controller(&settings)?;

    match cli.command {
        Some(Commands::Search(args)) => execute_search_cli(controller, args).await,
        Some(Commands::Interactive) | None => {
            interactive::run(controller).await?;
            Ok(String::new())
        }
    }
}

/// Settings file plus command-line overrides
fn load_settings(cli: &Cli) -> Result<Settings, AppError> {
    let mut settings = config::load_settings(cli.config.as_deref())
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;

    if let Some(url) = &cli.oracle_url {
        settings.oracle_url = url.clone();
    }
    if let Some(path) = &cli.suggestions {
        settings.suggestions = config::load_suggestions(path)
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;
    }

    Ok(settings)
}

fn build_controller(settings: &Settings) -> Result<IntakeController, AppError> {
    let http = HttpOracle::new(&settings.oracle_url, settings.request_timeout())?;
    info!("Search endpoint: {}", http.endpoint());
    let oracle: Arc<dyn SearchOracle> = Arc::new(http);

    let recognizer: Arc<dyn SpeechRecognizer> = match settings
        .speech_command
        .as_deref()
        .and_then(|cmd| CommandRecognizer::from_command_line(cmd, settings.request_timeout()))
    {
        Some(recognizer) => Arc::new(recognizer),
        None => {
            if settings.speech_command.is_some() {
                warn!("Ignoring empty speech_command; dictation disabled");
            }
            Arc::new(NoRecognizer)
        }
    };

    Ok(IntakeController::new(
        oracle,
        recognizer,
        settings.suggestions.clone(),
        IntakeOptions::from(settings),
    ))
}

/// Execute search command in CLI mode
async fn execute_search_cli(
    mut controller: IntakeController,
    args: cli::SearchArgs,
) -> Result<String, AppError> {
    validate_query(&args.query)?;

    let generation = match controller.on_submit(&args.query) {
        Submission::Dispatched { generation } => generation,
        Submission::EmptyQuery => {
            return Err(AppError::InvalidInput("Query must not be empty".to_string()))
        }
    };

    // The request timeout is enforced inside the controller
    loop {
        match controller.process_next().await {
            IntakeEvent::ResultsReady { generation: g, .. } if g == generation => break,
            IntakeEvent::SearchFailed {
                generation: g,
                error,
                ..
            } if g == generation => return Err(error.into()),
            _ => {}
        }
    }

    let set = controller
        .results_mut()
        .ok_or_else(|| AppError::Internal("Results missing after search".to_string()))?;
    set.paginator_mut().go_to(args.page);

    if args.json {
        Ok(render::format_page_json(set)?)
    } else {
        Ok(render::format_page_markdown(set))
    }
}
