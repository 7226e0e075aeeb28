//! CLI entrypoint for campaign-chat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use campaign_chat_application::StreamChatUseCase;
use campaign_chat_domain::{Conversation, SessionOutcome};
use campaign_chat_infrastructure::{ConfigLoader, FileConfig, HttpChatTransport};
use campaign_chat_presentation::{ChatRepl, Cli, ReplConfig, StreamReporter, submit_interruptible};
use clap::Parser;
use std::fs::File;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Exit status for a reply cancelled with Ctrl-C
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting campaign-chat");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    // === Dependency Injection ===
    // Create infrastructure adapter (HTTP transport)
    let transport = HttpChatTransport::from_config(&config.endpoint)?;
    let endpoint = transport.endpoint().to_string();
    let transport = Arc::new(transport);
    let params = config.stream.to_stream_params()?;
    let use_case = StreamChatUseCase::new(transport).with_params(params);

    let show_progress = config.repl.show_progress && !cli.quiet;

    // Chat mode
    if cli.chat {
        let repl_config = ReplConfig {
            show_banner: config.repl.show_banner,
            show_progress,
        };
        let mut repl = ChatRepl::new(use_case, endpoint).with_config(repl_config);
        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single message mode - message is required
    let question = match cli.question {
        Some(q) => q,
        None => bail!("A message is required. Use --chat for interactive mode."),
    };

    let mut conversation = Conversation::new();
    let reporter = StreamReporter::new().with_progress(show_progress);
    let outcome =
        submit_interruptible(&use_case, &mut conversation, &question, &reporter).await?;

    // The reporter has already printed the reply or the reason it ended
    Ok(match outcome {
        SessionOutcome::Completed { .. } => ExitCode::SUCCESS,
        SessionOutcome::Cancelled => ExitCode::from(EXIT_CANCELLED),
        SessionOutcome::Failed(_) => ExitCode::FAILURE,
    })
}

/// Initialize logging based on verbosity level
///
/// `RUST_LOG` takes precedence over `-v` flags. Logs go to stderr, or to
/// `log_file` through a non-blocking writer.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking)
        .init();

    Ok(Some(guard))
}

/// CLI flags win over every config source.
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(url) = &cli.endpoint {
        config.endpoint.url = url.clone();
    }
    if let Some(secs) = cli.timeout {
        config.stream.inactivity_timeout_secs = secs;
    }
}
