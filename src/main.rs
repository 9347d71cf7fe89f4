// DayzWatch - main.rs
//
// Service entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading from .env, config.toml and the environment
//    (fatal on missing or invalid values)
// 3. Logging initialisation (debug mode support)
// 4. Backend construction and the poll loop (or a single `--once` cycle)

use dayzwatch::app::cycle::{CycleConfig, Monitor};
use dayzwatch::app::service::PollService;
use dayzwatch::app::source::LogSourceConnector;
use dayzwatch::platform::config::{self, Settings, SourceSettings};
use dayzwatch::platform::local::LocalConnector;
use dayzwatch::platform::openrouter::OpenRouterSummarizer;
use dayzwatch::platform::sftp::{SftpConnector, SshAuth};
use dayzwatch::platform::telegram::TelegramNotifier;
use dayzwatch::util;

use chrono::Utc;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// DayzWatch - DayZ server log watcher.
///
/// Every poll interval, reads the previous minute of today's admin log,
/// has it summarised by an LLM and posts the summary to Telegram.
#[derive(Parser, Debug)]
#[command(name = "dayzwatch", version, about)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Run a single cycle and exit; non-zero exit status if it fails.
    #[arg(long = "once")]
    once: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging is configured from the settings, so config errors go to stderr.
    let (settings, warnings, dotenv_entries) = match load_settings(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    util::logging::init(cli.debug, settings.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "DayzWatch starting"
    );
    if dotenv_entries > 0 {
        tracing::debug!(
            path = util::constants::DOTENV_FILE_NAME,
            entries = dotenv_entries,
            "Loaded environment file"
        );
    }
    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    tracing::debug!(settings = ?settings, "Configuration loaded");

    match &settings.source {
        SourceSettings::Sftp {
            host,
            port,
            username,
            password,
            private_key,
        } => {
            let connector = SftpConnector {
                host: host.clone(),
                port: *port,
                username: username.clone(),
                auth: SshAuth {
                    password: password.as_ref().map(|s| s.expose().to_string()),
                    private_key: private_key.as_ref().map(|s| s.expose().to_string()),
                },
            };
            serve(connector, &settings, cli.once)
        }
        SourceSettings::Local => serve(LocalConnector::new(), &settings, cli.once),
    }
}

/// Read `.env` from the working directory, then config.toml and the real
/// environment. Returns the number of `.env` entries alongside the settings.
fn load_settings(cli: &Cli) -> util::error::Result<(Settings, Vec<String>, usize)> {
    let dotenv = config::read_dotenv(Path::new(util::constants::DOTENV_FILE_NAME))?;
    let (settings, warnings) =
        config::load(cli.config.as_deref(), config::env_with_dotenv(&dotenv))?;
    Ok((settings, warnings, dotenv.len()))
}

/// Construct the HTTP backends.
fn build_backends(
    settings: &Settings,
) -> util::error::Result<(OpenRouterSummarizer, TelegramNotifier)> {
    let mut summarizer = OpenRouterSummarizer::new(
        settings.openrouter_api_key.expose(),
        &settings.openrouter_model,
    )?;
    if let Some(url) = &settings.openrouter_base_url {
        summarizer = summarizer.with_base_url(url);
    }
    let notifier = TelegramNotifier::new(
        settings.telegram_bot_token.expose(),
        &settings.telegram_chat_id,
    )?;
    Ok((summarizer, notifier))
}

/// Build the remaining backends around `connector` and run.
fn serve<C: LogSourceConnector>(connector: C, settings: &Settings, once: bool) -> ExitCode {
    let (summarizer, notifier) = match build_backends(settings) {
        Ok(backends) => backends,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create HTTP clients");
            return ExitCode::FAILURE;
        }
    };

    let monitor = Monitor::new(
        connector,
        summarizer,
        notifier,
        CycleConfig {
            logs_path: settings.logs_path.clone(),
            naming: settings.naming.clone(),
            ignore: settings.ignore.clone(),
        },
    );
    let tz = settings.timezone;

    if once {
        let now = Utc::now().with_timezone(&tz);
        return match monitor.run_once(&now) {
            Ok(outcome) => {
                tracing::info!(outcome = ?outcome, "Single cycle finished");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "Single cycle failed");
                ExitCode::FAILURE
            }
        };
    }

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        if let Err(e) = ctrlc::set_handler(move || {
            tracing::info!("Shutdown requested");
            cancel.store(true, Ordering::SeqCst);
        }) {
            tracing::warn!(error = %e, "Failed to install signal handler; stop with SIGKILL");
        }
    }

    PollService::new(settings.poll_interval).run(
        || Utc::now().with_timezone(&tz),
        &cancel,
        |now| {
            monitor.tick(now);
        },
    );
    ExitCode::SUCCESS
}
