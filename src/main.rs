//! PiInk Fetch - CLI entry point.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use piink_fetch::{
    cli::Args,
    config::{validate_config, Config},
    error::{exit_codes, Error, Result},
    fs::TimestampToken,
    net::build_client,
    notify::WebhookNotifier,
    output::{
        print_banner, print_config_summary, print_error, print_info, print_run_report,
        print_success, print_warning,
    },
    pipeline::Pipeline,
};

const DEFAULT_CONFIG_FILE: &str = "piink.toml";

#[tokio::main]
async fn main() -> ExitCode {
    // Environment from .env must be in place before clap reads it
    dotenvy::dotenv().ok();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            tracing::error!("{}", e);
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_)
                | Error::InvalidToken(_)
                | Error::Connectivity { .. } => ExitCode::from(exit_codes::ABORT as u8),
                Error::StageFailures(_) => ExitCode::from(exit_codes::STAGE_FAILED as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run(args: Args) -> Result<()> {
    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        if args.config != Path::new(DEFAULT_CONFIG_FILE) {
            print_warning(&format!(
                "Configuration file not found: {}",
                args.config.display()
            ));
        }
        Config::default()
    };

    // Merge CLI arguments and environment into config
    args.merge_into_config(&mut config);

    init_logging(&config, args.debug);

    let quiet = config.options.quiet;
    if !quiet {
        print_banner();
    }

    // Nothing touches the network before this passes
    validate_config(&config)?;

    if !quiet {
        print_config_summary(&config);
    }
    if config.notify.webhook_url.is_none() {
        tracing::warn!("WEBHOOK_URL not set, notifications will only be logged");
    }

    let token = match &args.token {
        Some(token) => TimestampToken::parse(token)?,
        None => TimestampToken::now(),
    };

    let client = build_client()?;
    let notifier = WebhookNotifier::from_config(client.clone(), &config);

    if !quiet {
        print_info("Checking connectivity...");
    }
    let report = Pipeline::new(&config, client, &notifier).run(token).await?;

    if !quiet {
        print_run_report(&report);
        if report.succeeded() {
            print_success("Signage updated");
        }
    }

    let failures = report.failures();
    if failures > 0 && config.options.strict_exit {
        return Err(Error::StageFailures(failures));
    }

    Ok(())
}

/// Log to stderr and, when configured, append to the log file.
fn init_logging(config: &Config, debug: bool) {
    let log_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let mut file_error: Option<(PathBuf, std::io::Error)> = None;
    let file_layer = match config.options.log_file.as_deref() {
        Some(path) => match open_log_file(path) {
            Ok(file) => Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false),
            ),
            Err(e) => {
                file_error = Some((path.to_path_buf(), e));
                None
            }
        },
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    if let Some((path, e)) = file_error {
        tracing::warn!("Could not open log file {}: {}", path.display(), e);
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}
