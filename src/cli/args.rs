//! Command-line argument definitions using clap.

use clap::builder::FalseyValueParser;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, FailurePolicy, PatchMode};

/// PiInk signage fetch job.
#[derive(Parser, Debug, Default)]
#[command(
    name = "piink-fetch",
    version,
    about = "Fetch and publish PiInk signage content",
    long_about = "Downloads the signage image and playlist from remote storage, points the\n\
                  playlist at the new image and moves both into the display's output folder.\n\n\
                  Every setting can also be given through the environment or a .env file."
)]
pub struct Args {
    /// Storage host that resource URLs are relative to.
    #[arg(long = "host-url", env = "HOST_URL")]
    pub host_url: Option<String>,

    /// Signage image URL.
    #[arg(long = "img-url", env = "IMG_URL")]
    pub image_url: Option<String>,

    /// Playlist XML URL.
    #[arg(long = "xml-url", env = "XML_URL")]
    pub playlist_url: Option<String>,

    /// Folder watched by the display renderer.
    #[arg(short, long = "out-folder", env = "OUT_FOLDER")]
    pub out_folder: Option<PathBuf>,

    /// Chat webhook for run notifications.
    #[arg(short, long = "webhook-url", env = "WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Folder for downloads before they are published.
    #[arg(long = "staging-dir", env = "STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Append-only log file.
    #[arg(long = "log-file", env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log to stderr only.
    #[arg(long)]
    pub no_log_file: bool,

    /// `host:port` used for the connectivity check.
    #[arg(long = "probe-address", env = "PROBE_ADDRESS")]
    pub probe_address: Option<String>,

    /// Connectivity check attempts.
    #[arg(long = "probe-attempts", env = "PROBE_ATTEMPTS")]
    pub probe_attempts: Option<u32>,

    /// Seconds between connectivity check attempts.
    #[arg(long = "probe-retry-delay", env = "PROBE_RETRY_DELAY")]
    pub probe_retry_delay: Option<u64>,

    /// Download timeout in seconds.
    #[arg(long = "fetch-timeout", env = "FETCH_TIMEOUT")]
    pub fetch_timeout: Option<u64>,

    /// Webhook timeout in seconds.
    #[arg(long = "notify-timeout", env = "NOTIFY_TIMEOUT")]
    pub notify_timeout: Option<u64>,

    /// How the playlist placeholder is rewritten.
    #[arg(long = "patch-mode", value_enum, env = "PATCH_MODE")]
    pub patch_mode: Option<PatchModeArg>,

    /// What to do with later stages after a failure.
    #[arg(long = "on-failure", value_enum, env = "ON_FAILURE")]
    pub on_failure: Option<FailurePolicyArg>,

    /// Exit with a non-zero status when any stage failed.
    ///
    /// `STRICT_EXIT` accepts the usual spellings (`1`, `yes`, `0`, `off`, ...).
    #[arg(long, env = "STRICT_EXIT", value_parser = FalseyValueParser::new())]
    pub strict: bool,

    /// Use this token instead of the current timestamp for the image name.
    #[arg(long)]
    pub token: Option<String>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "piink.toml")]
    pub config: PathBuf,

    /// Show a progress bar for large downloads.
    #[arg(long)]
    pub progress: bool,

    /// Suppress console output.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI patch mode argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PatchModeArg {
    /// Replace every occurrence of the placeholder.
    Literal,
    /// Replace only placeholder file references.
    FileReference,
}

impl From<PatchModeArg> for PatchMode {
    fn from(arg: PatchModeArg) -> Self {
        match arg {
            PatchModeArg::Literal => PatchMode::Literal,
            PatchModeArg::FileReference => PatchMode::FileReference,
        }
    }
}

/// CLI failure policy argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FailurePolicyArg {
    /// Keep running later stages.
    Continue,
    /// Skip later stages.
    Halt,
}

impl From<FailurePolicyArg> for FailurePolicy {
    fn from(arg: FailurePolicyArg) -> Self {
        match arg {
            FailurePolicyArg::Continue => FailurePolicy::Continue,
            FailurePolicyArg::Halt => FailurePolicy::Halt,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(host_url) = &self.host_url {
            config.source.host_url = host_url.clone();
        }

        if let Some(image_url) = &self.image_url {
            config.source.image_url = image_url.clone();
        }

        if let Some(playlist_url) = &self.playlist_url {
            config.source.playlist_url = playlist_url.clone();
        }

        if let Some(out_folder) = &self.out_folder {
            config.output.out_folder = out_folder.clone();
        }

        if let Some(staging_dir) = &self.staging_dir {
            config.output.staging_dir = staging_dir.clone();
        }

        // An empty WEBHOOK_URL means "no webhook"
        if let Some(webhook_url) = &self.webhook_url {
            config.notify.webhook_url = if webhook_url.trim().is_empty() {
                None
            } else {
                Some(webhook_url.clone())
            };
        }

        if let Some(timeout) = self.notify_timeout {
            config.notify.timeout_seconds = timeout;
        }

        if let Some(address) = &self.probe_address {
            config.probe.address = address.clone();
        }

        if let Some(attempts) = self.probe_attempts {
            config.probe.max_attempts = attempts;
        }

        if let Some(delay) = self.probe_retry_delay {
            config.probe.retry_delay_seconds = delay;
        }

        if let Some(timeout) = self.fetch_timeout {
            config.options.fetch_timeout_seconds = timeout;
        }

        if let Some(mode) = self.patch_mode {
            config.options.patch_mode = mode.into();
        }

        if let Some(policy) = self.on_failure {
            config.options.on_failure = policy.into();
        }

        if let Some(log_file) = &self.log_file {
            config.options.log_file = Some(log_file.clone());
        }

        // Boolean flags (only override if set to non-default)
        if self.no_log_file {
            config.options.log_file = None;
        }

        if self.strict {
            config.options.strict_exit = true;
        }

        if self.progress {
            config.options.show_progress = true;
        }

        if self.quiet {
            config.options.quiet = true;
        }
    }
}
