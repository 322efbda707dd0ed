//! Configuration structures and loading logic.

use crate::config::modes::{FailurePolicy, PatchMode};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub notify: NotifyConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Remote resources to fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Storage host the resource URLs are relative to (`HOST_URL`).
    #[serde(default)]
    pub host_url: String,

    /// Signage image URL (`IMG_URL`), absolute or relative to the host.
    #[serde(default)]
    pub image_url: String,

    /// Playlist XML URL (`XML_URL`), absolute or relative to the host.
    #[serde(default)]
    pub playlist_url: String,
}

/// Local staging and publish locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Folder watched by the display renderer (`OUT_FOLDER`).
    #[serde(default)]
    pub out_folder: PathBuf,

    /// Folder holding freshly downloaded files before publishing.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// File name of the published playlist.
    #[serde(default = "default_playlist_name")]
    pub playlist_name: String,

    /// Extension given to the staged and published image.
    #[serde(default = "default_image_extension")]
    pub image_extension: String,

    /// Placeholder image stem referenced by the remote playlist.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            out_folder: PathBuf::new(),
            staging_dir: default_staging_dir(),
            playlist_name: default_playlist_name(),
            image_extension: default_image_extension(),
            placeholder: default_placeholder(),
        }
    }
}

/// Chat webhook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Webhook receiving `{"text": ...}` payloads (`WEBHOOK_URL`).
    #[serde(default)]
    pub webhook_url: Option<String>,

    #[serde(default = "default_notify_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_seconds: default_notify_timeout(),
        }
    }
}

/// Connectivity pre-check settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// `host:port` opened over TCP to prove outbound reachability.
    #[serde(default = "default_probe_address")]
    pub address: String,

    #[serde(default = "default_probe_attempts")]
    pub max_attempts: u32,

    /// Seconds to wait between failed attempts.
    #[serde(default = "default_probe_delay")]
    pub retry_delay_seconds: u64,

    #[serde(default = "default_probe_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            address: default_probe_address(),
            max_attempts: default_probe_attempts(),
            retry_delay_seconds: default_probe_delay(),
            connect_timeout_seconds: default_probe_connect_timeout(),
        }
    }
}

/// Run behaviour options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Whole-request timeout for each download.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,

    #[serde(default)]
    pub patch_mode: PatchMode,

    #[serde(default)]
    pub on_failure: FailurePolicy,

    /// Exit non-zero when any stage failed.
    #[serde(default)]
    pub strict_exit: bool,

    /// Append-only log file; `None` logs to stderr only.
    #[serde(default = "default_log_file")]
    pub log_file: Option<PathBuf>,

    /// Show a progress bar for large downloads.
    #[serde(default)]
    pub show_progress: bool,

    /// Suppress console output.
    #[serde(default)]
    pub quiet: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_seconds: default_fetch_timeout(),
            patch_mode: PatchMode::default(),
            on_failure: FailurePolicy::default(),
            strict_exit: false,
            log_file: default_log_file(),
            show_progress: false,
            quiet: false,
        }
    }
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("/home/pi/piink/media")
}

fn default_playlist_name() -> String {
    "dv_signage.xml".to_string()
}

fn default_image_extension() -> String {
    "jpg".to_string()
}

fn default_placeholder() -> String {
    "out".to_string()
}

fn default_notify_timeout() -> u64 {
    10
}

fn default_probe_address() -> String {
    "8.8.8.8:53".to_string()
}

fn default_probe_attempts() -> u32 {
    5
}

fn default_probe_delay() -> u64 {
    10
}

fn default_probe_connect_timeout() -> u64 {
    5
}

fn default_fetch_timeout() -> u64 {
    12
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("/home/pi/piink/piink.log"))
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the image URL against the host.
    pub fn image_url(&self) -> Result<String> {
        resolve_url(&self.source.host_url, &self.source.image_url)
    }

    /// Resolve the playlist URL against the host.
    pub fn playlist_url(&self) -> Result<String> {
        resolve_url(&self.source.host_url, &self.source.playlist_url)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.options.fetch_timeout_seconds)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify.timeout_seconds)
    }

    /// Staged image file name, e.g. `out.jpg`.
    pub fn staged_image_name(&self) -> String {
        format!(
            "{}.{}",
            self.output.placeholder, self.output.image_extension
        )
    }
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_url(base: &str, path: &str) -> Result<String> {
    let path = path.trim();
    if path.starts_with("http://") || path.starts_with("https://") {
        return Ok(url::Url::parse(path)?.to_string());
    }

    let base_url = url::Url::parse(base.trim())?;
    let resolved = base_url.join(path)?;
    Ok(resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.probe.address, "8.8.8.8:53");
        assert_eq!(config.options.fetch_timeout_seconds, 12);
        assert_eq!(config.output.playlist_name, "dv_signage.xml");
        assert_eq!(config.staged_image_name(), "out.jpg");
        assert!(config.notify.webhook_url.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("piink.toml");
        fs::write(
            &path,
            r#"
[source]
host_url = "https://bucket.example.com/"
image_url = "signage/out.jpg"

[options]
patch_mode = "file-reference"
on_failure = "halt"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.source.host_url, "https://bucket.example.com/");
        assert_eq!(config.options.patch_mode, PatchMode::FileReference);
        assert_eq!(config.options.on_failure, FailurePolicy::Halt);
        assert_eq!(config.probe.max_attempts, 5);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(
            resolve_url("https://bucket.example.com/piink/", "out.jpg").unwrap(),
            "https://bucket.example.com/piink/out.jpg"
        );
        assert_eq!(
            resolve_url("ignored", "https://cdn.example.com/a.xml").unwrap(),
            "https://cdn.example.com/a.xml"
        );
        assert!(resolve_url("not a url", "out.jpg").is_err());
    }
}
