//! Staging and publish path management.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::fs::naming::TimestampToken;

/// Local paths holding freshly downloaded files before publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingPaths {
    pub image: PathBuf,
    pub playlist: PathBuf,
}

impl StagingPaths {
    pub fn from_config(config: &Config) -> Self {
        let dir = &config.output.staging_dir;
        Self {
            image: dir.join(config.staged_image_name()),
            playlist: dir.join(&config.output.playlist_name),
        }
    }
}

/// Final paths inside the output folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPaths {
    pub image: PathBuf,
    pub playlist: PathBuf,
}

impl PublishPaths {
    pub fn for_token(config: &Config, token: &TimestampToken) -> Self {
        let dir = &config.output.out_folder;
        Self {
            image: dir.join(token.image_file_name(&config.output.image_extension)),
            playlist: dir.join(&config.output.playlist_name),
        }
    }
}

/// Sibling path a download is streamed into before it is complete.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("download"));
    name.push(".part");
    path.with_file_name(name)
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    if !path.as_os_str().is_empty() && !tokio::fs::try_exists(path).await? {
        tokio::fs::create_dir_all(path).await?;
    }
    Ok(())
}

/// Ensure the parent directory of a file exists.
pub async fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) => ensure_dir(parent).await,
        None => Ok(()),
    }
}
