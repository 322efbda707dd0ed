//! Moving staged files into the output folder.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs::{ensure_dir, partial_path, PublishPaths, StagingPaths};

/// Move a file, falling back to copy + remove when a rename is not possible
/// (for example across filesystems).
///
/// The fallback copies into a `.part` sibling and renames it over `to`, so a
/// failed copy never truncates an existing destination.
pub async fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match tokio::fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(e),
        Err(e) => {
            tracing::debug!(
                "rename {} -> {} failed ({}), copying instead",
                from.display(),
                to.display(),
                e
            );
            copy_into_place(from, to).await?;
            tokio::fs::remove_file(from).await
        }
    }
}

async fn copy_into_place(from: &Path, to: &Path) -> std::io::Result<()> {
    let part = partial_path(to);
    let result = match tokio::fs::copy(from, &part).await {
        Ok(_) => tokio::fs::rename(&part, to).await,
        Err(e) => Err(e),
    };
    if result.is_err() {
        if let Err(cleanup) = tokio::fs::remove_file(&part).await {
            tracing::debug!("Could not remove {}: {}", part.display(), cleanup);
        }
    }
    result
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// Copy of the playlist being replaced, kept until the new pair is in place.
struct PlaylistBackup {
    target: PathBuf,
    saved: Option<PathBuf>,
}

impl PlaylistBackup {
    async fn take(target: &Path) -> std::io::Result<Self> {
        let saved = if is_file(target).await {
            let mut name = target
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| OsString::from("playlist"));
            name.push(".prev");
            let saved = target.with_file_name(name);
            tokio::fs::copy(target, &saved).await?;
            Some(saved)
        } else {
            None
        };

        Ok(Self {
            target: target.to_path_buf(),
            saved,
        })
    }

    /// Put the previous playlist back, or remove a new one when there was none.
    async fn restore(self) -> std::io::Result<()> {
        match &self.saved {
            Some(saved) => tokio::fs::rename(saved, &self.target).await,
            None if is_file(&self.target).await => tokio::fs::remove_file(&self.target).await,
            None => Ok(()),
        }
    }

    async fn discard(self) {
        if let Some(saved) = &self.saved {
            if let Err(e) = tokio::fs::remove_file(saved).await {
                tracing::debug!("Could not remove {}: {}", saved.display(), e);
            }
        }
    }
}

/// Relocates staged artifacts to where the display renderer picks them up.
pub struct Publisher<'a> {
    staging: &'a StagingPaths,
    target: &'a PublishPaths,
}

impl<'a> Publisher<'a> {
    pub fn new(staging: &'a StagingPaths, target: &'a PublishPaths) -> Self {
        Self { staging, target }
    }

    /// Move the image, then the playlist.
    ///
    /// Nothing moves unless both staged files exist and no image with the
    /// same name is already published. If the playlist move fails the
    /// previous playlist is restored and the image is moved back, so the
    /// output folder never holds a playlist that points at a missing image.
    pub async fn publish(&self) -> Result<()> {
        for staged in [&self.staging.image, &self.staging.playlist] {
            if !tokio::fs::try_exists(staged).await.unwrap_or(false) {
                return Err(Error::Precondition(format!(
                    "staged file missing: {}",
                    staged.display()
                )));
            }
        }

        if tokio::fs::try_exists(&self.target.image).await? {
            return Err(Error::Publish(format!(
                "{} is already published",
                self.target.image.display()
            )));
        }

        if let Some(dir) = self.target.image.parent() {
            ensure_dir(dir).await?;
        }
        if let Some(dir) = self.target.playlist.parent() {
            ensure_dir(dir).await?;
        }

        let backup = PlaylistBackup::take(&self.target.playlist)
            .await
            .map_err(|e| {
                Error::Publish(format!(
                    "saving previous playlist {}: {}",
                    self.target.playlist.display(),
                    e
                ))
            })?;

        if let Err(e) = move_file(&self.staging.image, &self.target.image).await {
            backup.discard().await;
            self.remove_published_image().await;
            return Err(Error::Publish(format!(
                "moving image to {}: {}",
                self.target.image.display(),
                e
            )));
        }

        if let Err(e) = move_file(&self.staging.playlist, &self.target.playlist).await {
            match backup.restore().await {
                Ok(()) => tracing::info!("Restored {}", self.target.playlist.display()),
                Err(undo) => tracing::warn!(
                    "Could not restore {}: {}",
                    self.target.playlist.display(),
                    undo
                ),
            }
            self.roll_back_image().await;
            return Err(Error::Publish(format!(
                "moving playlist to {}: {}",
                self.target.playlist.display(),
                e
            )));
        }
        backup.discard().await;

        tracing::info!(
            image = %self.target.image.display(),
            playlist = %self.target.playlist.display(),
            "Published signage"
        );
        Ok(())
    }

    async fn roll_back_image(&self) {
        match move_file(&self.target.image, &self.staging.image).await {
            Ok(()) => tracing::info!("Rolled back {}", self.target.image.display()),
            Err(e) => tracing::warn!("Could not roll back {}: {}", self.target.image.display(), e),
        }
    }

    /// The image name is new for this run and the staged copy is still in
    /// place, so whatever sits at the target can go.
    async fn remove_published_image(&self) {
        if is_file(&self.target.image).await {
            if let Err(e) = tokio::fs::remove_file(&self.target.image).await {
                tracing::warn!("Could not remove {}: {}", self.target.image.display(), e);
            }
        }
    }
}
