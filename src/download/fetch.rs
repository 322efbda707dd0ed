//! Remote file downloading.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::{Error, Result};
use crate::fs::{ensure_parent, partial_path};
use crate::output::create_download_bar;

/// Bytes buffered before each write to disk.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Minimum body size to show a progress bar (1 MiB).
const PROGRESS_THRESHOLD: u64 = 1024 * 1024;

/// Streams remote resources onto local paths.
pub struct Fetcher<'a> {
    client: &'a Client,
    timeout: Duration,
    show_progress: bool,
}

impl<'a> Fetcher<'a> {
    pub fn new(client: &'a Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Download `url` to `destination`, returning the number of bytes written.
    ///
    /// Anything but `200 OK` is an error and leaves `destination` untouched.
    /// The body goes to a `.part` sibling first and only replaces the
    /// destination once fully written.
    pub async fn fetch(&self, url: &str, destination: &Path) -> Result<u64> {
        if url.trim().is_empty() || destination.as_os_str().is_empty() {
            return Err(Error::Precondition(
                "download needs both a URL and a destination path".to_string(),
            ));
        }

        tracing::debug!("GET {}", url);
        let response = self.client.get(url).timeout(self.timeout).send().await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);
        if status != StatusCode::OK {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        ensure_parent(destination).await?;
        let part = partial_path(destination);

        let result = match self.stream_to(response, &part).await {
            Ok(written) => tokio::fs::rename(&part, destination)
                .await
                .map(|()| written)
                .map_err(Error::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(written) => {
                tracing::info!(bytes = written, "Downloaded {}", destination.display());
                Ok(written)
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&part).await {
                    tracing::debug!("Could not remove {}: {}", part.display(), cleanup);
                }
                Err(e)
            }
        }
    }

    async fn stream_to(&self, response: reqwest::Response, path: &Path) -> Result<u64> {
        let content_length = response.content_length();
        let progress = if self.show_progress
            && content_length
                .map(|l| l > PROGRESS_THRESHOLD)
                .unwrap_or(false)
        {
            Some(create_download_bar(content_length.unwrap_or(0)))
        } else {
            None
        };

        let file = File::create(path).await?;
        let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Transfer(format!("Stream error: {}", e)))?;
            writer.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(ref pb) = progress {
                pb.set_position(downloaded);
            }
        }

        writer.flush().await?;
        writer.into_inner().sync_all().await?;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(downloaded)
    }
}
