//! Playlist placeholder rewriting.

use std::borrow::Cow;
use std::path::Path;

use regex::Regex;

use crate::config::{Config, PatchMode};
use crate::error::{Error, Result};

/// Points a downloaded playlist at the freshly named image.
#[derive(Debug, Clone)]
pub struct PlaylistPatcher {
    mode: PatchMode,
    placeholder: String,
    reference: Regex,
}

impl PlaylistPatcher {
    /// `placeholder` is the image stem used by the remote playlist (`out`),
    /// `extension` the image extension (`jpg`).
    pub fn new(mode: PatchMode, placeholder: &str, extension: &str) -> Result<Self> {
        let reference = Regex::new(&format!(
            r"\b{}\.{}\b",
            regex::escape(placeholder),
            regex::escape(extension)
        ))?;

        Ok(Self {
            mode,
            placeholder: placeholder.to_string(),
            reference,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.options.patch_mode,
            &config.output.placeholder,
            &config.output.image_extension,
        )
    }

    pub fn mode(&self) -> PatchMode {
        self.mode
    }

    /// Rewrite `text`, returning the result and the number of replacements.
    pub fn rewrite<'t>(&self, text: &'t str, token: &str) -> (Cow<'t, str>, usize) {
        match self.mode {
            PatchMode::Literal => {
                let count = text.matches(self.placeholder.as_str()).count();
                if count == 0 {
                    (Cow::Borrowed(text), 0)
                } else {
                    (Cow::Owned(text.replace(self.placeholder.as_str(), token)), count)
                }
            }
            PatchMode::FileReference => {
                let count = self.reference.find_iter(text).count();
                let extension_start = self.placeholder.len();
                let rewritten = self.reference.replace_all(text, |caps: &regex::Captures| {
                    format!("{}{}", token, &caps[0][extension_start..])
                });
                (rewritten, count)
            }
        }
    }

    /// Rewrite the playlist at `xml_path` in place.
    pub async fn patch(&self, xml_path: &Path, token: &str) -> Result<usize> {
        if xml_path.as_os_str().is_empty() || token.trim().is_empty() {
            return Err(Error::Precondition(
                "patching needs both a playlist path and a token".to_string(),
            ));
        }

        if !tokio::fs::try_exists(xml_path).await.unwrap_or(false) {
            return Err(Error::Precondition(format!(
                "no staged playlist at {}",
                xml_path.display()
            )));
        }

        let text = tokio::fs::read_to_string(xml_path)
            .await
            .map_err(|e| Error::Patch(format!("reading {}: {}", xml_path.display(), e)))?;

        let (rewritten, count) = self.rewrite(&text, token);
        if count == 0 {
            tracing::warn!(
                mode = %self.mode,
                "No '{}' reference found in {}",
                self.placeholder,
                xml_path.display()
            );
            return Ok(0);
        }

        tokio::fs::write(xml_path, rewritten.as_bytes())
            .await
            .map_err(|e| Error::Patch(format!("writing {}: {}", xml_path.display(), e)))?;

        tracing::info!(replacements = count, "Patched {}", xml_path.display());
        Ok(count)
    }
}
