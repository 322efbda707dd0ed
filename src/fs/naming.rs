//! Token and filename handling.

use std::fmt;

use chrono::{DateTime, Local, TimeZone};

use crate::error::{Error, Result};

/// Format of generated tokens, e.g. `20240101120000`.
pub const TOKEN_FORMAT: &str = "%Y%m%d%H%M%S";

/// Fresh name given to a published image and written into the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampToken(String);

impl TimestampToken {
    /// Token for the current local time.
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self(at.format(TOKEN_FORMAT).to_string())
    }

    /// Accept a caller-supplied token if it is usable as a file stem.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        let sanitized = sanitize_filename(value)?;
        if sanitized != value {
            return Err(Error::InvalidToken(format!(
                "'{}' contains characters not allowed in a file name",
                value
            )));
        }
        Ok(Self(sanitized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the published image, e.g. `20240101120000.jpg`.
    pub fn image_file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }
}

impl fmt::Display for TimestampToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate and sanitize a filename by removing or replacing invalid characters.
///
/// Returns an error if the filename contains path traversal patterns.
pub fn sanitize_filename(name: &str) -> Result<String> {
    if name.contains("..") {
        return Err(Error::InvalidToken(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidToken(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidToken(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' | '&' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidToken(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}
