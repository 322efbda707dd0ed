//! Error types for the piink-fetch job.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Network errors
    #[error("No network connectivity: {address} unreachable after {attempts} attempt(s)")]
    Connectivity { address: String, attempts: u32 },

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Transfer failed: {0}")]
    Transfer(String),

    // Stage errors
    #[error("Playlist patch failed: {0}")]
    Patch(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    /// Input to a stage was missing or empty; the stage was not attempted.
    #[error("Precondition not met: {0}")]
    Precondition(String),

    #[error("{0} stage(s) failed")]
    StageFailures(usize),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error means the step was skipped rather than attempted.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::Precondition(_))
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    /// Missing configuration or no connectivity.
    pub const ABORT: i32 = 1;
    /// One or more stages failed and strict exit was requested.
    pub const STAGE_FAILED: i32 = 2;
    pub const UNEXPECTED_ERROR: i32 = 3;
}
